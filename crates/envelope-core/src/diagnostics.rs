//! Diagnostic sink threaded through the instance-construction pipeline.
//!
//! Every stage that has something to report (timings, matrix norms,
//! reconstruction errors) does so through a [`Diagnostics`] value owned by
//! the problem object rather than through a process-wide logger instance.
//! Each event is forwarded to the [`log`] facade under the sink's target and
//! also recorded, so callers can inspect numeric warnings after the fact.

use std::time::Duration;

use crate::Real;

/// Default log target used by [`Diagnostics::default`].
pub const DEFAULT_TARGET: &str = "envelope";

/// A non-fatal numeric finding: a measured quantity exceeded its tolerance.
///
/// Warnings never abort the pipeline; they are surfaced for diagnostics.
#[derive(Debug, Clone, PartialEq)]
pub struct NumericWarning {
    /// What was measured, e.g. `"‖Q·Q⁻¹ − I‖"`.
    pub quantity: String,
    /// The measured value.
    pub value: Real,
    /// The tolerance it was checked against.
    pub tolerance: Real,
}

impl std::fmt::Display for NumericWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} = {:e} exceeds tolerance {:e}",
            self.quantity, self.value, self.tolerance
        )
    }
}

/// A recorded diagnostic event.
#[derive(Debug, Clone, PartialEq)]
pub enum DiagnosticEvent {
    /// A pipeline stage finished after `elapsed`.
    Timing {
        /// Stage name.
        stage: String,
        /// Wall-clock duration of the stage.
        elapsed: Duration,
    },
    /// A named scalar metric (norms, residuals).
    Metric {
        /// Metric name.
        name: String,
        /// Metric value.
        value: Real,
    },
    /// A numeric warning.
    Warning(NumericWarning),
}

/// Diagnostic sink: forwards to `log` and records events.
#[derive(Debug, Clone)]
pub struct Diagnostics {
    target: String,
    events: Vec<DiagnosticEvent>,
}

impl Default for Diagnostics {
    fn default() -> Self {
        Self::new(DEFAULT_TARGET)
    }
}

impl Diagnostics {
    /// Create a sink that logs under `target`.
    pub fn new(target: impl Into<String>) -> Self {
        Self {
            target: target.into(),
            events: Vec::new(),
        }
    }

    /// The log target.
    pub fn target(&self) -> &str {
        &self.target
    }

    /// Log an informational message (not recorded).
    pub fn info(&self, message: std::fmt::Arguments<'_>) {
        log::info!(target: self.target.as_str(), "{message}");
    }

    /// Log a debug message (not recorded).
    pub fn debug(&self, message: std::fmt::Arguments<'_>) {
        log::debug!(target: self.target.as_str(), "{message}");
    }

    /// Log a trace message (not recorded).
    pub fn trace(&self, message: std::fmt::Arguments<'_>) {
        log::trace!(target: self.target.as_str(), "{message}");
    }

    /// Whether trace-level output is enabled for this target.
    ///
    /// Used to skip formatting large matrices when nobody listens.
    pub fn trace_enabled(&self) -> bool {
        log::log_enabled!(target: self.target.as_str(), log::Level::Trace)
    }

    /// Record and log the duration of a stage.
    pub fn timing(&mut self, stage: &str, elapsed: Duration) {
        log::info!(
            target: self.target.as_str(),
            "{stage} took {:.3} seconds.",
            elapsed.as_secs_f64()
        );
        self.events.push(DiagnosticEvent::Timing {
            stage: stage.to_string(),
            elapsed,
        });
    }

    /// Record and log a named metric.
    pub fn metric(&mut self, name: &str, value: Real) {
        log::info!(target: self.target.as_str(), "{name} is {value:e}");
        self.events.push(DiagnosticEvent::Metric {
            name: name.to_string(),
            value,
        });
    }

    /// Record `value` as a metric and, if it exceeds `tolerance`, also as a
    /// [`NumericWarning`]. Returns `true` when a warning was raised.
    pub fn check(&mut self, quantity: &str, value: Real, tolerance: Real) -> bool {
        self.metric(quantity, value);
        // NaN counts as exceeding.
        if value <= tolerance {
            return false;
        }
        let warning = NumericWarning {
            quantity: quantity.to_string(),
            value,
            tolerance,
        };
        log::warn!(target: self.target.as_str(), "{warning}");
        self.events.push(DiagnosticEvent::Warning(warning));
        true
    }

    /// All recorded events, oldest first.
    pub fn events(&self) -> &[DiagnosticEvent] {
        &self.events
    }

    /// Recorded numeric warnings, oldest first.
    pub fn warnings(&self) -> impl Iterator<Item = &NumericWarning> {
        self.events.iter().filter_map(|e| match e {
            DiagnosticEvent::Warning(w) => Some(w),
            _ => None,
        })
    }

    /// Latest recorded value of the metric `name`, if any.
    pub fn last_metric(&self, name: &str) -> Option<Real> {
        self.events.iter().rev().find_map(|e| match e {
            DiagnosticEvent::Metric { name: n, value } if n == name => Some(*value),
            _ => None,
        })
    }

    /// Drop all recorded events.
    pub fn clear(&mut self) {
        self.events.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn check_below_tolerance_records_metric_only() {
        let mut d = Diagnostics::default();
        assert!(!d.check("residual", 1e-12, 1e-6));
        assert_eq!(d.events().len(), 1);
        assert_eq!(d.warnings().count(), 0);
        assert_abs_diff_eq!(d.last_metric("residual").unwrap(), 1e-12);
    }

    #[test]
    fn check_above_tolerance_raises_warning() {
        let mut d = Diagnostics::new("test");
        assert!(d.check("‖Q·Q⁻¹ − I‖", 1e-3, 1e-6));
        let w: Vec<_> = d.warnings().collect();
        assert_eq!(w.len(), 1);
        assert_eq!(w[0].quantity, "‖Q·Q⁻¹ − I‖");
        assert_abs_diff_eq!(w[0].tolerance, 1e-6);
    }

    #[test]
    fn nan_is_reported() {
        let mut d = Diagnostics::default();
        assert!(d.check("norm", f64::NAN, 1.0));
    }

    #[test]
    fn timings_are_recorded_in_order() {
        let mut d = Diagnostics::default();
        d.timing("basis", Duration::from_millis(3));
        d.metric("norm", 2.0);
        assert!(matches!(d.events()[0], DiagnosticEvent::Timing { .. }));
        assert!(matches!(d.events()[1], DiagnosticEvent::Metric { .. }));
        d.clear();
        assert!(d.events().is_empty());
    }
}
