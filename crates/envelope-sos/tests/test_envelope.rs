//! End-to-end tests of instance construction and projection.
//!
//! These exercise `EnvelopeProblem` from registration through instance
//! assembly, a stand-in solver, and projection back to monomial form.

use approx::assert_abs_diff_eq;
use envelope_core::{errors::Result, DiagnosticEvent, Diagnostics, Error, UsageError};
use envelope_math::{matrix_utilities, polynomial, Array, ChebyshevBasis};
use envelope_sos::registry::INVERSION_ERROR;
use envelope_sos::{
    Barrier, ConicSolver, Domain, EnvelopeConfig, EnvelopeProblem, Instance, MultiplierPolicy,
    Solution,
};

fn problem(degree: usize, domain: Domain) -> EnvelopeProblem {
    EnvelopeProblem::new(EnvelopeConfig::new(degree, domain), Diagnostics::default()).unwrap()
}

fn mono(coeffs: &[f64]) -> Array {
    Array::from_slice(coeffs)
}

// ─── Instance assembly ────────────────────────────────────────────────────────

#[test]
fn test_x_squared_against_zero() {
    let mut p = problem(1, Domain::reference());
    p.add_polynomial(&mono(&[0.0, 0.0, 0.0])).unwrap();
    p.add_polynomial(&mono(&[0.0, 0.0, 1.0])).unwrap();
    let instance = p.build_instance().unwrap();

    let primal = instance.primal();
    assert_eq!((primal.a.rows(), primal.a.cols()), (3, 6));

    // -X + Y₁ = P₁ − P₀ is x² once mapped back to monomials
    let q = p.basis().unwrap().transform_matrix();
    let rhs = q.mul_vec(&primal.b.segment(0, 3));
    assert_abs_diff_eq!(rhs[0], 0.0, epsilon = 1e-12);
    assert_abs_diff_eq!(rhs[1], 0.0, epsilon = 1e-12);
    assert_abs_diff_eq!(rhs[2], 1.0, epsilon = 1e-12);

    // the objective is ∫ X over [−1, 1] on slot 0 only
    assert_abs_diff_eq!(primal.c.segment(0, 3).sum(), 2.0, epsilon = 1e-14);
    assert!(primal.c.segment(3, 3).is_zero());
}

#[test]
fn test_same_polynomial_twice_gives_zero_rhs() {
    let mut p = problem(3, Domain::new(-2.0, 1.0).unwrap());
    let poly = mono(&[1.0, -0.5, 0.25, 2.0, 0.0, 0.0, -1.0]);
    p.add_polynomial(&poly).unwrap();
    p.add_polynomial(&poly).unwrap();
    let instance = p.build_instance().unwrap();
    assert!(instance.primal().b.iter().all(|v| *v == 0.0));
}

#[test]
fn test_too_few_polynomials() {
    let mut p = problem(2, Domain::reference());
    assert_eq!(
        p.build_instance().unwrap_err(),
        Error::Usage(UsageError::EmptyInstance)
    );
    p.add_polynomial(&mono(&[1.0, 0.0, 0.0, 0.0, 0.0])).unwrap();
    assert_eq!(
        p.build_instance().unwrap_err(),
        Error::Usage(UsageError::TrivialInstance)
    );
}

#[test]
fn test_multivariate_config_rejected() {
    let cfg = EnvelopeConfig::default().with_num_variables(3);
    assert_eq!(
        EnvelopeProblem::new(cfg, Diagnostics::default()).unwrap_err(),
        Error::Usage(UsageError::UnsupportedVariableCount(3))
    );
}

#[test]
fn test_dual_is_consistent_with_primal() {
    let mut p = problem(2, Domain::new(0.0, 3.0).unwrap());
    for poly in [
        [1.0, 0.0, 0.0, 0.0, 0.0],
        [0.0, 1.0, 0.0, 0.0, 0.0],
        [2.0, -1.0, 0.5, 0.0, 0.0],
    ] {
        p.add_polynomial(&mono(&poly)).unwrap();
    }
    let inst = p.build_instance().unwrap();
    let (primal, dual) = (inst.primal(), inst.constraints());

    // dim ker A = N·U − (N−1)·U
    assert_eq!(dual.num_constraints(), 5);
    assert_eq!(dual.num_variables(), inst.dim());
    assert!(primal.residual(&dual.c).unwrap() < 1e-10);
    assert!(dual.residual(&primal.c).unwrap() < 1e-10);
}

#[test]
fn test_barrier_shapes() {
    let weighted = {
        let mut p = problem(2, Domain::new(1.0, 2.0).unwrap());
        for _ in 0..3 {
            p.add_polynomial(&mono(&[1.0, 0.0, 0.0, 0.0, 0.0])).unwrap();
        }
        p.build_instance().unwrap()
    };
    let barrier = weighted.barrier();
    assert_eq!(barrier.dim(), weighted.dim());
    assert_eq!(barrier.children().len(), 3);
    assert!(matches!(barrier.children()[0], Barrier::Sos(_)));
    for slot in &barrier.children()[1..] {
        assert!(matches!(slot, Barrier::Sum { dim: 5, .. }));
        assert_eq!(slot.children().len(), 2);
    }
    // (x − 1)(2 − x)
    let w = barrier.primitives()[2].weight().unwrap();
    assert_eq!(w.as_slice(), &[-2.0, 3.0, -1.0]);

    let cfg = EnvelopeConfig::new(2, Domain::new(1.0, 2.0).unwrap())
        .with_multiplier(MultiplierPolicy::Canonical);
    let mut p = EnvelopeProblem::new(cfg, Diagnostics::default()).unwrap();
    p.add_polynomial(&mono(&[1.0, 0.0, 0.0, 0.0, 0.0])).unwrap();
    p.add_polynomial(&mono(&[0.0, 1.0, 0.0, 0.0, 0.0])).unwrap();
    let inst = p.build_instance().unwrap();
    let w = inst.barrier().primitives()[2].weight().unwrap().clone();
    assert_eq!(w.as_slice(), &[1.0, 0.0, -1.0]);

    let cfg = EnvelopeConfig::new(2, Domain::reference()).with_weighted(false);
    let mut p = EnvelopeProblem::new(cfg, Diagnostics::default()).unwrap();
    p.add_polynomial(&mono(&[1.0, 0.0, 0.0, 0.0, 0.0])).unwrap();
    p.add_polynomial(&mono(&[0.0, 1.0, 0.0, 0.0, 0.0])).unwrap();
    let inst = p.build_instance().unwrap();
    assert_eq!(inst.barrier().primitives().len(), 2);
}

// ─── Basis conversion ─────────────────────────────────────────────────────────

#[test]
fn test_monomial_round_trip() {
    for degree in 1..=5 {
        let domain = Domain::new(-0.5, 1.5).unwrap();
        let mut p = problem(degree, domain);
        let u = 2 * degree + 1;
        let coeffs: Vec<f64> = (0..u).map(|k| 1.0 / (k as f64 + 1.0) - 0.3).collect();
        let poly = Array::from_vec(coeffs);
        let idx = p.add_polynomial(&poly).unwrap();

        let interpolant = p.registry().get(idx).unwrap().clone();
        let back = p.basis().unwrap().to_monomial(&interpolant);
        for k in 0..u {
            assert!(
                (back[k] - poly[k]).abs() < 1e-8,
                "degree {degree}, coefficient {k}: {} vs {}",
                back[k],
                poly[k]
            );
        }
        // node values agree with direct evaluation
        let nodes = p.basis().unwrap().nodes().to_vec();
        for (j, x) in nodes.iter().enumerate() {
            assert_abs_diff_eq!(
                interpolant[j],
                polynomial::evaluate(poly.as_slice(), *x),
                epsilon = 1e-7
            );
        }
    }
}

#[test]
fn test_reconstruction_error_is_small() {
    for degree in 1..=10 {
        let basis = ChebyshevBasis::new(2 * degree + 1, -1.0, 1.0).unwrap();
        let (_, err) = matrix_utilities::inverse_with_error(basis.transform_matrix()).unwrap();
        assert!(err < 1e-6, "degree {degree}: ‖Q·Q⁻¹ − I‖ = {err:e}");
    }
}

#[test]
fn test_reconstruction_error_is_recorded_once() {
    for degree in 1..=6 {
        let mut p = problem(degree, Domain::reference());
        let mut poly = Array::zeros(2 * degree + 1);
        poly[0] = 1.0;
        p.add_polynomial(&poly).unwrap();
        p.add_polynomial(&poly).unwrap();
        assert!(p.registry().inversion_error().unwrap() < 1e-6);
        assert_eq!(p.diagnostics().warnings().count(), 0);
        let measured = p
            .diagnostics()
            .events()
            .iter()
            .filter(|e| matches!(e, DiagnosticEvent::Metric { name, .. } if name == INVERSION_ERROR))
            .count();
        assert_eq!(measured, 1);
    }
}

#[test]
fn test_registration_succeeds_up_to_degree_twenty() {
    for degree in 1..=20 {
        let mut p = problem(degree, Domain::reference());
        let mut poly = Array::zeros(2 * degree + 1);
        poly[0] = 1.0;
        poly[2] = -1.0;
        let idx = p
            .add_polynomial(&poly)
            .unwrap_or_else(|e| panic!("degree {degree}: {e}"));
        let values = p.registry().get(idx).unwrap();
        assert!(values.iter().all(|v| v.is_finite()), "degree {degree}");
    }
}

#[test]
fn test_shifted_domain_registration() {
    let mut p = problem(8, Domain::new(2.0, 5.0).unwrap());
    let mut poly = Array::zeros(17);
    poly[1] = 1.0;
    let idx = p.add_polynomial(&poly).unwrap();
    assert!(p.registry().get(idx).unwrap().iter().all(|v| v.is_finite()));
    assert!(p.diagnostics().last_metric(INVERSION_ERROR).is_some());
}

#[test]
fn test_poor_reconstruction_warns_without_aborting() {
    let mut p = problem(20, Domain::reference());
    let mut poly = Array::zeros(41);
    poly[2] = 1.0;
    p.add_polynomial(&poly).unwrap();
    p.add_polynomial(&Array::zeros(41)).unwrap();
    assert!(p.registry().inversion_error().unwrap() > 1e-6);
    let warnings: Vec<_> = p.diagnostics().warnings().collect();
    assert_eq!(warnings.len(), 1);
    assert_eq!(warnings[0].quantity, INVERSION_ERROR);
    assert!(p.build_instance().is_ok());
}

#[test]
fn test_interpolant_input_skips_conversion() {
    let cfg = EnvelopeConfig::new(1, Domain::reference()).with_input_in_interpolant_basis(true);
    let mut p = EnvelopeProblem::new(cfg, Diagnostics::default()).unwrap();
    p.add_polynomial(&mono(&[0.0, 0.0, 0.0])).unwrap();
    p.add_polynomial(&mono(&[1.0, 0.0, 1.0])).unwrap();
    let inst = p.build_instance().unwrap();
    assert!(p.cached_basis().is_none());
    assert_eq!(inst.primal().b.as_slice(), &[1.0, 0.0, 1.0]);
    assert!(p.registry().inversion_error().is_none());
}

// ─── Solver seam ──────────────────────────────────────────────────────────────

/// Returns the slack for a prescribed envelope given in the interpolant basis.
#[derive(Debug)]
struct PrescribedEnvelope {
    envelope: Array,
    reference: Array,
}

impl ConicSolver for PrescribedEnvelope {
    fn solve(&self, instance: &Instance) -> Result<Solution> {
        let u = instance.slot_size();
        let gap = &self.reference - &self.envelope;
        let mut s = Array::zeros(instance.dim());
        s.set_segment(0, &gap);
        // Y_i = X + (P_i − P₀)
        let b = &instance.primal().b;
        for i in 1..instance.num_slots() {
            s.set_segment(i * u, &(&gap + &b.segment((i - 1) * u, u)));
        }
        Ok(Solution::new(
            Array::zeros(instance.constraints().num_constraints()),
            s,
        ))
    }
}

#[test]
fn test_solve_with_projects_to_monomials() {
    let mut p = problem(1, Domain::reference());
    p.add_polynomial(&mono(&[0.0, 0.0, 1.0])).unwrap();
    p.add_polynomial(&mono(&[1.0, 0.0, 0.0])).unwrap();

    // E = x² − 1
    let basis = ChebyshevBasis::new(3, -1.0, 1.0).unwrap();
    let solver = PrescribedEnvelope {
        envelope: basis.interpolate(|x| x * x - 1.0),
        reference: p.registry().reference().unwrap().clone(),
    };
    let envelope = p.solve_with(&solver).unwrap();
    assert_abs_diff_eq!(envelope[0], -1.0, epsilon = 1e-12);
    assert_abs_diff_eq!(envelope[1], 0.0, epsilon = 1e-12);
    assert_abs_diff_eq!(envelope[2], 1.0, epsilon = 1e-12);
}

#[test]
fn test_prescribed_slack_is_primal_feasible() {
    let mut p = problem(2, Domain::new(-1.0, 2.0).unwrap());
    p.add_polynomial(&mono(&[0.0, 0.0, 1.0, 0.0, 0.0])).unwrap();
    p.add_polynomial(&mono(&[1.0, 1.0, 0.0, 0.0, 0.0])).unwrap();
    p.add_polynomial(&mono(&[2.0, 0.0, 0.0, 0.0, -0.1])).unwrap();
    let inst = p.build_instance().unwrap();
    let solver = PrescribedEnvelope {
        envelope: Array::zeros(5),
        reference: p.registry().reference().unwrap().clone(),
    };
    let sol = solver.solve(&inst).unwrap();
    assert!(inst.primal().residual(&sol.s).unwrap() < 1e-10);
    assert!(sol.check_against(&inst).is_ok());
}

#[test]
fn test_envelope_sample_and_integral() {
    let mut p = problem(1, Domain::reference());
    p.add_polynomial(&mono(&[1.0, -1.0, 0.0])).unwrap();
    p.add_polynomial(&mono(&[1.0, 1.0, 0.0])).unwrap();

    // E = (1 − x²)/2 lies below 1 − |x| with gap (1 − |x|)²/2
    let basis = ChebyshevBasis::new(3, -1.0, 1.0).unwrap();
    let envelope = basis.interpolate(|x| 0.5 * (1.0 - x * x));
    let reference = p.registry().reference().unwrap().clone();
    let mut s = Array::zeros(6);
    s.set_segment(0, &(&reference - &envelope));
    let sol = Solution::new(Array::zeros(3), s);

    assert_abs_diff_eq!(p.envelope_integral(&sol).unwrap(), 2.0 / 3.0, epsilon = 1e-12);
    let sample = p.sample(&sol, 21).unwrap();
    assert!(sample.is_below(1e-12));
    // touches at the endpoints
    assert_abs_diff_eq!(sample.gap[0], 0.0, epsilon = 1e-12);
    assert_abs_diff_eq!(sample.gap[20], 0.0, epsilon = 1e-12);
    assert_abs_diff_eq!(sample.gap[10], 0.5, epsilon = 1e-12);
    assert_abs_diff_eq!(sample.min_gap(), 0.0, epsilon = 1e-12);
}

#[test]
fn test_solver_output_length_checked() {
    #[derive(Debug)]
    struct Short;
    impl ConicSolver for Short {
        fn solve(&self, _: &Instance) -> Result<Solution> {
            Ok(Solution::new(Array::zeros(1), Array::zeros(2)))
        }
    }
    let mut p = problem(1, Domain::reference());
    p.add_polynomial(&mono(&[0.0, 0.0, 0.0])).unwrap();
    p.add_polynomial(&mono(&[0.0, 0.0, 1.0])).unwrap();
    assert!(matches!(
        p.solve_with(&Short),
        Err(Error::DimensionMismatch { expected: 6, .. })
    ));
}
