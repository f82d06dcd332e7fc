//! Linear least-squares helpers for the nonlinear fitter.
//!
//! Each Levenberg–Marquardt iteration solves a damped linear problem
//!
//! ```text
//! minimize ‖J δ + r‖² + λ ‖diag(JᵀJ)^½ δ‖²
//! ```
//!
//! which is an ordinary least-squares problem on the augmented system
//! `[J; √λ·D] δ = [-r; 0]`. We solve it with SVD so that rank-deficient
//! Jacobians (e.g. a parameter with no influence on the selected gases) still
//! produce a finite step.

use nalgebra::{DMatrix, DVector};

/// Solve a least squares problem using SVD.
///
/// Returns `None` if the system is too ill-conditioned to solve robustly.
pub fn solve_least_squares(x: &DMatrix<f64>, y: &DVector<f64>) -> Option<DVector<f64>> {
    let svd = x.clone().svd(true, true);

    // Try progressively looser tolerances if strict solve fails.
    for &tol in &[1e-14, 1e-12, 1e-10] {
        if let Ok(beta) = svd.solve(y, tol) {
            if beta.iter().all(|v| v.is_finite()) {
                return Some(beta);
            }
        }
    }

    None
}

/// Solve the damped step `[J; √λ·D] δ = [-r; 0]`.
pub fn damped_step(jacobian: &DMatrix<f64>, residuals: &DVector<f64>, lambda: f64) -> Option<DVector<f64>> {
    let (m, n) = jacobian.shape();
    let mut augmented = DMatrix::<f64>::zeros(m + n, n);
    augmented.view_mut((0, 0), (m, n)).copy_from(jacobian);

    for j in 0..n {
        let scale = jacobian.column(j).norm();
        let scale = if scale > 0.0 { scale } else { 1.0 };
        augmented[(m + j, j)] = lambda.sqrt() * scale;
    }

    let mut rhs = DVector::<f64>::zeros(m + n);
    rhs.rows_mut(0, m).copy_from(&(-residuals));

    solve_least_squares(&augmented, &rhs)
}

/// Null-space components above this mark a parameter as undetermined.
const NULL_COMPONENT: f64 = 1e-6;

/// Covariance estimate `(JᵀJ)⁻¹` of the parameters at the optimum.
///
/// Singular values of `JᵀJ` below `σ_max · n · ε` are treated as zero. A
/// parameter with a component along such a direction is not determined by the
/// data; its row and column are set to NaN rather than to a misleading zero.
pub fn covariance(jacobian: &DMatrix<f64>) -> Option<DMatrix<f64>> {
    let normal = jacobian.transpose() * jacobian;
    let n = normal.nrows();
    let svd = normal.svd(false, true);
    let v_t = svd.v_t.as_ref()?;

    let tol = svd.singular_values.max() * n as f64 * f64::EPSILON;
    let mut cov = DMatrix::<f64>::zeros(n, n);
    let mut undetermined = vec![false; n];
    for (i, &sigma) in svd.singular_values.iter().enumerate() {
        let v = v_t.row(i);
        if sigma > tol {
            cov += (v.transpose() * v) / sigma;
        } else {
            for (k, flag) in undetermined.iter_mut().enumerate() {
                if v[k].abs() > NULL_COMPONENT {
                    *flag = true;
                }
            }
        }
    }

    for (k, _) in undetermined.iter().enumerate().filter(|(_, flag)| **flag) {
        cov.row_mut(k).fill(f64::NAN);
        cov.column_mut(k).fill(f64::NAN);
    }
    Some(cov)
}
