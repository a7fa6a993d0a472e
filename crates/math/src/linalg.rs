//! Least squares regression for the single-index market model.

use ndarray::{Array1, Array2, ArrayView1, ArrayView2};

use crate::{MathError, sample_variance};

/// Minimum observations for a market-model fit.
const MIN_OBSERVATIONS: usize = 2;

/// Result of an ordinary least squares fit.
#[derive(Debug, Clone)]
pub struct OlsResult {
    /// Estimated coefficients.
    pub coefficients: Array1<f64>,
    /// Residuals.
    pub residuals: Array1<f64>,
    /// R-squared.
    pub r_squared: f64,
}

/// Market-model fit of one return series on a benchmark.
#[derive(Debug, Clone, PartialEq)]
pub struct RegressionFit {
    /// Intercept.
    pub alpha: f64,
    /// Slope on the benchmark.
    pub beta: f64,
    /// Coefficient of determination.
    pub r_squared: f64,
    /// R-squared adjusted for one regressor: `1 - (1 - R²)(n - 1)/(n - 2)`.
    /// NaN with two observations, where there are no residual degrees of freedom.
    pub adjusted_r_squared: f64,
    /// Fitted residuals.
    pub residuals: Array1<f64>,
    /// Sample variance (divisor `n - 1`) of the residuals.
    pub residual_variance: f64,
}

/// Perform ordinary least squares regression.
///
/// Solves: argmin_beta sum((y_i - X_i * beta)^2) via the normal equations.
///
/// # Arguments
/// * `y` - Response vector (n,)
/// * `x` - Design matrix (n x p), including any intercept column
///
/// # Errors
/// Returns error if dimensions mismatch or `XᵀX` is singular.
pub fn ordinary_least_squares(
    y: ArrayView1<'_, f64>,
    x: ArrayView2<'_, f64>,
) -> Result<OlsResult, MathError> {
    let n = y.len();
    if x.nrows() != n {
        return Err(MathError::DimensionMismatch { expected: n, actual: x.nrows() });
    }
    if n == 0 {
        return Err(MathError::EmptyData);
    }

    let xtx = x.t().dot(&x);
    let xty = x.t().dot(&y);
    let coefficients = solve_linear_system(&xtx, &xty)?;

    let fitted = x.dot(&coefficients);
    let residuals = &y - &fitted;

    let y_mean = y.mean().unwrap_or(0.0);
    let ss_tot: f64 = y.iter().map(|yi| (yi - y_mean).powi(2)).sum();
    let ss_res: f64 = residuals.iter().map(|r| r.powi(2)).sum();
    let r_squared = if ss_tot > 0.0 { 1.0 - ss_res / ss_tot } else { 0.0 };

    Ok(OlsResult { coefficients, residuals, r_squared })
}

/// Regress `y` on `benchmark` with an intercept term.
///
/// # Errors
/// Returns `MathError::DimensionMismatch` if lengths differ,
/// `MathError::InsufficientData` with fewer than two observations,
/// `MathError::NumericalInstability` on non-finite input, and
/// `MathError::Singular` if the benchmark has zero variance.
pub fn regress(
    y: ArrayView1<'_, f64>,
    benchmark: ArrayView1<'_, f64>,
) -> Result<RegressionFit, MathError> {
    let n = y.len();
    if benchmark.len() != n {
        return Err(MathError::DimensionMismatch { expected: n, actual: benchmark.len() });
    }
    if n < MIN_OBSERVATIONS {
        return Err(MathError::InsufficientData { required: MIN_OBSERVATIONS, actual: n });
    }
    if y.iter().chain(benchmark.iter()).any(|v| !v.is_finite()) {
        return Err(MathError::NumericalInstability("non-finite regression input".to_string()));
    }
    if benchmark.iter().all(|&v| v == benchmark[0]) {
        return Err(MathError::Singular("benchmark has zero variance".to_string()));
    }

    let mut design: Array2<f64> = Array2::ones((n, 2));
    design.column_mut(1).assign(&benchmark);

    let ols = ordinary_least_squares(y, design.view())?;
    let adjusted_r_squared = if n > 2 {
        1.0 - (1.0 - ols.r_squared) * (n - 1) as f64 / (n - 2) as f64
    } else {
        f64::NAN
    };
    let residual_variance = sample_variance(ols.residuals.view())?;

    Ok(RegressionFit {
        alpha: ols.coefficients[0],
        beta: ols.coefficients[1],
        r_squared: ols.r_squared,
        adjusted_r_squared,
        residuals: ols.residuals,
        residual_variance,
    })
}

/// Solve a linear system Ax = b using Gaussian elimination with partial pivoting.
fn solve_linear_system(a: &Array2<f64>, b: &Array1<f64>) -> Result<Array1<f64>, MathError> {
    let n = a.nrows();
    if n == 0 {
        return Err(MathError::EmptyData);
    }
    if a.ncols() != n {
        return Err(MathError::LinearAlgebra("matrix must be square".to_string()));
    }
    if b.len() != n {
        return Err(MathError::DimensionMismatch { expected: n, actual: b.len() });
    }

    // Augmented matrix [A | b]
    let mut aug: Array2<f64> = Array2::zeros((n, n + 1));
    aug.slice_mut(ndarray::s![.., ..n]).assign(a);
    aug.column_mut(n).assign(b);

    for col in 0..n {
        let max_row = (col..n)
            .max_by(|&i, &j| aug[[i, col]].abs().total_cmp(&aug[[j, col]].abs()))
            .unwrap_or(col);
        let max_val: f64 = aug[[max_row, col]];

        if max_val.abs() < 1e-14 {
            return Err(MathError::Singular("matrix is singular or nearly singular".to_string()));
        }

        if max_row != col {
            for j in 0..=n {
                aug.swap([col, j], [max_row, j]);
            }
        }

        for row in (col + 1)..n {
            let factor = aug[[row, col]] / aug[[col, col]];
            for j in col..=n {
                aug[[row, j]] -= factor * aug[[col, j]];
            }
        }
    }

    // Back substitution
    let mut x = Array1::zeros(n);
    for i in (0..n).rev() {
        let mut sum = aug[[i, n]];
        for j in (i + 1)..n {
            sum -= aug[[i, j]] * x[j];
        }
        x[i] = sum / aug[[i, i]];
    }

    Ok(x)
}
