//! Sample statistics over periods x assets return matrices.

use ndarray::{Array1, Array2, ArrayView1, Axis};

use crate::MathError;

/// Minimum number of periods for a sample covariance.
const MIN_PERIODS: usize = 2;

/// Arithmetic mean of a series.
///
/// # Errors
/// Returns `MathError::EmptyData` for an empty series.
pub fn mean(data: ArrayView1<'_, f64>) -> Result<f64, MathError> {
    data.mean().ok_or(MathError::EmptyData)
}

/// Sample variance (divisor `n - 1`) of a series.
///
/// # Errors
/// Returns `MathError::InsufficientData` with fewer than two observations.
pub fn sample_variance(data: ArrayView1<'_, f64>) -> Result<f64, MathError> {
    let n = data.len();
    if n < MIN_PERIODS {
        return Err(MathError::InsufficientData { required: MIN_PERIODS, actual: n });
    }
    let mu = data.sum() / n as f64;
    Ok(data.iter().map(|x| (x - mu).powi(2)).sum::<f64>() / (n - 1) as f64)
}

/// Sample standard deviation (divisor `n - 1`) of a series.
///
/// # Errors
/// Returns `MathError::InsufficientData` with fewer than two observations.
pub fn sample_std(data: ArrayView1<'_, f64>) -> Result<f64, MathError> {
    sample_variance(data).map(f64::sqrt)
}

/// Per-asset arithmetic mean over all periods.
///
/// # Errors
/// Returns `MathError` if there are fewer than two periods or any value is
/// non-finite.
pub fn mean_vector(returns: &Array2<f64>) -> Result<Array1<f64>, MathError> {
    validate(returns)?;
    returns.mean_axis(Axis(0)).ok_or(MathError::EmptyData)
}

/// Sample covariance matrix (divisor `T - 1`), assets x assets.
///
/// # Errors
/// Returns `MathError` if there are fewer than two periods or any value is
/// non-finite.
pub fn covariance_matrix(returns: &Array2<f64>) -> Result<Array2<f64>, MathError> {
    validate(returns)?;
    let t = returns.nrows();
    let means = returns.mean_axis(Axis(0)).ok_or(MathError::EmptyData)?;
    let centered = returns - &means;
    let cov = centered.t().dot(&centered) / (t - 1) as f64;
    // Force exact symmetry.
    Ok((&cov + &cov.t()) * 0.5)
}

/// Sample covariance of `min(return, threshold)`, capturing downside
/// co-movement only.
///
/// # Errors
/// Returns `MathError` if there are fewer than two periods or any value is
/// non-finite.
pub fn semi_covariance_matrix(
    returns: &Array2<f64>,
    threshold: f64,
) -> Result<Array2<f64>, MathError> {
    if !threshold.is_finite() {
        return Err(MathError::NumericalInstability(format!("threshold {threshold}")));
    }
    validate(returns)?;
    covariance_matrix(&returns.mapv(|r| r.min(threshold)))
}

fn validate(returns: &Array2<f64>) -> Result<(), MathError> {
    if returns.ncols() == 0 {
        return Err(MathError::EmptyData);
    }
    if returns.nrows() < MIN_PERIODS {
        return Err(MathError::InsufficientData { required: MIN_PERIODS, actual: returns.nrows() });
    }
    if let Some(((t, j), v)) = returns.indexed_iter().find(|(_, v)| !v.is_finite()) {
        return Err(MathError::NumericalInstability(format!(
            "non-finite return {v} at period {t}, asset {j}"
        )));
    }
    Ok(())
}
