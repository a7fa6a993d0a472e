//! Empirical quantiles and tail averages.

use ndarray::ArrayView1;

use crate::MathError;

/// Empirical percentile with linear interpolation between order statistics.
///
/// # Arguments
/// * `data` - Input series
/// * `q` - Probability in `[0, 1]` (e.g. 0.05 for the 5th percentile)
///
/// # Errors
/// Returns `MathError::InvalidPercentile` if `q` is outside `[0, 1]`,
/// `MathError::EmptyData` for an empty series, and
/// `MathError::NumericalInstability` if any value is non-finite.
pub fn percentile(data: ArrayView1<'_, f64>, q: f64) -> Result<f64, MathError> {
    if !(0.0..=1.0).contains(&q) {
        return Err(MathError::InvalidPercentile(q));
    }
    if data.is_empty() {
        return Err(MathError::EmptyData);
    }
    if data.iter().any(|x| !x.is_finite()) {
        return Err(MathError::NumericalInstability("non-finite value in series".to_string()));
    }

    let mut sorted = data.to_vec();
    sorted.sort_by(f64::total_cmp);

    let rank = q * (sorted.len() - 1) as f64;
    let lower = rank.floor() as usize;
    let upper = rank.ceil() as usize;
    let frac = rank - lower as f64;

    Ok(sorted[lower] + (sorted[upper] - sorted[lower]) * frac)
}

/// Mean of the observations at or below the `q` percentile.
///
/// This is the empirical conditional value-at-risk of a return series when
/// `q` is the tail probability (0.05 for CVaR 95%).
///
/// # Errors
/// Same conditions as [`percentile`].
pub fn tail_mean(data: ArrayView1<'_, f64>, q: f64) -> Result<f64, MathError> {
    let threshold = percentile(data, q)?;
    let (sum, count) = data
        .iter()
        .filter(|&&x| x <= threshold)
        .fold((0.0, 0usize), |(sum, count), &x| (sum + x, count + 1));
    // The minimum is always at or below any percentile, so `count >= 1`.
    Ok(sum / count as f64)
}
