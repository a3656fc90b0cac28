//! Sample statistics and normal-approximation confidence intervals.

use super::types::ConfidenceInterval;

use statrs::distribution::{ContinuousCDF, Normal};
use statrs::statistics::Statistics;

/// Errors raised by the statistics helpers
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum StatsError {
    #[error("Cannot compute statistics of an empty series")]
    EmptySeries,

    #[error("Confidence level must lie strictly between 0 and 1, got {0}")]
    InvalidConfidence(f64),

    #[error("Probability must lie strictly between 0 and 1, got {0}")]
    InvalidProbability(f64),

    #[error("Invalid normal distribution: {0}")]
    Distribution(String),
}

/// Confidence level used when none is configured
pub const DEFAULT_CONFIDENCE: f64 = 0.95;

/// Mean and sample standard deviation (n - 1 divisor).
///
/// A single value yields a NaN standard deviation.
pub fn mean_std(data: &[f64]) -> Result<(f64, f64), StatsError> {
    if data.is_empty() {
        return Err(StatsError::EmptySeries);
    }
    Ok((data.mean(), data.std_dev()))
}

/// Two-sided normal confidence interval around the sample mean.
///
/// The half-width is `z * std / sqrt(n)` with `z` the standard normal quantile
/// of `(1 + confidence) / 2`. A series of one value has an undefined spread, so
/// its half-width is NaN.
pub fn mean_confidence_interval(
    data: &[f64],
    confidence: f64,
) -> Result<ConfidenceInterval, StatsError> {
    if !(confidence > 0.0 && confidence < 1.0) {
        return Err(StatsError::InvalidConfidence(confidence));
    }
    let (mean, std) = mean_std(data)?;
    let z = normal_quantile((1.0 + confidence) / 2.0)?;
    let standard_error = std / (data.len() as f64).sqrt();

    // zero spread stays exactly zero
    let half_width = if standard_error == 0.0 { 0.0 } else { z * standard_error };

    Ok(ConfidenceInterval { mean, half_width })
}

/// Inverse of the standard normal CDF
pub fn normal_quantile(p: f64) -> Result<f64, StatsError> {
    if !(p > 0.0 && p < 1.0) {
        return Err(StatsError::InvalidProbability(p));
    }
    let standard =
        Normal::new(0.0, 1.0).map_err(|e| StatsError::Distribution(e.to_string()))?;
    Ok(standard.inverse_cdf(p))
}
