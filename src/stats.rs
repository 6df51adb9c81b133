//! Descriptive statistics and Pearson correlation over plain slices.

use serde::{Deserialize, Serialize};

use crate::error::{PlacesError, Result};

/// Summary of one measure's values
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Summary {
    pub count: usize,
    pub mean: f64,
    pub min: f64,
    pub max: f64,
    /// Sample standard deviation (n - 1); NaN for a single value
    pub std_dev: f64,
}

/// Arithmetic mean; NaN for an empty slice
pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return f64::NAN;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Summarize a non-empty series
pub fn summarize(values: &[f64]) -> Result<Summary> {
    if values.is_empty() {
        return Err(PlacesError::InsufficientData {
            message: "cannot summarize an empty series".to_string(),
        });
    }

    let mean = mean(values);
    let min = values.iter().copied().fold(f64::INFINITY, f64::min);
    let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let std_dev = if values.len() > 1 {
        let ss: f64 = values.iter().map(|v| (v - mean) * (v - mean)).sum();
        (ss / (values.len() - 1) as f64).sqrt()
    } else {
        f64::NAN
    };

    Ok(Summary {
        count: values.len(),
        mean,
        min,
        max,
        std_dev,
    })
}

/// Pearson correlation coefficient of two paired series
///
/// `names` label the two series in error messages. Fails with
/// [`PlacesError::InsufficientData`] below two pairs and with
/// [`PlacesError::ZeroVariance`] when either series is constant.
pub fn pearson(x: &[f64], y: &[f64], names: (&str, &str)) -> Result<f64> {
    if x.len() != y.len() {
        return Err(PlacesError::InvalidParameter {
            param: "series".to_string(),
            message: format!("length mismatch: {} vs {}", x.len(), y.len()),
        });
    }

    if x.len() < 2 {
        return Err(PlacesError::InsufficientData {
            message: format!(
                "correlation of {} and {} needs at least 2 paired observations, found {}",
                names.0,
                names.1,
                x.len()
            ),
        });
    }

    // Rounded means leave tiny residuals, so test the values themselves
    if is_constant(x) {
        return Err(PlacesError::ZeroVariance {
            measure: names.0.to_string(),
        });
    }
    if is_constant(y) {
        return Err(PlacesError::ZeroVariance {
            measure: names.1.to_string(),
        });
    }

    let x_mean = mean(x);
    let y_mean = mean(y);

    let mut x_variance = 0.0;
    let mut y_variance = 0.0;
    let mut covariance = 0.0;

    for (xi, yi) in x.iter().zip(y) {
        let x_diff = xi - x_mean;
        let y_diff = yi - y_mean;

        x_variance += x_diff * x_diff;
        y_variance += y_diff * y_diff;
        covariance += x_diff * y_diff;
    }

    let correlation = covariance / (x_variance.sqrt() * y_variance.sqrt());

    // Rounding can push |r| a hair past 1
    Ok(correlation.clamp(-1.0, 1.0))
}

fn is_constant(values: &[f64]) -> bool {
    values.iter().all(|v| *v == values[0])
}
