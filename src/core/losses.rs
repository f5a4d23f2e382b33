use ndarray::Array1;

use crate::error::{NetworkError, Result};

/// Closed set of network cost functions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CostFunction {
    Quadratic,
    CrossEntropy,
}

impl CostFunction {
    /// Name under which the function is stored in a parameter file.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Quadratic => "quadratic",
            Self::CrossEntropy => "crossentropy",
        }
    }

    /// Resolves a stored name back to its variant.
    pub fn from_name(name: &str) -> Result<Self> {
        match name {
            "quadratic" => Ok(Self::Quadratic),
            "crossentropy" => Ok(Self::CrossEntropy),
            _ => Err(NetworkError::UnknownCostFunction(name.to_string())),
        }
    }

    /// Scalar cost of an actual output against its target.
    pub fn calculate(&self, actual: &Array1<f64>, target: &Array1<f64>) -> f64 {
        match self {
            // 0.5 * ||t - a||^2
            Self::Quadratic => 0.5 * (target - actual).mapv(|d| d * d).sum(),
            // sum of -t*ln(a) - (1-t)*ln(1-a), with non-finite terms
            // (from ln(0)) zeroed before summation
            Self::CrossEntropy => actual
                .iter()
                .zip(target.iter())
                .map(|(&a, &t)| {
                    let term = -t * a.ln() - (1.0 - t) * (1.0 - a).ln();
                    if term.is_finite() {
                        term
                    } else {
                        0.0
                    }
                })
                .sum(),
        }
    }

    /// Derivative of the cost with respect to the actual output.
    pub fn calculate_derivative(&self, actual: &Array1<f64>, target: &Array1<f64>) -> Array1<f64> {
        match self {
            // a - t
            Self::Quadratic => actual - target,
            // (a - t) / (a * (1 - a))
            Self::CrossEntropy => {
                let mut derivative = actual - target;
                derivative
                    .iter_mut()
                    .zip(actual.iter())
                    .for_each(|(d, &a)| *d /= a * (1.0 - a));
                derivative
            }
        }
    }
}
