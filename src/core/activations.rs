use ndarray::Array1;

use crate::error::{NetworkError, Result};

/// Closed set of per-layer activation functions.
///
/// The variants carry no state, so a single value can be shared freely
/// between any number of layers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Activation {
    Logistic,
    Softmax,
}

impl Activation {
    /// Name under which the function is stored in a parameter file.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Logistic => "logistic",
            Self::Softmax => "softmax",
        }
    }

    /// Resolves a stored name back to its variant.
    pub fn from_name(name: &str) -> Result<Self> {
        match name {
            "logistic" => Ok(Self::Logistic),
            "softmax" => Ok(Self::Softmax),
            _ => Err(NetworkError::UnknownActivationFunction(name.to_string())),
        }
    }

    /// Applies the activation to a weighted-input vector.
    pub fn calculate(&self, z: &Array1<f64>) -> Array1<f64> {
        match self {
            Self::Logistic => logistic_forward(z),
            Self::Softmax => softmax_forward(z),
        }
    }

    /// Elementwise derivative with respect to the weighted input.
    ///
    /// The softmax derivative is a full Jacobian matrix and stays
    /// unimplemented; requesting it is a configuration error.
    pub fn calculate_derivative(&self, z: &Array1<f64>) -> Result<Array1<f64>> {
        match self {
            Self::Logistic => Ok(logistic_backward(z)),
            Self::Softmax => Err(NetworkError::UnimplementedDerivative("softmax")),
        }
    }
}

fn logistic_forward(z: &Array1<f64>) -> Array1<f64> {
    z.mapv(|z| 1.0 / (1.0 + (-z).exp()))
}

fn logistic_backward(z: &Array1<f64>) -> Array1<f64> {
    z.mapv(|z| {
        let f = 1.0 / (1.0 + (-z).exp());
        f * (1.0 - f)
    })
}

// Known limitation: no max-subtraction, so large-magnitude inputs can
// overflow or underflow the exponentials.
fn softmax_forward(z: &Array1<f64>) -> Array1<f64> {
    let exp = z.mapv(f64::exp);
    let sum = exp.sum();
    exp / sum
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use ndarray::array;

    #[test]
    fn logistic_matches_closed_form() {
        let z = array![-2.0, 0.0, 3.5];
        let a = Activation::Logistic.calculate(&z);
        for (&zi, &ai) in z.iter().zip(a.iter()) {
            assert_relative_eq!(ai, 1.0 / (1.0 + (-zi).exp()));
        }
    }

    #[test]
    fn logistic_derivative_is_f_times_one_minus_f() {
        let z = array![-4.0, -0.5, 0.0, 0.5, 4.0];
        let f = Activation::Logistic.calculate(&z);
        let df = Activation::Logistic.calculate_derivative(&z).unwrap();
        for (&fi, &dfi) in f.iter().zip(df.iter()) {
            assert_relative_eq!(dfi, fi * (1.0 - fi));
        }
    }

    #[test]
    fn softmax_sums_to_one() {
        let z = array![1.0, 2.0, 3.0, -1.0];
        let a = Activation::Softmax.calculate(&z);
        assert_relative_eq!(a.sum(), 1.0, max_relative = 1e-12);
        assert!(a.iter().all(|&x| x > 0.0));
    }

    #[test]
    fn softmax_derivative_is_unimplemented() {
        let z = array![0.1, 0.2];
        let err = Activation::Softmax.calculate_derivative(&z).unwrap_err();
        assert!(matches!(err, NetworkError::UnimplementedDerivative("softmax")));
    }

    #[test]
    fn names_round_trip() {
        for activation in [Activation::Logistic, Activation::Softmax] {
            assert_eq!(Activation::from_name(activation.name()).unwrap(), activation);
        }
    }

    #[test]
    fn unknown_name_is_rejected() {
        let err = Activation::from_name("relu").unwrap_err();
        assert!(matches!(err, NetworkError::UnknownActivationFunction(_)));
    }
}
