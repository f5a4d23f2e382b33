use ndarray::{Array1, Array2, Axis, Zip};
use ndarray_rand::rand_distr::StandardNormal;
use ndarray_rand::RandomExt;
use rand::rngs::StdRng;

use crate::core::activations::Activation;
use crate::error::Result;

/// A single fully-connected layer: a weight matrix of shape
/// `size x previous_layer_size`, a bias vector of length `size` and an
/// activation function.
///
/// A freshly constructed layer carries empty parameters; it must be
/// initialized either randomly ([`Layer::initialize`]) or from stored
/// values ([`Layer::set_parameters`]) before any forward or backward use.
#[derive(Debug, Clone)]
pub struct Layer {
    size: usize,
    activation: Activation,
    bias: Array1<f64>,
    weight: Array2<f64>,
}

impl Layer {
    pub fn new(size: usize, activation: Activation) -> Self {
        Self {
            size,
            activation,
            bias: Array1::zeros(0),
            weight: Array2::zeros((0, 0)),
        }
    }

    /// Draws random initial parameters from the shared RNG.
    ///
    /// Bias entries are standard normal draws; weight entries are standard
    /// normal draws divided by `sqrt(previous_layer_size)`. The bias is
    /// drawn before the weight, which fixes the draw order under a seeded
    /// RNG.
    pub fn initialize(&mut self, previous_layer_size: usize, rng: &mut StdRng) {
        self.bias = Array1::random_using(self.size, StandardNormal, rng);
        self.weight = Array2::random_using((self.size, previous_layer_size), StandardNormal, rng)
            / (previous_layer_size as f64).sqrt();
    }

    /// Installs externally supplied parameters, bypassing random
    /// initialization. Used when restoring a network from a file.
    pub fn set_parameters(&mut self, bias: Array1<f64>, weight: Array2<f64>) {
        self.bias = bias;
        self.weight = weight;
    }

    pub fn size(&self) -> usize {
        self.size
    }

    pub fn activation(&self) -> Activation {
        self.activation
    }

    pub fn bias(&self) -> &Array1<f64> {
        &self.bias
    }

    pub fn weight(&self) -> &Array2<f64> {
        &self.weight
    }

    /// `a = activation(W*x + b)`
    pub fn feed_forward(&self, x: &Array1<f64>) -> Array1<f64> {
        self.activation.calculate(&(self.weight.dot(x) + &self.bias))
    }

    /// Same as [`Layer::feed_forward`] but also returns the weighted input
    /// `z = W*x + b`, which backpropagation needs.
    pub fn feed_forward_train(&self, x: &Array1<f64>) -> (Array1<f64>, Array1<f64>) {
        let z = self.weight.dot(x) + &self.bias;
        let a = self.activation.calculate(&z);
        (a, z)
    }

    /// Per-layer step of reverse-mode differentiation.
    ///
    /// Given the error `delta_next` propagated from the layer above, the
    /// activation `a_prev` of the layer below and this layer's weighted
    /// input `z`, returns `(nabla_b, nabla_w, delta_out)` where
    /// `delta = delta_next .* sigma'(z)`, `nabla_w = delta * a_prev^T`,
    /// `nabla_b = delta` and `delta_out = W^T * delta`.
    pub fn feed_backward(
        &self,
        delta_next: &Array1<f64>,
        a_prev: &Array1<f64>,
        z: &Array1<f64>,
    ) -> Result<(Array1<f64>, Array2<f64>, Array1<f64>)> {
        let sigma_derivative = self.activation.calculate_derivative(z)?;
        let delta = delta_next * &sigma_derivative;

        let nabla_w = delta
            .view()
            .insert_axis(Axis(1))
            .dot(&a_prev.view().insert_axis(Axis(0)));
        let delta_out = self.weight.t().dot(&delta);

        Ok((delta, nabla_w, delta_out))
    }

    /// Additive parameter update; both ratios arrive pre-negated from the
    /// caller, so plain gradient descent is expressed as an addition.
    /// The regularization ratio decays the weights only, never the bias.
    pub fn update_bias_weight(
        &mut self,
        nabla_b: &Array1<f64>,
        nabla_w: &Array2<f64>,
        learning_rate_ratio: f64,
        regularization_ratio: f64,
    ) {
        Zip::from(&mut self.bias)
            .and(nabla_b)
            .for_each(|b, &nb| *b += learning_rate_ratio * nb);
        Zip::from(&mut self.weight)
            .and(nabla_w)
            .for_each(|w, &nw| *w += learning_rate_ratio * nw + regularization_ratio * *w);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use ndarray::array;
    use rand::SeedableRng;

    fn fixed_layer() -> Layer {
        let mut layer = Layer::new(2, Activation::Logistic);
        layer.set_parameters(array![0.1, -0.2], array![[0.5, -1.0, 0.25], [2.0, 0.0, -0.5]]);
        layer
    }

    #[test]
    fn feed_forward_is_activation_of_affine_transform() {
        let layer = fixed_layer();
        let x = array![1.0, 2.0, -1.0];
        let a = layer.feed_forward(&x);
        let z = layer.weight().dot(&x) + layer.bias();
        let expected = Activation::Logistic.calculate(&z);
        for (&ai, &ei) in a.iter().zip(expected.iter()) {
            assert_relative_eq!(ai, ei);
        }

        let (a_train, z_train) = layer.feed_forward_train(&x);
        assert_eq!(a_train, a);
        assert_eq!(z_train, z);
    }

    #[test]
    fn initialize_draws_bias_then_scaled_weights() {
        let mut rng = StdRng::seed_from_u64(7);
        let mut layer = Layer::new(4, Activation::Logistic);
        layer.initialize(9, &mut rng);

        // Same seed, same draw order: bias first, then weight / sqrt(prev).
        let mut reference = StdRng::seed_from_u64(7);
        let bias: Array1<f64> = Array1::random_using(4, StandardNormal, &mut reference);
        let weight: Array2<f64> =
            Array2::random_using((4, 9), StandardNormal, &mut reference) / 3.0;
        assert_eq!(layer.bias(), &bias);
        assert_eq!(layer.weight(), &weight);
    }

    #[test]
    fn feed_backward_known_values() {
        let layer = fixed_layer();
        let a_prev = array![1.0, -1.0, 0.5];
        let z = array![0.0, 1.0];
        let delta_next = array![2.0, -1.0];

        let (nabla_b, nabla_w, delta_out) =
            layer.feed_backward(&delta_next, &a_prev, &z).unwrap();

        let sigma_derivative = Activation::Logistic.calculate_derivative(&z).unwrap();
        let delta = array![2.0 * sigma_derivative[0], -sigma_derivative[1]];
        for (&nb, &d) in nabla_b.iter().zip(delta.iter()) {
            assert_relative_eq!(nb, d);
        }
        for i in 0..2 {
            for j in 0..3 {
                assert_relative_eq!(nabla_w[[i, j]], delta[i] * a_prev[j]);
            }
        }
        let expected_out = layer.weight().t().dot(&delta);
        for (&d, &e) in delta_out.iter().zip(expected_out.iter()) {
            assert_relative_eq!(d, e);
        }
    }

    #[test]
    fn update_regularizes_weights_but_not_bias() {
        let mut layer = fixed_layer();
        let bias_before = layer.bias().clone();
        let weight_before = layer.weight().clone();
        let nabla_b = array![1.0, -2.0];
        let nabla_w = Array2::ones((2, 3));

        layer.update_bias_weight(&nabla_b, &nabla_w, -0.1, -0.01);

        for ((&b, &b0), &nb) in layer.bias().iter().zip(bias_before.iter()).zip(nabla_b.iter()) {
            assert_relative_eq!(b, b0 + (-0.1) * nb);
        }
        for (&w, &w0) in layer.weight().iter().zip(weight_before.iter()) {
            assert_relative_eq!(w, w0 + (-0.1) * 1.0 + (-0.01) * w0);
        }
    }
}
