use std::fmt;
use std::marker::PhantomData;

use ndarray::{Array1, Array2};
use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::core::layers::Layer;
use crate::core::losses::CostFunction;
use crate::core::optimizers::Optimizer;
use crate::data::{DataLabelPair, DataLabelSet};
use crate::error::{NetworkError, Result};
use crate::utils::{argmax, one_hot};

/// Fixed RNG seed for reproducible runs (unless true randomness is
/// requested at construction).
const DETERMINISTIC_SEED: u64 = 17_111_993;

/// Label type a network predicts: a class index obtained by argmax when
/// the output layer has more than one neuron, or the scalar output itself.
pub trait Prediction: Copy + PartialEq + fmt::Display {
    fn from_index(index: usize) -> Self;
    fn from_scalar(value: f64) -> Self;
}

impl Prediction for usize {
    fn from_index(index: usize) -> Self {
        index
    }

    fn from_scalar(value: f64) -> Self {
        value as usize
    }
}

impl Prediction for f64 {
    fn from_index(index: usize) -> Self {
        index as f64
    }

    fn from_scalar(value: f64) -> Self {
        value
    }
}

/// Fully-connected feedforward network trained with backpropagation.
///
/// Layers are stored nearest-input first; the first layer's weight matrix
/// has `input_size` columns and every later layer's column count equals the
/// previous layer's neuron count. The last layer's size defines the label
/// space.
#[derive(Debug)]
pub struct Network<P: Prediction> {
    input_size: usize,
    layers: Vec<Layer>,
    cost_function: CostFunction,
    optimizer: Optimizer,
    rng: StdRng,

    // Per-epoch training history, appended in epoch order by `train`.
    pub training_cost: Vec<f64>,
    pub training_accuracy: Vec<f64>,
    pub evaluation_cost: Vec<f64>,
    pub evaluation_accuracy: Vec<f64>,

    prediction: PhantomData<P>,
}

impl<P: Prediction> Network<P> {
    pub fn new(
        input_size: usize,
        cost_function: CostFunction,
        optimizer: Optimizer,
        true_random: bool,
    ) -> Self {
        let rng = if true_random {
            StdRng::from_entropy()
        } else {
            StdRng::seed_from_u64(DETERMINISTIC_SEED)
        };
        Self {
            input_size,
            layers: Vec::new(),
            cost_function,
            optimizer,
            rng,
            training_cost: Vec::new(),
            training_accuracy: Vec::new(),
            evaluation_cost: Vec::new(),
            evaluation_accuracy: Vec::new(),
            prediction: PhantomData,
        }
    }

    pub fn input_size(&self) -> usize {
        self.input_size
    }

    pub fn cost_function(&self) -> CostFunction {
        self.cost_function
    }

    pub fn optimizer(&self) -> Optimizer {
        self.optimizer
    }

    pub fn layers(&self) -> &[Layer] {
        &self.layers
    }

    pub fn number_of_layers(&self) -> usize {
        self.layers.len()
    }

    /// Initializes the layer against the running previous-layer size (the
    /// network input size for the first layer) using the shared RNG, then
    /// appends it. Returns `&mut Self` for fluent chaining.
    pub fn add_layer(&mut self, mut layer: Layer) -> &mut Self {
        let previous_layer_size = match self.layers.last() {
            Some(previous) => previous.size(),
            None => self.input_size,
        };
        layer.initialize(previous_layer_size, &mut self.rng);
        self.layers.push(layer);
        self
    }

    /// Appends a layer whose parameters were set externally (load path).
    pub(crate) fn add_initialized_layer(&mut self, layer: Layer) -> &mut Self {
        self.layers.push(layer);
        self
    }

    /// Prints the layer sizes, input to output.
    pub fn print_layers(&self) {
        if self.layers.is_empty() {
            println!("The neural network is empty.");
            return;
        }
        println!("The neural network has {} layers:", self.number_of_layers());
        println!("    Input : {} neurons", self.input_size);
        for (index, layer) in self.layers.iter().enumerate().take(self.layers.len() - 1) {
            println!("\t{} : {} neurons", index, layer.size());
        }
        if let Some(output) = self.layers.last() {
            println!("   Output : {} neurons\n", output.size());
        }
    }

    /// Runs the input through every layer in order and converts the final
    /// activation vector to a prediction.
    pub fn predict(&self, x: &Array1<f64>) -> P {
        Self::output_to_prediction(&self.feed_forward(x))
    }

    /// Counts exact prediction matches and accumulates the total cost over
    /// the data set (not normalized by its length), plus an L2 weight
    /// penalty `(lambda/2) * sum of squared Frobenius norms`.
    pub fn calc_accuracy_and_cost(&self, data: &[DataLabelPair], lambda: f64) -> (usize, f64) {
        let mut correct = 0;
        let mut cost = 0.0;

        for (x, label) in data {
            let predicted_output = self.feed_forward(x);
            let prediction = Self::output_to_prediction(&predicted_output);
            let expected = Self::output_to_prediction(label);
            if prediction == expected {
                correct += 1;
            }
            let expected_output = self.label_to_output(label);
            cost += self.cost_function.calculate(&predicted_output, &expected_output);
        }

        let weight_norms: f64 = self
            .layers
            .iter()
            .map(|layer| layer.weight().mapv(|w| w * w).sum())
            .sum();
        cost += (lambda / 2.0) * weight_norms;

        (correct, cost)
    }

    /// Trains the network with mini-batch gradient descent.
    ///
    /// `n_batches = training.len() / batch_size` by integer division;
    /// remainder examples are silently excluded each epoch. After every
    /// epoch the accuracy and per-example cost of both sets are appended
    /// to the four history vectors. With `verbose` set, a per-epoch report
    /// is printed.
    #[allow(clippy::too_many_arguments)]
    pub fn train(
        &mut self,
        training: &mut DataLabelSet,
        evaluation: &[DataLabelPair],
        n_epochs: usize,
        batch_size: usize,
        eta: f64,
        lambda: f64,
        verbose: bool,
    ) -> Result<()> {
        let output_layer = self.layers.last().ok_or(NetworkError::EmptyNetwork)?;
        let first = training.first().ok_or_else(|| {
            NetworkError::ShapeMismatch("training set is empty".to_string())
        })?;
        if first.0.len() != self.input_size {
            return Err(NetworkError::ShapeMismatch(format!(
                "input layer size ({}) is inconsistent with training input data size ({})",
                self.input_size,
                first.0.len()
            )));
        }
        if first.1.len() != output_layer.size() {
            return Err(NetworkError::ShapeMismatch(format!(
                "output layer size ({}) is inconsistent with training output data size ({})",
                output_layer.size(),
                first.1.len()
            )));
        }

        let n_training = training.len();
        let n_evaluation = evaluation.len();
        let n_batches = n_training / batch_size;
        // Pre-negated ratios: the per-layer update is purely additive.
        let learning_rate_ratio = -eta / batch_size as f64;
        let regularization_ratio = -eta * lambda / n_training as f64;

        self.training_cost.reserve(n_epochs);
        self.training_accuracy.reserve(n_epochs);
        self.evaluation_cost.reserve(n_epochs);
        self.evaluation_accuracy.reserve(n_epochs);

        let optimizer = self.optimizer;
        let cost_function = self.cost_function;

        for epoch in 0..n_epochs {
            {
                let layers = &mut self.layers;
                let rng = &mut self.rng;
                let mut update = |batch: &[DataLabelPair], lr: f64, rr: f64| {
                    update_parameters(layers, cost_function, batch, lr, rr)
                };
                optimizer.optimize(
                    training,
                    n_batches,
                    batch_size,
                    learning_rate_ratio,
                    regularization_ratio,
                    rng,
                    &mut update,
                )?;
            }

            let (n_training_success, mut training_cost) =
                self.calc_accuracy_and_cost(training, 0.0);
            let (n_evaluation_success, mut evaluation_cost) =
                self.calc_accuracy_and_cost(evaluation, 0.0);
            training_cost /= n_training as f64;
            evaluation_cost /= n_evaluation as f64;

            if verbose {
                println!(
                    "Epoch # {} of training is complete:\n\
                     \tCost on training data: {}\n\
                     \tAccuracy on training data: {} / {}\n\
                     \tCost on evaluation data: {}\n\
                     \tAccuracy on evaluation data: {} / {}",
                    epoch,
                    training_cost,
                    n_training_success,
                    n_training,
                    evaluation_cost,
                    n_evaluation_success,
                    n_evaluation
                );
            }

            self.training_cost.push(training_cost);
            self.training_accuracy.push(n_training_success as f64 / n_training as f64);
            self.evaluation_cost.push(evaluation_cost);
            self.evaluation_accuracy.push(n_evaluation_success as f64 / n_evaluation as f64);
        }

        Ok(())
    }

    fn feed_forward(&self, x: &Array1<f64>) -> Array1<f64> {
        let mut a = x.clone();
        for layer in &self.layers {
            a = layer.feed_forward(&a);
        }
        a
    }

    fn output_to_prediction(output: &Array1<f64>) -> P {
        if output.len() > 1 {
            P::from_index(argmax(output))
        } else {
            P::from_scalar(output[0])
        }
    }

    /// Mirrors prediction conversion on the target side: vector labels are
    /// used as-is, scalar labels are promoted to a one-hot vector sized to
    /// the output layer.
    fn label_to_output(&self, label: &Array1<f64>) -> Array1<f64> {
        if label.len() > 1 {
            label.clone()
        } else {
            let output_size = self.layers.last().map_or(0, Layer::size);
            one_hot(label[0] as usize, output_size)
        }
    }
}

/// Accumulates per-example gradients over the batch, then applies one
/// update per layer with the summed (not averaged) nablas; the averaging is
/// folded into the learning-rate ratio.
fn update_parameters(
    layers: &mut [Layer],
    cost_function: CostFunction,
    batch: &[DataLabelPair],
    learning_rate_ratio: f64,
    regularization_ratio: f64,
) -> Result<()> {
    let mut nabla_b: Vec<Array1<f64>> = layers
        .iter()
        .map(|layer| Array1::zeros(layer.bias().len()))
        .collect();
    let mut nabla_w: Vec<Array2<f64>> = layers
        .iter()
        .map(|layer| Array2::zeros(layer.weight().raw_dim()))
        .collect();

    for (x, y) in batch {
        let (delta_nabla_b, delta_nabla_w) = back_propagate(layers, cost_function, x, y)?;
        for (acc, delta) in nabla_b.iter_mut().zip(&delta_nabla_b) {
            *acc += delta;
        }
        for (acc, delta) in nabla_w.iter_mut().zip(&delta_nabla_w) {
            *acc += delta;
        }
    }

    for ((layer, nb), nw) in layers.iter_mut().zip(&nabla_b).zip(&nabla_w) {
        layer.update_bias_weight(nb, nw, learning_rate_ratio, regularization_ratio);
    }

    Ok(())
}

/// Full-network backpropagation for a single example: forward pass caching
/// every weighted input and activation (the input itself is activation 0),
/// initial delta from the cost derivative at the final activation, then a
/// backward sweep threading each layer's `feed_backward`.
fn back_propagate(
    layers: &[Layer],
    cost_function: CostFunction,
    x: &Array1<f64>,
    y: &Array1<f64>,
) -> Result<(Vec<Array1<f64>>, Vec<Array2<f64>>)> {
    let n_layers = layers.len();
    let mut zs = Vec::with_capacity(n_layers);
    let mut activations = Vec::with_capacity(n_layers);

    let mut a = x.clone();
    for layer in layers {
        let (a_next, z) = layer.feed_forward_train(&a);
        activations.push(a);
        zs.push(z);
        a = a_next;
    }

    let mut delta = cost_function.calculate_derivative(&a, y);

    let mut delta_nabla_b = Vec::with_capacity(n_layers);
    let mut delta_nabla_w = Vec::with_capacity(n_layers);
    for (layer, (a_prev, z)) in layers.iter().zip(activations.iter().zip(&zs)).rev() {
        let (nabla_b, nabla_w, delta_out) = layer.feed_backward(&delta, a_prev, z)?;
        delta_nabla_b.push(nabla_b);
        delta_nabla_w.push(nabla_w);
        delta = delta_out;
    }
    delta_nabla_b.reverse();
    delta_nabla_w.reverse();

    Ok((delta_nabla_b, delta_nabla_w))
}
