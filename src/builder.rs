use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;

use ndarray::{Array1, Array2};

use crate::core::activations::Activation;
use crate::core::layers::Layer;
use crate::core::losses::CostFunction;
use crate::core::optimizers::Optimizer;
use crate::error::{NetworkError, Result};
use crate::models::{Network, Prediction};

/// Fluent configuration for assembling a [`Network`], plus the save/load
/// routines for its flat text parameter format.
///
/// The file format is line oriented: line 1 holds
/// `input_size,cost_function_name`; every following group of three lines
/// describes one layer in order — bias vector, flattened weight matrix,
/// activation function name — all comma separated with no trailing comma.
#[derive(Debug, Clone)]
pub struct NetworkBuilder {
    input_size: usize,
    cost_function: CostFunction,
    optimizer: Optimizer,
    true_random: bool,
}

impl Default for NetworkBuilder {
    fn default() -> Self {
        Self {
            input_size: 0,
            cost_function: CostFunction::Quadratic,
            optimizer: Optimizer::Stochastic,
            true_random: false,
        }
    }
}

impl NetworkBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn input_size(mut self, input_size: usize) -> Self {
        self.input_size = input_size;
        self
    }

    pub fn cost_function(mut self, cost_function: CostFunction) -> Self {
        self.cost_function = cost_function;
        self
    }

    pub fn cost_function_name(mut self, name: &str) -> Result<Self> {
        self.cost_function = CostFunction::from_name(name)?;
        Ok(self)
    }

    pub fn optimizer(mut self, optimizer: Optimizer) -> Self {
        self.optimizer = optimizer;
        self
    }

    pub fn optimizer_name(mut self, name: &str) -> Result<Self> {
        self.optimizer = Optimizer::from_name(name)?;
        Ok(self)
    }

    /// Seeds the network RNG from the OS instead of the fixed seed.
    pub fn true_random(mut self, true_random: bool) -> Self {
        self.true_random = true_random;
        self
    }

    /// Builds an empty network (no layers yet).
    pub fn build<P: Prediction>(&self) -> Network<P> {
        Network::new(
            self.input_size,
            self.cost_function,
            self.optimizer,
            self.true_random,
        )
    }

    /// Produces an uninitialized layer; [`Network::add_layer`] initializes
    /// it against the preceding layer.
    pub fn create_layer(size: usize, activation: Activation) -> Layer {
        Layer::new(size, activation)
    }

    /// Writes the network parameters to `path`.
    ///
    /// Values are printed with Rust's shortest round-trip float formatting,
    /// so a save/load cycle reproduces every bias and weight bit for bit.
    pub fn save<P: Prediction>(network: &Network<P>, path: impl AsRef<Path>) -> Result<()> {
        let file = File::create(path)?;
        let mut writer = BufWriter::new(file);

        writeln!(
            writer,
            "{},{}",
            network.input_size(),
            network.cost_function().name()
        )?;
        for layer in network.layers() {
            writeln!(writer, "{}", join_values(layer.bias().iter()))?;
            writeln!(writer, "{}", join_values(layer.weight().iter()))?;
            writeln!(writer, "{}", layer.activation().name())?;
        }
        writer.flush()?;

        Ok(())
    }

    /// Reads a parameter file back into a network.
    ///
    /// The weight matrix is stored flattened with each neuron's incoming
    /// weights contiguous, so it reshapes to
    /// `bias_length x (value_count / bias_length)`. Any truncated layer
    /// group, unparsable number or inconsistent value count is an error;
    /// no partial network is ever returned.
    pub fn load<P: Prediction>(path: impl AsRef<Path>) -> Result<Network<P>> {
        let file = File::open(path)?;
        let reader = BufReader::new(file);
        let mut lines = reader.lines();

        let header = lines.next().ok_or_else(|| {
            NetworkError::MalformedParameterFile("missing header line".to_string())
        })??;
        let mut parts = header.splitn(2, ',');
        let input_size: usize = parts
            .next()
            .and_then(|cell| cell.parse().ok())
            .ok_or_else(|| {
                NetworkError::MalformedParameterFile(format!(
                    "header '{}' does not start with an input size",
                    header
                ))
            })?;
        let cost_name = parts.next().ok_or_else(|| {
            NetworkError::MalformedParameterFile(format!(
                "header '{}' is missing the cost function name",
                header
            ))
        })?;
        let cost_function = CostFunction::from_name(cost_name.trim())?;

        let mut network = NetworkBuilder::new()
            .input_size(input_size)
            .cost_function(cost_function)
            .build::<P>();

        while let Some(bias_line) = lines.next() {
            let bias_line = bias_line?;
            let weight_line = lines
                .next()
                .ok_or_else(|| {
                    NetworkError::MalformedParameterFile(
                        "layer group truncated: missing weight line".to_string(),
                    )
                })??;
            let activation_line = lines
                .next()
                .ok_or_else(|| {
                    NetworkError::MalformedParameterFile(
                        "layer group truncated: missing activation function line".to_string(),
                    )
                })??;

            let bias_values = parse_values(&bias_line)?;
            let weight_values = parse_values(&weight_line)?;
            if bias_values.is_empty() {
                return Err(NetworkError::MalformedParameterFile(
                    "empty bias line".to_string(),
                ));
            }
            if weight_values.len() % bias_values.len() != 0 {
                return Err(NetworkError::MalformedParameterFile(format!(
                    "weight count {} is not a multiple of the bias length {}",
                    weight_values.len(),
                    bias_values.len()
                )));
            }

            let size = bias_values.len();
            let columns = weight_values.len() / size;
            let weight = Array2::from_shape_vec((size, columns), weight_values)
                .map_err(|err| NetworkError::MalformedParameterFile(err.to_string()))?;
            let activation = Activation::from_name(activation_line.trim())?;

            let mut layer = Layer::new(size, activation);
            layer.set_parameters(Array1::from_vec(bias_values), weight);
            network.add_initialized_layer(layer);
        }

        Ok(network)
    }
}

fn join_values<'a>(values: impl Iterator<Item = &'a f64>) -> String {
    values
        .map(|value| value.to_string())
        .collect::<Vec<_>>()
        .join(",")
}

fn parse_values(line: &str) -> Result<Vec<f64>> {
    line.split(',')
        .map(|cell| {
            cell.trim().parse::<f64>().map_err(|_| {
                NetworkError::MalformedParameterFile(format!("'{}' is not a number", cell))
            })
        })
        .collect()
}
