use rand::rngs::StdRng;
use rand::seq::SliceRandom;

use crate::data::DataLabelPair;
use crate::error::{NetworkError, Result};

/// Batch update callback supplied by the network: receives one batch plus
/// the pre-negated learning-rate and regularization ratios.
pub type UpdateFn<'a> = dyn FnMut(&[DataLabelPair], f64, f64) -> Result<()> + 'a;

/// Closed set of training optimizers. The optimizer decides shuffling and
/// batching policy only; the parameter-update math stays with the network.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Optimizer {
    Stochastic,
}

impl Optimizer {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Stochastic => "stochastic",
        }
    }

    pub fn from_name(name: &str) -> Result<Self> {
        match name {
            "stochastic" => Ok(Self::Stochastic),
            _ => Err(NetworkError::UnknownOptimizer(name.to_string())),
        }
    }

    /// Runs one epoch of batch updates.
    ///
    /// Shuffles the training set in place with the shared RNG, then feeds
    /// `n_batches` contiguous non-overlapping windows of exactly
    /// `batch_size` examples to `update`, in shuffled order. Batches are
    /// borrowed slices, not copies. Examples beyond
    /// `n_batches * batch_size` are skipped for this epoch.
    pub fn optimize(
        &self,
        training: &mut [DataLabelPair],
        n_batches: usize,
        batch_size: usize,
        learning_rate_ratio: f64,
        regularization_ratio: f64,
        rng: &mut StdRng,
        update: &mut UpdateFn<'_>,
    ) -> Result<()> {
        match self {
            Self::Stochastic => {
                training.shuffle(rng);
                for batch in training.chunks_exact(batch_size).take(n_batches) {
                    update(batch, learning_rate_ratio, regularization_ratio)?;
                }
                Ok(())
            }
        }
    }
}
