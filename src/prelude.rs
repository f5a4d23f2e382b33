pub use ndarray::{array, Array1, Array2, Axis};
pub use rand::rngs::StdRng;
pub use rand::SeedableRng;

pub use crate::error::*;

// Internal re-exports
pub use crate::builder::NetworkBuilder;
pub use crate::core::{Activation, CostFunction, Layer, Optimizer};
pub use crate::data::{read_csv_dataset, DataLabelPair, DataLabelSet};
pub use crate::models::{Network, Prediction};
