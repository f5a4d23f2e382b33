pub mod builder;
pub mod core;
pub mod data;
pub mod error;
pub mod models;
pub mod prelude;
pub mod utils;

// Re-export types
pub use crate::builder::NetworkBuilder;
pub use crate::core::{Activation, CostFunction, Layer, Optimizer};
pub use crate::error::{NetworkError, Result};
pub use crate::models::{Network, Prediction};

pub mod plot {
    pub mod plot_training;
}
