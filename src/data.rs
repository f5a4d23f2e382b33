use std::path::Path;

use ndarray::Array1;

use crate::error::{NetworkError, Result};

/// One training or evaluation example: a feature vector and a label
/// vector. Scalar labels are stored as length-1 vectors and promoted to
/// one-hot form by the network when the output layer is wider.
pub type DataLabelPair = (Array1<f64>, Array1<f64>);
pub type DataLabelSet = Vec<DataLabelPair>;

/// Reads a headerless CSV file into a data/label set.
///
/// The first `split_index` columns of each record become the feature
/// vector, each value divided by `normalize_factor` (255 for MNIST pixel
/// data); the remaining columns become the label vector as-is.
pub fn read_csv_dataset(
    path: impl AsRef<Path>,
    split_index: usize,
    normalize_factor: f64,
) -> Result<DataLabelSet> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .trim(csv::Trim::All)
        .from_path(path)?;

    let mut result = DataLabelSet::new();
    for record in reader.records() {
        let record = record?;
        let mut features = Vec::with_capacity(split_index);
        let mut label = Vec::new();
        for (column, cell) in record.iter().enumerate() {
            let value: f64 = cell.parse().map_err(|_| {
                NetworkError::MalformedDataset(format!(
                    "cell '{}' at column {} is not a number",
                    cell, column
                ))
            })?;
            if column < split_index {
                features.push(value / normalize_factor);
            } else {
                label.push(value);
            }
        }
        result.push((Array1::from_vec(features), Array1::from_vec(label)));
    }

    Ok(result)
}
