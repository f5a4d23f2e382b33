use ndarray::Array1;

/// Index of the maximal component. Ties resolve to the first maximum;
/// an empty vector yields index 0.
pub fn argmax(values: &Array1<f64>) -> usize {
    let mut best_index = 0;
    let mut best_value = f64::NEG_INFINITY;
    for (index, &value) in values.iter().enumerate() {
        if value > best_value {
            best_index = index;
            best_value = value;
        }
    }
    best_index
}

/// One-hot vector of the given length with a 1 at `index`.
pub fn one_hot(index: usize, length: usize) -> Array1<f64> {
    let mut output = Array1::zeros(length);
    output[index] = 1.0;
    output
}
