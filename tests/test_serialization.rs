// Round-trip and failure-mode tests for the flat text parameter format.

use std::fs;
use std::io::Write;
use std::path::PathBuf;

use ndarray::array;

use fcnn::prelude::*;

fn temp_path(name: &str) -> PathBuf {
    std::env::temp_dir().join(name)
}

fn two_layer_network() -> Network<usize> {
    let mut network = NetworkBuilder::new()
        .input_size(4)
        .cost_function(CostFunction::CrossEntropy)
        .optimizer(Optimizer::Stochastic)
        .build::<usize>();
    network
        .add_layer(NetworkBuilder::create_layer(3, Activation::Logistic))
        .add_layer(NetworkBuilder::create_layer(2, Activation::Softmax));
    network
}

#[test]
fn save_then_load_reproduces_parameters_bit_for_bit() {
    let path = temp_path("fcnn_roundtrip.net");
    let network = two_layer_network();

    NetworkBuilder::save(&network, &path).unwrap();
    let loaded = NetworkBuilder::load::<usize>(&path).unwrap();
    fs::remove_file(&path).ok();

    assert_eq!(loaded.input_size(), network.input_size());
    assert_eq!(loaded.cost_function(), network.cost_function());
    assert_eq!(loaded.number_of_layers(), network.number_of_layers());
    for (original, restored) in network.layers().iter().zip(loaded.layers()) {
        assert_eq!(restored.size(), original.size());
        assert_eq!(restored.activation(), original.activation());
        // Bit-exact, not approximately equal.
        assert_eq!(restored.bias(), original.bias());
        assert_eq!(restored.weight(), original.weight());
    }
}

#[test]
fn double_round_trip_is_stable() {
    let first_path = temp_path("fcnn_roundtrip_a.net");
    let second_path = temp_path("fcnn_roundtrip_b.net");
    let network = two_layer_network();

    NetworkBuilder::save(&network, &first_path).unwrap();
    let loaded = NetworkBuilder::load::<usize>(&first_path).unwrap();
    NetworkBuilder::save(&loaded, &second_path).unwrap();

    let first = fs::read_to_string(&first_path).unwrap();
    let second = fs::read_to_string(&second_path).unwrap();
    fs::remove_file(&first_path).ok();
    fs::remove_file(&second_path).ok();

    assert_eq!(first, second);
}

#[test]
fn loaded_network_predicts_like_the_original() {
    let path = temp_path("fcnn_roundtrip_predict.net");
    let network = two_layer_network();
    NetworkBuilder::save(&network, &path).unwrap();
    let loaded = NetworkBuilder::load::<usize>(&path).unwrap();
    fs::remove_file(&path).ok();

    let x = array![0.3, -0.1, 0.8, 0.4];
    assert_eq!(loaded.predict(&x), network.predict(&x));
}

#[test]
fn file_layout_is_one_header_plus_three_lines_per_layer() {
    let path = temp_path("fcnn_layout.net");
    let network = two_layer_network();
    NetworkBuilder::save(&network, &path).unwrap();
    let contents = fs::read_to_string(&path).unwrap();
    fs::remove_file(&path).ok();

    let lines: Vec<&str> = contents.lines().collect();
    assert_eq!(lines.len(), 1 + 3 * 2);
    assert_eq!(lines[0], "4,crossentropy");
    assert_eq!(lines[3], "logistic");
    assert_eq!(lines[6], "softmax");
    // Bias line of the first layer: 3 comma-separated values, no trailing comma.
    assert_eq!(lines[1].split(',').count(), 3);
    assert!(!lines[1].ends_with(','));
    // Weight line of the first layer: 3 x 4 values.
    assert_eq!(lines[2].split(',').count(), 12);
}

#[test]
fn missing_activation_line_is_rejected() {
    let path = temp_path("fcnn_truncated.net");
    let mut file = fs::File::create(&path).unwrap();
    // Header plus bias and weight lines, but no activation line.
    write!(file, "2,quadratic\n0.1,0.2\n1,2,3,4\n").unwrap();
    drop(file);

    let err = NetworkBuilder::load::<usize>(&path).unwrap_err();
    fs::remove_file(&path).ok();
    assert!(matches!(err, NetworkError::MalformedParameterFile(_)));
}

#[test]
fn unknown_names_in_a_file_are_rejected() {
    let path = temp_path("fcnn_unknown_cost.net");
    fs::write(&path, "2,hinge\n").unwrap();
    let err = NetworkBuilder::load::<usize>(&path).unwrap_err();
    fs::remove_file(&path).ok();
    assert!(matches!(err, NetworkError::UnknownCostFunction(_)));

    let path = temp_path("fcnn_unknown_activation.net");
    fs::write(&path, "2,quadratic\n0.1,0.2\n1,2,3,4\nrelu\n").unwrap();
    let err = NetworkBuilder::load::<usize>(&path).unwrap_err();
    fs::remove_file(&path).ok();
    assert!(matches!(err, NetworkError::UnknownActivationFunction(_)));
}

#[test]
fn inconsistent_weight_count_is_rejected() {
    let path = temp_path("fcnn_bad_weights.net");
    // 2 bias values but 5 weights: not a multiple.
    fs::write(&path, "2,quadratic\n0.1,0.2\n1,2,3,4,5\nlogistic\n").unwrap();
    let err = NetworkBuilder::load::<usize>(&path).unwrap_err();
    fs::remove_file(&path).ok();
    assert!(matches!(err, NetworkError::MalformedParameterFile(_)));
}

#[test]
fn non_numeric_parameter_is_rejected() {
    let path = temp_path("fcnn_bad_number.net");
    fs::write(&path, "2,quadratic\n0.1,oops\n1,2,3,4\nlogistic\n").unwrap();
    let err = NetworkBuilder::load::<usize>(&path).unwrap_err();
    fs::remove_file(&path).ok();
    assert!(matches!(err, NetworkError::MalformedParameterFile(_)));
}

#[test]
fn missing_file_is_an_io_error() {
    let err = NetworkBuilder::load::<usize>("/nonexistent/fcnn.net").unwrap_err();
    assert!(matches!(err, NetworkError::Io(_)));
}

#[test]
fn save_into_a_missing_directory_fails() {
    let network = two_layer_network();
    let err = NetworkBuilder::save(&network, "/nonexistent/dir/fcnn.net").unwrap_err();
    assert!(matches!(err, NetworkError::Io(_)));
}

#[test]
fn builder_accepts_names_and_rejects_unknown_ones() {
    let network = NetworkBuilder::new()
        .input_size(3)
        .cost_function_name("quadratic")
        .unwrap()
        .optimizer_name("stochastic")
        .unwrap()
        .build::<usize>();
    assert_eq!(network.cost_function(), CostFunction::Quadratic);

    assert!(NetworkBuilder::new().cost_function_name("hinge").is_err());
    assert!(NetworkBuilder::new().optimizer_name("adam").is_err());
}
