use std::path::{Path, PathBuf};
use std::time::Instant;

use fcnn::plot::plot_training;
use fcnn::prelude::*;

// MNIST images are 28 x 28 pixels with values in 0..=255.
const DATA_LENGTH: usize = 28 * 28;
const NORMALIZE_FACTOR: f64 = 255.0;

// Network hyperparameters
const N_EPOCHS: usize = 30;
const BATCH_SIZE: usize = 10;
const ETA: f64 = 0.1;
const LAMBDA: f64 = 5.0;
const IS_TRUE_RANDOM: bool = false;

type PredictionType = usize;

fn main() {
    if let Err(err) = run() {
        eprintln!("{}", err);
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let database_folder = PathBuf::from(
        std::env::args()
            .nth(1)
            .unwrap_or_else(|| "./Data/MNIST".to_string()),
    );
    let network_filename = Path::new("./network.net");

    let start = Instant::now();

    // Load database
    println!("Reading database...");
    let mut training =
        read_csv_dataset(database_folder.join("Training.csv"), DATA_LENGTH, NORMALIZE_FACTOR)?;
    let validation =
        read_csv_dataset(database_folder.join("Validation.csv"), DATA_LENGTH, NORMALIZE_FACTOR)?;
    let testing =
        read_csv_dataset(database_folder.join("Testing.csv"), DATA_LENGTH, NORMALIZE_FACTOR)?;
    println!("Finished creating the database.\n");

    // Create empty network and add layers
    let mut network = NetworkBuilder::new()
        .input_size(DATA_LENGTH)
        .cost_function(CostFunction::CrossEntropy)
        .optimizer(Optimizer::Stochastic)
        .true_random(IS_TRUE_RANDOM)
        .build::<PredictionType>();
    network
        .add_layer(NetworkBuilder::create_layer(30, Activation::Logistic))
        .add_layer(NetworkBuilder::create_layer(10, Activation::Logistic));

    // To resume from a saved file instead:
    // let mut network = NetworkBuilder::load::<PredictionType>(network_filename)?;

    network.print_layers();

    // Train network
    println!("Training the network...");
    let training_start = Instant::now();
    network.train(&mut training, &validation, N_EPOCHS, BATCH_SIZE, ETA, LAMBDA, true)?;
    println!(
        "\nTraining has finished within {} seconds.\n",
        training_start.elapsed().as_secs()
    );

    // Save network
    NetworkBuilder::save(&network, network_filename)?;

    // Test network
    let index = 3;
    let (features, label) = &testing[index];
    println!(
        "Testing the network for test input number {}:\n\
         \tNetworks prediction is: {}.\n\
         \tThe actual value is: {}.\n",
        index,
        network.predict(features),
        label[0]
    );

    let (correct, _cost) = network.calc_accuracy_and_cost(&testing, 0.0);
    println!(
        "For the testing set: total correct = {} out of {}",
        correct,
        testing.len()
    );

    if let Err(err) = plot_training::plot_cost_over_epochs(
        &network.training_cost,
        &network.evaluation_cost,
        "cost_over_epochs.png",
    ) {
        eprintln!("Could not render cost plot: {}", err);
    }
    if let Err(err) = plot_training::plot_accuracy_over_epochs(
        &network.training_accuracy,
        &network.evaluation_accuracy,
        "accuracy_over_epochs.png",
    ) {
        eprintln!("Could not render accuracy plot: {}", err);
    }

    println!(
        "\nTotal calculation time was {} seconds.",
        start.elapsed().as_secs()
    );

    Ok(())
}
