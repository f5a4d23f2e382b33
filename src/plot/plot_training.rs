use plotters::prelude::*;

/// Plots the per-epoch training and evaluation cost history on a log
/// scale.
pub fn plot_cost_over_epochs(
    training_cost: &[f64],
    evaluation_cost: &[f64],
    filename: &str,
) -> Result<(), Box<dyn std::error::Error>> {
    let root = BitMapBackend::new(filename, (800, 600)).into_drawing_area();
    root.fill(&WHITE)?;

    let epochs = training_cost.len().max(evaluation_cost.len());

    // Adjust costs to avoid log of zero or negative numbers
    let log_series = |costs: &[f64]| -> Vec<f64> {
        costs
            .iter()
            .map(|&c| if c <= 0.0 { 1e-10 } else { c })
            .map(|c| c.log10())
            .collect()
    };
    let log_training = log_series(training_cost);
    let log_evaluation = log_series(evaluation_cost);

    // Find min and max log cost values
    let y_min = log_training
        .iter()
        .chain(log_evaluation.iter())
        .cloned()
        .fold(f64::INFINITY, f64::min)
        .floor();
    let y_max = log_training
        .iter()
        .chain(log_evaluation.iter())
        .cloned()
        .fold(f64::NEG_INFINITY, f64::max)
        .ceil();

    let mut chart = ChartBuilder::on(&root)
        .caption("Cost over Epochs (Log Scale)", ("sans-serif", 30).into_font())
        .margin(5)
        .x_label_area_size(50)
        .y_label_area_size(60)
        .build_cartesian_2d(0..epochs, y_min..y_max)?;

    chart
        .configure_mesh()
        .x_desc("Epoch")
        .y_desc("Cost (Log Scale)")
        .y_label_formatter(&|y| format!("1e{:.0}", y))
        .draw()?;

    chart
        .draw_series(LineSeries::new(
            log_training.iter().enumerate().map(|(epoch, &c)| (epoch, c)),
            &BLUE,
        ))?
        .label("Training Cost")
        .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], &BLUE));

    chart
        .draw_series(LineSeries::new(
            log_evaluation.iter().enumerate().map(|(epoch, &c)| (epoch, c)),
            &RED,
        ))?
        .label("Evaluation Cost")
        .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], &RED));

    // Draw the legend
    chart
        .configure_series_labels()
        .background_style(&WHITE.mix(0.8))
        .border_style(&BLACK)
        .draw()?;

    root.present()?;
    println!("Cost plot has been saved as '{}'", filename);

    Ok(())
}

/// Plots the per-epoch training and evaluation accuracy history.
pub fn plot_accuracy_over_epochs(
    training_accuracy: &[f64],
    evaluation_accuracy: &[f64],
    filename: &str,
) -> Result<(), Box<dyn std::error::Error>> {
    let root = BitMapBackend::new(filename, (800, 600)).into_drawing_area();
    root.fill(&WHITE)?;

    let epochs = training_accuracy.len().max(evaluation_accuracy.len());

    let mut chart = ChartBuilder::on(&root)
        .caption("Accuracy over Epochs", ("sans-serif", 30).into_font())
        .margin(5)
        .x_label_area_size(50)
        .y_label_area_size(60)
        .build_cartesian_2d(0..epochs, 0.0..1.0f64)?;

    chart
        .configure_mesh()
        .x_desc("Epoch")
        .y_desc("Accuracy")
        .draw()?;

    chart
        .draw_series(LineSeries::new(
            training_accuracy.iter().enumerate().map(|(epoch, &a)| (epoch, a)),
            &BLUE,
        ))?
        .label("Training Accuracy")
        .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], &BLUE));

    chart
        .draw_series(LineSeries::new(
            evaluation_accuracy.iter().enumerate().map(|(epoch, &a)| (epoch, a)),
            &RED,
        ))?
        .label("Evaluation Accuracy")
        .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], &RED));

    // Draw the legend
    chart
        .configure_series_labels()
        .background_style(&WHITE.mix(0.8))
        .border_style(&BLACK)
        .draw()?;

    root.present()?;
    println!("Accuracy plot has been saved as '{}'", filename);

    Ok(())
}
