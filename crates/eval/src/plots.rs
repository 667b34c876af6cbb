use anyhow::Result;
use plotters::prelude::*;

use crate::report::{ApproachResults, RunReport};

pub fn generate_plots(report: &RunReport, output_dir: &str) -> Result<()> {
    std::fs::create_dir_all(output_dir)?;

    if report.results.is_empty() {
        return Ok(());
    }

    plot_scores(&report.results, &format!("{}/scores.png", output_dir))?;

    Ok(())
}

/// Grouped bars of precision, recall and F1 per approach.
fn plot_scores(results: &[ApproachResults], path: &str) -> Result<()> {
    let width = (200 * results.len() as u32).max(800);
    let root = BitMapBackend::new(path, (width, 600)).into_drawing_area();
    root.fill(&WHITE)?;

    let names: Vec<String> = results
        .iter()
        .map(|r| format!("{}/{}", r.run, r.approach))
        .collect();

    let mut chart = ChartBuilder::on(&root)
        .caption("Entity Linking Scores", ("sans-serif", 30))
        .margin(10)
        .x_label_area_size(60)
        .y_label_area_size(60)
        .build_cartesian_2d(0f64..results.len() as f64, 0f64..1.0f64)?;

    chart
        .configure_mesh()
        .disable_x_mesh()
        .y_desc("Score")
        .x_labels(results.len() * 2 + 1)
        .x_label_formatter(&|x| {
            let index = x.floor() as usize;
            if (x - x.floor() - 0.5).abs() < 1e-6 {
                names.get(index).cloned().unwrap_or_default()
            } else {
                String::new()
            }
        })
        .draw()?;

    let series = [("precision", RED), ("recall", BLUE), ("F1", GREEN)];
    for (series_idx, &(label, color)) in series.iter().enumerate() {
        chart
            .draw_series(results.iter().enumerate().map(|(i, r)| {
                let value = match series_idx {
                    0 => r.metrics.precision,
                    1 => r.metrics.recall,
                    _ => r.metrics.f1,
                };
                // NaN scores are drawn as empty bars
                let value = if value.is_finite() { value } else { 0.0 };
                let left = i as f64 + 0.1 + series_idx as f64 * 0.27;
                Rectangle::new([(left, 0.0), (left + 0.25, value)], color.filled())
            }))?
            .label(label)
            .legend(move |(x, y)| Rectangle::new([(x, y - 5), (x + 10, y + 5)], color.filled()));
    }

    chart
        .configure_series_labels()
        .background_style(&WHITE.mix(0.8))
        .border_style(&BLACK)
        .draw()?;

    root.present()?;
    println!("Saved score plot to {}", path);
    Ok(())
}
