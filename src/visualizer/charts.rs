// file: src/visualizer/charts.rs
// description: chart rendering with plotters bitmap backend
// reference: https://docs.rs/plotters

use crate::error::{PipelineError, Result};
use crate::models::CorrelationMatrix;
use plotters::prelude::*;
use std::path::Path;

const HISTOGRAM_BINS: usize = 10;

fn viz_err(chart: &str, err: impl std::fmt::Display) -> PipelineError {
    PipelineError::Visualization {
        chart: chart.to_string(),
        message: err.to_string(),
    }
}

/// Diverging color for correlation values in [-1, 1]: blue for negative,
/// white near zero, red for positive.
fn correlation_color(value: f64) -> RGBColor {
    let v = value.clamp(-1.0, 1.0);
    if v >= 0.0 {
        let fade = (255.0 * (1.0 - v)) as u8;
        RGBColor(255, fade, fade)
    } else {
        let fade = (255.0 * (1.0 + v)) as u8;
        RGBColor(fade, fade, 255)
    }
}

/// Sequential blue for confusion-matrix cells scaled by the largest count.
fn count_color(count: usize, max_count: usize) -> RGBColor {
    if max_count == 0 {
        return RGBColor(255, 255, 255);
    }
    let intensity = count as f64 / max_count as f64;
    let fade = (255.0 * (1.0 - intensity * 0.85)) as u8;
    RGBColor(fade, fade, 255)
}

/// Histogram grid over up to four numeric series, one subplot each.
pub fn render_distributions(series: &[(String, Vec<f64>)], path: &Path) -> Result<()> {
    let chart_name = "distributions";
    if series.is_empty() {
        return Err(viz_err(chart_name, "no numeric columns to plot"));
    }

    let root = BitMapBackend::new(path, (1280, 960)).into_drawing_area();
    root.fill(&WHITE).map_err(|e| viz_err(chart_name, e))?;
    let areas = root.split_evenly((2, 2));

    for ((name, values), area) in series.iter().take(4).zip(areas.iter()) {
        if values.is_empty() {
            continue;
        }

        let min = values.iter().copied().fold(f64::INFINITY, f64::min);
        let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        let span = if max > min { max - min } else { 1.0 };
        let bin_width = span / HISTOGRAM_BINS as f64;

        let mut counts = vec![0usize; HISTOGRAM_BINS];
        for value in values {
            let bin = (((value - min) / bin_width) as usize).min(HISTOGRAM_BINS - 1);
            counts[bin] += 1;
        }
        let peak = *counts.iter().max().unwrap_or(&1) as f64;

        let mut chart = ChartBuilder::on(area)
            .caption(format!("Distribution of {}", name), ("sans-serif", 24))
            .margin(12)
            .x_label_area_size(30)
            .y_label_area_size(45)
            .build_cartesian_2d(min..(min + span), 0f64..(peak * 1.1).max(1.0))
            .map_err(|e| viz_err(chart_name, e))?;

        chart
            .configure_mesh()
            .disable_x_mesh()
            .draw()
            .map_err(|e| viz_err(chart_name, e))?;

        chart
            .draw_series(counts.iter().enumerate().map(|(bin, count)| {
                let lo = min + bin as f64 * bin_width;
                let hi = lo + bin_width;
                Rectangle::new([(lo, 0.0), (hi, *count as f64)], BLUE.mix(0.5).filled())
            }))
            .map_err(|e| viz_err(chart_name, e))?;
    }

    root.present().map_err(|e| viz_err(chart_name, e))?;
    Ok(())
}

/// Correlation heatmap with per-cell coefficients.
pub fn render_correlation(matrix: &CorrelationMatrix, path: &Path) -> Result<()> {
    let chart_name = "correlation";
    let n = matrix.labels.len();
    if n < 2 {
        return Err(viz_err(chart_name, "need at least two numeric columns"));
    }

    let root = BitMapBackend::new(path, (1024, 900)).into_drawing_area();
    root.fill(&WHITE).map_err(|e| viz_err(chart_name, e))?;

    let labels = matrix.labels.clone();
    let mut chart = ChartBuilder::on(&root)
        .caption("Correlation Heatmap", ("sans-serif", 30))
        .margin(20)
        .x_label_area_size(60)
        .y_label_area_size(100)
        .build_cartesian_2d(0i32..n as i32, 0i32..n as i32)
        .map_err(|e| viz_err(chart_name, e))?;

    chart
        .configure_mesh()
        .disable_mesh()
        .x_labels(n)
        .y_labels(n)
        .x_label_formatter(&|x| {
            labels
                .get(*x as usize)
                .cloned()
                .unwrap_or_default()
        })
        .y_label_formatter(&|y| {
            labels
                .get(n.saturating_sub(1).saturating_sub(*y as usize))
                .cloned()
                .unwrap_or_default()
        })
        .draw()
        .map_err(|e| viz_err(chart_name, e))?;

    for i in 0..n {
        for j in 0..n {
            let value = matrix.values[i][j];
            let x = j as i32;
            let y = (n - 1 - i) as i32;

            chart
                .draw_series(std::iter::once(Rectangle::new(
                    [(x, y), (x + 1, y + 1)],
                    correlation_color(value).filled(),
                )))
                .map_err(|e| viz_err(chart_name, e))?;

            chart
                .draw_series(std::iter::once(Text::new(
                    format!("{:.2}", value),
                    (x, y + 1),
                    ("sans-serif", 16).into_font().color(&BLACK),
                )))
                .map_err(|e| viz_err(chart_name, e))?;
        }
    }

    root.present().map_err(|e| viz_err(chart_name, e))?;
    Ok(())
}

/// Vertical box plots for outlier inspection over the numeric subset.
pub fn render_boxplots(series: &[(String, Vec<f64>)], path: &Path) -> Result<()> {
    let chart_name = "boxplots";
    let populated: Vec<&(String, Vec<f64>)> =
        series.iter().filter(|(_, v)| !v.is_empty()).collect();
    if populated.is_empty() {
        return Err(viz_err(chart_name, "no numeric columns to plot"));
    }

    let min = populated
        .iter()
        .flat_map(|(_, v)| v.iter())
        .copied()
        .fold(f64::INFINITY, f64::min);
    let max = populated
        .iter()
        .flat_map(|(_, v)| v.iter())
        .copied()
        .fold(f64::NEG_INFINITY, f64::max);
    let pad = ((max - min).abs() * 0.1).max(1.0);

    let root = BitMapBackend::new(path, (1280, 720)).into_drawing_area();
    root.fill(&WHITE).map_err(|e| viz_err(chart_name, e))?;

    let labels: Vec<&str> = populated.iter().map(|(name, _)| name.as_str()).collect();
    let mut chart = ChartBuilder::on(&root)
        .caption("Outlier Analysis", ("sans-serif", 30))
        .margin(20)
        .x_label_area_size(45)
        .y_label_area_size(60)
        .build_cartesian_2d(
            labels[..].into_segmented(),
            (min - pad) as f32..(max + pad) as f32,
        )
        .map_err(|e| viz_err(chart_name, e))?;

    chart
        .configure_mesh()
        .disable_x_mesh()
        .draw()
        .map_err(|e| viz_err(chart_name, e))?;

    for (idx, (_, values)) in populated.iter().enumerate() {
        let quartiles = Quartiles::new(values);
        chart
            .draw_series(std::iter::once(Boxplot::new_vertical(
                SegmentValue::CenterOf(&labels[idx]),
                &quartiles,
            )))
            .map_err(|e| viz_err(chart_name, e))?;
    }

    root.present().map_err(|e| viz_err(chart_name, e))?;
    Ok(())
}

/// Confusion-matrix heatmap: actual classes on rows, predicted on columns.
pub fn render_confusion_matrix(
    classes: &[String],
    counts: &[Vec<usize>],
    path: &Path,
) -> Result<()> {
    let chart_name = "confusion_matrix";
    let n = classes.len();
    if n == 0 || counts.len() != n {
        return Err(viz_err(chart_name, "confusion matrix shape mismatch"));
    }

    let max_count = counts
        .iter()
        .flat_map(|row| row.iter())
        .copied()
        .max()
        .unwrap_or(0);

    let root = BitMapBackend::new(path, (900, 800)).into_drawing_area();
    root.fill(&WHITE).map_err(|e| viz_err(chart_name, e))?;

    let labels = classes.to_vec();
    let mut chart = ChartBuilder::on(&root)
        .caption("Confusion Matrix", ("sans-serif", 30))
        .margin(20)
        .x_label_area_size(60)
        .y_label_area_size(80)
        .build_cartesian_2d(0i32..n as i32, 0i32..n as i32)
        .map_err(|e| viz_err(chart_name, e))?;

    chart
        .configure_mesh()
        .disable_mesh()
        .x_labels(n)
        .y_labels(n)
        .x_desc("Predicted")
        .y_desc("Actual")
        .x_label_formatter(&|x| labels.get(*x as usize).cloned().unwrap_or_default())
        .y_label_formatter(&|y| {
            labels
                .get(n.saturating_sub(1).saturating_sub(*y as usize))
                .cloned()
                .unwrap_or_default()
        })
        .draw()
        .map_err(|e| viz_err(chart_name, e))?;

    for (i, row) in counts.iter().enumerate() {
        for (j, &count) in row.iter().enumerate() {
            let x = j as i32;
            let y = (n - 1 - i) as i32;

            chart
                .draw_series(std::iter::once(Rectangle::new(
                    [(x, y), (x + 1, y + 1)],
                    count_color(count, max_count).filled(),
                )))
                .map_err(|e| viz_err(chart_name, e))?;

            chart
                .draw_series(std::iter::once(Text::new(
                    count.to_string(),
                    (x, y + 1),
                    ("sans-serif", 20).into_font().color(&BLACK),
                )))
                .map_err(|e| viz_err(chart_name, e))?;
        }
    }

    root.present().map_err(|e| viz_err(chart_name, e))?;
    Ok(())
}
