//! # Growth Chart Rendering
//!
//! Draws the weight-for-age chart to SVG: reference percentile curves, the
//! child's monthly trend, and a dot per trend point labelled with its
//! percentile.

use crate::error::ChartError;
use crate::series::GrowthChartData;
use plotters::coord::Shift;
use plotters::prelude::*;
use std::path::Path;

const CHART_SIZE: (u32, u32) = (820, 400);

fn render_err<E: std::fmt::Display>(e: E) -> ChartError {
    ChartError::Render(e.to_string())
}

/// Line style for a reference percentile; outer bands red, median darkest
fn percentile_style(rank: u8) -> ShapeStyle {
    match rank {
        3 | 97 => RGBColor(255, 107, 107).stroke_width(1),
        10 | 90 => RGBColor(255, 169, 77).stroke_width(1),
        25 | 75 => RGBColor(77, 150, 255).stroke_width(1),
        50 => RGBColor(30, 58, 138).stroke_width(3),
        _ => RGBColor(150, 150, 150).stroke_width(1),
    }
}

fn draw_chart<DB: DrawingBackend>(
    root: &DrawingArea<DB, Shift>,
    data: &GrowthChartData,
) -> Result<(), ChartError> {
    root.fill(&WHITE).map_err(render_err)?;

    let (min_y, max_y) = data.weight_range().unwrap_or((0.0, 1.0));
    let max_x = f64::from(data.max_months.max(1));

    let mut chart = ChartBuilder::on(root)
        .margin(15)
        .caption(format!("Weight-for-age ({})", data.gender), ("sans-serif", 20))
        .x_label_area_size(40)
        .y_label_area_size(50)
        .build_cartesian_2d(0.0..max_x, min_y..max_y)
        .map_err(render_err)?;

    chart
        .configure_mesh()
        .x_desc("Age (months)")
        .y_desc("Weight (kg)")
        .x_label_formatter(&|m| format!("{:.0}m", m))
        .axis_style(RGBColor(60, 60, 60))
        .draw()
        .map_err(render_err)?;

    for (&rank, curve) in &data.curves {
        if curve.is_empty() {
            continue;
        }
        let style = percentile_style(rank);
        chart
            .draw_series(LineSeries::new(
                curve.iter().map(|p| (p.month as f64, p.weight_kg)),
                style,
            ))
            .map_err(render_err)?
            .label(format!("P{}", rank))
            .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], style));
    }

    if !data.trend.is_empty() {
        let child = BLACK.stroke_width(3);
        chart
            .draw_series(LineSeries::new(
                data.trend.iter().map(|p| (p.month as f64, p.weight_kg)),
                child,
            ))
            .map_err(render_err)?
            .label("Child")
            .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], child));
    }

    chart
        .draw_series(
            data.annotations
                .iter()
                .map(|a| Circle::new((a.month as f64, a.weight_kg), 4, BLACK.filled())),
        )
        .map_err(render_err)?;

    chart
        .draw_series(data.annotations.iter().filter_map(|a| {
            a.percentile.map(|p| {
                Text::new(
                    format!("{:.1}%", p),
                    (a.month as f64, a.weight_kg),
                    ("sans-serif", 11),
                )
            })
        }))
        .map_err(render_err)?;

    chart
        .configure_series_labels()
        .background_style(&WHITE.mix(0.8))
        .border_style(&BLACK.mix(0.3))
        .position(SeriesLabelPosition::UpperLeft)
        .draw()
        .map_err(render_err)?;

    Ok(())
}

/// Render the chart to an SVG document
pub fn render_growth_chart_svg(data: &GrowthChartData) -> Result<String, ChartError> {
    let mut svg = String::new();
    {
        let root = SVGBackend::with_string(&mut svg, CHART_SIZE).into_drawing_area();
        draw_chart(&root, data)?;
        root.present().map_err(render_err)?;
    }
    log::debug!(
        "Rendered chart with {} curves and {} trend points",
        data.curves.len(),
        data.trend.len()
    );
    Ok(svg)
}

/// Render the chart and write it to `path`
pub fn write_growth_chart_svg(path: &Path, data: &GrowthChartData) -> Result<(), ChartError> {
    let svg = render_growth_chart_svg(data)?;
    std::fs::write(path, svg).map_err(ChartError::WriteFailed)?;
    log::info!("Wrote growth chart to {}", path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Gender;
    use crate::reference::ReferenceTable;
    use crate::series::{build_reference_curves, PointAnnotation, SeriesPoint, PERCENTILES_TO_PLOT};
    use chrono::NaiveDate;

    fn chart_data(with_child: bool) -> GrowthChartData {
        let table = ReferenceTable::who_weight_for_age().unwrap();
        let (trend, annotations) = if with_child {
            (
                vec![
                    SeriesPoint { month: 0, weight_kg: 3.4 },
                    SeriesPoint { month: 2, weight_kg: 5.6 },
                ],
                vec![PointAnnotation {
                    month: 2,
                    weight_kg: 5.6,
                    percentile: Some(52.3),
                    date: NaiveDate::from_ymd_opt(2024, 3, 2).unwrap(),
                }],
            )
        } else {
            (Vec::new(), Vec::new())
        };
        GrowthChartData {
            gender: Gender::Male,
            max_months: 24,
            curves: build_reference_curves(&table, Gender::Male, 24, &PERCENTILES_TO_PLOT),
            trend,
            annotations,
        }
    }

    #[test]
    fn test_percentile_styles() {
        assert_eq!(percentile_style(50).stroke_width, 3);
        assert_eq!(percentile_style(3).color.rgb(), percentile_style(97).color.rgb());
    }

    #[test]
    fn test_render_svg_with_child() {
        let svg = render_growth_chart_svg(&chart_data(true)).expect("Failed to render");
        assert!(svg.contains("<svg"));
        assert!(svg.contains("P50"));
        assert!(svg.contains("Child"));
        assert!(svg.contains("52.3%"));
    }

    #[test]
    fn test_render_svg_without_measurements() {
        let svg = render_growth_chart_svg(&chart_data(false)).expect("Failed to render");
        assert!(svg.contains("P97"));
        assert!(!svg.contains("Child"));
    }

    #[test]
    fn test_write_svg_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("chart.svg");
        write_growth_chart_svg(&path, &chart_data(true)).unwrap();
        assert!(std::fs::read_to_string(&path).unwrap().contains("<svg"));
    }
}
