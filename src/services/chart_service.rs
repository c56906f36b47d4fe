use crate::models::dashboard::{ChartCanvas, CHART_TARGET};
use crate::models::{ChartPoint, ChartView, Document, Series, ViewMode};
use crate::utils::errors::RenderError;
use crate::utils::format::{format_long, format_short, format_usd};
use plotters::prelude::*;
use tracing::debug;

const CHART_WIDTH: u32 = 900;
const LINE_COLOR: RGBColor = RGBColor(0x00, 0x73, 0xe6);

/// Lay out `series` as a chart. X labels depend on `mode`.
pub fn build_chart(series: &Series, title: &str, mode: ViewMode) -> ChartView {
    let points = series
        .iter()
        .map(|point| {
            let label = match mode {
                ViewMode::Live => format_long(point.timestamp_millis()),
                ViewMode::HistoryShort => format_short(point.timestamp_millis()),
            };
            ChartPoint {
                timestamp_millis: point.timestamp_millis(),
                tooltip: format!("Date: {}\nPrice: {}", label, format_usd(point.price())),
                label,
                price: point.price(),
            }
        })
        .collect();

    let (x_axis_title, height) = match mode {
        ViewMode::Live => ("Date/Time", 400),
        ViewMode::HistoryShort => ("Date", 550),
    };

    ChartView {
        title: title.to_string(),
        mode,
        x_axis_title,
        y_axis_title: "Price (USD)",
        width: CHART_WIDTH,
        height,
        points,
    }
}

/// Replace the chart bound to the chart target with a new one
pub fn render(
    series: &Series,
    title: &str,
    mode: ViewMode,
    document: &mut Document,
) -> Result<(), RenderError> {
    let canvas: &mut ChartCanvas = document
        .chart_canvas
        .as_mut()
        .ok_or(RenderError::TargetMissing(CHART_TARGET))?;

    if canvas.chart.is_some() {
        debug!("Replacing previous chart");
    }
    canvas.chart = Some(build_chart(series, title, mode));
    Ok(())
}

/// Y range with some padding; a flat or single-point series still gets a band
fn price_bounds(view: &ChartView) -> (f64, f64) {
    let min_price = view.points.iter().map(|p| p.price).fold(f64::INFINITY, f64::min);
    let max_price = view.points.iter().map(|p| p.price).fold(f64::NEG_INFINITY, f64::max);

    let range = max_price - min_price;
    let padding = if range > 0.0 {
        range * 0.1
    } else {
        (max_price.abs() * 0.01).max(1.0)
    };

    ((min_price - padding).max(0.0), max_price + padding)
}

/// Draw the chart as an SVG document
pub fn draw_svg(view: &ChartView) -> Result<String, String> {
    if view.points.is_empty() {
        return Err("Chart has no points".to_string());
    }

    let mut svg = String::new();
    {
        let backend = SVGBackend::with_string(&mut svg, (view.width, view.height));
        let root = backend.into_drawing_area();
        root.fill(&WHITE)
            .map_err(|e| format!("Failed to fill canvas: {}", e))?;

        let (y_min, y_max) = price_bounds(view);
        let count = view.points.len();
        // Points sit on integer x positions, one per label
        let x_range = -0.5f64..(count as f64 - 0.5);

        let mut chart = ChartBuilder::on(&root)
            .caption(&view.title, ("sans-serif", 24.0).into_font())
            .margin(15)
            .x_label_area_size(60)
            .y_label_area_size(90)
            .build_cartesian_2d(x_range, y_min..y_max)
            .map_err(|e| format!("Failed to build chart: {}", e))?;

        let x_formatter = |x: &f64| -> String {
            let index = x.round();
            if (x - index).abs() > 1e-6 || index < 0.0 {
                return String::new();
            }
            view.points
                .get(index as usize)
                .map(|p| p.label.clone())
                .unwrap_or_default()
        };
        let y_formatter = |y: &f64| format_usd(*y);

        chart
            .configure_mesh()
            .x_desc(view.x_axis_title)
            .y_desc(view.y_axis_title)
            .x_labels(count.min(12))
            .x_label_formatter(&x_formatter)
            .y_label_formatter(&y_formatter)
            .draw()
            .map_err(|e| format!("Failed to draw mesh: {}", e))?;

        chart
            .draw_series(LineSeries::new(
                view.points.iter().enumerate().map(|(i, p)| (i as f64, p.price)),
                LINE_COLOR.stroke_width(3),
            ))
            .map_err(|e| format!("Failed to draw line: {}", e))?;

        chart
            .draw_series(
                view.points
                    .iter()
                    .enumerate()
                    .map(|(i, p)| Circle::new((i as f64, p.price), 4, LINE_COLOR.filled())),
            )
            .map_err(|e| format!("Failed to draw point: {}", e))?;

        root.present()
            .map_err(|e| format!("Failed to render chart: {}", e))?;
    }

    Ok(svg)
}
