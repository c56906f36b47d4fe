//! Chart generation models

use serde::Serialize;

/// Axis formatting mode of a chart
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ViewMode {
    /// Long `YYYY-MM-DD HH:MM:SS` x labels
    Live,
    /// Short `Mon D` x labels, used for the 30-day view
    HistoryShort,
}

/// A single data point on a price chart
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartPoint {
    pub timestamp_millis: i64,
    /// X-axis label
    pub label: String,
    pub price: f64,
    /// Shown when the point is inspected
    pub tooltip: String,
}

/// A fully laid out chart, ready to be drawn
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartView {
    pub title: String,
    pub mode: ViewMode,
    pub x_axis_title: &'static str,
    pub y_axis_title: &'static str,
    pub width: u32,
    pub height: u32,
    pub points: Vec<ChartPoint>,
}
