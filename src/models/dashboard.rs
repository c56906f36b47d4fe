//! Dashboard document and view models

use super::chart::ChartView;
use super::table::DisplayRow;
use serde::Serialize;
use std::str::FromStr;

/// Element ids of the rendering targets
pub const STATUS_TARGET: &str = "meta";
pub const TABLE_TARGET: &str = "bpi-body";
pub const CHART_TARGET: &str = "bpiChart";

/// The two views a user can ask for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum View {
    Live,
    History,
}

impl View {
    pub fn name(&self) -> &'static str {
        match self {
            View::Live => "live",
            View::History => "history",
        }
    }
}

impl FromStr for View {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "live" => Ok(View::Live),
            "history" | "30d" => Ok(View::History),
            other => Err(format!("Unknown view '{}'. Use: live, history", other)),
        }
    }
}

/// Where the live view gets its data
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LiveSource {
    /// Current spot price, a single point
    Spot,
    /// Last 24 hours of market chart data
    Intraday,
}

impl FromStr for LiveSource {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "spot" => Ok(LiveSource::Spot),
            "intraday" | "24h" => Ok(LiveSource::Intraday),
            other => Err(format!("Unknown live source '{}'. Use: spot, intraday", other)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum StatusStyle {
    Normal,
    Error,
}

impl StatusStyle {
    pub fn css_class(&self) -> &'static str {
        match self {
            StatusStyle::Normal => "status-normal",
            StatusStyle::Error => "status-error",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StatusLine {
    pub text: String,
    pub style: StatusStyle,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct TableBody {
    pub rows: Vec<DisplayRow>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ChartCanvas {
    pub chart: Option<ChartView>,
}

/// Everything the dashboard page shows.
///
/// A `None` target is absent from the page; renderers bail out with
/// `RenderError::TargetMissing` when they need it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Document {
    pub status: Option<StatusLine>,
    pub table_body: Option<TableBody>,
    pub chart_canvas: Option<ChartCanvas>,
}

impl Document {
    /// Page with every target present
    pub fn standard() -> Self {
        Self {
            status: Some(StatusLine {
                text: String::new(),
                style: StatusStyle::Normal,
            }),
            table_body: Some(TableBody::default()),
            chart_canvas: Some(ChartCanvas::default()),
        }
    }
}

impl Default for Document {
    fn default() -> Self {
        Self::standard()
    }
}
