//! Data models shared by the fetch, render and route layers
//!
//! Each model is produced by one service and consumed by the renderers or
//! the HTTP routes.

pub mod chart;
pub mod dashboard;
pub mod price;
pub mod table;

// Re-export commonly used types for convenience
pub use chart::{ChartPoint, ChartView, ViewMode};
pub use dashboard::{Document, LiveSource, StatusLine, StatusStyle, View};
pub use price::{Cached, LivePriceResult, PricePoint, Series};
pub use table::{Delta, DisplayRow};
