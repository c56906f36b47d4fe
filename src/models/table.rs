//! Price table models

use crate::utils::format::format_usd;
use serde::Serialize;

/// Movement of a price relative to the row above it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Delta {
    Up,
    Down,
    Neutral,
}

impl Delta {
    /// Compare raw (unformatted) prices
    pub fn between(previous: Option<f64>, current: f64) -> Self {
        match previous {
            Some(prev) if current > prev => Delta::Up,
            Some(prev) if current < prev => Delta::Down,
            _ => Delta::Neutral,
        }
    }

    pub fn css_class(&self) -> &'static str {
        match self {
            Delta::Up => "price-up",
            Delta::Down => "price-down",
            Delta::Neutral => "",
        }
    }

    pub fn arrow(&self) -> &'static str {
        match self {
            Delta::Up => "▲",
            Delta::Down => "▼",
            Delta::Neutral => "",
        }
    }
}

/// One rendered table row
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DisplayRow {
    pub label: String,
    pub price: f64,
    pub delta: Delta,
}

impl DisplayRow {
    pub fn price_text(&self) -> String {
        format_usd(self.price)
    }
}
