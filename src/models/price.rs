//! Price data models

use crate::utils::errors::DataError;
use serde::Serialize;
use std::collections::BTreeMap;

/// A single observed price. Immutable once produced.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PricePoint {
    timestamp_millis: i64,
    price: f64,
}

impl PricePoint {
    /// Rejects negative and non-finite prices
    pub fn new(timestamp_millis: i64, price: f64) -> Result<Self, DataError> {
        if !price.is_finite() || price < 0.0 {
            return Err(DataError::Malformed(format!(
                "invalid price {} at {}",
                price, timestamp_millis
            )));
        }
        Ok(Self {
            timestamp_millis,
            price,
        })
    }

    pub fn timestamp_millis(&self) -> i64 {
        self.timestamp_millis
    }

    pub fn price(&self) -> f64 {
        self.price
    }
}

/// Non-empty, ordered sequence of price points.
///
/// Table and chart are both rendered from the same `Series` so they always
/// agree on content and order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Series(Vec<PricePoint>);

impl Series {
    pub fn new(points: Vec<PricePoint>) -> Result<Self, DataError> {
        if points.is_empty() {
            return Err(DataError::Empty);
        }
        Ok(Self(points))
    }

    pub fn points(&self) -> &[PricePoint] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn first(&self) -> &PricePoint {
        &self.0[0]
    }

    pub fn last(&self) -> &PricePoint {
        &self.0[self.0.len() - 1]
    }

    pub fn iter(&self) -> std::slice::Iter<'_, PricePoint> {
        self.0.iter()
    }
}

/// Spot price as served by `/price`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LivePriceResult {
    pub source: String,
    pub updated_at_iso: String,
    /// Upper-case currency code → rate
    pub prices_by_currency: BTreeMap<String, f64>,
}

/// A value plus whether it came out of the cache
#[derive(Debug, Clone, PartialEq)]
pub struct Cached<T> {
    pub cached: bool,
    pub value: T,
}
