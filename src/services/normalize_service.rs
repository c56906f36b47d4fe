use crate::models::{PricePoint, Series};
use crate::utils::errors::DataError;
use chrono::{NaiveDate, NaiveDateTime};
use serde_json::Value;

/// Turn a raw price payload into a `Series`, preserving input order.
///
/// Accepted shapes:
/// - upstream market chart: `{ "prices": [[ts_millis, price], ...] }`
/// - proxied history: `{ "bpi": [{ "date": "YYYY-MM-DD HH:MM", "price": p }, ...] }`
/// - either inner array on its own
pub fn normalize(raw: &Value) -> Result<Series, DataError> {
    let entries = match raw {
        Value::Object(map) => map
            .get("prices")
            .or_else(|| map.get("bpi"))
            .ok_or_else(|| DataError::Malformed("expected a 'prices' or 'bpi' field".to_string()))?,
        Value::Array(_) => raw,
        Value::Null => return Err(DataError::Empty),
        _ => return Err(DataError::Malformed("price payload is not an object".to_string())),
    };

    let items = entries
        .as_array()
        .ok_or_else(|| DataError::Malformed("price series is not an array".to_string()))?;

    if items.is_empty() {
        return Err(DataError::Empty);
    }

    let points = items
        .iter()
        .enumerate()
        .map(|(index, item)| parse_entry(index, item))
        .collect::<Result<Vec<_>, _>>()?;

    Series::new(points)
}

/// Single point out of a proxied `/price` payload (`bitcoin.USD.rate_float`)
pub fn normalize_spot(raw: &Value, fallback_ts_millis: i64) -> Result<Series, DataError> {
    let rate = raw
        .pointer("/bitcoin/USD/rate_float")
        .and_then(Value::as_f64)
        .ok_or_else(|| DataError::Malformed("missing bitcoin.USD.rate_float".to_string()))?;

    let ts = raw
        .get("updatedAtISO")
        .and_then(Value::as_str)
        .and_then(|s| chrono::DateTime::parse_from_rfc3339(s).ok())
        .map(|dt| dt.timestamp_millis())
        .unwrap_or(fallback_ts_millis);

    Series::new(vec![PricePoint::new(ts, rate)?])
}

fn parse_entry(index: usize, item: &Value) -> Result<PricePoint, DataError> {
    let malformed = |what: &str| DataError::Malformed(format!("entry {}: {}", index, what));

    match item {
        Value::Array(pair) => {
            if pair.len() < 2 {
                return Err(malformed("expected [timestamp, price]"));
            }
            let ts = as_millis(&pair[0]).ok_or_else(|| malformed("timestamp is not a number"))?;
            let price = pair[1].as_f64().ok_or_else(|| malformed("price is not a number"))?;
            PricePoint::new(ts, price)
        }
        Value::Object(obj) => {
            let date = obj
                .get("date")
                .and_then(Value::as_str)
                .ok_or_else(|| malformed("missing 'date'"))?;
            let ts = parse_bpi_date(date).ok_or_else(|| malformed("unparseable 'date'"))?;
            let price = obj
                .get("price")
                .and_then(Value::as_f64)
                .ok_or_else(|| malformed("missing 'price'"))?;
            PricePoint::new(ts, price)
        }
        _ => Err(malformed("expected a pair or an object")),
    }
}

fn as_millis(value: &Value) -> Option<i64> {
    value.as_i64().or_else(|| value.as_f64().map(|f| f as i64))
}

/// Dates in proxied history are UTC, minute or second precision, or a bare day
fn parse_bpi_date(date: &str) -> Option<i64> {
    let date = date.trim();
    NaiveDateTime::parse_from_str(date, "%Y-%m-%d %H:%M")
        .or_else(|_| NaiveDateTime::parse_from_str(date, "%Y-%m-%d %H:%M:%S"))
        .ok()
        .or_else(|| {
            NaiveDate::parse_from_str(date, "%Y-%m-%d")
                .ok()
                .and_then(|d| d.and_hms_opt(0, 0, 0))
        })
        .map(|dt| dt.and_utc().timestamp_millis())
}
