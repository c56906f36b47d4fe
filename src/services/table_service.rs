use crate::models::dashboard::TABLE_TARGET;
use crate::models::{Delta, DisplayRow, Document, Series};
use crate::utils::errors::RenderError;
use crate::utils::format::format_long;
use crate::utils::table::{Align, Table};
use tracing::debug;

/// Build table rows in series order, each colored against the row above it
pub fn build_rows(series: &Series) -> Vec<DisplayRow> {
    let mut previous: Option<f64> = None;

    series
        .iter()
        .map(|point| {
            let row = DisplayRow {
                label: format_long(point.timestamp_millis()),
                price: point.price(),
                delta: Delta::between(previous, point.price()),
            };
            previous = Some(point.price());
            row
        })
        .collect()
}

/// Replace the contents of the price table with `series`.
///
/// Rendering the same series twice leaves the same rows, never duplicates.
pub fn render(series: &Series, document: &mut Document) -> Result<(), RenderError> {
    let body = document
        .table_body
        .as_mut()
        .ok_or(RenderError::TargetMissing(TABLE_TARGET))?;

    body.rows = build_rows(series);
    debug!("Rendered {} table rows", body.rows.len());
    Ok(())
}

/// Plain-text version of the table, for terminal output
pub fn render_text(rows: &[DisplayRow]) -> String {
    let mut table = Table::new(&["Date", "Price (USD)", ""]).align(1, Align::Right);
    for row in rows {
        table.add_row(vec![
            row.label.clone(),
            row.price_text(),
            row.delta.arrow().to_string(),
        ]);
    }
    table.render()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::PricePoint;

    fn series(prices: &[f64]) -> Series {
        Series::new(
            prices
                .iter()
                .enumerate()
                .map(|(i, &p)| PricePoint::new(1_700_000_000_000 + i as i64 * 3_600_000, p).unwrap())
                .collect(),
        )
        .unwrap()
    }

    #[test]
    fn test_delta_classes() {
        let rows = build_rows(&series(&[100.0, 90.0, 90.0, 120.0]));
        let deltas: Vec<Delta> = rows.iter().map(|r| r.delta).collect();
        assert_eq!(deltas, vec![Delta::Neutral, Delta::Down, Delta::Neutral, Delta::Up]);

        let classes: Vec<&str> = rows.iter().map(|r| r.delta.css_class()).collect();
        assert_eq!(classes, vec!["", "price-down", "", "price-up"]);
    }

    #[test]
    fn test_first_row_is_neutral() {
        let rows = build_rows(&series(&[5.0]));
        assert_eq!(rows[0].delta, Delta::Neutral);
    }

    #[test]
    fn test_rows_keep_series_order_and_format_prices() {
        let rows = build_rows(&series(&[42000.0, 43000.5]));
        assert!(rows[0].label < rows[1].label);
        assert_eq!(rows[0].price_text(), "$42,000.00");
        assert_eq!(rows[1].price_text(), "$43,000.50");
    }

    #[test]
    fn test_render_is_idempotent() {
        let s = series(&[1.0, 2.0, 3.0]);
        let mut document = Document::standard();

        render(&s, &mut document).unwrap();
        let first = document.clone();
        render(&s, &mut document).unwrap();

        assert_eq!(document, first);
        assert_eq!(document.table_body.unwrap().rows.len(), 3);
    }

    #[test]
    fn test_missing_table_target() {
        let mut document = Document {
            table_body: None,
            ..Document::standard()
        };
        assert_eq!(
            render(&series(&[1.0]), &mut document),
            Err(RenderError::TargetMissing("bpi-body"))
        );
    }

    #[test]
    fn test_render_text() {
        let text = render_text(&build_rows(&series(&[100.0, 90.0])));
        assert!(text.contains("$100.00"));
        assert!(text.contains("$90.00 | ▼"));
        assert_eq!(text.lines().count(), 4);
    }
}
