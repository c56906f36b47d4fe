use crate::models::dashboard::{CHART_TARGET, STATUS_TARGET, TABLE_TARGET};
use crate::models::{ChartView, Document};
use crate::services::chart_service;
use std::fmt::Write;
use tracing::warn;

/// Escape text for HTML element content and attribute values
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}

/// Render the dashboard page. Targets missing from the document are left out.
pub fn render_page(document: &Document) -> String {
    let mut html = String::from(concat!(
        "<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n",
        "<meta charset=\"utf-8\">\n",
        "<meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">\n",
        "<title>Bitcoin Price Tracker</title>\n",
        "<link rel=\"stylesheet\" href=\"/static/style.css\">\n",
        "</head>\n<body>\n<main>\n",
        "<h1>Bitcoin Price Tracker</h1>\n",
        "<nav class=\"controls\">",
        "<a id=\"btn-live\" class=\"button\" href=\"/view/live\">Live Price</a>",
        "<a id=\"btn-30d\" class=\"button\" href=\"/view/history\">Last 30 Days</a>",
        "</nav>\n",
    ));

    if let Some(status) = &document.status {
        let _ = writeln!(
            html,
            "<p id=\"{}\" class=\"status {}\">{}</p>",
            STATUS_TARGET,
            status.style.css_class(),
            escape_html(&status.text)
        );
    }

    if let Some(canvas) = &document.chart_canvas {
        let _ = write!(html, "<section id=\"{}\" class=\"chart\">", CHART_TARGET);
        if let Some(chart) = &canvas.chart {
            html.push_str(&render_chart(chart));
        }
        html.push_str("</section>\n");
    }

    if let Some(body) = &document.table_body {
        html.push_str("<table class=\"prices\">\n<thead><tr><th>Date</th><th>Price (USD)</th></tr></thead>\n");
        let _ = writeln!(html, "<tbody id=\"{}\">", TABLE_TARGET);
        for row in &body.rows {
            let _ = writeln!(
                html,
                "<tr><td class=\"date-cell\">{}</td><td class=\"{}\">{}</td></tr>",
                escape_html(&row.label),
                row.delta.css_class(),
                escape_html(&row.price_text())
            );
        }
        html.push_str("</tbody>\n</table>\n");
    }

    html.push_str("</main>\n</body>\n</html>\n");
    html
}

/// SVG plot followed by the per-point tooltips
fn render_chart(chart: &ChartView) -> String {
    let mut html = String::new();

    match chart_service::draw_svg(chart) {
        Ok(svg) => html.push_str(&svg),
        Err(e) => {
            warn!("Chart drawing failed, showing points only: {}", e);
            let _ = write!(html, "<h2>{}</h2>", escape_html(&chart.title));
        }
    }

    html.push_str("<ol class=\"chart-points\">");
    for point in &chart.points {
        let _ = write!(
            html,
            "<li title=\"{}\">{}</li>",
            escape_html(&point.tooltip),
            escape_html(&point.label)
        );
    }
    html.push_str("</ol>");
    html
}
