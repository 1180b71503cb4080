//! Client-facing HTML estimate document.
//!
//! Produces a self-contained printable page: company header, line items
//! grouped by category, totals block. Used for the email/share flow.

use std::collections::BTreeMap;
use std::fmt::Write;

use crate::export::{EstimateLineView, EstimateView};

const UNCATEGORIZED: &str = "OTHER";

fn escape(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

/// Render an estimate as a standalone HTML document.
pub fn estimate_html(estimate: &EstimateView, company_name: &str) -> String {
    // Group line items by category, preserving category name order.
    let mut grouped: BTreeMap<&str, Vec<&EstimateLineView>> = BTreeMap::new();
    for item in &estimate.items {
        grouped
            .entry(item.category.as_deref().unwrap_or(UNCATEGORIZED))
            .or_default()
            .push(item);
    }

    let mut body = String::new();
    for (category, items) in &grouped {
        let _ = write!(
            body,
            "<div class=\"category\">{}</div>\n<table>\n<thead><tr><th>Item</th><th>Qty</th><th>Unit</th><th>Unit Price</th><th>Total</th></tr></thead>\n<tbody>\n",
            escape(category)
        );
        for item in items {
            let _ = write!(
                body,
                "<tr><td>{}</td><td>{}</td><td>{}</td><td>${:.2}</td><td>${:.2}</td></tr>\n",
                escape(&item.name),
                item.quantity,
                escape(&item.unit),
                item.unit_price,
                item.total,
            );
        }
        body.push_str("</tbody>\n</table>\n");
    }

    format!(
        r#"<!DOCTYPE html>
<html>
<head>
<meta charset="utf-8">
<title>Estimate - {name}</title>
<style>
body {{ font-family: -apple-system, 'Segoe UI', Roboto, Arial, sans-serif; font-size: 12px; color: #1f2937; padding: 20px; }}
.container {{ max-width: 800px; margin: 0 auto; }}
.header {{ display: flex; justify-content: space-between; border-bottom: 2px solid #e5e7eb; padding-bottom: 16px; margin-bottom: 24px; }}
.header h1 {{ font-size: 22px; }}
.header .meta {{ text-align: right; color: #6b7280; }}
.header .meta h2 {{ color: #2563eb; font-size: 18px; }}
.category {{ font-weight: 600; background: #f3f4f6; padding: 6px 8px; margin-top: 16px; }}
table {{ width: 100%; border-collapse: collapse; }}
th, td {{ text-align: left; padding: 6px 8px; border-bottom: 1px solid #e5e7eb; }}
.totals {{ margin-top: 24px; margin-left: auto; width: 260px; }}
.totals .row {{ display: flex; justify-content: space-between; padding: 4px 0; }}
.totals .grand {{ border-top: 2px solid #e5e7eb; font-weight: 700; color: #2563eb; }}
@media print {{ body {{ padding: 0; }} }}
</style>
</head>
<body>
<div class="container">
<div class="header">
<div><h1>{company}</h1></div>
<div class="meta"><h2>ESTIMATE</h2><p>{name}</p><p>Date: {date}</p><p>Status: {status}</p></div>
</div>
{body}
<div class="totals">
<div class="row"><span>Subtotal</span><span>${subtotal:.2}</span></div>
<div class="row"><span>Tax ({tax_pct:.2}%)</span><span>${tax:.2}</span></div>
<div class="row grand"><span>Total</span><span>${total:.2}</span></div>
</div>
</div>
</body>
</html>
"#,
        name = escape(&estimate.name),
        company = escape(company_name),
        date = estimate.created_date.format("%m/%d/%Y"),
        status = escape(&estimate.status),
        body = body,
        subtotal = estimate.subtotal,
        tax_pct = estimate.tax_rate * 100.0,
        tax = estimate.tax_amount,
        total = estimate.total,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn renders_grouped_items_and_totals() {
        let view = EstimateView {
            name: "Bath <remodel>".into(),
            status: "sent".into(),
            created_date: NaiveDate::from_ymd_opt(2025, 4, 2).unwrap(),
            items: vec![
                EstimateLineView {
                    name: "Tile floor".into(),
                    category: Some("FLOORING".into()),
                    unit: "SF".into(),
                    quantity: 80.0,
                    unit_price: 6.5,
                    total: 520.0,
                    notes: None,
                },
                EstimateLineView {
                    name: "Haul away".into(),
                    category: None,
                    unit: "EA".into(),
                    quantity: 1.0,
                    unit_price: 150.0,
                    total: 150.0,
                    notes: None,
                },
            ],
            subtotal: 670.0,
            tax_rate: 0.0825,
            tax_amount: 55.28,
            total: 725.28,
        };

        let html = estimate_html(&view, "Legacy Prime Construction");
        assert!(html.contains("Bath &lt;remodel&gt;"));
        assert!(html.contains("<div class=\"category\">FLOORING</div>"));
        assert!(html.contains("<div class=\"category\">OTHER</div>"));
        assert!(html.contains("Tax (8.25%)"));
        assert!(html.contains("$725.28"));
    }
}
