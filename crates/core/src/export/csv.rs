//! CSV rendering for estimates and reports.

use crate::error::{CoreError, CoreResult};
use crate::export::{EstimateView, ReportRowView};

fn finish(writer: csv::Writer<Vec<u8>>) -> CoreResult<String> {
    let bytes = writer
        .into_inner()
        .map_err(|e| CoreError::Internal(format!("CSV buffer error: {e}")))?;
    String::from_utf8(bytes).map_err(|e| CoreError::Internal(format!("CSV encoding error: {e}")))
}

/// Render an estimate's line items as CSV, with a totals block at the end.
pub fn estimate_csv(estimate: &EstimateView) -> CoreResult<String> {
    let mut writer = csv::Writer::from_writer(Vec::new());

    writer
        .write_record(["Item", "Category", "Unit", "Quantity", "Unit Price", "Total", "Notes"])
        .map_err(|e| CoreError::Internal(format!("CSV write error: {e}")))?;

    for item in &estimate.items {
        writer
            .write_record([
                item.name.as_str(),
                item.category.as_deref().unwrap_or(""),
                item.unit.as_str(),
                &format!("{}", item.quantity),
                &format!("{:.2}", item.unit_price),
                &format!("{:.2}", item.total),
                item.notes.as_deref().unwrap_or(""),
            ])
            .map_err(|e| CoreError::Internal(format!("CSV write error: {e}")))?;
    }

    for (label, value) in [
        ("Subtotal", estimate.subtotal),
        ("Tax", estimate.tax_amount),
        ("Total", estimate.total),
    ] {
        writer
            .write_record([label, "", "", "", "", &format!("{value:.2}"), ""])
            .map_err(|e| CoreError::Internal(format!("CSV write error: {e}")))?;
    }

    finish(writer)
}

/// Render a report's per-project rows as CSV.
pub fn report_csv(rows: &[ReportRowView]) -> CoreResult<String> {
    let mut writer = csv::Writer::from_writer(Vec::new());

    writer
        .write_record([
            "Project", "Budget", "Expenses", "Remaining", "Status", "Progress", "Start Date",
            "End Date",
        ])
        .map_err(|e| CoreError::Internal(format!("CSV write error: {e}")))?;

    for row in rows {
        writer
            .write_record([
                row.project_name.as_str(),
                &format!("{:.2}", row.budget),
                &format!("{:.2}", row.expenses),
                &format!("{:.2}", row.remaining()),
                row.status.as_str(),
                &format!("{}%", row.progress),
                &row.start_date.map(|d| d.to_string()).unwrap_or_default(),
                &row.end_date.map(|d| d.to_string()).unwrap_or_default(),
            ])
            .map_err(|e| CoreError::Internal(format!("CSV write error: {e}")))?;
    }

    finish(writer)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::export::EstimateLineView;
    use chrono::NaiveDate;

    fn view() -> EstimateView {
        EstimateView {
            name: "Kitchen remodel".into(),
            status: "draft".into(),
            created_date: NaiveDate::from_ymd_opt(2025, 4, 2).unwrap(),
            items: vec![EstimateLineView {
                name: "Wall framing, \"standard\"".into(),
                category: Some("FRAMING & ROUGH CARPENTRY".into()),
                unit: "LF".into(),
                quantity: 10.0,
                unit_price: 14.5,
                total: 145.0,
                notes: None,
            }],
            subtotal: 145.0,
            tax_rate: 0.08,
            tax_amount: 11.6,
            total: 156.6,
        }
    }

    #[test]
    fn estimate_csv_has_header_items_and_totals() {
        let out = estimate_csv(&view()).unwrap();
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines[0], "Item,Category,Unit,Quantity,Unit Price,Total,Notes");
        // Embedded quotes must be escaped, not mangled.
        assert!(lines[1].contains("\"Wall framing, \"\"standard\"\"\""));
        assert!(lines.iter().any(|l| l.starts_with("Total,")));
        assert_eq!(lines.len(), 5);
    }

    #[test]
    fn report_csv_computes_remaining() {
        let rows = vec![ReportRowView {
            project_name: "Maple St".into(),
            budget: 100000.0,
            expenses: 40000.5,
            status: "active".into(),
            progress: 35,
            start_date: NaiveDate::from_ymd_opt(2025, 1, 15),
            end_date: None,
        }];
        let out = report_csv(&rows).unwrap();
        assert!(out.contains("Maple St,100000.00,40000.50,59999.50,active,35%,2025-01-15,"));
    }
}
