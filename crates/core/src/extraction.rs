//! Recovery of structured data from LLM response text.
//!
//! Model responses are plain text that should contain JSON but often
//! arrives wrapped in markdown fences, preceded by prose, or in a legacy
//! shape. Everything here is lenient by contract: receipt extraction
//! degrades to a zero-confidence fallback instead of failing.

use std::sync::LazyLock;

use chrono::NaiveDate;
use regex::Regex;
use serde_json::Value;

use crate::categories;

// ---------------------------------------------------------------------------
// Fence stripping
// ---------------------------------------------------------------------------

/// Strip a surrounding markdown code fence (```json ... ``` or ``` ... ```)
/// from a model response, if present.
pub fn strip_code_fences(text: &str) -> &str {
    let trimmed = text.trim();
    let body = if let Some(rest) = trimmed.strip_prefix("```json") {
        rest
    } else if let Some(rest) = trimmed.strip_prefix("```") {
        rest
    } else {
        return trimmed;
    };
    body.strip_suffix("```").unwrap_or(body).trim()
}

// ---------------------------------------------------------------------------
// Generated-items payload recovery
// ---------------------------------------------------------------------------

static ITEMS_OBJECT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"(?s)\{\s*"items".*\}"#).expect("valid regex"));
static BARE_ARRAY_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)\[\s*\{.*\}\s*\]").expect("valid regex"));

/// Recover the generated-items array from estimate-generation output.
///
/// Prefers the current `{"items": [...]}` object shape; falls back to
/// the legacy bare-array shape. Returns `None` when neither parses.
pub fn recover_items_array(text: &str) -> Option<Vec<Value>> {
    let text = strip_code_fences(text);

    if let Some(m) = ITEMS_OBJECT_RE.find(text) {
        if let Ok(Value::Object(obj)) = serde_json::from_str::<Value>(m.as_str()) {
            if let Some(Value::Array(items)) = obj.get("items").cloned() {
                return Some(items);
            }
        }
    }

    let m = BARE_ARRAY_RE.find(text)?;
    match serde_json::from_str::<Value>(m.as_str()) {
        Ok(Value::Array(items)) => Some(items),
        _ => None,
    }
}

// ---------------------------------------------------------------------------
// Receipt field coercion
// ---------------------------------------------------------------------------

/// Fields extracted from a receipt image, post-coercion.
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct ReceiptFields {
    pub store: String,
    pub amount: f64,
    pub date: NaiveDate,
    pub category: String,
    pub items: String,
    /// Model-reported confidence, 0-100. Zero means "enter manually".
    pub confidence: i32,
}

impl ReceiptFields {
    /// The zero-confidence fallback returned when the model response
    /// cannot be parsed: empty store, zero amount, today's date, the
    /// first category of the classification list.
    pub fn fallback(today: NaiveDate, categories: &[&str]) -> Self {
        Self {
            store: String::new(),
            amount: 0.0,
            date: today,
            category: fallback_category(categories).to_string(),
            items: String::new(),
            confidence: 0,
        }
    }
}

fn fallback_category<'c>(category_list: &[&'c str]) -> &'c str {
    category_list.first().copied().unwrap_or_else(|| categories::default_category())
}

/// Amounts arrive as JSON numbers or as strings ("123.45", "$123.45").
fn coerce_amount(value: Option<&Value>) -> f64 {
    match value {
        Some(Value::Number(n)) => n.as_f64().unwrap_or(0.0),
        Some(Value::String(s)) => s.trim().trim_start_matches('$').replace(',', "").parse().unwrap_or(0.0),
        _ => 0.0,
    }
}

fn coerce_string(value: Option<&Value>) -> String {
    match value {
        Some(Value::String(s)) => s.clone(),
        _ => String::new(),
    }
}

/// Parse a model response into [`ReceiptFields`].
///
/// `categories` is the classification list that was embedded in the
/// prompt; a category outside it degrades to the list's first entry.
/// Returns `None` only when the text contains no parseable JSON object at
/// all; individual fields degrade independently (unparseable date ->
/// `today`, unknown category -> first, missing confidence -> 0).
pub fn parse_receipt_fields(
    text: &str,
    today: NaiveDate,
    categories: &[&str],
) -> Option<ReceiptFields> {
    let stripped = strip_code_fences(text);
    let value: Value = serde_json::from_str(stripped).ok()?;
    let obj = value.as_object()?;

    let date = match obj.get("date") {
        Some(Value::String(s)) => NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap_or(today),
        _ => today,
    };

    let category = match obj.get("category") {
        Some(Value::String(s)) if categories.contains(&s.as_str()) => s.clone(),
        _ => fallback_category(categories).to_string(),
    };

    let confidence = obj
        .get("confidence")
        .and_then(Value::as_i64)
        .unwrap_or(0)
        .clamp(0, 100) as i32;

    Some(ReceiptFields {
        store: coerce_string(obj.get("store")),
        amount: coerce_amount(obj.get("amount")),
        date,
        category,
        items: coerce_string(obj.get("items")),
        confidence,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::categories::EXPENSE_CATEGORIES;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 6, 1).unwrap()
    }

    #[test]
    fn strips_json_fences() {
        assert_eq!(strip_code_fences("```json\n{\"a\":1}\n```"), "{\"a\":1}");
        assert_eq!(strip_code_fences("```\n[1,2]\n```"), "[1,2]");
        assert_eq!(strip_code_fences("  {\"a\":1}  "), "{\"a\":1}");
    }

    #[test]
    fn recovers_object_shape() {
        let text = "Here you go:\n{\"items\": [{\"priceListItemId\": 3, \"quantity\": 2}]}";
        let items = recover_items_array(text).unwrap();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0]["priceListItemId"], 3);
    }

    #[test]
    fn recovers_legacy_array_shape() {
        let text = "[{\"priceListItemId\": 1, \"quantity\": 4.5}]";
        let items = recover_items_array(text).unwrap();
        assert_eq!(items.len(), 1);
    }

    #[test]
    fn unparseable_items_yield_none() {
        assert!(recover_items_array("sorry, I cannot help with that").is_none());
        assert!(recover_items_array("{\"items\": \"oops\"}").is_none());
    }

    #[test]
    fn parses_well_formed_receipt() {
        let text = r#"{"store":"Home Depot","amount":234.56,"date":"2025-05-30","category":"ELECTRICAL","items":"wire, breakers","confidence":92}"#;
        let fields = parse_receipt_fields(text, today(), &EXPENSE_CATEGORIES).unwrap();
        assert_eq!(fields.store, "Home Depot");
        assert_eq!(fields.amount, 234.56);
        assert_eq!(fields.date, NaiveDate::from_ymd_opt(2025, 5, 30).unwrap());
        assert_eq!(fields.category, "ELECTRICAL");
        assert_eq!(fields.confidence, 92);
    }

    #[test]
    fn coerces_string_amount_and_fenced_response() {
        let text = "```json\n{\"store\":\"Lowes\",\"amount\":\"$1,203.40\",\"confidence\":70}\n```";
        let fields = parse_receipt_fields(text, today(), &EXPENSE_CATEGORIES).unwrap();
        assert_eq!(fields.amount, 1203.40);
        // Missing date falls back to today; missing category to the default.
        assert_eq!(fields.date, today());
        assert_eq!(fields.category, "PRE-CONSTRUCTION");
    }

    #[test]
    fn unknown_category_degrades_to_first_entry() {
        let text = r#"{"store":"X","amount":1,"category":"UNDERWATER BASKETRY"}"#;
        let fields = parse_receipt_fields(text, today(), &EXPENSE_CATEGORIES).unwrap();
        assert_eq!(fields.category, "PRE-CONSTRUCTION");

        // A custom category list falls back to its own first entry.
        let fields = parse_receipt_fields(text, today(), &["MATERIALS", "LABOR"]).unwrap();
        assert_eq!(fields.category, "MATERIALS");
    }

    #[test]
    fn prose_response_is_none_and_fallback_is_zeroed() {
        let parsed = parse_receipt_fields("I could not read this image.", today(), &EXPENSE_CATEGORIES);
        assert!(parsed.is_none());
        let fallback = ReceiptFields::fallback(today(), &EXPENSE_CATEGORIES);
        assert_eq!(fallback.amount, 0.0);
        assert_eq!(fallback.confidence, 0);
        assert_eq!(fallback.date, today());
    }
}
