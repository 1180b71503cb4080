//! In-memory price catalog used for AI estimate generation.
//!
//! The catalog is loaded from the price-list table, embedded (truncated)
//! into the generation system prompt, and used afterwards to validate
//! and reprice the items the model returns. Generated rows referencing
//! unknown catalog IDs are dropped, not errored.

use std::collections::HashMap;

use serde_json::Value;

use crate::estimate;
use crate::types::DbId;

/// Cap on the number of catalog entries embedded in the system prompt.
pub const MAX_PROMPT_ITEMS: usize = 120;

/// One catalog entry, as seen by the generation flow.
#[derive(Debug, Clone, serde::Serialize)]
pub struct CatalogItem {
    pub id: DbId,
    pub category: String,
    pub name: String,
    pub unit: String,
    pub unit_price: f64,
}

/// A generated line item after validation against the catalog.
#[derive(Debug, Clone, serde::Serialize)]
pub struct PricedItem {
    pub price_list_item_id: DbId,
    pub name: String,
    pub unit: String,
    pub quantity: f64,
    pub unit_price: f64,
    pub total: f64,
    pub notes: Option<String>,
}

/// Price catalog with O(1) ID lookup.
#[derive(Debug, Default)]
pub struct PriceCatalog {
    items: Vec<CatalogItem>,
    by_id: HashMap<DbId, usize>,
}

impl PriceCatalog {
    pub fn new(items: Vec<CatalogItem>) -> Self {
        let by_id = items
            .iter()
            .enumerate()
            .map(|(idx, item)| (item.id, idx))
            .collect();
        Self { items, by_id }
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn get(&self, id: DbId) -> Option<&CatalogItem> {
        self.by_id.get(&id).map(|&idx| &self.items[idx])
    }

    /// Render the catalog as prompt lines, truncated to
    /// [`MAX_PROMPT_ITEMS`] entries.
    ///
    /// One line per entry: `id | category | name | unit | unit price`.
    pub fn prompt_lines(&self) -> String {
        self.items
            .iter()
            .take(MAX_PROMPT_ITEMS)
            .map(|item| {
                format!(
                    "{} | {} | {} | {} | ${:.2}",
                    item.id, item.category, item.name, item.unit, item.unit_price
                )
            })
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Validate and reprice raw generated items.
    ///
    /// Each element is expected to look like
    /// `{"priceListItemId": 3, "quantity": 2.5, "notes": "..."}`. Rows
    /// with a missing/unknown ID or a non-positive quantity are dropped.
    /// Unit prices always come from the catalog, never from the model.
    pub fn reconcile(&self, raw_items: &[Value]) -> Vec<PricedItem> {
        raw_items
            .iter()
            .filter_map(|raw| {
                let id = raw
                    .get("priceListItemId")
                    .or_else(|| raw.get("price_list_item_id"))
                    .and_then(Value::as_i64)?;
                let entry = self.get(id)?;
                let quantity = raw.get("quantity").and_then(Value::as_f64).unwrap_or(1.0);
                if quantity <= 0.0 {
                    return None;
                }
                let notes = raw
                    .get("notes")
                    .and_then(Value::as_str)
                    .map(str::to_string);
                Some(PricedItem {
                    price_list_item_id: entry.id,
                    name: entry.name.clone(),
                    unit: entry.unit.clone(),
                    quantity,
                    unit_price: entry.unit_price,
                    total: estimate::line_total(quantity, entry.unit_price, None),
                    notes,
                })
            })
            .collect()
    }
}
