//! AI estimate generation: catalog-grounded line items from free text.
//!
//! The system prompt embeds a truncated price catalog; the model answers
//! with catalog item IDs and quantities. Rows referencing unknown IDs
//! are dropped, prices always come from the catalog, and when the user's
//! text names a budget the item list is trimmed from the tail until the
//! total fits within tolerance.

use siteledger_core::estimate::{extract_budget, fit_to_budget};
use siteledger_core::extraction::recover_items_array;
use siteledger_core::pricing::{PriceCatalog, PricedItem};

use crate::client::{LlmClient, LlmError};
use crate::messages::{ChatMessage, ChatRequest};

const MAX_TOKENS: u32 = 2048;
const TEMPERATURE: f32 = 0.3;

/// Errors from the generation flow.
#[derive(Debug, thiserror::Error)]
pub enum GenerateError {
    #[error(transparent)]
    Llm(#[from] LlmError),

    /// The model response contained no recoverable items payload.
    #[error("Failed to parse AI response")]
    Unparseable,
}

/// Outcome of one generation request.
#[derive(Debug, Clone)]
pub struct GenerationOutcome {
    /// Validated, repriced items in model order (post-trim).
    pub items: Vec<PricedItem>,
    /// Budget figure extracted from the user's text, if any.
    pub budget: Option<f64>,
    /// Number of items dropped by budget fitting.
    pub trimmed: usize,
}

/// Build the generation system prompt around the price catalog.
pub fn system_prompt(catalog: &PriceCatalog) -> String {
    format!(
        r#"You are an expert construction estimator. Given a project description, select appropriate line items from the price list below and estimate realistic quantities.

Price list (id | category | name | unit | unit price):
{}

Rules:
- Only use items from the price list above, referenced by their id.
- Estimate quantities from the description; use industry-standard coverage rates.
- Order items by construction phase.

Respond ONLY with valid JSON in this exact format:
{{"items": [{{"priceListItemId": 1, "quantity": 2.5, "notes": "optional note"}}]}}"#,
        catalog.prompt_lines()
    )
}

/// Generate estimate line items for a free-text request (optionally with
/// plan/photo image URLs attached).
pub async fn generate_items(
    client: &LlmClient,
    catalog: &PriceCatalog,
    user_text: &str,
    image_urls: Vec<String>,
) -> Result<GenerationOutcome, GenerateError> {
    let user_message = if image_urls.is_empty() {
        ChatMessage::user(user_text)
    } else {
        ChatMessage::user_with_images(user_text, image_urls)
    };

    let request = ChatRequest {
        model: client.model().to_string(),
        messages: vec![ChatMessage::system(system_prompt(catalog)), user_message],
        max_tokens: MAX_TOKENS,
        temperature: TEMPERATURE,
        tools: None,
    };

    let response = client.chat(&request).await?;
    let content = response.content().ok_or(LlmError::EmptyResponse)?;

    let raw_items = recover_items_array(content).ok_or(GenerateError::Unparseable)?;
    let items = catalog.reconcile(&raw_items);
    tracing::info!(
        generated = raw_items.len(),
        valid = items.len(),
        "Generated estimate items",
    );

    Ok(apply_budget(items, user_text))
}

/// Trim validated items against a budget extracted from the user's text.
fn apply_budget(items: Vec<PricedItem>, user_text: &str) -> GenerationOutcome {
    let budget = extract_budget(user_text);
    let Some(figure) = budget else {
        return GenerationOutcome {
            items,
            budget: None,
            trimmed: 0,
        };
    };

    let totals: Vec<f64> = items.iter().map(|i| i.total).collect();
    let keep = fit_to_budget(&totals, figure);
    let trimmed = items.len() - keep;
    if trimmed > 0 {
        tracing::info!(budget = figure, trimmed, "Trimmed items to fit budget");
    }

    let mut items = items;
    items.truncate(keep);
    GenerationOutcome {
        items,
        budget,
        trimmed,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::prelude::*;
    use siteledger_core::pricing::CatalogItem;

    use crate::client::LlmConfig;

    fn catalog() -> PriceCatalog {
        PriceCatalog::new(vec![
            CatalogItem {
                id: 1,
                category: "DEMOLITION".into(),
                name: "Demo interior walls".into(),
                unit: "SF".into(),
                unit_price: 3.0,
            },
            CatalogItem {
                id: 2,
                category: "DRYWALL".into(),
                name: "Hang and finish drywall".into(),
                unit: "SF".into(),
                unit_price: 2.0,
            },
        ])
    }

    fn client_for(server: &MockServer) -> LlmClient {
        LlmClient::new(LlmConfig {
            base_url: format!("{}/v1", server.base_url()),
            api_key: "k".into(),
            model: "gpt-4o".into(),
        })
    }

    #[test]
    fn system_prompt_embeds_catalog_lines() {
        let prompt = system_prompt(&catalog());
        assert!(prompt.contains("1 | DEMOLITION | Demo interior walls | SF | $3.00"));
        assert!(prompt.contains("\"items\""));
    }

    #[tokio::test]
    async fn generates_and_reconciles_items() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(POST).path("/v1/chat/completions");
            then.status(200).json_body(serde_json::json!({
                "choices": [{"message": {"content":
                    "{\"items\": [{\"priceListItemId\": 1, \"quantity\": 100}, {\"priceListItemId\": 7, \"quantity\": 5}]}"
                }}]
            }));
        });

        let outcome = generate_items(&client_for(&server), &catalog(), "demo the kitchen", vec![])
            .await
            .unwrap();

        // The unknown id 7 is dropped; id 1 is repriced from the catalog.
        assert_eq!(outcome.items.len(), 1);
        assert_eq!(outcome.items[0].total, 300.0);
        assert_eq!(outcome.budget, None);
    }

    #[tokio::test]
    async fn budget_in_text_trims_the_tail() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(POST).path("/v1/chat/completions");
            then.status(200).json_body(serde_json::json!({
                "choices": [{"message": {"content":
                    "{\"items\": [{\"priceListItemId\": 1, \"quantity\": 100}, {\"priceListItemId\": 2, \"quantity\": 100}]}"
                }}]
            }));
        });

        // Items total 500; a $300 budget caps at 330, so the tail goes.
        let outcome = generate_items(
            &client_for(&server),
            &catalog(),
            "demo and drywall, budget of $300",
            vec![],
        )
        .await
        .unwrap();

        assert_eq!(outcome.budget, Some(300.0));
        assert_eq!(outcome.items.len(), 1);
        assert_eq!(outcome.trimmed, 1);
    }

    #[tokio::test]
    async fn prose_response_is_unparseable() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(POST).path("/v1/chat/completions");
            then.status(200).json_body(serde_json::json!({
                "choices": [{"message": {"content": "I need more details first."}}]
            }));
        });

        let err = generate_items(&client_for(&server), &catalog(), "??", vec![])
            .await
            .unwrap_err();
        assert!(matches!(err, GenerateError::Unparseable));
    }
}
