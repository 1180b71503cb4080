//! Receipt analysis: one vision request, lenient parse, best-effort
//! fallback.
//!
//! The contract is explicitly best-effort: an unreadable model response
//! is not an error. Callers get the zero-confidence fallback fields plus
//! the raw response so the user can enter the receipt manually.

use chrono::NaiveDate;
use siteledger_core::extraction::{self, ReceiptFields};

use crate::client::{LlmClient, LlmError};
use crate::messages::{ChatMessage, ChatRequest, Usage};

const MAX_TOKENS: u32 = 1000;
const TEMPERATURE: f32 = 0.2;

/// Result of analyzing one receipt image.
#[derive(Debug, Clone)]
pub struct ReceiptAnalysis {
    pub fields: ReceiptFields,
    /// True when the model response could not be parsed and `fields`
    /// holds the fallback values.
    pub parse_failed: bool,
    /// Raw model response, kept only on parse failure for diagnostics.
    pub raw_response: Option<String>,
    pub usage: Option<Usage>,
}

/// Build the fixed extraction prompt with the category list embedded.
pub fn extraction_prompt(categories: &[&str]) -> String {
    let category_lines = categories
        .iter()
        .map(|c| format!("   - {c}"))
        .collect::<Vec<_>>()
        .join("\n");

    format!(
        r#"You are an expert at analyzing receipts and invoices for construction expense tracking.

Analyze this receipt/invoice image and extract the following information:

1. Store/Vendor Name: The name of the store or vendor
2. Total Amount: The total amount on the receipt (look for "Total", "Grand Total", "Amount Due", etc.)
3. Date: The date of the transaction (in ISO format YYYY-MM-DD if possible)
4. Category: Based on the items purchased, classify into one of these construction categories:
{category_lines}

5. Items: Brief description of the main items purchased (if visible)
6. Confidence: Your confidence level in the extraction (0-100)

IMPORTANT:
- Look carefully at the receipt for the total amount
- If multiple totals are shown, use the final/grand total
- For the category, consider what the items are used for in construction
- Hardware store receipts should be categorized by the primary items purchased

Respond ONLY with valid JSON in this exact format:
{{
  "store": "Store Name",
  "amount": 123.45,
  "date": "2024-01-15",
  "category": "CATEGORY_NAME",
  "items": "Brief description of items",
  "confidence": 85
}}

If you cannot read the receipt clearly, still provide your best estimate with a lower confidence score.
Start your response with {{ and end with }}."#
    )
}

/// Analyze a receipt image (an `https://` URL or a base64 data URL).
///
/// Transport and API failures are returned as [`LlmError`]; an
/// unparseable model response is returned as a successful
/// [`ReceiptAnalysis`] with `parse_failed` set.
pub async fn analyze_receipt(
    client: &LlmClient,
    image: &str,
    categories: &[&str],
    today: NaiveDate,
) -> Result<ReceiptAnalysis, LlmError> {
    let request = ChatRequest {
        model: client.model().to_string(),
        messages: vec![ChatMessage::user_with_images(
            extraction_prompt(categories),
            vec![image.to_string()],
        )],
        max_tokens: MAX_TOKENS,
        temperature: TEMPERATURE,
        tools: None,
    };

    let response = client.chat(&request).await?;
    let content = response.content().ok_or(LlmError::EmptyResponse)?;

    match extraction::parse_receipt_fields(content, today, categories) {
        Some(fields) => {
            tracing::info!(
                store = %fields.store,
                amount = fields.amount,
                confidence = fields.confidence,
                "Receipt extracted",
            );
            Ok(ReceiptAnalysis {
                fields,
                parse_failed: false,
                raw_response: None,
                usage: response.usage,
            })
        }
        None => {
            tracing::warn!("Receipt response could not be parsed, returning fallback");
            Ok(ReceiptAnalysis {
                fields: ReceiptFields::fallback(today, categories),
                parse_failed: true,
                raw_response: Some(content.to_string()),
                usage: response.usage,
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::prelude::*;
    use siteledger_core::categories::EXPENSE_CATEGORIES;

    use crate::client::LlmConfig;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 6, 1).unwrap()
    }

    fn client_for(server: &MockServer) -> LlmClient {
        LlmClient::new(LlmConfig {
            base_url: format!("{}/v1", server.base_url()),
            api_key: "k".into(),
            model: "gpt-4o".into(),
        })
    }

    #[test]
    fn prompt_embeds_every_category() {
        let prompt = extraction_prompt(&EXPENSE_CATEGORIES);
        for category in EXPENSE_CATEGORIES {
            assert!(prompt.contains(category), "missing {category}");
        }
        assert!(prompt.contains("Respond ONLY with valid JSON"));
    }

    #[tokio::test]
    async fn parses_fenced_model_output() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(POST).path("/v1/chat/completions");
            then.status(200).json_body(serde_json::json!({
                "choices": [{"message": {"content":
                    "```json\n{\"store\":\"Home Depot\",\"amount\":88.20,\"date\":\"2025-05-28\",\"category\":\"PLUMBING\",\"items\":\"PVC fittings\",\"confidence\":90}\n```"
                }}]
            }));
        });

        let analysis = analyze_receipt(
            &client_for(&server),
            "data:image/jpeg;base64,abc",
            &EXPENSE_CATEGORIES,
            today(),
        )
        .await
        .unwrap();

        assert!(!analysis.parse_failed);
        assert_eq!(analysis.fields.store, "Home Depot");
        assert_eq!(analysis.fields.category, "PLUMBING");
    }

    #[tokio::test]
    async fn prose_output_degrades_to_fallback() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(POST).path("/v1/chat/completions");
            then.status(200).json_body(serde_json::json!({
                "choices": [{"message": {"content": "Sorry, this image is too blurry."}}]
            }));
        });

        let analysis = analyze_receipt(
            &client_for(&server),
            "https://bucket/receipt.jpg",
            &EXPENSE_CATEGORIES,
            today(),
        )
        .await
        .unwrap();

        assert!(analysis.parse_failed);
        assert_eq!(analysis.fields.confidence, 0);
        assert_eq!(analysis.fields.date, today());
        assert!(analysis.raw_response.unwrap().contains("blurry"));
    }
}
