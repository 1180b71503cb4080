//! Assistant chat: one conversation turn, with optional tool calling.
//!
//! Tool execution happens on the caller's side; when the model requests
//! tools the calls are surfaced as data and the caller round-trips the
//! results as `tool` messages in the next turn.

use crate::client::{LlmClient, LlmError};
use crate::messages::{ChatMessage, ChatRequest, ToolCall, ToolDefinition, Usage};

const MAX_TOKENS: u32 = 2000;
const TEMPERATURE: f32 = 0.7;

/// The model's reply for one turn.
#[derive(Debug, Clone)]
pub enum AssistantReply {
    /// A plain text answer.
    Text { content: String, usage: Option<Usage> },
    /// The model wants tools run before it can answer.
    ToolCalls {
        tool_calls: Vec<ToolCall>,
        usage: Option<Usage>,
    },
}

/// Run one assistant turn over the accumulated message history.
pub async fn run_turn(
    client: &LlmClient,
    messages: Vec<ChatMessage>,
    tools: Option<Vec<ToolDefinition>>,
) -> Result<AssistantReply, LlmError> {
    let request = ChatRequest {
        model: client.model().to_string(),
        messages,
        max_tokens: MAX_TOKENS,
        temperature: TEMPERATURE,
        tools,
    };

    let response = client.chat(&request).await?;

    if let Some(calls) = response.tool_calls() {
        tracing::info!(count = calls.len(), "Assistant requested tool calls");
        return Ok(AssistantReply::ToolCalls {
            tool_calls: calls.to_vec(),
            usage: response.usage,
        });
    }

    let content = response.content().ok_or(LlmError::EmptyResponse)?;
    Ok(AssistantReply::Text {
        content: content.to_string(),
        usage: response.usage,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::prelude::*;

    use crate::client::LlmConfig;

    fn client_for(server: &MockServer) -> LlmClient {
        LlmClient::new(LlmConfig {
            base_url: format!("{}/v1", server.base_url()),
            api_key: "k".into(),
            model: "gpt-4o".into(),
        })
    }

    #[tokio::test]
    async fn text_reply_passes_through() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(POST).path("/v1/chat/completions");
            then.status(200).json_body(serde_json::json!({
                "choices": [{"message": {"content": "Your active projects: Maple St."}}]
            }));
        });

        let reply = run_turn(&client_for(&server), vec![ChatMessage::user("projects?")], None)
            .await
            .unwrap();
        match reply {
            AssistantReply::Text { content, .. } => assert!(content.contains("Maple St")),
            other => panic!("expected text reply, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn tool_calls_win_over_content() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(POST).path("/v1/chat/completions");
            then.status(200).json_body(serde_json::json!({
                "choices": [{"message": {
                    "content": null,
                    "tool_calls": [{"id": "call_1", "type": "function",
                        "function": {"name": "list_projects", "arguments": "{\"status\":\"active\"}"}}]
                }}]
            }));
        });

        let tools = vec![ToolDefinition::function(
            "list_projects",
            "List projects",
            serde_json::json!({"type": "object", "properties": {}}),
        )];
        let reply = run_turn(&client_for(&server), vec![ChatMessage::user("projects?")], Some(tools))
            .await
            .unwrap();
        match reply {
            AssistantReply::ToolCalls { tool_calls, .. } => {
                assert_eq!(tool_calls.len(), 1);
                assert_eq!(tool_calls[0].function.name, "list_projects");
            }
            other => panic!("expected tool calls, got {other:?}"),
        }
    }
}
