//! Handlers for the AI assistant: chat turns and transcript history.

use axum::extract::{Query, State};
use axum::Json;
use serde::{Deserialize, Serialize};
use siteledger_ai::chat::{run_turn, AssistantReply};
use siteledger_ai::messages::{ChatMessage, ToolCall, ToolDefinition};
use siteledger_db::models::chat::{ChatMessage as ChatRow, CreateChatMessage};
use siteledger_db::repositories::ChatRepo;

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::query::LimitParams;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request / response shapes
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatTurnRequest {
    pub messages: Vec<IncomingMessage>,
    /// Function tools the client is prepared to execute.
    pub tools: Option<Vec<ToolDefinition>>,
    /// Results for tool calls requested in the previous turn.
    pub tool_results: Option<Vec<ToolResult>>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IncomingMessage {
    pub role: String,
    pub text: Option<String>,
    /// Legacy field name used by older clients.
    pub content: Option<String>,
    #[serde(default)]
    pub files: Vec<IncomingFile>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IncomingFile {
    pub uri: String,
    pub mime_type: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ToolResult {
    pub id: String,
    pub result: serde_json::Value,
}

/// The assistant's answer for one turn.
#[derive(Debug, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ChatTurnResponse {
    Text { content: String },
    ToolCalls { tool_calls: Vec<OutgoingToolCall> },
}

#[derive(Debug, Serialize)]
pub struct OutgoingToolCall {
    pub id: String,
    pub name: String,
    /// Parsed JSON arguments; falls back to a string when the model
    /// produced invalid JSON.
    pub arguments: serde_json::Value,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// POST /api/v1/assistant/chat
pub async fn chat(
    user: AuthUser,
    State(state): State<AppState>,
    Json(input): Json<ChatTurnRequest>,
) -> AppResult<Json<ChatTurnResponse>> {
    if input.messages.is_empty() {
        return Err(AppError::BadRequest("Messages array is required".into()));
    }

    let mut messages: Vec<ChatMessage> = input.messages.iter().map(to_wire_message).collect();
    if let Some(results) = &input.tool_results {
        for result in results {
            messages.push(ChatMessage::tool_result(result.id.as_str(), &result.result));
        }
    }

    let reply = run_turn(&state.llm, messages, input.tools.clone()).await?;

    persist_turn(&state, &user, &input, &reply).await?;

    let response = match reply {
        AssistantReply::Text { content, .. } => ChatTurnResponse::Text { content },
        AssistantReply::ToolCalls { tool_calls, .. } => ChatTurnResponse::ToolCalls {
            tool_calls: tool_calls.into_iter().map(to_outgoing_call).collect(),
        },
    };
    Ok(Json(response))
}

/// GET /api/v1/assistant/history?limit=
pub async fn history(
    user: AuthUser,
    State(state): State<AppState>,
    Query(params): Query<LimitParams>,
) -> AppResult<Json<Vec<ChatRow>>> {
    let rows = ChatRepo::list_for_user(&state.pool, user.user_id, params.effective()).await?;
    Ok(Json(rows))
}

/// DELETE /api/v1/assistant/history
pub async fn clear_history(
    user: AuthUser,
    State(state): State<AppState>,
) -> AppResult<Json<serde_json::Value>> {
    let deleted = ChatRepo::clear_for_user(&state.pool, user.user_id).await?;
    Ok(Json(serde_json::json!({ "deleted": deleted })))
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Convert an incoming message to the wire shape, attaching any image
/// files as image parts.
fn to_wire_message(msg: &IncomingMessage) -> ChatMessage {
    let text = msg
        .text
        .as_deref()
        .or(msg.content.as_deref())
        .unwrap_or("Analyze these images");

    let image_urls: Vec<String> = msg
        .files
        .iter()
        .filter(|f| {
            f.mime_type
                .as_deref()
                .is_some_and(|m| m.starts_with("image/"))
        })
        .map(|f| f.uri.clone())
        .collect();

    match msg.role.as_str() {
        "user" if !image_urls.is_empty() => ChatMessage::user_with_images(text, image_urls),
        "user" => ChatMessage::user(text),
        "system" => ChatMessage::system(text),
        _ => ChatMessage::assistant(text),
    }
}

fn to_outgoing_call(call: ToolCall) -> OutgoingToolCall {
    let arguments = serde_json::from_str(&call.function.arguments)
        .unwrap_or(serde_json::Value::String(call.function.arguments));
    OutgoingToolCall {
        id: call.id,
        name: call.function.name,
        arguments,
    }
}

/// Append the latest user message and the assistant's reply to the
/// per-user transcript.
async fn persist_turn(
    state: &AppState,
    user: &AuthUser,
    input: &ChatTurnRequest,
    reply: &AssistantReply,
) -> AppResult<()> {
    if let Some(last_user) = input.messages.iter().rev().find(|m| m.role == "user") {
        let content = last_user
            .text
            .as_deref()
            .or(last_user.content.as_deref())
            .unwrap_or_default();
        ChatRepo::create(
            &state.pool,
            user.user_id,
            &CreateChatMessage {
                role: "user".into(),
                content: content.to_string(),
                tool_calls: None,
            },
        )
        .await?;
    }

    let (content, tool_calls) = match reply {
        AssistantReply::Text { content, .. } => (content.clone(), None),
        AssistantReply::ToolCalls { tool_calls, .. } => (
            String::new(),
            Some(serde_json::to_value(tool_calls).map_err(|e| {
                AppError::InternalError(format!("Tool call serialization failed: {e}"))
            })?),
        ),
    };
    ChatRepo::create(
        &state.pool,
        user.user_id,
        &CreateChatMessage {
            role: "assistant".into(),
            content,
            tool_calls,
        },
    )
    .await?;

    Ok(())
}
