//! HTTP client for the chat-completions endpoint.

use crate::messages::{ChatRequest, ChatResponse};

/// Configuration for the LLM API client.
#[derive(Debug, Clone)]
pub struct LlmConfig {
    /// Base API URL (default: `https://api.openai.com/v1`).
    pub base_url: String,
    /// Bearer token for the `Authorization` header.
    pub api_key: String,
    /// Model name sent with every request (default: `gpt-4o`).
    pub model: String,
}

impl LlmConfig {
    /// Load LLM configuration from environment variables.
    ///
    /// | Env Var          | Required | Default                     |
    /// |------------------|----------|-----------------------------|
    /// | `OPENAI_API_KEY` | **yes**  | --                          |
    /// | `LLM_BASE_URL`   | no       | `https://api.openai.com/v1` |
    /// | `LLM_MODEL`      | no       | `gpt-4o`                    |
    ///
    /// # Panics
    ///
    /// Panics if `OPENAI_API_KEY` is not set.
    pub fn from_env() -> Self {
        let api_key =
            std::env::var("OPENAI_API_KEY").expect("OPENAI_API_KEY must be set in the environment");
        let base_url = std::env::var("LLM_BASE_URL")
            .unwrap_or_else(|_| "https://api.openai.com/v1".to_string());
        let model = std::env::var("LLM_MODEL").unwrap_or_else(|_| "gpt-4o".to_string());
        Self {
            base_url,
            api_key,
            model,
        }
    }
}

/// Errors from the chat-completions client.
#[derive(Debug, thiserror::Error)]
pub enum LlmError {
    /// The HTTP request itself failed (network, DNS, TLS, etc.).
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The API returned a non-2xx status code.
    #[error("LLM API error ({status}): {body}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// Raw response body for debugging.
        body: String,
    },

    /// The API answered 2xx but the response carried no choices.
    #[error("LLM returned an empty response")]
    EmptyResponse,
}

/// Client for a single chat-completions endpoint.
pub struct LlmClient {
    client: reqwest::Client,
    config: LlmConfig,
}

impl LlmClient {
    pub fn new(config: LlmConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            config,
        }
    }

    /// Create a client reusing an existing [`reqwest::Client`]
    /// (connection pooling across flows).
    pub fn with_client(client: reqwest::Client, config: LlmConfig) -> Self {
        Self { client, config }
    }

    /// Model name this client sends by default.
    pub fn model(&self) -> &str {
        &self.config.model
    }

    /// Send one chat-completions request and return the parsed response.
    ///
    /// A 2xx response with zero choices maps to [`LlmError::EmptyResponse`]
    /// so callers never have to index into an empty vec.
    pub async fn chat(&self, request: &ChatRequest) -> Result<ChatResponse, LlmError> {
        let response = self
            .client
            .post(format!("{}/chat/completions", self.config.base_url))
            .bearer_auth(&self.config.api_key)
            .json(request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "<unreadable body>".to_string());
            tracing::warn!(status = status.as_u16(), "LLM API error");
            return Err(LlmError::Api {
                status: status.as_u16(),
                body,
            });
        }

        let parsed: ChatResponse = response.json().await?;
        if parsed.choices.is_empty() {
            return Err(LlmError::EmptyResponse);
        }
        Ok(parsed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::messages::ChatMessage;
    use httpmock::prelude::*;

    fn test_client(base_url: String) -> LlmClient {
        LlmClient::new(LlmConfig {
            base_url,
            api_key: "test-key".to_string(),
            model: "gpt-4o".to_string(),
        })
    }

    fn request() -> ChatRequest {
        ChatRequest {
            model: "gpt-4o".to_string(),
            messages: vec![ChatMessage::user("hello")],
            max_tokens: 16,
            temperature: 0.0,
            tools: None,
        }
    }

    #[tokio::test]
    async fn chat_returns_parsed_response() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(POST)
                .path("/v1/chat/completions")
                .header("authorization", "Bearer test-key");
            then.status(200).json_body(serde_json::json!({
                "choices": [{"message": {"content": "hi there"}}],
                "usage": {"prompt_tokens": 5, "completion_tokens": 2, "total_tokens": 7}
            }));
        });

        let client = test_client(format!("{}/v1", server.base_url()));
        let response = client.chat(&request()).await.unwrap();

        mock.assert();
        assert_eq!(response.content(), Some("hi there"));
        assert_eq!(response.usage.unwrap().total_tokens, 7);
    }

    #[tokio::test]
    async fn non_2xx_maps_to_api_error() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(POST).path("/v1/chat/completions");
            then.status(429).body("rate limited");
        });

        let client = test_client(format!("{}/v1", server.base_url()));
        let err = client.chat(&request()).await.unwrap_err();
        match err {
            LlmError::Api { status, body } => {
                assert_eq!(status, 429);
                assert_eq!(body, "rate limited");
            }
            other => panic!("expected Api error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn empty_choices_map_to_empty_response() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(POST).path("/v1/chat/completions");
            then.status(200)
                .json_body(serde_json::json!({"choices": []}));
        });

        let client = test_client(format!("{}/v1", server.base_url()));
        let err = client.chat(&request()).await.unwrap_err();
        assert!(matches!(err, LlmError::EmptyResponse));
    }
}
