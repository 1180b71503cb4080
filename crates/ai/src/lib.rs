//! Client for an OpenAI-compatible chat-completions API.
//!
//! Three flows sit on top of the raw client, one per product feature:
//! receipt analysis ([`receipt`]), estimate item generation
//! ([`estimate`]), and the assistant chat ([`chat`]). All of them are
//! single request/response exchanges -- no retries, no streaming.

pub mod chat;
pub mod client;
pub mod estimate;
pub mod messages;
pub mod receipt;

pub use client::{LlmClient, LlmConfig, LlmError};
