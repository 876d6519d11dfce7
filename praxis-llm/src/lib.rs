//! Praxis LLM - Chat Provider Abstraction
//!
//! Provider-agnostic trait for text completion. The backend treats the
//! chat provider as an opaque function from a message list to one
//! completion; the concrete Anthropic-backed implementation lives in
//! [`anthropic`].

pub mod anthropic;

use async_trait::async_trait;
use praxis_core::ChatError;
use serde::{Deserialize, Serialize};

pub use anthropic::AnthropicProvider;

/// One message of a chat conversation. Roles are passed through to the
/// provider untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

/// A completion request as the API layer hands it to the provider.
#[derive(Debug, Clone, PartialEq)]
pub struct ChatRequest {
    pub messages: Vec<ChatMessage>,
    pub max_tokens: Option<i32>,
    pub temperature: Option<f32>,
}

/// A completed provider response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct ChatCompletion {
    pub content: String,
    pub model: String,
    pub input_tokens: i64,
    pub output_tokens: i64,
}

/// Trait for chat-completion providers.
/// Implementations must be thread-safe (Send + Sync).
#[async_trait]
pub trait ChatProvider: Send + Sync {
    /// Produce one completion for the given conversation.
    async fn complete(&self, request: &ChatRequest) -> Result<ChatCompletion, ChatError>;

    /// The model identifier requests are sent to.
    fn model_id(&self) -> &str;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chat_message_serde() {
        let message: ChatMessage =
            serde_json::from_str(r#"{"role": "user", "content": "hi"}"#).unwrap();
        assert_eq!(message.role, "user");
        assert_eq!(message.content, "hi");
    }
}
