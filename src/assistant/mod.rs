//! Conversational assistant boundary.
//!
//! The numeric core never calls into this module. It only supplies the
//! values embedded in the [`technical_brief`]. The conversation history is a
//! caller-owned [`Conversation`] passed in by `&mut`.

mod brief;
mod conversation;
#[cfg(feature = "assistant")]
mod openai;

use serde::Serialize;
use thiserror::Error;

pub use brief::technical_brief;
pub use conversation::{Conversation, Exchange};
#[cfg(feature = "assistant")]
pub use openai::{OpenAiClient, parse_completion};

/// Author of a chat message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
}

/// One message sent to the chat-completion service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: Role::System,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }
}

/// Failures of the conversational collaborator.
#[derive(Debug, Error)]
pub enum AssistantError {
    #[error("question is empty")]
    EmptyQuestion,
    #[error("API key not found in environment variable `{var}`")]
    MissingApiKey { var: String },
    #[error("chat service unreachable: {0}")]
    Transport(String),
    #[error("chat service returned HTTP {status}: {body}")]
    Api { status: u16, body: String },
    #[error("chat service returned no reply")]
    EmptyResponse,
}

/// A chat-completion service.
///
/// Implementations receive the full message list for one turn and return
/// the assistant's reply text.
pub trait ChatClient {
    /// Sends `messages` and returns the reply.
    ///
    /// # Errors
    ///
    /// Returns an [`AssistantError`] when the service cannot produce a reply.
    fn complete(&self, messages: &[ChatMessage]) -> Result<String, AssistantError>;
}
