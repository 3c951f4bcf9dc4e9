//! Chat side panel transcript.

use serde::Serialize;
use tracing::warn;

use crate::clients::RecipeBackend;

pub const SERVER_ERROR_REPLY: &str = "The server ran into an error. Please try again.";

pub const UNREACHABLE_REPLY: &str = "I can't reach the server right now.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Speaker {
    User,
    Assistant,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChatMessage {
    pub from: Speaker,
    pub text: String,
}

impl ChatMessage {
    fn user(text: impl Into<String>) -> Self {
        Self {
            from: Speaker::User,
            text: text.into(),
        }
    }

    fn assistant(text: impl Into<String>) -> Self {
        Self {
            from: Speaker::Assistant,
            text: text.into(),
        }
    }
}

/// Ordered chat transcript. Every failure becomes an assistant message.
#[derive(Debug, Clone, Default)]
pub struct ChatSession {
    messages: Vec<ChatMessage>,
    pending: bool,
}

impl ChatSession {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    #[must_use]
    pub const fn is_pending(&self) -> bool {
        self.pending
    }

    /// Sends `input` and appends the reply.
    ///
    /// Blank input is ignored. Returns the assistant message that was
    /// appended, or `None` if nothing was sent.
    pub async fn send(&mut self, backend: &dyn RecipeBackend, input: &str) -> Option<&ChatMessage> {
        let message = input.trim();
        if message.is_empty() {
            return None;
        }

        self.messages.push(ChatMessage::user(message));
        self.pending = true;

        let reply = match backend.chat(message).await {
            Ok(answer) => answer,
            Err(e) if e.is_status() => {
                warn!(error = %e, "Chat endpoint returned an error");
                SERVER_ERROR_REPLY.to_string()
            }
            Err(e) => {
                warn!(error = %e, "Chat endpoint unreachable");
                UNREACHABLE_REPLY.to_string()
            }
        };

        self.pending = false;
        self.messages.push(ChatMessage::assistant(reply));
        self.messages.last()
    }
}
