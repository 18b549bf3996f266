//! `/chat` request and reply shapes, plus chat history

use super::role::Role;
use super::user::UserRecord;
use crate::{GaiefError, Result};
use serde::{Deserialize, Serialize};

/// Body of `POST /chat`.
///
/// `context` is a string holding JSON, not a nested object; the backend
/// splices it into its prompt verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatRequest {
    /// Singular role, e.g. `student`
    pub user_role: String,
    /// What the user asked about
    pub topic: String,
    /// Prompt material
    pub context: String,
}

impl ChatRequest {
    /// Request with free-text context typed by the user
    pub fn new(role: Role, topic: impl Into<String>, context: impl Into<String>) -> Self {
        Self {
            user_role: role.singular().to_string(),
            topic: topic.into(),
            context: context.into(),
        }
    }

    /// Request whose context is the JSON-stringified user record
    pub fn for_user(role: Role, topic: impl Into<String>, user: &UserRecord) -> Result<Self> {
        let context = serde_json::to_string(user)?;
        Ok(Self::new(role, topic, context))
    }

    /// Parse `context` back into a record
    pub fn context_user(&self) -> Result<UserRecord> {
        Ok(serde_json::from_str(&self.context)?)
    }
}

/// Raw `/chat` response body: `{reply}` or `{error}`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ChatResponseBody {
    /// Successful completion
    Reply {
        /// Assistant text
        reply: String,
    },
    /// Application-level failure (sent with HTTP 200)
    Error {
        /// Failure message
        error: String,
    },
}

impl ChatResponseBody {
    /// Split into success or a backend error
    pub fn into_result(self, status: u16) -> Result<ChatReply> {
        match self {
            ChatResponseBody::Reply { reply } => Ok(ChatReply { reply }),
            ChatResponseBody::Error { error } => Err(GaiefError::backend(status, error)),
        }
    }
}

/// A successful chat completion
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatReply {
    /// Assistant text
    pub reply: String,
}

/// One past exchange
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatHistoryEntry {
    /// What was asked
    #[serde(default)]
    pub question: String,
    /// What the assistant answered
    #[serde(default)]
    pub answer: String,
    /// When, as sent by the backend
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<String>,
}

/// Response of `/debug/chat-history/{id}`
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ChatHistory {
    /// Count reported by the backend
    #[serde(default)]
    pub chat_history_count: usize,
    /// Entries, oldest first
    #[serde(default)]
    pub chat_history: Vec<ChatHistoryEntry>,
}
