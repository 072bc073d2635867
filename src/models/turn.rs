//! Conversation turns exchanged with the inference backend

use serde::{Deserialize, Deserializer, Serialize};

/// Speaker of a conversation turn
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
}

impl Role {
    /// Parse a caller-supplied role label (case-insensitive)
    ///
    /// Returns `None` for anything other than system, user or assistant.
    pub fn from_label(label: &str) -> Option<Self> {
        let label = label.trim();
        if label.eq_ignore_ascii_case("system") {
            Some(Role::System)
        } else if label.eq_ignore_ascii_case("user") {
            Some(Role::User)
        } else if label.eq_ignore_ascii_case("assistant") {
            Some(Role::Assistant)
        } else {
            None
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::System => "system",
            Role::User => "user",
            Role::Assistant => "assistant",
        }
    }
}

/// One message in a conversation, in the shape chat-completion APIs expect
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChatTurn {
    pub role: Role,
    pub content: String,
}

impl ChatTurn {
    pub fn new(role: Role, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
        }
    }

    pub fn system(content: impl Into<String>) -> Self {
        Self::new(Role::System, content)
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self::new(Role::User, content)
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self::new(Role::Assistant, content)
    }
}

/// A prior turn as sent by the caller
///
/// Deserializes from any JSON value. A missing, non-string or unknown `role`
/// becomes `user`; a missing or non-string `content` becomes "". Entries that
/// are not objects at all yield an empty user turn.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HistoryEntry {
    pub role: Option<String>,
    pub content: Option<String>,
}

impl HistoryEntry {
    pub fn into_turn(self) -> ChatTurn {
        let role = self
            .role
            .as_deref()
            .and_then(Role::from_label)
            .unwrap_or(Role::User);
        ChatTurn::new(role, self.content.unwrap_or_default())
    }
}

impl<'de> Deserialize<'de> for HistoryEntry {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = serde_json::Value::deserialize(deserializer)?;
        let field = |name: &str| {
            value
                .get(name)
                .and_then(serde_json::Value::as_str)
                .map(str::to_string)
        };

        Ok(Self {
            role: field("role"),
            content: field("content"),
        })
    }
}

/// Build the message list sent to the inference backend
///
/// Order is fixed: the system prompt, then `history` in caller order, then
/// the new user `message`.
pub fn assemble_turns(system_prompt: &str, history: &[ChatTurn], message: &str) -> Vec<ChatTurn> {
    let mut turns = Vec::with_capacity(history.len() + 2);
    turns.push(ChatTurn::system(system_prompt));
    turns.extend(history.iter().cloned());
    turns.push(ChatTurn::user(message));
    turns
}
