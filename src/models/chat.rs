use chrono::Utc;
use serde::{ Serialize, Deserialize };
use uuid::Uuid;

/// How many prior turns travel with each chat request. Both sides of the
/// wire window to this count, so older turns never reach the model.
pub const HISTORY_WINDOW: usize = 5;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ChatMessage {
    pub id: Uuid,
    pub role: Role,
    pub content: String,
    pub timestamp: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
}

impl ChatMessage {
    pub fn user(content: &str) -> Self {
        Self::stamped(Role::User, content, None)
    }

    pub fn user_with_image(content: &str, image: String) -> Self {
        Self::stamped(Role::User, content, Some(image))
    }

    pub fn assistant(content: &str) -> Self {
        Self::stamped(Role::Assistant, content, None)
    }

    fn stamped(role: Role, content: &str, image: Option<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            role,
            content: content.to_string(),
            timestamp: Utc::now().timestamp_millis(),
            image,
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Conversation {
    pub id: Uuid,
    pub messages: Vec<ChatMessage>,
}

impl Conversation {
    /// Every conversation opens with the assistant greeting already in place.
    pub fn new(greeting: &str) -> Self {
        Self {
            id: Uuid::new_v4(),
            messages: vec![ChatMessage::assistant(greeting)],
        }
    }

    pub fn push(&mut self, message: ChatMessage) {
        self.messages.push(message);
    }

    /// The most recent `limit` messages as prior-context entries, oldest first.
    pub fn history_window(&self, limit: usize) -> Vec<HistoryEntry> {
        let start = self.messages.len().saturating_sub(limit);
        self.messages[start..]
            .iter()
            .map(|m| HistoryEntry {
                role: m.role,
                content: m.content.clone(),
            })
            .collect()
    }
}

/// One prior turn as it travels to the gateway. Deserialization is lenient:
/// clients that post full message objects (ids, timestamps, previews) still
/// parse, only `role` and `content` are read.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub role: Role,
    pub content: String,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GatewayChatRequest {
    #[serde(default)]
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(default)]
    pub conversation_history: Vec<HistoryEntry>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ChatResponse {
    pub message: String,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}
