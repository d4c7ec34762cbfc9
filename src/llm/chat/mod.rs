pub mod openrouter;

use async_trait::async_trait;
use serde::Serialize;
use thiserror::Error;

use crate::models::chat::Role;

/// Failures surfaced by a completion provider.
///
/// Callers that own the HTTP contract decide what to do with these; the
/// chat endpoint absorbs every variant into its canned fallback reply.
#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("Provider request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("Provider returned no completion text")]
    EmptyCompletion,
}

/// Speaker slot in the provider conversation, including the system slot
/// that never appears in client-visible history.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TurnRole {
    System,
    User,
    Assistant,
}

impl From<Role> for TurnRole {
    fn from(role: Role) -> Self {
        match role {
            Role::User => TurnRole::User,
            Role::Assistant => TurnRole::Assistant,
        }
    }
}

/// One fragment of a multi-part turn, serialized in the tagged shape the
/// completions API expects.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ContentPart {
    Text { text: String },
    ImageUrl { image_url: ImageUrl },
}

#[derive(Debug, Clone, Serialize)]
pub struct ImageUrl {
    pub url: String,
}

/// Turn content is either a bare string or a list of tagged parts. The
/// untagged serialization keeps plain turns compact on the wire.
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum TurnContent {
    Text(String),
    Parts(Vec<ContentPart>),
}

/// A single message in the outbound completion request.
#[derive(Debug, Clone, Serialize)]
pub struct ProviderTurn {
    pub role: TurnRole,
    pub content: TurnContent,
}

impl ProviderTurn {
    pub fn system(text: &str) -> Self {
        Self {
            role: TurnRole::System,
            content: TurnContent::Text(text.to_string()),
        }
    }

    pub fn text(role: TurnRole, text: &str) -> Self {
        Self {
            role,
            content: TurnContent::Text(text.to_string()),
        }
    }

    /// User turn carrying text alongside an inline image. The text part
    /// always comes first so the caption reads before the picture.
    pub fn user_with_image(text: &str, image_url: &str) -> Self {
        Self {
            role: TurnRole::User,
            content: TurnContent::Parts(vec![
                ContentPart::Text {
                    text: text.to_string(),
                },
                ContentPart::ImageUrl {
                    image_url: ImageUrl {
                        url: image_url.to_string(),
                    },
                },
            ]),
        }
    }
}

/// Anything that can turn an assembled conversation into one reply.
///
/// The HTTP layer only ever sees this trait, so tests swap in scripted
/// implementations and the binary wires up the real client.
#[async_trait]
pub trait ChatProvider: Send + Sync {
    async fn complete(&self, turns: &[ProviderTurn]) -> Result<String, ProviderError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_turn_serializes_content_as_string() {
        let turn = ProviderTurn::text(TurnRole::User, "any rooms left?");
        let json = serde_json::to_value(&turn).unwrap();
        assert_eq!(json["role"], "user");
        assert_eq!(json["content"], "any rooms left?");
    }

    #[test]
    fn test_system_role_serializes_lowercase() {
        let turn = ProviderTurn::system("You are a helpful assistant.");
        let json = serde_json::to_value(&turn).unwrap();
        assert_eq!(json["role"], "system");
    }

    #[test]
    fn test_image_turn_serializes_tagged_parts() {
        let turn = ProviderTurn::user_with_image("what is this?", "data:image/png;base64,AAAA");
        let json = serde_json::to_value(&turn).unwrap();

        let parts = json["content"].as_array().unwrap();
        assert_eq!(parts.len(), 2);
        assert_eq!(parts[0]["type"], "text");
        assert_eq!(parts[0]["text"], "what is this?");
        assert_eq!(parts[1]["type"], "image_url");
        assert_eq!(parts[1]["image_url"]["url"], "data:image/png;base64,AAAA");
    }

    #[test]
    fn test_history_role_maps_into_turn_role() {
        assert_eq!(TurnRole::from(Role::User), TurnRole::User);
        assert_eq!(TurnRole::from(Role::Assistant), TurnRole::Assistant);
    }
}
