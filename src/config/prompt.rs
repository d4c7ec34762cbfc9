use serde::Deserialize;
use std::fs;
use std::sync::Arc;
use thiserror::Error;
use log::info;

const DEFAULT_SYSTEM_PROMPT: &str = "You are a helpful AI assistant for an Airbnb-style accommodation platform. You help guests with:

1. Property information (amenities, features, house rules)
2. Booking assistance and questions
3. Local area recommendations and attractions
4. Check-in/check-out procedures
5. Troubleshooting common issues
6. Pricing and policy questions

Be friendly, professional, and helpful. Provide accurate information and suggest contacting the host or support team for specific property details when needed. Keep responses concise but informative.

When users ask about specific properties, bookings, or personal information, remind them that you're an AI assistant and they should contact their host or customer support for account-specific questions.";

const DEFAULT_GREETING: &str = "Hi! I'm your AI travel assistant. I'm here to help you with any questions about accommodations, amenities, bookings, local attractions, and more. How can I assist you today?";

const DEFAULT_FALLBACK_REPLY: &str = "I'm here to help! As your AI travel assistant, I can provide information about accommodations, amenities, booking policies, and local attractions. However, I'm currently experiencing some technical difficulties. Please try again in a moment, or feel free to contact our support team for immediate assistance.";

const DEFAULT_IMAGE_PROMPT: &str = "What do you see in this image?";

const DEFAULT_ATTACHMENT_PLACEHOLDER: &str = "Shared an image";

const DEFAULT_SUGGESTED_PROMPTS: [&str; 6] = [
    "What amenities are available in your properties?",
    "Tell me about the house rules and policies",
    "What are the popular attractions nearby?",
    "How do I make a booking?",
    "What's the cancellation policy?",
    "Are pets allowed in the properties?",
];

#[derive(Debug, Error)]
pub enum PromptError {
    #[error("Prompt file IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Prompt JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Prompt field '{0}' must not be empty")]
    EmptyField(&'static str),
}

/// Fixed texts the assistant pipeline runs on. A prompts file may override
/// any subset of fields; everything else keeps the built-in default.
#[derive(Debug, Clone, Deserialize)]
pub struct AssistantPrompts {
    #[serde(default = "default_system_prompt")]
    pub system_prompt: String,
    #[serde(default = "default_greeting")]
    pub greeting: String,
    #[serde(default = "default_fallback_reply")]
    pub fallback_reply: String,
    #[serde(default = "default_image_prompt")]
    pub image_prompt: String,
    #[serde(default = "default_attachment_placeholder")]
    pub attachment_placeholder: String,
    #[serde(default = "default_suggested_prompts")]
    pub suggested_prompts: Vec<String>,
}

fn default_system_prompt() -> String {
    DEFAULT_SYSTEM_PROMPT.to_string()
}

fn default_greeting() -> String {
    DEFAULT_GREETING.to_string()
}

fn default_fallback_reply() -> String {
    DEFAULT_FALLBACK_REPLY.to_string()
}

fn default_image_prompt() -> String {
    DEFAULT_IMAGE_PROMPT.to_string()
}

fn default_attachment_placeholder() -> String {
    DEFAULT_ATTACHMENT_PLACEHOLDER.to_string()
}

fn default_suggested_prompts() -> Vec<String> {
    DEFAULT_SUGGESTED_PROMPTS.iter().map(|s| s.to_string()).collect()
}

impl Default for AssistantPrompts {
    fn default() -> Self {
        Self {
            system_prompt: default_system_prompt(),
            greeting: default_greeting(),
            fallback_reply: default_fallback_reply(),
            image_prompt: default_image_prompt(),
            attachment_placeholder: default_attachment_placeholder(),
            suggested_prompts: default_suggested_prompts(),
        }
    }
}

impl AssistantPrompts {
    fn validate(&self) -> Result<(), PromptError> {
        if self.system_prompt.trim().is_empty() {
            return Err(PromptError::EmptyField("system_prompt"));
        }
        if self.greeting.trim().is_empty() {
            return Err(PromptError::EmptyField("greeting"));
        }
        if self.fallback_reply.trim().is_empty() {
            return Err(PromptError::EmptyField("fallback_reply"));
        }
        if self.image_prompt.trim().is_empty() {
            return Err(PromptError::EmptyField("image_prompt"));
        }
        if self.attachment_placeholder.trim().is_empty() {
            return Err(PromptError::EmptyField("attachment_placeholder"));
        }
        Ok(())
    }
}

pub fn load_prompts(path: &str) -> Result<Arc<AssistantPrompts>, PromptError> {
    let file_content = fs::read_to_string(path)?;
    let prompts: AssistantPrompts = serde_json::from_str(&file_content)?;
    prompts.validate()?;
    info!("Loaded assistant prompts from: {}", path);
    Ok(Arc::new(prompts))
}

/// Built-in prompts unless a prompts file was configured.
pub fn resolve_prompts(path: Option<&str>) -> Result<Arc<AssistantPrompts>, PromptError> {
    match path {
        Some(p) => load_prompts(p),
        None => Ok(Arc::new(AssistantPrompts::default())),
    }
}
