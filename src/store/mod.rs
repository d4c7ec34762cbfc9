pub mod attachment;
pub mod gateway;
pub mod notify;

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use log::error;

use crate::config::prompt::AssistantPrompts;
use crate::models::chat::{ChatMessage, Conversation, GatewayChatRequest, HISTORY_WINDOW};

use self::attachment::PendingAttachment;
use self::gateway::GatewayApi;
use self::notify::{Notifier, Severity};

/// Flips the shared loading flag on and guarantees it flips back off when
/// the guard leaves scope, whichever way the send ends.
struct LoadingGuard {
    flag: Arc<AtomicBool>,
}

impl LoadingGuard {
    fn engage(flag: &Arc<AtomicBool>) -> Self {
        flag.store(true, Ordering::SeqCst);
        Self { flag: flag.clone() }
    }
}

impl Drop for LoadingGuard {
    fn drop(&mut self) {
        self.flag.store(false, Ordering::SeqCst);
    }
}

/// Client-side state of one assistant conversation: the transcript, the
/// draft input, at most one staged image, and the in-flight flag.
///
/// Sends are optimistic. The user's message joins the transcript before
/// the request leaves, and stays there if the request fails; failures
/// surface as a notice instead of a rollback, so the user can see what
/// they said and try again.
pub struct ConversationStore {
    conversation: Conversation,
    input: String,
    pending: Option<PendingAttachment>,
    loading: Arc<AtomicBool>,
    gateway: Arc<dyn GatewayApi>,
    notifier: Arc<dyn Notifier>,
    prompts: Arc<AssistantPrompts>,
}

impl ConversationStore {
    pub fn new(
        gateway: Arc<dyn GatewayApi>,
        notifier: Arc<dyn Notifier>,
        prompts: Arc<AssistantPrompts>,
    ) -> Self {
        Self {
            conversation: Conversation::new(&prompts.greeting),
            input: String::new(),
            pending: None,
            loading: Arc::new(AtomicBool::new(false)),
            gateway,
            notifier,
            prompts,
        }
    }

    pub fn messages(&self) -> &[ChatMessage] {
        &self.conversation.messages
    }

    pub fn input(&self) -> &str {
        &self.input
    }

    pub fn set_input(&mut self, text: &str) {
        self.input = text.to_string();
    }

    pub fn is_loading(&self) -> bool {
        self.loading.load(Ordering::SeqCst)
    }

    /// Shared handle to the loading flag, for surfaces that render a
    /// typing indicator while a send is in flight.
    pub fn loading_handle(&self) -> Arc<AtomicBool> {
        self.loading.clone()
    }

    pub fn pending_attachment(&self) -> Option<&PendingAttachment> {
        self.pending.as_ref()
    }

    pub fn suggested_prompts(&self) -> &[String] {
        &self.prompts.suggested_prompts
    }

    /// Stages an image to ride along with the next send. A previously
    /// staged image is replaced and its preview file released.
    pub fn select_attachment(&mut self, attachment: PendingAttachment) {
        if let Some(mut old) = self.pending.replace(attachment) {
            old.release_preview();
        }
        self.notifier.notify(
            "Image selected",
            "You can now send your message with the image.",
            Severity::Info,
        );
    }

    pub fn remove_attachment(&mut self) {
        if let Some(mut old) = self.pending.take() {
            old.release_preview();
        }
    }

    /// Sends the current draft input together with any staged image.
    pub async fn submit(&mut self) {
        let content = self.input.clone();
        self.send(&content).await;
    }

    /// Sends `content` with any staged image. No-op while a send is in
    /// flight, and when there is neither text nor an image to send.
    pub async fn send(&mut self, content: &str) {
        if self.loading.load(Ordering::SeqCst) {
            return;
        }
        if content.trim().is_empty() && self.pending.is_none() {
            return;
        }

        let mut attachment = self.pending.take();
        let image_uri = attachment.as_ref().map(PendingAttachment::to_data_uri);

        // Snapshot before the optimistic append: the new turn travels in the
        // request body, not in the history window.
        let history = self.conversation.history_window(HISTORY_WINDOW);

        let shown = if content.is_empty() {
            self.prompts.attachment_placeholder.clone()
        } else {
            content.to_string()
        };
        let user_message = match &image_uri {
            Some(uri) => ChatMessage::user_with_image(&shown, uri.clone()),
            None => ChatMessage::user(&shown),
        };
        self.conversation.push(user_message);

        self.input.clear();
        if let Some(att) = attachment.as_mut() {
            att.release_preview();
        }

        let _loading = LoadingGuard::engage(&self.loading);

        let req = GatewayChatRequest {
            message: content.to_string(),
            image: image_uri,
            conversation_history: history,
        };

        match self.gateway.send_chat(&req).await {
            Ok(reply) => {
                self.conversation.push(ChatMessage::assistant(&reply.message));
            }
            Err(e) => {
                error!("Chat request failed: {}", e);
                self.notifier.notify(
                    "Error",
                    "Failed to send message. Please try again.",
                    Severity::Error,
                );
            }
        }
    }
}
