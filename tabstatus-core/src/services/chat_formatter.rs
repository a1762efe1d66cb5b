//! src/services/chat_formatter.rs

use std::sync::Arc;
use tabstatus_common::models::Participant;
use crate::services::display_name::DisplayNameComposer;
use crate::services::status_service::StatusManager;

/// Prefixes broadcast chat lines with the sender's status.
pub struct ChatFormatter {
    manager: Arc<StatusManager>,
}

impl ChatFormatter {
    pub fn new(manager: Arc<StatusManager>) -> Self {
        Self { manager }
    }

    /// `None` when chat formatting is switched off and the host should send
    /// the line unchanged. The message itself is rendered with the sender's
    /// capabilities.
    pub async fn format(&self, sender: &Participant, message: &str) -> Option<String> {
        let config = self.manager.config();
        if !config.is_chat_formatter() {
            return None;
        }

        let body = self
            .manager
            .engine()
            .render(message, &self.manager.capabilities_of(&sender.id));
        let line = format!("{}: {}", sender.name, body);

        match self.manager.rendered_status(sender).await {
            Some(status) if !status.is_empty() => {
                let composer = DisplayNameComposer::from_config(&config.snapshot().config);
                Some(composer.bracket(&status, &line))
            }
            _ => Some(line),
        }
    }
}
