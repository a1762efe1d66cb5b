//! src/services/status_service.rs
//!
//! StatusManager ties the pieces together: it authorizes the actor, renders
//! and validates the status, mutates the store and pushes the composed
//! display names to the presentation layer.
//!
//! A request that fails authorization or validation changes nothing: no
//! store mutation, no display update, no save.

use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, error, info};
use tabstatus_common::capabilities::{
    Capabilities, ScopedCapabilities, ADMIN_MAX_LENGTH, ADMIN_RELOAD, ADMIN_SET, PLACEHOLDERS,
    SET_OWN,
};
use tabstatus_common::models::{DisplayName, Participant, PrincipalId};
use tabstatus_common::traits::{CapabilityProvider, PlaceholderExpander, Presence};
use crate::config::ConfigManager;
use crate::formatting::{substitute_spaces, FormattingEngine};
use crate::services::display_name::DisplayNameComposer;
use crate::store::{StatusStore, WriteOutcome};
use crate::Error;

pub struct StatusManager {
    config: Arc<ConfigManager>,
    store: Arc<StatusStore>,
    capabilities: Arc<dyn CapabilityProvider>,
    presence: Arc<dyn Presence>,
    placeholders: Option<Arc<dyn PlaceholderExpander>>,
    engine: FormattingEngine,
}

impl StatusManager {
    pub fn new(
        config: Arc<ConfigManager>,
        store: Arc<StatusStore>,
        capabilities: Arc<dyn CapabilityProvider>,
        presence: Arc<dyn Presence>,
    ) -> Self {
        debug!("StatusManager::new() called");
        Self {
            config,
            store,
            capabilities,
            presence,
            placeholders: None,
            engine: FormattingEngine::new(),
        }
    }

    /// Expands `%...%` tokens in rendered statuses of participants that hold
    /// the placeholder capability.
    pub fn with_placeholder_expander(mut self, expander: Arc<dyn PlaceholderExpander>) -> Self {
        self.placeholders = Some(expander);
        self
    }

    pub fn config(&self) -> &Arc<ConfigManager> {
        &self.config
    }

    pub fn store(&self) -> &Arc<StatusStore> {
        &self.store
    }

    pub fn engine(&self) -> &FormattingEngine {
        &self.engine
    }

    pub fn capabilities_of<'a>(&'a self, principal: &'a PrincipalId) -> ScopedCapabilities<'a> {
        ScopedCapabilities::new(self.capabilities.as_ref(), principal)
    }

    fn has(&self, principal: &PrincipalId, capability: &str) -> bool {
        self.capabilities.has_capability(principal, capability)
    }

    /// Self-service needs the own-status capability (or admin); touching
    /// anyone else's status needs admin.
    fn authorize_target(&self, target: &Participant, actor: &Participant) -> Result<(), Error> {
        if actor.id == target.id {
            if self.has(&actor.id, SET_OWN) || self.has(&actor.id, ADMIN_SET) {
                return Ok(());
            }
            debug!("{} lacks permission to change their own status", actor.name);
            return Err(Error::PermissionDenied(
                "You don't have permission to set your status.".to_string(),
            ));
        }
        if self.has(&actor.id, ADMIN_SET) {
            return Ok(());
        }
        debug!("{} lacks permission to change the status of {}", actor.name, target.name);
        Err(Error::PermissionDenied(format!(
            "You don't have permission to change the status of {}.",
            target.name
        )))
    }

    fn require(&self, actor: &Participant, capability: &str) -> Result<(), Error> {
        if self.has(&actor.id, capability) {
            Ok(())
        } else {
            debug!("{} lacks capability {}", actor.name, capability);
            Err(Error::PermissionDenied(
                "You don't have permission to use this command.".to_string(),
            ))
        }
    }

    /// Sets a free-text status. An input that is empty after `&_`
    /// substitution removes the status instead.
    pub async fn set_status(
        &self,
        target: &Participant,
        raw: &str,
        actor: &Participant,
    ) -> Result<WriteOutcome, Error> {
        self.authorize_target(target, actor)?;

        let snapshot = self.config.snapshot();
        if snapshot.config.group_mode && !self.has(&actor.id, ADMIN_SET) {
            debug!("{} tried to set a custom status in group mode without admin permission.", actor.name);
            return Err(Error::PermissionDenied(
                "Group mode is enabled. You must set a group status.".to_string(),
            ));
        }

        let status = substitute_spaces(raw);
        let rendered = self.engine.render(&status, &self.capabilities_of(&actor.id));
        let length = self.engine.effective_length(&rendered);
        let max_length = snapshot.config.max_status_length;
        if length > max_length {
            debug!(
                "Status '{}' for {} is too long. Effective length: {}, max length: {}",
                status, target.name, length, max_length
            );
            return Err(Error::ValidationError(format!(
                "Status is too long. Max length is {} characters.",
                max_length
            )));
        }

        if status.is_empty() {
            return Ok(self.remove_status(target).await);
        }

        let outcome = self.store.set(target.id, status.clone()).await;
        if snapshot.config.change_tablist_names {
            self.refresh_display_name(target).await;
        }
        debug!("Status for {} set to '{}' by {}", target.name, status, actor.name);
        Ok(outcome)
    }

    /// Sets the canonical status of a configured group.
    pub async fn set_group_status(
        &self,
        target: &Participant,
        group_name: &str,
        actor: &Participant,
    ) -> Result<WriteOutcome, Error> {
        debug!("Attempting to set group status for {} to group {}", target.name, group_name);
        if actor.id != target.id && !self.has(&actor.id, ADMIN_SET) {
            return Err(Error::PermissionDenied(format!(
                "You don't have permission to change the status of {}.",
                target.name
            )));
        }

        let snapshot = self.config.snapshot();
        let group = snapshot.groups.resolve(group_name).ok_or_else(|| {
            debug!("Invalid group name provided: {}", group_name);
            Error::NotFound(format!("Invalid group name '{}'.", group_name))
        })?;

        if !snapshot.groups.authorize(&actor.id, group, &self.capabilities_of(&actor.id)) {
            return Err(Error::PermissionDenied(
                "You don't have permission to use this status group.".to_string(),
            ));
        }

        let outcome = self.store.set(target.id, group.canonical_status.clone()).await;
        if snapshot.config.change_tablist_names {
            self.refresh_display_name(target).await;
        }
        debug!(
            "{} status set to group '{}' ({})",
            target.name, group.name, group.canonical_status
        );
        Ok(outcome)
    }

    /// Idempotent: removing a status that does not exist succeeds without
    /// touching the store. The display always falls back to the bare name.
    pub async fn remove_status(&self, target: &Participant) -> WriteOutcome {
        let outcome = self.store.remove(&target.id).await;
        self.presence
            .apply_display_name(target, &DisplayName::bare(&target.name));
        debug!("Status removed for {}", target.name);
        outcome
    }

    pub async fn remove_status_as(
        &self,
        target: &Participant,
        actor: &Participant,
    ) -> Result<WriteOutcome, Error> {
        self.authorize_target(target, actor)?;
        Ok(self.remove_status(target).await)
    }

    /// Re-reads the config (thresholds and groups) and replaces the store
    /// contents with the persisted document. Returns the number of statuses
    /// loaded.
    pub async fn reload(&self) -> Result<usize, Error> {
        self.config.reload().await?;
        let loaded = self.store.load().await?;
        if self.config.is_tablist_formatter() {
            self.refresh_all_display_names().await;
        }
        info!("Statuses reloaded.");
        Ok(loaded)
    }

    pub async fn reload_as(&self, actor: &Participant) -> Result<usize, Error> {
        self.require(actor, ADMIN_RELOAD)?;
        self.reload().await
    }

    pub fn max_status_length(&self) -> usize {
        self.config.max_status_length()
    }

    pub async fn set_max_status_length(
        &self,
        actor: &Participant,
        max_length: usize,
    ) -> Result<(), Error> {
        self.require(actor, ADMIN_MAX_LENGTH)?;
        self.config.set_max_status_length(max_length).await
    }

    pub async fn reset_max_status_length(&self, actor: &Participant) -> Result<(), Error> {
        self.require(actor, ADMIN_MAX_LENGTH)?;
        self.config.reset_max_status_length().await
    }

    pub async fn get_status(&self, principal: &PrincipalId) -> Option<String> {
        self.store.get(principal).await
    }

    /// The participant's status rendered with their own capabilities, with
    /// placeholders expanded if they may use them.
    pub async fn rendered_status(&self, participant: &Participant) -> Option<String> {
        let raw = self.store.get(&participant.id).await?;
        Some(self.render_for(participant, &raw))
    }

    fn render_for(&self, participant: &Participant, raw: &str) -> String {
        let caps = self.capabilities_of(&participant.id);
        let rendered = self.engine.render(raw, &caps);
        match self.placeholders.as_ref() {
            Some(expander) if caps.has(PLACEHOLDERS) => expander.expand(participant, &rendered),
            _ => rendered,
        }
    }

    fn compose(&self, participant: &Participant, raw: Option<&str>) -> DisplayName {
        let snapshot = self.config.snapshot();
        let composer = DisplayNameComposer::from_config(&snapshot.config);
        let rendered = raw.map(|r| self.render_for(participant, r));
        composer.compose(&participant.name, rendered.as_deref())
    }

    pub async fn display_name_for(&self, participant: &Participant) -> DisplayName {
        let raw = self.store.get(&participant.id).await;
        self.compose(participant, raw.as_deref())
    }

    pub async fn refresh_display_name(&self, participant: &Participant) {
        let shown = self.display_name_for(participant).await;
        debug!("{} display name set to '{}'", participant.name, shown.list_label);
        self.presence.apply_display_name(participant, &shown);
    }

    /// Recomposes every online participant. Names are applied with the
    /// store locked, so a status written meanwhile is never overwritten by
    /// an older label.
    pub async fn refresh_all_display_names(&self) -> usize {
        let online = self.presence.online_participants();
        self.store
            .read_locked(|statuses: &HashMap<PrincipalId, String>| {
                for participant in &online {
                    let shown = self.compose(participant, statuses.get(&participant.id).map(String::as_str));
                    self.presence.apply_display_name(participant, &shown);
                }
            })
            .await;
        debug!("Refreshed display names of {} participant(s).", online.len());
        online.len()
    }

    pub async fn handle_join(&self, participant: &Participant) {
        if self.config.is_tablist_formatter() {
            self.refresh_display_name(participant).await;
        }
    }

    pub fn find_participant(&self, name: &str) -> Result<Participant, Error> {
        self.presence
            .find_online(name)
            .ok_or_else(|| Error::NotFound(format!("Player '{}' not found.", name)))
    }

    pub fn online_participants(&self) -> Vec<Participant> {
        self.presence.online_participants()
    }

    /// Final save. A failure is logged; there is nobody left to report to.
    pub async fn shutdown(&self) {
        match self.store.save().await {
            Ok(()) => info!("Statuses saved on shutdown."),
            Err(e) => error!("Could not save statuses on shutdown: {:?}", e),
        }
    }
}
