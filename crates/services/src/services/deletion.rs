//! Confirmed deletion of one record.

use std::sync::Arc;

use domain::record::EntityRecord;
use tracing::{info, warn};

use super::{
    busy::BusyTracker,
    entity_client::EntityClient,
    graphql::GENERIC_FAILURE,
    notification::{Notification, Notifier},
};

/// Blocking yes/no prompt shown before a destructive action.
pub trait Confirmation: Send + Sync {
    fn confirm(&self, prompt: &str) -> bool;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeletionOutcome {
    /// The user declined; nothing was sent.
    Cancelled,
    Deleted,
    Failed(String),
}

pub struct DeletionTrigger {
    client: EntityClient,
    notifier: Arc<dyn Notifier>,
    busy: BusyTracker,
}

impl DeletionTrigger {
    pub fn new(client: EntityClient, notifier: Arc<dyn Notifier>, busy: BusyTracker) -> Self {
        Self {
            client,
            notifier,
            busy,
        }
    }

    pub async fn run(&self, record: &EntityRecord, confirmation: &dyn Confirmation) -> DeletionOutcome {
        let definition = self.client.definition();
        let Some(id) = record.id.as_ref() else {
            warn!(entity = %definition.kind, "Refusing to delete a record that was never saved");
            return DeletionOutcome::Failed(GENERIC_FAILURE.to_string());
        };

        let name = record
            .text(definition.natural_key)
            .unwrap_or_else(|| id.to_string());
        let prompt = format!("Delete {} \"{}\"? This cannot be undone.", definition.label, name);
        if !confirmation.confirm(&prompt) {
            return DeletionOutcome::Cancelled;
        }

        let result = self.busy.track(self.client.delete(id)).await;
        match result {
            Ok(ack) if ack.success => {
                info!(entity = %definition.kind, id = %id, "Record deleted");
                self.notifier.notify(
                    Notification::success(format!("{} deleted", definition.label))
                        .with_description(ack.message.unwrap_or(name)),
                );
                DeletionOutcome::Deleted
            }
            Ok(ack) => {
                let message = ack.message.unwrap_or_else(|| GENERIC_FAILURE.to_string());
                self.fail(&message);
                DeletionOutcome::Failed(message)
            }
            Err(e) => {
                warn!(entity = %definition.kind, id = %id, error = %e, "Delete failed");
                let message = e.user_message();
                self.fail(&message);
                DeletionOutcome::Failed(message)
            }
        }
    }

    fn fail(&self, message: &str) {
        self.notifier.notify(
            Notification::error(format!("Failed to delete {}", self.client.definition().label))
                .with_description(message),
        );
    }
}
