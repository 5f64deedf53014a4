//! Shared handles every screen is built from.

use std::sync::Arc;

use domain::models::EntityKind;

use super::{
    busy::BusyTracker, entity_client::EntityClient, graphql::GraphQlTransport,
    notification::Notifier,
};

/// Cloned into each screen.
#[derive(Clone)]
pub struct AdminContext {
    pub transport: Arc<dyn GraphQlTransport>,
    pub notifier: Arc<dyn Notifier>,
    pub busy: BusyTracker,
}

impl AdminContext {
    pub fn new(transport: Arc<dyn GraphQlTransport>, notifier: Arc<dyn Notifier>) -> Self {
        Self {
            transport,
            notifier,
            busy: BusyTracker::new(),
        }
    }

    pub fn client(&self, kind: EntityKind) -> EntityClient {
        EntityClient::new(self.transport.clone(), kind.definition())
    }
}
