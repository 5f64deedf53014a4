//! Create/edit form shown in the side panel.

use std::sync::Arc;

use domain::record::{EntityRecord, RecordId};
use thiserror::Error;
use tracing::{info, warn};

use super::{
    busy::BusyTracker,
    entity_client::EntityClient,
    field_mapping::{InputMode, to_mutation_input},
    form::{FieldErrors, FormValue, FormValues},
    notification::{Notification, Notifier},
    validation,
};

#[derive(Debug, Clone, PartialEq)]
pub enum FormMode {
    Add,
    Edit(EntityRecord),
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum FormError {
    #[error("the form is not open")]
    NotOpen,
    #[error("unknown field `{0}`")]
    UnknownField(String),
}

#[derive(Debug, Clone, PartialEq)]
pub enum SubmitOutcome {
    /// Validation failed; no mutation was sent.
    Invalid(FieldErrors),
    Saved(EntityRecord),
    /// The mutation failed; the panel stays open with its values.
    Failed(String),
    NotOpen,
}

pub struct SidePanelForm {
    client: EntityClient,
    notifier: Arc<dyn Notifier>,
    busy: BusyTracker,
    open: bool,
    source_id: Option<RecordId>,
    values: FormValues,
    errors: FieldErrors,
    submitted: bool,
}

impl SidePanelForm {
    pub fn new(client: EntityClient, notifier: Arc<dyn Notifier>, busy: BusyTracker) -> Self {
        let values = FormValues::defaults(client.definition());
        Self {
            client,
            notifier,
            busy,
            open: false,
            source_id: None,
            values,
            errors: FieldErrors::new(),
            submitted: false,
        }
    }

    /// Open the panel. State from any previous open is discarded.
    pub fn open(&mut self, mode: FormMode) {
        let definition = self.client.definition();
        match mode {
            FormMode::Add => {
                self.source_id = None;
                self.values = FormValues::defaults(definition);
            }
            FormMode::Edit(record) => {
                self.values = FormValues::from_record(definition, &record);
                self.source_id = record.id;
            }
        }
        self.errors.clear();
        self.submitted = false;
        self.open = true;
    }

    /// Close without saving; the next open starts from scratch.
    pub fn cancel(&mut self) {
        self.reset();
        self.open = false;
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    pub fn is_edit(&self) -> bool {
        self.source_id.is_some()
    }

    pub fn values(&self) -> &FormValues {
        &self.values
    }

    pub fn errors(&self) -> &FieldErrors {
        &self.errors
    }

    pub fn error(&self, field: &str) -> Option<&str> {
        self.errors.get(field).map(String::as_str)
    }

    /// Parse `raw` according to the field's kind and set it.
    pub fn set_input(&mut self, field: &str, raw: &str) -> Result<(), FormError> {
        let kind = self
            .client
            .definition()
            .field(field)
            .ok_or_else(|| FormError::UnknownField(field.to_string()))?
            .kind;
        self.set_field(field, FormValue::parse(kind, raw))
    }

    pub fn set_field(&mut self, field: &str, value: FormValue) -> Result<(), FormError> {
        if !self.open {
            return Err(FormError::NotOpen);
        }
        let definition = self.client.definition();
        let descriptor = definition
            .field(field)
            .ok_or_else(|| FormError::UnknownField(field.to_string()))?;

        self.values.set(descriptor.name, value);
        if self.submitted || self.errors.contains_key(descriptor.name) {
            self.revalidate(descriptor.name);
        }

        // Hidden dependents must not carry stale values or errors.
        for dependent in definition.dependents_of(descriptor.name) {
            if validation::is_required(dependent, &self.values) {
                if self.submitted {
                    self.revalidate(dependent.name);
                }
            } else {
                self.values
                    .set(dependent.name, FormValue::default_for(dependent.kind));
                self.errors.remove(dependent.name);
            }
        }
        Ok(())
    }

    fn revalidate(&mut self, name: &'static str) {
        let Some(descriptor) = self.client.definition().field(name) else {
            return;
        };
        match validation::validate_field(descriptor, &self.values) {
            Some(message) => {
                self.errors.insert(name.to_string(), message);
            }
            None => {
                self.errors.remove(name);
            }
        }
    }

    /// Validate, then create or update. On success the form is reset and closed.
    pub async fn submit(&mut self) -> SubmitOutcome {
        if !self.open {
            return SubmitOutcome::NotOpen;
        }
        let definition = self.client.definition();

        self.submitted = true;
        self.errors = validation::validate(definition, &self.values);
        if !self.errors.is_empty() {
            return SubmitOutcome::Invalid(self.errors.clone());
        }

        let (mode, verb) = match self.source_id {
            Some(_) => (InputMode::Update, "updated"),
            None => (InputMode::Create, "created"),
        };
        let input = to_mutation_input(definition, &self.values, mode);

        let result = {
            let _guard = self.busy.begin();
            match &self.source_id {
                Some(id) => self.client.update(id, input).await,
                None => self.client.create(input).await,
            }
        };

        match result {
            Ok(record) => {
                info!(entity = %definition.kind, id = ?record.id, "Record {}", verb);
                self.notifier
                    .notify(Notification::success(format!("{} {}", definition.label, verb)));
                self.reset();
                self.open = false;
                SubmitOutcome::Saved(record)
            }
            Err(e) => {
                warn!(entity = %definition.kind, error = %e, "Save failed");
                let message = e.user_message();
                self.notifier.notify(
                    Notification::error(format!("Failed to save {}", definition.label))
                        .with_description(message.clone()),
                );
                SubmitOutcome::Failed(message)
            }
        }
    }

    fn reset(&mut self) {
        self.values = FormValues::defaults(self.client.definition());
        self.errors.clear();
        self.source_id = None;
        self.submitted = false;
    }
}

#[cfg(test)]
mod tests {
    use domain::models::EntityKind;
    use serde_json::json;

    use super::*;
    use crate::services::{
        graphql::{GraphQlClientError, GraphQlError},
        notification::NotificationStatus,
        test_support::{RecordingNotifier, ScriptedTransport},
    };

    fn form(kind: EntityKind, transport: &Arc<ScriptedTransport>) -> (SidePanelForm, Arc<RecordingNotifier>) {
        let notifier = RecordingNotifier::new();
        let form = SidePanelForm::new(
            EntityClient::new(transport.clone(), kind.definition()),
            notifier.clone(),
            BusyTracker::new(),
        );
        (form, notifier)
    }

    #[tokio::test]
    async fn test_required_field_blocks_mutation() {
        let transport = ScriptedTransport::new();
        let (mut form, notifier) = form(EntityKind::AssetCategory, &transport);
        form.open(FormMode::Add);
        form.set_input("name", "HVAC").unwrap();
        form.set_input("iconColor", "#4A5568").unwrap();
        form.set_input("iconType", "Square").unwrap();

        let outcome = form.submit().await;
        let SubmitOutcome::Invalid(errors) = outcome else {
            panic!("expected validation failure, got {outcome:?}");
        };
        assert_eq!(errors["iconName"], "Icon is required");
        assert_eq!(form.error("iconName"), Some("Icon is required"));
        assert_eq!(transport.total_calls(), 0);
        assert!(notifier.all().is_empty(), "validation errors stay inline");
        assert!(form.is_open());

        // fixing the field clears its error immediately
        form.set_input("iconName", "fan").unwrap();
        assert_eq!(form.error("iconName"), None);
    }

    #[tokio::test]
    async fn test_edit_then_add_starts_empty() {
        let transport = ScriptedTransport::new();
        let (mut form, _) = form(EntityKind::Manufacturer, &transport);
        let record = EntityRecord::new("m1")
            .with("name", "Carrier")
            .with("country", "US");

        form.open(FormMode::Edit(record));
        assert!(form.is_edit());
        assert_eq!(form.values().text("name"), "Carrier");

        form.open(FormMode::Add);
        assert!(!form.is_edit());
        assert_eq!(form.values().text("name"), "");
        assert_eq!(form.values().text("country"), "");
    }

    #[tokio::test]
    async fn test_field_type_toggle_clears_allowed_values() {
        let transport = ScriptedTransport::new();
        let (mut form, _) = form(EntityKind::AssetType, &transport);
        form.open(FormMode::Add);
        form.set_input("name", "Chiller").unwrap();
        form.set_input("assetCategoryId", "c1").unwrap();
        form.set_input("fieldType", "dropdown").unwrap();

        assert!(matches!(form.submit().await, SubmitOutcome::Invalid(_)));
        assert!(form.error("allowedValues").is_some());

        form.set_input("allowedValues", "small, large").unwrap();
        assert_eq!(form.error("allowedValues"), None);

        form.set_input("fieldType", "dropdown").unwrap();
        form.set_input("allowedValues", "").unwrap();
        assert!(form.error("allowedValues").is_some());

        form.set_input("fieldType", "text").unwrap();
        assert_eq!(form.values().text("allowedValues"), "");
        assert_eq!(form.error("allowedValues"), None);
    }

    #[tokio::test]
    async fn test_hidden_allowed_values_are_not_submitted() {
        let transport = ScriptedTransport::new();
        transport.respond(
            "CreateAssetType",
            json!({"createAssetType": {"id": "t1", "name": "Chiller"}}),
        );
        let (mut form, _) = form(EntityKind::AssetType, &transport);
        form.open(FormMode::Add);
        form.set_input("name", "Chiller").unwrap();
        form.set_input("assetCategoryId", "c1").unwrap();
        form.set_input("fieldType", "text").unwrap();
        form.set_input("allowedValues", "stale, hidden").unwrap();

        assert!(matches!(form.submit().await, SubmitOutcome::Saved(_)));
        let input = &transport.requests_for("CreateAssetType")[0].variables["input"];
        assert_eq!(input["field_type"], json!("text"));
        assert_eq!(input["allowed_values"], json!([]));
    }

    #[tokio::test]
    async fn test_cancel_discards_edit_and_closes() {
        let transport = ScriptedTransport::new();
        let (mut form, _) = form(EntityKind::ServiceType, &transport);
        form.open(FormMode::Edit(EntityRecord::new("s1").with("name", "Repair")));
        form.set_input("name", "").unwrap();
        assert!(matches!(form.submit().await, SubmitOutcome::Invalid(_)));

        form.cancel();
        assert!(!form.is_open());
        assert!(!form.is_edit());
        assert!(form.errors().is_empty());
        assert_eq!(form.values().text("name"), "");
        assert_eq!(form.submit().await, SubmitOutcome::NotOpen);
        assert_eq!(transport.total_calls(), 0);
    }

    #[tokio::test]
    async fn test_update_failure_keeps_panel_open() {
        let transport = ScriptedTransport::new();
        transport.fail(
            "UpdateServiceType",
            GraphQlClientError::GraphQl(vec![GraphQlError::new("Name already in use")]),
        );
        let (mut form, notifier) = form(EntityKind::ServiceType, &transport);
        form.open(FormMode::Edit(
            EntityRecord::new("s1").with("name", "Repair"),
        ));
        form.set_input("name", "Inspection").unwrap();

        let outcome = form.submit().await;
        assert_eq!(outcome, SubmitOutcome::Failed("Name already in use".to_string()));
        assert!(form.is_open());
        assert!(form.is_edit());
        assert_eq!(form.values().text("name"), "Inspection");

        let last = notifier.last().unwrap();
        assert_eq!(last.status, NotificationStatus::Error);
        assert_eq!(last.description.as_deref(), Some("Name already in use"));

        let sent = transport.requests_for("UpdateServiceType");
        assert_eq!(sent[0].variables["id"], json!("s1"));
    }

    #[tokio::test]
    async fn test_set_field_requires_open_panel() {
        let transport = ScriptedTransport::new();
        let (mut form, _) = form(EntityKind::Vendor, &transport);
        assert_eq!(form.set_input("name", "x"), Err(FormError::NotOpen));
        form.open(FormMode::Add);
        assert_eq!(
            form.set_input("nickname", "x"),
            Err(FormError::UnknownField("nickname".to_string()))
        );
        assert_eq!(form.submit().await, SubmitOutcome::Invalid(form.errors().clone()));
    }
}
