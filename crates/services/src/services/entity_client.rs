//! CRUD calls for one entity, built from its definition.

use std::sync::Arc;

use domain::{
    entity::{Acknowledgement, EntityDefinition},
    record::{EntityRecord, RecordId},
};
use serde_json::{Map, Value, json};
use tracing::debug;

use super::graphql::{GraphQlClientError, GraphQlRequest, GraphQlTransport, take_root};

/// Issues the four CRUD operations of one entity over a shared transport.
#[derive(Clone)]
pub struct EntityClient {
    transport: Arc<dyn GraphQlTransport>,
    definition: &'static EntityDefinition,
}

impl EntityClient {
    pub fn new(transport: Arc<dyn GraphQlTransport>, definition: &'static EntityDefinition) -> Self {
        Self {
            transport,
            definition,
        }
    }

    pub fn definition(&self) -> &'static EntityDefinition {
        self.definition
    }

    pub async fn list(&self) -> Result<Vec<EntityRecord>, GraphQlClientError> {
        let request =
            GraphQlRequest::new(self.definition.list_operation(), self.definition.list_document());
        let data = self.transport.execute(request).await?;
        let rows = match take_root(data, self.definition.list_field)? {
            Value::Null => Vec::new(),
            rows => serde_json::from_value(rows)
                .map_err(|e| GraphQlClientError::Serde(e.to_string()))?,
        };
        debug!(entity = %self.definition.kind, count = rows.len(), "Fetched records");
        Ok(rows)
    }

    pub async fn create(&self, input: Map<String, Value>) -> Result<EntityRecord, GraphQlClientError> {
        let request = GraphQlRequest::new(
            self.definition.create_operation(),
            self.definition.create_document(),
        )
        .with_variables(json!({ "input": input }));
        let data = self.transport.execute(request).await?;
        Self::record_from(take_root(data, self.definition.create_field)?)
    }

    pub async fn update(
        &self,
        id: &RecordId,
        input: Map<String, Value>,
    ) -> Result<EntityRecord, GraphQlClientError> {
        let request = GraphQlRequest::new(
            self.definition.update_operation(),
            self.definition.update_document(),
        )
        .with_variables(json!({ "id": id, "input": input }));
        let data = self.transport.execute(request).await?;
        Self::record_from(take_root(data, self.definition.update_field)?)
    }

    pub async fn delete(&self, id: &RecordId) -> Result<Acknowledgement, GraphQlClientError> {
        let request = GraphQlRequest::new(
            self.definition.delete_operation(),
            self.definition.delete_document(),
        )
        .with_variables(json!({ "id": id }));
        let data = self.transport.execute(request).await?;
        serde_json::from_value(take_root(data, self.definition.delete_field)?)
            .map_err(|e| GraphQlClientError::Serde(e.to_string()))
    }

    fn record_from(value: Value) -> Result<EntityRecord, GraphQlClientError> {
        if value.is_null() {
            return Err(GraphQlClientError::MissingData("record".to_string()));
        }
        serde_json::from_value(value).map_err(|e| GraphQlClientError::Serde(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use domain::models::EntityKind;

    use super::*;
    use crate::services::test_support::ScriptedTransport;

    #[tokio::test]
    async fn test_list_parses_rows_and_tolerates_null() {
        let transport = ScriptedTransport::new();
        transport.respond(
            "Vendors",
            json!({"vendors": [{"id": 1, "name": "CoolAir"}, {"id": "2", "name": "Pumpco"}]}),
        );
        let client = EntityClient::new(transport.clone(), EntityKind::Vendor.definition());

        let rows = client.list().await.unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].id, Some(RecordId::new("1")));

        transport.respond("Vendors", json!({"vendors": null}));
        assert!(client.list().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_update_sends_id_and_input() {
        let transport = ScriptedTransport::new();
        transport.respond(
            "UpdateServiceType",
            json!({"updateServiceType": {"id": "s1", "name": "Repair"}}),
        );
        let client = EntityClient::new(transport.clone(), EntityKind::ServiceType.definition());

        let mut input = Map::new();
        input.insert("name".to_string(), json!("Repair"));
        let record = client.update(&RecordId::new("s1"), input).await.unwrap();
        assert_eq!(record.text("name").as_deref(), Some("Repair"));

        let sent = transport.requests_for("UpdateServiceType");
        assert_eq!(sent[0].variables, json!({"id": "s1", "input": {"name": "Repair"}}));
    }

    #[tokio::test]
    async fn test_delete_normalizes_boolean_response() {
        let transport = ScriptedTransport::new();
        transport.respond("DeleteManufacturer", json!({"deleteManufacturer": true}));
        let client = EntityClient::new(transport.clone(), EntityKind::Manufacturer.definition());

        let ack = client.delete(&RecordId::new("m1")).await.unwrap();
        assert_eq!(ack, Acknowledgement::ok());
    }
}
