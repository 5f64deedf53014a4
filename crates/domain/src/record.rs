use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

pub const ID_FIELD: &str = "id";
pub const TYPENAME_FIELD: &str = "__typename";

/// Audit and soft-delete markers owned by the backend, in both casings.
pub const AUDIT_FIELDS: &[&str] = &[
    "createdAt",
    "updatedAt",
    "deletedAt",
    "created_at",
    "updated_at",
    "deleted_at",
];

/// Identifier assigned by the backend. Numeric ids are kept in their decimal form.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct RecordId(String);

impl RecordId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Accepts a JSON string or integer, which is what the backend sends for ids.
    pub fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::String(s) if !s.is_empty() => Some(Self(s.clone())),
            Value::Number(n) => Some(Self(n.to_string())),
            _ => None,
        }
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for RecordId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for RecordId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl<'de> Deserialize<'de> for RecordId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum RawId {
            Text(String),
            Number(i64),
        }

        Ok(match RawId::deserialize(deserializer)? {
            RawId::Text(s) => Self(s),
            RawId::Number(n) => Self(n.to_string()),
        })
    }
}

/// Whether a record exists only locally or has been persisted by the backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lifecycle {
    Draft,
    Persisted,
}

/// One row of any entity: field name to JSON value, with `id` held apart.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct EntityRecord {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<RecordId>,
    #[serde(flatten)]
    pub fields: Map<String, Value>,
}

impl EntityRecord {
    pub fn new(id: impl Into<RecordId>) -> Self {
        Self {
            id: Some(id.into()),
            fields: Map::new(),
        }
    }

    pub fn with(mut self, field: &str, value: impl Into<Value>) -> Self {
        self.fields.insert(field.to_string(), value.into());
        self
    }

    pub fn lifecycle(&self) -> Lifecycle {
        if self.id.is_some() {
            Lifecycle::Persisted
        } else {
            Lifecycle::Draft
        }
    }

    pub fn get(&self, field: &str) -> Option<&Value> {
        if field == ID_FIELD {
            return None;
        }
        self.fields.get(field).filter(|v| !v.is_null())
    }

    /// Display form of a field; `None` when absent or null.
    pub fn text(&self, field: &str) -> Option<String> {
        if field == ID_FIELD {
            return self.id.as_ref().map(|id| id.to_string());
        }
        self.get(field).map(display_value)
    }

    pub fn created_at(&self) -> Option<DateTime<Utc>> {
        self.timestamp("createdAt")
    }

    pub fn updated_at(&self) -> Option<DateTime<Utc>> {
        self.timestamp("updatedAt")
    }

    fn timestamp(&self, field: &str) -> Option<DateTime<Utc>> {
        self.get(field)
            .and_then(Value::as_str)
            .and_then(|raw| DateTime::parse_from_rfc3339(raw).ok())
            .map(|dt| dt.with_timezone(&Utc))
    }
}

/// Render a scalar or list-of-scalar value the way a grid cell shows it.
pub fn display_value(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        Value::Bool(b) => (if *b { "yes" } else { "no" }).to_string(),
        Value::Number(n) => n.to_string(),
        Value::Array(items) => items
            .iter()
            .map(display_value)
            .collect::<Vec<_>>()
            .join(", "),
        Value::Object(_) => value.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_record_deserializes_numeric_id() {
        let record: EntityRecord =
            serde_json::from_value(json!({"id": 42, "name": "HVAC", "__typename": "AssetCategory"}))
                .unwrap();
        assert_eq!(record.id, Some(RecordId::new("42")));
        assert_eq!(record.text("name").as_deref(), Some("HVAC"));
        assert_eq!(record.lifecycle(), Lifecycle::Persisted);
    }

    #[test]
    fn test_record_without_id_is_draft() {
        let record: EntityRecord = serde_json::from_value(json!({"name": "Draft"})).unwrap();
        assert_eq!(record.lifecycle(), Lifecycle::Draft);
        assert_eq!(record.text("id"), None);
    }

    #[test]
    fn test_audit_fields() {
        let record = EntityRecord::new("1")
            .with("createdAt", "2024-03-01T10:00:00Z")
            .with("deletedAt", Value::Null);
        assert_eq!(
            record.created_at().map(|d| d.to_rfc3339()),
            Some("2024-03-01T10:00:00+00:00".to_string())
        );
        assert_eq!(record.updated_at(), None);
    }

    #[test]
    fn test_display_value_lists() {
        assert_eq!(display_value(&json!(["a", 2, true])), "a, 2, yes");
        assert_eq!(display_value(&Value::Null), "");
    }
}
