//! `id -> label` tables used to show foreign references by name.

use std::collections::HashMap;

use domain::record::{EntityRecord, RecordId, display_value};
use serde_json::Value;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LookupTable {
    labels: HashMap<RecordId, String>,
}

impl LookupTable {
    pub fn from_records(records: &[EntityRecord], label_field: &str) -> Self {
        Self {
            labels: records
                .iter()
                .filter_map(|record| {
                    let id = record.id.clone()?;
                    let label = record.text(label_field).unwrap_or_else(|| id.to_string());
                    Some((id, label))
                })
                .collect(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    /// Choices for a select input, ordered by label.
    pub fn options(&self) -> Vec<(&RecordId, &str)> {
        let mut options: Vec<_> = self
            .labels
            .iter()
            .map(|(id, label)| (id, label.as_str()))
            .collect();
        options.sort_by(|a, b| a.1.cmp(b.1).then_with(|| a.0.cmp(b.0)));
        options
    }

    pub fn resolve(&self, id: &RecordId) -> Option<&str> {
        self.labels.get(id).map(String::as_str)
    }

    /// Label for a stored reference. Unknown ids (including every id while the
    /// table has not loaded yet) show as the raw id.
    pub fn label_for(&self, raw: &Value) -> String {
        match raw {
            Value::Array(items) => items
                .iter()
                .map(|item| self.label_for(item))
                .collect::<Vec<_>>()
                .join(", "),
            other => match RecordId::from_value(other) {
                Some(id) => self
                    .resolve(&id)
                    .map(str::to_string)
                    .unwrap_or_else(|| id.to_string()),
                None => display_value(other),
            },
        }
    }
}
