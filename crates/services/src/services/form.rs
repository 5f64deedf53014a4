//! Form state held by the side panel.

use std::collections::BTreeMap;

use domain::{
    entity::EntityDefinition,
    field::{FieldDescriptor, FieldKind},
    record::{EntityRecord, display_value},
};
use serde_json::Value;

/// Per-field error text keyed by field name.
pub type FieldErrors = BTreeMap<String, String>;

/// Raw value of one form field. Numeric fields hold the typed text until submit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormValue {
    Empty,
    Text(String),
    Flag(bool),
    List(Vec<String>),
}

impl FormValue {
    /// Type-appropriate empty default for a field kind.
    pub fn default_for(kind: FieldKind) -> Self {
        match kind {
            FieldKind::Text | FieldKind::Multiline | FieldKind::Select => Self::Text(String::new()),
            FieldKind::Number => Self::Empty,
            FieldKind::Checkbox => Self::Flag(false),
            FieldKind::MultiSelect => Self::List(Vec::new()),
        }
    }

    /// Blank for the purpose of a "required" rule. `Flag(false)` counts as filled.
    pub fn is_blank(&self) -> bool {
        match self {
            Self::Empty => true,
            Self::Text(s) => s.trim().is_empty(),
            Self::Flag(_) => false,
            Self::List(items) => items.is_empty(),
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Inverse of [`FormValue::parse`], for pre-filling an input.
    pub fn to_input(&self) -> String {
        match self {
            Self::Empty => String::new(),
            Self::Text(s) => s.clone(),
            Self::Flag(flag) => flag.to_string(),
            Self::List(items) => items.join(", "),
        }
    }

    /// Parse user input for a field of the given kind.
    pub fn parse(kind: FieldKind, raw: &str) -> Self {
        match kind {
            FieldKind::Checkbox => Self::Flag(matches!(
                raw.trim().to_ascii_lowercase().as_str(),
                "true" | "yes" | "1" | "on"
            )),
            FieldKind::MultiSelect => Self::List(utils::text::split_comma_list(raw)),
            FieldKind::Number if raw.trim().is_empty() => Self::Empty,
            _ => Self::Text(raw.to_string()),
        }
    }

    fn from_record_value(field: &FieldDescriptor, value: Option<&Value>) -> Self {
        let Some(value) = value.filter(|v| !v.is_null()) else {
            return Self::default_for(field.kind);
        };

        match field.kind {
            FieldKind::Checkbox => Self::Flag(value.as_bool().unwrap_or(false)),
            FieldKind::MultiSelect => Self::List(match value {
                Value::Array(items) => items.iter().map(display_value).collect(),
                other => vec![display_value(other)],
            }),
            // arrays are joined back into the comma separated form the field edits
            _ => Self::Text(display_value(value)),
        }
    }
}

/// Current value of every field of one entity form.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FormValues {
    values: BTreeMap<&'static str, FormValue>,
}

impl FormValues {
    pub fn defaults(definition: &EntityDefinition) -> Self {
        Self {
            values: definition
                .fields
                .iter()
                .map(|f| (f.name, FormValue::default_for(f.kind)))
                .collect(),
        }
    }

    /// Initialize from a persisted record. A field missing under its query
    /// name is looked up under its backend name before falling back to the default.
    pub fn from_record(definition: &EntityDefinition, record: &EntityRecord) -> Self {
        Self {
            values: definition
                .fields
                .iter()
                .map(|f| {
                    let value = record
                        .get(f.name)
                        .or_else(|| record.get(&f.backend_name()));
                    (f.name, FormValue::from_record_value(f, value))
                })
                .collect(),
        }
    }

    pub fn get(&self, field: &str) -> Option<&FormValue> {
        self.values.get(field)
    }

    /// Text content of a field, empty when the field holds no text.
    pub fn text(&self, field: &str) -> &str {
        self.get(field).and_then(FormValue::as_text).unwrap_or_default()
    }

    pub(crate) fn set(&mut self, field: &'static str, value: FormValue) {
        self.values.insert(field, value);
    }

    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &FormValue)> {
        self.values.iter().map(|(name, value)| (*name, value))
    }
}
