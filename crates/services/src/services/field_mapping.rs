//! Transform form state into a mutation `input`.
//!
//! The backend names come from each entity's field descriptors; this is the only
//! place UI names are rewritten.

use domain::{
    entity::EntityDefinition,
    field::{FieldDescriptor, FieldKind},
    record::{AUDIT_FIELDS, ID_FIELD, TYPENAME_FIELD},
};
use serde_json::{Map, Number, Value};

use super::{
    form::{FormValue, FormValues},
    validation,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputMode {
    Create,
    Update,
}

/// Build the `input` object for a create or update mutation.
pub fn to_mutation_input(
    definition: &EntityDefinition,
    values: &FormValues,
    mode: InputMode,
) -> Map<String, Value> {
    let mut input: Map<String, Value> = definition
        .fields
        .iter()
        .filter_map(|field| {
            let value = values.get(field.name)?;
            let converted = if validation::is_applicable(field, values) {
                convert_value(field, value)
            } else {
                convert_value(field, &FormValue::default_for(field.kind))
            };
            Some((field.backend_name(), converted))
        })
        .collect();
    strip_server_managed(&mut input, mode);
    input
}

/// Drop `id` when creating; audit timestamps and `__typename` always.
fn strip_server_managed(input: &mut Map<String, Value>, mode: InputMode) {
    if mode == InputMode::Create {
        input.remove(ID_FIELD);
    }
    input.remove(TYPENAME_FIELD);
    for field in AUDIT_FIELDS {
        input.remove(*field);
    }
}

fn convert_value(field: &FieldDescriptor, value: &FormValue) -> Value {
    match (field.kind, value) {
        (_, FormValue::Empty) => Value::Null,
        (_, FormValue::Flag(flag)) => Value::Bool(*flag),
        (_, FormValue::List(items)) => {
            Value::Array(items.iter().cloned().map(Value::String).collect())
        }
        (FieldKind::Number, FormValue::Text(raw)) => coerce_number(raw),
        (_, FormValue::Text(raw)) if field.comma_list => Value::Array(
            utils::text::split_comma_list(raw)
                .into_iter()
                .map(Value::String)
                .collect(),
        ),
        // an unset optional select is "no reference", not an empty id
        (FieldKind::Select, FormValue::Text(raw)) if raw.trim().is_empty() => Value::Null,
        (_, FormValue::Text(raw)) => Value::String(raw.trim().to_string()),
    }
}

fn coerce_number(raw: &str) -> Value {
    let raw = raw.trim();
    if let Ok(int) = raw.parse::<i64>() {
        return Value::Number(int.into());
    }
    raw.parse::<f64>()
        .ok()
        .and_then(Number::from_f64)
        .map(Value::Number)
        .unwrap_or(Value::Null)
}
