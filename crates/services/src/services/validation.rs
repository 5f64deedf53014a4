//! Schema-driven validation of form values against field descriptors.

use domain::{
    entity::EntityDefinition,
    field::{FieldDescriptor, FieldFormat, FieldKind},
};
use once_cell::sync::Lazy;
use regex::Regex;
use url::Url;

use super::form::{FieldErrors, FormValue, FormValues};

static EMAIL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").expect("valid email regex"));
static HEX_COLOR_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^#(?:[0-9a-fA-F]{3}|[0-9a-fA-F]{6}|[0-9a-fA-F]{8})$").expect("valid color regex")
});

/// Whether `field` must be filled given the rest of the form.
pub fn is_required(field: &FieldDescriptor, values: &FormValues) -> bool {
    field.required
        || field
            .required_when
            .is_some_and(|rule| rule.is_active(values.text(rule.field).trim()))
}

/// Whether `field` is in play at all. A conditional field whose condition
/// does not hold is hidden and carries no value.
pub fn is_applicable(field: &FieldDescriptor, values: &FormValues) -> bool {
    field
        .required_when
        .is_none_or(|rule| rule.is_active(values.text(rule.field).trim()))
}

/// Error text for one field, `None` when it passes every rule.
pub fn validate_field(field: &FieldDescriptor, values: &FormValues) -> Option<String> {
    if !is_applicable(field, values) {
        return None;
    }
    let default = FormValue::default_for(field.kind);
    let value = values.get(field.name).unwrap_or(&default);

    if value.is_blank() {
        return is_required(field, values).then(|| format!("{} is required", field.label));
    }

    match (field.kind, value) {
        (FieldKind::Number, FormValue::Text(raw))
            if !raw.trim().parse::<f64>().is_ok_and(f64::is_finite) =>
        {
            return Some(format!("{} must be a number", field.label));
        }
        (FieldKind::Select, FormValue::Text(raw))
            if !field.options.is_empty() && !field.options.contains(&raw.trim()) =>
        {
            return Some(format!(
                "{} must be one of: {}",
                field.label,
                field.options.join(", ")
            ));
        }
        (FieldKind::MultiSelect, FormValue::List(items))
            if !field.options.is_empty()
                && items.iter().any(|item| !field.options.contains(&item.as_str())) =>
        {
            return Some(format!(
                "{} must only contain: {}",
                field.label,
                field.options.join(", ")
            ));
        }
        _ => {}
    }

    let text = value.as_text()?.trim();
    match field.format? {
        FieldFormat::Email if !EMAIL_RE.is_match(text) => {
            Some(format!("{} must be a valid email address", field.label))
        }
        FieldFormat::HexColor if !HEX_COLOR_RE.is_match(text) => Some(format!(
            "{} must be a hex color such as #4A5568",
            field.label
        )),
        FieldFormat::Url if Url::parse(text).is_err() => {
            Some(format!("{} must be a valid URL", field.label))
        }
        _ => None,
    }
}

/// Validate every field of a form.
pub fn validate(definition: &EntityDefinition, values: &FormValues) -> FieldErrors {
    definition
        .fields
        .iter()
        .filter_map(|field| {
            validate_field(field, values).map(|message| (field.name.to_string(), message))
        })
        .collect()
}
