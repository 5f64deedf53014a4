use anyhow::{Context, Result};
use dialoguer::{Confirm, Input, MultiSelect, Password, Select};
use domain::{
    field::{FieldDescriptor, FieldKind},
    record::RecordId,
};
use services::services::{
    deletion::Confirmation,
    entity_table::EntityTable,
    form::{FormValue, FormValues},
    validation,
};

/// Asks on the terminal unless `--yes` was given. No terminal means no.
pub struct TerminalConfirmation {
    assume_yes: bool,
}

impl TerminalConfirmation {
    pub fn new(assume_yes: bool) -> Self {
        Self { assume_yes }
    }
}

impl Confirmation for TerminalConfirmation {
    fn confirm(&self, prompt: &str) -> bool {
        if self.assume_yes {
            return true;
        }
        Confirm::new()
            .with_prompt(prompt)
            .default(false)
            .interact()
            .unwrap_or(false)
    }
}

pub fn text(prompt: &str) -> Result<String> {
    Input::<String>::new()
        .with_prompt(prompt)
        .interact_text()
        .context("failed to read input")
}

pub fn password(prompt: &str) -> Result<String> {
    Password::new()
        .with_prompt(prompt)
        .interact()
        .context("failed to read password")
}

pub fn new_password() -> Result<String> {
    Password::new()
        .with_prompt("New password")
        .with_confirmation("Repeat password", "Passwords do not match")
        .interact()
        .context("failed to read password")
}

/// Walk every field of the open form, showing the current value as default.
/// Reference fields with a loaded lookup are picked from a list of labels.
pub fn fill_form(table: &mut EntityTable) -> Result<()> {
    let definition = table.definition();
    for field in &definition.fields {
        let mut label = required_label(field, table.form().values());

        let options = table.reference_options(field.name);
        if !options.is_empty() {
            let value = pick_reference(field, &label, &options, table.form().values())?;
            table.form_mut().set_field(field.name, value)?;
            continue;
        }

        match field.kind {
            FieldKind::Select if !field.options.is_empty() => {
                label = format!("{label} [{}]", field.options.join("/"));
            }
            FieldKind::Checkbox => label.push_str(" [true/false]"),
            FieldKind::MultiSelect => label.push_str(" (comma separated ids)"),
            _ => {}
        }

        let current = table
            .form()
            .values()
            .get(field.name)
            .map(|value| value.to_input())
            .unwrap_or_default();
        let raw: String = Input::new()
            .with_prompt(label)
            .with_initial_text(current)
            .allow_empty(true)
            .interact_text()
            .with_context(|| format!("failed to read {}", field.label))?;
        table.form_mut().set_input(field.name, &raw)?;
    }
    Ok(())
}

/// The field label, marked with ` *` while the current values require it.
fn required_label(field: &FieldDescriptor, values: &FormValues) -> String {
    if validation::is_required(field, values) {
        format!("{} *", field.label)
    } else {
        field.label.to_string()
    }
}

fn pick_reference(
    field: &FieldDescriptor,
    label: &str,
    options: &[(RecordId, String)],
    values: &FormValues,
) -> Result<FormValue> {
    let labels: Vec<&str> = options.iter().map(|(_, label)| label.as_str()).collect();
    let current = values.get(field.name);
    let failed = || format!("failed to read {}", field.label);

    if field.kind == FieldKind::MultiSelect {
        let selected: Vec<bool> = options
            .iter()
            .map(|(id, _)| match current {
                Some(FormValue::List(ids)) => ids.iter().any(|v| v == id.as_str()),
                _ => false,
            })
            .collect();
        let picked = MultiSelect::new()
            .with_prompt(label)
            .items(&labels[..])
            .defaults(&selected)
            .interact()
            .with_context(failed)?;
        return Ok(FormValue::List(
            picked.into_iter().map(|idx| options[idx].0.to_string()).collect(),
        ));
    }

    let current_id = current.and_then(FormValue::as_text).unwrap_or_default();
    let default = options
        .iter()
        .position(|(id, _)| id.as_str() == current_id)
        .map_or(0, |idx| idx + 1);
    let choice = Select::new()
        .with_prompt(label)
        .item("(none)")
        .items(&labels[..])
        .default(default)
        .interact()
        .with_context(failed)?;
    Ok(match choice {
        0 => FormValue::Text(String::new()),
        idx => FormValue::Text(options[idx - 1].0.to_string()),
    })
}
