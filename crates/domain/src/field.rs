//! Field descriptors: one declarative entry per form field, driving rendering,
//! validation and the UI -> backend name mapping.

use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumString};

use crate::models::EntityKind;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, EnumString, Display)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum FieldKind {
    Text,
    Number,
    Select,
    Checkbox,
    Multiline,
    MultiSelect,
}

/// Format rule applied to non-empty text values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
#[strum(serialize_all = "snake_case")]
pub enum FieldFormat {
    Email,
    HexColor,
    Url,
}

/// The field is required only while `field` holds one of `one_of`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RequiredWhen {
    pub field: &'static str,
    pub one_of: &'static [&'static str],
}

impl RequiredWhen {
    pub fn is_active(&self, sibling_value: &str) -> bool {
        self.one_of.contains(&sibling_value)
    }
}

/// The field stores another entity's id; `label_field` names the column shown instead.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ForeignRef {
    pub entity: EntityKind,
    pub label_field: &'static str,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldDescriptor {
    /// Name used by queries and records (usually camelCase).
    pub name: &'static str,
    /// Name expected in mutation inputs. `None` means snake_case of `name`.
    pub backend_name: Option<&'static str>,
    pub label: &'static str,
    pub kind: FieldKind,
    pub required: bool,
    pub options: &'static [&'static str],
    pub format: Option<FieldFormat>,
    pub required_when: Option<RequiredWhen>,
    /// Multiline text submitted as an array of comma separated entries.
    pub comma_list: bool,
    pub reference: Option<ForeignRef>,
}

impl FieldDescriptor {
    fn new(name: &'static str, label: &'static str, kind: FieldKind) -> Self {
        Self {
            name,
            backend_name: None,
            label,
            kind,
            required: false,
            options: &[],
            format: None,
            required_when: None,
            comma_list: false,
            reference: None,
        }
    }

    pub fn text(name: &'static str, label: &'static str) -> Self {
        Self::new(name, label, FieldKind::Text)
    }

    pub fn multiline(name: &'static str, label: &'static str) -> Self {
        Self::new(name, label, FieldKind::Multiline)
    }

    pub fn number(name: &'static str, label: &'static str) -> Self {
        Self::new(name, label, FieldKind::Number)
    }

    pub fn checkbox(name: &'static str, label: &'static str) -> Self {
        Self::new(name, label, FieldKind::Checkbox)
    }

    pub fn select(name: &'static str, label: &'static str, options: &'static [&'static str]) -> Self {
        Self {
            options,
            ..Self::new(name, label, FieldKind::Select)
        }
    }

    pub fn multi_select(name: &'static str, label: &'static str) -> Self {
        Self::new(name, label, FieldKind::MultiSelect)
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub fn backend(mut self, backend_name: &'static str) -> Self {
        self.backend_name = Some(backend_name);
        self
    }

    pub fn format(mut self, format: FieldFormat) -> Self {
        self.format = Some(format);
        self
    }

    pub fn required_when(mut self, field: &'static str, one_of: &'static [&'static str]) -> Self {
        self.required_when = Some(RequiredWhen { field, one_of });
        self
    }

    pub fn comma_list(mut self) -> Self {
        self.comma_list = true;
        self
    }

    pub fn references(mut self, entity: EntityKind, label_field: &'static str) -> Self {
        self.reference = Some(ForeignRef {
            entity,
            label_field,
        });
        self
    }

    /// Key this field takes in a mutation `input` object.
    pub fn backend_name(&self) -> String {
        self.backend_name
            .map(str::to_string)
            .unwrap_or_else(|| utils::text::to_snake_case(self.name))
    }
}
