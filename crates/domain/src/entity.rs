//! Entity definitions: everything the generic CRUD controllers need to know about
//! one record type, and the GraphQL documents derived from it.

use serde::{Deserialize, Deserializer, Serialize};

use crate::{field::FieldDescriptor, models::EntityKind};

/// What the backend's delete mutation returns for an entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeleteShape {
    /// `{ success, message }`
    Envelope,
    /// bare `Boolean!`
    Boolean,
}

#[derive(Debug, Clone)]
pub struct EntityDefinition {
    pub kind: EntityKind,
    pub label: &'static str,
    pub plural_label: &'static str,
    /// Path segment of the management screen, e.g. `asset-categories`.
    pub slug: &'static str,
    pub list_field: &'static str,
    pub create_field: &'static str,
    pub update_field: &'static str,
    pub delete_field: &'static str,
    pub delete_shape: DeleteShape,
    pub fields: Vec<FieldDescriptor>,
    /// Fields the list screen's search box is matched against.
    pub search_fields: &'static [&'static str],
    /// Row key used by the grid when a record has no `id`.
    pub natural_key: &'static str,
    /// Whether records carry `createdAt` / `updatedAt`.
    pub audited: bool,
}

impl EntityDefinition {
    pub fn field(&self, name: &str) -> Option<&FieldDescriptor> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// Fields whose value is another entity's id.
    pub fn references(&self) -> impl Iterator<Item = &FieldDescriptor> {
        self.fields.iter().filter(|f| f.reference.is_some())
    }

    /// Fields that become required while `field` holds certain values.
    pub fn dependents_of<'a>(&'a self, field: &'a str) -> impl Iterator<Item = &'a FieldDescriptor> {
        self.fields
            .iter()
            .filter(move |f| f.required_when.is_some_and(|rule| rule.field == field))
    }

    pub fn selection_set(&self) -> String {
        let mut selection = vec!["id"];
        selection.extend(self.fields.iter().map(|f| f.name));
        if self.audited {
            selection.extend(["createdAt", "updatedAt"]);
        }
        selection.join(" ")
    }

    pub fn list_operation(&self) -> String {
        utils::text::to_pascal_case(self.list_field)
    }

    pub fn create_operation(&self) -> String {
        utils::text::to_pascal_case(self.create_field)
    }

    pub fn update_operation(&self) -> String {
        utils::text::to_pascal_case(self.update_field)
    }

    pub fn delete_operation(&self) -> String {
        utils::text::to_pascal_case(self.delete_field)
    }

    pub fn list_document(&self) -> String {
        format!(
            "query {} {{ {} {{ {} }} }}",
            self.list_operation(),
            self.list_field,
            self.selection_set()
        )
    }

    pub fn create_document(&self) -> String {
        let operation = self.create_operation();
        format!(
            "mutation {operation}($input: {operation}Input!) {{ {}(input: $input) {{ {} }} }}",
            self.create_field,
            self.selection_set()
        )
    }

    pub fn update_document(&self) -> String {
        let operation = self.update_operation();
        format!(
            "mutation {operation}($id: ID!, $input: {operation}Input!) {{ {}(id: $id, input: $input) {{ {} }} }}",
            self.update_field,
            self.selection_set()
        )
    }

    pub fn delete_document(&self) -> String {
        let selection = match self.delete_shape {
            DeleteShape::Envelope => " { success message }",
            DeleteShape::Boolean => "",
        };
        format!(
            "mutation {}($id: ID!) {{ {}(id: $id){selection} }}",
            self.delete_operation(),
            self.delete_field
        )
    }
}

/// Canonical result of delete-style and acknowledgement mutations.
///
/// Some backend operations answer with a bare boolean; it is read as
/// `{ success: <bool>, message: None }`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Acknowledgement {
    pub success: bool,
    pub message: Option<String>,
}

impl Acknowledgement {
    pub fn ok() -> Self {
        Self {
            success: true,
            message: None,
        }
    }
}

impl<'de> Deserialize<'de> for Acknowledgement {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Flag(bool),
            Envelope {
                success: bool,
                #[serde(default)]
                message: Option<String>,
            },
        }

        Ok(match Raw::deserialize(deserializer)? {
            Raw::Flag(success) => Self {
                success,
                message: None,
            },
            Raw::Envelope { success, message } => Self { success, message },
        })
    }
}
