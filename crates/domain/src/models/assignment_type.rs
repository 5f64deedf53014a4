//! Assignment types.

use once_cell::sync::Lazy;

use super::EntityKind;
use crate::{
    entity::{DeleteShape, EntityDefinition},
    field::FieldDescriptor,
};

pub static DEFINITION: Lazy<EntityDefinition> = Lazy::new(|| EntityDefinition {
    kind: EntityKind::AssignmentType,
    label: "Assignment Type",
    plural_label: "Assignment Types",
    slug: "assignment-types",
    list_field: "assignmentTypes",
    create_field: "createAssignmentType",
    update_field: "updateAssignmentType",
    delete_field: "deleteAssignmentType",
    delete_shape: DeleteShape::Boolean,
    fields: vec![
        FieldDescriptor::text("name", "Name").required(),
        FieldDescriptor::multiline("description", "Description"),
        FieldDescriptor::checkbox("requiresApproval", "Requires approval"),
    ],
    search_fields: &["name", "description"],
    natural_key: "name",
    audited: false,
});
