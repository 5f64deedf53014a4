//! Work order stages, ordered by `displayOrder`.

use once_cell::sync::Lazy;

use super::EntityKind;
use crate::{
    entity::{DeleteShape, EntityDefinition},
    field::{FieldDescriptor, FieldFormat},
};

pub static DEFINITION: Lazy<EntityDefinition> = Lazy::new(|| EntityDefinition {
    kind: EntityKind::WorkOrderStage,
    label: "Work Order Stage",
    plural_label: "Work Order Stages",
    slug: "work-order-stages",
    list_field: "workOrderStages",
    create_field: "createWorkOrderStage",
    update_field: "updateWorkOrderStage",
    delete_field: "deleteWorkOrderStage",
    delete_shape: DeleteShape::Envelope,
    fields: vec![
        FieldDescriptor::text("name", "Name").required(),
        FieldDescriptor::multiline("description", "Description"),
        FieldDescriptor::number("displayOrder", "Display order").required(),
        FieldDescriptor::text("color", "Color").format(FieldFormat::HexColor),
        FieldDescriptor::checkbox("isTerminal", "Closes the work order"),
    ],
    search_fields: &["name", "description"],
    natural_key: "name",
    audited: true,
});
