//! Work order types and the stage new orders start in.

use once_cell::sync::Lazy;

use super::EntityKind;
use crate::{
    entity::{DeleteShape, EntityDefinition},
    field::FieldDescriptor,
};

pub static DEFINITION: Lazy<EntityDefinition> = Lazy::new(|| EntityDefinition {
    kind: EntityKind::WorkOrderType,
    label: "Work Order Type",
    plural_label: "Work Order Types",
    slug: "work-order-types",
    list_field: "workOrderTypes",
    create_field: "createWorkOrderType",
    update_field: "updateWorkOrderType",
    delete_field: "deleteWorkOrderType",
    delete_shape: DeleteShape::Envelope,
    fields: vec![
        FieldDescriptor::text("name", "Name").required(),
        FieldDescriptor::multiline("description", "Description"),
        FieldDescriptor::select("defaultStageId", "Initial stage", &[])
            .references(EntityKind::WorkOrderStage, "name"),
    ],
    search_fields: &["name", "description"],
    natural_key: "name",
    audited: true,
});
