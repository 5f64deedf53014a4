//! Service types offered by vendors.

use once_cell::sync::Lazy;

use super::EntityKind;
use crate::{
    entity::{DeleteShape, EntityDefinition},
    field::FieldDescriptor,
};

pub static DEFINITION: Lazy<EntityDefinition> = Lazy::new(|| EntityDefinition {
    kind: EntityKind::ServiceType,
    label: "Service Type",
    plural_label: "Service Types",
    slug: "service-types",
    list_field: "serviceTypes",
    create_field: "createServiceType",
    update_field: "updateServiceType",
    delete_field: "deleteServiceType",
    delete_shape: DeleteShape::Envelope,
    fields: vec![
        FieldDescriptor::text("name", "Name").required(),
        FieldDescriptor::multiline("description", "Description"),
    ],
    search_fields: &["name", "description"],
    natural_key: "name",
    audited: true,
});
