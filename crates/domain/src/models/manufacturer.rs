//! Equipment manufacturers.

use once_cell::sync::Lazy;

use super::EntityKind;
use crate::{
    entity::{DeleteShape, EntityDefinition},
    field::{FieldDescriptor, FieldFormat},
};

// deleteManufacturer answers with a bare Boolean.
pub static DEFINITION: Lazy<EntityDefinition> = Lazy::new(|| EntityDefinition {
    kind: EntityKind::Manufacturer,
    label: "Manufacturer",
    plural_label: "Manufacturers",
    slug: "manufacturers",
    list_field: "manufacturers",
    create_field: "createManufacturer",
    update_field: "updateManufacturer",
    delete_field: "deleteManufacturer",
    delete_shape: DeleteShape::Boolean,
    fields: vec![
        FieldDescriptor::text("name", "Name").required(),
        FieldDescriptor::text("website", "Website").format(FieldFormat::Url),
        FieldDescriptor::text("contactEmail", "Contact email").format(FieldFormat::Email),
        FieldDescriptor::text("phone", "Phone"),
        FieldDescriptor::text("country", "Country"),
    ],
    search_fields: &["name", "contactEmail", "country"],
    natural_key: "name",
    audited: true,
});
