//! Asset types carry one custom attribute whose allowed values only matter for
//! option-style field types.

use once_cell::sync::Lazy;

use super::EntityKind;
use crate::{
    entity::{DeleteShape, EntityDefinition},
    field::FieldDescriptor,
};

pub const FIELD_TYPES: &[&str] = &[
    "text",
    "number",
    "date",
    "checkbox",
    "dropdown",
    "multi_select",
    "radio",
];

/// Field types whose allowed values must be supplied.
pub const OPTION_FIELD_TYPES: &[&str] = &["dropdown", "multi_select", "radio"];

pub static DEFINITION: Lazy<EntityDefinition> = Lazy::new(|| EntityDefinition {
    kind: EntityKind::AssetType,
    label: "Asset Type",
    plural_label: "Asset Types",
    slug: "asset-types",
    list_field: "assetTypes",
    create_field: "createAssetType",
    update_field: "updateAssetType",
    delete_field: "deleteAssetType",
    delete_shape: DeleteShape::Envelope,
    fields: vec![
        FieldDescriptor::text("name", "Name").required(),
        FieldDescriptor::multiline("description", "Description"),
        FieldDescriptor::select("assetCategoryId", "Category", &[])
            .required()
            .references(EntityKind::AssetCategory, "name"),
        FieldDescriptor::text("fieldName", "Attribute name"),
        FieldDescriptor::select("fieldType", "Attribute type", FIELD_TYPES),
        FieldDescriptor::multiline("allowedValues", "Allowed values")
            .comma_list()
            .required_when("fieldType", OPTION_FIELD_TYPES),
    ],
    search_fields: &["name", "description"],
    natural_key: "name",
    audited: true,
});
