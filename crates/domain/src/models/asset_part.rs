//! Spare parts, each tied to an asset type and optionally a manufacturer.

use once_cell::sync::Lazy;

use super::EntityKind;
use crate::{
    entity::{DeleteShape, EntityDefinition},
    field::FieldDescriptor,
};

pub static DEFINITION: Lazy<EntityDefinition> = Lazy::new(|| EntityDefinition {
    kind: EntityKind::AssetPart,
    label: "Asset Part",
    plural_label: "Asset Parts",
    slug: "asset-parts",
    list_field: "assetParts",
    create_field: "createAssetPart",
    update_field: "updateAssetPart",
    delete_field: "deleteAssetPart",
    delete_shape: DeleteShape::Envelope,
    fields: vec![
        FieldDescriptor::text("name", "Name").required(),
        FieldDescriptor::text("partNumber", "Part number"),
        FieldDescriptor::multiline("description", "Description"),
        FieldDescriptor::select("assetTypeId", "Asset type", &[])
            .required()
            .references(EntityKind::AssetType, "name"),
        FieldDescriptor::select("manufacturerId", "Manufacturer", &[])
            .references(EntityKind::Manufacturer, "name"),
        FieldDescriptor::number("unitCost", "Unit cost"),
    ],
    search_fields: &["name", "partNumber", "description"],
    natural_key: "partNumber",
    audited: true,
});
