//! Asset categories group asset types and carry the icon shown for them.

use once_cell::sync::Lazy;

use super::EntityKind;
use crate::{
    entity::{DeleteShape, EntityDefinition},
    field::{FieldDescriptor, FieldFormat},
};

pub const ICON_TYPES: &[&str] = &["Square", "Circle"];

pub static DEFINITION: Lazy<EntityDefinition> = Lazy::new(|| EntityDefinition {
    kind: EntityKind::AssetCategory,
    label: "Asset Category",
    plural_label: "Asset Categories",
    slug: "asset-categories",
    list_field: "assetCategories",
    create_field: "createAssetCategory",
    update_field: "updateAssetCategory",
    delete_field: "deleteAssetCategory",
    delete_shape: DeleteShape::Envelope,
    fields: vec![
        FieldDescriptor::text("name", "Name").required(),
        FieldDescriptor::multiline("description", "Description"),
        FieldDescriptor::text("iconName", "Icon").required(),
        FieldDescriptor::text("iconColor", "Icon color")
            .required()
            .format(FieldFormat::HexColor),
        FieldDescriptor::select("iconType", "Icon shape", ICON_TYPES).required(),
    ],
    search_fields: &["name", "description"],
    natural_key: "name",
    audited: true,
});
