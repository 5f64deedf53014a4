//! AI add-ons sold on top of a plan, priced per month with a credit allowance.

use once_cell::sync::Lazy;

use super::EntityKind;
use crate::{
    entity::{DeleteShape, EntityDefinition},
    field::FieldDescriptor,
};

pub static DEFINITION: Lazy<EntityDefinition> = Lazy::new(|| EntityDefinition {
    kind: EntityKind::AiAddon,
    label: "AI Add-on",
    plural_label: "AI Add-ons",
    slug: "ai-addons",
    list_field: "aiAddons",
    create_field: "createAiAddon",
    update_field: "updateAiAddon",
    delete_field: "deleteAiAddon",
    delete_shape: DeleteShape::Boolean,
    fields: vec![
        FieldDescriptor::text("name", "Name").required(),
        FieldDescriptor::multiline("description", "Description"),
        FieldDescriptor::number("price", "Monthly price").required(),
        FieldDescriptor::number("creditsPerMonth", "Credits per month"),
        FieldDescriptor::checkbox("isActive", "Active"),
    ],
    search_fields: &["name", "description"],
    natural_key: "name",
    audited: true,
});
