//! Companies are the tenants of the platform.

use once_cell::sync::Lazy;

use super::EntityKind;
use crate::{
    entity::{DeleteShape, EntityDefinition},
    field::{FieldDescriptor, FieldFormat},
};

pub static DEFINITION: Lazy<EntityDefinition> = Lazy::new(|| EntityDefinition {
    kind: EntityKind::Company,
    label: "Company",
    plural_label: "Companies",
    slug: "companies",
    list_field: "companies",
    create_field: "createCompany",
    update_field: "updateCompany",
    delete_field: "deleteCompany",
    delete_shape: DeleteShape::Envelope,
    fields: vec![
        FieldDescriptor::text("name", "Company name").required(),
        FieldDescriptor::text("email", "Billing email")
            .required()
            .format(FieldFormat::Email),
        FieldDescriptor::text("phone", "Phone"),
        FieldDescriptor::multiline("address", "Address"),
        FieldDescriptor::select("planId", "Plan", &[]).references(EntityKind::Plan, "name"),
        FieldDescriptor::multi_select("addonIds", "AI add-ons")
            .backend("ai_addon_ids")
            .references(EntityKind::AiAddon, "name"),
        FieldDescriptor::checkbox("isActive", "Active"),
    ],
    search_fields: &["name", "email", "phone"],
    natural_key: "email",
    audited: true,
});
