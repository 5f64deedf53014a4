//! Subscription plans offered to companies.

use once_cell::sync::Lazy;

use super::EntityKind;
use crate::{
    entity::{DeleteShape, EntityDefinition},
    field::FieldDescriptor,
};

pub const BILLING_CYCLES: &[&str] = &["monthly", "yearly"];

/// Subscription plans offered to companies.
pub static DEFINITION: Lazy<EntityDefinition> = Lazy::new(|| EntityDefinition {
    kind: EntityKind::Plan,
    label: "Plan",
    plural_label: "Plans",
    slug: "plans",
    list_field: "plans",
    create_field: "createPlan",
    update_field: "updatePlan",
    delete_field: "deletePlan",
    delete_shape: DeleteShape::Envelope,
    fields: vec![
        FieldDescriptor::text("name", "Name").required(),
        FieldDescriptor::multiline("description", "Description"),
        FieldDescriptor::number("price", "Price").required(),
        FieldDescriptor::select("billingCycle", "Billing cycle", BILLING_CYCLES).required(),
        FieldDescriptor::number("maxUsers", "Max users"),
        FieldDescriptor::number("maxAssets", "Max assets"),
        FieldDescriptor::multiline("features", "Features").comma_list(),
        FieldDescriptor::checkbox("isActive", "Active"),
    ],
    search_fields: &["name", "description"],
    natural_key: "name",
    audited: true,
});
