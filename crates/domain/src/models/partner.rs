//! Reseller partners and their commission rate.

use once_cell::sync::Lazy;

use super::EntityKind;
use crate::{
    entity::{DeleteShape, EntityDefinition},
    field::{FieldDescriptor, FieldFormat},
};

/// Resellers that onboard companies on the platform.
pub static DEFINITION: Lazy<EntityDefinition> = Lazy::new(|| EntityDefinition {
    kind: EntityKind::Partner,
    label: "Partner",
    plural_label: "Partners",
    slug: "partners",
    list_field: "partners",
    create_field: "createPartner",
    update_field: "updatePartner",
    delete_field: "deletePartner",
    delete_shape: DeleteShape::Boolean,
    fields: vec![
        FieldDescriptor::text("name", "Name").required(),
        FieldDescriptor::text("email", "Email")
            .required()
            .format(FieldFormat::Email),
        FieldDescriptor::text("contactPerson", "Contact person"),
        FieldDescriptor::text("phone", "Phone"),
        FieldDescriptor::number("commissionRate", "Commission %"),
    ],
    search_fields: &["name", "email", "contactPerson"],
    natural_key: "email",
    audited: true,
});
