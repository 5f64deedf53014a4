//! Platform users. Each belongs to one company.

use once_cell::sync::Lazy;

use super::EntityKind;
use crate::{
    entity::{DeleteShape, EntityDefinition},
    field::{FieldDescriptor, FieldFormat},
};

pub const ROLES: &[&str] = &["super_admin", "admin", "manager", "technician", "viewer"];

pub static DEFINITION: Lazy<EntityDefinition> = Lazy::new(|| EntityDefinition {
    kind: EntityKind::User,
    label: "User",
    plural_label: "Users",
    slug: "users",
    list_field: "users",
    create_field: "createUser",
    update_field: "updateUser",
    delete_field: "deleteUser",
    delete_shape: DeleteShape::Envelope,
    fields: vec![
        FieldDescriptor::text("firstName", "First name").required(),
        FieldDescriptor::text("lastName", "Last name").required(),
        FieldDescriptor::text("email", "Email")
            .required()
            .format(FieldFormat::Email),
        FieldDescriptor::select("role", "Role", ROLES).required(),
        FieldDescriptor::select("companyId", "Company", &[])
            .references(EntityKind::Company, "name"),
        FieldDescriptor::checkbox("isActive", "Active"),
    ],
    search_fields: &["firstName", "lastName", "email"],
    natural_key: "email",
    audited: true,
});
