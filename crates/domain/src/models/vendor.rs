//! Service vendors. `serviceTypeIds` lists the service types a vendor covers.

use once_cell::sync::Lazy;

use super::EntityKind;
use crate::{
    entity::{DeleteShape, EntityDefinition},
    field::{FieldDescriptor, FieldFormat},
};

pub static DEFINITION: Lazy<EntityDefinition> = Lazy::new(|| EntityDefinition {
    kind: EntityKind::Vendor,
    label: "Vendor",
    plural_label: "Vendors",
    slug: "vendors",
    list_field: "vendors",
    create_field: "createVendor",
    update_field: "updateVendor",
    delete_field: "deleteVendor",
    delete_shape: DeleteShape::Boolean,
    fields: vec![
        FieldDescriptor::text("name", "Name").required(),
        FieldDescriptor::text("email", "Email").format(FieldFormat::Email),
        FieldDescriptor::text("phone", "Phone"),
        FieldDescriptor::multiline("address", "Address"),
        // services offered, resolved through the service type lookup
        FieldDescriptor::multi_select("serviceTypeIds", "Service types")
            .references(EntityKind::ServiceType, "name"),
    ],
    search_fields: &["name", "email", "phone"],
    natural_key: "name",
    audited: true,
});
