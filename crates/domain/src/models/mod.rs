//! Per-entity configuration. Each module declares one `EntityDefinition`.

use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumIter, EnumString};

use crate::entity::EntityDefinition;

pub mod ai_addon;
pub mod asset_category;
pub mod asset_part;
pub mod asset_type;
pub mod assignment_type;
pub mod company;
pub mod manufacturer;
pub mod partner;
pub mod plan;
pub mod service_type;
pub mod user;
pub mod vendor;
pub mod work_order_stage;
pub mod work_order_type;

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, EnumString, Display, EnumIter,
)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum EntityKind {
    Company,
    Partner,
    User,
    Plan,
    AiAddon,
    AssetCategory,
    AssetType,
    AssetPart,
    Manufacturer,
    Vendor,
    ServiceType,
    WorkOrderStage,
    WorkOrderType,
    AssignmentType,
}

impl EntityKind {
    pub fn definition(self) -> &'static EntityDefinition {
        match self {
            Self::Company => &company::DEFINITION,
            Self::Partner => &partner::DEFINITION,
            Self::User => &user::DEFINITION,
            Self::Plan => &plan::DEFINITION,
            Self::AiAddon => &ai_addon::DEFINITION,
            Self::AssetCategory => &asset_category::DEFINITION,
            Self::AssetType => &asset_type::DEFINITION,
            Self::AssetPart => &asset_part::DEFINITION,
            Self::Manufacturer => &manufacturer::DEFINITION,
            Self::Vendor => &vendor::DEFINITION,
            Self::ServiceType => &service_type::DEFINITION,
            Self::WorkOrderStage => &work_order_stage::DEFINITION,
            Self::WorkOrderType => &work_order_type::DEFINITION,
            Self::AssignmentType => &assignment_type::DEFINITION,
        }
    }

    /// Master data is the reference catalog other records point at.
    pub fn is_master_data(self) -> bool {
        !matches!(
            self,
            Self::Company | Self::Partner | Self::User | Self::Plan | Self::AiAddon
        )
    }

    pub fn from_slug(slug: &str) -> Option<Self> {
        use strum::IntoEnumIterator;
        Self::iter().find(|kind| kind.definition().slug == slug)
    }
}
