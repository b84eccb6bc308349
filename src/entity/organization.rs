//! Organization entity - legal entities and physical locations
//!
//! Both kinds share one parent-pointer list, so a location may hang under a
//! legal entity and vice versa.

use serde::{Deserialize, Serialize};

/// Organization type tag
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrgType {
    LegalEntity,
    Location,
}

impl OrgType {
    /// Human label shown in the detail panel
    pub fn label(self) -> &'static str {
        match self {
            OrgType::LegalEntity => "Юридическое лицо",
            OrgType::Location => "Локация",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Organization {
    pub id: i64,

    pub name: String,

    pub description: String,

    /// Parent organization of any type (None for a top-level organization)
    pub parent_id: Option<i64>,

    pub org_type: OrgType,

    pub is_active: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub legal_address: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub physical_address: Option<String>,

    /// Taxpayer number (ИНН)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub inn: Option<String>,

    /// Registration reason code (КПП)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kpp: Option<String>,
}
