//! Staff entity

use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Staff {
    pub id: i64,

    pub name: String,

    pub position: String,

    /// Division name (denormalized copy of the division record)
    pub division: String,

    pub division_id: i64,

    pub organization_id: i64,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub legal_entity_id: Option<i64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location_id: Option<i64>,

    pub level: i32,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
}
