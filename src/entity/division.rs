//! Division entity - departments, sections and teams

use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Division {
    pub id: i64,

    pub name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,

    pub description: String,

    /// Parent division (None for a top-level division)
    pub parent_id: Option<i64>,

    /// Nesting level, 1 for the board
    pub level: i32,

    pub is_active: bool,
}
