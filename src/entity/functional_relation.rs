//! Functional relation entity - directed, typed edge between two staff members

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RelationKind {
    Administrative,
    Functional,
    Project,
    Territorial,
    Mentoring,
}

impl RelationKind {
    pub const ALL: [RelationKind; 5] = [
        RelationKind::Administrative,
        RelationKind::Functional,
        RelationKind::Project,
        RelationKind::Territorial,
        RelationKind::Mentoring,
    ];

    /// Wire tag, e.g. `MENTORING`
    pub fn as_str(self) -> &'static str {
        match self {
            RelationKind::Administrative => "ADMINISTRATIVE",
            RelationKind::Functional => "FUNCTIONAL",
            RelationKind::Project => "PROJECT",
            RelationKind::Territorial => "TERRITORIAL",
            RelationKind::Mentoring => "MENTORING",
        }
    }

    /// Chip label used by the detail panel and the legend
    pub fn label(self) -> &'static str {
        match self {
            RelationKind::Administrative => "Административная",
            RelationKind::Functional => "Функциональная",
            RelationKind::Project => "Проектная",
            RelationKind::Territorial => "Территориальная",
            RelationKind::Mentoring => "Менторство",
        }
    }

    /// Plural option label used by the relation filter select
    pub fn filter_label(self) -> &'static str {
        match self {
            RelationKind::Administrative => "Административные",
            RelationKind::Functional => "Функциональные",
            RelationKind::Project => "Проектные",
            RelationKind::Territorial => "Территориальные",
            RelationKind::Mentoring => "Менторство",
        }
    }

    /// Edge colour in the network chart
    pub fn color(self) -> &'static str {
        match self {
            RelationKind::Administrative => "#4caf50",
            RelationKind::Functional => "#2196f3",
            RelationKind::Project => "#ff9800",
            RelationKind::Territorial => "#9c27b0",
            RelationKind::Mentoring => "#e91e63",
        }
    }
}

impl fmt::Display for RelationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RelationKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        RelationKind::ALL
            .into_iter()
            .find(|kind| kind.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("unknown relation kind `{}`", s))
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FunctionalRelation {
    pub id: i64,

    pub manager_id: i64,

    pub subordinate_id: i64,

    pub relation_type: RelationKind,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}
