//! Network view of staff and their functional relations
//!
//! A straight projection: one node per staff record, one link per relation.
//! Links may reference staff ids that do not exist; consumers skip them.

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::entity::{FunctionalRelation, RelationKind, Staff};

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct NetworkNode {
    pub id: i64,
    pub name: String,
    pub level: i32,
    pub division: String,
    pub position: String,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct NetworkLink {
    /// Manager staff id
    pub source: i64,
    /// Subordinate staff id
    pub target: i64,
    #[serde(rename = "type")]
    pub kind: RelationKind,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct NetworkView {
    pub nodes: Vec<NetworkNode>,
    pub links: Vec<NetworkLink>,
}

/// Relation-kind selection applied before drawing the network and the matrix
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum RelationFilter {
    #[default]
    All,
    Kind(RelationKind),
}

impl RelationFilter {
    pub fn matches(self, kind: RelationKind) -> bool {
        match self {
            RelationFilter::All => true,
            RelationFilter::Kind(wanted) => wanted == kind,
        }
    }

    /// Value used in forms and query strings
    pub fn as_str(self) -> &'static str {
        match self {
            RelationFilter::All => "all",
            RelationFilter::Kind(kind) => kind.as_str(),
        }
    }
}

impl fmt::Display for RelationFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RelationFilter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.trim().is_empty() || s.trim().eq_ignore_ascii_case("all") {
            return Ok(RelationFilter::All);
        }
        s.parse().map(RelationFilter::Kind)
    }
}

impl Serialize for RelationFilter {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for RelationFilter {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

impl NetworkView {
    pub fn build(staff: &[Staff], relations: &[FunctionalRelation]) -> Self {
        let nodes = staff
            .iter()
            .map(|person| NetworkNode {
                id: person.id,
                name: person.name.clone(),
                level: person.level,
                division: person.division.clone(),
                position: person.position.clone(),
            })
            .collect();

        let links = relations
            .iter()
            .map(|rel| NetworkLink {
                source: rel.manager_id,
                target: rel.subordinate_id,
                kind: rel.relation_type,
            })
            .collect();

        Self { nodes, links }
    }

    /// Copy of the view keeping every node and only the links passing `filter`
    pub fn filtered(&self, filter: RelationFilter) -> NetworkView {
        NetworkView {
            nodes: self.nodes.clone(),
            links: self
                .links
                .iter()
                .filter(|link| filter.matches(link.kind))
                .cloned()
                .collect(),
        }
    }

    /// Node index keyed by staff id
    pub fn index(&self) -> HashMap<i64, usize> {
        self.nodes.iter().enumerate().map(|(idx, node)| (node.id, idx)).collect()
    }
}

/// Dense n x n presence matrix over the network nodes
///
/// Cell (i, j) is set when at least one link goes from node i to node j.
/// Parallel links of any kind collapse into a single mark.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct AdjacencyMatrix {
    size: usize,
    cells: Vec<Vec<u8>>,
}

impl AdjacencyMatrix {
    pub fn build(view: &NetworkView) -> Self {
        let size = view.nodes.len();
        let index = view.index();
        let mut cells = vec![vec![0u8; size]; size];

        for link in &view.links {
            if let (Some(&row), Some(&col)) = (index.get(&link.source), index.get(&link.target)) {
                cells[row][col] = 1;
            }
        }

        Self { size, cells }
    }

    pub fn size(&self) -> usize {
        self.size
    }

    pub fn get(&self, row: usize, col: usize) -> bool {
        self.cells[row][col] != 0
    }

    pub fn rows(&self) -> &[Vec<u8>] {
        &self.cells
    }

    /// Number of set cells
    pub fn marked(&self) -> usize {
        self.cells.iter().flatten().filter(|&&cell| cell != 0).count()
    }
}
