//! Hierarchy builders
//!
//! Organizations and divisions are stored as flat parent-pointer lists. The
//! charts need forests, so the builders index the records and attach every
//! node to its parent inside an arena: nodes live in one `Vec` and refer to
//! their children by index.
//!
//! Organizations of both types share one parent list. A location can hang
//! under a legal entity and the other way round, so the organization builder
//! skips ancestors of the other type until it reaches the nearest one of the
//! requested type.

use std::collections::{HashMap, HashSet};

use serde::Serialize;
use thiserror::Error;

use crate::entity::{Division, OrgType, Organization};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HierarchyError {
    /// Following parent links from record `id` leads back to a record already seen
    #[error("parent chain of record {id} contains a cycle")]
    Cycle { id: i64 },
}

/// Normalized tree node shared by organization and division forests
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct HierarchyNode {
    pub id: i64,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub is_active: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub level: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    /// Arena indices of the children, in input order
    #[serde(skip)]
    pub children: Vec<usize>,
}

impl From<&Organization> for HierarchyNode {
    fn from(org: &Organization) -> Self {
        Self {
            id: org.id,
            name: org.name.clone(),
            description: Some(org.description.clone()),
            is_active: org.is_active,
            level: None,
            code: None,
            children: Vec::new(),
        }
    }
}

impl From<&Division> for HierarchyNode {
    fn from(div: &Division) -> Self {
        Self {
            id: div.id,
            name: div.name.clone(),
            description: Some(div.description.clone()),
            is_active: div.is_active,
            level: Some(div.level),
            code: div.code.clone(),
            children: Vec::new(),
        }
    }
}

/// Arena-backed forest
#[derive(Clone, Debug, Default)]
pub struct Hierarchy {
    nodes: Vec<HierarchyNode>,
    roots: Vec<usize>,
}

impl Hierarchy {
    pub fn nodes(&self) -> &[HierarchyNode] {
        &self.nodes
    }

    pub fn node(&self, idx: usize) -> &HierarchyNode {
        &self.nodes[idx]
    }

    /// Arena indices of the top-level nodes
    pub fn roots(&self) -> &[usize] {
        &self.roots
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn root_nodes(&self) -> impl Iterator<Item = &HierarchyNode> {
        self.roots.iter().map(|&idx| &self.nodes[idx])
    }

    pub fn children_of(&self, idx: usize) -> impl Iterator<Item = &HierarchyNode> {
        self.nodes[idx].children.iter().map(|&child| &self.nodes[child])
    }

    /// Pre-order walk of the forest as `(arena index, depth)` pairs
    pub fn walk(&self) -> Vec<(usize, usize)> {
        let mut out = Vec::with_capacity(self.nodes.len());
        let mut stack: Vec<(usize, usize)> = self.roots.iter().rev().map(|&idx| (idx, 0)).collect();
        while let Some((idx, depth)) = stack.pop() {
            out.push((idx, depth));
            for &child in self.nodes[idx].children.iter().rev() {
                stack.push((child, depth + 1));
            }
        }
        out
    }

    /// Search the forest for the node carrying record `id`
    pub fn find(&self, id: i64) -> Option<&HierarchyNode> {
        self.walk()
            .into_iter()
            .map(|(idx, _)| &self.nodes[idx])
            .find(|node| node.id == id)
    }

    /// Nested view for JSON output
    pub fn nested(&self) -> Vec<NestedNode<'_>> {
        self.roots.iter().map(|&idx| self.nest(idx)).collect()
    }

    fn nest(&self, idx: usize) -> NestedNode<'_> {
        let node = &self.nodes[idx];
        NestedNode {
            node,
            children: node.children.iter().map(|&child| self.nest(child)).collect(),
        }
    }

    fn push(&mut self, node: HierarchyNode) -> usize {
        self.nodes.push(node);
        self.nodes.len() - 1
    }

    /// Fails when the parent links recorded while attaching form a loop
    fn check_acyclic(&self, parents: &[Option<usize>]) -> Result<(), HierarchyError> {
        for start in 0..parents.len() {
            let mut visited = HashSet::new();
            let mut current = Some(start);
            while let Some(idx) = current {
                if !visited.insert(idx) {
                    return Err(HierarchyError::Cycle { id: self.nodes[start].id });
                }
                current = parents[idx];
            }
        }
        Ok(())
    }
}

/// Node with its subtree, borrowed from a [`Hierarchy`]
#[derive(Debug, Serialize)]
pub struct NestedNode<'a> {
    #[serde(flatten)]
    pub node: &'a HierarchyNode,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<NestedNode<'a>>,
}

/// Build the forest of organizations of type `target`
///
/// A node whose raw parent does not resolve, or whose ancestor chain holds no
/// organization of type `target`, becomes a root.
pub fn build_org_hierarchy(
    organizations: &[Organization],
    target: OrgType,
) -> Result<Hierarchy, HierarchyError> {
    let by_id: HashMap<i64, &Organization> = organizations.iter().map(|org| (org.id, org)).collect();
    let items: Vec<&Organization> = organizations.iter().filter(|org| org.org_type == target).collect();

    let mut tree = Hierarchy::default();
    let mut index: HashMap<i64, usize> = HashMap::with_capacity(items.len());
    for org in &items {
        let idx = tree.push(HierarchyNode::from(*org));
        index.insert(org.id, idx);
    }

    let mut parents: Vec<Option<usize>> = vec![None; items.len()];
    for (idx, org) in items.iter().enumerate() {
        let parent = nearest_ancestor(org, target, &by_id)?.and_then(|id| index.get(&id).copied());
        match parent {
            Some(parent) => {
                tree.nodes[parent].children.push(idx);
                parents[idx] = Some(parent);
            }
            None => tree.roots.push(idx),
        }
    }
    tree.check_acyclic(&parents)?;

    // Unreachable for acyclic input, kept for disconnected snapshots
    if tree.roots.is_empty() && !items.is_empty() {
        tree.roots = items
            .iter()
            .enumerate()
            .filter(|(_, org)| org.parent_id.map_or(true, |id| !index.contains_key(&id)))
            .map(|(idx, _)| idx)
            .collect();
    }

    tracing::debug!(
        ?target,
        nodes = tree.len(),
        roots = tree.roots.len(),
        "Built organization hierarchy"
    );
    Ok(tree)
}

/// Id of the nearest ancestor of type `target`, walking the raw parent chain
fn nearest_ancestor(
    org: &Organization,
    target: OrgType,
    by_id: &HashMap<i64, &Organization>,
) -> Result<Option<i64>, HierarchyError> {
    let mut visited = HashSet::from([org.id]);
    let mut current = org.parent_id;
    while let Some(id) = current {
        if !visited.insert(id) {
            return Err(HierarchyError::Cycle { id: org.id });
        }
        let Some(ancestor) = by_id.get(&id) else {
            return Ok(None);
        };
        if ancestor.org_type == target {
            return Ok(Some(ancestor.id));
        }
        current = ancestor.parent_id;
    }
    Ok(None)
}

/// Build the division forest; null or unresolvable parents become roots
pub fn build_division_hierarchy(divisions: &[Division]) -> Result<Hierarchy, HierarchyError> {
    let mut tree = Hierarchy::default();
    let mut index: HashMap<i64, usize> = HashMap::with_capacity(divisions.len());
    for div in divisions {
        let idx = tree.push(HierarchyNode::from(div));
        index.insert(div.id, idx);
    }

    let mut parents: Vec<Option<usize>> = vec![None; divisions.len()];
    for (idx, div) in divisions.iter().enumerate() {
        match div.parent_id.and_then(|id| index.get(&id).copied()) {
            Some(parent) => {
                tree.nodes[parent].children.push(idx);
                parents[idx] = Some(parent);
            }
            None => tree.roots.push(idx),
        }
    }
    tree.check_acyclic(&parents)?;

    tracing::debug!(nodes = tree.len(), roots = tree.roots.len(), "Built division hierarchy");
    Ok(tree)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixture::OrgData;

    fn org(id: i64, parent_id: Option<i64>, org_type: OrgType) -> Organization {
        Organization {
            id,
            name: format!("org-{}", id),
            description: String::new(),
            parent_id,
            org_type,
            is_active: true,
            legal_address: None,
            physical_address: None,
            inn: None,
            kpp: None,
        }
    }

    fn div(id: i64, parent_id: Option<i64>) -> Division {
        Division {
            id,
            name: format!("div-{}", id),
            code: None,
            description: String::new(),
            parent_id,
            level: 1,
            is_active: true,
        }
    }

    fn child_ids(tree: &Hierarchy, idx: usize) -> Vec<i64> {
        tree.children_of(idx).map(|node| node.id).collect()
    }

    fn root_ids(tree: &Hierarchy) -> Vec<i64> {
        tree.root_nodes().map(|node| node.id).collect()
    }

    #[test]
    fn legal_entities_hang_under_head_organization() {
        let tree = OrgData::sample().legal_entity_hierarchy().unwrap();
        assert_eq!(root_ids(&tree), vec![1]);

        let root = tree.roots()[0];
        assert_eq!(child_ids(&tree, root), vec![2, 3, 4]);
        for &child in &tree.node(root).children {
            assert!(tree.node(child).children.is_empty());
        }
    }

    #[test]
    fn sample_locations_have_no_location_ancestor() {
        let tree = OrgData::sample().location_hierarchy().unwrap();
        assert_eq!(root_ids(&tree), vec![5, 6, 7]);
        assert!(tree.nodes().iter().all(|node| node.children.is_empty()));
    }

    #[test]
    fn single_type_tree_follows_parent_ids() {
        let orgs = vec![
            org(1, None, OrgType::LegalEntity),
            org(2, Some(1), OrgType::LegalEntity),
            org(3, Some(2), OrgType::LegalEntity),
            org(4, Some(1), OrgType::LegalEntity),
        ];
        let tree = build_org_hierarchy(&orgs, OrgType::LegalEntity).unwrap();
        assert_eq!(root_ids(&tree), vec![1]);
        assert_eq!(child_ids(&tree, 0), vec![2, 4]);
        assert_eq!(child_ids(&tree, 1), vec![3]);
    }

    #[test]
    fn skips_ancestors_of_other_type() {
        // location 10 -> legal 2 -> legal 1 -> location 20 (root)
        let orgs = vec![
            org(20, None, OrgType::Location),
            org(1, Some(20), OrgType::LegalEntity),
            org(2, Some(1), OrgType::LegalEntity),
            org(10, Some(2), OrgType::Location),
        ];
        let locations = build_org_hierarchy(&orgs, OrgType::Location).unwrap();
        assert_eq!(root_ids(&locations), vec![20]);
        assert_eq!(child_ids(&locations, 0), vec![10]);

        let legal = build_org_hierarchy(&orgs, OrgType::LegalEntity).unwrap();
        assert_eq!(root_ids(&legal), vec![1]);
        assert_eq!(child_ids(&legal, 0), vec![2]);
    }

    #[test]
    fn unresolvable_parent_makes_a_root() {
        let orgs = vec![
            org(1, None, OrgType::LegalEntity),
            org(2, Some(99), OrgType::LegalEntity),
            org(3, Some(98), OrgType::Location),
            org(4, Some(3), OrgType::LegalEntity),
        ];
        let tree = build_org_hierarchy(&orgs, OrgType::LegalEntity).unwrap();
        assert_eq!(root_ids(&tree), vec![1, 2, 4]);
    }

    #[test]
    fn cycle_through_other_type_is_reported() {
        let orgs = vec![
            org(1, Some(2), OrgType::Location),
            org(2, Some(1), OrgType::Location),
            org(3, Some(1), OrgType::LegalEntity),
        ];
        let err = build_org_hierarchy(&orgs, OrgType::LegalEntity).unwrap_err();
        assert_eq!(err, HierarchyError::Cycle { id: 3 });
    }

    #[test]
    fn same_type_cycle_is_reported() {
        let orgs = vec![
            org(1, Some(2), OrgType::LegalEntity),
            org(2, Some(1), OrgType::LegalEntity),
            org(3, None, OrgType::LegalEntity),
        ];
        assert!(matches!(
            build_org_hierarchy(&orgs, OrgType::LegalEntity),
            Err(HierarchyError::Cycle { .. })
        ));
    }

    #[test]
    fn self_parent_is_reported() {
        let orgs = vec![org(7, Some(7), OrgType::Location)];
        assert_eq!(
            build_org_hierarchy(&orgs, OrgType::Location).unwrap_err(),
            HierarchyError::Cycle { id: 7 }
        );
    }

    #[test]
    fn empty_input_builds_empty_forest() {
        let tree = build_org_hierarchy(&[], OrgType::Location).unwrap();
        assert!(tree.is_empty());
        assert!(tree.roots().is_empty());
    }

    #[test]
    fn division_tree_matches_sample() {
        let tree = OrgData::sample().division_hierarchy().unwrap();
        assert_eq!(root_ids(&tree), vec![1]);
        assert_eq!(child_ids(&tree, 0), vec![2, 3, 4]);
        assert_eq!(child_ids(&tree, 1), vec![5, 6, 7]);
        assert_eq!(child_ids(&tree, 4), vec![12, 13]);

        // every division appears exactly once in the forest
        let mut seen: Vec<i64> = tree.walk().into_iter().map(|(idx, _)| tree.node(idx).id).collect();
        seen.sort_unstable();
        assert_eq!(seen, (1..=13).collect::<Vec<_>>());
    }

    #[test]
    fn division_with_missing_parent_is_root() {
        let divs = vec![div(1, None), div(2, Some(42)), div(3, Some(1))];
        let tree = build_division_hierarchy(&divs).unwrap();
        assert_eq!(root_ids(&tree), vec![1, 2]);
        assert_eq!(child_ids(&tree, 0), vec![3]);
    }

    #[test]
    fn division_cycle_is_reported() {
        let divs = vec![div(1, None), div(2, Some(3)), div(3, Some(2))];
        assert!(matches!(
            build_division_hierarchy(&divs),
            Err(HierarchyError::Cycle { .. })
        ));
    }

    #[test]
    fn find_searches_nested_levels() {
        let tree = OrgData::sample().division_hierarchy().unwrap();
        assert_eq!(tree.find(13).map(|node| node.code.as_deref()), Some(Some("BE")));
        assert!(tree.find(100).is_none());
    }

    #[test]
    fn walk_reports_depth() {
        let tree = OrgData::sample().division_hierarchy().unwrap();
        let depth_of = |id: i64| {
            tree.walk()
                .into_iter()
                .find(|&(idx, _)| tree.node(idx).id == id)
                .map(|(_, depth)| depth)
        };
        assert_eq!(depth_of(1), Some(0));
        assert_eq!(depth_of(5), Some(2));
        assert_eq!(depth_of(12), Some(3));
    }

    #[test]
    fn nested_json_omits_empty_children() {
        let tree = OrgData::sample().legal_entity_hierarchy().unwrap();
        let json = serde_json::to_value(tree.nested()).unwrap();
        assert_eq!(json[0]["id"], 1);
        assert_eq!(json[0]["children"].as_array().unwrap().len(), 3);
        assert!(json[0]["children"][0].get("children").is_none());
    }
}
