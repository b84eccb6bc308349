//! Tree layout
//!
//! Leaves are spread along the vertical axis in pre-order, one unit apart when
//! they share a parent and two units apart otherwise. Every internal node sits
//! midway between its first and last child. Depth maps to the horizontal axis.

use crate::hierarchy::Hierarchy;

/// Position of every arena node; `x` is horizontal (depth), `y` vertical
#[derive(Clone, Debug, Default, PartialEq)]
pub struct TreeLayout {
    pub positions: Vec<(f64, f64)>,
}

impl TreeLayout {
    pub fn position(&self, idx: usize) -> (f64, f64) {
        self.positions[idx]
    }
}

/// Lay `tree` out inside a `width` x `height` rectangle anchored at the origin
pub fn layout_tree(tree: &Hierarchy, width: f64, height: f64) -> TreeLayout {
    let len = tree.len();
    if len == 0 {
        return TreeLayout::default();
    }

    let order = tree.walk();
    let mut parent: Vec<Option<usize>> = vec![None; len];
    let mut depths = vec![0usize; len];
    for &(idx, depth) in &order {
        depths[idx] = depth;
        for &child in &tree.node(idx).children {
            parent[child] = Some(idx);
        }
    }

    let mut breadth = vec![0.0f64; len];
    let mut previous_leaf: Option<usize> = None;
    let mut cursor = 0.0;
    for &(idx, _) in &order {
        if !tree.node(idx).children.is_empty() {
            continue;
        }
        if let Some(prev) = previous_leaf {
            cursor += if parent[prev] == parent[idx] { 1.0 } else { 2.0 };
        }
        breadth[idx] = cursor;
        previous_leaf = Some(idx);
    }

    // children follow their parent in pre-order, so the reverse visits them first
    for &(idx, _) in order.iter().rev() {
        let children = &tree.node(idx).children;
        if let (Some(&first), Some(&last)) = (children.first(), children.last()) {
            breadth[idx] = (breadth[first] + breadth[last]) / 2.0;
        }
    }

    let min = breadth.iter().copied().fold(f64::INFINITY, f64::min);
    let max = breadth.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let span = max - min;
    let max_depth = depths.iter().copied().max().unwrap_or(0);

    let positions = (0..len)
        .map(|idx| {
            let y = if span > 0.0 {
                (breadth[idx] - min) / span * height
            } else {
                height / 2.0
            };
            let x = if max_depth > 0 {
                depths[idx] as f64 / max_depth as f64 * width
            } else {
                0.0
            };
            (x, y)
        })
        .collect();

    TreeLayout { positions }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixture::OrgData;

    #[test]
    fn nodes_stay_inside_the_rectangle() {
        let tree = OrgData::sample().division_hierarchy().unwrap();
        let layout = layout_tree(&tree, 660.0, 560.0);
        assert_eq!(layout.positions.len(), tree.len());
        for &(x, y) in &layout.positions {
            assert!((0.0..=660.0).contains(&x));
            assert!((0.0..=560.0).contains(&y));
        }
    }

    #[test]
    fn children_are_right_of_parents() {
        let tree = OrgData::sample().division_hierarchy().unwrap();
        let layout = layout_tree(&tree, 600.0, 400.0);
        for (idx, node) in tree.nodes().iter().enumerate() {
            for &child in &node.children {
                assert!(layout.position(child).0 > layout.position(idx).0);
            }
        }
        // deepest level touches the right edge
        assert!(layout.positions.iter().any(|&(x, _)| (x - 600.0).abs() < 1e-9));
    }

    #[test]
    fn parent_is_centered_over_children() {
        let tree = OrgData::sample().legal_entity_hierarchy().unwrap();
        let layout = layout_tree(&tree, 600.0, 400.0);
        // root 1 with three leaves 2, 3, 4 spread over the full height
        assert_eq!(layout.position(1).1, 0.0);
        assert_eq!(layout.position(3).1, 400.0);
        assert_eq!(layout.position(0).1, 200.0);
    }

    #[test]
    fn forest_roots_are_stacked_vertically() {
        let tree = OrgData::sample().location_hierarchy().unwrap();
        let layout = layout_tree(&tree, 600.0, 400.0);
        let ys: Vec<f64> = layout.positions.iter().map(|&(_, y)| y).collect();
        assert_eq!(ys, vec![0.0, 200.0, 400.0]);
        assert!(layout.positions.iter().all(|&(x, _)| x == 0.0));
    }

    #[test]
    fn empty_tree_has_no_positions() {
        let layout = layout_tree(&Hierarchy::default(), 100.0, 100.0);
        assert!(layout.positions.is_empty());
    }
}
