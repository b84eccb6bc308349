//! Tree chart

use super::svg::{num, SvgCanvas};
use super::{select_href, Margin};
use crate::hierarchy::Hierarchy;
use crate::layout::layout_tree;

const MARGIN: Margin = Margin {
    top: 20.0,
    right: 120.0,
    bottom: 20.0,
    left: 120.0,
};

pub const ACTIVE_COLOR: &str = "#4caf50";
pub const INACTIVE_COLOR: &str = "#f44336";

/// Draw `tree` with depth running left to right
pub fn render_tree(tree: &Hierarchy, canvas: &mut SvgCanvas, selected: Option<i64>) {
    canvas.clear();

    let inner_width = canvas.width() - MARGIN.left - MARGIN.right;
    let inner_height = canvas.height() - MARGIN.top - MARGIN.bottom;
    let layout = layout_tree(tree, inner_width, inner_height);

    canvas
        .element("g")
        .attr("transform", MARGIN.translate())
        .open();

    for (parent, node) in tree.nodes().iter().enumerate() {
        let (x0, y0) = layout.position(parent);
        for &child in &node.children {
            let (x1, y1) = layout.position(child);
            let mid = (x0 + x1) / 2.0;
            let path = format!(
                "M{},{}C{},{},{},{},{},{}",
                num(x0),
                num(y0),
                num(mid),
                num(y0),
                num(mid),
                num(y1),
                num(x1),
                num(y1)
            );
            canvas
                .element("path")
                .attr("class", "link")
                .attr("d", path)
                .style("fill", "none")
                .style("stroke", "#ccc")
                .style("stroke-width", 1.5)
                .draw();
        }
    }

    for (idx, node) in tree.nodes().iter().enumerate() {
        let (x, y) = layout.position(idx);
        let internal = !node.children.is_empty();
        let class = if internal { "node node--internal" } else { "node node--leaf" };

        canvas.element("a").attr("href", select_href(node.id)).open();
        canvas
            .element("g")
            .attr("class", class)
            .attr("data-id", node.id)
            .attr("transform", format!("translate({},{})", num(x), num(y)))
            .open();
        canvas
            .element("circle")
            .attr("r", 5)
            .style("fill", if node.is_active { ACTIVE_COLOR } else { INACTIVE_COLOR })
            .style("stroke", if selected == Some(node.id) { "#333" } else { "#fff" })
            .style("stroke-width", 2)
            .draw();
        canvas
            .element("text")
            .attr("dy", ".31em")
            .attr("x", if internal { -8 } else { 8 })
            .style("text-anchor", if internal { "end" } else { "start" })
            .style("font-size", "12px")
            .text(&node.name)
            .draw();
        canvas.close();
        canvas.close();
    }

    canvas.close();
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixture::OrgData;

    fn draw(tree: &Hierarchy, selected: Option<i64>) -> String {
        let mut canvas = SvgCanvas::new(900.0, 600.0);
        render_tree(tree, &mut canvas, selected);
        canvas.finish()
    }

    #[test]
    fn draws_a_node_per_record_and_a_link_per_edge() {
        let tree = OrgData::sample().division_hierarchy().unwrap();
        let svg = draw(&tree, None);
        assert_eq!(svg.matches("<circle").count(), 13);
        assert_eq!(svg.matches(r#"class="link""#).count(), 12);
        assert!(svg.contains("Команда Backend"));
    }

    #[test]
    fn inactive_nodes_are_red() {
        let tree = OrgData::sample().legal_entity_hierarchy().unwrap();
        let svg = draw(&tree, None);
        assert_eq!(svg.matches(INACTIVE_COLOR).count(), 1);
        assert_eq!(svg.matches(ACTIVE_COLOR).count(), 3);
    }

    #[test]
    fn nodes_link_to_selection() {
        let tree = OrgData::sample().legal_entity_hierarchy().unwrap();
        let svg = draw(&tree, Some(3));
        assert!(svg.contains(r#"href="/view/select?id=3""#));
        assert_eq!(svg.matches("stroke:#333").count(), 1);
    }

    #[test]
    fn labels_sit_left_of_internal_nodes() {
        let tree = OrgData::sample().legal_entity_hierarchy().unwrap();
        let svg = draw(&tree, None);
        assert_eq!(svg.matches("node--internal").count(), 1);
        assert_eq!(svg.matches(r#"x="-8""#).count(), 1);
        assert_eq!(svg.matches(r#"x="8""#).count(), 3);
    }
}
