//! Force-directed network chart
//!
//! Drawn at the positions of an already relaxed [`Simulation`]. Lines carry
//! their endpoint ids and node groups their staff id so the page script can
//! move them as live ticks arrive.

use super::select_href;
use super::svg::{num, SvgCanvas};
use crate::entity::RelationKind;
use crate::layout::Simulation;
use crate::network::NetworkView;

/// Node fill by staff level
pub fn level_color(level: i32) -> &'static str {
    match level {
        1 => "#f44336",
        2 => "#ff9800",
        _ => "#4caf50",
    }
}

pub fn render_network(view: &NetworkView, sim: &Simulation, canvas: &mut SvgCanvas, selected: Option<i64>) {
    canvas.clear();
    canvas.element("g").attr("class", "network").open();

    for link in &view.links {
        let (Some(source), Some(target)) = (sim.body(link.source), sim.body(link.target)) else {
            continue;
        };
        canvas
            .element("line")
            .attr("class", "link")
            .attr("data-source", link.source)
            .attr("data-target", link.target)
            .num("x1", source.x)
            .num("y1", source.y)
            .num("x2", target.x)
            .num("y2", target.y)
            .style("stroke", link.kind.color())
            .style("stroke-width", 1.5)
            .style(
                "stroke-dasharray",
                if link.kind == RelationKind::Functional { "5,5" } else { "none" },
            )
            .title(link.kind.label())
            .draw();
    }

    for node in &view.nodes {
        let Some(body) = sim.body(node.id) else {
            continue;
        };
        canvas.element("a").attr("href", select_href(node.id)).open();
        canvas
            .element("g")
            .attr("class", "node")
            .attr("data-id", node.id)
            .attr("transform", format!("translate({},{})", num(body.x), num(body.y)))
            .open();
        canvas
            .element("circle")
            .attr("r", 6)
            .style("fill", level_color(node.level))
            .style("stroke", if selected == Some(node.id) { "#333" } else { "#fff" })
            .style("stroke-width", 1)
            .title(&format!("{}\n{}", node.position, node.division))
            .draw();
        canvas
            .element("text")
            .attr("dx", 12)
            .attr("dy", ".35em")
            .style("font-size", "10px")
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
    use crate::layout::ForceParams;
    use crate::network::RelationFilter;

    fn draw(filter: RelationFilter) -> String {
        let view = OrgData::sample().functional_relations_network().filtered(filter);
        let mut sim = Simulation::new(&view, ForceParams::default());
        sim.run_until_settled(1_000);
        let mut canvas = SvgCanvas::new(900.0, 600.0);
        render_network(&view, &sim, &mut canvas, None);
        canvas.finish()
    }

    #[test]
    fn every_staff_member_is_drawn() {
        let svg = draw(RelationFilter::All);
        assert_eq!(svg.matches(r#"class="node""#).count(), 17);
        assert_eq!(svg.matches("<line").count(), 29);
    }

    #[test]
    fn filter_limits_drawn_links() {
        let svg = draw(RelationFilter::Kind(RelationKind::Mentoring));
        assert_eq!(svg.matches("<line").count(), 2);
        assert!(svg.contains("stroke:#e91e63"));
        assert_eq!(svg.matches(r#"class="node""#).count(), 17);
    }

    #[test]
    fn functional_links_are_dashed() {
        let svg = draw(RelationFilter::Kind(RelationKind::Functional));
        assert_eq!(svg.matches("stroke-dasharray:5,5").count(), 6);
    }

    #[test]
    fn level_colors() {
        assert_eq!(level_color(1), "#f44336");
        assert_eq!(level_color(2), "#ff9800");
        assert_eq!(level_color(4), "#4caf50");
    }
}
