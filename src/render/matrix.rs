//! Adjacency matrix chart

use super::svg::{num, BandScale, SvgCanvas};
use super::Margin;
use crate::network::{AdjacencyMatrix, NetworkView};

const MARGIN: Margin = Margin {
    top: 100.0,
    right: 50.0,
    bottom: 10.0,
    left: 100.0,
};

pub const PRESENT_COLOR: &str = "#4caf50";
pub const ABSENT_COLOR: &str = "#f5f5f5";
pub const HOVER_COLOR: &str = "#ff9800";

/// Draw the presence matrix of `view`; rows are sources, columns targets
pub fn render_matrix(view: &NetworkView, canvas: &mut SvgCanvas) {
    canvas.clear();

    let matrix = AdjacencyMatrix::build(view);
    let n = matrix.size();
    let x_scale = BandScale::new(n, canvas.width() - MARGIN.left - MARGIN.right, 0.1);
    let y_scale = BandScale::new(n, canvas.height() - MARGIN.top - MARGIN.bottom, 0.1);

    canvas
        .element("g")
        .attr("class", "matrix")
        .attr("transform", MARGIN.translate())
        .open();

    for (i, row) in matrix.rows().iter().enumerate() {
        for (j, &value) in row.iter().enumerate() {
            let tooltip = format!("От: {}\nК: {}", view.nodes[i].name, view.nodes[j].name);
            canvas
                .element("rect")
                .attr("class", "cell")
                .num("x", x_scale.position(j))
                .num("y", y_scale.position(i))
                .num("width", x_scale.bandwidth())
                .num("height", y_scale.bandwidth())
                .attr("fill", if value != 0 { PRESENT_COLOR } else { ABSENT_COLOR })
                .attr("stroke", "#fff")
                .title(&tooltip)
                .draw();
        }
    }

    for (j, node) in view.nodes.iter().enumerate() {
        let x = x_scale.position(j) + x_scale.bandwidth() / 2.0;
        canvas
            .element("text")
            .attr("class", "x-label")
            .num("x", x)
            .attr("y", -10)
            .attr("transform", format!("rotate(-45, {}, -10)", num(x)))
            .style("text-anchor", "end")
            .style("font-size", "8px")
            .text(&node.name)
            .draw();
    }

    for (i, node) in view.nodes.iter().enumerate() {
        canvas
            .element("text")
            .attr("class", "y-label")
            .attr("x", -10)
            .num("y", y_scale.position(i) + y_scale.bandwidth() / 2.0)
            .style("text-anchor", "end")
            .style("alignment-baseline", "middle")
            .style("font-size", "8px")
            .text(&node.name)
            .draw();
    }

    canvas.close();
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::RelationKind;
    use crate::fixture::OrgData;
    use crate::network::RelationFilter;

    fn draw(filter: RelationFilter) -> String {
        let view = OrgData::sample().functional_relations_network().filtered(filter);
        let mut canvas = SvgCanvas::new(900.0, 600.0);
        render_matrix(&view, &mut canvas);
        canvas.finish()
    }

    #[test]
    fn grid_has_a_cell_per_pair() {
        let svg = draw(RelationFilter::All);
        assert_eq!(svg.matches(r#"class="cell""#).count(), 17 * 17);
        assert_eq!(svg.matches(PRESENT_COLOR).count(), 28);
        assert_eq!(svg.matches(r#"class="x-label""#).count(), 17);
        assert_eq!(svg.matches(r#"class="y-label""#).count(), 17);
    }

    #[test]
    fn filtered_matrix_marks_only_matching_pairs() {
        let svg = draw(RelationFilter::Kind(RelationKind::Mentoring));
        assert_eq!(svg.matches(PRESENT_COLOR).count(), 2);
    }

    #[test]
    fn cells_carry_endpoint_tooltips() {
        let svg = draw(RelationFilter::All);
        assert!(svg.contains("<title>От: Иванов Иван Иванович\nК: Петров Петр Петрович</title>"));
    }
}
