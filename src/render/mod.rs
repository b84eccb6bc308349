//! Chart rendering
//!
//! Every chart is a pure function of the data snapshot, the view state and
//! the drawing surface. Each call clears the surface and redraws from scratch.

pub mod matrix;
pub mod network;
pub mod page;
pub mod svg;
pub mod tree;

use std::sync::Arc;

use tokio::task::JoinError;

use crate::config::{ChartConfig, Config, SimulationConfig};
use crate::fixture::OrgData;
use crate::hierarchy::HierarchyError;
use crate::layout::{ForceParams, Simulation};
use crate::network::NetworkView;
use crate::view::{ViewState, VisualizationMode};

pub use svg::SvgCanvas;

/// Space kept free around the plotted area
#[derive(Debug, Clone, Copy)]
pub struct Margin {
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
    pub left: f64,
}

impl Margin {
    pub fn translate(&self) -> String {
        format!("translate({},{})", svg::num(self.left), svg::num(self.top))
    }
}

/// Link target that selects node `id`
pub fn select_href(id: i64) -> String {
    format!("/view/select?id={}", id)
}

/// Relaxed simulation of `network` on the configured surface
pub fn settled_simulation(network: &NetworkView, chart: &ChartConfig, simulation: &SimulationConfig) -> Simulation {
    let mut sim = Simulation::new(network, ForceParams::new(simulation, chart.width, chart.height));
    let ticks = sim.run_until_settled(simulation.max_ticks);
    tracing::debug!(ticks, alpha = sim.alpha(), "Network layout settled");
    sim
}

/// Render the chart for `view.mode` as a standalone SVG document
pub fn render_chart(
    data: &OrgData,
    view: &ViewState,
    chart: &ChartConfig,
    simulation: &SimulationConfig,
) -> Result<String, HierarchyError> {
    let mut canvas = SvgCanvas::new(chart.width, chart.height);
    match view.mode {
        VisualizationMode::Hierarchical => {
            let tree = view.entity.hierarchy(data)?;
            tree::render_tree(&tree, &mut canvas, view.selected);
        }
        VisualizationMode::Network => {
            let network = data.functional_relations_network().filtered(view.relation);
            let sim = settled_simulation(&network, chart, simulation);
            network::render_network(&network, &sim, &mut canvas, view.selected);
        }
        VisualizationMode::Matrix => {
            let network = data.functional_relations_network().filtered(view.relation);
            matrix::render_matrix(&network, &mut canvas);
        }
    }
    Ok(canvas.finish())
}

/// [`render_chart`] on the blocking pool, keeping async workers free
pub async fn render_chart_blocking(
    data: Arc<OrgData>,
    view: ViewState,
    config: Arc<Config>,
) -> Result<Result<String, HierarchyError>, JoinError> {
    tokio::task::spawn_blocking(move || render_chart(&data, &view, &config.chart, &config.simulation)).await
}

/// [`settled_simulation`] on the blocking pool
pub async fn settled_simulation_blocking(network: NetworkView, config: Arc<Config>) -> Result<Simulation, JoinError> {
    tokio::task::spawn_blocking(move || settled_simulation(&network, &config.chart, &config.simulation)).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::{OrgType, RelationKind};
    use crate::network::RelationFilter;
    use crate::view::EntityKind;

    fn render(view: ViewState) -> Result<String, HierarchyError> {
        render_chart(
            &OrgData::sample(),
            &view,
            &ChartConfig::default(),
            &SimulationConfig::default(),
        )
    }

    #[test]
    fn dispatch_follows_mode() {
        let tree = render(ViewState::default()).unwrap();
        assert!(tree.contains("node--internal"));

        let network = render(ViewState {
            mode: VisualizationMode::Network,
            ..Default::default()
        })
        .unwrap();
        assert!(network.contains(r#"class="network""#));

        let matrix = render(ViewState {
            mode: VisualizationMode::Matrix,
            relation: RelationFilter::Kind(RelationKind::Territorial),
            ..Default::default()
        })
        .unwrap();
        assert!(matrix.contains(r#"class="matrix""#));
        assert_eq!(matrix.matches(matrix::PRESENT_COLOR).count(), 1);
    }

    #[test]
    fn surface_uses_configured_size() {
        let svg = render(ViewState::default()).unwrap();
        assert!(svg.contains(r#"width="900" height="600""#));
    }

    #[test]
    fn hierarchy_errors_propagate() {
        let mut data = OrgData::sample();
        data.organizations.iter_mut().for_each(|org| {
            if org.org_type == OrgType::LegalEntity && org.id == 1 {
                org.parent_id = Some(2);
            }
        });
        let result = render_chart(
            &data,
            &ViewState {
                entity: EntityKind::Legal,
                ..Default::default()
            },
            &ChartConfig::default(),
            &SimulationConfig::default(),
        );
        assert!(matches!(result, Err(HierarchyError::Cycle { .. })));
    }

    fn large_network(size: i64) -> OrgData {
        use crate::entity::{FunctionalRelation, Staff};

        let staff = (1..=size)
            .map(|id| Staff {
                id,
                name: format!("Сотрудник {}", id),
                position: "Инженер".to_string(),
                division: "Отдел".to_string(),
                division_id: 1,
                organization_id: 1,
                legal_entity_id: None,
                location_id: None,
                level: 3,
                email: None,
                phone: None,
            })
            .collect();
        let relations = (2..=size)
            .map(|id| FunctionalRelation {
                id,
                manager_id: id / 2,
                subordinate_id: id,
                relation_type: RelationKind::Administrative,
                description: None,
            })
            .collect();
        OrgData {
            staff,
            relations,
            ..OrgData::sample()
        }
    }

    #[tokio::test(flavor = "current_thread")]
    async fn network_rendering_leaves_the_runtime_free() {
        let data = Arc::new(large_network(400));
        let view = ViewState {
            mode: VisualizationMode::Network,
            ..Default::default()
        };
        let render = tokio::spawn(render_chart_blocking(data, view, Arc::new(Config::default())));

        // with a single worker this only wakes up in time if the layout runs elsewhere
        tokio::time::sleep(std::time::Duration::from_millis(1)).await;
        assert!(!render.is_finished());

        let svg = render.await.unwrap().unwrap().unwrap();
        assert_eq!(svg.matches(r#"class="node""#).count(), 400);
    }

    #[tokio::test]
    async fn blocking_settle_matches_inline_settle() {
        let config = Arc::new(Config::default());
        let network = OrgData::sample().functional_relations_network();
        let inline = settled_simulation(&network, &config.chart, &config.simulation);
        let pooled = settled_simulation_blocking(network, config).await.unwrap();
        assert_eq!(inline.bodies(), pooled.bodies());
        assert!(pooled.is_settled());
    }
}
