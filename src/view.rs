//! Page view state
//!
//! The controls of the visualization page: chart mode, structure type shown by
//! the tree, relation filter of the network and matrix, and the selected node.
//! Every combination is valid; the selection survives mode changes and is only
//! cleared by its own control.

use serde::{Deserialize, Serialize};

use crate::fixture::OrgData;
use crate::hierarchy::{Hierarchy, HierarchyError};
use crate::network::RelationFilter;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VisualizationMode {
    #[default]
    Hierarchical,
    Network,
    Matrix,
}

impl VisualizationMode {
    pub const ALL: [VisualizationMode; 3] = [
        VisualizationMode::Hierarchical,
        VisualizationMode::Network,
        VisualizationMode::Matrix,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            VisualizationMode::Hierarchical => "hierarchical",
            VisualizationMode::Network => "network",
            VisualizationMode::Matrix => "matrix",
        }
    }

    /// Tab label
    pub fn label(self) -> &'static str {
        match self {
            VisualizationMode::Hierarchical => "Иерархическая",
            VisualizationMode::Network => "Сетевая",
            VisualizationMode::Matrix => "Матричная",
        }
    }

    /// Whether the relation filter applies to this mode
    pub fn uses_relations(self) -> bool {
        !matches!(self, VisualizationMode::Hierarchical)
    }
}

/// Structure drawn by the tree chart
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntityKind {
    #[default]
    Legal,
    Location,
    Division,
}

impl EntityKind {
    pub const ALL: [EntityKind; 3] = [EntityKind::Legal, EntityKind::Location, EntityKind::Division];

    pub fn as_str(self) -> &'static str {
        match self {
            EntityKind::Legal => "legal",
            EntityKind::Location => "location",
            EntityKind::Division => "division",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            EntityKind::Legal => "Юридические лица",
            EntityKind::Location => "Физические локации",
            EntityKind::Division => "Структура подразделений",
        }
    }

    pub fn hierarchy(self, data: &OrgData) -> Result<Hierarchy, HierarchyError> {
        match self {
            EntityKind::Legal => data.legal_entity_hierarchy(),
            EntityKind::Location => data.location_hierarchy(),
            EntityKind::Division => data.division_hierarchy(),
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ViewState {
    #[serde(default)]
    pub mode: VisualizationMode,
    #[serde(default)]
    pub entity: EntityKind,
    #[serde(default)]
    pub relation: RelationFilter,
    #[serde(default)]
    pub selected: Option<i64>,
}

/// Partial change submitted by the page controls
#[derive(Clone, Copy, Debug, Default, Deserialize)]
pub struct ViewUpdate {
    pub mode: Option<VisualizationMode>,
    pub entity: Option<EntityKind>,
    pub relation: Option<RelationFilter>,
}

impl ViewState {
    pub fn apply(&mut self, update: ViewUpdate) {
        if let Some(mode) = update.mode {
            self.mode = mode;
        }
        if let Some(entity) = update.entity {
            self.entity = entity;
        }
        if let Some(relation) = update.relation {
            self.relation = relation;
        }
    }

    pub fn select(&mut self, id: i64) {
        self.selected = Some(id);
    }

    pub fn reset_selection(&mut self) {
        self.selected = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::RelationKind;

    #[test]
    fn defaults_show_legal_entity_tree() {
        let view = ViewState::default();
        assert_eq!(view.mode, VisualizationMode::Hierarchical);
        assert_eq!(view.entity, EntityKind::Legal);
        assert_eq!(view.relation, RelationFilter::All);
        assert_eq!(view.selected, None);
    }

    #[test]
    fn update_changes_only_given_fields() {
        let mut view = ViewState::default();
        view.select(5);
        view.apply(ViewUpdate {
            mode: Some(VisualizationMode::Matrix),
            relation: Some(RelationFilter::Kind(RelationKind::Project)),
            ..Default::default()
        });

        assert_eq!(view.mode, VisualizationMode::Matrix);
        assert_eq!(view.entity, EntityKind::Legal);
        assert_eq!(view.relation, RelationFilter::Kind(RelationKind::Project));
        assert_eq!(view.selected, Some(5));

        view.reset_selection();
        assert_eq!(view.selected, None);
    }

    #[test]
    fn state_round_trips_through_session_json() {
        let view = ViewState {
            mode: VisualizationMode::Network,
            entity: EntityKind::Division,
            relation: RelationFilter::Kind(RelationKind::Mentoring),
            selected: Some(8),
        };
        let json = serde_json::to_value(view).unwrap();
        assert_eq!(json["mode"], "network");
        assert_eq!(json["relation"], "MENTORING");
        assert_eq!(serde_json::from_value::<ViewState>(json).unwrap(), view);
    }

    #[test]
    fn entity_kind_picks_matching_hierarchy() {
        let data = OrgData::sample();
        assert_eq!(EntityKind::Legal.hierarchy(&data).unwrap().len(), 4);
        assert_eq!(EntityKind::Location.hierarchy(&data).unwrap().len(), 3);
        assert_eq!(EntityKind::Division.hierarchy(&data).unwrap().len(), 13);
    }
}
