//! Detail panel lookup
//!
//! Resolves the selected id against the records relevant for the current
//! mode. Unknown ids resolve to nothing.

use serde::Serialize;

use crate::entity::{FunctionalRelation, Organization, Staff};
use crate::fixture::OrgData;
use crate::hierarchy::{HierarchyError, HierarchyNode};
use crate::view::{EntityKind, ViewState, VisualizationMode};

#[derive(Debug, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Detail<'a> {
    Organization(&'a Organization),
    Division(HierarchyNode),
    Staff(StaffDetail<'a>),
}

#[derive(Debug, Serialize)]
pub struct StaffDetail<'a> {
    pub staff: &'a Staff,
    pub organization: Option<&'a Organization>,
    pub legal_entity: Option<&'a Organization>,
    pub location: Option<&'a Organization>,
    pub relations: Vec<RelationLine<'a>>,
}

/// Which end of a relation the selected staff member is on
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    Manages,
    ReportsTo,
}

impl Direction {
    pub fn label(self) -> &'static str {
        match self {
            Direction::Manages => "Руководит: ",
            Direction::ReportsTo => "Подчиняется: ",
        }
    }
}

#[derive(Debug, Serialize)]
pub struct RelationLine<'a> {
    pub relation: &'a FunctionalRelation,
    pub label: &'static str,
    pub direction: Direction,
    /// Staff member on the other end, None for a dangling id
    pub counterpart: Option<&'a Staff>,
}

/// Detail for the node selected in `view`
pub fn lookup<'a>(data: &'a OrgData, view: &ViewState) -> Result<Option<Detail<'a>>, HierarchyError> {
    let Some(id) = view.selected else {
        return Ok(None);
    };

    let detail = match (view.mode, view.entity) {
        (VisualizationMode::Hierarchical, EntityKind::Legal | EntityKind::Location) => {
            data.organization(id).map(Detail::Organization)
        }
        (VisualizationMode::Hierarchical, EntityKind::Division) => {
            data.division_hierarchy()?.find(id).cloned().map(Detail::Division)
        }
        (VisualizationMode::Network | VisualizationMode::Matrix, _) => {
            data.staff_member(id).map(|staff| Detail::Staff(staff_detail(data, staff)))
        }
    };
    Ok(detail)
}

fn staff_detail<'a>(data: &'a OrgData, staff: &'a Staff) -> StaffDetail<'a> {
    let relations = data
        .relations_of(staff.id)
        .map(|relation| {
            let (direction, other) = if relation.manager_id == staff.id {
                (Direction::Manages, relation.subordinate_id)
            } else {
                (Direction::ReportsTo, relation.manager_id)
            };
            RelationLine {
                relation,
                label: relation.relation_type.label(),
                direction,
                counterpart: data.staff_member(other),
            }
        })
        .collect();

    StaffDetail {
        staff,
        organization: data.organization(staff.organization_id),
        legal_entity: staff.legal_entity_id.and_then(|id| data.organization(id)),
        location: staff.location_id.and_then(|id| data.organization(id)),
        relations,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn view(mode: VisualizationMode, entity: EntityKind, selected: Option<i64>) -> ViewState {
        ViewState {
            mode,
            entity,
            selected,
            ..Default::default()
        }
    }

    #[test]
    fn nothing_selected_yields_no_panel() {
        let data = OrgData::sample();
        let detail = lookup(&data, &view(VisualizationMode::Network, EntityKind::Legal, None)).unwrap();
        assert!(detail.is_none());
    }

    #[test]
    fn unknown_id_yields_no_panel_in_every_mode() {
        let data = OrgData::sample();
        for mode in VisualizationMode::ALL {
            for entity in EntityKind::ALL {
                let detail = lookup(&data, &view(mode, entity, Some(404))).unwrap();
                assert!(detail.is_none(), "{:?}/{:?}", mode, entity);
            }
        }
    }

    #[test]
    fn hierarchical_mode_resolves_organizations() {
        let data = OrgData::sample();
        let detail = lookup(&data, &view(VisualizationMode::Hierarchical, EntityKind::Location, Some(6)))
            .unwrap();
        match detail {
            Some(Detail::Organization(org)) => assert_eq!(org.name, "БЦ Невский"),
            other => panic!("unexpected detail: {:?}", other),
        }
    }

    #[test]
    fn division_is_found_in_nested_levels() {
        let data = OrgData::sample();
        let detail = lookup(&data, &view(VisualizationMode::Hierarchical, EntityKind::Division, Some(12)))
            .unwrap();
        match detail {
            Some(Detail::Division(node)) => {
                assert_eq!(node.code.as_deref(), Some("FE"));
                assert_eq!(node.level, Some(4));
            }
            other => panic!("unexpected detail: {:?}", other),
        }
    }

    #[test]
    fn staff_detail_lists_relations_with_direction() {
        let data = OrgData::sample();
        let detail = lookup(&data, &view(VisualizationMode::Matrix, EntityKind::Legal, Some(9))).unwrap();
        let Some(Detail::Staff(staff)) = detail else {
            panic!("expected staff detail");
        };

        assert_eq!(staff.location.map(|org| org.id), Some(5));
        assert_eq!(staff.relations.len(), 5);

        let mentoring = staff.relations.iter().find(|line| line.relation.id == 29).unwrap();
        assert_eq!(mentoring.direction, Direction::ReportsTo);
        assert_eq!(mentoring.label, "Менторство");
        assert_eq!(mentoring.counterpart.map(|s| s.id), Some(15));

        let project = staff.relations.iter().find(|line| line.relation.id == 25).unwrap();
        assert_eq!(project.direction, Direction::Manages);
    }

    #[test]
    fn dangling_counterpart_is_blank() {
        let mut data = OrgData::sample();
        data.relations[0].subordinate_id = 999;
        let detail = lookup(&data, &view(VisualizationMode::Network, EntityKind::Legal, Some(1))).unwrap();
        let Some(Detail::Staff(staff)) = detail else {
            panic!("expected staff detail");
        };
        assert!(staff.relations[0].counterpart.is_none());
    }
}
