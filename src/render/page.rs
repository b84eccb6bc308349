//! Visualization page
//!
//! Server-rendered HTML around the chart: mode tabs, the settings panel with
//! the filter relevant to the current mode, the detail panel of the selected
//! node and a legend.

use std::fmt::Write;

use super::network::level_color;
use super::svg::escape;
use super::{matrix, tree};
use crate::detail::{Detail, StaffDetail};
use crate::entity::{Organization, RelationKind};
use crate::hierarchy::HierarchyNode;
use crate::network::RelationFilter;
use crate::view::{EntityKind, ViewState, VisualizationMode};

const STYLE: &str = r#"
body { font-family: Roboto, Arial, sans-serif; margin: 0; background: #fafafa; color: #212121; }
main { max-width: 1400px; margin: 0 auto; padding: 32px 24px; }
h1 { font-weight: 400; }
.tabs { display: flex; gap: 8px; margin-bottom: 32px; border-bottom: 1px solid #e0e0e0; }
.tabs button { border: none; background: none; padding: 12px 16px; cursor: pointer; font-size: 14px; text-transform: uppercase; }
.tabs button.active { color: #1976d2; border-bottom: 2px solid #1976d2; }
.layout { display: grid; grid-template-columns: 3fr 9fr; gap: 24px; }
.paper { background: #fff; padding: 16px; margin-bottom: 16px; box-shadow: 0 1px 3px rgba(0,0,0,.2); border-radius: 4px; }
.chart-paper { height: 650px; overflow: auto; }
select, .reset { width: 100%; padding: 8px; margin-bottom: 16px; }
.chip { display: inline-block; padding: 2px 8px; border-radius: 12px; color: #fff; font-size: 12px; margin-right: 8px; }
.swatch { display: inline-block; width: 12px; height: 12px; margin-right: 8px; vertical-align: middle; }
.swatch.round { border-radius: 50%; }
.relation { display: flex; align-items: center; margin-bottom: 8px; }
.error { color: #f44336; }
.node { cursor: pointer; }
"#;

const NETWORK_SCRIPT: &str = r#"
(function () {
  const svg = document.querySelector('svg.chart');
  if (!svg) return;
  const proto = location.protocol === 'https:' ? 'wss://' : 'ws://';
  const socket = new WebSocket(proto + location.host + svg.dataset.live);
  const nodes = new Map();
  svg.querySelectorAll('g.node').forEach(g => nodes.set(g.dataset.id, g));
  const lines = Array.from(svg.querySelectorAll('line.link'));
  const pos = new Map();
  socket.onmessage = event => {
    const msg = JSON.parse(event.data);
    if (msg.type !== 'tick') return;
    msg.data.nodes.forEach(n => {
      pos.set(String(n.id), n);
      const g = nodes.get(String(n.id));
      if (g) g.setAttribute('transform', `translate(${n.x},${n.y})`);
    });
    lines.forEach(l => {
      const s = pos.get(l.dataset.source), t = pos.get(l.dataset.target);
      if (!s || !t) return;
      l.setAttribute('x1', s.x); l.setAttribute('y1', s.y);
      l.setAttribute('x2', t.x); l.setAttribute('y2', t.y);
    });
  };
  const point = e => {
    const p = svg.createSVGPoint();
    p.x = e.clientX; p.y = e.clientY;
    return p.matrixTransform(svg.getScreenCTM().inverse());
  };
  const send = (type, id, e) => {
    const p = point(e);
    socket.send(JSON.stringify({ type, data: { id: Number(id), x: p.x, y: p.y } }));
  };
  let dragged = null, moved = false;
  nodes.forEach((g, id) => g.addEventListener('mousedown', e => {
    e.preventDefault(); dragged = id; moved = false; send('dragStart', id, e);
  }));
  window.addEventListener('mousemove', e => { if (dragged) { moved = true; send('drag', dragged, e); } });
  window.addEventListener('mouseup', e => { if (dragged) { send('dragEnd', dragged, e); dragged = null; } });
  svg.addEventListener('click', e => { if (moved) { e.preventDefault(); moved = false; } }, true);
})();
"#;

/// Everything the page shows besides the static chrome
pub struct PageContext<'a> {
    pub view: &'a ViewState,
    /// Chart SVG, or the reason it could not be drawn
    pub chart: Result<String, String>,
    pub detail: Option<Detail<'a>>,
}

pub fn render_page(ctx: &PageContext<'_>) -> String {
    let view = ctx.view;
    let mut html = String::with_capacity(64 * 1024);

    let _ = write!(
        html,
        r#"<!DOCTYPE html><html lang="ru"><head><meta charset="utf-8"><title>Визуализация организационной структуры</title><style>{}.cell:hover {{ fill: {}; }}</style></head><body><main><h1>Визуализация организационной структуры</h1>"#,
        STYLE,
        matrix::HOVER_COLOR
    );

    html.push_str(r#"<form method="post" action="/view" class="tabs">"#);
    for mode in VisualizationMode::ALL {
        let _ = write!(
            html,
            r#"<button type="submit" name="mode" value="{}"{}>{}</button>"#,
            mode.as_str(),
            if mode == view.mode { r#" class="active""# } else { "" },
            mode.label()
        );
    }
    html.push_str("</form>");

    html.push_str(r#"<div class="layout"><aside>"#);
    settings_panel(&mut html, view);
    if let Some(detail) = &ctx.detail {
        detail_panel(&mut html, detail);
    }
    legend(&mut html, view.mode);
    html.push_str("</aside>");

    html.push_str(r#"<section class="paper chart-paper">"#);
    match &ctx.chart {
        Ok(svg) if view.mode == VisualizationMode::Network => {
            // live simulation endpoint for the page script
            let live = format!("/api/network/ws?relation={}", view.relation.as_str());
            html.push_str(&svg.replacen("<svg ", &format!(r#"<svg data-live="{}" "#, escape(&live)), 1));
        }
        Ok(svg) => html.push_str(svg),
        Err(reason) => {
            let _ = write!(html, r#"<p class="error">Не удалось построить диаграмму: {}</p>"#, escape(reason));
        }
    }
    html.push_str("</section></div></main>");

    if view.mode == VisualizationMode::Network && ctx.chart.is_ok() {
        let _ = write!(html, "<script>{}</script>", NETWORK_SCRIPT);
    }
    html.push_str("</body></html>");
    html
}

fn settings_panel(html: &mut String, view: &ViewState) {
    html.push_str(r#"<div class="paper"><h3>Настройки визуализации</h3>"#);

    if view.mode.uses_relations() {
        html.push_str(r#"<form method="post" action="/view"><label for="relation">Тип связей</label><select id="relation" name="relation" onchange="this.form.submit()">"#);
        let options = std::iter::once(RelationFilter::All).chain(RelationKind::ALL.map(RelationFilter::Kind));
        for filter in options {
            let label = match filter {
                RelationFilter::All => "Все связи",
                RelationFilter::Kind(kind) => kind.filter_label(),
            };
            option(html, filter.as_str(), label, filter == view.relation);
        }
    } else {
        html.push_str(r#"<form method="post" action="/view"><label for="entity">Тип структуры</label><select id="entity" name="entity" onchange="this.form.submit()">"#);
        for entity in EntityKind::ALL {
            option(html, entity.as_str(), entity.label(), entity == view.entity);
        }
    }
    html.push_str("</select></form>");

    let _ = write!(
        html,
        r#"<form method="post" action="/view/reset"><button class="reset" type="submit"{}>Сбросить выделение</button></form></div>"#,
        if view.selected.is_none() { " disabled" } else { "" }
    );
}

fn option(html: &mut String, value: &str, label: &str, selected: bool) {
    let _ = write!(
        html,
        r#"<option value="{}"{}>{}</option>"#,
        value,
        if selected { " selected" } else { "" },
        label
    );
}

fn line(html: &mut String, label: &str, value: &str) {
    let _ = write!(html, "<p>{}{}</p>", label, escape(value));
}

fn detail_panel(html: &mut String, detail: &Detail<'_>) {
    html.push_str(r#"<div class="paper detail">"#);
    match detail {
        Detail::Organization(org) => organization_detail(html, org),
        Detail::Division(node) => division_detail(html, node),
        Detail::Staff(staff) => staff_detail(html, staff),
    }
    html.push_str("</div>");
}

fn status(is_active: bool) -> &'static str {
    if is_active {
        "Активен"
    } else {
        "Неактивен"
    }
}

fn organization_detail(html: &mut String, org: &Organization) {
    let _ = write!(html, "<h3>{}</h3>", escape(&org.name));
    line(html, "Тип: ", org.org_type.label());
    line(html, "", &org.description);
    if let Some(address) = &org.legal_address {
        line(html, "Юридический адрес: ", address);
    }
    if let Some(address) = &org.physical_address {
        line(html, "Физический адрес: ", address);
    }
    if let Some(inn) = &org.inn {
        line(html, "ИНН: ", inn);
    }
    if let Some(kpp) = &org.kpp {
        line(html, "КПП: ", kpp);
    }
    line(html, "Статус: ", status(org.is_active));
}

fn division_detail(html: &mut String, node: &HierarchyNode) {
    let _ = write!(html, "<h3>{}</h3>", escape(&node.name));
    if let Some(code) = &node.code {
        line(html, "Код: ", code);
    }
    if let Some(description) = &node.description {
        line(html, "", description);
    }
    if let Some(level) = node.level {
        line(html, "Уровень: ", &level.to_string());
    }
    line(html, "Статус: ", status(node.is_active));
}

fn staff_detail(html: &mut String, detail: &StaffDetail<'_>) {
    let staff = detail.staff;
    let _ = write!(html, "<h3>{}</h3>", escape(&staff.name));
    line(html, "Должность: ", &staff.position);
    line(html, "Подразделение: ", &staff.division);
    line(html, "Уровень: ", &staff.level.to_string());
    if let Some(org) = detail.organization {
        line(html, "Организация: ", &org.name);
    }
    if let Some(org) = detail.legal_entity {
        line(html, "Юридическое лицо: ", &org.name);
    }
    if let Some(org) = detail.location {
        line(html, "Место работы: ", &org.name);
    }
    if let Some(email) = &staff.email {
        line(html, "Email: ", email);
    }
    if let Some(phone) = &staff.phone {
        line(html, "Телефон: ", phone);
    }

    if detail.relations.is_empty() {
        return;
    }
    html.push_str("<h4>Функциональные связи:</h4>");
    for rel in &detail.relations {
        let (name, position) = rel
            .counterpart
            .map(|other| (other.name.as_str(), other.position.as_str()))
            .unwrap_or_default();
        let _ = write!(
            html,
            r#"<div class="relation"><span class="chip" style="background:{}">{}</span><span>{}{} ({})</span></div>"#,
            rel.relation.relation_type.color(),
            rel.label,
            rel.direction.label(),
            escape(name),
            escape(position)
        );
    }
}

fn legend(html: &mut String, mode: VisualizationMode) {
    html.push_str(r#"<div class="paper legend"><h3>Легенда</h3>"#);
    match mode {
        VisualizationMode::Hierarchical => {
            swatch(html, tree::ACTIVE_COLOR, true, "Активный элемент");
            swatch(html, tree::INACTIVE_COLOR, true, "Неактивный элемент");
        }
        VisualizationMode::Network => {
            swatch(html, level_color(1), true, "Уровень 1 (Высшее руководство)");
            swatch(html, level_color(2), true, "Уровень 2 (Руководители департаментов)");
            swatch(html, level_color(3), true, "Уровень 3 (Сотрудники)");
            html.push_str("<h4>Типы связей:</h4>");
            for kind in RelationKind::ALL {
                let _ = write!(
                    html,
                    r#"<p><span class="chip" style="background:{}">{}</span></p>"#,
                    kind.color(),
                    kind.label()
                );
            }
        }
        VisualizationMode::Matrix => {
            swatch(html, matrix::PRESENT_COLOR, false, "Наличие связи");
            swatch(html, matrix::ABSENT_COLOR, false, "Отсутствие связи");
        }
    }
    html.push_str("</div>");
}

fn swatch(html: &mut String, color: &str, round: bool, label: &str) {
    let _ = write!(
        html,
        r#"<p><span class="swatch{}" style="background:{}"></span>{}</p>"#,
        if round { " round" } else { "" },
        color,
        label
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::detail;
    use crate::fixture::OrgData;

    fn page(view: &ViewState, data: &OrgData, chart: Result<String, String>) -> String {
        let detail = detail::lookup(data, view).unwrap();
        render_page(&PageContext { view, chart, detail })
    }

    #[test]
    fn hierarchical_page_offers_entity_select() {
        let data = OrgData::sample();
        let html = page(&ViewState::default(), &data, Ok("<svg class=\"chart\"></svg>".into()));
        assert!(html.contains(r#"name="entity""#));
        assert!(!html.contains(r#"name="relation""#));
        assert!(html.contains("Активный элемент"));
        assert!(html.contains(" disabled>Сбросить выделение"));
        assert!(!html.contains("<script>"));
    }

    #[test]
    fn network_page_offers_relation_select_and_live_script() {
        let data = OrgData::sample();
        let view = ViewState {
            mode: VisualizationMode::Network,
            relation: RelationFilter::Kind(RelationKind::Project),
            ..Default::default()
        };
        let html = page(&view, &data, Ok("<svg class=\"chart\"></svg>".into()));
        assert!(html.contains(r#"name="relation""#));
        assert!(html.contains(r#"<option value="PROJECT" selected>"#));
        assert!(html.contains(r#"data-live="/api/network/ws?relation=PROJECT""#));
        assert!(html.contains("<script>"));
    }

    #[test]
    fn staff_detail_lists_relations() {
        let data = OrgData::sample();
        let view = ViewState {
            mode: VisualizationMode::Matrix,
            selected: Some(15),
            ..Default::default()
        };
        let html = page(&view, &data, Ok(String::new()));
        assert!(html.contains("<h3>Голубев Михаил Владимирович</h3>"));
        assert!(html.contains("Подчиняется: Новиков Андрей Петрович (Начальник отдела разработки)"));
        assert!(html.contains("Руководит: Морозова Екатерина Александровна"));
        assert!(!html.contains(" disabled>"));
    }

    #[test]
    fn organization_detail_shows_registration() {
        let data = OrgData::sample();
        let view = ViewState {
            selected: Some(4),
            ..Default::default()
        };
        let html = page(&view, &data, Ok(String::new()));
        assert!(html.contains("ИНН: 5404567890"));
        assert!(html.contains("Статус: Неактивен"));
    }

    #[test]
    fn matrix_cells_highlight_on_hover() {
        let data = OrgData::sample();
        let view = ViewState {
            mode: VisualizationMode::Matrix,
            ..Default::default()
        };
        let html = page(&view, &data, Ok(String::new()));
        assert!(html.contains(".cell:hover { fill: #ff9800; }"));
        assert!(html.contains("Наличие связи"));
    }

    #[test]
    fn chart_error_is_shown_inline() {
        let data = OrgData::sample();
        let html = page(&ViewState::default(), &data, Err("parent chain of record 1 contains a cycle".into()));
        assert!(html.contains(r#"class="error""#));
        assert!(html.contains("record 1 contains a cycle"));
    }
}
