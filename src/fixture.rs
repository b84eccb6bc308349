//! Fixture data store
//!
//! Holds the organization structure the charts are drawn from. The built-in
//! sample stands in for what would normally come from a backend; a JSON file
//! with the same shape can replace it via `data_file` in the config.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::entity::{Division, FunctionalRelation, OrgType, Organization, RelationKind, Staff};
use crate::hierarchy::{self, Hierarchy, HierarchyError};
use crate::network::NetworkView;

/// Read-only snapshot of organizations, divisions, staff and relations
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct OrgData {
    #[serde(default)]
    pub organizations: Vec<Organization>,
    #[serde(default)]
    pub divisions: Vec<Division>,
    #[serde(default)]
    pub staff: Vec<Staff>,
    #[serde(default, rename = "functional_relations")]
    pub relations: Vec<FunctionalRelation>,
}

impl OrgData {
    /// Load a snapshot from a JSON file
    pub fn load(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&content)?)
    }

    /// Legal entity forest
    pub fn legal_entity_hierarchy(&self) -> Result<Hierarchy, HierarchyError> {
        hierarchy::build_org_hierarchy(&self.organizations, OrgType::LegalEntity)
    }

    /// Location forest
    pub fn location_hierarchy(&self) -> Result<Hierarchy, HierarchyError> {
        hierarchy::build_org_hierarchy(&self.organizations, OrgType::Location)
    }

    /// Division forest
    pub fn division_hierarchy(&self) -> Result<Hierarchy, HierarchyError> {
        hierarchy::build_division_hierarchy(&self.divisions)
    }

    /// Staff and relations as nodes and links
    pub fn functional_relations_network(&self) -> NetworkView {
        NetworkView::build(&self.staff, &self.relations)
    }

    pub fn organization(&self, id: i64) -> Option<&Organization> {
        self.organizations.iter().find(|org| org.id == id)
    }

    pub fn staff_member(&self, id: i64) -> Option<&Staff> {
        self.staff.iter().find(|person| person.id == id)
    }

    /// Relations where `staff_id` is either the manager or the subordinate
    pub fn relations_of(&self, staff_id: i64) -> impl Iterator<Item = &FunctionalRelation> {
        self.relations
            .iter()
            .filter(move |rel| rel.manager_id == staff_id || rel.subordinate_id == staff_id)
    }

    /// Built-in sample structure of the OFS holding
    pub fn sample() -> Self {
        Self {
            organizations: sample_organizations(),
            divisions: sample_divisions(),
            staff: sample_staff(),
            relations: sample_relations(),
        }
    }
}

fn opt(s: &str) -> Option<String> {
    Some(s.to_string())
}

#[allow(clippy::too_many_arguments)]
fn legal_entity(
    id: i64,
    name: &str,
    description: &str,
    parent_id: Option<i64>,
    is_active: bool,
    legal_address: &str,
    inn: &str,
    kpp: &str,
) -> Organization {
    Organization {
        id,
        name: name.to_string(),
        description: description.to_string(),
        parent_id,
        org_type: OrgType::LegalEntity,
        is_active,
        legal_address: opt(legal_address),
        physical_address: None,
        inn: opt(inn),
        kpp: opt(kpp),
    }
}

fn location(id: i64, name: &str, description: &str, parent_id: i64, physical_address: &str) -> Organization {
    Organization {
        id,
        name: name.to_string(),
        description: description.to_string(),
        parent_id: Some(parent_id),
        org_type: OrgType::Location,
        is_active: true,
        legal_address: None,
        physical_address: opt(physical_address),
        inn: None,
        kpp: None,
    }
}

fn sample_organizations() -> Vec<Organization> {
    vec![
        legal_entity(1, "ОФС Глобал", "Головная организация холдинга ОФС", None, true,
            "г. Москва, ул. Ленина, д. 1", "7701234567", "770101001"),
        legal_entity(2, "ОФС-Москва", "Московское подразделение ОФС", Some(1), true,
            "г. Москва, ул. Тверская, д. 10", "7702345678", "770201001"),
        legal_entity(3, "ОФС-Питер", "Санкт-Петербургское подразделение ОФС", Some(1), true,
            "г. Санкт-Петербург, Невский проспект, д. 20", "7803456789", "780301001"),
        legal_entity(4, "ОФС-Сибирь", "Сибирское подразделение ОФС", Some(1), false,
            "г. Новосибирск, ул. Красная, д. 5", "5404567890", "540401001"),
        location(5, "БЦ Метрополис", "Головной офис в Москве", 1,
            "г. Москва, Ленинградское шоссе, д. 16А, стр. 1"),
        location(6, "БЦ Невский", "Офис в Санкт-Петербурге", 3,
            "г. Санкт-Петербург, Невский проспект, д. 100"),
        location(7, "Технопарк", "Производственное подразделение в Москве", 2,
            "г. Москва, ул. Академика Королева, д. 12"),
    ]
}

fn division(id: i64, name: &str, code: &str, description: &str, parent_id: Option<i64>, level: i32) -> Division {
    Division {
        id,
        name: name.to_string(),
        code: opt(code),
        description: description.to_string(),
        parent_id,
        level,
        is_active: true,
    }
}

fn sample_divisions() -> Vec<Division> {
    vec![
        division(1, "Правление", "BOARD", "Руководство компании", None, 1),
        division(2, "Департамент ИТ", "IT", "Департамент информационных технологий", Some(1), 2),
        division(3, "Департамент Финансов", "FIN", "Департамент финансов и бухгалтерии", Some(1), 2),
        division(4, "Департамент HR", "HR", "Департамент управления персоналом", Some(1), 2),
        division(5, "Отдел разработки", "DEV", "Отдел разработки ПО", Some(2), 3),
        division(6, "Отдел тестирования", "QA", "Отдел тестирования и контроля качества", Some(2), 3),
        division(7, "Отдел инфраструктуры", "INFRA", "Отдел ИТ-инфраструктуры", Some(2), 3),
        division(8, "Бухгалтерия", "ACCT", "Бухгалтерия", Some(3), 3),
        division(9, "Отдел бюджетирования", "BUDG", "Отдел планирования и бюджетирования", Some(3), 3),
        division(10, "Отдел найма", "RECR", "Отдел рекрутинга и найма", Some(4), 3),
        division(11, "Отдел обучения", "TRAIN", "Отдел обучения и развития", Some(4), 3),
        division(12, "Команда Frontend", "FE", "Команда разработки Frontend", Some(5), 4),
        division(13, "Команда Backend", "BE", "Команда разработки Backend", Some(5), 4),
    ]
}

/// Staff member of the head office unless `branch` names (organization, location)
#[allow(clippy::too_many_arguments)]
fn person(
    id: i64,
    name: &str,
    position: &str,
    division: &str,
    division_id: i64,
    level: i32,
    email: &str,
    phone: &str,
    branch: Option<(i64, i64)>,
) -> Staff {
    let (organization_id, location_id) = branch.unwrap_or((1, 5));
    Staff {
        id,
        name: name.to_string(),
        position: position.to_string(),
        division: division.to_string(),
        division_id,
        organization_id,
        legal_entity_id: Some(organization_id),
        location_id: Some(location_id),
        level,
        email: opt(email),
        phone: opt(phone),
    }
}

fn sample_staff() -> Vec<Staff> {
    vec![
        person(1, "Иванов Иван Иванович", "Генеральный директор", "Правление", 1, 1,
            "ivanov@ofs.ru", "+7 (900) 123-45-67", None),
        person(2, "Петров Петр Петрович", "Финансовый директор", "Правление", 1, 1,
            "petrov@ofs.ru", "+7 (900) 234-56-78", None),
        person(3, "Сидоров Сидор Сидорович", "ИТ-директор", "Правление", 1, 1,
            "sidorov@ofs.ru", "+7 (900) 345-67-89", None),
        person(4, "Козлов Козьма Петрович", "Директор по персоналу", "Правление", 1, 1,
            "kozlov@ofs.ru", "+7 (900) 456-78-90", None),
        person(5, "Смирнов Алексей Владимирович", "Руководитель департамента ИТ", "Департамент ИТ", 2, 2,
            "smirnov@ofs.ru", "+7 (900) 567-89-01", None),
        person(6, "Кузнецов Дмитрий Сергеевич", "Руководитель департамента финансов", "Департамент Финансов", 3, 2,
            "kuznetsov@ofs.ru", "+7 (900) 678-90-12", None),
        person(7, "Соколова Мария Ивановна", "Руководитель HR-департамента", "Департамент HR", 4, 2,
            "sokolova@ofs.ru", "+7 (900) 789-01-23", None),
        person(8, "Новиков Андрей Петрович", "Начальник отдела разработки", "Отдел разработки", 5, 3,
            "novikov@ofs.ru", "+7 (900) 890-12-34", None),
        person(9, "Морозова Екатерина Александровна", "Начальник отдела тестирования", "Отдел тестирования", 6, 3,
            "morozova@ofs.ru", "+7 (900) 901-23-45", None),
        person(10, "Волков Игорь Владимирович", "Начальник отдела инфраструктуры", "Отдел инфраструктуры", 7, 3,
            "volkov@ofs.ru", "+7 (900) 012-34-56", None),
        person(11, "Васильева Ольга Николаевна", "Главный бухгалтер", "Бухгалтерия", 8, 3,
            "vasilyeva@ofs.ru", "+7 (900) 123-45-67", None),
        person(12, "Зайцев Артём Дмитриевич", "Руководитель отдела бюджетирования", "Отдел бюджетирования", 9, 3,
            "zaitsev@ofs.ru", "+7 (900) 234-56-78", None),
        person(13, "Павлова Наталья Сергеевна", "Руководитель отдела найма", "Отдел найма", 10, 3,
            "pavlova@ofs.ru", "+7 (900) 345-67-89", None),
        person(14, "Семенов Кирилл Алексеевич", "Руководитель отдела обучения", "Отдел обучения", 11, 3,
            "semenov@ofs.ru", "+7 (900) 456-78-90", None),
        person(15, "Голубев Михаил Владимирович", "Руководитель Frontend команды", "Команда Frontend", 12, 4,
            "golubev@ofs.ru", "+7 (900) 567-89-01", None),
        person(16, "Виноградов Николай Иванович", "Руководитель Backend команды", "Команда Backend", 13, 4,
            "vinogradov@ofs.ru", "+7 (900) 678-90-12", None),
        // St. Petersburg office
        person(17, "Григорьев Станислав Петрович", "Директор Санкт-Петербургского офиса", "Правление", 1, 2,
            "grigoriev@ofs.ru", "+7 (900) 789-01-23", Some((3, 6))),
    ]
}

fn rel(id: i64, manager_id: i64, subordinate_id: i64, relation_type: RelationKind, description: &str) -> FunctionalRelation {
    FunctionalRelation {
        id,
        manager_id,
        subordinate_id,
        relation_type,
        description: opt(description),
    }
}

fn sample_relations() -> Vec<FunctionalRelation> {
    use RelationKind::*;

    const DIRECT: &str = "Прямое подчинение";

    vec![
        rel(1, 1, 2, Administrative, DIRECT),
        rel(2, 1, 3, Administrative, DIRECT),
        rel(3, 1, 4, Administrative, DIRECT),
        rel(4, 1, 17, Administrative, "Прямое подчинение руководителя филиала"),
        rel(5, 3, 5, Administrative, DIRECT),
        rel(6, 2, 6, Administrative, DIRECT),
        rel(7, 4, 7, Administrative, DIRECT),
        rel(8, 5, 8, Administrative, DIRECT),
        rel(9, 5, 9, Administrative, DIRECT),
        rel(10, 5, 10, Administrative, DIRECT),
        rel(11, 6, 11, Administrative, DIRECT),
        rel(12, 6, 12, Administrative, DIRECT),
        rel(13, 7, 13, Administrative, DIRECT),
        rel(14, 7, 14, Administrative, DIRECT),
        rel(15, 8, 15, Administrative, DIRECT),
        rel(16, 8, 16, Administrative, DIRECT),
        rel(17, 1, 5, Functional, "Стратегическое руководство"),
        rel(18, 1, 6, Functional, "Стратегическое руководство"),
        rel(19, 1, 7, Functional, "Стратегическое руководство"),
        rel(20, 3, 8, Functional, "Техническое руководство"),
        rel(21, 3, 9, Functional, "Техническое руководство"),
        rel(22, 3, 10, Functional, "Техническое руководство"),
        rel(23, 5, 11, Project, "Проект автоматизации бухгалтерии"),
        rel(24, 8, 14, Project, "Проект обучения разработчиков"),
        rel(25, 9, 15, Project, "Тестирование Frontend"),
        rel(26, 9, 16, Project, "Тестирование Backend"),
        rel(27, 17, 10, Territorial, "Инфраструктура СПб офиса"),
        rel(28, 8, 16, Mentoring, "Профессиональное развитие"),
        rel(29, 15, 9, Mentoring, "Обучение автоматизации тестирования UI"),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sample_counts() {
        let data = OrgData::sample();
        assert_eq!(data.organizations.len(), 7);
        assert_eq!(data.divisions.len(), 13);
        assert_eq!(data.staff.len(), 17);
        assert_eq!(data.relations.len(), 29);
    }

    #[test]
    fn relations_of_includes_both_directions() {
        let data = OrgData::sample();
        let ids: Vec<i64> = data.relations_of(9).map(|rel| rel.id).collect();
        assert_eq!(ids, vec![9, 21, 25, 26, 29]);
    }

    #[test]
    fn branch_staff_points_at_branch_organization() {
        let data = OrgData::sample();
        let director = data.staff_member(17).unwrap();
        assert_eq!(director.organization_id, 3);
        assert_eq!(director.location_id, Some(6));
    }

    #[test]
    fn json_snapshot_loads_back() {
        let data = OrgData::sample();
        let json = serde_json::to_string(&data).unwrap();
        let path = std::env::temp_dir().join(format!("orgviz-fixture-{}.json", std::process::id()));
        std::fs::write(&path, json).unwrap();

        let loaded = OrgData::load(&path).unwrap();
        std::fs::remove_file(&path).ok();

        assert_eq!(loaded.organizations, data.organizations);
        assert_eq!(loaded.relations.len(), 29);
    }
}
