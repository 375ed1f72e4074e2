use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use async_trait::async_trait;
use chrono::Utc;

use crate::aggregation::{BudgetAmounts, DataType, LineItem, Section};
use crate::classification;
use crate::errors::Result;
use crate::references::{ReferenceEntry, ReferenceResolverTrait, ReferenceView, Resolution};

use super::revisions_model::{BudgetRow, NewProject, NewRevision, Project, Revision};
use super::revisions_service::{line_items_to_rows, rows_to_line_items, RevisionService};
use super::revisions_traits::{BudgetRowRepositoryTrait, RevisionRepositoryTrait};

#[derive(Default)]
struct MockBudgetRowRepository {
    rows: RwLock<Vec<BudgetRow>>,
}

impl MockBudgetRowRepository {
    fn seed_original(&self, project_id: &str, revision_id: &str, items: &[LineItem]) {
        let rows = line_items_to_rows(project_id, revision_id, items);
        self.rows.write().unwrap().extend(rows);
    }

    fn computed_count(&self, revision_id: &str, section: Section) -> usize {
        self.rows
            .read()
            .unwrap()
            .iter()
            .filter(|r| {
                r.revision_id == revision_id
                    && r.section == section
                    && r.data_type == DataType::Computed
            })
            .count()
    }
}

#[async_trait]
impl BudgetRowRepositoryTrait for MockBudgetRowRepository {
    fn load_rows(
        &self,
        revision_id: &str,
        section: Section,
        data_type: DataType,
    ) -> Result<Vec<BudgetRow>> {
        let mut rows: Vec<BudgetRow> = self
            .rows
            .read()
            .unwrap()
            .iter()
            .filter(|r| {
                r.revision_id == revision_id && r.section == section && r.data_type == data_type
            })
            .cloned()
            .collect();
        rows.sort_by_key(|r| r.row_index);
        Ok(rows)
    }

    async fn replace_rows(
        &self,
        revision_id: &str,
        section: Section,
        data_type: DataType,
        rows: Vec<BudgetRow>,
    ) -> Result<usize> {
        let mut stored = self.rows.write().unwrap();
        stored.retain(|r| {
            !(r.revision_id == revision_id
                && r.section == section
                && r.data_type == data_type)
        });
        let count = rows.len();
        stored.extend(rows);
        Ok(count)
    }
}

#[derive(Default)]
struct MockRevisionRepository {
    projects: RwLock<Vec<Project>>,
    revisions: RwLock<Vec<Revision>>,
}

#[async_trait]
impl RevisionRepositoryTrait for MockRevisionRepository {
    fn list_projects(&self) -> Result<Vec<Project>> {
        Ok(self.projects.read().unwrap().clone())
    }

    async fn create_project(&self, new_project: NewProject) -> Result<Project> {
        let mut projects = self.projects.write().unwrap();
        let project = Project {
            id: format!("project-{}", projects.len() + 1),
            name: new_project.name,
            created_at: Utc::now().naive_utc(),
        };
        projects.push(project.clone());
        Ok(project)
    }

    fn list_revisions(&self, project_id: &str) -> Result<Vec<Revision>> {
        Ok(self
            .revisions
            .read()
            .unwrap()
            .iter()
            .filter(|r| r.project_id == project_id)
            .cloned()
            .collect())
    }

    async fn get_or_create_revision(&self, new_revision: NewRevision) -> Result<Revision> {
        let mut revisions = self.revisions.write().unwrap();
        if let Some(existing) = revisions
            .iter()
            .find(|r| r.project_id == new_revision.project_id && r.label == new_revision.label)
        {
            return Ok(existing.clone());
        }
        let revision = Revision {
            id: format!("revision-{}", revisions.len() + 1),
            project_id: new_revision.project_id,
            label: new_revision.label,
            created_at: Utc::now().naive_utc(),
        };
        revisions.push(revision.clone());
        Ok(revision)
    }
}

/// In-memory resolver: declared entries win, everything else is minted
/// with the level derived from the code.
#[derive(Default)]
struct MockResolver {
    entries: RwLock<HashMap<(Section, String), ReferenceEntry>>,
}

impl MockResolver {
    fn with_entry(self, section: Section, code: &str, level: i32) -> Self {
        self.entries.write().unwrap().insert(
            (section, code.to_string()),
            ReferenceEntry {
                id: format!("seed-{code}"),
                section,
                code: code.to_string(),
                name: format!("catalog {code}"),
                level,
                included: true,
            },
        );
        self
    }
}

#[async_trait]
impl ReferenceResolverTrait for MockResolver {
    async fn resolve(&self, section: Section, code: &str) -> Result<Resolution> {
        classification::validate(code)?;
        let mut entries = self.entries.write().unwrap();
        if let Some(entry) = entries.get(&(section, code.to_string())) {
            return Ok(Resolution {
                entry: entry.clone(),
                minted: false,
            });
        }
        let entry = ReferenceEntry {
            id: format!("minted-{code}"),
            section,
            code: code.to_string(),
            name: String::new(),
            level: classification::derived_level(code),
            included: true,
        };
        entries.insert((section, code.to_string()), entry.clone());
        Ok(Resolution {
            entry,
            minted: true,
        })
    }

    async fn preload(&self, _section: Section) -> Result<usize> {
        Ok(self.entries.read().unwrap().len())
    }

    fn view(&self) -> Result<ReferenceView> {
        Ok(ReferenceView::new(
            self.entries.read().unwrap().values().cloned(),
        ))
    }
}

fn item(section: Section, code: &str, level: i32, approved: f64, executed: f64) -> LineItem {
    LineItem {
        classification_code: code.to_string(),
        indicator_name: format!("row {code}"),
        level,
        section,
        approved: BudgetAmounts {
            regional: approved,
            ..BudgetAmounts::ZERO
        },
        executed: BudgetAmounts {
            regional: executed,
            ..BudgetAmounts::ZERO
        },
        data_type: DataType::Original,
        source_row: Some(7),
    }
}

fn service(
    budget_rows: Arc<MockBudgetRowRepository>,
    resolver: Arc<MockResolver>,
) -> RevisionService {
    RevisionService::new(
        budget_rows,
        Arc::new(MockRevisionRepository::default()),
        resolver,
    )
}

#[test]
fn items_survive_the_row_round_trip() {
    let items = vec![
        item(Section::Income, "10000000000000000", 0, 300.0, 150.0),
        item(Section::Income, "10100000000000000", 1, 100.0, 50.0),
        item(Section::Income, "10200000000000000", 1, 200.0, 100.0),
    ];

    let rows = line_items_to_rows("p1", "r1", &items);
    assert_eq!(rows.len(), items.len() * 14);
    let reassembled = rows_to_line_items(&rows).unwrap();
    assert_eq!(reassembled, items);
}

#[test]
fn row_groups_must_agree_on_their_code() {
    let items = vec![item(Section::Income, "10100000000000000", 1, 1.0, 1.0)];
    let mut rows = line_items_to_rows("p1", "r1", &items);
    rows[3].classification_code = "10200000000000000".to_string();

    assert!(rows_to_line_items(&rows).is_err());
}

#[tokio::test]
async fn imported_items_load_back_unchanged() {
    let budget_rows = Arc::new(MockBudgetRowRepository::default());
    let service = service(budget_rows, Arc::new(MockResolver::default()));
    let items = vec![item(Section::Income, "10100000000000000", 1, 10.0, 5.0)];

    let written = service
        .import_original("p1", "r1", Section::Income, &items)
        .await
        .unwrap();
    assert_eq!(written, 14);

    let loaded = service
        .load_line_items("r1", Section::Income)
        .await
        .unwrap();
    assert_eq!(loaded, items);
}

#[tokio::test]
async fn import_rejects_items_from_another_section() {
    let budget_rows = Arc::new(MockBudgetRowRepository::default());
    let service = service(budget_rows, Arc::new(MockResolver::default()));
    let items = vec![item(Section::Expense, "10100000000000000", 1, 1.0, 1.0)];

    assert!(service
        .import_original("p1", "r1", Section::Income, &items)
        .await
        .is_err());
}

#[tokio::test]
async fn load_refreshes_levels_from_the_catalog() {
    let budget_rows = Arc::new(MockBudgetRowRepository::default());
    // Stored with level 2, declared level 1 in the catalog.
    budget_rows.seed_original(
        "p1",
        "r1",
        &[item(Section::Income, "10101000000000000", 2, 10.0, 5.0)],
    );
    let resolver =
        Arc::new(MockResolver::default().with_entry(Section::Income, "10101000000000000", 1));

    let service = service(budget_rows, resolver);
    let items = service
        .load_line_items("r1", Section::Income)
        .await
        .unwrap();

    assert_eq!(items.len(), 1);
    assert_eq!(items[0].level, 1);
    assert_eq!(items[0].approved.regional, 10.0);
}

#[tokio::test]
async fn full_pass_aggregates_persists_and_balances() {
    let budget_rows = Arc::new(MockBudgetRowRepository::default());
    budget_rows.seed_original(
        "p1",
        "r1",
        &[
            item(Section::Income, "10000000000000000", 0, 0.0, 0.0),
            item(Section::Income, "10100000000000000", 1, 600_000.0, 500_000.0),
            item(Section::Income, "10200000000000000", 1, 400_000.0, 450_000.0),
        ],
    );
    budget_rows.seed_original(
        "p1",
        "r1",
        &[item(Section::Expense, "20000000000000000", 0, 700_000.0, 980_000.0)],
    );
    let resolver = Arc::new(MockResolver::default());

    let service = service(budget_rows.clone(), resolver);
    let report = service.run_pass("p1", "r1").await.unwrap();

    assert!(report.section_errors.is_empty());
    let income_root = report
        .result
        .get(Section::Income, "10000000000000000")
        .unwrap();
    assert_eq!(income_root.item.approved.regional, 1_000_000.0);

    let deficit = report.deficit.unwrap();
    assert_eq!(deficit.approved.regional, 300_000.0);
    assert_eq!(deficit.executed.regional, -30_000.0);

    // Every resolved code was unknown to the empty catalog.
    assert_eq!(report.minted_codes.len(), 4);

    // Both sections' computed slices were persisted, synthetic totals
    // included: income 3 nodes + total, expense 1 node + total.
    assert_eq!(budget_rows.computed_count("r1", Section::Income), 4 * 14);
    assert_eq!(budget_rows.computed_count("r1", Section::Expense), 2 * 14);
}

#[tokio::test]
async fn failing_section_does_not_sink_the_pass() {
    let budget_rows = Arc::new(MockBudgetRowRepository::default());
    budget_rows.seed_original(
        "p1",
        "r1",
        &[item(Section::Income, "10000000000000000", 0, 100.0, 50.0)],
    );
    // Duplicate codes make the expense hierarchy unresolvable.
    budget_rows.seed_original(
        "p1",
        "r1",
        &[
            item(Section::Expense, "20000000000000000", 0, 1.0, 1.0),
            item(Section::Expense, "20000000000000000", 0, 2.0, 2.0),
        ],
    );
    let resolver = Arc::new(MockResolver::default());

    let service = service(budget_rows.clone(), resolver);
    let report = service.run_pass("p1", "r1").await.unwrap();

    assert_eq!(report.section_errors.len(), 1);
    assert_eq!(report.section_errors[0].section, Section::Expense);
    assert!(report
        .result
        .get(Section::Income, "10000000000000000")
        .is_some());
    assert_eq!(budget_rows.computed_count("r1", Section::Expense), 0);
    // Expense never aggregated, so no balance.
    assert!(report.deficit.is_none());
}

#[tokio::test]
async fn pass_without_expense_data_has_no_balance() {
    let budget_rows = Arc::new(MockBudgetRowRepository::default());
    budget_rows.seed_original(
        "p1",
        "r1",
        &[item(Section::Income, "10000000000000000", 0, 100.0, 50.0)],
    );
    let resolver = Arc::new(MockResolver::default());

    let service = service(budget_rows, resolver);
    let report = service.run_pass("p1", "r1").await.unwrap();

    assert!(report.deficit.is_none());
    assert!(report.section_errors.is_empty());
}

#[tokio::test]
async fn rerunning_a_pass_does_not_stack_computed_rows() {
    let budget_rows = Arc::new(MockBudgetRowRepository::default());
    budget_rows.seed_original(
        "p1",
        "r1",
        &[item(Section::Income, "10000000000000000", 0, 100.0, 50.0)],
    );
    let resolver = Arc::new(MockResolver::default());

    let service = service(budget_rows.clone(), resolver);
    service.run_pass("p1", "r1").await.unwrap();
    let first = budget_rows.computed_count("r1", Section::Income);
    service.run_pass("p1", "r1").await.unwrap();
    let second = budget_rows.computed_count("r1", Section::Income);

    assert_eq!(first, second);
}

#[tokio::test]
async fn revision_labels_are_idempotent_per_project() {
    let repo = Arc::new(MockRevisionRepository::default());
    let service = RevisionService::new(
        Arc::new(MockBudgetRowRepository::default()),
        repo,
        Arc::new(MockResolver::default()),
    );

    let project = service
        .create_project(NewProject {
            name: "Annual report".to_string(),
        })
        .await
        .unwrap();
    let first = service
        .get_or_create_revision(NewRevision {
            project_id: project.id.clone(),
            label: "Q1".to_string(),
        })
        .await
        .unwrap();
    let second = service
        .get_or_create_revision(NewRevision {
            project_id: project.id.clone(),
            label: "Q1".to_string(),
        })
        .await
        .unwrap();

    assert_eq!(first.id, second.id);
    assert_eq!(service.list_revisions(&project.id).unwrap().len(), 1);
}
