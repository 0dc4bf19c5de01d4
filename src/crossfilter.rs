//! Category filtering that crosses roles.
//!
//! A case can be attributed to an analyst, a supervisor and an auditor at
//! once. Selecting a delay category keeps the rows whose first attributable
//! subject, in analyst, supervisor, team order, falls in that category.

use std::collections::HashMap;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::Serialize;
use tracing::debug;

use crate::aggregate::summary_table;
use crate::calendar::accrual_end;
use crate::error::TrackerError;
use crate::filters::RecordFilter;
use crate::models::{subject_key, CaseRecord, CategoryRow, DelayCategory, Role};
use crate::quota::QuotaSource;

const PRECEDENCE: [Role; 3] = [Role::Analyst, Role::Supervisor, Role::Team];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CategorySelection {
    #[default]
    All,
    Only(DelayCategory),
}

impl FromStr for CategorySelection {
    type Err = TrackerError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_lowercase().as_str() {
            "" | "all" | "todos" => Ok(CategorySelection::All),
            _ => value.parse().map(CategorySelection::Only),
        }
    }
}

pub fn categories_by_subject(cases: &[CaseRecord], role: Role, business_days: u32) -> Vec<CategoryRow> {
    let quota = i64::from(business_days).saturating_mul(role.config().per_subject_quota);
    categories_for_quota(cases, role, quota)
}

/// Per-subject categories tagged with the first non-empty team seen on the
/// subject's cases.
pub fn categories_for_quota(cases: &[CaseRecord], role: Role, per_subject_quota: i64) -> Vec<CategoryRow> {
    let column = role.config().subject_column;
    let mut teams: HashMap<String, String> = HashMap::new();
    for case in cases {
        let team = case.team.trim();
        if team.is_empty() {
            continue;
        }
        if let Some(key) = subject_key(case.subject(column)) {
            teams.entry(key).or_insert_with(|| team.to_string());
        }
    }

    summary_table(cases, role, per_subject_quota)
        .into_iter()
        .map(|row| {
            let team = subject_key(&row.subject)
                .and_then(|key| teams.get(&key).cloned())
                .unwrap_or_default();
            CategoryRow {
                subject: row.subject,
                category: row.category,
                team,
                role,
            }
        })
        .collect()
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CategoryTables {
    pub analysts: Vec<CategoryRow>,
    pub supervisors: Vec<CategoryRow>,
    pub teams: Vec<CategoryRow>,
}

impl CategoryTables {
    pub fn compute(
        source: &dyn QuotaSource,
        cases: &[CaseRecord],
        start: NaiveDate,
        today: NaiveDate,
    ) -> Self {
        let end = accrual_end(today);
        let table = |role: Role| {
            categories_for_quota(cases, role, source.per_subject_quota(role, start, end))
        };
        Self {
            analysts: table(Role::Analyst),
            supervisors: table(Role::Supervisor),
            teams: table(Role::Team),
        }
    }

    pub fn for_role(&self, role: Role) -> &[CategoryRow] {
        match role {
            Role::Analyst => &self.analysts,
            Role::Supervisor => &self.supervisors,
            Role::Team => &self.teams,
        }
    }
}

fn lookup(rows: &[CategoryRow]) -> HashMap<String, DelayCategory> {
    rows.iter()
        .filter_map(|row| subject_key(&row.subject).map(|key| (key, row.category)))
        .collect()
}

pub fn filter_by_cross_category(
    cases: &[CaseRecord],
    selection: CategorySelection,
    tables: &CategoryTables,
) -> Vec<CaseRecord> {
    let CategorySelection::Only(target) = selection else {
        return cases.to_vec();
    };

    let lookups: Vec<(Role, HashMap<String, DelayCategory>)> = PRECEDENCE
        .iter()
        .map(|role| (*role, lookup(tables.for_role(*role))))
        .collect();

    let kept: Vec<CaseRecord> = cases
        .iter()
        .filter(|case| effective_category(case, &lookups) == Some(target))
        .cloned()
        .collect();
    debug!(category = %target, before = cases.len(), after = kept.len(), "cross-category filter");
    kept
}

/// Cases in scope for the dashboard views. Attribute filters narrow the rows
/// first; a category selection is then judged on categories computed from
/// those narrowed rows, not from the whole sheet.
pub fn scoped_cases(
    source: &dyn QuotaSource,
    cases: &[CaseRecord],
    filter: &RecordFilter,
    selection: CategorySelection,
    start: NaiveDate,
    today: NaiveDate,
) -> Vec<CaseRecord> {
    let filtered = filter.apply(cases);
    if selection == CategorySelection::All {
        return filtered;
    }
    let tables = CategoryTables::compute(source, &filtered, start, today);
    filter_by_cross_category(&filtered, selection, &tables)
}

fn effective_category(
    case: &CaseRecord,
    lookups: &[(Role, HashMap<String, DelayCategory>)],
) -> Option<DelayCategory> {
    lookups.iter().find_map(|(role, categories)| {
        subject_key(case.subject(role.config().subject_column))
            .and_then(|key| categories.get(&key).copied())
    })
}
