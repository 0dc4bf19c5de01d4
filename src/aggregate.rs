use std::collections::{BTreeMap, BTreeSet};

use chrono::NaiveDate;
use tracing::debug;

use crate::calendar::{accrual_end, elapsed_business_days};
use crate::models::{
    subject_key, CaseRecord, DelayCategory, ProgramOverview, Role, RoleOverview, State,
    StateCounts, StateShare, SummaryRow,
};
use crate::quota::{accumulated_quota_with, QuotaSource};
use crate::risk;

/// Completed cases per normalized subject. Subjects with nothing completed
/// are absent rather than zero.
pub fn completed_per_subject(cases: &[CaseRecord], role: Role) -> BTreeMap<String, usize> {
    let column = role.config().subject_column;
    let mut completed: BTreeMap<String, usize> = BTreeMap::new();

    for case in cases {
        let done = case
            .parsed_state()
            .is_some_and(|state| role.counts_as_completed(state));
        if !done {
            continue;
        }
        if let Some(key) = subject_key(case.subject(column)) {
            *completed.entry(key).or_insert(0) += 1;
        }
    }

    completed
}

/// State pivot per subject with completion, backlog and delay category.
/// Rows are ordered by category, best first, then by subject.
pub fn summary_table(cases: &[CaseRecord], role: Role, per_subject_quota: i64) -> Vec<SummaryRow> {
    let config = role.config();
    let mut pivot: BTreeMap<String, (String, StateCounts)> = BTreeMap::new();

    for case in cases {
        let raw = case.subject(config.subject_column);
        let Some(key) = subject_key(raw) else {
            continue;
        };
        let entry = pivot
            .entry(key)
            .or_insert_with(|| (raw.trim().to_string(), StateCounts::default()));
        if let Some(state) = case.parsed_state() {
            entry.1.increment(state);
        }
    }

    let mut rows: Vec<SummaryRow> = pivot
        .into_values()
        .map(|(subject, state_counts)| {
            let completed: i64 = config
                .valid_states
                .iter()
                .map(|state| state_counts.get(*state))
                .sum();
            let backlog = risk::backlog(per_subject_quota, completed);
            SummaryRow {
                subject,
                state_counts,
                completed,
                quota: per_subject_quota,
                backlog,
                category: risk::classify(backlog, role),
            }
        })
        .collect();

    // Stable: subjects stay in key order within a category.
    rows.sort_by_key(|row| row.category);
    debug!(role = %role, subjects = rows.len(), "summary table");
    rows
}

pub fn category_counts(rows: &[SummaryRow]) -> Vec<(DelayCategory, usize)> {
    DelayCategory::ALL
        .iter()
        .map(|category| {
            let count = rows.iter().filter(|row| row.category == *category).count();
            (*category, count)
        })
        .collect()
}

const DISTRIBUTION_ORDER: [State; 6] = [
    State::Assigned,
    State::Returned,
    State::Qualified,
    State::Approved,
    State::Audited,
    State::Unassigned,
];

pub fn state_distribution(cases: &[CaseRecord]) -> Vec<StateShare> {
    let mut counts = StateCounts::default();
    for case in cases {
        if let Some(state) = case.parsed_state() {
            counts.increment(state);
        }
    }

    let total: i64 = State::ALL.iter().map(|state| counts.get(*state)).sum();
    DISTRIBUTION_ORDER
        .iter()
        .map(|state| {
            let count = counts.get(*state);
            let percent = if total == 0 {
                0.0
            } else {
                (count as f64 / total as f64 * 1000.0).round() / 10.0
            };
            StateShare {
                state: *state,
                count: count as usize,
                percent,
            }
        })
        .collect()
}

pub fn role_overview(
    source: &dyn QuotaSource,
    cases: &[CaseRecord],
    role: Role,
    start: NaiveDate,
    today: NaiveDate,
) -> RoleOverview {
    let snapshot = accumulated_quota_with(source, role, cases, start, today);
    let completed = cases
        .iter()
        .filter(|case| {
            case.parsed_state()
                .is_some_and(|state| role.counts_as_completed(state))
        })
        .count() as i64;

    RoleOverview {
        role,
        business_days: elapsed_business_days(start, today),
        total_cases: cases.len(),
        completed,
        quota_total: snapshot.total,
        subjects: snapshot.subjects,
        per_subject_quota: source.per_subject_quota(role, start, accrual_end(today)),
        difference: completed.saturating_sub(snapshot.total),
    }
}

pub fn program_overview(cases: &[CaseRecord], start: NaiveDate, today: NaiveDate) -> ProgramOverview {
    let analysts: BTreeSet<String> = cases.iter().filter_map(|c| subject_key(&c.analyst)).collect();
    let supervisors: BTreeSet<String> =
        cases.iter().filter_map(|c| subject_key(&c.supervisor)).collect();

    let mut audited = 0usize;
    let mut unassigned = 0usize;
    let mut progressed = 0usize;
    for case in cases {
        match case.parsed_state() {
            Some(State::Audited) => audited += 1,
            Some(State::Unassigned) => unassigned += 1,
            _ => {}
        }
        if case
            .parsed_state()
            .is_some_and(|state| Role::Analyst.counts_as_completed(state))
        {
            progressed += 1;
        }
    }

    ProgramOverview {
        business_days: elapsed_business_days(start, today),
        total_cases: cases.len(),
        audited,
        team_size: analysts.len() + supervisors.len(),
        unassigned,
        progressed,
    }
}
