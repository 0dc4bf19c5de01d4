//! Quota accrual per role.
//!
//! A role's quota for one subject grows with every elapsed business day. The
//! daily amount comes from a [`QuotaSource`]: either the fixed constants on
//! [`Role::config`] or a schedule sheet listing quotas per date.

use std::collections::{BTreeMap, BTreeSet};

use chrono::NaiveDate;
use serde::Serialize;
use tracing::debug;

use crate::calendar::{accrual_end, business_days_since, is_business_day};
use crate::models::{subject_key, CaseRecord, Role};

pub trait QuotaSource {
    /// Accumulated quota for one subject of `role` over the business days in
    /// `[start, end]`.
    fn per_subject_quota(&self, role: Role, start: NaiveDate, end: NaiveDate) -> i64;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct FixedQuota;

impl QuotaSource for FixedQuota {
    fn per_subject_quota(&self, role: Role, start: NaiveDate, end: NaiveDate) -> i64 {
        i64::from(business_days_since(start, end)) * role.config().per_subject_quota
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DailyQuotas {
    pub analyst: i64,
    pub supervisor: i64,
    pub team: i64,
}

impl DailyQuotas {
    pub fn for_role(&self, role: Role) -> i64 {
        match role {
            Role::Analyst => self.analyst,
            Role::Supervisor => self.supervisor,
            Role::Team => self.team,
        }
    }
}

/// Per-date quotas read from a secondary sheet. Dates absent from the sheet
/// contribute nothing.
#[derive(Debug, Clone, Default)]
pub struct ScheduleQuota {
    days: BTreeMap<NaiveDate, DailyQuotas>,
}

impl ScheduleQuota {
    pub fn new() -> Self {
        Self::default()
    }

    /// Later entries for the same date replace earlier ones.
    pub fn insert(&mut self, date: NaiveDate, quotas: DailyQuotas) {
        self.days.insert(date, quotas);
    }

    pub fn len(&self) -> usize {
        self.days.len()
    }

    pub fn is_empty(&self) -> bool {
        self.days.is_empty()
    }
}

impl QuotaSource for ScheduleQuota {
    fn per_subject_quota(&self, role: Role, start: NaiveDate, end: NaiveDate) -> i64 {
        if end < start {
            return 0;
        }
        self.days
            .range(start..=end)
            .filter(|(date, _)| is_business_day(**date))
            .map(|(_, quotas)| quotas.for_role(role))
            .fold(0i64, i64::saturating_add)
    }
}

/// Best-effort numeric read of a quota cell. Decimals are truncated, a comma
/// is accepted as decimal separator, and anything unreadable is zero.
pub fn parse_quota_cell(raw: &str) -> i64 {
    let cleaned = raw.trim().replace(' ', "");
    if cleaned.is_empty() {
        return 0;
    }
    if let Ok(value) = cleaned.parse::<i64>() {
        return value;
    }
    match cleaned.replace(',', ".").parse::<f64>() {
        Ok(value) if value.is_finite() => value.trunc() as i64,
        _ => 0,
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct QuotaSnapshot {
    pub total: i64,
    pub subjects: usize,
}

pub fn distinct_subjects(cases: &[CaseRecord], role: Role) -> BTreeSet<String> {
    let column = role.config().subject_column;
    cases
        .iter()
        .filter_map(|case| subject_key(case.subject(column)))
        .collect()
}

pub fn accumulated_quota(
    role: Role,
    cases: &[CaseRecord],
    start: NaiveDate,
    reference: NaiveDate,
) -> QuotaSnapshot {
    accumulated_quota_with(&FixedQuota, role, cases, start, reference)
}

/// Role-wide quota through the day before `reference`, scaled by the number
/// of distinct subjects. Zero on both counts when nothing has accrued.
pub fn accumulated_quota_with(
    source: &dyn QuotaSource,
    role: Role,
    cases: &[CaseRecord],
    start: NaiveDate,
    reference: NaiveDate,
) -> QuotaSnapshot {
    let end = accrual_end(reference);
    if business_days_since(start, end) == 0 {
        return QuotaSnapshot::default();
    }

    let subjects = distinct_subjects(cases, role).len();
    if subjects == 0 {
        return QuotaSnapshot::default();
    }

    let per_subject = source.per_subject_quota(role, start, end);
    let total = per_subject.saturating_mul(i64::try_from(subjects).unwrap_or(i64::MAX));
    debug!(role = %role, subjects, per_subject, total, "accumulated quota");
    QuotaSnapshot { total, subjects }
}
