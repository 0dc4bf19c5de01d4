use std::fmt::Write;

use chrono::NaiveDate;

use crate::aggregate::{self, category_counts, summary_table};
use crate::calendar::accrual_end;
use crate::models::{CaseRecord, Role, RoleOverview, SummaryRow};
use crate::quota::QuotaSource;

/// Thousands separated with dots, as the dashboards display them.
pub fn format_count(value: i64) -> String {
    let digits = value.unsigned_abs().to_string();
    let mut grouped = String::new();
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push('.');
        }
        grouped.push(ch);
    }
    if value < 0 {
        format!("-{grouped}")
    } else {
        grouped
    }
}

pub struct RoleSection {
    pub overview: RoleOverview,
    pub rows: Vec<SummaryRow>,
}

pub fn role_section(
    source: &dyn QuotaSource,
    cases: &[CaseRecord],
    role: Role,
    start: NaiveDate,
    today: NaiveDate,
) -> RoleSection {
    let overview = aggregate::role_overview(source, cases, role, start, today);
    let per_subject = source.per_subject_quota(role, start, accrual_end(today));
    RoleSection {
        overview,
        rows: summary_table(cases, role, per_subject),
    }
}

pub fn write_role_section(output: &mut String, section: &RoleSection) {
    let overview = &section.overview;
    let _ = writeln!(output, "## {}", overview.role);
    let _ = writeln!(
        output,
        "Team: {}, business days considered: {}",
        format_count(overview.subjects as i64),
        overview.business_days
    );
    let _ = writeln!(output);
    let _ = writeln!(output, "- Total cases: {}", format_count(overview.total_cases as i64));
    let _ = writeln!(output, "- Completed: {}", format_count(overview.completed));
    let _ = writeln!(output, "- Quota to date: {}", format_count(overview.quota_total));
    let _ = writeln!(output, "- Difference: {}", format_count(overview.difference));
    let _ = writeln!(output);

    if section.rows.is_empty() {
        let _ = writeln!(output, "No data to display.");
        let _ = writeln!(output);
        return;
    }

    let _ = writeln!(output, "### Subjects per category");
    for (category, count) in category_counts(&section.rows) {
        let _ = writeln!(output, "- {category}: {count}");
    }
    let _ = writeln!(output);

    let _ = writeln!(output, "### Summary");
    let _ = writeln!(
        output,
        "| Category | Subject | Unassigned | Assigned | Returned | Qualified | Approved | Audited | Completed | Quota | Backlog |"
    );
    let _ = writeln!(output, "|---|---|---|---|---|---|---|---|---|---|---|");
    for row in &section.rows {
        let counts = &row.state_counts;
        let _ = writeln!(
            output,
            "| {} | {} | {} | {} | {} | {} | {} | {} | {} | {} | {} |",
            row.category,
            row.subject,
            counts.unassigned,
            counts.assigned,
            counts.returned,
            counts.qualified,
            counts.approved,
            counts.audited,
            row.completed,
            row.quota,
            row.backlog
        );
    }
    let _ = writeln!(output);
}

pub fn build_report(
    source: &dyn QuotaSource,
    cases: &[CaseRecord],
    start: NaiveDate,
    today: NaiveDate,
    scope: Option<&str>,
) -> String {
    let program = aggregate::program_overview(cases, start, today);
    let shares = aggregate::state_distribution(cases);

    let mut output = String::new();
    let _ = writeln!(output, "# Review Quota Report");
    let _ = writeln!(
        output,
        "Generated for {} on {} (quotas accrue from {} through {})",
        scope.unwrap_or("all cases"),
        today,
        start,
        accrual_end(today)
    );
    let _ = writeln!(output);
    let _ = writeln!(output, "## Overview");
    let _ = writeln!(output, "- Business days considered: {}", program.business_days);
    let _ = writeln!(output, "- Total cases: {}", format_count(program.total_cases as i64));
    let _ = writeln!(output, "- Audited: {}", format_count(program.audited as i64));
    let _ = writeln!(output, "- Review team: {}", format_count(program.team_size as i64));
    let _ = writeln!(output, "- Unassigned: {}", format_count(program.unassigned as i64));
    let _ = writeln!(
        output,
        "- Progress: {} of {}",
        format_count(program.progressed as i64),
        format_count(program.total_cases as i64)
    );
    let _ = writeln!(output);
    let _ = writeln!(output, "## State Mix");

    if cases.is_empty() {
        let _ = writeln!(output, "No data to display.");
    } else {
        for share in &shares {
            let _ = writeln!(
                output,
                "- {}: {} ({:.1}%)",
                share.state.display_label(),
                format_count(share.count as i64),
                share.percent
            );
        }
    }
    let _ = writeln!(output);

    for role in Role::ALL {
        let section = role_section(source, cases, role, start, today);
        write_role_section(&mut output, &section);
    }

    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::quota::FixedQuota;

    fn case(analyst: &str, supervisor: &str, state: &str) -> CaseRecord {
        CaseRecord {
            analyst: analyst.to_string(),
            supervisor: supervisor.to_string(),
            state: state.to_string(),
            ..CaseRecord::default()
        }
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn counts_use_dot_grouping() {
        assert_eq!(format_count(0), "0");
        assert_eq!(format_count(999), "999");
        assert_eq!(format_count(1000), "1.000");
        assert_eq!(format_count(1234567), "1.234.567");
        assert_eq!(format_count(-4080), "-4.080");
    }

    #[test]
    fn report_covers_every_role() {
        let cases = vec![
            case("Ana", "Luis", "auditada"),
            case("Pedro", "Luis", "asignada"),
            case("", "", ""),
        ];
        let report = build_report(&FixedQuota, &cases, date(2025, 9, 16), date(2025, 9, 30), None);
        assert!(report.contains("# Review Quota Report"));
        assert!(report.contains("- Business days considered: 10"));
        assert!(report.contains("## Analysts"));
        assert!(report.contains("## Supervisors"));
        assert!(report.contains("## Teams"));
        assert!(report.contains("| High delay | Pedro |"));
        // No auditors in the sheet.
        assert!(report.contains("No data to display."));
    }

    #[test]
    fn empty_sheet_still_renders() {
        let report = build_report(&FixedQuota, &[], date(2025, 9, 16), date(2025, 9, 30), Some("Equipo 1"));
        assert!(report.contains("Generated for Equipo 1"));
        assert!(report.contains("- Total cases: 0"));
        assert!(!report.contains("| Category |"));
    }
}
