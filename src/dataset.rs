use std::io::Read;
use std::path::Path;

use chrono::NaiveDate;
use csv::StringRecord;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::TrackerResult;
use crate::models::CaseRecord;
use crate::quota::{parse_quota_cell, DailyQuotas, ScheduleQuota};

/// Source column names for each case field. Headers match case-insensitively.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ColumnMap {
    pub state: String,
    pub analyst: String,
    pub supervisor: String,
    pub auditor: String,
    pub team: String,
    pub professional: String,
    pub level: String,
}

impl Default for ColumnMap {
    fn default() -> Self {
        Self {
            state: "estado_carpeta".into(),
            analyst: "analista".into(),
            supervisor: "supervisor".into(),
            auditor: "auditor".into(),
            team: "EQUIPO".into(),
            professional: "profesional".into(),
            level: "nivel".into(),
        }
    }
}

fn column_index(headers: &StringRecord, name: &str) -> Option<usize> {
    headers
        .iter()
        .position(|header| header.trim().eq_ignore_ascii_case(name.trim()))
}

fn first_column(headers: &StringRecord, names: &[&str]) -> Option<usize> {
    names.iter().find_map(|name| column_index(headers, name))
}

fn field(record: &StringRecord, index: Option<usize>) -> String {
    index
        .and_then(|i| record.get(i))
        .unwrap_or("")
        .trim()
        .to_string()
}

pub fn load_cases(path: &Path, columns: &ColumnMap) -> TrackerResult<Vec<CaseRecord>> {
    let file = std::fs::File::open(path)?;
    read_cases(file, columns)
}

/// Reads case rows from CSV. A configured column missing from the header is
/// read as empty on every row.
pub fn read_cases<R: Read>(source: R, columns: &ColumnMap) -> TrackerResult<Vec<CaseRecord>> {
    let mut reader = csv::ReaderBuilder::new().flexible(true).from_reader(source);
    let headers = reader.headers()?.clone();

    let locate = |name: &str| {
        let index = column_index(&headers, name);
        if index.is_none() {
            warn!(column = name, "column missing from case sheet; treating as empty");
        }
        index
    };
    let state = locate(&columns.state);
    let analyst = locate(&columns.analyst);
    let supervisor = locate(&columns.supervisor);
    let auditor = locate(&columns.auditor);
    let team = locate(&columns.team);
    let professional = locate(&columns.professional);
    let level = locate(&columns.level);

    let mut cases = Vec::new();
    for result in reader.records() {
        let record = result?;
        cases.push(CaseRecord {
            analyst: field(&record, analyst),
            supervisor: field(&record, supervisor),
            auditor: field(&record, auditor),
            team: field(&record, team),
            state: field(&record, state),
            professional: field(&record, professional),
            level: field(&record, level),
        });
    }

    debug!(rows = cases.len(), "loaded case sheet");
    Ok(cases)
}

pub fn load_schedule(path: &Path) -> TrackerResult<ScheduleQuota> {
    let file = std::fs::File::open(path)?;
    read_schedule(file)
}

fn parse_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    ["%Y-%m-%d", "%d/%m/%Y", "%Y/%m/%d"]
        .iter()
        .find_map(|format| NaiveDate::parse_from_str(raw, format).ok())
}

/// Reads a quota sheet with a date column (`fecha` or `date`) and one
/// column per role. Rows with unreadable dates are skipped; unreadable
/// quota cells count as zero.
pub fn read_schedule<R: Read>(source: R) -> TrackerResult<ScheduleQuota> {
    let mut reader = csv::ReaderBuilder::new().flexible(true).from_reader(source);
    let headers = reader.headers()?.clone();

    let date = first_column(&headers, &["fecha", "date"]);
    let analyst = first_column(&headers, &["analistas", "analysts", "analista"]);
    let supervisor = first_column(&headers, &["supervisores", "supervisors", "supervisor"]);
    let team = first_column(&headers, &["equipos", "teams", "equipo"]);

    let mut schedule = ScheduleQuota::new();
    if date.is_none() {
        warn!("quota sheet has no date column; schedule is empty");
        return Ok(schedule);
    }

    let mut skipped = 0usize;
    for result in reader.records() {
        let record = result?;
        let Some(day) = parse_date(&field(&record, date)) else {
            skipped += 1;
            continue;
        };
        schedule.insert(
            day,
            DailyQuotas {
                analyst: parse_quota_cell(&field(&record, analyst)),
                supervisor: parse_quota_cell(&field(&record, supervisor)),
                team: parse_quota_cell(&field(&record, team)),
            },
        );
    }

    if skipped > 0 {
        warn!(skipped, "quota sheet rows with unreadable dates were skipped");
    }
    debug!(days = schedule.len(), "loaded quota schedule");
    Ok(schedule)
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;
    use crate::models::Role;
    use crate::quota::QuotaSource;

    #[test]
    fn reads_and_trims_case_rows() {
        let csv = "analista,supervisor,auditor,EQUIPO,estado_carpeta,profesional,nivel\n\
                   \" Ana \",Luis,Audit A,Equipo 1,Auditada,Paula,Profesional\n\
                   Pedro,,,,,,\n";
        let cases = read_cases(csv.as_bytes(), &ColumnMap::default()).unwrap();
        assert_eq!(cases.len(), 2);
        assert_eq!(cases[0].analyst, "Ana");
        assert_eq!(cases[0].team, "Equipo 1");
        assert_eq!(cases[0].state, "Auditada");
        assert_eq!(cases[1].state, "");
    }

    #[test]
    fn missing_columns_become_empty() {
        let csv = "analista,Estado_Carpeta,equipo\nAna,asignada,E1\n";
        let cases = read_cases(csv.as_bytes(), &ColumnMap::default()).unwrap();
        assert_eq!(cases.len(), 1);
        assert_eq!(cases[0].state, "asignada");
        assert_eq!(cases[0].team, "E1");
        assert_eq!(cases[0].auditor, "");
        assert_eq!(cases[0].supervisor, "");
    }

    #[test]
    fn custom_column_names_are_honoured() {
        let columns = ColumnMap {
            auditor: "equipo".into(),
            team: "grupo".into(),
            ..ColumnMap::default()
        };
        let csv = "analista,equipo,grupo\nAna,Audit B,G2\n";
        let cases = read_cases(csv.as_bytes(), &columns).unwrap();
        assert_eq!(cases[0].auditor, "Audit B");
        assert_eq!(cases[0].team, "G2");
    }

    #[test]
    fn loads_from_disk() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "analista,estado_carpeta").unwrap();
        writeln!(file, "Ana,calificada").unwrap();
        let cases = load_cases(file.path(), &ColumnMap::default()).unwrap();
        assert_eq!(cases.len(), 1);
        assert!(load_cases(Path::new("/nonexistent/cases.csv"), &ColumnMap::default()).is_err());
    }

    #[test]
    fn schedule_tolerates_dirty_cells() {
        let csv = "fecha,analistas,supervisores,equipos\n\
                   2025-09-16,17,34,34\n\
                   17/09/2025,abc,34.5,\n\
                   someday,99,99,99\n";
        let schedule = read_schedule(csv.as_bytes()).unwrap();
        assert_eq!(schedule.len(), 2);

        let start = NaiveDate::from_ymd_opt(2025, 9, 16).unwrap();
        let end = NaiveDate::from_ymd_opt(2025, 9, 17).unwrap();
        assert_eq!(schedule.per_subject_quota(Role::Analyst, start, end), 17);
        assert_eq!(schedule.per_subject_quota(Role::Supervisor, start, end), 68);
        assert_eq!(schedule.per_subject_quota(Role::Team, start, end), 34);
    }

    #[test]
    fn schedule_without_dates_is_empty() {
        let csv = "analistas\n17\n";
        assert!(read_schedule(csv.as_bytes()).unwrap().is_empty());
    }
}
