use crate::models::{CaseRecord, State};

/// Exact-match attribute filters applied before any classification. `None`
/// leaves a column unconstrained.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecordFilter {
    pub analyst: Option<String>,
    pub supervisor: Option<String>,
    pub professional: Option<String>,
    pub level: Option<String>,
    pub state: Option<String>,
}

/// Maps the "All" sentinel to no constraint. An empty state selection is
/// meaningful (unassigned cases), so only the sentinel is dropped.
pub fn selection(value: Option<&str>) -> Option<String> {
    let value = value?.trim();
    if value.eq_ignore_ascii_case("all") || value.eq_ignore_ascii_case("todos") {
        None
    } else {
        Some(value.to_string())
    }
}

impl RecordFilter {
    pub fn is_empty(&self) -> bool {
        *self == RecordFilter::default()
    }

    pub fn matches(&self, case: &CaseRecord) -> bool {
        let exact = |wanted: &Option<String>, actual: &str| {
            wanted.as_deref().map_or(true, |wanted| wanted == actual.trim())
        };

        let state_ok = match self.state.as_deref() {
            None => true,
            Some(wanted) => match (State::parse(wanted), case.parsed_state()) {
                (Some(wanted), Some(actual)) => wanted == actual,
                _ => wanted.trim().eq_ignore_ascii_case(case.state.trim()),
            },
        };

        exact(&self.analyst, &case.analyst)
            && exact(&self.supervisor, &case.supervisor)
            && exact(&self.professional, &case.professional)
            && exact(&self.level, &case.level)
            && state_ok
    }

    pub fn apply(&self, cases: &[CaseRecord]) -> Vec<CaseRecord> {
        if self.is_empty() {
            return cases.to_vec();
        }
        cases.iter().filter(|case| self.matches(case)).cloned().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn case(analyst: &str, state: &str, level: &str) -> CaseRecord {
        CaseRecord {
            analyst: analyst.to_string(),
            state: state.to_string(),
            level: level.to_string(),
            ..CaseRecord::default()
        }
    }

    #[test]
    fn sentinel_means_unconstrained() {
        assert_eq!(selection(Some("Todos")), None);
        assert_eq!(selection(Some("All")), None);
        assert_eq!(selection(None), None);
        assert_eq!(selection(Some(" Ana ")), Some("Ana".to_string()));
        assert_eq!(selection(Some("")), Some(String::new()));
    }

    #[test]
    fn empty_filter_keeps_everything() {
        let cases = vec![case("Ana", "", "1"), case("Pedro", "auditada", "2")];
        assert_eq!(RecordFilter::default().apply(&cases), cases);
    }

    #[test]
    fn filters_combine() {
        let cases = vec![
            case("Ana", "Auditada", "Profesional"),
            case("Ana", "asignada", "Profesional"),
            case("Pedro", "auditada", "Profesional"),
            case("Ana", "auditada", "Técnico"),
        ];
        let filter = RecordFilter {
            analyst: Some("Ana".to_string()),
            state: Some("auditada".to_string()),
            level: Some("Profesional".to_string()),
            ..RecordFilter::default()
        };
        assert_eq!(filter.apply(&cases), vec![cases[0].clone()]);
    }

    #[test]
    fn empty_state_selects_unassigned() {
        let cases = vec![case("Ana", "", ""), case("Ana", "asignada", "")];
        let filter = RecordFilter {
            state: Some(String::new()),
            ..RecordFilter::default()
        };
        assert_eq!(filter.apply(&cases), vec![cases[0].clone()]);
    }
}
