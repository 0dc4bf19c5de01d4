use std::fmt;
use std::str::FromStr;

use serde::Serialize;

use crate::error::TrackerError;

/// One case folder as read from the tracking sheet. Every field is a trimmed
/// string; an empty `state` means the case has not been assigned yet.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CaseRecord {
    pub analyst: String,
    pub supervisor: String,
    pub auditor: String,
    pub team: String,
    pub state: String,
    pub professional: String,
    pub level: String,
}

impl CaseRecord {
    pub fn subject(&self, column: SubjectColumn) -> &str {
        match column {
            SubjectColumn::Analyst => &self.analyst,
            SubjectColumn::Supervisor => &self.supervisor,
            SubjectColumn::Auditor => &self.auditor,
        }
    }

    pub fn parsed_state(&self) -> Option<State> {
        State::parse(&self.state)
    }
}

/// Normalized identity of a subject: trimmed and lower-cased. Blank
/// identifiers have no identity and are left out of per-subject work.
pub fn subject_key(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_lowercase())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum State {
    Unassigned,
    Assigned,
    Returned,
    Qualified,
    Approved,
    Audited,
}

impl State {
    pub const ALL: [State; 6] = [
        State::Unassigned,
        State::Assigned,
        State::Returned,
        State::Qualified,
        State::Approved,
        State::Audited,
    ];

    /// Case-insensitive parse of a sheet value. Returns `None` for values
    /// outside the vocabulary; an empty value is `Unassigned`.
    pub fn parse(raw: &str) -> Option<State> {
        match raw.trim().to_lowercase().as_str() {
            "" => Some(State::Unassigned),
            "asignada" | "assigned" => Some(State::Assigned),
            "devuelta" | "returned" => Some(State::Returned),
            "calificada" | "qualified" => Some(State::Qualified),
            "aprobada" | "approved" => Some(State::Approved),
            "auditada" | "audited" => Some(State::Audited),
            _ => None,
        }
    }

    /// Label used on charts, numbered in pipeline order.
    pub fn display_label(self) -> &'static str {
        match self {
            State::Unassigned => "Por asignar",
            State::Assigned => "0. asignada",
            State::Returned => "1. devuelta",
            State::Qualified => "2. calificada",
            State::Approved => "3. aprobada",
            State::Audited => "4. auditada",
        }
    }
}

/// Which case column identifies the party responsible under a role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SubjectColumn {
    Analyst,
    Supervisor,
    Auditor,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Analyst,
    Supervisor,
    Team,
}

#[derive(Debug, Clone, Copy)]
pub struct RoleConfig {
    pub subject_column: SubjectColumn,
    pub per_subject_quota: i64,
    pub valid_states: &'static [State],
}

static ANALYST_STATES: [State; 3] = [State::Qualified, State::Approved, State::Audited];
static SUPERVISOR_STATES: [State; 2] = [State::Approved, State::Audited];
static TEAM_STATES: [State; 1] = [State::Audited];

impl Role {
    pub const ALL: [Role; 3] = [Role::Analyst, Role::Supervisor, Role::Team];

    pub fn config(self) -> RoleConfig {
        match self {
            Role::Analyst => RoleConfig {
                subject_column: SubjectColumn::Analyst,
                per_subject_quota: 17,
                valid_states: &ANALYST_STATES,
            },
            Role::Supervisor => RoleConfig {
                subject_column: SubjectColumn::Supervisor,
                per_subject_quota: 34,
                valid_states: &SUPERVISOR_STATES,
            },
            Role::Team => RoleConfig {
                subject_column: SubjectColumn::Auditor,
                per_subject_quota: 34,
                valid_states: &TEAM_STATES,
            },
        }
    }

    pub fn counts_as_completed(self, state: State) -> bool {
        self.config().valid_states.contains(&state)
    }

    pub fn label(self) -> &'static str {
        match self {
            Role::Analyst => "Analysts",
            Role::Supervisor => "Supervisors",
            Role::Team => "Teams",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Role {
    type Err = TrackerError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_lowercase().as_str() {
            "analyst" | "analysts" | "analista" | "analistas" => Ok(Role::Analyst),
            "supervisor" | "supervisors" | "supervisores" => Ok(Role::Supervisor),
            "team" | "teams" | "equipo" | "equipos" | "audit" => Ok(Role::Team),
            _ => Err(TrackerError::UnknownRole(value.to_string())),
        }
    }
}

/// Delay tiers, ordered from best to worst.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum DelayCategory {
    #[serde(rename = "On-track")]
    OnTrack,
    #[serde(rename = "Normal delay")]
    Normal,
    #[serde(rename = "Medium delay")]
    Medium,
    #[serde(rename = "High delay")]
    High,
}

impl DelayCategory {
    pub const ALL: [DelayCategory; 4] = [
        DelayCategory::OnTrack,
        DelayCategory::Normal,
        DelayCategory::Medium,
        DelayCategory::High,
    ];

    pub fn label(self) -> &'static str {
        match self {
            DelayCategory::OnTrack => "On-track",
            DelayCategory::Normal => "Normal delay",
            DelayCategory::Medium => "Medium delay",
            DelayCategory::High => "High delay",
        }
    }
}

impl fmt::Display for DelayCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for DelayCategory {
    type Err = TrackerError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_lowercase().as_str() {
            "on-track" | "on track" | "ontrack" | "al día" | "al dia" => Ok(DelayCategory::OnTrack),
            "normal delay" | "normal" | "atraso normal" => Ok(DelayCategory::Normal),
            "medium delay" | "medium" | "atraso medio" => Ok(DelayCategory::Medium),
            "high delay" | "high" | "atraso alto" => Ok(DelayCategory::High),
            _ => Err(TrackerError::UnknownCategory(value.to_string())),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct StateCounts {
    pub unassigned: i64,
    pub assigned: i64,
    pub returned: i64,
    pub qualified: i64,
    pub approved: i64,
    pub audited: i64,
}

impl StateCounts {
    pub fn get(&self, state: State) -> i64 {
        match state {
            State::Unassigned => self.unassigned,
            State::Assigned => self.assigned,
            State::Returned => self.returned,
            State::Qualified => self.qualified,
            State::Approved => self.approved,
            State::Audited => self.audited,
        }
    }

    pub fn increment(&mut self, state: State) {
        let slot = match state {
            State::Unassigned => &mut self.unassigned,
            State::Assigned => &mut self.assigned,
            State::Returned => &mut self.returned,
            State::Qualified => &mut self.qualified,
            State::Approved => &mut self.approved,
            State::Audited => &mut self.audited,
        };
        *slot += 1;
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SummaryRow {
    pub subject: String,
    pub state_counts: StateCounts,
    pub completed: i64,
    pub quota: i64,
    pub backlog: i64,
    pub category: DelayCategory,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategoryRow {
    pub subject: String,
    pub category: DelayCategory,
    pub team: String,
    pub role: Role,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StateShare {
    pub state: State,
    pub count: usize,
    pub percent: f64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RoleOverview {
    pub role: Role,
    pub business_days: u32,
    pub total_cases: usize,
    pub completed: i64,
    pub quota_total: i64,
    pub subjects: usize,
    pub per_subject_quota: i64,
    pub difference: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProgramOverview {
    pub business_days: u32,
    pub total_cases: usize,
    pub audited: usize,
    pub team_size: usize,
    pub unassigned: usize,
    pub progressed: usize,
}
