//! Incident / intervention lifecycle vocabulary.
//!
//! Incidents move `open -> in_progress -> resolved` (or `open -> cancelled`);
//! interventions move `in_progress -> terminated` (or `suspended`). The
//! admin console speaks a "priority" vocabulary that is a pure presentation
//! synonym for severity -- only severity is stored.

use chrono::TimeDelta;
use serde::{Deserialize, Serialize};

/// Fault severity. Stored as the `incident_severity` PostgreSQL enum.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "incident_severity", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum IncidentSeverity {
    Minor,
    Moderate,
    Critical,
    Urgent,
}

/// Incident lifecycle state. Stored as the `incident_state` PostgreSQL enum.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "incident_state", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum IncidentState {
    Open,
    InProgress,
    Resolved,
    Cancelled,
}

impl IncidentState {
    pub fn is_closed(&self) -> bool {
        matches!(self, IncidentState::Resolved | IncidentState::Cancelled)
    }
}

/// Intervention status. Stored as the `intervention_status` PostgreSQL enum.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "intervention_status", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum InterventionStatus {
    InProgress,
    Terminated,
    Suspended,
}

/// Admin-facing priority names, mapped to severity at the API boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Priority {
    Low,
    Medium,
    High,
    Urgent,
}

impl Priority {
    pub fn to_severity(self) -> IncidentSeverity {
        match self {
            Priority::Low => IncidentSeverity::Minor,
            Priority::Medium => IncidentSeverity::Moderate,
            Priority::High => IncidentSeverity::Critical,
            Priority::Urgent => IncidentSeverity::Urgent,
        }
    }

    pub fn from_severity(severity: IncidentSeverity) -> Self {
        match severity {
            IncidentSeverity::Minor => Priority::Low,
            IncidentSeverity::Moderate => Priority::Medium,
            IncidentSeverity::Critical => Priority::High,
            IncidentSeverity::Urgent => Priority::Urgent,
        }
    }
}

/// Elapsed hours rounded to one decimal, the unit used for intervention
/// durations and incident resolution times.
pub fn elapsed_hours(delta: TimeDelta) -> f64 {
    let hours = delta.num_seconds() as f64 / 3600.0;
    (hours * 10.0).round() / 10.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn priority_severity_round_trip() {
        for p in [Priority::Low, Priority::Medium, Priority::High, Priority::Urgent] {
            assert_eq!(Priority::from_severity(p.to_severity()), p);
        }
    }

    #[test]
    fn hours_round_to_one_decimal() {
        assert_eq!(elapsed_hours(TimeDelta::minutes(90)), 1.5);
        assert_eq!(elapsed_hours(TimeDelta::minutes(100)), 1.7);
        assert_eq!(elapsed_hours(TimeDelta::seconds(0)), 0.0);
    }

    #[test]
    fn closed_states() {
        assert!(IncidentState::Resolved.is_closed());
        assert!(IncidentState::Cancelled.is_closed());
        assert!(!IncidentState::InProgress.is_closed());
    }
}
