//! DTOs for REST API requests/responses.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::audit::RosterIssue;
use crate::config::ScheduleConfig;
use crate::result::ScheduleResult;

/// A finished scheduling run kept by the server until deleted.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleJobDto {
    pub id: String,
    pub created_at: DateTime<Utc>,
    pub config: ScheduleConfig,
    /// Whether the result has been written into the roster.
    pub applied: bool,
    pub summary: String,
    pub result: ScheduleResult,
}

impl ScheduleJobDto {
    pub fn new(id: String, config: ScheduleConfig, result: ScheduleResult) -> Self {
        Self {
            id,
            created_at: Utc::now(),
            config,
            applied: false,
            summary: result.summary(),
            result,
        }
    }
}

/// One row of `GET /schedules`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleListItemDto {
    pub id: String,
    pub created_at: DateTime<Utc>,
    pub applied: bool,
    pub assigned_shifts: usize,
    pub unassigned_shifts: usize,
    pub total_score: f64,
}

impl From<&ScheduleJobDto> for ScheduleListItemDto {
    fn from(job: &ScheduleJobDto) -> Self {
        Self {
            id: job.id.clone(),
            created_at: job.created_at,
            applied: job.applied,
            assigned_shifts: job.result.metrics.assigned_shifts,
            unassigned_shifts: job.result.metrics.unassigned_shifts,
            total_score: job.result.total_score(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApplyResponse {
    pub applied: usize,
    pub message: String,
}

impl ApplyResponse {
    pub fn new(applied: usize) -> Self {
        Self {
            applied,
            message: format!("Successfully applied {} shift assignments.", applied),
        }
    }
}

/// Query string of `GET /roster/audit`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuditQuery {
    pub min_rest_hours: Option<u32>,
    pub reference_year: Option<i32>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuditResponse {
    pub issue_count: usize,
    pub issues: Vec<RosterIssue>,
}

impl From<Vec<RosterIssue>> for AuditResponse {
    fn from(issues: Vec<RosterIssue>) -> Self {
        Self {
            issue_count: issues.len(),
            issues,
        }
    }
}

/// Body of every error response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}
