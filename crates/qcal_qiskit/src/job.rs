//! IBM Quantum job metadata
//!
//! Gantree: L4_Qiskit → Job
//!
//! Read-only view of past jobs: listing entries, per-experiment results,
//! and the `JobHandle` adapter used by job metadata extraction.

use crate::client::IbmClient;
use chrono::{DateTime, Utc};
use qcal_core::{ExperimentResult, JobOutput, QcalError, QcalResult};
use qcal_history::JobHandle;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tokio::runtime::Handle;

/// Job status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum JobStatus {
    /// Job is queued
    #[serde(
        alias = "queued",
        alias = "Queued",
        alias = "PENDING",
        alias = "pending"
    )]
    Queued,

    /// Job is validating
    #[serde(alias = "validating", alias = "Validating")]
    Validating,

    /// Job is running
    #[serde(alias = "running", alias = "Running")]
    Running,

    /// Job completed successfully
    #[serde(
        alias = "completed",
        alias = "Completed",
        alias = "DONE",
        alias = "done"
    )]
    Completed,

    /// Job failed
    #[serde(alias = "failed", alias = "Failed", alias = "ERROR", alias = "error")]
    Failed,

    /// Job was cancelled
    #[serde(
        alias = "cancelled",
        alias = "Cancelled",
        alias = "CANCELED",
        alias = "canceled"
    )]
    Cancelled,

    /// Unknown status
    #[serde(other)]
    Unknown,
}

impl JobStatus {
    /// Parse a free-form status label
    pub fn from_label(label: &str) -> Self {
        match label.to_uppercase().as_str() {
            "QUEUED" | "PENDING" => Self::Queued,
            "VALIDATING" => Self::Validating,
            "RUNNING" => Self::Running,
            "COMPLETED" | "DONE" => Self::Completed,
            "FAILED" | "ERROR" => Self::Failed,
            "CANCELLED" | "CANCELED" => Self::Cancelled,
            _ => Self::Unknown,
        }
    }

    /// Check if job is in terminal state
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Completed | Self::Failed | Self::Cancelled)
    }

    /// Check if job is still running
    pub fn is_running(&self) -> bool {
        matches!(self, Self::Queued | Self::Validating | Self::Running)
    }

    /// Check if results may be requested
    pub fn has_results(&self) -> bool {
        matches!(self, Self::Completed | Self::Unknown)
    }
}

/// Job listing entry
/// Gantree: JobInfo // 작업 목록 항목
#[derive(Debug, Clone, Default, Deserialize)]
pub struct JobInfo {
    /// Job ID
    #[serde(default)]
    pub id: Option<String>,

    /// Backend
    #[serde(default)]
    pub backend: Option<String>,

    /// Status (legacy field)
    #[serde(default)]
    pub status: Option<JobStatus>,

    /// State (current field)
    #[serde(default)]
    pub state: Option<JobState>,

    /// Creation time (RFC 3339)
    #[serde(default)]
    pub created: Option<String>,

    /// Error details
    #[serde(default)]
    pub error: Option<JobErrorInfo>,
}

/// Job state
#[derive(Debug, Clone, Deserialize)]
pub struct JobState {
    /// Status string
    pub status: Option<String>,
    /// Reason
    pub reason: Option<String>,
}

/// Job error information
#[derive(Debug, Clone, Deserialize)]
pub struct JobErrorInfo {
    /// Error message
    pub message: Option<String>,

    /// Error code
    pub code: Option<i32>,
}

impl JobInfo {
    /// Status from `status`, else `state.status`
    pub fn effective_status(&self) -> JobStatus {
        if let Some(status) = self.status {
            return status;
        }

        self.state
            .as_ref()
            .and_then(|state| state.status.as_deref())
            .map(JobStatus::from_label)
            .unwrap_or(JobStatus::Unknown)
    }

    /// Parsed creation time
    pub fn created_at(&self) -> Option<DateTime<Utc>> {
        self.created
            .as_deref()
            .and_then(|s| DateTime::parse_from_rfc3339(s).ok())
            .map(|d| d.with_timezone(&Utc))
    }
}

/// Jobs list response
#[derive(Debug, Deserialize)]
pub(crate) struct JobsListResponse {
    #[serde(default)]
    pub(crate) jobs: Vec<JobInfo>,
}

/// Per-experiment job results
/// Gantree: JobResults // 작업 결과
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct JobResults {
    /// Job ID
    #[serde(default)]
    pub job_id: Option<String>,

    /// One entry per experiment, decoded individually
    #[serde(default)]
    pub results: Vec<Value>,
}

/// Single experiment result
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ExperimentPayload {
    /// Experiment header (n_qubits, duration, ...)
    #[serde(default)]
    pub header: Map<String, Value>,

    /// Shots executed
    #[serde(default)]
    pub shots: Option<u64>,

    /// Status label
    #[serde(default)]
    pub status: Option<String>,

    /// Success flag
    #[serde(default)]
    pub success: Option<bool>,
}

impl ExperimentPayload {
    /// Status label, derived from `success` when no label is present
    pub fn status_label(&self) -> Option<String> {
        self.status.clone().or_else(|| {
            self.success
                .map(|ok| if ok { "DONE" } else { "ERROR" }.to_string())
        })
    }
}

impl From<ExperimentPayload> for ExperimentResult {
    fn from(payload: ExperimentPayload) -> Self {
        let mut result = ExperimentResult::new(payload.shots, None);
        result.status = payload.status_label();
        result.header = payload.header;
        result
    }
}

impl From<JobResults> for JobOutput {
    fn from(results: JobResults) -> Self {
        JobOutput {
            results: results
                .results
                .into_iter()
                .enumerate()
                .map(|(index, value)| {
                    match serde_json::from_value::<ExperimentPayload>(value) {
                        Ok(payload) => payload.into(),
                        Err(e) => ExperimentResult::undecodable(format!("experiment {}: {}", index, e)),
                    }
                })
                .collect(),
        }
    }
}

// ============================================================================
// Job Handle
// ============================================================================

/// IBM Quantum job handle
///
/// Result download blocks on the runtime of the backend that listed the
/// job; the handle is valid while that backend is alive.
/// Gantree: IbmJob // 작업 핸들
pub struct IbmJob {
    info: JobInfo,
    client: IbmClient,
    runtime: Handle,
}

impl IbmJob {
    /// Create job handle from a listing entry
    pub(crate) fn new(info: JobInfo, client: IbmClient, runtime: Handle) -> Self {
        Self {
            info,
            client,
            runtime,
        }
    }

    /// Listing entry
    pub fn info(&self) -> &JobInfo {
        &self.info
    }

    /// Current status
    pub fn status(&self) -> JobStatus {
        self.info.effective_status()
    }

    fn id(&self) -> QcalResult<&str> {
        self.info
            .id
            .as_deref()
            .ok_or_else(|| QcalError::JobMetadata("job without id".into()))
    }
}

impl JobHandle for IbmJob {
    fn job_id(&self) -> QcalResult<String> {
        self.id().map(str::to_string)
    }

    fn creation_date(&self) -> QcalResult<DateTime<Utc>> {
        self.info.created_at().ok_or_else(|| {
            QcalError::JobMetadata(format!(
                "{}: missing or unreadable creation date {:?}",
                self.info.id.as_deref().unwrap_or("?"),
                self.info.created
            ))
        })
    }

    fn backend_name(&self) -> QcalResult<String> {
        self.info.backend.clone().ok_or_else(|| {
            QcalError::JobMetadata(format!(
                "{}: missing backend",
                self.info.id.as_deref().unwrap_or("?")
            ))
        })
    }

    fn result(&self) -> QcalResult<JobOutput> {
        let id = self.id()?;
        let status = self.status();
        if !status.has_results() {
            return Err(QcalError::JobMetadata(format!(
                "{}: no results in status {:?}",
                id, status
            )));
        }

        let results = self
            .runtime
            .block_on(self.client.get_job_results(id))
            .map_err(|e| QcalError::JobMetadata(format!("{}: {}", id, e)))?;
        Ok(results.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_job_status_terminal() {
        assert!(JobStatus::Completed.is_terminal());
        assert!(JobStatus::Failed.is_terminal());
        assert!(!JobStatus::Running.is_terminal());
        assert!(JobStatus::Queued.is_running());
    }

    #[test]
    fn test_has_results() {
        assert!(JobStatus::Completed.has_results());
        assert!(JobStatus::Unknown.has_results());
        assert!(!JobStatus::Failed.has_results());
        assert!(!JobStatus::Running.has_results());
    }

    #[test]
    fn test_job_list_deserialize() {
        let json = r#"{
            "jobs": [
                {
                    "id": "d1abc",
                    "backend": "ibm_sherbrooke",
                    "state": {"status": "Completed"},
                    "created": "2025-06-01T09:30:00.123Z"
                },
                {"id": "d1def", "status": "ERROR"},
                {"backend": "ibm_sherbrooke"}
            ]
        }"#;

        let list: JobsListResponse = serde_json::from_str(json).unwrap();
        assert_eq!(list.jobs.len(), 3);

        let first = &list.jobs[0];
        assert_eq!(first.effective_status(), JobStatus::Completed);
        assert_eq!(
            first.created_at().unwrap().timestamp(),
            Utc.with_ymd_and_hms(2025, 6, 1, 9, 30, 0).unwrap().timestamp()
        );

        assert_eq!(list.jobs[1].effective_status(), JobStatus::Failed);
        assert!(list.jobs[1].created_at().is_none());

        assert!(list.jobs[2].id.is_none());
        assert_eq!(list.jobs[2].effective_status(), JobStatus::Unknown);
    }

    #[test]
    fn test_results_into_output() {
        let json = r#"{
            "job_id": "d1abc",
            "results": [
                {"header": {"n_qubits": 3, "duration": 0.42}, "shots": 4000, "success": true},
                {"header": {"n_qubits": 2}, "shots": 1024, "status": "DONE"},
                {"success": false}
            ]
        }"#;

        let results: JobResults = serde_json::from_str(json).unwrap();
        let output: JobOutput = results.into();

        assert_eq!(output.results.len(), 3);
        assert_eq!(output.results[0].qubit_count().unwrap(), Some(3));
        assert_eq!(output.results[0].duration().unwrap(), Some(0.42));
        assert_eq!(output.results[0].status.as_deref(), Some("DONE"));
        assert_eq!(output.results[1].shots, Some(1024));
        assert_eq!(output.results[2].status.as_deref(), Some("ERROR"));
        assert!(output.results[2].shots.is_none());
        assert!(output.results.iter().all(|r| r.ensure_decoded().is_ok()));
    }

    #[test]
    fn test_bad_experiment_isolated() {
        let json = r#"{
            "results": [
                {"header": {"n_qubits": 2, "duration": 0.1}, "shots": 1024, "status": "DONE"},
                {"header": null, "shots": 1024},
                {"header": {"n_qubits": 5}, "shots": [0, 1024]}
            ]
        }"#;

        let results: JobResults = serde_json::from_str(json).unwrap();
        let output: JobOutput = results.into();

        assert_eq!(output.results.len(), 3);
        assert!(output.results[0].ensure_decoded().is_ok());
        assert_eq!(output.results[0].qubit_count().unwrap(), Some(2));
        assert!(matches!(
            output.results[1].ensure_decoded(),
            Err(QcalError::ExperimentMalformed(reason)) if reason.starts_with("experiment 1")
        ));
        assert!(output.results[2].ensure_decoded().is_err());
    }
}
