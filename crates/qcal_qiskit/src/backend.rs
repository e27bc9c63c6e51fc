//! IBM Quantum backend source
//!
//! Gantree: L4_Qiskit → IbmBackend
//!
//! Blocking facade over the async client: implements the snapshot and job
//! source traits so the history walker and job extraction can run against
//! IBM Quantum.

use crate::auth::{AuthError, IbmCredentials};
use crate::client::{BackendProperties, ClientError, IbmClient};
use crate::job::IbmJob;
use anyhow::Context;
use chrono::{DateTime, SecondsFormat, Utc};
use qcal_core::{CalibrationSnapshot, QcalError, QcalResult};
use qcal_history::{
    check_job_limit, collect_history, extract_job_records, HistoryConfig, HistoryReport,
    JobExtraction, JobSource, SnapshotSource,
};
use thiserror::Error;
use tokio::runtime::Runtime;

/// IBM backend errors
#[derive(Debug, Error)]
pub enum IbmBackendError {
    /// Authentication error
    #[error("Authentication error: {0}")]
    Auth(#[from] AuthError),

    /// Client error
    #[error("Client error: {0}")]
    Client(#[from] ClientError),

    /// Runtime error
    #[error("Async runtime error: {0}")]
    Runtime(String),
}

/// IBM Quantum backend source
/// Gantree: IbmBackend // 백엔드 소스
pub struct IbmBackend {
    /// API client
    client: IbmClient,

    /// Tokio runtime for async operations
    runtime: Runtime,
}

impl IbmBackend {
    /// Create backend source
    ///
    /// API keys are exchanged through IAM before returning.
    pub fn new(credentials: IbmCredentials) -> Result<Self, IbmBackendError> {
        let runtime = Runtime::new().map_err(|e| IbmBackendError::Runtime(e.to_string()))?;
        let client = runtime.block_on(IbmClient::connect(credentials))?;

        log::info!(
            "Connected to {} ({:?} credentials)",
            client.base_url(),
            client.credentials().source()
        );

        Ok(Self { client, runtime })
    }

    /// Create from environment variables only
    pub fn from_env() -> Result<Self, IbmBackendError> {
        Self::new(IbmCredentials::from_env()?)
    }

    /// Auto-detect credentials: environment first, then the saved account file
    pub fn auto_load() -> Result<Self, IbmBackendError> {
        Self::new(IbmCredentials::auto_load()?)
    }

    /// Create from the saved account file only
    ///
    /// `account` selects a named entry; `None` picks the default one.
    pub fn from_qiskit_config(account: Option<&str>) -> Result<Self, IbmBackendError> {
        Self::new(IbmCredentials::from_qiskit_config(account)?)
    }

    /// Underlying client
    pub fn client(&self) -> &IbmClient {
        &self.client
    }

    /// Raw calibration properties in effect at `at`
    pub fn properties_at(
        &self,
        backend: &str,
        at: DateTime<Utc>,
    ) -> Result<Option<BackendProperties>, IbmBackendError> {
        Ok(self
            .runtime
            .block_on(self.client.get_backend_properties_at(backend, at))?)
    }
}

impl SnapshotSource for IbmBackend {
    fn snapshot_at(&self, backend: &str, at: DateTime<Utc>) -> QcalResult<CalibrationSnapshot> {
        match self.properties_at(backend, at) {
            Ok(Some(properties)) => Ok(properties.to_snapshot(backend)),
            Ok(None) => Err(QcalError::NoCalibration {
                backend: backend.to_string(),
                at: at.to_rfc3339_opts(SecondsFormat::Secs, true),
            }),
            Err(e) => Err(QcalError::Fetch(e.to_string())),
        }
    }
}

impl JobSource for IbmBackend {
    type Job = IbmJob;

    fn jobs(&self, backend: &str, limit: usize) -> QcalResult<Vec<IbmJob>> {
        let listed = self
            .runtime
            .block_on(self.client.list_jobs(backend, limit))
            .map_err(|e| QcalError::Fetch(e.to_string()))?;

        Ok(listed
            .into_iter()
            .map(|info| IbmJob::new(info, self.client.clone(), self.runtime.handle().clone()))
            .collect())
    }
}

// ============================================================================
// Entry Points
// ============================================================================

fn connect(token: Option<&str>) -> anyhow::Result<IbmBackend> {
    let source = match token {
        Some(token) => IbmBackend::new(IbmCredentials::new(token)),
        None => IbmBackend::auto_load(),
    };
    source.context("connecting to IBM Quantum")
}

/// Calibration history for the configured window
///
/// Without a token, credentials are auto-detected.
/// Gantree: fetch_calibration_history(token,config) -> HistoryReport // 캘리브레이션 이력
pub fn fetch_calibration_history(
    token: Option<&str>,
    config: &HistoryConfig,
) -> anyhow::Result<HistoryReport> {
    config.validate().context("invalid history configuration")?;
    let source = connect(token)?;
    collect_history(&source, config)
        .with_context(|| format!("collecting calibration history for {}", config.backend))
}

/// Job metadata for the most recent `limit` jobs on `backend`
/// Gantree: fetch_job_metadata(token,backend,limit) -> JobExtraction // 작업 메타데이터
pub fn fetch_job_metadata(
    token: Option<&str>,
    backend: &str,
    limit: usize,
) -> anyhow::Result<JobExtraction> {
    check_job_limit(limit).context("invalid job listing limit")?;
    let source = connect(token)?;
    extract_job_records(&source, backend, limit)
        .with_context(|| format!("listing jobs on {}", backend))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_config_fails_before_connect() {
        let config = HistoryConfig::parse("ibm_sherbrooke", "2025-06-01", "2025-06-03")
            .unwrap()
            .with_step_days(0);

        let err = fetch_calibration_history(Some("short"), &config).unwrap_err();
        assert!(err.to_string().contains("invalid history configuration"));
    }

    #[test]
    fn test_zero_job_limit_fails_before_connect() {
        let err = fetch_job_metadata(Some("short"), "ibm_sherbrooke", 0).unwrap_err();
        assert!(err.to_string().contains("invalid job listing limit"));
    }

    #[test]
    fn test_history_ignores_job_limit() {
        let config = HistoryConfig::parse("ibm_sherbrooke", "2025-06-01", "2025-06-03")
            .unwrap()
            .with_job_limit(0);

        // Validation passes, so the failure comes from the short token
        let err = fetch_calibration_history(Some("short"), &config).unwrap_err();
        assert!(err.to_string().contains("connecting to IBM Quantum"));
    }

    #[test]
    fn test_short_token_rejected() {
        assert!(matches!(
            IbmBackend::new(IbmCredentials::new("short")),
            Err(IbmBackendError::Client(ClientError::Auth(
                AuthError::InvalidTokenFormat
            )))
        ));
    }

    // Integration tests require IBM credentials
    #[test]
    #[ignore]
    fn test_live_history() {
        let config = HistoryConfig::parse("ibm_sherbrooke", "2025-06-01", "2025-06-02").unwrap();
        let report = fetch_calibration_history(None, &config).unwrap();
        assert!(!report.table.is_empty());
    }

    #[test]
    #[ignore]
    fn test_live_jobs() {
        let extraction = fetch_job_metadata(None, "ibm_sherbrooke", 5).unwrap();
        assert!(extraction.listed_jobs <= 5);
    }
}
