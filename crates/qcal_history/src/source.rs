//! Remote capabilities
//!
//! Gantree: L3_History → Sources
//!
//! The walker and the job extractor only see these traits; provider
//! adapters implement them.

use chrono::{DateTime, Utc};
use qcal_core::{CalibrationSnapshot, JobOutput, QcalResult};

/// Fetches a backend's calibration as of an instant
/// Gantree: SnapshotSource // 스냅샷 조회
pub trait SnapshotSource {
    /// Calibration snapshot in effect at `at`
    fn snapshot_at(&self, backend: &str, at: DateTime<Utc>) -> QcalResult<CalibrationSnapshot>;
}

/// A listed job whose metadata is read lazily
/// Gantree: JobHandle // 작업 핸들
pub trait JobHandle {
    /// Job identifier
    fn job_id(&self) -> QcalResult<String>;

    /// Creation timestamp
    fn creation_date(&self) -> QcalResult<DateTime<Utc>>;

    /// Backend the job ran on
    fn backend_name(&self) -> QcalResult<String>;

    /// Finished output with per-experiment results
    fn result(&self) -> QcalResult<JobOutput>;
}

/// Lists jobs submitted to a backend
/// Gantree: JobSource // 작업 목록
pub trait JobSource {
    /// Handle type returned by the listing
    type Job: JobHandle;

    /// At most `limit` most recent jobs on `backend`
    fn jobs(&self, backend: &str, limit: usize) -> QcalResult<Vec<Self::Job>>;
}

impl<S: SnapshotSource + ?Sized> SnapshotSource for &S {
    fn snapshot_at(&self, backend: &str, at: DateTime<Utc>) -> QcalResult<CalibrationSnapshot> {
        (**self).snapshot_at(backend, at)
    }
}

impl<S: SnapshotSource + ?Sized> SnapshotSource for Box<S> {
    fn snapshot_at(&self, backend: &str, at: DateTime<Utc>) -> QcalResult<CalibrationSnapshot> {
        (**self).snapshot_at(backend, at)
    }
}
