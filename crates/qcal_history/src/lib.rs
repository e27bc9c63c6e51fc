//! # QCAL History
//!
//! Calibration history extraction over a date range, and job metadata
//! extraction, against any provider implementing the source traits.
//!
//! ## Gantree Architecture
//!
//! ```text
//! qcal_history // L3: History (완료)
//!     Sources // 원격 조회 트레이트 (완료)
//!         SnapshotSource, JobSource, JobHandle
//!     DateRange // 날짜 범위 (완료)
//!     Pacer // 호출 간격 정책 (완료)
//!         FixedDelay, NoDelay
//!     CancelToken // 협력적 취소 (완료)
//!     Normalizer // 스냅샷 → 큐비트별 행 (완료)
//!         seed → gates → readout → operational
//!     Walker // 날짜별 수집, 실패 허용 (완료)
//!         CalibrationHistory, HistoryReport, DayOutcome
//!     Jobs // 작업 메타데이터 (완료)
//!         extract_job_records, JobExtraction
//!     HistoryConfig // 설정 (완료)
//! ```
//!
//! ## Quick Start
//!
//! ```rust
//! use qcal_core::prelude::*;
//! use qcal_history::prelude::*;
//! use chrono::{DateTime, Utc};
//!
//! struct Fixed;
//!
//! impl SnapshotSource for Fixed {
//!     fn snapshot_at(&self, backend: &str, _at: DateTime<Utc>) -> QcalResult<CalibrationSnapshot> {
//!         Ok(CalibrationSnapshot::new(backend).with_qubit_values(&[5.0, 120.0, 80.0]))
//!     }
//! }
//!
//! let range = DateRange::parse("2025-06-01", "2025-06-03", 1).unwrap();
//! let report = CalibrationHistory::new(Fixed)
//!     .with_pacer(NoDelay)
//!     .collect("ibm_test", range);
//!
//! assert_eq!(report.table.len(), 3);
//! ```

#![warn(missing_docs)]

// ============================================================================
// Module Declarations
// ============================================================================

/// Remote capability traits (Gantree: L3_History → Sources)
pub mod source;

/// Inclusive date range (Gantree: L3_History → DateRange)
pub mod range;

/// Pacing policy (Gantree: L3_History → Pacer)
pub mod pacing;

/// Cooperative cancellation (Gantree: L3_History → CancelToken)
pub mod cancel;

/// Snapshot normalizer (Gantree: L3_History → Normalizer)
pub mod normalizer;

/// Date-range walker (Gantree: L3_History → Walker)
pub mod walker;

/// Job metadata extraction (Gantree: L3_History → Jobs)
pub mod jobs;

/// Run configuration (Gantree: L3_History → HistoryConfig)
pub mod config;

// ============================================================================
// Re-exports
// ============================================================================

pub use cancel::CancelToken;
pub use config::HistoryConfig;
pub use jobs::{check_job_limit, extract_job_records, JobExtraction};
pub use normalizer::{normalize, IngestIssue, IssueSource, NormalizedDay};
pub use pacing::{FixedDelay, NoDelay, Pacer};
pub use range::DateRange;
pub use source::{JobHandle, JobSource, SnapshotSource};
pub use walker::{
    collect_history, load_calibration_history, CalibrationHistory, DayOutcome, HistoryReport,
};

// ============================================================================
// Prelude
// ============================================================================

/// Convenient imports for common use cases
pub mod prelude {
    //! Prelude module for convenient imports
    //!
    //! ```rust
    //! use qcal_history::prelude::*;
    //! ```

    pub use crate::cancel::CancelToken;
    pub use crate::config::HistoryConfig;
    pub use crate::jobs::{extract_job_records, JobExtraction};
    pub use crate::normalizer::{normalize, IngestIssue, NormalizedDay};
    pub use crate::pacing::{FixedDelay, NoDelay, Pacer};
    pub use crate::range::DateRange;
    pub use crate::source::{JobHandle, JobSource, SnapshotSource};
    pub use crate::walker::{collect_history, CalibrationHistory, DayOutcome, HistoryReport};
}

// ============================================================================
// Version Information
// ============================================================================

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Crate name
pub const NAME: &str = env!("CARGO_PKG_NAME");

// ============================================================================
// Integration Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::prelude::*;
    use chrono::{DateTime, Datelike, Utc};
    use qcal_core::prelude::*;
    use qcal_table::CalibrationTable;

    /// Odd days succeed with a growing device, even days fail
    struct Alternating;

    impl SnapshotSource for Alternating {
        fn snapshot_at(&self, backend: &str, at: DateTime<Utc>) -> QcalResult<CalibrationSnapshot> {
            let day = at.day() as usize;
            if day % 2 == 0 {
                return Err(QcalError::Fetch(format!("{} offline", backend)));
            }

            let mut snapshot = CalibrationSnapshot::new(backend);
            for q in 0..day {
                snapshot = snapshot.with_qubit_values(&[5.0 + q as f64 * 0.01, 100.0, 70.0]);
            }
            Ok(snapshot
                .with_gate(GateDescriptor::new("ecr", vec![0, 1]).with_error(0.008))
                .with_readout_errors(&vec![0.015; day]))
        }
    }

    #[test]
    fn test_walk_export_reload() {
        let range = DateRange::parse("2025-06-01", "2025-06-05", 1).unwrap();
        let report = CalibrationHistory::new(Alternating)
            .with_pacer(NoDelay)
            .collect("ibm_test", range);

        // Days 1, 3, 5 collected with 1, 3, 5 qubits
        assert_eq!(report.table.len(), 9);
        assert_eq!(report.failed_dates().len(), 2);

        // The single-qubit day cannot host the two-qubit gate
        assert_eq!(report.issues().count(), 1);

        let csv = report.table.to_csv_string().unwrap();
        let reloaded = CalibrationTable::read_csv_from(csv.as_bytes()).unwrap();
        assert_eq!(reloaded, report.table);
        assert_eq!(reloaded.drop_duplicates().unwrap(), reloaded);
    }

    #[test]
    fn test_version() {
        assert!(!crate::VERSION.is_empty());
        assert_eq!(crate::NAME, "qcal_history");
    }
}
