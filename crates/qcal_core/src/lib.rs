//! # QCAL Core
//!
//! Foundation types for quantum calibration history extraction.
//!
//! ## Gantree Architecture
//!
//! ```text
//! qcal_core // L0+L1: Foundation + Records (완료)
//!     L0_Foundation // 기반 타입/상수/에러 (완료)
//!         CoreTypes // QubitId, 날짜 파싱 (완료)
//!         Constants // 컬럼/슬롯/게이트 규칙 (완료)
//!         Errors // 에러 타입 (완료)
//!     L1_Snapshot // 원격 스냅샷 모델 (완료)
//!         CalibrationSnapshot, GateDescriptor, QubitProperty
//!     L1_Records // 출력 행 (완료)
//!         QubitDayRecord // (date, qubit) 행
//!         JobRecord // (job, experiment) 행
//!         TabularRow // 고정 컬럼 계약
//! ```
//!
//! ## Quick Start
//!
//! ```rust
//! use qcal_core::prelude::*;
//!
//! let snapshot = CalibrationSnapshot::new("ibm_sherbrooke")
//!     .with_qubit_values(&[4.9, 210.0, 150.0, -0.31])
//!     .with_gate(GateDescriptor::new("sx", vec![0]).with_error(2.1e-4))
//!     .with_readout_errors(&[0.012]);
//!
//! assert_eq!(snapshot.num_qubits(), 1);
//! assert_eq!(QubitDayRecord::COLUMNS[0], "date");
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

// ============================================================================
// Module Declarations
// ============================================================================

/// Core types (Gantree: L0_Foundation → CoreTypes)
pub mod types;

/// Constants (Gantree: L0_Foundation → Constants)
pub mod constants;

/// Error types (Gantree: L0_Foundation → Errors)
pub mod error;

/// Snapshot model (Gantree: L1_Snapshot → CalibrationSnapshot)
pub mod snapshot;

/// Tabular row contract (Gantree: L1_Records → TabularRow)
pub mod row;

/// Qubit-day record (Gantree: L1_Records → QubitDayRecord)
pub mod record;

/// Job metadata (Gantree: L1_Records → JobRecord)
pub mod job;

// ============================================================================
// Re-exports
// ============================================================================

pub use error::{QcalError, QcalResult};
pub use job::{ExperimentResult, JobOutput, JobRecord};
pub use record::{GateErrorColumn, QubitDayRecord};
pub use row::{ColumnKind, TabularRow};
pub use snapshot::{CalibrationSnapshot, GateDescriptor, GateParameter, QubitProperty};
pub use types::{format_date, parse_date, start_of_day_utc, QubitId};

// ============================================================================
// Prelude
// ============================================================================

pub mod prelude {
    //! Convenient imports for common use cases
    //!
    //! ```rust
    //! use qcal_core::prelude::*;
    //! ```

    pub use crate::error::{QcalError, QcalResult};
    pub use crate::job::{ExperimentResult, JobOutput, JobRecord};
    pub use crate::record::{GateErrorColumn, QubitDayRecord};
    pub use crate::row::{ColumnKind, TabularRow};
    pub use crate::snapshot::{CalibrationSnapshot, GateDescriptor, GateParameter, QubitProperty};
    pub use crate::types::{format_date, parse_date, start_of_day_utc, QubitId};
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
