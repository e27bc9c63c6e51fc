//! Error types for QCAL
//!
//! Gantree: L0_Foundation → Errors
//!
//! Error handling shared by the extraction pipeline, the table layer,
//! and backend adapters.

// Error variant fields are self-documenting via error messages
#![allow(missing_docs)]

use thiserror::Error;

/// Main error type for QCAL
/// Gantree: QcalError // enum
#[derive(Error, Debug, Clone, PartialEq)]
pub enum QcalError {
    // ========================================================================
    // Parameter Errors
    // ========================================================================
    /// Date string not in YYYY-MM-DD form
    /// Gantree: InvalidDate(String) // 날짜 형식
    #[error("Invalid date '{0}': expected YYYY-MM-DD")]
    InvalidDate(String),

    /// Step size must be a positive number of days
    /// Gantree: InvalidStep(u32) // 스텝 크기
    #[error("Invalid step {0}: must be a positive number of days")]
    InvalidStep(u32),

    /// Invalid configuration value
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    // ========================================================================
    // Fetch Errors
    // ========================================================================
    /// Remote snapshot or job listing could not be retrieved
    /// Gantree: Fetch(String) // 원격 조회 실패
    #[error("Fetch failed: {0}")]
    Fetch(String),

    /// No calibration exists at the requested instant
    #[error("No calibration available for {backend} at {at}")]
    NoCalibration { backend: String, at: String },

    /// Snapshot missing an expected structure
    #[error("Malformed snapshot: {0}")]
    SnapshotMalformed(String),

    // ========================================================================
    // Job Metadata Errors
    // ========================================================================
    /// Job top-level metadata (id, date, result) unavailable
    #[error("Job metadata unavailable: {0}")]
    JobMetadata(String),

    /// Experiment result carries an unexpected value
    #[error("Malformed experiment result: {0}")]
    ExperimentMalformed(String),

    // ========================================================================
    // Walk Control
    // ========================================================================
    /// Walk stopped by a cancellation request
    #[error("Operation cancelled")]
    Cancelled,

    // ========================================================================
    // Table / I/O Errors
    // ========================================================================
    /// CSV header does not match the fixed column set
    /// Gantree: SchemaMismatch{{expected,found}} // 컬럼 불일치
    #[error("Column mismatch: expected [{expected}], found [{found}]")]
    SchemaMismatch { expected: String, found: String },

    /// CSV encoding/decoding error
    #[error("CSV error: {0}")]
    CsvError(String),

    /// JSON serialization error
    #[error("JSON error: {0}")]
    JsonError(String),

    /// File I/O error
    #[error("File error: {0}")]
    FileError(String),

    // ========================================================================
    // Generic Errors
    // ========================================================================
    /// Internal error (should not happen)
    #[error("Internal error: {0}")]
    InternalError(String),
}

/// Result type alias for QCAL operations
/// Gantree: QcalResult<T> // type alias
pub type QcalResult<T> = Result<T, QcalError>;

// ============================================================================
// Error Conversion Helpers
// ============================================================================

impl From<serde_json::Error> for QcalError {
    fn from(err: serde_json::Error) -> Self {
        QcalError::JsonError(err.to_string())
    }
}

impl From<csv::Error> for QcalError {
    fn from(err: csv::Error) -> Self {
        QcalError::CsvError(err.to_string())
    }
}

impl From<std::io::Error> for QcalError {
    fn from(err: std::io::Error) -> Self {
        QcalError::FileError(err.to_string())
    }
}

// ============================================================================
// Error Helpers
// ============================================================================

impl QcalError {
    /// Check if the walker may skip this error and continue with the next step
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            QcalError::Fetch(_)
                | QcalError::NoCalibration { .. }
                | QcalError::SnapshotMalformed(_)
                | QcalError::JobMetadata(_)
                | QcalError::ExperimentMalformed(_)
        )
    }

    /// Check if error comes from invalid caller parameters
    pub fn is_parameter_error(&self) -> bool {
        matches!(
            self,
            QcalError::InvalidDate(_) | QcalError::InvalidStep(_) | QcalError::InvalidConfig(_)
        )
    }
}

// ============================================================================
// Tests
// ============================================================================
