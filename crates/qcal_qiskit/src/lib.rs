//! # QCAL Qiskit
//!
//! IBM Quantum calibration and job metadata source for QCAL.
//!
//! ## Gantree Architecture
//!
//! ```text
//! qcal_qiskit // L4: IBM Quantum adapter (완료)
//!     Auth // 인증 (완료)
//!         IbmCredentials: env → account file, IQP token / IAM API key
//!     Client // REST 클라이언트 (완료)
//!         get_backend_properties_at, list_jobs, get_job_results
//!     Job // 작업 메타데이터 (완료)
//!         JobInfo, JobResults, IbmJob: JobHandle
//!     IbmBackend // SnapshotSource + JobSource (완료)
//!         fetch_calibration_history, fetch_job_metadata
//! ```
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use qcal_history::HistoryConfig;
//! use qcal_qiskit::prelude::*;
//!
//! let config = HistoryConfig::parse("ibm_sherbrooke", "2025-06-01", "2025-06-07")?;
//! let report = fetch_calibration_history(None, &config)?;
//! report.table.write_csv("calibration_history.csv")?;
//!
//! let jobs = fetch_job_metadata(None, "ibm_sherbrooke", 500)?;
//! println!("{}", jobs);
//! ```
//!
//! ## Environment Variables
//!
//! ```bash
//! export IBM_QUANTUM_TOKEN="your-api-token"
//! export IBM_QUANTUM_INSTANCE="crn:v1:..."        # Optional
//! export IBM_QUANTUM_CHANNEL="ibm_quantum_platform" # Or "ibm_cloud"
//! ```
//!
//! Without these, the default entry of `~/.qiskit/qiskit-ibm.json` is used.

#![warn(missing_docs)]

// ============================================================================
// Module Declarations
// ============================================================================

/// Authentication (Gantree: L4_Qiskit → Auth)
pub mod auth;

/// REST API client (Gantree: L4_Qiskit → Client)
pub mod client;

/// Job metadata (Gantree: L4_Qiskit → Job)
pub mod job;

/// Backend source adapter (Gantree: L4_Qiskit → IbmBackend)
pub mod backend;

// ============================================================================
// Re-exports
// ============================================================================

pub use auth::{AuthError, CredentialSource, IbmChannel, IbmCredentials, TokenType};
pub use backend::{fetch_calibration_history, fetch_job_metadata, IbmBackend, IbmBackendError};
pub use client::{BackendProperties, ClientError, GateProperty, IbmClient, Nduv};
pub use job::{ExperimentPayload, IbmJob, JobInfo, JobResults, JobStatus};

// ============================================================================
// Prelude
// ============================================================================

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::auth::{IbmChannel, IbmCredentials};
    pub use crate::backend::{fetch_calibration_history, fetch_job_metadata, IbmBackend};
    pub use crate::client::IbmClient;
    pub use crate::job::JobStatus;
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
    use super::*;
    use qcal_core::constants::columns;
    use qcal_core::QubitDayRecord;
    use qcal_history::normalize;

    /// Provider payload through the normalizer into table rows
    #[test]
    fn test_properties_normalize() {
        let json = r#"{
            "backend_name": "ibm_sherbrooke",
            "qubits": [
                [
                    {"name": "frequency", "value": 4.72},
                    {"name": "T1", "value": 215.3},
                    {"name": "T2", "value": 130.1},
                    {"name": "anharmonicity", "value": -0.31},
                    {"name": "readout_error", "value": 0.0121},
                    {"name": "prob_meas0_prep1", "value": 0.014},
                    {"name": "prob_meas1_prep0", "value": 0.010},
                    {"name": "readout_length", "value": 1216.0}
                ],
                [
                    {"name": "frequency", "value": 4.81},
                    {"name": "T1", "value": 198.0},
                    {"name": "T2", "value": 101.4}
                ]
            ],
            "gates": [
                {"gate": "sx", "qubits": [1], "parameters": [
                    {"name": "gate_error", "value": 0.00021},
                    {"name": "gate_length", "value": 35.55}
                ]},
                {"gate": "ecr", "qubits": [0, 1], "parameters": [
                    {"name": "gate_error", "value": 0.0074},
                    {"name": "gate_length", "value": 660.0}
                ]}
            ]
        }"#;

        let props: BackendProperties = serde_json::from_str(json).unwrap();
        let date = qcal_core::parse_date("2025-06-01").unwrap();
        let day = normalize(&props.to_snapshot("ibm_sherbrooke"), date);

        assert_eq!(day.len(), 2);
        assert!(day.issues.is_empty());

        let q0: &QubitDayRecord = &day.records[0];
        assert_eq!(q0.qubit, 0);
        assert_eq!(q0.t1_us, Some(215.3));
        assert_eq!(q0.readout_error, Some(0.0121));
        assert_eq!(q0.ecr_error, Some(0.0074));
        assert!(q0.sx_error.is_none());

        let q1 = &day.records[1];
        assert_eq!(q1.sx_error, Some(0.00021));
        assert!(q1.readout_error.is_none());
        assert!(q1.anharmonicity_ghz.is_none());
        assert_eq!(columns::CALIBRATION.len(), 17);
    }

    #[test]
    fn test_version() {
        assert!(!crate::VERSION.is_empty());
        assert_eq!(crate::NAME, "qcal_qiskit");
    }
}
