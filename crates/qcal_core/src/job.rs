//! Job metadata records
//!
//! Gantree: L1_Records → JobRecord
//!
//! Row type for job-metadata extraction and the provider-neutral shape of a
//! job's per-experiment results.

use crate::constants::columns;
use crate::error::{QcalError, QcalResult};
use crate::row::{ColumnKind, TabularRow};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Header key holding the experiment's qubit count
pub const HEADER_N_QUBITS: &str = "n_qubits";

/// Header key holding the experiment's duration
pub const HEADER_DURATION: &str = "duration";

/// One experiment result inside a finished job
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExperimentResult {
    /// Free-form experiment header
    #[serde(default)]
    pub header: Map<String, Value>,

    /// Shots executed
    #[serde(default)]
    pub shots: Option<u64>,

    /// Status label (e.g., "DONE")
    #[serde(default)]
    pub status: Option<String>,

    /// Reason the provider payload for this experiment could not be decoded
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub undecodable: Option<String>,
}

impl ExperimentResult {
    /// Create experiment result with empty header
    pub fn new(shots: Option<u64>, status: Option<&str>) -> Self {
        Self {
            header: Map::new(),
            shots,
            status: status.map(str::to_string),
            undecodable: None,
        }
    }

    /// Placeholder for an experiment whose payload could not be decoded
    pub fn undecodable(reason: impl Into<String>) -> Self {
        Self {
            undecodable: Some(reason.into()),
            ..Default::default()
        }
    }

    /// Fail with `ExperimentMalformed` when the payload was not decodable
    pub fn ensure_decoded(&self) -> QcalResult<()> {
        match &self.undecodable {
            Some(reason) => Err(QcalError::ExperimentMalformed(reason.clone())),
            None => Ok(()),
        }
    }

    /// Insert a header entry
    pub fn with_header(mut self, key: &str, value: Value) -> Self {
        self.header.insert(key.to_string(), value);
        self
    }

    /// Qubit count from the header; missing or null yields `None`
    pub fn qubit_count(&self) -> QcalResult<Option<u64>> {
        match self.header.get(HEADER_N_QUBITS) {
            None | Some(Value::Null) => Ok(None),
            Some(v) => v.as_u64().map(Some).ok_or_else(|| {
                QcalError::ExperimentMalformed(format!("{} is not an integer: {}", HEADER_N_QUBITS, v))
            }),
        }
    }

    /// Duration from the header; missing or null yields `None`
    pub fn duration(&self) -> QcalResult<Option<f64>> {
        match self.header.get(HEADER_DURATION) {
            None | Some(Value::Null) => Ok(None),
            Some(v) => v.as_f64().map(Some).ok_or_else(|| {
                QcalError::ExperimentMalformed(format!("{} is not a number: {}", HEADER_DURATION, v))
            }),
        }
    }
}

/// Finished job output
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct JobOutput {
    /// Per-experiment results
    #[serde(default)]
    pub results: Vec<ExperimentResult>,
}

/// One row per (job, experiment result)
/// Gantree: JobRecord // 작업 메타데이터 행
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobRecord {
    /// Job identifier
    pub job_id: String,

    /// Job creation time
    pub creation_date: DateTime<Utc>,

    /// Backend the job ran on
    pub backend: String,

    /// Qubits used by the experiment
    pub qubit_count: Option<u64>,

    /// Experiment duration as reported in the header
    pub duration: Option<f64>,

    /// Shots executed
    pub shots: Option<u64>,

    /// Status label
    pub success: Option<String>,
}

impl TabularRow for JobRecord {
    const COLUMNS: &'static [&'static str] = &columns::JOBS;

    fn column_kinds() -> &'static [ColumnKind] {
        use ColumnKind::*;
        &[Text, Timestamp, Text, Integer, Float, Integer, Text]
    }

    fn null_mask(&self) -> Vec<bool> {
        vec![
            false,
            false,
            false,
            self.qubit_count.is_none(),
            self.duration.is_none(),
            self.shots.is_none(),
            self.success.is_none(),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_header_extraction() {
        let exp = ExperimentResult::new(Some(4096), Some("DONE"))
            .with_header(HEADER_N_QUBITS, json!(5))
            .with_header(HEADER_DURATION, json!(1.25));

        assert_eq!(exp.qubit_count().unwrap(), Some(5));
        assert_eq!(exp.duration().unwrap(), Some(1.25));
    }

    #[test]
    fn test_missing_header_is_null() {
        let exp = ExperimentResult::new(None, None).with_header(HEADER_DURATION, Value::Null);
        assert_eq!(exp.qubit_count().unwrap(), None);
        assert_eq!(exp.duration().unwrap(), None);
    }

    #[test]
    fn test_wrong_type_is_malformed() {
        let exp = ExperimentResult::new(None, None).with_header(HEADER_N_QUBITS, json!("five"));
        assert!(matches!(
            exp.qubit_count(),
            Err(QcalError::ExperimentMalformed(_))
        ));
    }

    #[test]
    fn test_undecodable_is_malformed() {
        let exp = ExperimentResult::undecodable("header: expected a map");
        assert!(matches!(
            exp.ensure_decoded(),
            Err(QcalError::ExperimentMalformed(reason)) if reason.contains("header")
        ));
        assert!(ExperimentResult::new(None, None).ensure_decoded().is_ok());
    }

    #[test]
    fn test_job_columns_align() {
        assert_eq!(JobRecord::COLUMNS.len(), JobRecord::column_kinds().len());
    }

    #[test]
    fn test_job_output_deserialize() {
        let json = r#"{
            "results": [
                {"header": {"n_qubits": 2}, "shots": 1024, "status": "DONE"},
                {"shots": 512}
            ]
        }"#;
        let output: JobOutput = serde_json::from_str(json).unwrap();
        assert_eq!(output.results.len(), 2);
        assert_eq!(output.results[0].qubit_count().unwrap(), Some(2));
        assert!(output.results[1].status.is_none());
    }
}
