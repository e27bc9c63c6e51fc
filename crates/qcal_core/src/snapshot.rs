//! Calibration snapshot model
//!
//! Gantree: L1_Snapshot → CalibrationSnapshot
//!
//! Provider-neutral view of a backend's calibration state at one instant.
//! Adapters convert their wire format into this shape; the normalizer
//! consumes it.

use crate::constants::gates::{GATE_ERROR, GATE_LENGTH};
use crate::types::QubitId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Single measured qubit property
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QubitProperty {
    /// Property name (e.g., "T1", "frequency")
    pub name: String,

    /// Property value, trusted verbatim; `None` when the provider sent no number
    #[serde(default)]
    pub value: Option<f64>,

    /// Unit
    #[serde(default)]
    pub unit: Option<String>,

    /// Measurement date reported by the provider
    #[serde(default)]
    pub date: Option<String>,
}

impl QubitProperty {
    /// Create a property without unit or date
    pub fn new(name: impl Into<String>, value: f64) -> Self {
        Self {
            name: name.into(),
            value: Some(value),
            unit: None,
            date: None,
        }
    }

    /// Set unit
    pub fn with_unit(mut self, unit: impl Into<String>) -> Self {
        self.unit = Some(unit.into());
        self
    }
}

/// Named gate parameter
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GateParameter {
    /// Parameter name (e.g., "gate_error", "gate_length")
    pub name: String,

    /// Parameter value
    pub value: f64,

    /// Unit
    #[serde(default)]
    pub unit: Option<String>,
}

/// Gate descriptor: name, target qubits, and parameters
/// Gantree: GateDescriptor // 게이트 기술자
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GateDescriptor {
    /// Gate name (e.g., "sx", "ecr")
    pub name: String,

    /// Qubits the gate acts on
    pub qubits: Vec<QubitId>,

    /// Named parameters
    #[serde(default)]
    pub parameters: Vec<GateParameter>,
}

impl GateDescriptor {
    /// Create gate without parameters
    pub fn new(name: impl Into<String>, qubits: Vec<QubitId>) -> Self {
        Self {
            name: name.into(),
            qubits,
            parameters: Vec::new(),
        }
    }

    /// Add a named parameter
    pub fn with_parameter(mut self, name: impl Into<String>, value: f64) -> Self {
        self.parameters.push(GateParameter {
            name: name.into(),
            value,
            unit: None,
        });
        self
    }

    /// Add a `gate_error` parameter
    pub fn with_error(self, value: f64) -> Self {
        self.with_parameter(GATE_ERROR, value)
    }

    /// Add a `gate_length` parameter
    pub fn with_length(self, value: f64) -> Self {
        self.with_parameter(GATE_LENGTH, value)
    }
}

/// Backend calibration state at one instant
/// Gantree: CalibrationSnapshot // 캘리브레이션 스냅샷
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CalibrationSnapshot {
    /// Backend name
    pub backend_name: String,

    /// Provider-reported last update time
    #[serde(default)]
    pub last_update: Option<DateTime<Utc>>,

    /// Per-qubit property tuples; position i is qubit i
    /// Gantree: qubits: Vec<Vec<QubitProperty>> // 큐비트 속성
    #[serde(default)]
    pub qubits: Vec<Vec<QubitProperty>>,

    /// Gate descriptors in provider order
    /// Gantree: gates: Vec<GateDescriptor> // 게이트
    #[serde(default)]
    pub gates: Vec<GateDescriptor>,

    /// Per-channel readout errors, index-aligned to qubits
    /// Gantree: readout_errors: Vec<Option<f64>> // 측정 채널 에러
    #[serde(default)]
    pub readout_errors: Vec<Option<f64>>,
}

impl CalibrationSnapshot {
    /// Create empty snapshot
    pub fn new(backend_name: impl Into<String>) -> Self {
        Self {
            backend_name: backend_name.into(),
            ..Default::default()
        }
    }

    /// Append a qubit property tuple
    pub fn with_qubit(mut self, properties: Vec<QubitProperty>) -> Self {
        self.qubits.push(properties);
        self
    }

    /// Append a qubit whose tuple holds the given values in slot order
    pub fn with_qubit_values(self, values: &[f64]) -> Self {
        let properties = values
            .iter()
            .enumerate()
            .map(|(slot, &v)| QubitProperty::new(format!("slot{}", slot), v))
            .collect();
        self.with_qubit(properties)
    }

    /// Append a gate descriptor
    pub fn with_gate(mut self, gate: GateDescriptor) -> Self {
        self.gates.push(gate);
        self
    }

    /// Replace per-channel readout errors (every channel present)
    pub fn with_readout_errors(mut self, errors: &[f64]) -> Self {
        self.readout_errors = errors.iter().copied().map(Some).collect();
        self
    }

    /// Number of qubits in the properties source
    pub fn num_qubits(&self) -> usize {
        self.qubits.len()
    }

    /// Check if snapshot carries no qubit data
    pub fn is_empty(&self) -> bool {
        self.qubits.is_empty()
    }

    /// Positional property value, `None` when the tuple is too short or the
    /// entry carries no value
    pub fn slot(&self, qubit: QubitId, slot: usize) -> Option<f64> {
        self.qubits
            .get(qubit)
            .and_then(|props| props.get(slot))
            .and_then(|p| p.value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_snapshot_builder() {
        let snapshot = CalibrationSnapshot::new("ibm_test")
            .with_qubit_values(&[5.1, 120.0, 80.0])
            .with_qubit_values(&[5.2])
            .with_gate(GateDescriptor::new("sx", vec![0]).with_error(0.01))
            .with_readout_errors(&[0.02, 0.03]);

        assert_eq!(snapshot.num_qubits(), 2);
        assert_eq!(snapshot.gates.len(), 1);
        assert_eq!(snapshot.readout_errors, vec![Some(0.02), Some(0.03)]);
    }

    #[test]
    fn test_slot_lookup() {
        let snapshot = CalibrationSnapshot::new("ibm_test").with_qubit_values(&[5.1, 120.0]);

        assert_relative_eq!(snapshot.slot(0, 1).unwrap(), 120.0);
        assert!(snapshot.slot(0, 2).is_none());
        assert!(snapshot.slot(3, 0).is_none());
    }

    #[test]
    fn test_slot_without_value_keeps_position() {
        let mut missing = QubitProperty::new("frequency", 0.0);
        missing.value = None;
        let snapshot = CalibrationSnapshot::new("ibm_test")
            .with_qubit(vec![missing, QubitProperty::new("T1", 180.0)]);

        assert!(snapshot.slot(0, 0).is_none());
        assert_relative_eq!(snapshot.slot(0, 1).unwrap(), 180.0);
    }

    #[test]
    fn test_gate_parameters() {
        let gate = GateDescriptor::new("ecr", vec![0, 1])
            .with_error(0.007)
            .with_length(660.0);

        assert_eq!(gate.parameters.len(), 2);
        assert_eq!(gate.parameters[0].name, GATE_ERROR);
        assert_eq!(gate.parameters[1].name, GATE_LENGTH);
    }

    #[test]
    fn test_snapshot_deserialize_defaults() {
        let json = r#"{"backend_name": "ibm_test"}"#;
        let snapshot: CalibrationSnapshot = serde_json::from_str(json).unwrap();
        assert!(snapshot.is_empty());
        assert!(snapshot.readout_errors.is_empty());
    }
}
