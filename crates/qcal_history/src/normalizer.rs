//! Snapshot normalizer
//!
//! Gantree: L3_History → Normalizer
//!
//! Flattens one calibration snapshot into one record per qubit. The
//! properties list creates the records; gate parameters and the per-channel
//! readout list only update records that already exist.
//!
//! Phases run in a fixed order:
//!
//! 1. seed from positional property slots
//! 2. gate errors and gate lengths
//! 3. per-channel readout errors (override slot 4)
//! 4. operational re-pass

use qcal_core::constants::{columns, gates, slots};
use qcal_core::{CalibrationSnapshot, GateErrorColumn, QubitDayRecord, QubitId};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

// ============================================================================
// Gate Rules
// ============================================================================

/// Gate-error columns, evaluated independently in this order
const GATE_RULE_ORDER: [GateErrorColumn; 5] = [
    GateErrorColumn::Id,
    GateErrorColumn::Rz,
    GateErrorColumn::Sx,
    GateErrorColumn::X,
    GateErrorColumn::Ecr,
];

/// Check if a gate name feeds an error column
fn rule_matches(column: GateErrorColumn, gate_name: &str) -> bool {
    match column {
        GateErrorColumn::Id => gate_name.contains(gates::ID),
        GateErrorColumn::Rz => gate_name.contains(gates::RZ),
        GateErrorColumn::Sx => gate_name.contains(gates::SX),
        GateErrorColumn::X => gate_name == gates::X,
        GateErrorColumn::Ecr => gate_name.contains(gates::ECR),
    }
}

/// Error columns a gate name maps to
pub fn matching_columns(gate_name: &str) -> Vec<GateErrorColumn> {
    GATE_RULE_ORDER
        .into_iter()
        .filter(|&column| rule_matches(column, gate_name))
        .collect()
}

// ============================================================================
// Ingest Issues
// ============================================================================

/// Where a rejected update came from
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum IssueSource {
    /// Gate descriptor, by gate name
    Gate(String),
    /// Per-channel readout list
    Readout,
}

/// Update referencing a qubit absent from the properties list
/// Gantree: IngestIssue // 범위 밖 참조
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IngestIssue {
    /// Source of the update
    pub source: IssueSource,

    /// Qubit index that had no record
    pub qubit: QubitId,

    /// Column that was not written
    pub column: String,
}

impl fmt::Display for IngestIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.source {
            IssueSource::Gate(name) => write!(
                f,
                "gate '{}' references unknown qubit {} ({})",
                name, self.qubit, self.column
            ),
            IssueSource::Readout => write!(
                f,
                "readout channel {} has no matching qubit ({})",
                self.qubit, self.column
            ),
        }
    }
}

// ============================================================================
// Normalized Day
// ============================================================================

/// Records for one date plus any rejected updates
/// Gantree: NormalizedDay // 일별 결과
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NormalizedDay {
    /// One record per qubit, qubit ascending
    pub records: Vec<QubitDayRecord>,

    /// Updates that referenced unknown qubits
    pub issues: Vec<IngestIssue>,
}

impl NormalizedDay {
    /// Number of records
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Check if the day produced no records
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

// ============================================================================
// Normalizer
// ============================================================================

/// Flatten a snapshot into per-qubit records for `date`
/// Gantree: normalize(snapshot,date) -> NormalizedDay // 정규화
pub fn normalize(snapshot: &CalibrationSnapshot, date: NaiveDate) -> NormalizedDay {
    let mut records = seed(snapshot, date);
    let mut issues = Vec::new();

    apply_gates(snapshot, &mut records, &mut issues);
    apply_readout(snapshot, &mut records, &mut issues);

    for qubit in 0..snapshot.num_qubits() {
        if let Some(record) = records.get_mut(&qubit) {
            record.operational = Some(1);
        }
    }

    NormalizedDay {
        records: records.into_values().collect(),
        issues,
    }
}

/// Phase 1: one record per properties tuple
fn seed(snapshot: &CalibrationSnapshot, date: NaiveDate) -> BTreeMap<QubitId, QubitDayRecord> {
    (0..snapshot.num_qubits())
        .map(|qubit| {
            let slot = |index| snapshot.slot(qubit, index);

            let mut record = QubitDayRecord::empty(date, qubit);
            record.frequency_ghz = slot(slots::FREQUENCY);
            record.t1_us = slot(slots::T1);
            record.t2_us = slot(slots::T2);
            record.anharmonicity_ghz = slot(slots::ANHARMONICITY);
            record.readout_error = slot(slots::READOUT_ERROR);
            record.prob_meas0_prep1 = slot(slots::PROB_MEAS0_PREP1);
            record.prob_meas1_prep0 = slot(slots::PROB_MEAS1_PREP0);
            record.readout_length_ns = slot(slots::READOUT_LENGTH);
            record.operational = Some(1);

            (qubit, record)
        })
        .collect()
}

/// Phase 2: gate errors by name rule, gate lengths unconditionally
fn apply_gates(
    snapshot: &CalibrationSnapshot,
    records: &mut BTreeMap<QubitId, QubitDayRecord>,
    issues: &mut Vec<IngestIssue>,
) {
    for gate in &snapshot.gates {
        let error_columns = matching_columns(&gate.name);

        for param in &gate.parameters {
            match param.name.as_str() {
                gates::GATE_ERROR => {
                    for &column in &error_columns {
                        for &qubit in &gate.qubits {
                            match records.get_mut(&qubit) {
                                Some(record) => record.set_gate_error(column, param.value),
                                None => issues.push(gate_issue(&gate.name, qubit, column.column())),
                            }
                        }
                    }
                }
                gates::GATE_LENGTH => {
                    for &qubit in &gate.qubits {
                        match records.get_mut(&qubit) {
                            Some(record) => record.gate_time_ns = Some(param.value),
                            None => issues.push(gate_issue(&gate.name, qubit, columns::GATE_TIME_NS)),
                        }
                    }
                }
                _ => {}
            }
        }
    }
}

/// Phase 3: per-channel readout errors override the positional slot
fn apply_readout(
    snapshot: &CalibrationSnapshot,
    records: &mut BTreeMap<QubitId, QubitDayRecord>,
    issues: &mut Vec<IngestIssue>,
) {
    for (qubit, value) in snapshot.readout_errors.iter().enumerate() {
        let Some(value) = *value else { continue };

        match records.get_mut(&qubit) {
            Some(record) => record.readout_error = Some(value),
            None => issues.push(IngestIssue {
                source: IssueSource::Readout,
                qubit,
                column: columns::READOUT_ERROR.to_string(),
            }),
        }
    }
}

fn gate_issue(gate: &str, qubit: QubitId, column: &str) -> IngestIssue {
    IngestIssue {
        source: IssueSource::Gate(gate.to_string()),
        qubit,
        column: column.to_string(),
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use qcal_core::{parse_date, GateDescriptor, QubitProperty};

    fn day() -> NaiveDate {
        parse_date("2025-06-01").unwrap()
    }

    fn full_tuple(base: f64) -> Vec<f64> {
        (0..8).map(|i| base + i as f64).collect()
    }

    #[test]
    fn test_properties_only() {
        let snapshot = CalibrationSnapshot::new("ibm_test")
            .with_qubit_values(&full_tuple(0.0))
            .with_qubit_values(&full_tuple(10.0))
            .with_qubit_values(&full_tuple(20.0));

        let day = normalize(&snapshot, day());

        assert_eq!(day.len(), 3);
        assert!(day.issues.is_empty());
        for (i, record) in day.records.iter().enumerate() {
            assert_eq!(record.qubit, i);
            assert!(record.is_operational());
            assert!(record.id_error.is_none());
            assert!(record.sx_error.is_none());
            assert!(record.gate_time_ns.is_none());
        }

        let q1 = &day.records[1];
        assert_relative_eq!(q1.frequency_ghz.unwrap(), 10.0);
        assert_relative_eq!(q1.t1_us.unwrap(), 11.0);
        assert_relative_eq!(q1.t2_us.unwrap(), 12.0);
        assert_relative_eq!(q1.anharmonicity_ghz.unwrap(), 13.0);
        assert_relative_eq!(q1.readout_error.unwrap(), 14.0);
        assert_relative_eq!(q1.prob_meas0_prep1.unwrap(), 15.0);
        assert_relative_eq!(q1.prob_meas1_prep0.unwrap(), 16.0);
        assert_relative_eq!(q1.readout_length_ns.unwrap(), 17.0);
    }

    #[test]
    fn test_short_tuple_degrades_to_nulls() {
        let snapshot = CalibrationSnapshot::new("ibm_test").with_qubit_values(&[4.9, 200.0]);

        let record = &normalize(&snapshot, day()).records[0];

        assert_eq!(record.frequency_ghz, Some(4.9));
        assert_eq!(record.t1_us, Some(200.0));
        assert!(record.t2_us.is_none());
        assert!(record.readout_length_ns.is_none());
        assert!(record.is_operational());
    }

    #[test]
    fn test_empty_tuple_still_creates_record() {
        let snapshot = CalibrationSnapshot::new("ibm_test").with_qubit(Vec::new());
        let day = normalize(&snapshot, day());

        assert_eq!(day.len(), 1);
        assert!(day.records[0].t1_us.is_none());
        assert_eq!(day.records[0].operational, Some(1));
    }

    #[test]
    fn test_gate_rules_x_versus_sx() {
        let snapshot = CalibrationSnapshot::new("ibm_test")
            .with_qubit_values(&[5.0])
            .with_gate(GateDescriptor::new("x", vec![0]).with_error(0.002))
            .with_gate(GateDescriptor::new("sx", vec![0]).with_error(0.001));

        let record = &normalize(&snapshot, day()).records[0];

        assert_eq!(record.x_error, Some(0.002));
        assert_eq!(record.sx_error, Some(0.001));
        assert!(record.id_error.is_none());
        assert!(record.rz_error.is_none());
        assert!(record.ecr_error.is_none());
    }

    #[test]
    fn test_matching_columns() {
        assert_eq!(matching_columns("x"), vec![GateErrorColumn::X]);
        assert_eq!(matching_columns("sx"), vec![GateErrorColumn::Sx]);
        assert_eq!(matching_columns("id"), vec![GateErrorColumn::Id]);
        assert_eq!(matching_columns("ecr"), vec![GateErrorColumn::Ecr]);
        assert_eq!(matching_columns("rz"), vec![GateErrorColumn::Rz]);
        assert!(matching_columns("cz").is_empty());
        assert!(matching_columns("measure").is_empty());
    }

    #[test]
    fn test_two_qubit_gate_writes_both_qubits() {
        let snapshot = CalibrationSnapshot::new("ibm_test")
            .with_qubit_values(&[5.0])
            .with_qubit_values(&[5.1])
            .with_gate(
                GateDescriptor::new("ecr", vec![0, 1])
                    .with_error(0.0075)
                    .with_length(660.0),
            );

        let day = normalize(&snapshot, day());

        for record in &day.records {
            assert_eq!(record.ecr_error, Some(0.0075));
            assert_eq!(record.gate_time_ns, Some(660.0));
        }
    }

    #[test]
    fn test_gate_length_last_write_wins() {
        let snapshot = CalibrationSnapshot::new("ibm_test")
            .with_qubit_values(&[5.0])
            .with_qubit_values(&[5.1])
            .with_gate(GateDescriptor::new("sx", vec![0]).with_length(35.5))
            .with_gate(GateDescriptor::new("ecr", vec![0, 1]).with_length(660.0))
            .with_gate(GateDescriptor::new("measure", vec![1]).with_length(1200.0));

        let day = normalize(&snapshot, day());

        assert_eq!(day.records[0].gate_time_ns, Some(660.0));
        assert_eq!(day.records[1].gate_time_ns, Some(1200.0));
    }

    #[test]
    fn test_unknown_parameter_ignored() {
        let snapshot = CalibrationSnapshot::new("ibm_test")
            .with_qubit_values(&[5.0])
            .with_gate(GateDescriptor::new("sx", vec![0]).with_parameter("duration", 1.0));

        let record = &normalize(&snapshot, day()).records[0];
        assert!(record.sx_error.is_none());
        assert!(record.gate_time_ns.is_none());
    }

    #[test]
    fn test_readout_channel_takes_precedence() {
        let mut tuple = full_tuple(0.0);
        tuple[slots::READOUT_ERROR] = 0.5;

        let snapshot = CalibrationSnapshot::new("ibm_test")
            .with_qubit_values(&tuple)
            .with_qubit_values(&tuple)
            .with_readout_errors(&[0.02]);

        let day = normalize(&snapshot, day());

        assert_eq!(day.records[0].readout_error, Some(0.02));
        // Channel not reported: the positional value stays
        assert_eq!(day.records[1].readout_error, Some(0.5));
    }

    #[test]
    fn test_missing_channel_entry_keeps_slot() {
        let mut snapshot = CalibrationSnapshot::new("ibm_test")
            .with_qubit_values(&full_tuple(0.0))
            .with_qubit_values(&full_tuple(0.0));
        snapshot.readout_errors = vec![None, Some(0.03)];

        let day = normalize(&snapshot, day());

        assert_eq!(day.records[0].readout_error, Some(4.0));
        assert_eq!(day.records[1].readout_error, Some(0.03));
    }

    #[test]
    fn test_foreign_indices_reported_not_created() {
        let snapshot = CalibrationSnapshot::new("ibm_test")
            .with_qubit_values(&[5.0])
            .with_gate(GateDescriptor::new("ecr", vec![0, 7]).with_error(0.01))
            .with_readout_errors(&[0.02, 0.04]);

        let day = normalize(&snapshot, day());

        assert_eq!(day.len(), 1);
        assert_eq!(day.records[0].ecr_error, Some(0.01));
        assert_eq!(day.records[0].readout_error, Some(0.02));

        assert_eq!(
            day.issues,
            vec![
                IngestIssue {
                    source: IssueSource::Gate("ecr".into()),
                    qubit: 7,
                    column: columns::ECR_ERROR.into(),
                },
                IngestIssue {
                    source: IssueSource::Readout,
                    qubit: 1,
                    column: columns::READOUT_ERROR.into(),
                },
            ]
        );
    }

    #[test]
    fn test_values_kept_verbatim() {
        let snapshot = CalibrationSnapshot::new("ibm_test")
            .with_qubit(vec![
                QubitProperty::new("frequency", -1.0),
                QubitProperty::new("T1", f64::NAN),
            ])
            .with_gate(GateDescriptor::new("id", vec![0]).with_error(3.5));

        let record = &normalize(&snapshot, day()).records[0];

        assert_eq!(record.frequency_ghz, Some(-1.0));
        assert!(record.t1_us.unwrap().is_nan());
        assert_eq!(record.id_error, Some(3.5));
    }

    #[test]
    fn test_empty_snapshot() {
        let snapshot = CalibrationSnapshot::new("ibm_test")
            .with_gate(GateDescriptor::new("sx", vec![0]).with_error(0.01));

        let day = normalize(&snapshot, day());

        assert!(day.is_empty());
        assert_eq!(day.issues.len(), 1);
    }

    #[test]
    fn test_records_dated() {
        let snapshot = CalibrationSnapshot::new("ibm_test").with_qubit_values(&[5.0]);
        let date = parse_date("2024-02-29").unwrap();
        assert_eq!(normalize(&snapshot, date).records[0].date, date);
    }
}
