//! Qubit-day calibration record
//!
//! Gantree: L1_Records → QubitDayRecord
//!
//! One output row of the calibration history table, keyed by
//! `(date, qubit)`. Every non-key field is nullable: `None` means the
//! provider did not report that value for that day.

use crate::constants::columns;
use crate::row::{ColumnKind, TabularRow};
use crate::types::{format_date, QubitId};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Error columns filled from gate descriptors
/// Gantree: GateErrorColumn // 게이트 에러 컬럼
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GateErrorColumn {
    /// Identity gate
    Id,
    /// Virtual Z rotation
    Rz,
    /// Square root of X
    Sx,
    /// Pauli-X
    X,
    /// Echoed cross-resonance
    Ecr,
}

impl GateErrorColumn {
    /// Output column header
    pub fn column(&self) -> &'static str {
        match self {
            GateErrorColumn::Id => columns::ID_ERROR,
            GateErrorColumn::Rz => columns::RZ_ERROR,
            GateErrorColumn::Sx => columns::SX_ERROR,
            GateErrorColumn::X => columns::X_ERROR,
            GateErrorColumn::Ecr => columns::ECR_ERROR,
        }
    }
}

/// One row per (date, qubit)
/// Gantree: QubitDayRecord // 출력 행
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QubitDayRecord {
    /// Calendar day
    #[serde(rename = "date")]
    pub date: NaiveDate,

    /// Qubit index
    #[serde(rename = "qubit")]
    pub qubit: QubitId,

    /// T1 relaxation time (us)
    #[serde(rename = "T1 (us)")]
    pub t1_us: Option<f64>,

    /// T2 dephasing time (us)
    #[serde(rename = "T2 (us)")]
    pub t2_us: Option<f64>,

    /// Qubit frequency (GHz)
    #[serde(rename = "Frequency (GHz)")]
    pub frequency_ghz: Option<f64>,

    /// Anharmonicity (GHz)
    #[serde(rename = "Anharmonicity (GHz)")]
    pub anharmonicity_ghz: Option<f64>,

    /// Readout assignment error
    #[serde(rename = "Readout assignment error")]
    pub readout_error: Option<f64>,

    /// P(measure 0 | prepare 1)
    #[serde(rename = "Prob meas0 prep1")]
    pub prob_meas0_prep1: Option<f64>,

    /// P(measure 1 | prepare 0)
    #[serde(rename = "Prob meas1 prep0")]
    pub prob_meas1_prep0: Option<f64>,

    /// Readout length (ns)
    #[serde(rename = "Readout length (ns)")]
    pub readout_length_ns: Option<f64>,

    /// Identity gate error
    #[serde(rename = "ID error")]
    pub id_error: Option<f64>,

    /// RZ gate error
    #[serde(rename = "Z-axis rotation (rz) error")]
    pub rz_error: Option<f64>,

    /// SX gate error
    #[serde(rename = "√x (sx) error")]
    pub sx_error: Option<f64>,

    /// Pauli-X gate error
    #[serde(rename = "Pauli-X error")]
    pub x_error: Option<f64>,

    /// ECR gate error
    #[serde(rename = "ECR error")]
    pub ecr_error: Option<f64>,

    /// Last reported gate length touching this qubit (ns)
    #[serde(rename = "Gate time (ns)")]
    pub gate_time_ns: Option<f64>,

    /// 1 when the qubit appears in the properties list
    #[serde(rename = "Operational")]
    pub operational: Option<u8>,
}

impl QubitDayRecord {
    /// Create record with every non-key field null
    pub fn empty(date: NaiveDate, qubit: QubitId) -> Self {
        Self {
            date,
            qubit,
            t1_us: None,
            t2_us: None,
            frequency_ghz: None,
            anharmonicity_ghz: None,
            readout_error: None,
            prob_meas0_prep1: None,
            prob_meas1_prep0: None,
            readout_length_ns: None,
            id_error: None,
            rz_error: None,
            sx_error: None,
            x_error: None,
            ecr_error: None,
            gate_time_ns: None,
            operational: None,
        }
    }

    /// Primary key
    pub fn key(&self) -> (NaiveDate, QubitId) {
        (self.date, self.qubit)
    }

    /// Gate error value for a column
    pub fn gate_error(&self, column: GateErrorColumn) -> Option<f64> {
        match column {
            GateErrorColumn::Id => self.id_error,
            GateErrorColumn::Rz => self.rz_error,
            GateErrorColumn::Sx => self.sx_error,
            GateErrorColumn::X => self.x_error,
            GateErrorColumn::Ecr => self.ecr_error,
        }
    }

    /// Overwrite a gate error column
    pub fn set_gate_error(&mut self, column: GateErrorColumn, value: f64) {
        let slot = match column {
            GateErrorColumn::Id => &mut self.id_error,
            GateErrorColumn::Rz => &mut self.rz_error,
            GateErrorColumn::Sx => &mut self.sx_error,
            GateErrorColumn::X => &mut self.x_error,
            GateErrorColumn::Ecr => &mut self.ecr_error,
        };
        *slot = Some(value);
    }

    /// Check if the qubit is flagged operational
    pub fn is_operational(&self) -> bool {
        self.operational == Some(1)
    }
}

impl TabularRow for QubitDayRecord {
    const COLUMNS: &'static [&'static str] = &columns::CALIBRATION;

    fn column_kinds() -> &'static [ColumnKind] {
        use ColumnKind::*;
        &[
            Date, Integer, Float, Float, Float, Float, Float, Float, Float, Float, Float, Float,
            Float, Float, Float, Float, Integer,
        ]
    }

    fn null_mask(&self) -> Vec<bool> {
        vec![
            false,
            false,
            self.t1_us.is_none(),
            self.t2_us.is_none(),
            self.frequency_ghz.is_none(),
            self.anharmonicity_ghz.is_none(),
            self.readout_error.is_none(),
            self.prob_meas0_prep1.is_none(),
            self.prob_meas1_prep0.is_none(),
            self.readout_length_ns.is_none(),
            self.id_error.is_none(),
            self.rz_error.is_none(),
            self.sx_error.is_none(),
            self.x_error.is_none(),
            self.ecr_error.is_none(),
            self.gate_time_ns.is_none(),
            self.operational.is_none(),
        ]
    }
}

impl fmt::Display for QubitDayRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "QubitDayRecord({}, q{}, T1={:?}, T2={:?}, RO={:?})",
            format_date(self.date),
            self.qubit,
            self.t1_us,
            self.t2_us,
            self.readout_error
        )
    }
}
