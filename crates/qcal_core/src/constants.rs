//! Constants for QCAL
//!
//! Gantree: L0_Foundation → Constants
//!
//! Output column names, upstream positional slots, gate naming rules,
//! and walker defaults.

// ============================================================================
// Output Columns
// Gantree: columns // 출력 컬럼
// ============================================================================

pub mod columns {
    //! Column headers of the calibration history table, in output order.

    /// Calendar day (YYYY-MM-DD)
    pub const DATE: &str = "date";
    /// Qubit index
    pub const QUBIT: &str = "qubit";
    /// T1 relaxation time
    pub const T1_US: &str = "T1 (us)";
    /// T2 dephasing time
    pub const T2_US: &str = "T2 (us)";
    /// Qubit frequency
    pub const FREQUENCY_GHZ: &str = "Frequency (GHz)";
    /// Qubit anharmonicity
    pub const ANHARMONICITY_GHZ: &str = "Anharmonicity (GHz)";
    /// Readout assignment error
    pub const READOUT_ERROR: &str = "Readout assignment error";
    /// P(measure 0 | prepare 1)
    pub const PROB_MEAS0_PREP1: &str = "Prob meas0 prep1";
    /// P(measure 1 | prepare 0)
    pub const PROB_MEAS1_PREP0: &str = "Prob meas1 prep0";
    /// Readout pulse length
    pub const READOUT_LENGTH_NS: &str = "Readout length (ns)";
    /// Identity gate error
    pub const ID_ERROR: &str = "ID error";
    /// Virtual Z rotation error
    pub const RZ_ERROR: &str = "Z-axis rotation (rz) error";
    /// Square-root-of-X gate error
    pub const SX_ERROR: &str = "√x (sx) error";
    /// Pauli-X gate error
    pub const X_ERROR: &str = "Pauli-X error";
    /// Echoed cross-resonance gate error
    pub const ECR_ERROR: &str = "ECR error";
    /// Last reported gate length
    pub const GATE_TIME_NS: &str = "Gate time (ns)";
    /// Operational flag
    pub const OPERATIONAL: &str = "Operational";

    /// All calibration columns in stable order
    pub const CALIBRATION: [&str; 17] = [
        DATE,
        QUBIT,
        T1_US,
        T2_US,
        FREQUENCY_GHZ,
        ANHARMONICITY_GHZ,
        READOUT_ERROR,
        PROB_MEAS0_PREP1,
        PROB_MEAS1_PREP0,
        READOUT_LENGTH_NS,
        ID_ERROR,
        RZ_ERROR,
        SX_ERROR,
        X_ERROR,
        ECR_ERROR,
        GATE_TIME_NS,
        OPERATIONAL,
    ];

    /// Job metadata columns in stable order
    pub const JOBS: [&str; 7] = [
        "job_id",
        "creation_date",
        "backend",
        "qubit_count",
        "duration",
        "shots",
        "success",
    ];
}

// ============================================================================
// Upstream Property Slots
// Gantree: slots // 위치 슬롯
// ============================================================================

pub mod slots {
    //! Positions inside a per-qubit property tuple.
    //! The positions are part of the provider contract, not looked up by name.

    /// Qubit frequency (GHz)
    pub const FREQUENCY: usize = 0;
    /// T1 (us)
    pub const T1: usize = 1;
    /// T2 (us)
    pub const T2: usize = 2;
    /// Anharmonicity (GHz)
    pub const ANHARMONICITY: usize = 3;
    /// Readout assignment error
    pub const READOUT_ERROR: usize = 4;
    /// P(meas 0 | prep 1)
    pub const PROB_MEAS0_PREP1: usize = 5;
    /// P(meas 1 | prep 0)
    pub const PROB_MEAS1_PREP0: usize = 6;
    /// Readout length (ns)
    pub const READOUT_LENGTH: usize = 7;
}

// ============================================================================
// Gate Parameters
// Gantree: gates // 게이트 규칙
// ============================================================================

pub mod gates {
    //! Gate parameter names and gate-name matching fragments.

    /// Parameter carrying the gate error probability
    pub const GATE_ERROR: &str = "gate_error";

    /// Parameter carrying the gate duration
    pub const GATE_LENGTH: &str = "gate_length";

    /// Identity gate fragment (substring match)
    pub const ID: &str = "id";
    /// RZ gate fragment (substring match)
    pub const RZ: &str = "rz";
    /// SX gate fragment (substring match)
    pub const SX: &str = "sx";
    /// Pauli-X gate name (exact match only; "sx" contains "x")
    pub const X: &str = "x";
    /// ECR gate fragment (substring match)
    pub const ECR: &str = "ecr";

    /// Per-qubit property name of the dedicated readout channel
    pub const READOUT_ERROR_PROPERTY: &str = "readout_error";
}

// ============================================================================
// Walker Defaults
// Gantree: walker // 기본값
// ============================================================================

pub mod walker {
    //! Defaults for the date-range walker.

    /// Date format accepted and produced by the walker
    pub const DATE_FORMAT: &str = "%Y-%m-%d";

    /// Default pause between steps (milliseconds)
    pub const DEFAULT_PACING_MS: u64 = 1000;

    /// Default step (days)
    pub const DEFAULT_STEP_DAYS: u32 = 1;

    /// Default job listing limit
    pub const DEFAULT_JOB_LIMIT: usize = 500;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_calibration_columns_unique() {
        let mut seen = std::collections::HashSet::new();
        for col in columns::CALIBRATION {
            assert!(seen.insert(col), "duplicate column {col}");
        }
    }

    #[test]
    fn test_identity_columns_first() {
        assert_eq!(columns::CALIBRATION[0], columns::DATE);
        assert_eq!(columns::CALIBRATION[1], columns::QUBIT);
    }
}
