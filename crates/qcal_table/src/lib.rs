//! # QCAL Table
//!
//! In-memory tables for calibration history and job metadata.
//!
//! ## Gantree Architecture
//!
//! ```text
//! qcal_table // L2: Table (완료)
//!     Table<R> // 고정 컬럼 테이블 (완료)
//!         concat(), drop_duplicates(), dates()
//!     CsvIo // CSV 로드/저장 (완료)
//!         read_csv(), write_csv()
//!     Overview // 데이터 개요 (완료)
//!         shape, missing, duplicated
//! ```
//!
//! ## Quick Start
//!
//! ```rust
//! use qcal_core::prelude::*;
//! use qcal_table::prelude::*;
//!
//! let date = parse_date("2025-06-01").unwrap();
//! let table = CalibrationTable::from_rows(vec![
//!     QubitDayRecord::empty(date, 0),
//!     QubitDayRecord::empty(date, 1),
//! ]);
//!
//! let csv = table.to_csv_string().unwrap();
//! let restored = CalibrationTable::read_csv_from(csv.as_bytes()).unwrap();
//! assert_eq!(restored.len(), 2);
//!
//! println!("{}", table.overview().unwrap());
//! ```

#![warn(missing_docs)]

// ============================================================================
// Module Declarations
// ============================================================================

/// Table container (Gantree: L2_Table → Table)
pub mod table;

/// CSV I/O (Gantree: L2_Table → CsvIo)
pub mod csv_io;

/// Data overview (Gantree: L2_Table → Overview)
pub mod overview;

// ============================================================================
// Re-exports
// ============================================================================

pub use overview::{ColumnSummary, TableOverview};
pub use table::{CalibrationTable, JobTable, Table};

// ============================================================================
// Prelude
// ============================================================================

/// Convenient imports for common use cases
pub mod prelude {
    //! Prelude module for convenient imports
    //!
    //! ```rust
    //! use qcal_table::prelude::*;
    //! ```

    pub use crate::overview::{ColumnSummary, TableOverview};
    pub use crate::table::{CalibrationTable, JobTable, Table};
}

// ============================================================================
// Integration Tests
// ============================================================================
