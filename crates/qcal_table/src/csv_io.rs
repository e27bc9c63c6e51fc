//! CSV loading and export
//!
//! Gantree: L2_Table → CsvIo
//!
//! The header row is always the row type's fixed column set; loading a file
//! whose header differs is rejected instead of silently reshaped.

use crate::table::Table;
use qcal_core::{QcalError, QcalResult, TabularRow};
use serde::Serialize;
use std::fs::File;
use std::io::{Read, Write};
use std::path::Path;

/// Encode one row as its CSV line (no header)
pub(crate) fn encode_row<R: Serialize>(row: &R) -> QcalResult<Vec<u8>> {
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(Vec::new());
    writer.serialize(row)?;
    writer
        .into_inner()
        .map_err(|e| QcalError::CsvError(e.to_string()))
}

impl<R: TabularRow> Table<R> {
    // ========================================================================
    // Loading
    // ========================================================================

    /// Load a table from a CSV file
    /// Gantree: read_csv(path) -> QcalResult<Table> // CSV 로드
    pub fn read_csv(path: impl AsRef<Path>) -> QcalResult<Self> {
        let path = path.as_ref();
        let file = File::open(path)
            .map_err(|e| QcalError::FileError(format!("{}: {}", path.display(), e)))?;
        let table = Self::read_csv_from(file)?;
        log::info!("Loaded {} rows from {}", table.len(), path.display());
        Ok(table)
    }

    /// Load a table from any CSV reader
    pub fn read_csv_from<Rd: Read>(reader: Rd) -> QcalResult<Self> {
        let mut reader = csv::Reader::from_reader(reader);

        let headers = reader.headers()?.clone();
        if !headers.iter().eq(R::COLUMNS.iter().copied()) {
            return Err(QcalError::SchemaMismatch {
                expected: R::COLUMNS.join(", "),
                found: headers.iter().collect::<Vec<_>>().join(", "),
            });
        }

        let rows = reader
            .deserialize::<R>()
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self::from_rows(rows))
    }

    // ========================================================================
    // Export
    // ========================================================================

    /// Write the table to a CSV file
    /// Gantree: write_csv(path) // CSV 저장
    pub fn write_csv(&self, path: impl AsRef<Path>) -> QcalResult<()> {
        let path = path.as_ref();
        let file = File::create(path)
            .map_err(|e| QcalError::FileError(format!("{}: {}", path.display(), e)))?;
        self.write_csv_to(file)?;
        log::info!("Wrote {} rows to {}", self.len(), path.display());
        Ok(())
    }

    /// Write the table to any CSV writer
    ///
    /// The header is written even when the table is empty.
    pub fn write_csv_to<W: Write>(&self, writer: W) -> QcalResult<()> {
        let mut writer = csv::WriterBuilder::new()
            .has_headers(false)
            .from_writer(writer);

        writer.write_record(R::COLUMNS)?;
        for row in self.rows() {
            writer.serialize(row)?;
        }
        writer.flush()?;

        Ok(())
    }

    /// Render the table as CSV text
    pub fn to_csv_string(&self) -> QcalResult<String> {
        let mut buffer = Vec::new();
        self.write_csv_to(&mut buffer)?;
        String::from_utf8(buffer).map_err(|e| QcalError::CsvError(e.to_string()))
    }
}

// ============================================================================
// Tests
// ============================================================================
