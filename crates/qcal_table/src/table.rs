//! In-memory tables
//!
//! Gantree: L2_Table → Table
//!
//! Ordered rows of a fixed-shape record type. The row index is positional,
//! so it is always `0..len` after any operation that removes rows.

use crate::csv_io::encode_row;
use chrono::NaiveDate;
use qcal_core::{JobRecord, QcalResult, QubitDayRecord, QubitId, TabularRow};
use std::collections::{BTreeSet, HashSet};
use std::fmt;

/// Calibration history table
pub type CalibrationTable = Table<QubitDayRecord>;

/// Job metadata table
pub type JobTable = Table<JobRecord>;

/// Ordered rows with a fixed column set
/// Gantree: Table<R> // 테이블
#[derive(Debug, Clone, PartialEq)]
pub struct Table<R: TabularRow> {
    /// Rows in output order
    /// Gantree: rows: Vec<R> // 행
    rows: Vec<R>,
}

impl<R: TabularRow> Table<R> {
    // ========================================================================
    // Constructors
    // ========================================================================

    /// Create empty table
    pub fn new() -> Self {
        Self { rows: Vec::new() }
    }

    /// Create table from rows, keeping their order
    pub fn from_rows(rows: Vec<R>) -> Self {
        Self { rows }
    }

    /// Concatenate row groups in order
    /// Gantree: concat(parts) -> Table // 결합
    pub fn concat<I>(parts: I) -> Self
    where
        I: IntoIterator<Item = Vec<R>>,
    {
        let rows = parts.into_iter().flatten().collect();
        Self { rows }
    }

    // ========================================================================
    // Mutation
    // ========================================================================

    /// Append one row
    pub fn push(&mut self, row: R) {
        self.rows.push(row);
    }

    /// Append a group of rows
    pub fn extend<I: IntoIterator<Item = R>>(&mut self, rows: I) {
        self.rows.extend(rows);
    }

    // ========================================================================
    // Accessors
    // ========================================================================

    /// Rows in order
    pub fn rows(&self) -> &[R] {
        &self.rows
    }

    /// Take ownership of the rows
    pub fn into_rows(self) -> Vec<R> {
        self.rows
    }

    /// Row at positional index
    pub fn get(&self, index: usize) -> Option<&R> {
        self.rows.get(index)
    }

    /// Iterate `(index, row)` pairs
    pub fn iter(&self) -> impl Iterator<Item = (usize, &R)> {
        self.rows.iter().enumerate()
    }

    /// Number of rows
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Check if table has no rows
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Column names in output order
    pub fn columns(&self) -> &'static [&'static str] {
        R::COLUMNS
    }

    /// (rows, columns)
    pub fn shape(&self) -> (usize, usize) {
        (self.rows.len(), R::COLUMNS.len())
    }

    /// First `n` rows
    pub fn head(&self, n: usize) -> &[R] {
        &self.rows[..n.min(self.rows.len())]
    }

    // ========================================================================
    // Duplicates
    // ========================================================================

    /// Flag rows that repeat an earlier row cell for cell
    ///
    /// Rows are compared by their encoded CSV cells, so a NaN equals another
    /// NaN and never equals a null.
    pub fn duplicated(&self) -> QcalResult<Vec<bool>> {
        let mut seen = HashSet::with_capacity(self.rows.len());
        let mut flags = Vec::with_capacity(self.rows.len());

        for row in &self.rows {
            let key = encode_row(row)?;
            flags.push(!seen.insert(key));
        }

        Ok(flags)
    }

    /// Count of rows flagged by [`Table::duplicated`]
    pub fn duplicate_count(&self) -> QcalResult<usize> {
        Ok(self.duplicated()?.into_iter().filter(|&d| d).count())
    }

    /// Remove duplicate rows, keeping the first occurrence
    /// Gantree: drop_duplicates() -> Table // 중복 제거
    pub fn drop_duplicates(&self) -> QcalResult<Self> {
        let flags = self.duplicated()?;
        let rows = self
            .rows
            .iter()
            .zip(flags)
            .filter(|(_, dup)| !dup)
            .map(|(row, _)| row.clone())
            .collect();

        Ok(Self { rows })
    }
}

impl<R: TabularRow> Default for Table<R> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: TabularRow> FromIterator<R> for Table<R> {
    fn from_iter<I: IntoIterator<Item = R>>(iter: I) -> Self {
        Self {
            rows: iter.into_iter().collect(),
        }
    }
}

impl<R: TabularRow> IntoIterator for Table<R> {
    type Item = R;
    type IntoIter = std::vec::IntoIter<R>;

    fn into_iter(self) -> Self::IntoIter {
        self.rows.into_iter()
    }
}

// ============================================================================
// Calibration Table Helpers
// ============================================================================

impl Table<QubitDayRecord> {
    /// Distinct dates present, ascending
    pub fn dates(&self) -> Vec<NaiveDate> {
        self.rows
            .iter()
            .map(|r| r.date)
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    /// Rows for one date
    pub fn rows_for_date(&self, date: NaiveDate) -> Vec<&QubitDayRecord> {
        self.rows.iter().filter(|r| r.date == date).collect()
    }

    /// Row for one (date, qubit) key
    pub fn find(&self, date: NaiveDate, qubit: QubitId) -> Option<&QubitDayRecord> {
        self.rows.iter().find(|r| r.key() == (date, qubit))
    }

    /// Check that no (date, qubit) key appears twice
    pub fn has_unique_keys(&self) -> bool {
        let mut keys = HashSet::with_capacity(self.rows.len());
        self.rows.iter().all(|r| keys.insert(r.key()))
    }
}

impl<R: TabularRow> fmt::Display for Table<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Table({} rows x {} columns)", self.len(), R::COLUMNS.len())
    }
}

// ============================================================================
// Tests
// ============================================================================
