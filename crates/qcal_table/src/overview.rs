//! Data overview
//!
//! Gantree: L2_Table → Overview
//!
//! Structural summary of a table: shape, columns, kinds, missing values,
//! duplicated rows, and non-null counts.

use crate::table::Table;
use qcal_core::{ColumnKind, QcalResult, TabularRow};
use std::fmt;

/// Number of rows rendered in the head section
pub const HEAD_ROWS: usize = 5;

/// Per-column statistics
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnSummary {
    /// Column name
    pub name: &'static str,

    /// Column kind
    pub kind: ColumnKind,

    /// Null cells
    pub missing: usize,

    /// Non-null cells
    pub non_null: usize,
}

/// Table overview
/// Gantree: TableOverview // 데이터 개요
#[derive(Debug, Clone, PartialEq)]
pub struct TableOverview {
    /// Row count
    pub rows: usize,

    /// Per-column statistics in column order
    pub columns: Vec<ColumnSummary>,

    /// Rows repeating an earlier row
    pub duplicated_rows: usize,

    /// First rows as CSV text (header included)
    pub head: String,
}

impl TableOverview {
    /// (rows, columns)
    pub fn shape(&self) -> (usize, usize) {
        (self.rows, self.columns.len())
    }

    /// Column names in order
    pub fn column_names(&self) -> Vec<&'static str> {
        self.columns.iter().map(|c| c.name).collect()
    }

    /// Total null cells
    pub fn total_missing(&self) -> usize {
        self.columns.iter().map(|c| c.missing).sum()
    }

    /// Summary for one column
    pub fn column(&self, name: &str) -> Option<&ColumnSummary> {
        self.columns.iter().find(|c| c.name == name)
    }
}

impl<R: TabularRow> Table<R> {
    /// Build the overview report
    /// Gantree: overview() -> TableOverview // 개요
    pub fn overview(&self) -> QcalResult<TableOverview> {
        let mut missing = vec![0usize; R::COLUMNS.len()];

        for row in self.rows() {
            for (count, is_null) in missing.iter_mut().zip(row.null_mask()) {
                if is_null {
                    *count += 1;
                }
            }
        }

        let columns = R::COLUMNS
            .iter()
            .zip(R::column_kinds())
            .zip(missing)
            .map(|((&name, &kind), missing)| ColumnSummary {
                name,
                kind,
                missing,
                non_null: self.len() - missing,
            })
            .collect();

        let head = Table::from_rows(self.head(HEAD_ROWS).to_vec()).to_csv_string()?;

        Ok(TableOverview {
            rows: self.len(),
            columns,
            duplicated_rows: self.duplicate_count()?,
            head,
        })
    }
}

impl fmt::Display for TableOverview {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Head")?;
        writeln!(f, "{}", self.head)?;

        writeln!(f, "Shape")?;
        writeln!(f, "({}, {})\n", self.rows, self.columns.len())?;

        writeln!(f, "Columns")?;
        writeln!(f, "{:?}\n", self.column_names())?;

        writeln!(f, "Data Types")?;
        for c in &self.columns {
            writeln!(f, "  {:<28} {}", c.name, c.kind)?;
        }
        writeln!(f)?;

        writeln!(f, "Missing Values")?;
        for c in &self.columns {
            writeln!(f, "  {:<28} {}", c.name, c.missing)?;
        }
        writeln!(f)?;

        writeln!(f, "Duplicated Rows")?;
        writeln!(f, "{}\n", self.duplicated_rows)?;

        writeln!(f, "Info")?;
        writeln!(f, "  {} entries, {} columns", self.rows, self.columns.len())?;
        for (i, c) in self.columns.iter().enumerate() {
            writeln!(f, "  {:>2}  {:<28} {} non-null  {}", i, c.name, c.non_null, c.kind)?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::CalibrationTable;
    use qcal_core::constants::columns;
    use qcal_core::{parse_date, QubitDayRecord};

    fn table() -> CalibrationTable {
        let date = parse_date("2025-06-01").unwrap();
        let mut q0 = QubitDayRecord::empty(date, 0);
        q0.t1_us = Some(100.0);
        q0.operational = Some(1);
        let mut q1 = QubitDayRecord::empty(date, 1);
        q1.operational = Some(1);

        Table::from_rows(vec![q0.clone(), q1, q0])
    }

    #[test]
    fn test_overview_counts() {
        let overview = table().overview().unwrap();

        assert_eq!(overview.shape(), (3, 17));
        assert_eq!(overview.duplicated_rows, 1);

        let t1 = overview.column(columns::T1_US).unwrap();
        assert_eq!(t1.missing, 1);
        assert_eq!(t1.non_null, 2);

        let date = overview.column(columns::DATE).unwrap();
        assert_eq!(date.missing, 0);
        assert_eq!(date.kind, ColumnKind::Date);
    }

    #[test]
    fn test_overview_empty_table() {
        let overview = CalibrationTable::new().overview().unwrap();
        assert_eq!(overview.rows, 0);
        assert_eq!(overview.total_missing(), 0);
        assert_eq!(overview.duplicated_rows, 0);
    }

    #[test]
    fn test_overview_display_sections() {
        let text = table().overview().unwrap().to_string();
        for section in ["Shape", "Columns", "Data Types", "Missing Values", "Duplicated Rows"] {
            assert!(text.contains(section), "missing section {section}");
        }
        assert!(text.contains("(3, 17)"));
    }
}
