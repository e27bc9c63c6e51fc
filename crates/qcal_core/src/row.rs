//! Tabular row contract
//!
//! Gantree: L1_Records → TabularRow
//!
//! Row types with a fixed, stable column set. The serde field names of an
//! implementing type must match `COLUMNS` in order, so CSV headers and the
//! column list never drift apart.

use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fmt;

/// Value kind of a column, reported by table overviews
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnKind {
    /// Calendar date
    Date,
    /// Timestamp with timezone
    Timestamp,
    /// Free text
    Text,
    /// Integer
    Integer,
    /// Floating point
    Float,
}

impl fmt::Display for ColumnKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ColumnKind::Date => "date",
            ColumnKind::Timestamp => "timestamp",
            ColumnKind::Text => "text",
            ColumnKind::Integer => "int64",
            ColumnKind::Float => "float64",
        };
        f.write_str(name)
    }
}

/// Row with a fixed column set
/// Gantree: TabularRow // trait
pub trait TabularRow: Clone + Serialize + DeserializeOwned {
    /// Column names in output order
    const COLUMNS: &'static [&'static str];

    /// Column kinds, aligned with `COLUMNS`
    fn column_kinds() -> &'static [ColumnKind];

    /// Per-column null flags, aligned with `COLUMNS`
    fn null_mask(&self) -> Vec<bool>;
}
