//! Core types for QCAL
//!
//! Gantree: L0_Foundation → CoreTypes

use crate::constants::walker::DATE_FORMAT;
use crate::error::{QcalError, QcalResult};
use chrono::{DateTime, NaiveDate, Utc};

// ============================================================================
// Type Aliases
// ============================================================================

/// Qubit identifier (0-indexed)
/// Gantree: QubitId // pub type QubitId = usize
pub type QubitId = usize;

// ============================================================================
// Date Helpers
// ============================================================================

/// Parse a calendar date in YYYY-MM-DD form
/// Gantree: parse_date(&str) -> QcalResult<NaiveDate> // 날짜 파싱
pub fn parse_date(s: &str) -> QcalResult<NaiveDate> {
    NaiveDate::parse_from_str(s.trim(), DATE_FORMAT).map_err(|_| QcalError::InvalidDate(s.to_string()))
}

/// Format a calendar date as YYYY-MM-DD
pub fn format_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

/// Midnight UTC of a calendar date, the instant requested from providers
pub fn start_of_day_utc(date: NaiveDate) -> DateTime<Utc> {
    date.and_time(chrono::NaiveTime::MIN).and_utc()
}
