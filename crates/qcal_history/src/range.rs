//! Inclusive date ranges
//!
//! Gantree: L3_History → DateRange
//!
//! `start, start + step, ...` up to and including `end`. A range whose end
//! precedes its start is empty.

use chrono::{Days, NaiveDate};
use qcal_core::{parse_date, QcalError, QcalResult};

/// Lazy ascending sequence of calendar days
/// Gantree: DateRange // 날짜 범위
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DateRange {
    next: Option<NaiveDate>,
    end: NaiveDate,
    step_days: u32,
}

impl DateRange {
    /// Create range; step must be at least one day
    /// Gantree: new(start,end,step) -> QcalResult<DateRange> // 생성
    pub fn new(start: NaiveDate, end: NaiveDate, step_days: u32) -> QcalResult<Self> {
        if step_days == 0 {
            return Err(QcalError::InvalidStep(step_days));
        }

        Ok(Self {
            next: (start <= end).then_some(start),
            end,
            step_days,
        })
    }

    /// Create range from `YYYY-MM-DD` strings
    pub fn parse(start: &str, end: &str, step_days: u32) -> QcalResult<Self> {
        Self::new(parse_date(start)?, parse_date(end)?, step_days)
    }

    /// Step in days
    pub fn step_days(&self) -> u32 {
        self.step_days
    }

    /// Days not yet yielded
    pub fn remaining(&self) -> usize {
        match self.next {
            Some(next) => ((self.end - next).num_days() / i64::from(self.step_days)) as usize + 1,
            None => 0,
        }
    }
}

impl Iterator for DateRange {
    type Item = NaiveDate;

    fn next(&mut self) -> Option<NaiveDate> {
        let current = self.next?;
        self.next = current
            .checked_add_days(Days::new(u64::from(self.step_days)))
            .filter(|d| *d <= self.end);
        Some(current)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let n = self.remaining();
        (n, Some(n))
    }
}

impl ExactSizeIterator for DateRange {}

impl std::iter::FusedIterator for DateRange {}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(s: &str) -> NaiveDate {
        parse_date(s).unwrap()
    }

    #[test]
    fn test_daily_range_inclusive() {
        let days: Vec<_> = DateRange::parse("2025-06-01", "2025-06-03", 1).unwrap().collect();
        assert_eq!(days, vec![date("2025-06-01"), date("2025-06-02"), date("2025-06-03")]);
    }

    #[test]
    fn test_visit_count_formula() {
        for (start, end, step) in [
            ("2025-01-01", "2025-01-31", 7),
            ("2025-01-01", "2025-01-29", 7),
            ("2024-02-27", "2024-03-02", 1),
            ("2025-06-01", "2025-06-01", 3),
        ] {
            let range = DateRange::parse(start, end, step).unwrap();
            let span = (date(end) - date(start)).num_days() as usize;
            let expected = span / step as usize + 1;

            assert_eq!(range.len(), expected);
            assert_eq!(range.count(), expected);
        }
    }

    #[test]
    fn test_end_before_start_is_empty() {
        let mut range = DateRange::parse("2025-06-03", "2025-06-01", 1).unwrap();
        assert_eq!(range.len(), 0);
        assert!(range.next().is_none());
    }

    #[test]
    fn test_zero_step_rejected() {
        assert_eq!(
            DateRange::parse("2025-06-01", "2025-06-03", 0).unwrap_err(),
            QcalError::InvalidStep(0)
        );
    }

    #[test]
    fn test_bad_date_rejected() {
        assert!(matches!(
            DateRange::parse("2025-13-01", "2025-06-03", 1),
            Err(QcalError::InvalidDate(_))
        ));
        assert!(matches!(
            DateRange::parse("2025-06-01", "June 3", 1),
            Err(QcalError::InvalidDate(_))
        ));
    }

    #[test]
    fn test_single_pass() {
        let mut range = DateRange::parse("2025-06-01", "2025-06-02", 1).unwrap();
        assert_eq!(range.by_ref().count(), 2);
        assert!(range.next().is_none());
    }
}
