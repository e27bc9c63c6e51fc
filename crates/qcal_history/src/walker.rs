//! Date-range walker
//!
//! Gantree: L3_History → Walker
//!
//! Visits each date of a range, fetches the snapshot in effect at midnight
//! UTC, normalizes it, and accumulates the rows. A failed fetch drops that
//! day and the walk continues; only invalid walk parameters are fatal.

use crate::cancel::CancelToken;
use crate::config::HistoryConfig;
use crate::normalizer::{normalize, IngestIssue};
use crate::pacing::{FixedDelay, Pacer};
use crate::range::DateRange;
use crate::source::SnapshotSource;
use chrono::NaiveDate;
use qcal_core::{format_date, start_of_day_utc, QcalError, QcalResult, QubitDayRecord};
use qcal_table::CalibrationTable;
use std::fmt;

// ============================================================================
// Outcomes
// ============================================================================

/// Result of one visited date
/// Gantree: DayOutcome // 일별 처리 결과
#[derive(Debug, Clone, PartialEq)]
pub enum DayOutcome {
    /// Snapshot fetched and normalized
    Collected {
        /// Visited date
        date: NaiveDate,
        /// Records contributed
        rows: usize,
        /// Updates rejected during normalization
        issues: Vec<IngestIssue>,
    },

    /// Fetch failed; the date contributes no rows
    Failed {
        /// Visited date
        date: NaiveDate,
        /// Fetch error
        error: QcalError,
    },
}

impl DayOutcome {
    /// Visited date
    pub fn date(&self) -> NaiveDate {
        match self {
            DayOutcome::Collected { date, .. } | DayOutcome::Failed { date, .. } => *date,
        }
    }

    /// Rows contributed (zero for failed days)
    pub fn rows(&self) -> usize {
        match self {
            DayOutcome::Collected { rows, .. } => *rows,
            DayOutcome::Failed { .. } => 0,
        }
    }

    /// Check if the fetch failed
    pub fn is_failed(&self) -> bool {
        matches!(self, DayOutcome::Failed { .. })
    }
}

impl fmt::Display for DayOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DayOutcome::Collected { date, rows, issues } => write!(
                f,
                "{}: {} rows, {} issues",
                format_date(*date),
                rows,
                issues.len()
            ),
            DayOutcome::Failed { date, error } => {
                write!(f, "{}: failed ({})", format_date(*date), error)
            }
        }
    }
}

/// Assembled table plus per-date outcomes
/// Gantree: HistoryReport // 수집 결과
#[derive(Debug, Clone, PartialEq)]
pub struct HistoryReport {
    /// Rows of all collected dates, date then qubit order
    pub table: CalibrationTable,

    /// One entry per visited date, in visit order
    pub outcomes: Vec<DayOutcome>,

    /// Dates skipped because the walk was cancelled
    pub not_visited: usize,
}

impl HistoryReport {
    /// Check if the walk stopped before the end of the range
    pub fn is_cancelled(&self) -> bool {
        self.not_visited > 0
    }

    /// Dates whose fetch failed
    pub fn failed_dates(&self) -> Vec<NaiveDate> {
        self.outcomes
            .iter()
            .filter(|o| o.is_failed())
            .map(DayOutcome::date)
            .collect()
    }

    /// Number of collected dates
    pub fn collected_days(&self) -> usize {
        self.outcomes.iter().filter(|o| !o.is_failed()).count()
    }

    /// All ingest issues, in visit order
    pub fn issues(&self) -> impl Iterator<Item = (NaiveDate, &IngestIssue)> {
        self.outcomes.iter().flat_map(|o| match o {
            DayOutcome::Collected { date, issues, .. } => {
                issues.iter().map(|i| (*date, i)).collect::<Vec<_>>()
            }
            DayOutcome::Failed { .. } => Vec::new(),
        })
    }
}

impl fmt::Display for HistoryReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "HistoryReport({} rows, {} collected, {} failed, {} not visited)",
            self.table.len(),
            self.collected_days(),
            self.outcomes.len() - self.collected_days(),
            self.not_visited
        )
    }
}

// ============================================================================
// Walker
// ============================================================================

/// Calibration history walker over a snapshot source
/// Gantree: CalibrationHistory // 범위 수집기
pub struct CalibrationHistory<S, P = FixedDelay> {
    source: S,
    pacer: P,
    cancel: CancelToken,
}

impl<S: SnapshotSource> CalibrationHistory<S, FixedDelay> {
    /// Create walker with the default one-second pacing
    pub fn new(source: S) -> Self {
        Self {
            source,
            pacer: FixedDelay::default(),
            cancel: CancelToken::new(),
        }
    }
}

impl<S: SnapshotSource, P: Pacer> CalibrationHistory<S, P> {
    /// Replace the pacing policy
    pub fn with_pacer<Q: Pacer>(self, pacer: Q) -> CalibrationHistory<S, Q> {
        CalibrationHistory {
            source: self.source,
            pacer,
            cancel: self.cancel,
        }
    }

    /// Share an existing cancellation token
    pub fn with_cancel_token(mut self, cancel: CancelToken) -> Self {
        self.cancel = cancel;
        self
    }

    /// Token that stops this walker
    pub fn cancel_token(&self) -> CancelToken {
        self.cancel.clone()
    }

    /// Underlying snapshot source
    pub fn source(&self) -> &S {
        &self.source
    }

    /// Walk `range` for `backend`
    /// Gantree: collect(backend,range) -> HistoryReport // 범위 순회
    pub fn collect(&self, backend: &str, range: DateRange) -> HistoryReport {
        let total = range.len();
        let mut parts = Vec::with_capacity(total);
        let mut outcomes = Vec::with_capacity(total);

        for (visited, date) in range.enumerate() {
            if self.cancel.is_cancelled() {
                log::info!("Walk cancelled before {}", format_date(date));
                return Self::finish(parts, outcomes, total - visited);
            }

            let outcome = match self.source.snapshot_at(backend, start_of_day_utc(date)) {
                Ok(snapshot) => {
                    let day = normalize(&snapshot, date);
                    for issue in &day.issues {
                        log::warn!("{}: {}", format_date(date), issue);
                    }
                    log::info!(
                        "{}: collected {} qubits from {}",
                        format_date(date),
                        day.len(),
                        backend
                    );

                    let outcome = DayOutcome::Collected {
                        date,
                        rows: day.len(),
                        issues: day.issues,
                    };
                    parts.push(day.records);
                    outcome
                }
                Err(error) => {
                    log::warn!("{}: skipping day, {}", format_date(date), error);
                    DayOutcome::Failed { date, error }
                }
            };
            outcomes.push(outcome);

            self.pacer.pause();
        }

        Self::finish(parts, outcomes, 0)
    }

    /// Walk the window described by `config`
    pub fn run(&self, config: &HistoryConfig) -> QcalResult<HistoryReport> {
        config.validate()?;
        let range = config.date_range()?;
        Ok(self.collect(&config.backend, range))
    }

    fn finish(
        parts: Vec<Vec<QubitDayRecord>>,
        outcomes: Vec<DayOutcome>,
        not_visited: usize,
    ) -> HistoryReport {
        let report = HistoryReport {
            table: CalibrationTable::concat(parts),
            outcomes,
            not_visited,
        };
        log::info!("{}", report);
        report
    }
}

// ============================================================================
// Convenience
// ============================================================================

/// Walk the configured window with the configured pacing
/// Gantree: collect_history(source,config) -> QcalResult<HistoryReport> // 설정 기반 수집
pub fn collect_history<S: SnapshotSource>(
    source: S,
    config: &HistoryConfig,
) -> QcalResult<HistoryReport> {
    CalibrationHistory::new(source)
        .with_pacer(config.pacer())
        .run(config)
}

/// Calibration history table for `YYYY-MM-DD` bounds
///
/// Invalid dates or a zero step fail before any fetch.
pub fn load_calibration_history<S: SnapshotSource>(
    source: S,
    backend: &str,
    start: &str,
    end: &str,
    step_days: u32,
) -> QcalResult<CalibrationTable> {
    let range = DateRange::parse(start, end, step_days)?;
    Ok(CalibrationHistory::new(source).collect(backend, range).table)
}

// ============================================================================
// Tests
// ============================================================================
