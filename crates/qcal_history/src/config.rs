//! History extraction configuration
//!
//! Gantree: L3_History → HistoryConfig
//!
//! Backend, date window, step, pacing, and job listing limit for one run.

use crate::jobs::check_job_limit;
use crate::pacing::FixedDelay;
use crate::range::DateRange;
use chrono::NaiveDate;
use qcal_core::constants::walker::{DEFAULT_JOB_LIMIT, DEFAULT_PACING_MS, DEFAULT_STEP_DAYS};
use qcal_core::{format_date, parse_date, QcalError, QcalResult};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::Path;

/// Default backend name
pub const DEFAULT_BACKEND: &str = "ibm_sherbrooke";

/// Run configuration
/// Gantree: HistoryConfig // 추출 설정
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryConfig {
    // ========================================================================
    // Target
    // ========================================================================
    /// Backend name passed to the snapshot source
    pub backend: String,

    // ========================================================================
    // Date Window
    // ========================================================================
    /// First day (inclusive)
    pub start: NaiveDate,

    /// Last day (inclusive)
    pub end: NaiveDate,

    /// Days between requests
    #[serde(default = "default_step_days")]
    pub step_days: u32,

    // ========================================================================
    // Execution
    // ========================================================================
    /// Pause after every step (milliseconds)
    #[serde(default = "default_pacing_ms")]
    pub pacing_ms: u64,

    /// Maximum jobs listed for job metadata extraction
    #[serde(default = "default_job_limit")]
    pub job_limit: usize,
}

fn default_step_days() -> u32 {
    DEFAULT_STEP_DAYS
}

fn default_pacing_ms() -> u64 {
    DEFAULT_PACING_MS
}

fn default_job_limit() -> usize {
    DEFAULT_JOB_LIMIT
}

impl HistoryConfig {
    // ========================================================================
    // Constructors
    // ========================================================================

    /// Create configuration with default step, pacing, and job limit
    pub fn new(backend: impl Into<String>, start: NaiveDate, end: NaiveDate) -> Self {
        Self {
            backend: backend.into(),
            start,
            end,
            step_days: DEFAULT_STEP_DAYS,
            pacing_ms: DEFAULT_PACING_MS,
            job_limit: DEFAULT_JOB_LIMIT,
        }
    }

    /// Create configuration from `YYYY-MM-DD` strings
    pub fn parse(backend: impl Into<String>, start: &str, end: &str) -> QcalResult<Self> {
        Ok(Self::new(backend, parse_date(start)?, parse_date(end)?))
    }

    /// Load configuration from a JSON file
    pub fn from_json_file(path: impl AsRef<Path>) -> QcalResult<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .map_err(|e| QcalError::FileError(format!("{}: {}", path.display(), e)))?;
        let config: Self = serde_json::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    // ========================================================================
    // Builder Methods
    // ========================================================================

    /// Set backend
    pub fn with_backend(mut self, backend: impl Into<String>) -> Self {
        self.backend = backend.into();
        self
    }

    /// Set step in days
    pub fn with_step_days(mut self, step_days: u32) -> Self {
        self.step_days = step_days;
        self
    }

    /// Set pacing interval
    pub fn with_pacing_ms(mut self, pacing_ms: u64) -> Self {
        self.pacing_ms = pacing_ms;
        self
    }

    /// Disable pacing
    pub fn without_pacing(self) -> Self {
        self.with_pacing_ms(0)
    }

    /// Set job listing limit
    pub fn with_job_limit(mut self, job_limit: usize) -> Self {
        self.job_limit = job_limit;
        self
    }

    // ========================================================================
    // Conversions
    // ========================================================================

    /// Dates to visit
    pub fn date_range(&self) -> QcalResult<DateRange> {
        DateRange::new(self.start, self.end, self.step_days)
    }

    /// Pacing policy
    pub fn pacer(&self) -> FixedDelay {
        FixedDelay::from_millis(self.pacing_ms)
    }

    // ========================================================================
    // Validation
    // ========================================================================

    /// Validate the fields used by a calibration history walk
    pub fn validate(&self) -> QcalResult<()> {
        if self.backend.trim().is_empty() {
            return Err(QcalError::InvalidConfig("backend must not be empty".to_string()));
        }

        if self.step_days == 0 {
            return Err(QcalError::InvalidStep(self.step_days));
        }

        Ok(())
    }

    /// Validate the fields used by job metadata extraction
    pub fn validate_jobs(&self) -> QcalResult<()> {
        if self.backend.trim().is_empty() {
            return Err(QcalError::InvalidConfig("backend must not be empty".to_string()));
        }
        check_job_limit(self.job_limit)
    }
}

impl Default for HistoryConfig {
    fn default() -> Self {
        let today = chrono::Utc::now().date_naive();
        Self::new(DEFAULT_BACKEND, today, today)
    }
}

impl fmt::Display for HistoryConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "HistoryConfig({}, {}..={}, step={}d, pacing={}ms)",
            self.backend,
            format_date(self.start),
            format_date(self.end),
            self.step_days,
            self.pacing_ms
        )
    }
}

// ============================================================================
// Tests
// ============================================================================
