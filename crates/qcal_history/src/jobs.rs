//! Job metadata extraction
//!
//! Gantree: L3_History → Jobs
//!
//! One row per (job, experiment result). A job whose id, creation date,
//! backend, or result cannot be read is skipped whole; an experiment whose
//! header is malformed is skipped alone.

use crate::source::{JobHandle, JobSource};
use chrono::{DateTime, Utc};
use qcal_core::{ExperimentResult, JobOutput, JobRecord, QcalError, QcalResult};
use qcal_table::JobTable;
use std::fmt;

/// Job rows plus skip counters
/// Gantree: JobExtraction // 작업 추출 결과
#[derive(Debug, Clone, PartialEq)]
pub struct JobExtraction {
    /// One row per (job, experiment result)
    pub table: JobTable,

    /// Jobs listed
    pub listed_jobs: usize,

    /// Jobs skipped because their metadata could not be read
    pub skipped_jobs: usize,

    /// Experiments skipped inside otherwise readable jobs
    pub skipped_experiments: usize,
}

impl fmt::Display for JobExtraction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "JobExtraction({} rows from {} jobs, {} jobs skipped, {} experiments skipped)",
            self.table.len(),
            self.listed_jobs,
            self.skipped_jobs,
            self.skipped_experiments
        )
    }
}

/// Common job fields shared by every experiment row
struct JobHeader {
    job_id: String,
    creation_date: DateTime<Utc>,
    backend: String,
}

/// Reject a zero job listing limit
pub fn check_job_limit(limit: usize) -> QcalResult<()> {
    if limit == 0 {
        return Err(QcalError::InvalidConfig("job_limit must be > 0".to_string()));
    }
    Ok(())
}

/// List up to `limit` jobs on `backend` and flatten their results
///
/// Only a failure of the listing itself is returned as an error.
/// Gantree: extract_job_records(source,backend,limit) -> QcalResult<JobExtraction> // 작업 추출
pub fn extract_job_records<S: JobSource>(
    source: &S,
    backend: &str,
    limit: usize,
) -> QcalResult<JobExtraction> {
    check_job_limit(limit)?;
    let mut jobs = source.jobs(backend, limit)?;
    jobs.truncate(limit);

    let mut extraction = JobExtraction {
        table: JobTable::new(),
        listed_jobs: jobs.len(),
        skipped_jobs: 0,
        skipped_experiments: 0,
    };

    for job in &jobs {
        let (header, output) = match read_job(job) {
            Ok(read) => read,
            Err(e) => {
                log::warn!("Skipping job: {}", e);
                extraction.skipped_jobs += 1;
                continue;
            }
        };

        for experiment in &output.results {
            match experiment_record(&header, experiment) {
                Ok(record) => extraction.table.push(record),
                Err(e) => {
                    log::warn!("Skipping experiment in job {}: {}", header.job_id, e);
                    extraction.skipped_experiments += 1;
                }
            }
        }
    }

    log::info!("{}", extraction);
    Ok(extraction)
}

fn read_job<J: JobHandle>(job: &J) -> QcalResult<(JobHeader, JobOutput)> {
    let header = JobHeader {
        job_id: job.job_id()?,
        creation_date: job.creation_date()?,
        backend: job.backend_name()?,
    };
    let output = job.result()?;
    Ok((header, output))
}

fn experiment_record(header: &JobHeader, experiment: &ExperimentResult) -> QcalResult<JobRecord> {
    experiment.ensure_decoded()?;
    Ok(JobRecord {
        job_id: header.job_id.clone(),
        creation_date: header.creation_date,
        backend: header.backend.clone(),
        qubit_count: experiment.qubit_count()?,
        duration: experiment.duration()?,
        shots: experiment.shots,
        success: experiment.status.clone(),
    })
}

// ============================================================================
// Tests
// ============================================================================
