//! Export calibration history and job metadata to CSV
//!
//! Credentials are auto-detected (environment, then ~/.qiskit/qiskit-ibm.json).
//!
//! Usage:
//!   cargo run --example calibration_export -- <backend> <start> <end> [step_days]
//!   cargo run --example calibration_export -- ibm_sherbrooke 2025-06-01 2025-06-07
//!   cargo run --example calibration_export -- --jobs ibm_sherbrooke [limit]

use anyhow::{bail, Context};
use qcal_history::HistoryConfig;
use qcal_qiskit::prelude::*;

fn usage() -> anyhow::Result<()> {
    bail!(
        "usage: calibration_export <backend> <start> <end> [step_days]\n       \
         calibration_export --jobs <backend> [limit]"
    )
}

fn export_history(args: &[String]) -> anyhow::Result<()> {
    let [backend, start, end, rest @ ..] = args else {
        return usage();
    };

    let mut config = HistoryConfig::parse(backend.as_str(), start, end)?;
    if let Some(step) = rest.first() {
        config = config.with_step_days(step.parse().context("step_days must be an integer")?);
    }

    println!("Collecting {}", config);
    let report = fetch_calibration_history(None, &config)?;
    println!("{}", report);

    let table = report.table.drop_duplicates()?;
    println!("{}", table.overview()?);

    let path = format!("{}_calibration_{}_{}.csv", backend, start, end);
    table.write_csv(&path)?;
    println!("Saved {} rows to {}", table.len(), path);
    Ok(())
}

fn export_jobs(args: &[String]) -> anyhow::Result<()> {
    let [backend, rest @ ..] = args else {
        return usage();
    };
    let limit = match rest.first() {
        Some(limit) => limit.parse().context("limit must be an integer")?,
        None => qcal_core::constants::walker::DEFAULT_JOB_LIMIT,
    };

    let extraction = fetch_job_metadata(None, backend, limit)?;
    println!("{}", extraction);

    let table = extraction.table.drop_duplicates()?;
    println!("{}", table.overview()?);

    let path = format!("{}_jobs.csv", backend);
    table.write_csv(&path)?;
    println!("Saved {} rows to {}", table.len(), path);
    Ok(())
}

fn main() -> anyhow::Result<()> {
    let args: Vec<String> = std::env::args().skip(1).collect();

    match args.first().map(String::as_str) {
        Some("--jobs") => export_jobs(&args[1..]),
        Some(_) => export_history(&args),
        None => usage(),
    }
}
