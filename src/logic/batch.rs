// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Alexander Minges

//! Validate several candidates at once on a small worker pool.

use std::thread;

use crate::logic::validate::validate;
use crate::models::candidate::CandidateFile;
use crate::models::issue::ValidationReport;
use crate::models::policy::AcceptancePolicy;

/// Validate every file against `policy`, returning reports in input order.
///
/// Archive listing is the slow part, so files are fanned out to
/// `available_parallelism` workers (at least two) through a job channel.
pub fn validate_batch<F>(files: &[F], policy: &AcceptancePolicy) -> Vec<ValidationReport>
where
    F: CandidateFile + Sync,
{
    if files.is_empty() {
        return Vec::new();
    }

    let threads = thread::available_parallelism()
        .map(|n| n.get().max(2))
        .unwrap_or(2)
        .min(files.len());

    let (job_tx, job_rx) = crossbeam_channel::unbounded::<(usize, &F)>();
    let (done_tx, done_rx) = crossbeam_channel::unbounded::<(usize, ValidationReport)>();

    for job in files.iter().enumerate() {
        job_tx.send(job).ok();
    }
    drop(job_tx);

    thread::scope(|scope| {
        for _ in 0..threads {
            let job_rx = job_rx.clone();
            let done_tx = done_tx.clone();
            scope.spawn(move || {
                for (idx, file) in job_rx.iter() {
                    let _ = done_tx.send((idx, validate(file, policy)));
                }
            });
        }
    });
    drop(done_tx);

    let mut reports = vec![ValidationReport::default(); files.len()];
    for (idx, report) in done_rx.iter() {
        reports[idx] = report;
    }
    reports
}
