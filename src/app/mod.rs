// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Alexander Minges

//! Command-line entry point: validate uploads from disk and report the outcome.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use serde::Serialize;
use tracing::Level;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, fmt};

use crate::logic::batch::validate_batch;
use crate::models::candidate::{CandidateFile, DiskFile};
use crate::models::issue::ValidationReport;
use crate::models::policy::AcceptancePolicy;

#[derive(Parser, Debug)]
#[command(name = "upload-guard")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Check uploads by declared type, size, and zip contents", long_about = None)]
pub struct Cli {
    /// Enable debug logging (overridden by RUST_LOG)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Validate one or more files
    Check(CheckArgs),

    /// Print the accept attribute for a policy
    Accept {
        /// Comma-separated kind names
        #[arg(long, default_value = "json,zip")]
        accept: String,
    },
}

#[derive(Args, Debug)]
pub struct CheckArgs {
    /// Files to validate
    #[arg(required = true)]
    pub files: Vec<PathBuf>,

    /// Comma-separated kind names to accept
    #[arg(long, default_value = "json,zip")]
    pub accept: String,

    /// JSON policy file (array of {name, extension, mime}); overrides --accept
    #[arg(long)]
    pub policy: Option<PathBuf>,

    /// Declared MIME type for every file instead of guessing from its name
    #[arg(long)]
    pub mime: Option<String>,

    /// Emit a JSON report instead of text
    #[arg(long)]
    pub json: bool,
}

/// Per-file entry of the JSON report.
#[derive(Serialize)]
struct FileOutcome<'a> {
    path: &'a Path,
    mime: &'a str,
    accepted: bool,
    issues: &'a ValidationReport,
}

/// Parse arguments, initialise logging, and run the selected command.
pub fn run() -> Result<ExitCode> {
    let cli = Cli::parse();
    init_tracing(if cli.verbose { Level::DEBUG } else { Level::INFO });

    let mut stdout = std::io::stdout().lock();
    match cli.command {
        Command::Check(args) => run_check(&args, &mut stdout),
        Command::Accept { accept } => {
            let policy = AcceptancePolicy::from_names(&accept)?;
            writeln!(stdout, "{}", policy.accept_attribute())?;
            Ok(ExitCode::SUCCESS)
        }
    }
}

/// Exit status when a command fails before producing a verdict.
pub const ERROR_EXIT: u8 = 2;

/// Map the outcome of [`run`] to a process exit status.
///
/// Rejected uploads exit with 1 (from [`run_check`]); argument, policy, and
/// I/O errors are printed to stderr and exit with [`ERROR_EXIT`].
pub fn exit_status(result: Result<ExitCode>) -> ExitCode {
    match result {
        Ok(code) => code,
        Err(err) => {
            eprintln!("Error: {err:#}");
            ExitCode::from(ERROR_EXIT)
        }
    }
}

/// Install a stderr subscriber honouring `RUST_LOG`, falling back to `level`.
fn init_tracing(level: Level) {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level.as_str()));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
        .try_init()
        .ok();
}

/// Resolve the policy from `--policy` or `--accept`.
fn load_policy(args: &CheckArgs) -> Result<AcceptancePolicy> {
    match &args.policy {
        Some(path) => {
            let document = fs::read_to_string(path)
                .with_context(|| format!("Failed to read policy file {:?}", path))?;
            AcceptancePolicy::from_json(&document)
                .with_context(|| format!("Invalid policy file {:?}", path))
        }
        None => AcceptancePolicy::from_names(&args.accept).context("Invalid --accept value"),
    }
}

/// Validate every file in `args`, write the report to `out`, and map rejection to exit code 1.
pub fn run_check<W: Write>(args: &CheckArgs, out: &mut W) -> Result<ExitCode> {
    let policy = load_policy(args)?;
    tracing::debug!(accept = %policy.accept_attribute(), "policy loaded");

    let files = args
        .files
        .iter()
        .map(|path| match &args.mime {
            Some(mime) => DiskFile::open(path, mime.clone()),
            None => DiskFile::open_guessed(path),
        })
        .collect::<Result<Vec<_>>>()?;

    for file in &files {
        tracing::debug!(path = ?file.path(), mime = %file.mime_type(), "validating");
    }

    let reports = validate_batch(&files, &policy);

    let mut rejected = 0usize;
    for (file, report) in files.iter().zip(&reports) {
        if !report.is_accepted() {
            rejected += 1;
            tracing::warn!(path = ?file.path(), issues = ?report.messages(), "upload rejected");
        }
    }
    tracing::info!(total = files.len(), rejected, "validation finished");

    if args.json {
        let outcomes: Vec<FileOutcome<'_>> = files
            .iter()
            .zip(&reports)
            .map(|(file, report)| FileOutcome {
                path: file.path(),
                mime: file.mime_type(),
                accepted: report.is_accepted(),
                issues: report,
            })
            .collect();
        serde_json::to_writer_pretty(&mut *out, &outcomes)?;
        writeln!(out)?;
    } else {
        for (file, report) in files.iter().zip(&reports) {
            if report.is_accepted() {
                writeln!(out, "{}: ok", file.path().display())?;
            } else {
                writeln!(
                    out,
                    "{}: {}",
                    file.path().display(),
                    report.messages().join("; ")
                )?;
            }
        }
    }

    Ok(if rejected == 0 {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}
