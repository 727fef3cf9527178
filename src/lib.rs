// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Alexander Minges

//! Upload validation for JSON and zip uploads.
//!
//! ```rust,ignore
//! use upload_guard::{UploadFile, validate_default};
//!
//! let file = UploadFile::new("graph.json", "application/json", bytes);
//! let report = validate_default(&file);
//! for message in report.messages() {
//!     eprintln!("{message}");
//! }
//! ```

pub mod app;
pub mod logic;
pub mod models;
pub mod utils;

pub use logic::batch::validate_batch;
pub use logic::validate::{MAX_FILE_SIZE, is_metadata_entry, validate, validate_default};
pub use models::candidate::{ArchiveEntry, CandidateFile, DiskFile, UploadFile};
pub use models::issue::{ValidationIssue, ValidationReport};
pub use models::policy::{AcceptancePolicy, FileKind, PolicyError, format_accepted_types};
