// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Alexander Minges

//! Validation outcomes returned to the caller as data.

use serde::Serialize;
use serde::ser::SerializeStruct;

/// A single reason an upload was rejected.
///
/// The `Display` text is the user-facing message; the fields carry the
/// context a UI needs to say more than that.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ValidationIssue {
    #[error("Invalid file type")]
    InvalidFileType { declared: String },

    /// No members could be listed. `cause` holds the read error when the
    /// bytes were not a readable archive at all.
    #[error("Zip is empty")]
    EmptyArchive { cause: Option<String> },

    #[error("Zip contains invalid file types")]
    ArchiveInvalidMembers { member: String },

    #[error("File cannot be larger than 1 GB")]
    FileTooLarge { size: u64, limit: u64 },
}

impl ValidationIssue {
    /// Stable machine-readable code for this outcome.
    pub fn code(&self) -> &'static str {
        match self {
            ValidationIssue::InvalidFileType { .. } => "invalid_file_type",
            ValidationIssue::EmptyArchive { .. } => "empty_archive",
            ValidationIssue::ArchiveInvalidMembers { .. } => "archive_invalid_members",
            ValidationIssue::FileTooLarge { .. } => "file_too_large",
        }
    }
}

impl Serialize for ValidationIssue {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let fields = match self {
            ValidationIssue::FileTooLarge { .. } => 4,
            _ => 3,
        };
        let mut state = serializer.serialize_struct("ValidationIssue", fields)?;
        state.serialize_field("kind", self.code())?;
        state.serialize_field("message", &self.to_string())?;
        match self {
            ValidationIssue::InvalidFileType { declared } => {
                state.serialize_field("declared", declared)?
            }
            ValidationIssue::EmptyArchive { cause } => state.serialize_field("cause", cause)?,
            ValidationIssue::ArchiveInvalidMembers { member } => {
                state.serialize_field("member", member)?
            }
            ValidationIssue::FileTooLarge { size, limit } => {
                state.serialize_field("size", size)?;
                state.serialize_field("limit", limit)?;
            }
        }
        state.end()
    }
}

/// Ordered list of issues found for one candidate. Empty means accepted.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ValidationReport {
    issues: Vec<ValidationIssue>,
}

impl ValidationReport {
    pub fn push(&mut self, issue: ValidationIssue) {
        self.issues.push(issue);
    }

    pub fn issues(&self) -> &[ValidationIssue] {
        &self.issues
    }

    pub fn is_accepted(&self) -> bool {
        self.issues.is_empty()
    }

    /// Display messages in report order.
    pub fn messages(&self) -> Vec<String> {
        self.issues.iter().map(ToString::to_string).collect()
    }
}

impl IntoIterator for ValidationReport {
    type Item = ValidationIssue;
    type IntoIter = std::vec::IntoIter<ValidationIssue>;

    fn into_iter(self) -> Self::IntoIter {
        self.issues.into_iter()
    }
}
