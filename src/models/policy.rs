// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Alexander Minges

//! Acceptance policy: the set of file kinds an upload flow accepts.
//!
//! Caller input arrives in several shapes (a comma-separated string, a list
//! of names, a JSON document). All of them are normalized here into one
//! canonical [`AcceptancePolicy`] before any validation runs.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

/// MIME type that marks a candidate as a zip archive to be inspected.
pub const ARCHIVE_MIME: &str = "application/zip";

/// Errors raised while building an [`AcceptancePolicy`].
#[derive(Debug, thiserror::Error)]
pub enum PolicyError {
    #[error("acceptance policy must contain at least one file kind")]
    Empty,

    #[error("unknown file kind: {0}")]
    UnknownKind(String),

    #[error("file kind {name:?} has an empty {field}")]
    BlankField { name: String, field: &'static str },

    #[error("duplicate {field} in acceptance policy: {value}")]
    Duplicate { field: &'static str, value: String },

    #[error("file kind {name:?} has extension {extension:?}; extensions cannot contain '.' or '/'")]
    InvalidExtension { name: String, extension: String },

    #[error("invalid policy document")]
    Malformed(#[from] serde_json::Error),
}

/// One logical file kind with its canonical extension and MIME type.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileKind {
    pub name: String,
    /// Extension without the leading dot.
    pub extension: String,
    pub mime: String,
}

impl FileKind {
    /// Build a kind, lower-casing every field and stripping a leading `.` from the extension.
    pub fn new(name: &str, extension: &str, mime: &str) -> Self {
        Self {
            name: name.trim().to_ascii_lowercase(),
            extension: extension.trim().trim_start_matches('.').to_ascii_lowercase(),
            mime: mime.trim().to_ascii_lowercase(),
        }
    }

    pub fn json() -> Self {
        Self::new("json", "json", "application/json")
    }

    pub fn zip() -> Self {
        Self::new("zip", "zip", ARCHIVE_MIME)
    }

    /// Resolve a built-in kind by name (`json`, `zip`), ignoring case and a leading dot.
    pub fn builtin(name: &str) -> Option<Self> {
        match name.trim().trim_start_matches('.').to_ascii_lowercase().as_str() {
            "json" => Some(Self::json()),
            "zip" => Some(Self::zip()),
            _ => None,
        }
    }

    fn normalized(self) -> Self {
        Self::new(&self.name, &self.extension, &self.mime)
    }
}

/// Non-empty set of accepted file kinds with unique names, extensions, and MIME types.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct AcceptancePolicy {
    kinds: Vec<FileKind>,
}

impl Default for AcceptancePolicy {
    /// The `{json, zip}` policy used when the caller supplies none.
    fn default() -> Self {
        Self {
            kinds: vec![FileKind::json(), FileKind::zip()],
        }
    }
}

impl AcceptancePolicy {
    /// Build a policy from arbitrary kinds, normalizing case and checking uniqueness.
    pub fn new(kinds: Vec<FileKind>) -> Result<Self, PolicyError> {
        if kinds.is_empty() {
            return Err(PolicyError::Empty);
        }

        let kinds: Vec<FileKind> = kinds.into_iter().map(FileKind::normalized).collect();

        let mut names = HashSet::new();
        let mut extensions = HashSet::new();
        let mut mimes = HashSet::new();
        for kind in &kinds {
            for (field, value) in [
                ("name", &kind.name),
                ("extension", &kind.extension),
                ("mime", &kind.mime),
            ] {
                if value.is_empty() {
                    return Err(PolicyError::BlankField {
                        name: kind.name.clone(),
                        field,
                    });
                }
            }
            // Member extensions are read after the last dot of the file name.
            if kind.extension.contains(['.', '/']) {
                return Err(PolicyError::InvalidExtension {
                    name: kind.name.clone(),
                    extension: kind.extension.clone(),
                });
            }
            if !names.insert(kind.name.as_str()) {
                return Err(PolicyError::Duplicate {
                    field: "name",
                    value: kind.name.clone(),
                });
            }
            if !extensions.insert(kind.extension.as_str()) {
                return Err(PolicyError::Duplicate {
                    field: "extension",
                    value: kind.extension.clone(),
                });
            }
            if !mimes.insert(kind.mime.as_str()) {
                return Err(PolicyError::Duplicate {
                    field: "mime",
                    value: kind.mime.clone(),
                });
            }
        }

        Ok(Self { kinds })
    }

    /// Parse a comma-separated list of built-in kind names, e.g. `"json, zip"`.
    pub fn from_names(names: &str) -> Result<Self, PolicyError> {
        let parts: Vec<&str> = names
            .split(',')
            .map(str::trim)
            .filter(|part| !part.is_empty())
            .collect();
        Self::from_name_list(&parts)
    }

    /// Resolve a list of built-in kind names into a policy.
    pub fn from_name_list<S: AsRef<str>>(names: &[S]) -> Result<Self, PolicyError> {
        let kinds = names
            .iter()
            .map(|name| {
                let name = name.as_ref();
                FileKind::builtin(name)
                    .ok_or_else(|| PolicyError::UnknownKind(name.trim().to_string()))
            })
            .collect::<Result<Vec<_>, _>>()?;
        Self::new(kinds)
    }

    /// Load a policy from a JSON array of `{ "name", "extension", "mime" }` objects.
    pub fn from_json(document: &str) -> Result<Self, PolicyError> {
        let kinds: Vec<FileKind> = serde_json::from_str(document)?;
        Self::new(kinds)
    }

    pub fn kinds(&self) -> &[FileKind] {
        &self.kinds
    }

    /// True when some kind declares exactly this (already normalized) MIME essence.
    pub fn accepts_mime(&self, mime: &str) -> bool {
        self.kinds.iter().any(|kind| kind.mime == mime)
    }

    /// True when some kind uses this lower-case extension.
    pub fn accepts_extension(&self, extension: &str) -> bool {
        self.kinds.iter().any(|kind| kind.extension == extension)
    }

    /// Render the policy as an HTML `accept` attribute value, e.g. `.json,.zip`.
    pub fn accept_attribute(&self) -> String {
        self.kinds
            .iter()
            .map(|kind| format!(".{}", kind.extension))
            .collect::<Vec<_>>()
            .join(",")
    }
}

/// Format caller-supplied accept entries as extensions.
///
/// Bare names gain a leading dot; entries that already start with `.` or
/// look like MIME types (contain `/`) are kept as-is. Blank entries are dropped.
pub fn format_accepted_types(accepted: &str) -> Vec<String> {
    accepted
        .split(',')
        .map(str::trim)
        .filter(|entry| !entry.is_empty())
        .map(|entry| {
            if entry.starts_with('.') || entry.contains('/') {
                entry.to_string()
            } else {
                format!(".{entry}")
            }
        })
        .collect()
}
