// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Alexander Minges

//! Upload validation: decide whether a candidate file is acceptable.
//!
//! Checks run in a fixed order and every applicable check contributes to the
//! report:
//! - declared MIME type against the policy,
//! - zip members against the policy's extensions (archives only),
//! - size ceiling (non-archives only).
//!
//! An archive with no listable members short-circuits with a single
//! [`ValidationIssue::EmptyArchive`].

use crate::models::candidate::{ArchiveEntry, CandidateFile};
use crate::models::issue::{ValidationIssue, ValidationReport};
use crate::models::policy::{ARCHIVE_MIME, AcceptancePolicy};
use crate::utils::{member_extension, mime_essence};

/// Largest accepted non-archive upload, in bytes.
pub const MAX_FILE_SIZE: u64 = 1_000_000_000;

/// Path prefixes written by archivers for their own bookkeeping.
pub const METADATA_PREFIXES: [&str; 1] = ["__MACOSX/"];

/// File names dropped into folders by desktop shells, wherever they appear.
pub const METADATA_FILE_NAMES: [&str; 3] = [".DS_Store", "Thumbs.db", "desktop.ini"];

/// Validate `file` against the default `{json, zip}` policy.
pub fn validate_default<F: CandidateFile + ?Sized>(file: &F) -> ValidationReport {
    validate(file, &AcceptancePolicy::default())
}

/// Validate `file` against `policy` and collect every applicable issue.
pub fn validate<F: CandidateFile + ?Sized>(
    file: &F,
    policy: &AcceptancePolicy,
) -> ValidationReport {
    let mut report = ValidationReport::default();
    let declared = mime_essence(file.mime_type());

    if !policy.accepts_mime(&declared) {
        report.push(ValidationIssue::InvalidFileType {
            declared: file.mime_type().to_string(),
        });
    }

    if declared == ARCHIVE_MIME {
        let entries = match file.archive_entries() {
            Ok(entries) if entries.is_empty() => {
                report.push(ValidationIssue::EmptyArchive { cause: None });
                return report;
            }
            Ok(entries) => entries,
            Err(err) => {
                report.push(ValidationIssue::EmptyArchive {
                    cause: Some(format!("{err:#}")),
                });
                return report;
            }
        };

        if let Some(member) = first_disallowed_member(&entries, policy) {
            report.push(ValidationIssue::ArchiveInvalidMembers {
                member: member.path.clone(),
            });
        }
    } else if file.size_bytes() > MAX_FILE_SIZE {
        report.push(ValidationIssue::FileTooLarge {
            size: file.size_bytes(),
            limit: MAX_FILE_SIZE,
        });
    }

    report
}

/// True for members generated by the archiving tool rather than the user.
pub fn is_metadata_entry(path: &str) -> bool {
    if METADATA_PREFIXES
        .iter()
        .any(|prefix| path.starts_with(prefix))
    {
        return true;
    }
    let file_name = path.rsplit('/').next().unwrap_or(path);
    METADATA_FILE_NAMES.contains(&file_name)
}

/// First content member whose extension is outside the policy.
fn first_disallowed_member<'a>(
    entries: &'a [ArchiveEntry],
    policy: &AcceptancePolicy,
) -> Option<&'a ArchiveEntry> {
    entries
        .iter()
        .filter(|entry| !entry.is_dir && !is_metadata_entry(&entry.path))
        .find(|entry| {
            !member_extension(&entry.path).is_some_and(|ext| policy.accepts_extension(&ext))
        })
}

#[cfg(test)]
mod tests {
    use anyhow::anyhow;

    use super::*;
    use crate::models::candidate::fixtures::zip_bytes;
    use crate::models::candidate::{ArchiveEntry, UploadFile};
    use crate::models::policy::FileKind;

    /// Candidate with a fake size, so size limits can be tested without allocating.
    struct FakeUpload {
        mime: &'static str,
        size: u64,
        entries: Option<Vec<ArchiveEntry>>,
    }

    impl CandidateFile for FakeUpload {
        fn mime_type(&self) -> &str {
            self.mime
        }

        fn size_bytes(&self) -> u64 {
            self.size
        }

        fn archive_entries(&self) -> anyhow::Result<Vec<ArchiveEntry>> {
            self.entries.clone().ok_or_else(|| anyhow!("unreadable"))
        }
    }

    fn json(size: u64) -> FakeUpload {
        FakeUpload {
            mime: "application/json",
            size,
            entries: None,
        }
    }

    fn zip_of(names: &[&str]) -> UploadFile {
        UploadFile::new("upload.zip", "application/zip", zip_bytes(names))
    }

    #[test]
    fn json_under_ceiling_is_accepted() {
        assert!(validate_default(&json(1024)).is_accepted());
        assert!(validate_default(&json(MAX_FILE_SIZE)).is_accepted());
    }

    #[test]
    fn json_one_byte_over_ceiling_is_only_too_large() {
        let report = validate_default(&json(MAX_FILE_SIZE + 1));
        assert_eq!(
            report.issues(),
            [ValidationIssue::FileTooLarge {
                size: MAX_FILE_SIZE + 1,
                limit: MAX_FILE_SIZE,
            }]
        );
    }

    #[test]
    fn undeclared_type_reports_invalid_type_once() {
        let file = FakeUpload {
            mime: "text/plain",
            size: 10,
            entries: None,
        };
        let report = validate_default(&file);
        assert_eq!(report.messages(), ["Invalid file type"]);
    }

    #[test]
    fn oversized_undeclared_type_reports_both_issues_in_order() {
        let file = FakeUpload {
            mime: "video/mp4",
            size: MAX_FILE_SIZE * 2,
            entries: None,
        };
        assert_eq!(
            validate_default(&file).messages(),
            ["Invalid file type", "File cannot be larger than 1 GB"]
        );
    }

    #[test]
    fn mime_parameters_do_not_affect_matching() {
        let file = FakeUpload {
            mime: "Application/JSON; charset=utf-8",
            size: 10,
            entries: None,
        };
        assert!(validate_default(&file).is_accepted());
    }

    #[test]
    fn empty_archive_is_only_empty_regardless_of_size() {
        let file = FakeUpload {
            mime: "application/zip",
            size: MAX_FILE_SIZE * 5,
            entries: Some(Vec::new()),
        };
        assert_eq!(
            validate_default(&file).issues(),
            [ValidationIssue::EmptyArchive { cause: None }]
        );

        let real_empty = zip_of(&[]);
        assert_eq!(validate_default(&real_empty).messages(), ["Zip is empty"]);
    }

    #[test]
    fn unreadable_archive_folds_into_empty_with_cause() {
        let file = UploadFile::new("broken.zip", "application/zip", b"PK\x03\x04junk".to_vec());
        let report = validate_default(&file);

        assert_eq!(report.messages(), ["Zip is empty"]);
        assert!(matches!(
            &report.issues()[0],
            ValidationIssue::EmptyArchive { cause: Some(cause) } if cause.contains("broken.zip")
        ));
    }

    #[test]
    fn archive_with_allowed_and_metadata_members_is_accepted() {
        let file = zip_of(&[
            "export/",
            "export/users.json",
            "export/Groups.JSON",
            "export/.DS_Store",
            "nested.zip",
            "__MACOSX/",
            "__MACOSX/export/._users.json",
        ]);
        assert!(validate_default(&file).is_accepted());
    }

    #[test]
    fn archive_with_executable_is_rejected() {
        let file = zip_of(&["users.json", "payload.exe", "other.txt"]);
        assert_eq!(
            validate_default(&file).issues(),
            [ValidationIssue::ArchiveInvalidMembers {
                member: "payload.exe".into(),
            }]
        );
    }

    #[test]
    fn extensionless_member_is_rejected() {
        let file = zip_of(&["data.v1/README"]);
        assert_eq!(
            validate_default(&file).messages(),
            ["Zip contains invalid file types"]
        );
    }

    #[test]
    fn only_metadata_members_is_accepted() {
        let file = zip_of(&["__MACOSX/._thing", "Thumbs.db"]);
        assert!(validate_default(&file).is_accepted());
    }

    #[test]
    fn archive_size_is_not_limited() {
        let file = FakeUpload {
            mime: "application/zip",
            size: MAX_FILE_SIZE * 3,
            entries: Some(vec![ArchiveEntry {
                path: "a.json".into(),
                size: MAX_FILE_SIZE * 3,
                is_dir: false,
            }]),
        };
        assert!(validate_default(&file).is_accepted());
    }

    #[test]
    fn archive_outside_policy_is_still_inspected() {
        let policy = AcceptancePolicy::from_names("json").unwrap();
        let file = zip_of(&["a.json", "b.zip"]);
        assert_eq!(
            validate(&file, &policy).messages(),
            ["Invalid file type", "Zip contains invalid file types"]
        );
    }

    #[test]
    fn custom_policy_drives_member_extensions() {
        let policy = AcceptancePolicy::new(vec![
            FileKind::zip(),
            FileKind::new("csv", "csv", "text/csv"),
        ])
        .unwrap();
        assert!(validate(&zip_of(&["rows.csv"]), &policy).is_accepted());
        assert_eq!(
            validate(&zip_of(&["rows.json"]), &policy).messages(),
            ["Zip contains invalid file types"]
        );
    }

    #[test]
    fn default_policy_matches_explicit_json_zip() {
        let explicit = AcceptancePolicy::from_name_list(&["json", "zip"]).unwrap();
        for file in [
            zip_of(&["a.json"]),
            zip_of(&["a.exe"]),
            zip_of(&[]),
            UploadFile::new("a.txt", "text/plain", b"hi".to_vec()),
        ] {
            assert_eq!(validate_default(&file), validate(&file, &explicit));
        }
    }

    #[test]
    fn validation_is_idempotent() {
        let file = zip_of(&["a.json", "b.exe"]);
        let policy = AcceptancePolicy::default();
        assert_eq!(validate(&file, &policy), validate(&file, &policy));
    }

    #[test]
    fn metadata_detection_uses_pinned_names() {
        assert!(is_metadata_entry("__MACOSX/a/._b.json"));
        assert!(is_metadata_entry("deep/dir/Thumbs.db"));
        assert!(!is_metadata_entry("__init__.json"));
        assert!(!is_metadata_entry("docs/__MACOSX/a.txt"));
    }
}
