// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Alexander Minges

//! MIME helpers shared by the validator and the CLI.

use std::path::Path;

/// Guess a declared MIME type from a file name, defaulting to `application/octet-stream`.
pub fn guess_mime(path: &Path) -> String {
    mime_guess::from_path(path)
        .first_or_octet_stream()
        .essence_str()
        .to_string()
}

/// Reduce a MIME string to its lower-case essence (`type/subtype`), dropping parameters.
pub fn mime_essence(mime: &str) -> String {
    mime.split(';')
        .next()
        .unwrap_or("")
        .trim()
        .to_ascii_lowercase()
}

/// Lower-case extension of the last path component of an archive member.
///
/// Archive paths always use `/`; the text after the final `.` of the file
/// name is the extension. A name without a dot has none.
pub fn member_extension(member: &str) -> Option<String> {
    let file_name = member.rsplit('/').next().unwrap_or(member);
    file_name
        .rsplit_once('.')
        .map(|(_, ext)| ext.to_ascii_lowercase())
}
