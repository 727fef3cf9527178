// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Alexander Minges

//! Shared helper utilities reused by the validator and the CLI.

pub mod mime;

/// Guess a declared MIME type from a path.
pub use mime::guess_mime;
/// Normalize a MIME string to its lower-case essence.
pub use mime::mime_essence;
/// Extension of an archive member's file name.
pub use mime::member_extension;
