// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Alexander Minges

//! Domain layer: policies, candidate files, and validation outcomes.

pub mod candidate;
pub mod issue;
pub mod policy;
