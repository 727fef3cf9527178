// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Alexander Minges

//! Validation logic, independent of any UI or CLI surface.

pub mod batch;
pub mod validate;
