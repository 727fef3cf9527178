// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Alexander Minges

use std::process::ExitCode;

fn main() -> ExitCode {
    upload_guard::app::exit_status(upload_guard::app::run())
}
