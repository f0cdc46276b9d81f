/*
 * This file is part of BeBoPr board.
 *
 * Copyright (C) 2025 BeBoPr contributors
 *
 * BeBoPr board is free software: you can redistribute it and/or modify
 * it under the terms of the GNU General Public License as published by
 * the Free Software Foundation, either version 3 of the License, or
 * (at your option) any later version.
 *
 * BeBoPr board is distributed in the hope that it will be useful,
 * but WITHOUT ANY WARRANTY; without even the implied warranty of
 * MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE. See the
 * GNU General Public License for more details.
 *
 * You should have received a copy of the GNU General Public License
 * along with BeBoPr board. If not, see <https://www.gnu.org/licenses/>.
 */

//! Logging setup
//!
//! Everything goes to stderr so stdout stays clean for JSON output.

use tracing_subscriber::EnvFilter;

/// Filter from RUST_LOG, else `fallback`
pub fn filter(fallback: &str) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback))
}

pub fn init_logging(fallback: &str) {
    let result = tracing_subscriber::fmt()
        .with_target(false)
        .with_level(true)
        .with_writer(std::io::stderr)
        .with_env_filter(filter(fallback))
        .try_init();

    if let Err(e) = result {
        eprintln!("Logging already initialized: {}", e);
    }
}
