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

use anyhow::Result;
use bebopr::cli::Cli;
use bebopr::commands::{self, Context};
use bebopr::logger;
use clap::Parser;
use tracing::debug;

fn main() -> Result<()> {
    let cli = Cli::parse();
    logger::init_logging(&cli.global.log_level);

    let ctx = Context::from_args(&cli.global)?;
    debug!("Profile {} from {}", ctx.profile.options(), ctx.profile_path.display());

    commands::dispatch(&cli.command, &ctx)
}
