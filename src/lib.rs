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

//! BeBoPr board tool
//!
//! Command line front end over `bb-core`: inspect the resolved profile,
//! tables and axes, run pre-init against host stand-ins, and switch the
//! cape's I/O power.

pub mod cli;
pub mod commands;
pub mod logger;
pub mod sinks;
