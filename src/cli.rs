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

//! Command Line Interface

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "bebopr-board")]
#[command(version)]
#[command(about = "BeBoPr board bring-up - signal tables, axis parameters and I/O power")]
#[command(long_about = "BeBoPr board bring-up - signal tables, axis parameters and I/O power

Resolves the cape's logical signals to sysfs paths for the running kernel
and hardware profile, checks them, and switches the cape's I/O power.

EXAMPLES:
    bebopr-board platform              Show the detected kernel platform
    bebopr-board tables                Show the resolved signal tables as JSON
    bebopr-board axes                  Show the axis parameter table as JSON
    bebopr-board check                 Run pre-init against the sysfs paths
    bebopr-board power on              Enable cape I/O power
    bebopr-board run                   Pre-init, power on, wait for Ctrl-C, power off

ENVIRONMENT VARIABLES:
    RUST_LOG=debug         Enable debug logging
    BEBOPR_PROFILE=<path>  Hardware profile to load

FILES:
    /etc/bebopr/profile.json               Hardware profile
    /sys/bus/i2c/drivers/at24/3-0054/eeprom  Cape EEPROM (stepper driver family)")]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalArgs,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Args, Clone, Debug)]
pub struct GlobalArgs {
    /// Hardware profile JSON (default: $BEBOPR_PROFILE or /etc/bebopr/profile.json)
    #[arg(long, global = true)]
    pub profile: Option<PathBuf>,

    /// Cape EEPROM holding the stepper driver configuration
    #[arg(long, global = true)]
    pub eeprom: Option<PathBuf>,

    /// Root of the sysfs GPIO class
    #[arg(long, global = true)]
    pub gpio_root: Option<PathBuf>,

    /// Log filter used when RUST_LOG is not set
    #[arg(long, global = true, default_value = "info")]
    pub log_level: String,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Show the detected kernel platform
    Platform,

    /// Show the active hardware profile
    Profile {
        /// Write the active profile to the profile path
        #[arg(long)]
        save: bool,
    },

    /// Show the resolved signal tables as JSON
    Tables,

    /// Show the axis parameter table as JSON
    Axes,

    /// Run pre-init against sysfs-probing subsystems
    Check {
        /// Only log the tables, do not require device paths to exist
        #[arg(long)]
        no_probe: bool,
    },

    /// Switch cape I/O power
    Power {
        #[arg(value_enum)]
        state: PowerState,
    },

    /// Pre-init, power on, wait for Ctrl-C, power off
    Run {
        /// Only log the tables, do not require device paths to exist
        #[arg(long)]
        no_probe: bool,
    },
}

#[derive(clap::ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum PowerState {
    On,
    Off,
}
