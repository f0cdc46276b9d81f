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

//! Subcommand handlers

use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use anyhow::{Context as _, Result};
use bb_core::constants::{gpio, paths};
use bb_core::{
    load_profile, resolve_profile_path, save_profile, AxisId, Board, EepromStore, HardwareProfile,
    PlatformDetector, SysfsGpio,
};
use serde_json::{json, Value};
use tracing::{error, info, warn};

use crate::cli::{Commands, GlobalArgs, PowerState};
use crate::sinks::HostSubsystems;

/// Resolved global options
#[derive(Debug, Clone)]
pub struct Context {
    pub profile_path: PathBuf,
    pub profile: HardwareProfile,
    pub eeprom: EepromStore,
    pub gpio_root: PathBuf,
}

impl Context {
    pub fn from_args(args: &GlobalArgs) -> Result<Self> {
        let profile_path = resolve_profile_path(args.profile.as_deref());
        let profile = load_profile(&profile_path)
            .with_context(|| format!("loading profile {}", profile_path.display()))?;
        Ok(Self {
            profile_path,
            profile,
            eeprom: EepromStore::new(
                args.eeprom.clone().unwrap_or_else(|| PathBuf::from(paths::EEPROM)),
            ),
            gpio_root: args.gpio_root.clone().unwrap_or_else(|| PathBuf::from(gpio::SYSFS_ROOT)),
        })
    }

    pub fn board(&self) -> Result<Board> {
        let board = Board::with_parts(
            self.profile,
            PlatformDetector::from_uname(),
            Box::new(SysfsGpio::new(&self.gpio_root)),
        )?;
        Ok(board)
    }
}

pub fn dispatch(command: &Commands, ctx: &Context) -> Result<()> {
    match command {
        Commands::Platform => {
            let mut board = ctx.board()?;
            println!("{}", serde_json::to_string_pretty(&platform_json(&mut board))?);
        }
        Commands::Profile { save } => {
            if *save {
                save_profile(&ctx.profile_path, &ctx.profile)?;
                info!("Profile written to {}", ctx.profile_path.display());
            }
            println!("{}", serde_json::to_string_pretty(&ctx.profile)?);
        }
        Commands::Tables => {
            let board = ctx.board()?;
            println!("{}", serde_json::to_string_pretty(board.tables())?);
        }
        Commands::Axes => {
            let board = ctx.board()?;
            println!("{}", serde_json::to_string_pretty(&axes_json(&board))?);
        }
        Commands::Check { no_probe } => {
            let mut board = ctx.board()?;
            check(&mut board, &ctx.eeprom, !no_probe)?;
            println!("{}", serde_json::to_string_pretty(&platform_json(&mut board))?);
        }
        Commands::Power { state } => {
            let mut board = ctx.board()?;
            power(&mut board, *state)?;
        }
        Commands::Run { no_probe } => {
            let board = ctx.board()?;
            run(board, &ctx.eeprom, !no_probe)?;
        }
    }
    Ok(())
}

pub fn platform_json(board: &mut Board) -> Value {
    let variant = board.platform();
    json!({
        "variant": variant,
        "label": variant.label(),
        "release": board.kernel_release(),
        "device_tree": variant.has_device_tree(),
        "options": board.profile().options(),
        "driver_family": board.driver_family(),
    })
}

pub fn axes_json(board: &Board) -> Value {
    let axes = board.axes();
    let entries = AxisId::ALL
        .iter()
        .map(|&axis| {
            let entry = json!({
                "parameters": axes.parameters(axis),
                "min_switch_pos": axes.min_switch_pos(axis),
                "max_switch_pos": axes.max_switch_pos(axis),
            });
            (format!("{:?}", axis), entry)
        })
        .collect::<serde_json::Map<_, _>>();
    json!({
        "mechanics": axes.mechanics(),
        "e_axis_relative": axes.e_axis_is_always_relative(),
        "axes": entries,
    })
}

/// Run pre-init against the host stand-ins
pub fn check(board: &mut Board, eeprom: &EepromStore, probe: bool) -> Result<()> {
    let mut host = HostSubsystems::new(probe);
    board
        .pre_init(host.as_subsystems(), eeprom)
        .context("board pre-init failed")?;
    info!("Pre-init complete, stepper drivers: {}", board.driver_family().label());
    Ok(())
}

pub fn power(board: &mut Board, state: PowerState) -> Result<()> {
    match state {
        PowerState::On => board.post_init().context("enabling I/O power")?,
        PowerState::Off => board.exit(),
    }
    Ok(())
}

/// Flag raised by SIGINT, SIGTERM or SIGHUP
pub fn shutdown_flag() -> Arc<AtomicBool> {
    let shutdown = Arc::new(AtomicBool::new(false));
    let flag = shutdown.clone();
    if let Err(e) = ctrlc::set_handler(move || {
        info!("SIGNAL: Received SIGINT/SIGTERM - shutting down");
        flag.store(true, Ordering::SeqCst);
    }) {
        warn!("Failed to set signal handler: {}", e);
    }
    shutdown
}

/// Pre-init, power on and hold until Ctrl-C; power is always switched off again
pub fn run(mut board: Board, eeprom: &EepromStore, probe: bool) -> Result<()> {
    check(&mut board, eeprom, probe)?;

    let shutdown = shutdown_flag();

    let powered = board.post_init();
    if let Err(e) = &powered {
        error!("I/O power-on incomplete: {}", e);
    } else {
        info!("Board running, press Ctrl-C to stop");
        while !shutdown.load(Ordering::SeqCst) {
            thread::sleep(Duration::from_millis(100));
        }
    }

    board.exit();
    powered.context("enabling I/O power")
}
