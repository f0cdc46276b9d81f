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

//! Host-side stand-ins for the analog, temp, PWM and heater subsystems
//!
//! They accept the tables the way the firmware subsystems would, checking
//! that device paths exist and that every tag reference names a channel
//! registered earlier. Nothing is driven.

use std::cell::RefCell;
use std::path::Path;
use std::rc::Rc;

use bb_core::{
    AnalogInputConfig, AnalogSubsystem, BoardError, HeaterConfig, HeaterSubsystem, PwmConfig,
    PwmSubsystem, Result, SignalTag, Subsystems, TempConfig, TempSubsystem,
};
use tracing::{debug, info};

/// Tags registered so far, shared by the four stand-ins
#[derive(Debug, Default)]
pub struct Registry {
    pub analog: Vec<SignalTag>,
    pub temp: Vec<SignalTag>,
    pub pwm: Vec<SignalTag>,
    pub heater: Vec<SignalTag>,
}

type SharedRegistry = Rc<RefCell<Registry>>;

fn probe(tag: SignalTag, path: &Path) -> Result<()> {
    if path.exists() {
        Ok(())
    } else {
        Err(BoardError::subsystem(format!("{}: {} does not exist", tag, path.display())))
    }
}

fn require(tag: SignalTag, reference: SignalTag, known: &[SignalTag], kind: &str) -> Result<()> {
    if known.contains(&reference) {
        Ok(())
    } else {
        Err(BoardError::subsystem(format!("{}: {} is not a configured {}", tag, reference, kind)))
    }
}

pub struct HostAnalog {
    probe: bool,
    registry: SharedRegistry,
}

impl AnalogSubsystem for HostAnalog {
    fn configure(&mut self, records: &[AnalogInputConfig]) -> Result<()> {
        for record in records {
            if self.probe {
                probe(record.tag, &record.device_path)?;
            }
            debug!(
                tag = %record.tag,
                path = %record.device_path.display(),
                filter = record.filter_length,
                "analog input"
            );
        }
        self.registry.borrow_mut().analog = records.iter().map(|r| r.tag).collect();
        info!(count = records.len(), "Analog inputs configured");
        Ok(())
    }
}

pub struct HostTemp {
    registry: SharedRegistry,
}

impl TempSubsystem for HostTemp {
    fn configure(&mut self, records: &[TempConfig]) -> Result<()> {
        let mut registry = self.registry.borrow_mut();
        for record in records {
            require(record.tag, record.source, &registry.analog, "analog input")?;
            debug!(
                tag = %record.tag,
                source = %record.source,
                curve = record.conversion.name(),
                "temperature"
            );
        }
        registry.temp = records.iter().map(|r| r.tag).collect();
        info!(count = records.len(), "Temperatures configured");
        Ok(())
    }
}

pub struct HostPwm {
    probe: bool,
    registry: SharedRegistry,
}

impl PwmSubsystem for HostPwm {
    fn configure(&mut self, records: &[PwmConfig]) -> Result<()> {
        for record in records {
            if self.probe {
                probe(record.tag, &record.device_path)?;
            }
            debug!(
                tag = %record.tag,
                path = %record.device_path.display(),
                frequency = record.frequency,
                "PWM output"
            );
        }
        self.registry.borrow_mut().pwm = records.iter().map(|r| r.tag).collect();
        info!(count = records.len(), "PWM outputs configured");
        Ok(())
    }
}

pub struct HostHeater {
    registry: SharedRegistry,
}

impl HeaterSubsystem for HostHeater {
    fn configure(&mut self, records: &[HeaterConfig]) -> Result<()> {
        let mut registry = self.registry.borrow_mut();
        for record in records {
            require(record.tag, record.analog_input, &registry.temp, "temperature")?;
            require(record.tag, record.analog_output, &registry.pwm, "PWM output")?;
            debug!(
                tag = %record.tag,
                input = %record.analog_input,
                output = %record.analog_output,
                "heater"
            );
        }
        registry.heater = records.iter().map(|r| r.tag).collect();
        info!(count = records.len(), "Heaters configured");
        Ok(())
    }
}

/// The four stand-ins sharing one registry
pub struct HostSubsystems {
    pub analog: HostAnalog,
    pub temp: HostTemp,
    pub pwm: HostPwm,
    pub heater: HostHeater,
    registry: SharedRegistry,
}

impl HostSubsystems {
    /// With `probe` set, analog and PWM device paths must exist
    pub fn new(probe: bool) -> Self {
        let registry = SharedRegistry::default();
        Self {
            analog: HostAnalog { probe, registry: registry.clone() },
            temp: HostTemp { registry: registry.clone() },
            pwm: HostPwm { probe, registry: registry.clone() },
            heater: HostHeater { registry: registry.clone() },
            registry,
        }
    }

    pub fn as_subsystems(&mut self) -> Subsystems<'_> {
        Subsystems {
            analog: &mut self.analog,
            temp: &mut self.temp,
            pwm: &mut self.pwm,
            heater: &mut self.heater,
        }
    }

    /// Tags registered so far
    pub fn registered(&self) -> std::cell::Ref<'_, Registry> {
        self.registry.borrow()
    }
}
