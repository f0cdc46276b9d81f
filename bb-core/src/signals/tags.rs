//! Logical signal tags
//!
//! Tags are a closed set compared by variant, never by their spelling.

use serde::Serialize;
use std::fmt;

/// Identity of one logical analog, PWM, temperature or heater channel
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SignalTag {
    BedThermistor,
    ExtruderThermistor,
    SpareAin,
    PwmExtruder,
    PwmBed,
    PwmFan,
    TempExtruder,
    TempBed,
    HeaterExtruder,
    HeaterBed,
    PwmLaserPower,
}

impl SignalTag {
    /// Spelling used in diagnostics
    pub fn name(&self) -> &'static str {
        match self {
            SignalTag::BedThermistor => "bed_thermistor",
            SignalTag::ExtruderThermistor => "extruder_thermistor",
            SignalTag::SpareAin => "spare_ain",
            SignalTag::PwmExtruder => "pwm_extruder",
            SignalTag::PwmBed => "pwm_bed",
            SignalTag::PwmFan => "pwm_fan",
            SignalTag::TempExtruder => "temp_extruder",
            SignalTag::TempBed => "temp_bed",
            SignalTag::HeaterExtruder => "heater_extruder",
            SignalTag::HeaterBed => "heater_bed",
            SignalTag::PwmLaserPower => "pwm_laser_power",
        }
    }
}

impl fmt::Display for SignalTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Analog to temperature conversion curve understood by the temp subsystem
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ConversionCurve {
    /// Epcos B57560G104F 100k thermistor on the bone divider
    BoneEpcosB5760g104f,
    /// 330k bed thermistor on the bone divider
    BoneBedThermistor330k,
}

impl ConversionCurve {
    pub fn name(&self) -> &'static str {
        match self {
            ConversionCurve::BoneEpcosB5760g104f => "bone_epcos_b5760g104f",
            ConversionCurve::BoneBedThermistor330k => "bone_bed_thermistor_330k",
        }
    }
}
