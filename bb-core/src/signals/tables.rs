//! Signal table construction
//!
//! `SignalTables::for_profile` is the only place that maps a hardware
//! profile to device paths. All four tables are built together so tag
//! references always stay within one profile.

use serde::Serialize;
use std::path::PathBuf;

use super::records::{AnalogInputConfig, HeaterConfig, PidSettings, PwmConfig, TempConfig};
use super::tags::{ConversionCurve, SignalTag};
use crate::constants::{analog, heater, pwm};
use crate::profile::{AdcSource, BoardModel, BoardRevision, FeatureMode, HardwareProfile};

/// Analog channel locations for one ADC wiring
struct AnalogWiring {
    bed: &'static str,
    extruder: &'static str,
    spare: &'static str,
    scale: u32,
}

/// PWM0..PWM2 (connectors J2..J4) as (path, frequency)
struct PwmWiring {
    outputs: [(&'static str, u32); 3],
}

/// The four immutable tables of one hardware profile
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SignalTables {
    pub analog: Vec<AnalogInputConfig>,
    pub temp: Vec<TempConfig>,
    pub pwm: Vec<PwmConfig>,
    pub heater: Vec<HeaterConfig>,
    /// Full-scale reading of the selected ADC
    pub ain_scale: u32,
}

impl SignalTables {
    /// Build the tables for `profile`
    pub fn for_profile(profile: &HardwareProfile) -> Self {
        let ain = analog_wiring(profile);
        let outputs = pwm_wiring(profile.model).outputs;
        let [pwm0, pwm1, pwm2] = outputs;

        // THRM0 (J6) = bed, THRM1 (J7) = spare, THRM2 (J8) = extruder
        let analog = vec![
            AnalogInputConfig {
                tag: SignalTag::BedThermistor,
                device_path: PathBuf::from(ain.bed),
                filter_length: 0,
            },
            AnalogInputConfig {
                tag: SignalTag::SpareAin,
                device_path: PathBuf::from(ain.spare),
                filter_length: analog::SPARE_FILTER_LENGTH,
            },
            AnalogInputConfig {
                tag: SignalTag::ExtruderThermistor,
                device_path: PathBuf::from(ain.extruder),
                filter_length: 0,
            },
        ];

        let (temp, pwm, heater) = match profile.mode {
            FeatureMode::LaserCutter => (
                Vec::new(),
                vec![pwm_config(SignalTag::PwmLaserPower, pwm1)],
                Vec::new(),
            ),
            FeatureMode::Standard => (
                standard_temp_table(),
                vec![
                    pwm_config(SignalTag::PwmExtruder, pwm1),
                    pwm_config(SignalTag::PwmFan, pwm0),
                    pwm_config(SignalTag::PwmBed, pwm2),
                ],
                standard_heater_table(),
            ),
        };

        Self { analog, temp, pwm, heater, ain_scale: ain.scale }
    }

    /// Look up an analog input by tag
    pub fn analog_input(&self, tag: SignalTag) -> Option<&AnalogInputConfig> {
        self.analog.iter().find(|a| a.tag == tag)
    }

    /// Look up a temperature binding by tag
    pub fn temp(&self, tag: SignalTag) -> Option<&TempConfig> {
        self.temp.iter().find(|t| t.tag == tag)
    }

    /// Look up a PWM output by tag
    pub fn pwm_output(&self, tag: SignalTag) -> Option<&PwmConfig> {
        self.pwm.iter().find(|p| p.tag == tag)
    }

    /// Look up a heater by tag
    pub fn heater(&self, tag: SignalTag) -> Option<&HeaterConfig> {
        self.heater.iter().find(|h| h.tag == tag)
    }
}

fn analog_wiring(profile: &HardwareProfile) -> AnalogWiring {
    if profile.adc == AdcSource::Ads1x15 {
        return AnalogWiring {
            bed: analog::ads1x15::BED,
            extruder: analog::ads1x15::EXTRUDER,
            spare: analog::ads1x15::SPARE,
            scale: analog::ads1x15::SCALE,
        };
    }
    match (profile.model, profile.revision) {
        (BoardModel::BeagleBone, _) => AnalogWiring {
            bed: analog::tsc::BED,
            extruder: analog::tsc::EXTRUDER,
            spare: analog::tsc::SPARE,
            scale: analog::tsc::SCALE,
        },
        (BoardModel::BeagleBoneBlack, BoardRevision::Bridge) => AnalogWiring {
            bed: analog::iio_bridge::BED,
            extruder: analog::iio_bridge::EXTRUDER,
            spare: analog::iio_bridge::SPARE,
            scale: analog::iio_bridge::SCALE,
        },
        (BoardModel::BeagleBoneBlack, _) => AnalogWiring {
            bed: analog::iio::BED,
            extruder: analog::iio::EXTRUDER,
            spare: analog::iio::SPARE,
            scale: analog::iio::SCALE,
        },
    }
}

fn pwm_wiring(model: BoardModel) -> PwmWiring {
    match model {
        BoardModel::BeagleBone => PwmWiring {
            outputs: [
                (pwm::bone::PWM0_PATH, pwm::bone::PWM0_FREQ),
                (pwm::bone::PWM1_PATH, pwm::bone::PWM1_FREQ),
                (pwm::bone::PWM2_PATH, pwm::bone::PWM2_FREQ),
            ],
        },
        BoardModel::BeagleBoneBlack => PwmWiring {
            outputs: [
                (pwm::black::PWM0_PATH, pwm::black::PWM0_FREQ),
                (pwm::black::PWM1_PATH, pwm::black::PWM1_FREQ),
                (pwm::black::PWM2_PATH, pwm::black::PWM2_FREQ),
            ],
        },
    }
}

fn pwm_config(tag: SignalTag, (path, frequency): (&'static str, u32)) -> PwmConfig {
    PwmConfig { tag, device_path: PathBuf::from(path), frequency }
}

fn standard_temp_table() -> Vec<TempConfig> {
    vec![
        TempConfig {
            tag: SignalTag::TempExtruder,
            source: SignalTag::ExtruderThermistor,
            in_range_time: heater::IN_RANGE_TIME_MS,
            conversion: ConversionCurve::BoneEpcosB5760g104f,
        },
        TempConfig {
            tag: SignalTag::TempBed,
            source: SignalTag::BedThermistor,
            in_range_time: heater::IN_RANGE_TIME_MS,
            conversion: ConversionCurve::BoneBedThermistor330k,
        },
    ]
}

fn standard_heater_table() -> Vec<HeaterConfig> {
    vec![
        HeaterConfig {
            tag: SignalTag::HeaterExtruder,
            analog_input: SignalTag::TempExtruder,
            analog_output: SignalTag::PwmExtruder,
            pid: PidSettings {
                ff_factor: 0.33,
                ff_offset: 40.0,
                p: 15.0,
                i: 0.0,
                d: 0.0,
                i_limit: 10.0,
            },
        },
        HeaterConfig {
            tag: SignalTag::HeaterBed,
            analog_input: SignalTag::TempBed,
            analog_output: SignalTag::PwmBed,
            pid: PidSettings {
                ff_factor: 1.03,
                ff_offset: 29.0,
                p: 25.0,
                i: 0.05,
                d: 0.0,
                i_limit: 80.0,
            },
        },
    ]
}
