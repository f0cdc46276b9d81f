//! Configuration records handed to the analog, temp, PWM and heater subsystems

use serde::Serialize;
use std::path::PathBuf;

use super::tags::{ConversionCurve, SignalTag};

/// One analog input channel
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnalogInputConfig {
    pub tag: SignalTag,
    pub device_path: PathBuf,
    /// 0 = unfiltered, N = moving-average window
    pub filter_length: u32,
}

/// Temperature derived from an analog input
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TempConfig {
    pub tag: SignalTag,
    /// Tag of an `AnalogInputConfig`
    pub source: SignalTag,
    /// Milliseconds a reading must be stable before it is "in range"
    pub in_range_time: u32,
    pub conversion: ConversionCurve,
}

/// One PWM output channel
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PwmConfig {
    pub tag: SignalTag,
    pub device_path: PathBuf,
    /// 0 = keep the driver default, otherwise Hz
    pub frequency: u32,
}

impl PwmConfig {
    /// PWM device this channel belongs to; `ehrpwm.2:0` and `ehrpwm.2:1` share `ehrpwm.2`
    pub fn device(&self) -> String {
        let path = self.device_path.to_string_lossy();
        match path.rsplit_once(':') {
            Some((device, channel))
                if !channel.is_empty() && channel.chars().all(|c| c.is_ascii_digit()) =>
            {
                device.to_string()
            }
            _ => path.into_owned(),
        }
    }
}

/// Feed-forward PID settings for one heater
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PidSettings {
    pub ff_factor: f64,
    pub ff_offset: f64,
    pub p: f64,
    pub i: f64,
    pub d: f64,
    pub i_limit: f64,
}

/// Heater loop binding a temperature to a PWM output
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HeaterConfig {
    pub tag: SignalTag,
    /// Tag of a `TempConfig`
    pub analog_input: SignalTag,
    /// Tag of a `PwmConfig`
    pub analog_output: SignalTag,
    pub pid: PidSettings,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pwm(path: &str) -> PwmConfig {
        PwmConfig { tag: SignalTag::PwmFan, device_path: PathBuf::from(path), frequency: 0 }
    }

    #[test]
    fn test_pwm_device_strips_channel() {
        assert_eq!(pwm("/sys/class/pwm/ehrpwm.2:1").device(), "/sys/class/pwm/ehrpwm.2");
        assert_eq!(pwm("/sys/class/pwm/ehrpwm.2:0").device(), "/sys/class/pwm/ehrpwm.2");
    }

    #[test]
    fn test_pwm_device_without_channel() {
        assert_eq!(
            pwm("/sys/devices/ocp.2/bebopr_pwm_J2.fixme").device(),
            "/sys/devices/ocp.2/bebopr_pwm_J2.fixme"
        );
        // iio-style colons are not channel separators
        assert_eq!(
            pwm("/sys/bus/iio/devices/iio:device0").device(),
            "/sys/bus/iio/devices/iio:device0"
        );
    }
}
