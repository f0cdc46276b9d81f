//! I/O power sequencing
//!
//! Unpatched boards switch I/O power with two lines (IO_PWR_ON and
//! !IO_PWR_ON); boards with the enable patch or Bridge use !IO_PWR_ON on
//! gpio66 only. On the legacy kernel the pins must be exported and set to
//! output first, and are handed back on exit.
//!
//! Every write is attempted even if an earlier one failed.

use serde::Serialize;
use std::fmt;
use tracing::{info, warn};

use super::gpio::GpioPort;
use super::platform::PlatformVariant;
use crate::constants::gpio;
use crate::error::{BoardError, Result};
use crate::profile::HardwareProfile;

/// Power enable wiring
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PowerLayout {
    /// One active-low enable line
    SingleEnable { enable_n: u32 },
    /// Active-high enable plus active-low complement
    DualEnable { enable: u32, enable_n: u32 },
}

impl PowerLayout {
    pub fn for_profile(profile: &HardwareProfile) -> Self {
        if profile.has_single_enable() {
            PowerLayout::SingleEnable { enable_n: gpio::IO_PWR_ON_N_PATCHED }
        } else {
            PowerLayout::DualEnable { enable: gpio::IO_PWR_ON, enable_n: gpio::IO_PWR_ON_N }
        }
    }

    /// Pins in sequencing order
    pub fn pins(&self) -> Vec<u32> {
        match *self {
            PowerLayout::SingleEnable { enable_n } => vec![enable_n],
            PowerLayout::DualEnable { enable, enable_n } => vec![enable, enable_n],
        }
    }

    /// (pin, value) pairs that switch power on or off
    fn levels(&self, on: bool) -> Vec<(u32, &'static str)> {
        let (high, low) = if on { (gpio::HIGH, gpio::LOW) } else { (gpio::LOW, gpio::HIGH) };
        match *self {
            PowerLayout::SingleEnable { enable_n } => vec![(enable_n, low)],
            PowerLayout::DualEnable { enable, enable_n } => vec![(enable, high), (enable_n, low)],
        }
    }
}

/// One GPIO write
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GpioStep {
    /// Write a pin number to `export` / `unexport`
    Control { file: &'static str, pin: u32 },
    /// Write a value to a pin attribute
    PinAttr { pin: u32, attr: &'static str, value: &'static str },
}

impl GpioStep {
    fn apply(&self, port: &mut dyn GpioPort) -> Result<()> {
        match *self {
            GpioStep::Control { file, pin } => port.write_control(file, pin),
            GpioStep::PinAttr { pin, attr, value } => port.write_pin_attr(pin, attr, value),
        }
    }
}

impl fmt::Display for GpioStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GpioStep::Control { file, pin } => write!(f, "{} <- {}", file, pin),
            GpioStep::PinAttr { pin, attr, value } => {
                write!(f, "gpio{}/{} <- {}", pin, attr, value)
            }
        }
    }
}

/// Writes that switch I/O power on
pub fn power_on_steps(layout: PowerLayout, platform: PlatformVariant) -> Vec<GpioStep> {
    let mut steps = Vec::new();
    if platform == PlatformVariant::KernelA {
        for pin in layout.pins() {
            steps.push(GpioStep::Control { file: gpio::EXPORT, pin });
            steps.push(GpioStep::PinAttr { pin, attr: gpio::DIRECTION, value: gpio::OUT });
        }
    }
    for (pin, value) in layout.levels(true) {
        steps.push(GpioStep::PinAttr { pin, attr: gpio::VALUE, value });
    }
    steps
}

/// Writes that switch I/O power off and release the pins
pub fn power_off_steps(layout: PowerLayout, platform: PlatformVariant) -> Vec<GpioStep> {
    let mut steps: Vec<GpioStep> = layout
        .levels(false)
        .into_iter()
        .map(|(pin, value)| GpioStep::PinAttr { pin, attr: gpio::VALUE, value })
        .collect();
    if platform == PlatformVariant::KernelA {
        for pin in layout.pins() {
            steps.push(GpioStep::PinAttr { pin, attr: gpio::DIRECTION, value: gpio::IN });
            steps.push(GpioStep::Control { file: gpio::UNEXPORT, pin });
        }
    }
    steps
}

/// Apply every step, collecting the failures
fn run_steps(steps: &[GpioStep], port: &mut dyn GpioPort) -> Vec<(GpioStep, BoardError)> {
    let mut failures = Vec::new();
    for step in steps {
        if let Err(e) = step.apply(port) {
            warn!(step = %step, "GPIO write failed: {}", e);
            failures.push((*step, e));
        }
    }
    failures
}

/// Drives the I/O power lines of one board
#[derive(Debug, Clone, Copy)]
pub struct PowerSequencer {
    layout: PowerLayout,
}

impl PowerSequencer {
    pub fn new(layout: PowerLayout) -> Self {
        Self { layout }
    }

    pub fn for_profile(profile: &HardwareProfile) -> Self {
        Self::new(PowerLayout::for_profile(profile))
    }

    pub fn layout(&self) -> PowerLayout {
        self.layout
    }

    /// Turn I/O power on
    ///
    /// All writes are attempted; failures are reported together afterwards.
    pub fn power_on(&self, platform: PlatformVariant, port: &mut dyn GpioPort) -> Result<()> {
        let failures = run_steps(&power_on_steps(self.layout, platform), port);
        if let Some((step, first)) = failures.first() {
            warn!(failures = failures.len(), "I/O power on sequence incomplete");
            return Err(BoardError::PowerSequence {
                failures: failures.len(),
                first: format!("{}: {}", step, first),
            });
        }
        info!("Turned BEBOPR I/O power on");
        Ok(())
    }

    /// Turn I/O power off; failures are only logged
    pub fn power_off(&self, platform: PlatformVariant, port: &mut dyn GpioPort) {
        let failures = run_steps(&power_off_steps(self.layout, platform), port);
        if failures.is_empty() {
            info!("Turned BEBOPR I/O power off");
        } else {
            warn!(
                failures = failures.len(),
                "Turned BEBOPR I/O power off with GPIO write failures"
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Records writes, failing the ones for `fail_pin`
    #[derive(Default)]
    struct RecordingGpio {
        writes: Vec<String>,
        fail_pin: Option<u32>,
    }

    impl GpioPort for RecordingGpio {
        fn write_control(&mut self, file: &str, value: u32) -> Result<()> {
            self.writes.push(format!("{}={}", file, value));
            Ok(())
        }

        fn write_pin_attr(&mut self, pin: u32, attr: &str, value: &str) -> Result<()> {
            self.writes.push(format!("gpio{}/{}={}", pin, attr, value));
            if self.fail_pin == Some(pin) {
                return Err(BoardError::generic("write refused"));
            }
            Ok(())
        }
    }

    const SINGLE: PowerLayout = PowerLayout::SingleEnable { enable_n: 66 };
    const DUAL: PowerLayout = PowerLayout::DualEnable { enable: 38, enable_n: 34 };

    #[test]
    fn test_single_enable_on_legacy_kernel_exports_first() {
        let mut port = RecordingGpio::default();
        PowerSequencer::new(SINGLE).power_on(PlatformVariant::KernelA, &mut port).unwrap();
        assert_eq!(port.writes, vec!["export=66", "gpio66/direction=out", "gpio66/value=0"]);
    }

    #[test]
    fn test_single_enable_on_device_tree_kernel() {
        let mut port = RecordingGpio::default();
        PowerSequencer::new(SINGLE).power_on(PlatformVariant::KernelB, &mut port).unwrap();
        assert_eq!(port.writes, vec!["gpio66/value=0"]);
    }

    #[test]
    fn test_dual_enable_power_on() {
        let mut port = RecordingGpio::default();
        PowerSequencer::new(DUAL).power_on(PlatformVariant::KernelA, &mut port).unwrap();
        assert_eq!(
            port.writes,
            vec![
                "export=38",
                "gpio38/direction=out",
                "export=34",
                "gpio34/direction=out",
                "gpio38/value=1",
                "gpio34/value=0",
            ]
        );
    }

    #[test]
    fn test_dual_enable_power_off_releases_pins() {
        let mut port = RecordingGpio::default();
        PowerSequencer::new(DUAL).power_off(PlatformVariant::KernelA, &mut port);
        assert_eq!(
            port.writes,
            vec![
                "gpio38/value=0",
                "gpio34/value=1",
                "gpio38/direction=in",
                "unexport=38",
                "gpio34/direction=in",
                "unexport=34",
            ]
        );
    }

    #[test]
    fn test_single_enable_power_off_on_device_tree_kernel() {
        let mut port = RecordingGpio::default();
        PowerSequencer::new(SINGLE).power_off(PlatformVariant::Other, &mut port);
        assert_eq!(port.writes, vec!["gpio66/value=1"]);
    }

    #[test]
    fn test_failed_write_does_not_stop_sequence() {
        let mut port = RecordingGpio { fail_pin: Some(38), ..Default::default() };
        let err = PowerSequencer::new(DUAL)
            .power_on(PlatformVariant::KernelB, &mut port)
            .unwrap_err();

        assert_eq!(port.writes, vec!["gpio38/value=1", "gpio34/value=0"]);
        match err {
            BoardError::PowerSequence { failures, first } => {
                assert_eq!(failures, 1);
                assert!(first.starts_with("gpio38/value"));
            }
            other => panic!("unexpected error: {}", other),
        }
    }

    #[test]
    fn test_layout_from_profile() {
        use crate::profile::BoardRevision;
        let base = HardwareProfile { revision: BoardRevision::Base, ..HardwareProfile::compiled() };
        let bridge = HardwareProfile {
            revision: BoardRevision::Bridge,
            ..HardwareProfile::compiled()
        };
        assert_eq!(PowerLayout::for_profile(&base), DUAL);
        assert_eq!(PowerLayout::for_profile(&bridge), SINGLE);
    }
}
