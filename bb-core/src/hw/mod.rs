//! Hardware interaction modules
//!
//! Kernel detection, sysfs GPIO, the cape EEPROM and I/O power sequencing.

mod eeprom;
mod gpio;
mod platform;
mod power;

pub use eeprom::{
    parse_driver_marker, resolve_driver_family, BoardConfigStore, DriverFamily, EepromStore,
};
pub use gpio::{GpioPort, SysfsGpio};
pub use platform::{PlatformDetector, PlatformVariant, ReleaseSource, UnameRelease};
pub use power::{power_off_steps, power_on_steps, GpioStep, PowerLayout, PowerSequencer};

#[cfg(test)]
pub use eeprom::MockBoardConfigStore;
