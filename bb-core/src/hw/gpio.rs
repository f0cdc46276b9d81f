//! sysfs GPIO writes
//!
//! Two primitives: write a pin number to a class control file
//! (`export`/`unexport`) and write a string to a per-pin attribute
//! (`gpioN/direction`, `gpioN/value`).

use std::fs;
use std::path::{Path, PathBuf};
use tracing::trace;

use crate::constants::gpio;
use crate::error::{BoardError, Result};

/// GPIO access used by the power sequencer
pub trait GpioPort {
    /// Write `value` to a class control file such as `export`
    fn write_control(&mut self, file: &str, value: u32) -> Result<()>;

    /// Write `value` to attribute `attr` of pin `pin`
    fn write_pin_attr(&mut self, pin: u32, attr: &str, value: &str) -> Result<()>;
}

/// GPIO through /sys/class/gpio
#[derive(Debug, Clone)]
pub struct SysfsGpio {
    root: PathBuf,
}

impl Default for SysfsGpio {
    fn default() -> Self {
        Self::new(gpio::SYSFS_ROOT)
    }
}

impl SysfsGpio {
    /// GPIO class rooted at `root` (normally /sys/class/gpio)
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Attribute file of one pin, e.g. /sys/class/gpio/gpio66/value
    pub fn pin_attr_path(&self, pin: u32, attr: &str) -> PathBuf {
        self.root.join(format!("gpio{}", pin)).join(attr)
    }

    fn write(path: PathBuf, value: &str) -> Result<()> {
        trace!(path = %path.display(), value, "GPIO write");
        fs::write(&path, value).map_err(|e| BoardError::GpioWrite { path, source: e })
    }
}

impl GpioPort for SysfsGpio {
    fn write_control(&mut self, file: &str, value: u32) -> Result<()> {
        Self::write(self.root.join(file), &value.to_string())
    }

    fn write_pin_attr(&mut self, pin: u32, attr: &str, value: &str) -> Result<()> {
        Self::write(self.pin_attr_path(pin, attr), value)
    }
}
