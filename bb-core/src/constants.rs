//! Constants and configuration values for the BeBoPr board layer
//!
//! Centralizes all sysfs paths, pin numbers and board defaults.
//! Never use magic numbers in other files - add them here first.

/// System paths
pub mod paths {
    /// Configuration directory
    pub const CONFIG_DIR: &str = "/etc/bebopr";

    /// Hardware profile file inside `CONFIG_DIR`
    pub const PROFILE_FILE: &str = "profile.json";

    /// Environment variable that overrides the profile location
    pub const PROFILE_ENV: &str = "BEBOPR_PROFILE";

    /// Cape EEPROM holding the persisted stepper driver configuration
    pub const EEPROM: &str = "/sys/bus/i2c/drivers/at24/3-0054/eeprom";

    /// Kernel release, used when uname() is unavailable
    pub const KERNEL_RELEASE: &str = "/proc/sys/kernel/osrelease";

    /// Default profile path (`/etc/bebopr/profile.json`)
    pub fn default_profile_path() -> std::path::PathBuf {
        std::path::Path::new(CONFIG_DIR).join(PROFILE_FILE)
    }
}

/// Kernel release classification
pub mod kernel {
    /// Release prefix of the legacy (board-file) kernel
    pub const LEGACY_PREFIX: &str = "3.2";

    /// Release prefix of the device-tree kernel
    pub const DEVICE_TREE_PREFIX: &str = "3.8";

    /// Longest release string kept for diagnostics
    pub const MAX_RELEASE_LEN: usize = 49;
}

/// Analog input sysfs locations, one set per ADC wiring
pub mod analog {
    /// Dedicated ADS1x15 ADC on i2c (3.8 kernel), readings in mV
    pub mod ads1x15 {
        pub const BED: &str = "/sys/bus/i2c/drivers/ads1015/1-0048/in5_input";
        pub const EXTRUDER: &str = "/sys/bus/i2c/drivers/ads1015/1-0048/in6_input";
        pub const SPARE: &str = "/sys/bus/i2c/drivers/ads1015/1-0048/in4_input";
        pub const SCALE: u32 = 2048;
    }

    /// Touchscreen ADC on the original BeagleBone (3.2 kernel)
    pub mod tsc {
        pub const BED: &str = "/sys/devices/platform/omap/tsc/ain2";
        pub const EXTRUDER: &str = "/sys/devices/platform/omap/tsc/ain6";
        pub const SPARE: &str = "/sys/devices/platform/omap/tsc/ain4";
        pub const SCALE: u32 = 1800;
    }

    /// ti-tscadc/iio driver behind the Bridge adapter
    pub mod iio_bridge {
        pub const BED: &str = "/sys/bus/iio/devices/iio:device0/in_voltage4_raw";
        pub const EXTRUDER: &str = "/sys/bus/iio/devices/iio:device0/in_voltage5_raw";
        pub const SPARE: &str = "/sys/bus/iio/devices/iio:device0/in_voltage6_raw";
        pub const SCALE: u32 = 1800;
    }

    /// ti-tscadc/iio driver, no Bridge
    pub mod iio {
        pub const BED: &str = "/sys/bus/iio/devices/iio:device0/in_voltage1_raw";
        pub const EXTRUDER: &str = "/sys/bus/iio/devices/iio:device0/in_voltage5_raw";
        pub const SPARE: &str = "/sys/bus/iio/devices/iio:device0/in_voltage3_raw";
        pub const SCALE: u32 = 1800;
    }

    /// Moving-average window for the spare input
    pub const SPARE_FILTER_LENGTH: u32 = 10;
}

/// PWM output sysfs locations
///
/// A frequency of 0 leaves the driver (or DT overlay) default in place.
/// The B channel of an ehrpwm device always runs at the A channel frequency.
pub mod pwm {
    /// Original BeagleBone, legacy pwm class
    pub mod bone {
        pub const PWM0_PATH: &str = "/sys/class/pwm/ehrpwm.2:1";
        pub const PWM1_PATH: &str = "/sys/class/pwm/ehrpwm.2:0";
        pub const PWM2_PATH: &str = "/sys/class/pwm/ehrpwm.1:0";
        /// Determined by the A channel of ehrpwm.2
        pub const PWM0_FREQ: u32 = 0;
        pub const PWM1_FREQ: u32 = 400;
        pub const PWM2_FREQ: u32 = 1;
    }

    /// BeagleBone Black, DT overlay nodes
    // TODO: replace the .fixme node names once the bebopr_pwm overlay names are fixed.
    pub mod black {
        pub const PWM0_PATH: &str = "/sys/devices/ocp.2/bebopr_pwm_J2.fixme";
        pub const PWM1_PATH: &str = "/sys/devices/ocp.2/bebopr_pwm_J3.fixme";
        pub const PWM2_PATH: &str = "/sys/devices/ocp.2/bebopr_pwm_J4.fixme";
        pub const PWM0_FREQ: u32 = 0;
        pub const PWM1_FREQ: u32 = 0;
        pub const PWM2_FREQ: u32 = 0;
    }
}

/// Temperature and heater defaults
pub mod heater {
    /// Time a reading must stay in range before it counts as stable (ms)
    pub const IN_RANGE_TIME_MS: u32 = 15_000;
}

/// GPIO lines used for I/O power sequencing
pub mod gpio {
    /// Root of the sysfs GPIO class
    pub const SYSFS_ROOT: &str = "/sys/class/gpio";

    /// !IO_PWR_ON = R7 / GPIO2[2] / TIMER4 (enable patch or Bridge)
    pub const IO_PWR_ON_N_PATCHED: u32 = 66;

    /// IO_PWR_ON = R9 / GPIO1[6] / gpmc_ad6 (unpatched board)
    pub const IO_PWR_ON: u32 = 38;

    /// !IO_PWR_ON = R8 / GPIO1[2] / gpmc_ad2 (unpatched board)
    pub const IO_PWR_ON_N: u32 = 34;

    pub const EXPORT: &str = "export";
    pub const UNEXPORT: &str = "unexport";
    pub const DIRECTION: &str = "direction";
    pub const VALUE: &str = "value";
    pub const OUT: &str = "out";
    pub const IN: &str = "in";
    pub const HIGH: &str = "1";
    pub const LOW: &str = "0";
}

/// Calibration switch defaults, in meters
pub mod calibration {
    pub const X_CAL_POS: f64 = 0.0;
    pub const Y_CAL_POS: f64 = 0.0;
    /// Sensor sits 2.8 mm below table level
    pub const Z_CAL_POS: f64 = -2.7955e-3;
}

/// Host link protocol
pub mod protocol {
    /// Keep-alive character; a newline is the only one every host tolerates
    pub const KEEP_ALIVE_CHAR: char = '\n';
}

/// Size limits
pub mod limits {
    /// Maximum profile file size in bytes (64 KB)
    pub const MAX_PROFILE_SIZE: u64 = 64 * 1024;

    /// Maximum number of EEPROM bytes scanned for a driver marker
    pub const MAX_EEPROM_SCAN: u64 = 32 * 1024;
}
