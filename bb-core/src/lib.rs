//! BeBoPr Core Library
//!
//! Board configuration and hardware resolution for the BeBoPr 3D-printer
//! cape on a BeagleBone.
//!
//! # Features
//!
//! - **Platform Detection**: Classifies the running kernel (3.2 board-file vs 3.8 device tree)
//! - **Signal Tables**: Maps logical signal tags to sysfs paths per hardware profile
//! - **Registration**: Pushes analog, temperature, PWM and heater tables to their subsystems
//! - **Axis Parameters**: Step sizes, feed limits, soft limits, limit switches, calibration
//! - **I/O Power**: GPIO sequencing for the cape's power enable lines
//!
//! # Module Structure
//!
//! - `hw/` - Hardware interaction (kernel, GPIO, EEPROM, power)
//! - `signals/` - Signal tags, configuration records, per-profile tables
//! - `axis`, `registrar`, `board`, `profile` - the board layer itself
//!
//! # Example
//!
//! ```no_run
//! use bb_core::{AxisId, Board, HardwareProfile};
//!
//! let board = Board::new(HardwareProfile::compiled()).unwrap();
//! let x_step = board.axes().step_size(AxisId::X);
//! ```

// Grouped modules
pub mod hw;
pub mod signals;

// Standalone modules
pub mod axis;
pub mod board;
pub mod constants;
pub mod error;
pub mod profile;
pub mod registrar;

// Re-export error types
pub use error::{BoardError, Result};

// Re-export signal types
pub use signals::{
    validate_tables, AnalogInputConfig, ConversionCurve, HeaterConfig, PidSettings, PwmConfig,
    SignalTables, SignalTag, TempConfig,
};

// Re-export hardware types
pub use hw::{
    parse_driver_marker, power_off_steps, power_on_steps, resolve_driver_family,
    BoardConfigStore, DriverFamily, EepromStore, GpioPort, GpioStep, PlatformDetector,
    PlatformVariant, PowerLayout, PowerSequencer, ReleaseSource, SysfsGpio, UnameRelease,
};

// Re-export profile types and functions
pub use profile::{
    load_profile, resolve_profile_path, save_profile, AdcSource, BoardModel, BoardRevision,
    FeatureMode, HardwareProfile, MechanicalProfile,
};

// Re-export the board layer
pub use axis::{AxisId, AxisParameters, AxisStore};
pub use board::Board;
pub use registrar::{
    check_compatibility, pre_init, AnalogSubsystem, HeaterSubsystem, PwmSubsystem, Subsystems,
    TempSubsystem,
};
