//! Signal tags, configuration records and the per-profile tables
//!
//! Contains everything the analog, temp, PWM and heater subsystems are
//! configured with.

mod records;
mod tables;
mod tags;
mod validation;

pub use records::{AnalogInputConfig, HeaterConfig, PidSettings, PwmConfig, TempConfig};
pub use tables::SignalTables;
pub use tags::{ConversionCurve, SignalTag};
pub use validation::validate_tables;
