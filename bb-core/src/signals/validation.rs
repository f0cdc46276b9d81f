//! Consistency checks for signal tables
//!
//! Every reference inside a temperature or heater record must name an
//! entry of the same profile's tables, tags must be unique, and only one
//! channel of a shared PWM device may set the frequency.

use std::collections::{HashMap, HashSet};

use super::tables::SignalTables;
use super::tags::SignalTag;
use crate::error::{BoardError, Result};

/// Validate the internal consistency of `tables`
pub fn validate_tables(tables: &SignalTables) -> Result<()> {
    let analog: HashSet<SignalTag> = tables.analog.iter().map(|a| a.tag).collect();
    let temps: HashSet<SignalTag> = tables.temp.iter().map(|t| t.tag).collect();
    let pwms: HashSet<SignalTag> = tables.pwm.iter().map(|p| p.tag).collect();

    let all_tags = tables
        .analog
        .iter()
        .map(|a| a.tag)
        .chain(tables.temp.iter().map(|t| t.tag))
        .chain(tables.pwm.iter().map(|p| p.tag))
        .chain(tables.heater.iter().map(|h| h.tag));
    let mut seen = HashSet::new();
    for tag in all_tags {
        if !seen.insert(tag) {
            return Err(BoardError::config(format!("signal tag {} is defined twice", tag)));
        }
    }

    for temp in &tables.temp {
        if !analog.contains(&temp.source) {
            return Err(BoardError::config(format!(
                "{} reads from {} which is not an analog input",
                temp.tag, temp.source
            )));
        }
    }

    for heater in &tables.heater {
        if !temps.contains(&heater.analog_input) {
            return Err(BoardError::config(format!(
                "{} reads from {} which is not a temperature",
                heater.tag, heater.analog_input
            )));
        }
        if !pwms.contains(&heater.analog_output) {
            return Err(BoardError::config(format!(
                "{} drives {} which is not a PWM output",
                heater.tag, heater.analog_output
            )));
        }
    }

    let mut frequency_owner: HashMap<String, SignalTag> = HashMap::new();
    for output in tables.pwm.iter().filter(|p| p.frequency != 0) {
        if let Some(owner) = frequency_owner.insert(output.device(), output.tag) {
            return Err(BoardError::config(format!(
                "{} and {} both set the frequency of {}",
                owner,
                output.tag,
                output.device()
            )));
        }
    }

    Ok(())
}
