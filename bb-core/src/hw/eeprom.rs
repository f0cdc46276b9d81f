//! Stepper driver family from the cape EEPROM
//!
//! The EEPROM carries the step I/O configuration as an ASCII marker.
//! Only Pololu and TB6560 are distinguished; anything unreadable or
//! unrecognized falls back to Pololu.

use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

use crate::constants::{limits, paths};
use crate::error::{BoardError, Result};

/// Stepper driver hardware on the step/dir outputs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DriverFamily {
    #[default]
    Pololu,
    Tb6560,
}

impl DriverFamily {
    pub fn label(&self) -> &'static str {
        match self {
            DriverFamily::Pololu => "Pololu",
            DriverFamily::Tb6560 => "TB6560",
        }
    }
}

/// Persisted board configuration
#[cfg_attr(test, mockall::automock)]
pub trait BoardConfigStore {
    fn read_driver_family(&self) -> Result<DriverFamily>;
}

/// Cape EEPROM exposed by the at24 driver
#[derive(Debug, Clone)]
pub struct EepromStore {
    path: PathBuf,
}

impl Default for EepromStore {
    fn default() -> Self {
        Self::new(paths::EEPROM)
    }
}

impl EepromStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl BoardConfigStore for EepromStore {
    fn read_driver_family(&self) -> Result<DriverFamily> {
        let file = File::open(&self.path)
            .map_err(|e| BoardError::driver_family_read(&self.path, e.to_string()))?;

        let mut contents = Vec::new();
        file.take(limits::MAX_EEPROM_SCAN)
            .read_to_end(&mut contents)
            .map_err(|e| BoardError::driver_family_read(&self.path, e.to_string()))?;

        parse_driver_marker(&contents)
            .ok_or_else(|| BoardError::driver_family_read(&self.path, "no driver marker found"))
    }
}

/// Find a driver marker in raw EEPROM contents
pub fn parse_driver_marker(contents: &[u8]) -> Option<DriverFamily> {
    let text: String = contents
        .iter()
        .map(|&b| if b.is_ascii_graphic() { b.to_ascii_uppercase() as char } else { ' ' })
        .collect();

    if text.contains("TB6560") {
        Some(DriverFamily::Tb6560)
    } else if text.contains("POLOLU") {
        Some(DriverFamily::Pololu)
    } else {
        None
    }
}

/// Read the driver family, defaulting to Pololu on any failure
pub fn resolve_driver_family(store: &dyn BoardConfigStore) -> DriverFamily {
    let family = match store.read_driver_family() {
        Ok(family) => family,
        Err(e) => {
            warn!("{}; defaulting to Pololu drivers", e);
            DriverFamily::Pololu
        }
    };
    info!("Using stepper driver configuration: '{}'", family.label());
    family
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_marker_parsing() {
        assert_eq!(parse_driver_marker(b"STEPIO=TB6560\n"), Some(DriverFamily::Tb6560));
        assert_eq!(parse_driver_marker(b"pololu"), Some(DriverFamily::Pololu));
        assert_eq!(
            parse_driver_marker(b"\xaaU3\xeeA1BeBoPr\0tb6560\0"),
            Some(DriverFamily::Tb6560)
        );
        assert_eq!(parse_driver_marker(b"DRV8825"), None);
        assert_eq!(parse_driver_marker(b""), None);
    }

    #[test]
    fn test_tb6560_eeprom() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("eeprom");
        fs::write(&path, b"\xaa\x55\x33\xeeA1TB6560").unwrap();

        let store = EepromStore::new(&path);
        assert_eq!(resolve_driver_family(&store), DriverFamily::Tb6560);
    }

    #[test]
    fn test_unreadable_eeprom_defaults_to_pololu() {
        let dir = TempDir::new().unwrap();
        let store = EepromStore::new(dir.path().join("missing"));
        assert!(matches!(store.read_driver_family(), Err(BoardError::DriverFamilyRead { .. })));
        assert_eq!(resolve_driver_family(&store), DriverFamily::Pololu);
    }

    #[test]
    fn test_unrecognized_eeprom_defaults_to_pololu() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("eeprom");
        fs::write(&path, b"\xff\xff\xff\xff").unwrap();
        assert_eq!(resolve_driver_family(&EepromStore::new(&path)), DriverFamily::Pololu);
    }

    #[test]
    fn test_mocked_store() {
        let mut store = MockBoardConfigStore::new();
        store.expect_read_driver_family().times(1).returning(|| Ok(DriverFamily::Tb6560));
        assert_eq!(resolve_driver_family(&store), DriverFamily::Tb6560);
    }
}
