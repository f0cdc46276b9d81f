//! Hardware profile
//!
//! The board strapping (model, revision, ADC wiring, feature mode and
//! mechanics) as one value. Defaults come from cargo features; a JSON file
//! in /etc/bebopr/profile.json can override any field.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use crate::constants::{limits, paths};
use crate::error::{BoardError, Result};

/// BeagleBone the cape is mounted on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BoardModel {
    /// Original (white) BeagleBone
    BeagleBone,
    /// BeagleBone Black
    BeagleBoneBlack,
}

/// Cape hardware revision / strapping
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BoardRevision {
    /// Unmodified BeBoPr R2
    Base,
    /// Enable patch applied (BeagleBone Black compatible)
    EnablePatch,
    /// Mounted through the Bridge adapter
    Bridge,
}

impl BoardRevision {
    /// Suffix used in start-up diagnostics
    pub fn option_suffix(&self) -> &'static str {
        match self {
            BoardRevision::Base => "",
            BoardRevision::EnablePatch => "+EnablePatch",
            BoardRevision::Bridge => "+Bridge",
        }
    }
}

/// Where the thermistor inputs are digitized
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AdcSource {
    /// Built-in touchscreen ADC of the AM335x
    Touchscreen,
    /// Dedicated ADS1x15 on i2c
    Ads1x15,
}

/// Mutually exclusive signal sets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FeatureMode {
    /// Extruder and bed heaters plus fan
    Standard,
    /// Single laser power channel, no heaters
    LaserCutter,
}

/// Mechanical configuration the step sizes are computed for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MechanicalProfile {
    Prusa,
    TestRig,
}

/// Complete hardware selection for one board
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HardwareProfile {
    pub model: BoardModel,
    pub revision: BoardRevision,
    pub adc: AdcSource,
    pub mode: FeatureMode,
    pub mechanics: MechanicalProfile,
}

impl Default for HardwareProfile {
    fn default() -> Self {
        Self::compiled()
    }
}

impl HardwareProfile {
    /// Profile selected by the cargo features this crate was built with
    pub fn compiled() -> Self {
        let revision = if cfg!(feature = "bridge") {
            BoardRevision::Bridge
        } else if cfg!(feature = "ena-patch") {
            BoardRevision::EnablePatch
        } else {
            BoardRevision::Base
        };

        Self {
            model: if cfg!(feature = "bbb") {
                BoardModel::BeagleBoneBlack
            } else {
                BoardModel::BeagleBone
            },
            revision,
            adc: if cfg!(feature = "ads1x15") {
                AdcSource::Ads1x15
            } else {
                AdcSource::Touchscreen
            },
            mode: if cfg!(feature = "laser-cutter") {
                FeatureMode::LaserCutter
            } else {
                FeatureMode::Standard
            },
            mechanics: if cfg!(feature = "test-rig") {
                MechanicalProfile::TestRig
            } else {
                MechanicalProfile::Prusa
            },
        }
    }

    /// Revision uses the single active-low power enable line
    pub fn has_single_enable(&self) -> bool {
        matches!(self.revision, BoardRevision::EnablePatch | BoardRevision::Bridge)
    }

    /// Diagnostic options string, e.g. "+Bridge"
    pub fn options(&self) -> &'static str {
        self.revision.option_suffix()
    }

    /// Reject strappings the cape cannot be built for
    ///
    /// The BeagleBone Black drives the power enable pins itself, so an
    /// unpatched cape without Bridge cannot be used on it.
    pub fn validate(&self) -> Result<()> {
        if self.model == BoardModel::BeagleBoneBlack && self.revision == BoardRevision::Base {
            return Err(BoardError::invalid_profile(
                "BeagleBone Black requires the enable patch or the Bridge",
            ));
        }
        Ok(())
    }
}

/// Resolve the profile path: explicit argument, then BEBOPR_PROFILE, then default
pub fn resolve_profile_path(explicit: Option<&Path>) -> PathBuf {
    if let Some(path) = explicit {
        return path.to_path_buf();
    }
    match std::env::var_os(paths::PROFILE_ENV) {
        Some(p) if !p.is_empty() => PathBuf::from(p),
        _ => paths::default_profile_path(),
    }
}

/// Load a profile from JSON, falling back to the compiled profile if the file is missing
pub fn load_profile(path: &Path) -> Result<HardwareProfile> {
    if !path.exists() {
        debug!(path = %path.display(), "No profile file, using compiled profile");
        let profile = HardwareProfile::compiled();
        profile.validate()?;
        return Ok(profile);
    }

    let metadata = fs::metadata(path).map_err(|e| BoardError::FileRead {
        path: path.to_path_buf(),
        source: e,
    })?;
    if metadata.len() > limits::MAX_PROFILE_SIZE {
        return Err(BoardError::FileTooLarge {
            path: path.to_path_buf(),
            size: metadata.len(),
            max_size: limits::MAX_PROFILE_SIZE,
        });
    }

    let content = fs::read_to_string(path).map_err(|e| BoardError::FileRead {
        path: path.to_path_buf(),
        source: e,
    })?;
    let profile: HardwareProfile = serde_json::from_str(&content)?;
    profile.validate()?;

    info!(path = %path.display(), ?profile, "Loaded hardware profile");
    Ok(profile)
}

/// Write a profile as pretty JSON
pub fn save_profile(path: &Path, profile: &HardwareProfile) -> Result<()> {
    profile.validate()?;
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|e| BoardError::FileWrite {
            path: parent.to_path_buf(),
            source: e,
        })?;
    }
    let json = serde_json::to_string_pretty(profile)?;
    fs::write(path, json).map_err(|e| BoardError::FileWrite {
        path: path.to_path_buf(),
        source: e,
    })
}
