//! Axis parameter store
//!
//! Kinematic and safety parameters per axis, held in a fixed table indexed
//! by `AxisId`. `AxisId::Other` has no entry, so every query on it returns
//! the "not defined" answer (`None` or `false`).
//!
//! Units: step size and calibration positions in meters, soft limits in
//! mm, feeds in mm/min, acceleration in m/s^2.
//!
//! Calibration positions and the E-axis relative flag are the only mutable
//! state. The store is not synchronized; mutation needs `&mut self`, so the
//! owner decides which thread may touch it.

use serde::Serialize;

use crate::constants::calibration;
use crate::profile::MechanicalProfile;

/// Machine axis
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum AxisId {
    X,
    Y,
    Z,
    E,
    Other,
}

impl AxisId {
    /// Axes that carry parameters
    pub const ALL: [AxisId; 4] = [AxisId::X, AxisId::Y, AxisId::Z, AxisId::E];

    fn index(self) -> Option<usize> {
        match self {
            AxisId::X => Some(0),
            AxisId::Y => Some(1),
            AxisId::Z => Some(2),
            AxisId::E => Some(3),
            AxisId::Other => None,
        }
    }

    /// Index into the calibration table; only X, Y and Z calibrate
    fn cal_index(self) -> Option<usize> {
        match self {
            AxisId::X | AxisId::Y | AxisId::Z => self.index(),
            _ => None,
        }
    }
}

/// Constant parameters of one axis
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct AxisParameters {
    pub step_size_m: f64,
    pub max_feed_mm_per_min: f64,
    pub max_accel_m_per_s2: f64,
    pub reverse_direction: bool,
    pub min_limit_switch_present: bool,
    pub max_limit_switch_present: bool,
    /// Inputs are inverted: a switch whose LED turns off when hit is active low
    pub min_limit_active_low: bool,
    pub max_limit_active_low: bool,
    pub min_soft_limit: Option<f64>,
    pub max_soft_limit: Option<f64>,
    /// Feed used to back off the home switch
    pub home_release_feed: f64,
    /// Highest feed used while moving towards the home switch
    pub home_max_feed: f64,
}

/// Step sizes in meters for X, Y, Z, E
fn step_sizes(mechanics: MechanicalProfile) -> [f64; 4] {
    match mechanics {
        // X: 1:8, 0.9' motor, 16t pulley @ 3mm  => 0.015 mm
        // Y: 1:8, 0.9' motor, 8t pulley @ 5mm   => 0.0125 mm
        // Z: 1:32, 1.8' motor, 1.25 mm/rev      => 0.0001953125 mm
        // E: 1:8, 1.8' motor, 11:39 reduction   => 0.003345 mm
        MechanicalProfile::Prusa => [15.0e-6, 12.5e-6, 195.3125e-9, 3.345e-6],
        // X, Y: 1:8, 1.8' motor, 8t pulley @ 5mm => 0.0125 mm
        // Z: 1:8, 1.8' motor, 1.25 mm/rev        => 0.0007812 mm
        // E: 1:8, 1.8' motor, 11:39 reduction    => 0.00335 mm
        MechanicalProfile::TestRig => [12.5e-6, 12.5e-6, 0.7812e-6, 3.35e-6],
    }
}

fn axis_table(mechanics: MechanicalProfile) -> [AxisParameters; 4] {
    let [x_step, y_step, z_step, e_step] = step_sizes(mechanics);
    [
        AxisParameters {
            step_size_m: x_step,
            max_feed_mm_per_min: 22500.0,
            max_accel_m_per_s2: 3.0,
            reverse_direction: true,
            min_limit_switch_present: true,
            max_limit_switch_present: false,
            min_limit_active_low: true,
            max_limit_active_low: false,
            min_soft_limit: Some(0.0),
            max_soft_limit: Some(215.0),
            home_release_feed: 150.0,
            home_max_feed: 3000.0,
        },
        AxisParameters {
            step_size_m: y_step,
            max_feed_mm_per_min: 16000.0,
            max_accel_m_per_s2: 1.0,
            reverse_direction: false,
            min_limit_switch_present: true,
            max_limit_switch_present: false,
            min_limit_active_low: true,
            max_limit_active_low: false,
            min_soft_limit: Some(0.0),
            max_soft_limit: Some(200.0),
            home_release_feed: 150.0,
            home_max_feed: 3000.0,
        },
        AxisParameters {
            step_size_m: z_step,
            max_feed_mm_per_min: 300.0,
            max_accel_m_per_s2: 1.0,
            reverse_direction: false,
            min_limit_switch_present: true,
            max_limit_switch_present: true,
            min_limit_active_low: false,
            max_limit_active_low: true,
            min_soft_limit: Some(0.0),
            max_soft_limit: Some(60.0),
            home_release_feed: 150.0,
            home_max_feed: 450.0,
        },
        // E has no travel limits
        AxisParameters {
            step_size_m: e_step,
            max_feed_mm_per_min: 3000.0,
            max_accel_m_per_s2: 1.0,
            reverse_direction: true,
            min_limit_switch_present: false,
            max_limit_switch_present: false,
            min_limit_active_low: false,
            max_limit_active_low: false,
            min_soft_limit: None,
            max_soft_limit: None,
            home_release_feed: 0.0,
            home_max_feed: 0.0,
        },
    ]
}

/// Per-axis parameters plus calibration state
#[derive(Debug, Clone)]
pub struct AxisStore {
    mechanics: MechanicalProfile,
    table: [AxisParameters; 4],
    cal_pos: [f64; 3],
    e_axis_relative: bool,
}

impl AxisStore {
    pub fn new(mechanics: MechanicalProfile) -> Self {
        Self {
            mechanics,
            table: axis_table(mechanics),
            cal_pos: [calibration::X_CAL_POS, calibration::Y_CAL_POS, calibration::Z_CAL_POS],
            e_axis_relative: false,
        }
    }

    pub fn mechanics(&self) -> MechanicalProfile {
        self.mechanics
    }

    /// Full parameter record, `None` for `AxisId::Other`
    pub fn parameters(&self, axis: AxisId) -> Option<&AxisParameters> {
        axis.index().map(|i| &self.table[i])
    }

    pub fn step_size(&self, axis: AxisId) -> Option<f64> {
        self.parameters(axis).map(|p| p.step_size_m)
    }

    pub fn max_feed(&self, axis: AxisId) -> Option<f64> {
        self.parameters(axis).map(|p| p.max_feed_mm_per_min)
    }

    pub fn max_accel(&self, axis: AxisId) -> Option<f64> {
        self.parameters(axis).map(|p| p.max_accel_m_per_s2)
    }

    /// Axis needs an inverted direction signal
    pub fn reverse_axis(&self, axis: AxisId) -> bool {
        self.parameters(axis).is_some_and(|p| p.reverse_direction)
    }

    pub fn has_min_limit_switch(&self, axis: AxisId) -> bool {
        self.parameters(axis).is_some_and(|p| p.min_limit_switch_present)
    }

    pub fn has_max_limit_switch(&self, axis: AxisId) -> bool {
        self.parameters(axis).is_some_and(|p| p.max_limit_switch_present)
    }

    pub fn min_limit_switch_is_active_low(&self, axis: AxisId) -> bool {
        self.parameters(axis).is_some_and(|p| p.min_limit_active_low)
    }

    pub fn max_limit_switch_is_active_low(&self, axis: AxisId) -> bool {
        self.parameters(axis).is_some_and(|p| p.max_limit_active_low)
    }

    /// Lower soft limit; the machine does not move below it in normal operation
    pub fn min_soft_limit(&self, axis: AxisId) -> Option<f64> {
        self.parameters(axis).and_then(|p| p.min_soft_limit)
    }

    /// Upper soft limit
    pub fn max_soft_limit(&self, axis: AxisId) -> Option<f64> {
        self.parameters(axis).and_then(|p| p.max_soft_limit)
    }

    /// Position defined by the min-side calibration switch
    pub fn min_switch_pos(&self, axis: AxisId) -> Option<f64> {
        axis.cal_index().map(|i| self.cal_pos[i])
    }

    /// Position defined by the max-side calibration switch
    ///
    /// Max switches act as limit switches only, never as calibration switches.
    pub fn max_switch_pos(&self, _axis: AxisId) -> Option<f64> {
        None
    }

    /// Overwrite the calibration position of X, Y or Z; false for other axes
    pub fn set_cal_pos(&mut self, axis: AxisId, pos: f64) -> bool {
        match axis.cal_index() {
            Some(i) => {
                self.cal_pos[i] = pos;
                true
            }
            None => false,
        }
    }

    pub fn home_release_feed(&self, axis: AxisId) -> Option<f64> {
        self.parameters(axis).map(|p| p.home_release_feed)
    }

    pub fn home_max_feed(&self, axis: AxisId) -> Option<f64> {
        self.parameters(axis).map(|p| p.home_max_feed)
    }

    /// Set E-axis relative mode, returning the previous setting
    pub fn set_e_axis_mode(&mut self, relative: bool) -> bool {
        std::mem::replace(&mut self.e_axis_relative, relative)
    }

    /// E axis is fed relative coordinates only
    pub fn e_axis_is_always_relative(&self) -> bool {
        self.e_axis_relative
    }
}

impl Default for AxisStore {
    fn default() -> Self {
        Self::new(MechanicalProfile::Prusa)
    }
}
