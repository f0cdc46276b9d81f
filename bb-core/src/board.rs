//! Board context
//!
//! Owns everything that used to be process-wide: the memoized platform,
//! the selected tables, the driver family and the axis calibration state.
//! The caller owns the `Board` and decides which thread uses it.

use tracing::{info, warn};

use crate::axis::AxisStore;
use crate::constants::protocol;
use crate::error::Result;
use crate::hw::{
    BoardConfigStore, DriverFamily, GpioPort, PlatformDetector, PlatformVariant, PowerSequencer,
    SysfsGpio,
};
use crate::profile::HardwareProfile;
use crate::registrar::{self, Subsystems};
use crate::signals::{validate_tables, SignalTables};

pub struct Board {
    profile: HardwareProfile,
    tables: SignalTables,
    platform: PlatformDetector,
    gpio: Box<dyn GpioPort>,
    power: PowerSequencer,
    driver_family: DriverFamily,
    axes: AxisStore,
}

impl Board {
    /// Board on the running system: uname(2) and /sys/class/gpio
    pub fn new(profile: HardwareProfile) -> Result<Self> {
        Self::with_parts(profile, PlatformDetector::from_uname(), Box::new(SysfsGpio::default()))
    }

    /// Board with explicit platform and GPIO backends
    pub fn with_parts(
        profile: HardwareProfile,
        platform: PlatformDetector,
        gpio: Box<dyn GpioPort>,
    ) -> Result<Self> {
        profile.validate()?;
        let tables = SignalTables::for_profile(&profile);
        validate_tables(&tables)?;

        Ok(Self {
            profile,
            tables,
            platform,
            gpio,
            power: PowerSequencer::for_profile(&profile),
            driver_family: DriverFamily::default(),
            axes: AxisStore::new(profile.mechanics),
        })
    }

    pub fn profile(&self) -> &HardwareProfile {
        &self.profile
    }

    pub fn tables(&self) -> &SignalTables {
        &self.tables
    }

    /// Resolve (or return the memoized) platform variant
    pub fn platform(&mut self) -> PlatformVariant {
        self.platform.resolve()
    }

    pub fn kernel_release(&self) -> &str {
        self.platform.release()
    }

    pub fn power(&self) -> &PowerSequencer {
        &self.power
    }

    /// Validate the platform and register all signal tables
    pub fn pre_init(
        &mut self,
        subsystems: Subsystems<'_>,
        store: &dyn BoardConfigStore,
    ) -> Result<()> {
        self.driver_family = registrar::pre_init(
            &self.profile,
            &self.tables,
            &mut self.platform,
            subsystems,
            store,
        )?;
        Ok(())
    }

    /// Enable board I/O power
    pub fn post_init(&mut self) -> Result<()> {
        let platform = self.platform.resolve();
        self.power.power_on(platform, self.gpio.as_mut())
    }

    /// Disable board I/O power; never fails
    pub fn exit(&mut self) {
        let platform = self.platform.resolve();
        if platform == PlatformVariant::Unknown {
            warn!("Kernel platform unknown, skipping pin release");
        }
        self.power.power_off(platform, self.gpio.as_mut());
        info!("Board shut down");
    }

    pub fn driver_family(&self) -> DriverFamily {
        self.driver_family
    }

    pub fn uses_pololu_drivers(&self) -> bool {
        self.driver_family == DriverFamily::Pololu
    }

    pub fn axes(&self) -> &AxisStore {
        &self.axes
    }

    pub fn axes_mut(&mut self) -> &mut AxisStore {
        &mut self.axes
    }

    /// Character sent to the host as keep-alive
    pub fn keep_alive_char(&self) -> char {
        protocol::KEEP_ALIVE_CHAR
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::axis::AxisId;
    use crate::error::BoardError;
    use crate::hw::MockBoardConfigStore;
    use crate::profile::{BoardModel, BoardRevision};
    use crate::registrar::{
        MockAnalogSubsystem, MockHeaterSubsystem, MockPwmSubsystem, MockTempSubsystem,
    };
    use std::cell::RefCell;
    use std::io;
    use std::rc::Rc;

    /// Shares its write log with the test
    #[derive(Clone, Default)]
    struct SharedGpio {
        writes: Rc<RefCell<Vec<String>>>,
    }

    impl GpioPort for SharedGpio {
        fn write_control(&mut self, file: &str, value: u32) -> Result<()> {
            self.writes.borrow_mut().push(format!("{}={}", file, value));
            Ok(())
        }

        fn write_pin_attr(&mut self, pin: u32, attr: &str, value: &str) -> Result<()> {
            self.writes.borrow_mut().push(format!("gpio{}/{}={}", pin, attr, value));
            Ok(())
        }
    }

    fn board(profile: HardwareProfile, release: &'static str, gpio: SharedGpio) -> Board {
        let platform = PlatformDetector::new(Box::new(move || -> io::Result<String> {
            Ok(release.to_string())
        }));
        Board::with_parts(profile, platform, Box::new(gpio)).unwrap()
    }

    #[test]
    fn test_full_lifecycle() {
        let profile = HardwareProfile {
            model: BoardModel::BeagleBone,
            revision: BoardRevision::EnablePatch,
            ..HardwareProfile::compiled()
        };
        let gpio = SharedGpio::default();
        let mut board = board(profile, "3.2.34", gpio.clone());

        let mut analog = MockAnalogSubsystem::new();
        let mut temp = MockTempSubsystem::new();
        let mut pwm = MockPwmSubsystem::new();
        let mut heater = MockHeaterSubsystem::new();
        analog.expect_configure().times(1).returning(|_| Ok(()));
        temp.expect_configure().times(1).returning(|_| Ok(()));
        pwm.expect_configure().times(1).returning(|_| Ok(()));
        heater.expect_configure().times(1).returning(|_| Ok(()));
        let mut store = MockBoardConfigStore::new();
        store.expect_read_driver_family().returning(|| Ok(DriverFamily::Tb6560));

        board
            .pre_init(
                Subsystems {
                    analog: &mut analog,
                    temp: &mut temp,
                    pwm: &mut pwm,
                    heater: &mut heater,
                },
                &store,
            )
            .unwrap();
        assert_eq!(board.driver_family(), DriverFamily::Tb6560);
        assert!(!board.uses_pololu_drivers());
        assert_eq!(board.kernel_release(), "3.2.34");

        board.post_init().unwrap();
        board.exit();
        assert_eq!(
            *gpio.writes.borrow(),
            vec![
                "export=66",
                "gpio66/direction=out",
                "gpio66/value=0",
                "gpio66/value=1",
                "gpio66/direction=in",
                "unexport=66",
            ]
        );
    }

    #[test]
    fn test_invalid_profile_rejected() {
        let profile = HardwareProfile {
            model: BoardModel::BeagleBoneBlack,
            revision: BoardRevision::Base,
            ..HardwareProfile::compiled()
        };
        let platform =
            PlatformDetector::new(Box::new(|| -> io::Result<String> { Ok("3.8.13".to_string()) }));
        let result = Board::with_parts(profile, platform, Box::new(SharedGpio::default()));
        assert!(matches!(result, Err(BoardError::InvalidProfile(_))));
    }

    #[test]
    fn test_axis_state_is_per_board() {
        let mut first = board(HardwareProfile::compiled(), "3.8.13", SharedGpio::default());
        let second = board(HardwareProfile::compiled(), "3.8.13", SharedGpio::default());

        first.axes_mut().set_cal_pos(AxisId::Z, 0.002);
        first.axes_mut().set_e_axis_mode(true);
        assert_eq!(first.axes().min_switch_pos(AxisId::Z), Some(0.002));
        assert_eq!(second.axes().min_switch_pos(AxisId::Z), Some(-2.7955e-3));
        assert!(!second.axes().e_axis_is_always_relative());
        assert_eq!(first.keep_alive_char(), '\n');
        assert!(first.uses_pololu_drivers());
    }
}
