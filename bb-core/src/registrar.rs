//! Configuration registrar
//!
//! `pre_init` checks the platform against the hardware profile and pushes
//! the four signal tables to their subsystems, in order. The first failure
//! stops the sequence; earlier registrations are left in place.

use tracing::{error, info};

use crate::error::{BoardError, Result};
use crate::hw::{
    resolve_driver_family, BoardConfigStore, DriverFamily, PlatformDetector, PlatformVariant,
};
use crate::profile::{BoardModel, BoardRevision, HardwareProfile};
use crate::signals::{AnalogInputConfig, HeaterConfig, PwmConfig, SignalTables, TempConfig};

/// Analog input subsystem
#[cfg_attr(test, mockall::automock)]
pub trait AnalogSubsystem {
    fn configure(&mut self, records: &[AnalogInputConfig]) -> Result<()>;
}

/// Temperature subsystem
#[cfg_attr(test, mockall::automock)]
pub trait TempSubsystem {
    fn configure(&mut self, records: &[TempConfig]) -> Result<()>;
}

/// PWM output subsystem
#[cfg_attr(test, mockall::automock)]
pub trait PwmSubsystem {
    fn configure(&mut self, records: &[PwmConfig]) -> Result<()>;
}

/// Heater control subsystem
#[cfg_attr(test, mockall::automock)]
pub trait HeaterSubsystem {
    fn configure(&mut self, records: &[HeaterConfig]) -> Result<()>;
}

/// The four subsystems configured by `pre_init`
pub struct Subsystems<'a> {
    pub analog: &'a mut dyn AnalogSubsystem,
    pub temp: &'a mut dyn TempSubsystem,
    pub pwm: &'a mut dyn PwmSubsystem,
    pub heater: &'a mut dyn HeaterSubsystem,
}

/// Reject profile and kernel pairs the board cannot run on
///
/// Besides the Bridge, which needs a device-tree kernel, this also rejects the
/// BeagleBone Black on the 3.2 board-file kernel, which has no support for it.
pub fn check_compatibility(profile: &HardwareProfile, platform: PlatformVariant) -> Result<()> {
    if platform != PlatformVariant::KernelA {
        return Ok(());
    }
    if profile.revision == BoardRevision::Bridge {
        return Err(BoardError::unsupported(
            "the Bridge is only supported with a device-tree kernel (3.8+)",
        ));
    }
    if profile.model == BoardModel::BeagleBoneBlack {
        return Err(BoardError::unsupported(
            "the BeagleBone Black is only supported with a device-tree kernel (3.8+)",
        ));
    }
    Ok(())
}

/// Run the pre-init sequence and return the stepper driver family
pub fn pre_init(
    profile: &HardwareProfile,
    tables: &SignalTables,
    platform: &mut PlatformDetector,
    subsystems: Subsystems<'_>,
    store: &dyn BoardConfigStore,
) -> Result<DriverFamily> {
    let variant = platform.resolve();
    if variant == PlatformVariant::Unknown {
        error!(
            "BeBoPr{} is not compatible with running on kernel version {}",
            profile.options(),
            platform.release()
        );
        return Err(BoardError::IncompatibleKernel { release: platform.release().to_string() });
    }
    info!(
        "BeBoPr{} configured for '{}' running on kernel version {}",
        profile.options(),
        variant.label(),
        platform.release()
    );

    if let Err(e) = check_compatibility(profile, variant) {
        error!("{}", e);
        return Err(e);
    }

    subsystems.analog.configure(&tables.analog).map_err(|e| {
        error!("analog_config failed: {}", e);
        BoardError::AnalogConfigFailed { source: Box::new(e) }
    })?;
    subsystems.temp.configure(&tables.temp).map_err(|e| {
        error!("temp_config failed: {}", e);
        BoardError::TempConfigFailed { source: Box::new(e) }
    })?;
    subsystems.pwm.configure(&tables.pwm).map_err(|e| {
        error!("pwm_config failed: {}", e);
        BoardError::PwmConfigFailed { source: Box::new(e) }
    })?;
    subsystems.heater.configure(&tables.heater).map_err(|e| {
        error!("heater_config failed: {}", e);
        BoardError::HeaterConfigFailed { source: Box::new(e) }
    })?;

    Ok(resolve_driver_family(store))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hw::MockBoardConfigStore;
    use crate::profile::{AdcSource, FeatureMode, MechanicalProfile};
    use mockall::Sequence;
    use std::io;

    fn profile(model: BoardModel, revision: BoardRevision) -> HardwareProfile {
        HardwareProfile {
            model,
            revision,
            adc: AdcSource::Touchscreen,
            mode: FeatureMode::Standard,
            mechanics: MechanicalProfile::Prusa,
        }
    }

    fn detector(release: &'static str) -> PlatformDetector {
        PlatformDetector::new(Box::new(move || -> io::Result<String> { Ok(release.to_string()) }))
    }

    fn failing_detector() -> PlatformDetector {
        PlatformDetector::new(Box::new(|| -> io::Result<String> {
            Err(io::Error::new(io::ErrorKind::Other, "uname failed"))
        }))
    }

    fn untouched_store() -> MockBoardConfigStore {
        let mut store = MockBoardConfigStore::new();
        store.expect_read_driver_family().never();
        store
    }

    struct Mocks {
        analog: MockAnalogSubsystem,
        temp: MockTempSubsystem,
        pwm: MockPwmSubsystem,
        heater: MockHeaterSubsystem,
    }

    impl Mocks {
        fn new() -> Self {
            Self {
                analog: MockAnalogSubsystem::new(),
                temp: MockTempSubsystem::new(),
                pwm: MockPwmSubsystem::new(),
                heater: MockHeaterSubsystem::new(),
            }
        }

        fn untouched() -> Self {
            let mut mocks = Self::new();
            mocks.analog.expect_configure().never();
            mocks.temp.expect_configure().never();
            mocks.pwm.expect_configure().never();
            mocks.heater.expect_configure().never();
            mocks
        }

        fn subsystems(&mut self) -> Subsystems<'_> {
            Subsystems {
                analog: &mut self.analog,
                temp: &mut self.temp,
                pwm: &mut self.pwm,
                heater: &mut self.heater,
            }
        }
    }

    #[test]
    fn test_registers_in_order_and_resolves_driver() {
        let profile = profile(BoardModel::BeagleBone, BoardRevision::Base);
        let tables = SignalTables::for_profile(&profile);
        let mut seq = Sequence::new();
        let mut mocks = Mocks::new();

        mocks
            .analog
            .expect_configure()
            .times(1)
            .in_sequence(&mut seq)
            .withf(|records| records.len() == 3)
            .returning(|_| Ok(()));
        mocks
            .temp
            .expect_configure()
            .times(1)
            .in_sequence(&mut seq)
            .withf(|records| records.len() == 2)
            .returning(|_| Ok(()));
        mocks
            .pwm
            .expect_configure()
            .times(1)
            .in_sequence(&mut seq)
            .withf(|records| records.len() == 3)
            .returning(|_| Ok(()));
        mocks
            .heater
            .expect_configure()
            .times(1)
            .in_sequence(&mut seq)
            .withf(|records| records.len() == 2)
            .returning(|_| Ok(()));

        let mut store = MockBoardConfigStore::new();
        store.expect_read_driver_family().times(1).returning(|| Ok(DriverFamily::Tb6560));

        let mut platform = detector("3.2.34");
        let family =
            pre_init(&profile, &tables, &mut platform, mocks.subsystems(), &store).unwrap();
        assert_eq!(family, DriverFamily::Tb6560);
    }

    #[test]
    fn test_analog_failure_stops_registration() {
        let profile = profile(BoardModel::BeagleBone, BoardRevision::Base);
        let tables = SignalTables::for_profile(&profile);
        let mut mocks = Mocks::new();
        mocks
            .analog
            .expect_configure()
            .times(1)
            .returning(|_| Err(BoardError::subsystem("no such device")));
        mocks.temp.expect_configure().never();
        mocks.pwm.expect_configure().never();
        mocks.heater.expect_configure().never();

        let mut platform = detector("3.8.13");
        let err = pre_init(&profile, &tables, &mut platform, mocks.subsystems(), &untouched_store())
            .unwrap_err();
        assert!(matches!(err, BoardError::AnalogConfigFailed { .. }));
    }

    #[test]
    fn test_temp_failure_skips_pwm_and_heater() {
        let profile = profile(BoardModel::BeagleBone, BoardRevision::Base);
        let tables = SignalTables::for_profile(&profile);
        let mut mocks = Mocks::new();
        mocks.analog.expect_configure().times(1).returning(|_| Ok(()));
        mocks
            .temp
            .expect_configure()
            .times(1)
            .returning(|_| Err(BoardError::subsystem("unknown analog source")));
        mocks.pwm.expect_configure().never();
        mocks.heater.expect_configure().never();

        let mut platform = detector("3.8.13");
        let err = pre_init(&profile, &tables, &mut platform, mocks.subsystems(), &untouched_store())
            .unwrap_err();
        assert!(matches!(err, BoardError::TempConfigFailed { .. }));
        assert!(err.to_string().starts_with("temp_config failed"));
    }

    #[test]
    fn test_pwm_failure_skips_heater() {
        let profile = profile(BoardModel::BeagleBone, BoardRevision::EnablePatch);
        let tables = SignalTables::for_profile(&profile);
        let mut mocks = Mocks::new();
        mocks.analog.expect_configure().times(1).returning(|_| Ok(()));
        mocks.temp.expect_configure().times(1).returning(|_| Ok(()));
        mocks
            .pwm
            .expect_configure()
            .times(1)
            .returning(|_| Err(BoardError::subsystem("export failed")));
        mocks.heater.expect_configure().never();

        let mut platform = detector("3.8.13");
        let err = pre_init(&profile, &tables, &mut platform, mocks.subsystems(), &untouched_store())
            .unwrap_err();
        assert!(matches!(err, BoardError::PwmConfigFailed { .. }));
        assert!(err.is_fatal());
    }

    #[test]
    fn test_heater_failure_is_reported() {
        let profile = profile(BoardModel::BeagleBone, BoardRevision::Base);
        let tables = SignalTables::for_profile(&profile);
        let mut mocks = Mocks::new();
        mocks.analog.expect_configure().returning(|_| Ok(()));
        mocks.temp.expect_configure().returning(|_| Ok(()));
        mocks.pwm.expect_configure().returning(|_| Ok(()));
        mocks
            .heater
            .expect_configure()
            .times(1)
            .returning(|_| Err(BoardError::subsystem("bad pid")));

        let mut platform = detector("3.2.0");
        let err = pre_init(&profile, &tables, &mut platform, mocks.subsystems(), &untouched_store())
            .unwrap_err();
        assert!(matches!(err, BoardError::HeaterConfigFailed { .. }));
    }

    #[test]
    fn test_unknown_platform_is_incompatible() {
        let profile = profile(BoardModel::BeagleBone, BoardRevision::Base);
        let tables = SignalTables::for_profile(&profile);
        let mut mocks = Mocks::untouched();

        let mut platform = failing_detector();
        let err = pre_init(&profile, &tables, &mut platform, mocks.subsystems(), &untouched_store())
            .unwrap_err();
        assert!(matches!(err, BoardError::IncompatibleKernel { .. }));
    }

    #[test]
    fn test_bridge_on_legacy_kernel_rejected() {
        let profile = profile(BoardModel::BeagleBone, BoardRevision::Bridge);
        let tables = SignalTables::for_profile(&profile);
        let mut mocks = Mocks::untouched();

        let mut platform = detector("3.2.34");
        let err = pre_init(&profile, &tables, &mut platform, mocks.subsystems(), &untouched_store())
            .unwrap_err();
        assert!(matches!(err, BoardError::UnsupportedHardwareCombination(_)));
    }

    #[test]
    fn test_compatibility_matrix() {
        let bone = profile(BoardModel::BeagleBone, BoardRevision::Base);
        let bridge = profile(BoardModel::BeagleBone, BoardRevision::Bridge);
        let black = profile(BoardModel::BeagleBoneBlack, BoardRevision::EnablePatch);

        assert!(check_compatibility(&bone, PlatformVariant::KernelA).is_ok());
        assert!(check_compatibility(&bone, PlatformVariant::KernelB).is_ok());
        assert!(check_compatibility(&bone, PlatformVariant::Other).is_ok());
        assert!(check_compatibility(&bridge, PlatformVariant::KernelA).is_err());
        assert!(check_compatibility(&bridge, PlatformVariant::KernelB).is_ok());
        assert!(check_compatibility(&bridge, PlatformVariant::Other).is_ok());
        assert!(check_compatibility(&black, PlatformVariant::KernelA).is_err());
        assert!(check_compatibility(&black, PlatformVariant::KernelB).is_ok());
    }

    #[test]
    fn test_unreadable_driver_config_defaults_to_pololu() {
        let profile = profile(BoardModel::BeagleBone, BoardRevision::Base);
        let tables = SignalTables::for_profile(&profile);
        let mut mocks = Mocks::new();
        mocks.analog.expect_configure().returning(|_| Ok(()));
        mocks.temp.expect_configure().returning(|_| Ok(()));
        mocks.pwm.expect_configure().returning(|_| Ok(()));
        mocks.heater.expect_configure().returning(|_| Ok(()));

        let mut store = MockBoardConfigStore::new();
        store.expect_read_driver_family()
            .times(1)
            .returning(|| Err(BoardError::driver_family_read("/sys/eeprom", "EIO")));

        let mut platform = detector("4.19.94");
        let family =
            pre_init(&profile, &tables, &mut platform, mocks.subsystems(), &store).unwrap();
        assert_eq!(family, DriverFamily::Pololu);
    }
}
