//! Second stage bootloader startup sequence.
//!
//! This module contains the full boot attempt, with the exception of how to
//! construct its collaborators. Construction is board specific and is
//! handled by the `ports` module.
//!
//! A boot attempt never returns: it ends either in the selected image or in
//! a hardware reset.
use super::{
    boot::{BringUp, LoadImage, Reset},
    boot_mode::BootMode,
    partition::{BootIndex, Catalog},
    signal::Signals,
    traits::Storage,
};
use crate::{configuration::BootConfig, error::Error};

/// Progress of a boot attempt. Stages only move forward.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord)]
#[cfg_attr(target_arch = "arm", derive(defmt::Format))]
pub enum Stage {
    Init,
    TableLoaded,
    ModeResolved,
    Loading,
    Reset,
}

/// Outcome of the decision half of a boot attempt.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Selection {
    pub catalog: Catalog,
    pub index: BootIndex,
}

pub struct Startup<HW, S, P, L, R>
where
    HW: BringUp,
    S: Signals,
    P: Storage,
    L: LoadImage,
    R: Reset,
{
    pub(crate) hardware: HW,
    pub(crate) boot_mode: BootMode<S, P>,
    pub(crate) loader: L,
    pub(crate) reset: R,
    pub(crate) stage: Stage,
}

impl<HW, S, P, L, R> Startup<HW, S, P, L, R>
where
    HW: BringUp,
    S: Signals,
    P: Storage,
    L: LoadImage,
    R: Reset,
{
    pub fn new(
        config: BootConfig,
        hardware: HW,
        signals: S,
        storage: P,
        loader: L,
        reset: R,
    ) -> Self {
        Self {
            hardware,
            boot_mode: BootMode::new(config, signals, storage),
            loader,
            reset,
            stage: Stage::Init,
        }
    }

    pub fn stage(&self) -> Stage { self.stage }

    /// Runs the boot attempt to completion.
    pub fn run(mut self) -> ! {
        match self.select() {
            Ok(Selection { catalog, index }) => {
                self.enter(Stage::Loading);
                self.loader.load_and_run(&catalog, index)
            }
            Err(e) => {
                e.report();
                self.enter(Stage::Reset);
                self.reset.reset()
            }
        }
    }

    /// Everything up to, but not including, the hand-off to the loader.
    pub fn select(&mut self) -> Result<Selection, Error> {
        // Must happen before anything else touches the hardware.
        let strap_pin = self.boot_mode.config.strap_pin;
        self.boot_mode.signals.assert_low(strap_pin);

        self.hardware.bring_up()?;

        let catalog = self.boot_mode.partitions.load_catalog()?;
        self.enter(Stage::TableLoaded);

        let index = self.boot_mode.resolve(&catalog)?;
        self.enter(Stage::ModeResolved);
        info!("Selected boot partition {:?} (raw {})", index, index.raw());
        Ok(Selection { catalog, index })
    }

    fn enter(&mut self, stage: Stage) {
        info!("Startup: {:?} -> {:?}", self.stage, stage);
        self.stage = stage;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        configuration::{FactoryReset, TestFirmware},
        devices::{
            doubles::{
                init_logging, Call, FakeBringUp, FakeLoader, FakeReset, FakeSignals, FakeStorage, Journal,
            },
            eraser::EraseRequest,
            partition::Slot,
        },
        hal::{gpio::PinId, time::Milliseconds},
    };

    const STRAP: PinId = PinId(0);
    const FACTORY_PIN: PinId = PinId(4);
    const TEST_PIN: PinId = PinId(18);

    type TestStartup = Startup<FakeBringUp, FakeSignals, FakeStorage, FakeLoader, FakeReset>;

    fn config() -> BootConfig {
        BootConfig {
            strap_pin: STRAP,
            hold_time: Milliseconds(5_000),
            factory_reset: FactoryReset::Enabled {
                pin: FACTORY_PIN,
                erase: EraseRequest { categories: "nvs", erase_ota_state: true },
            },
            test_firmware: TestFirmware::Enabled { pin: TEST_PIN },
        }
    }

    fn catalog() -> Catalog {
        Catalog::default()
            .with_factory(Slot::new(0x10000, 0x100000))
            .with_ota(0, Slot::new(0x110000, 0x100000))
    }

    fn startup(journal: &Journal, held: &[PinId], storage: FakeStorage) -> TestStartup {
        init_logging();
        Startup::new(
            config(),
            FakeBringUp { journal: journal.clone(), fails: false },
            FakeSignals::holding(journal, held),
            storage,
            FakeLoader { journal: journal.clone() },
            FakeReset { journal: journal.clone() },
        )
    }

    #[test]
    fn strap_pin_is_driven_low_before_anything_else() {
        let journal = Journal::default();
        let storage = FakeStorage::new(&journal, catalog(), Ok(BootIndex::Ota(0)));
        let mut startup = startup(&journal, &[], storage);

        let selection = startup.select().unwrap();
        assert_eq!(selection.index, BootIndex::Ota(0));
        assert_eq!(startup.stage(), Stage::ModeResolved);
        assert_eq!(journal.calls(), vec![
            Call::AssertLow(STRAP),
            Call::BringUp,
            Call::LoadCatalog,
            Call::DefaultLookup,
            Call::CheckHold(FACTORY_PIN),
            Call::CheckHold(TEST_PIN),
        ]);
    }

    #[test]
    fn failed_bring_up_stops_before_the_partition_table() {
        let journal = Journal::default();
        let storage = FakeStorage::new(&journal, catalog(), Ok(BootIndex::Ota(0)));
        let mut startup = startup(&journal, &[], storage);
        startup.hardware.fails = true;

        assert_eq!(Err(Error::HardwareInitFailed), startup.select());
        assert_eq!(startup.stage(), Stage::Init);
        assert_eq!(journal.count(|c| *c == Call::LoadCatalog), 0);
    }

    #[test]
    fn corrupted_partition_table_stops_before_the_default_lookup() {
        let journal = Journal::default();
        let mut storage = FakeStorage::new(&journal, catalog(), Ok(BootIndex::Ota(0)));
        storage.catalog = Err(Error::PartitionTableCorrupted);
        let mut startup = startup(&journal, &[], storage);

        assert_eq!(Err(Error::PartitionTableCorrupted), startup.select());
        assert_eq!(journal.count(|c| *c == Call::DefaultLookup), 0);
    }

    #[test]
    fn factory_reset_scenario_selects_factory_after_erasing() {
        let journal = Journal::default();
        let storage = FakeStorage::new(&journal, catalog(), Ok(BootIndex::Ota(0)))
            .erasing_to(Ok(BootIndex::Factory));
        let mut startup = startup(&journal, &[FACTORY_PIN], storage);

        let selection = startup.select().unwrap();
        assert_eq!(selection.index, BootIndex::Factory);
        assert_eq!(selection.index.raw(), BootIndex::FACTORY_RAW);
    }

    #[test]
    fn test_firmware_scenario_without_test_partition_is_invalid() {
        let journal = Journal::default();
        let storage = FakeStorage::new(&journal, catalog(), Ok(BootIndex::Ota(0)));
        let mut startup = startup(&journal, &[TEST_PIN], storage);

        let resolution = startup.select().map(|s| s.index);
        assert_eq!(BootIndex::raw_or_invalid(resolution), BootIndex::INVALID_RAW);
        assert_eq!(startup.stage(), Stage::TableLoaded);
    }

    #[test]
    #[should_panic(expected = "booted Ota(0)")]
    fn successful_selection_hands_off_to_the_loader() {
        let journal = Journal::default();
        let storage = FakeStorage::new(&journal, catalog(), Ok(BootIndex::Ota(0)));
        startup(&journal, &[], storage).run();
    }

    #[test]
    #[should_panic(expected = "hardware reset")]
    fn invalid_selection_resets_the_device() {
        let journal = Journal::default();
        let storage = FakeStorage::new(&journal, catalog(), Err(Error::NoBootablePartition));
        startup(&journal, &[], storage).run();
    }

    #[test]
    #[should_panic(expected = "hardware reset")]
    fn failed_bring_up_resets_the_device() {
        let journal = Journal::default();
        let storage = FakeStorage::new(&journal, catalog(), Ok(BootIndex::Factory));
        let mut startup = startup(&journal, &[], storage);
        startup.hardware.fails = true;
        startup.run();
    }
}
