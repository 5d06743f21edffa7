//! Scripted collaborators for exercising the boot decision layer.
//!
//! All doubles share a [`Journal`] so tests can assert on the relative order
//! of calls across collaborators.
use super::{
    boot::{BringUp, LoadImage, Reset},
    eraser::{EraseData, EraseRequest},
    ota::SelectDefault,
    partition::{BootIndex, Catalog, LoadCatalog},
    signal::Signals,
};
use crate::{
    error::Error,
    hal::{gpio::PinId, time::Milliseconds},
};
use std::{cell::RefCell, rc::Rc, vec::Vec};

/// Routes the crate's log output to the test harness. Safe to call from
/// every test.
pub fn init_logging() { let _ = env_logger::builder().is_test(true).try_init(); }

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Call {
    AssertLow(PinId),
    CheckHold(PinId),
    BringUp,
    LoadCatalog,
    DefaultLookup,
    Erase(EraseRequest),
    LoadAndRun(BootIndex),
    Reset,
}

#[derive(Clone, Debug, Default)]
pub struct Journal(Rc<RefCell<Vec<Call>>>);

impl Journal {
    pub fn record(&self, call: Call) { self.0.borrow_mut().push(call); }
    pub fn calls(&self) -> Vec<Call> { self.0.borrow().clone() }
    pub fn count(&self, predicate: impl Fn(&Call) -> bool) -> usize {
        self.0.borrow().iter().filter(|c| predicate(c)).count()
    }
    pub fn position(&self, predicate: impl Fn(&Call) -> bool) -> Option<usize> {
        self.0.borrow().iter().position(|c| predicate(c))
    }
}

/// Signals where a fixed set of pins reads as held for any duration.
#[derive(Clone, Debug, Default)]
pub struct FakeSignals {
    pub journal: Journal,
    pub held: Vec<PinId>,
}

impl FakeSignals {
    pub fn holding(journal: &Journal, held: &[PinId]) -> Self {
        Self { journal: journal.clone(), held: held.to_vec() }
    }
}

impl Signals for FakeSignals {
    fn assert_low(&mut self, pin: PinId) { self.journal.record(Call::AssertLow(pin)); }

    fn check_hold(&mut self, pin: PinId, _duration: Milliseconds) -> bool {
        self.journal.record(Call::CheckHold(pin));
        self.held.contains(&pin)
    }
}

/// Storage whose default lookup can change once data has been erased,
/// mimicking a wiped OTA selection falling back to factory.
#[derive(Clone, Debug)]
pub struct FakeStorage {
    pub journal: Journal,
    pub catalog: Result<Catalog, Error>,
    pub default: Result<BootIndex, Error>,
    pub default_after_erase: Option<Result<BootIndex, Error>>,
    pub erase_succeeds: bool,
}

impl FakeStorage {
    pub fn new(journal: &Journal, catalog: Catalog, default: Result<BootIndex, Error>) -> Self {
        Self {
            journal: journal.clone(),
            catalog: Ok(catalog),
            default,
            default_after_erase: None,
            erase_succeeds: true,
        }
    }

    pub fn erasing_to(mut self, default: Result<BootIndex, Error>) -> Self {
        self.default_after_erase = Some(default);
        self
    }
}

impl LoadCatalog for FakeStorage {
    fn load_catalog(&mut self) -> Result<Catalog, Error> {
        self.journal.record(Call::LoadCatalog);
        self.catalog.clone()
    }
}

impl SelectDefault for FakeStorage {
    fn default_boot_index(&mut self, _catalog: &Catalog) -> Result<BootIndex, Error> {
        self.journal.record(Call::DefaultLookup);
        self.default
    }
}

impl EraseData for FakeStorage {
    fn erase_data(&mut self, _catalog: &Catalog, request: &EraseRequest) -> bool {
        self.journal.record(Call::Erase(*request));
        if let Some(default) = self.default_after_erase {
            self.default = default;
        }
        self.erase_succeeds
    }
}

#[derive(Clone, Debug, Default)]
pub struct FakeBringUp {
    pub journal: Journal,
    pub fails: bool,
}

impl BringUp for FakeBringUp {
    fn bring_up(&mut self) -> Result<(), Error> {
        self.journal.record(Call::BringUp);
        if self.fails {
            Err(Error::HardwareInitFailed)
        } else {
            Ok(())
        }
    }
}

/// Loader that records the hand-off, then panics with `"booted <index>"`.
#[derive(Clone, Debug, Default)]
pub struct FakeLoader {
    pub journal: Journal,
}

impl LoadImage for FakeLoader {
    fn load_and_run(&mut self, _catalog: &Catalog, index: BootIndex) -> ! {
        self.journal.record(Call::LoadAndRun(index));
        panic!("booted {:?}", index)
    }
}

/// Reset that records the reset, then panics with `"hardware reset"`.
#[derive(Clone, Debug, Default)]
pub struct FakeReset {
    pub journal: Journal,
}

impl Reset for FakeReset {
    fn reset(&mut self) -> ! {
        self.journal.record(Call::Reset);
        panic!("hardware reset")
    }
}
