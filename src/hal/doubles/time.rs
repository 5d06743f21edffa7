use crate::hal::time::{self, Milliseconds};
use std::cell::Cell;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct FakeInstant(pub u32);

impl time::Instant for FakeInstant {}

impl core::ops::Sub for FakeInstant {
    type Output = Milliseconds;
    fn sub(self, rhs: Self) -> Self::Output { Milliseconds(self.0.wrapping_sub(rhs.0)) }
}

impl core::ops::Add<Milliseconds> for FakeInstant {
    type Output = Self;
    fn add(self, rhs: Milliseconds) -> Self { FakeInstant(self.0.wrapping_add(rhs.0)) }
}

/// Clock that advances by a fixed step every time it is read.
#[derive(Debug)]
pub struct FakeClock {
    pub current: Cell<u32>,
    pub step: u32,
}

impl FakeClock {
    pub fn starting_at(start: u32, step: Milliseconds) -> Self {
        Self { current: Cell::new(start), step: step.0 }
    }
}

impl Default for FakeClock {
    fn default() -> Self { Self::starting_at(0, Milliseconds(10)) }
}

impl time::Now for FakeClock {
    type I = FakeInstant;
    fn now(&self) -> FakeInstant {
        let now = self.current.get();
        self.current.set(now.wrapping_add(self.step));
        FakeInstant(now)
    }
}
