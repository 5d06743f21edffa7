use crate::hal::gpio::{PinBank, PinId};
use std::{collections::BTreeMap, vec::Vec};

/// Electrical level sequence a fake input pin walks through. Each read
/// consumes one sample; the last sample repeats forever.
#[derive(Clone, Debug, Default)]
pub struct LevelScript {
    pub samples: Vec<bool>,
    pub reads: usize,
}

impl LevelScript {
    fn next_is_low(&mut self) -> bool {
        let index = self.reads.min(self.samples.len().saturating_sub(1));
        self.reads += 1;
        // Pins with no script float high thanks to the pull-up.
        self.samples.get(index).map(|high| !high).unwrap_or(false)
    }
}

/// Pin configuration recorded by the fake bank.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum PinEvent {
    OutputLow(PinId),
    InputPullUp(PinId),
}

#[derive(Clone, Debug, Default)]
pub struct FakePinBank {
    pub scripts: BTreeMap<PinId, LevelScript>,
    pub events: Vec<PinEvent>,
}

impl FakePinBank {
    /// Pin reads low (button pressed) forever.
    pub fn hold(mut self, pin: PinId) -> Self {
        self.scripts.insert(pin, LevelScript { samples: vec![false], reads: 0 });
        self
    }

    /// Pin reads low for `low_reads` samples, then is released.
    pub fn press_for(mut self, pin: PinId, low_reads: usize) -> Self {
        let mut samples = vec![false; low_reads];
        samples.push(true);
        self.scripts.insert(pin, LevelScript { samples, reads: 0 });
        self
    }

    pub fn reads(&self, pin: PinId) -> usize {
        self.scripts.get(&pin).map(|s| s.reads).unwrap_or(0)
    }
}

impl PinBank for FakePinBank {
    fn configure_output_low(&mut self, pin: PinId) { self.events.push(PinEvent::OutputLow(pin)); }

    fn configure_input_pullup(&mut self, pin: PinId) {
        self.events.push(PinEvent::InputPullUp(pin));
    }

    fn is_low(&mut self, pin: PinId) -> bool {
        self.scripts.get_mut(&pin).map(LevelScript::next_is_low).unwrap_or(false)
    }
}
