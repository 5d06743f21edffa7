//! Collaborators at the edges of a boot attempt: hardware bring-up before
//! the decision, and the two terminal outcomes after it.
use super::partition::{BootIndex, Catalog};
use crate::error::Error;

/// Clock, flash cache and peripheral initialization.
pub trait BringUp {
    fn bring_up(&mut self) -> Result<(), Error>;
}

/// Verifies and loads the selected image, then transfers control to it.
/// Failures inside the loader are expected to end in a reset of their own.
pub trait LoadImage {
    fn load_and_run(&mut self, catalog: &Catalog, index: BootIndex) -> !;
}

/// Unconditional hardware reset.
pub trait Reset {
    fn reset(&mut self) -> !;
}
