//! Target specific parts. They mainly provide the terminal
//! collaborators of a boot attempt (image hand-off and reset)
//! for a given architecture.

pub mod cortex_m;
