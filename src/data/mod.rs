//! Window data structures.
pub mod window;

pub use window::{BoundedWindow, PushOutcome};
