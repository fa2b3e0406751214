//! Camera controls: the eight keys the fly camera reacts to.
//!
//! # Invariants
//! - The camera consumes `ControlKeys` snapshots, never raw window events.
//! - Window-system key codes are mapped to `ControlKey` by the embedding app.

pub mod control;

pub use control::{ControlKey, ControlKeys, ParseControlKeyError};

pub fn crate_info() -> &'static str {
    "museum-input v0.1.0"
}
