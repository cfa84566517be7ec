//! Event types exchanged between the window host and the engine.
//!
//! Submodules:
//! - [`input`] – keyboard and mouse events forwarded to scene entities

pub mod input;

pub use input::{InputEvent, KeyEvent, MouseButton};
