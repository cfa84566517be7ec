//! Drawing surfaces and window hosts.
//!
//! Submodules:
//! - [`surface`] – the [`Surface`] drawing capability and its value types
//! - [`host`] – the [`WindowHost`] main-loop capability
//! - [`headless`] – in-memory host used by tests and `--headless` runs
//! - `raylib_host` – real window (cargo feature `raylib`)

pub mod headless;
pub mod host;
#[cfg(feature = "raylib")]
pub mod raylib_host;
pub mod surface;

pub use headless::{DrawCall, HeadlessHost, RecordingSurface};
pub use host::{FrameHandler, WindowHost};
#[cfg(feature = "raylib")]
pub use raylib_host::RaylibHost;
pub use surface::{Color, FontSpec, ImageData, ImageHandle, LineCap, LineStyle, Surface, TextMetrics};
