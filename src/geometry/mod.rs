//! Plain geometric value types.
//!
//! Everything here is `Copy` and free of engine state. Transformations return
//! new values; the only in-place mutation is [`Rect::constrain`].
//!
//! Submodules overview:
//! - [`vector`] – 2D point/displacement with direction and clamping helpers
//! - [`dimensions`] – width/height pair
//! - [`rect`] – position + size, overlap tests and edge clamping
//! - [`aspectratio`] – derive window dimensions from a ratio and one axis
//! - [`velocity`] – displacement over a duration, converted to per-tick movement

pub mod aspectratio;
pub mod dimensions;
pub mod rect;
pub mod vector;
pub mod velocity;

pub use aspectratio::{AspectRatio, ControlAxis};
pub use dimensions::Dimensions;
pub use rect::{ConstrainedSides, Rect, RectSide};
pub use vector::Vector;
pub use velocity::{TICK_DURATION, VelocityVector};
