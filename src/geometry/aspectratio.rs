use serde::{Deserialize, Serialize};

use super::dimensions::Dimensions;

/// Which axis is supplied when deriving concrete [`Dimensions`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ControlAxis {
    #[default]
    Width,
    Height,
}

/// A width:height ratio used to size the window from a single axis value.
///
/// # Example
/// ```
/// use layered2d::geometry::{AspectRatio, ControlAxis};
///
/// let dims = AspectRatio::new(16.0, 9.0, ControlAxis::Width).new_dimensions(1600.0);
/// assert_eq!((dims.width, dims.height), (1600.0, 900.0));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AspectRatio {
    /// Width to height ratio, for example 16 by 9.
    pub ratio: Dimensions,
    /// Axis whose value is given to [`AspectRatio::new_dimensions`].
    pub control_axis: ControlAxis,
}

impl AspectRatio {
    pub const fn new(width: f64, height: f64, control_axis: ControlAxis) -> Self {
        Self {
            ratio: Dimensions::new(width, height),
            control_axis,
        }
    }

    /// Dimensions whose control axis equals `v` and whose other axis keeps the ratio.
    ///
    /// # Panics
    /// Panics if the ratio component on the control axis is zero. That is a
    /// caller contract violation, not a runtime condition.
    pub fn new_dimensions(&self, v: f64) -> Dimensions {
        match self.control_axis {
            ControlAxis::Height => {
                assert!(
                    self.ratio.height != 0.0,
                    "caller contract violation: aspect ratio height is zero"
                );
                Dimensions::new(v / self.ratio.height * self.ratio.width, v)
            }
            ControlAxis::Width => {
                assert!(
                    self.ratio.width != 0.0,
                    "caller contract violation: aspect ratio width is zero"
                );
                Dimensions::new(v, v / self.ratio.width * self.ratio.height)
            }
        }
    }
}
