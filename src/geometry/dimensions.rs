use std::ops::Add;

use serde::{Deserialize, Serialize};

/// Width and height of an object, in pixels.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Dimensions {
    /// Horizontal extent.
    pub width: f64,
    /// Vertical extent.
    pub height: f64,
}

impl Dimensions {
    pub const fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// Equal width and height.
    pub const fn square(size: f64) -> Self {
        Self::new(size, size)
    }

    pub const fn zero() -> Self {
        Self::square(0.0)
    }

    pub fn plus(self, other: Dimensions) -> Dimensions {
        self + other
    }

    pub fn plus_width(self, width: f64) -> Dimensions {
        self + Dimensions::new(width, 0.0)
    }

    pub fn plus_height(self, height: f64) -> Dimensions {
        self + Dimensions::new(0.0, height)
    }

    pub fn is_zero(self) -> bool {
        self.width == 0.0 && self.height == 0.0
    }
}

impl Add for Dimensions {
    type Output = Dimensions;

    fn add(self, rhs: Dimensions) -> Dimensions {
        Dimensions::new(self.width + rhs.width, self.height + rhs.height)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_addition_is_component_wise() {
        let d = Dimensions::new(10.0, 20.0).plus(Dimensions::new(1.0, 2.0));
        assert_eq!(d, Dimensions::new(11.0, 22.0));
        assert_eq!(d.plus_width(4.0), Dimensions::new(15.0, 22.0));
        assert_eq!(d.plus_height(-2.0), Dimensions::new(11.0, 20.0));
    }

    #[test]
    fn test_square_and_zero() {
        assert_eq!(Dimensions::square(3.0), Dimensions::new(3.0, 3.0));
        assert!(Dimensions::zero().is_zero());
        assert!(!Dimensions::square(1.0).is_zero());
    }
}
