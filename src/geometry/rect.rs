//! Axis-aligned rectangle.
//!
//! A [`Rect`] is a position (top-left corner) plus a size. Its extent is
//! `[x, x + width) × [y, y + height)` for overlap purposes, while
//! [`Rect::contains`] treats all four edges as inclusive.

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use super::dimensions::Dimensions;
use super::vector::Vector;

/// An edge of a rectangle, in the order [`Rect::constrain`] checks them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RectSide {
    Left,
    Right,
    Top,
    Bottom,
}

/// Sides clamped by a single [`Rect::constrain`] call, in check order.
pub type ConstrainedSides = SmallVec<[RectSide; 4]>;

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    /// Top-left corner.
    pub pos: Vector,
    /// Width and height.
    pub size: Dimensions,
}

impl Rect {
    pub const fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            pos: Vector::new(x, y),
            size: Dimensions::new(width, height),
        }
    }

    /// Rect of the given size at the origin.
    pub const fn from_size(width: f64, height: f64) -> Self {
        Self::new(0.0, 0.0, width, height)
    }

    pub const fn from_parts(pos: Vector, size: Dimensions) -> Self {
        Self { pos, size }
    }

    /// Left edge.
    pub fn x(&self) -> f64 {
        self.pos.x
    }

    /// Top edge.
    pub fn y(&self) -> f64 {
        self.pos.y
    }

    pub fn width(&self) -> f64 {
        self.size.width
    }

    pub fn height(&self) -> f64 {
        self.size.height
    }

    /// Right edge, `x + width`.
    pub fn right(&self) -> f64 {
        self.pos.x + self.size.width
    }

    /// Bottom edge, `y + height`.
    pub fn bottom(&self) -> f64 {
        self.pos.y + self.size.height
    }

    /// Midpoint of the rect.
    pub fn center(&self) -> Vector {
        Vector::new(
            self.pos.x + self.size.width / 2.0,
            self.pos.y + self.size.height / 2.0,
        )
    }

    /// True when both position and size are zero.
    pub fn is_zero(&self) -> bool {
        self.pos.is_zero() && self.size.is_zero()
    }

    /// Copy of this rect moved by `offset`.
    pub fn translated(&self, offset: Vector) -> Rect {
        Rect::from_parts(self.pos + offset, self.size)
    }

    /// Open AABB overlap test. Rects that only share an edge do not intersect.
    pub fn intersects_with(&self, other: &Rect) -> bool {
        self.x() < other.right()
            && self.right() > other.x()
            && self.y() < other.bottom()
            && self.bottom() > other.y()
    }

    /// Point containment with all four edges inclusive.
    pub fn contains(&self, v: Vector) -> bool {
        v.x >= self.x() && v.x <= self.right() && v.y >= self.y() && v.y <= self.bottom()
    }

    /// Clamp this rect inside `bound`, returning the sides that needed it.
    ///
    /// Sides are checked Left, Right, Top, Bottom, and each check sees the
    /// position left behind by the previous one. A rect wider than `bound`
    /// therefore trips Left and then Right and ends flush with the right
    /// edge; the same holds vertically.
    pub fn constrain(&mut self, bound: Rect) -> ConstrainedSides {
        let mut sides = ConstrainedSides::new();

        if self.pos.x < bound.x() {
            self.pos.x = bound.x();
            sides.push(RectSide::Left);
        }
        if self.right() > bound.right() {
            self.pos.x = bound.right() - self.size.width;
            sides.push(RectSide::Right);
        }
        if self.pos.y < bound.y() {
            self.pos.y = bound.y();
            sides.push(RectSide::Top);
        }
        if self.bottom() > bound.bottom() {
            self.pos.y = bound.bottom() - self.size.height;
            sides.push(RectSide::Bottom);
        }

        sides
    }
}
