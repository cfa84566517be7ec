//! 2D vector value type.
//!
//! [`Vector`] is used both for positions (a rect's top-left corner, the mouse
//! cursor) and for displacements (velocities, offsets). Equality is exact
//! component-wise comparison.

use std::ops::{Add, AddAssign, Mul, Neg, Sub};

use serde::{Deserialize, Serialize};

use super::rect::Rect;

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Vector {
    /// Horizontal component, growing to the right.
    pub x: f64,
    /// Vertical component, growing down the screen.
    pub y: f64,
}

impl Vector {
    pub const ZERO: Vector = Vector { x: 0.0, y: 0.0 };

    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub const fn zero() -> Self {
        Self::ZERO
    }

    /// Unit vector pointing up the screen (negative Y).
    pub const fn up() -> Self {
        Self::new(0.0, -1.0)
    }

    pub const fn down() -> Self {
        Self::new(0.0, 1.0)
    }

    pub const fn left() -> Self {
        Self::new(-1.0, 0.0)
    }

    pub const fn right() -> Self {
        Self::new(1.0, 0.0)
    }

    /// Random vector with components in `[0, max.x) × [0, max.y)`.
    pub fn random(max: Vector) -> Self {
        Self::random_within(Rect::from_size(max.x, max.y))
    }

    /// Random vector uniformly distributed inside `r`.
    pub fn random_within(r: Rect) -> Self {
        Self {
            x: r.x() + fastrand::f64() * r.width(),
            y: r.y() + fastrand::f64() * r.height(),
        }
    }

    /// Unit vector pointing from `self` towards `other`.
    pub fn direction_to(&self, other: Vector) -> Vector {
        let angle = self.angle_to(other);
        Vector::new(angle.cos(), angle.sin())
    }

    /// Euclidean distance to `other`.
    pub fn distance_to(&self, other: Vector) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }

    /// Angle in radians of the line from `self` to `other`.
    pub fn angle_to(&self, other: Vector) -> f64 {
        (other.y - self.y).atan2(other.x - self.x)
    }

    /// Clamp this point so it lies on a pixel inside `r`.
    ///
    /// The upper bound is exclusive: a point past the right edge lands on
    /// `r.x + r.width - 1`.
    pub fn constrain_to(&mut self, r: Rect) {
        if self.x < r.x() {
            self.x = r.x();
        }
        if self.y < r.y() {
            self.y = r.y();
        }
        if self.x >= r.right() {
            self.x = r.right() - 1.0;
        }
        if self.y >= r.bottom() {
            self.y = r.bottom() - 1.0;
        }
    }

    /// Copy of this vector clamped with [`Vector::constrain_to`].
    pub fn constrained(self, r: Rect) -> Vector {
        let mut copy = self;
        copy.constrain_to(r);
        copy
    }

    /// Inclusive containment, same as [`Rect::contains`].
    pub fn is_inside_of(self, r: Rect) -> bool {
        r.contains(self)
    }

    pub fn is_left_of(self, v: Vector) -> bool {
        self.x < v.x
    }

    pub fn is_right_of(self, v: Vector) -> bool {
        self.x > v.x
    }

    pub fn is_above(self, v: Vector) -> bool {
        self.y < v.y
    }

    pub fn is_below(self, v: Vector) -> bool {
        self.y > v.y
    }

    pub fn is_zero(self) -> bool {
        self == Self::ZERO
    }

    /// Both components negated.
    pub fn inverted(self) -> Vector {
        -self
    }

    /// Horizontal component negated, as for a bounce off a side wall.
    pub fn inverted_x(self) -> Vector {
        Vector::new(-self.x, self.y)
    }

    /// Vertical component negated.
    pub fn inverted_y(self) -> Vector {
        Vector::new(self.x, -self.y)
    }

    /// Both components multiplied by `factor`.
    pub fn scaled(self, factor: f64) -> Vector {
        self * factor
    }
}

impl Add for Vector {
    type Output = Vector;

    fn add(self, rhs: Vector) -> Vector {
        Vector::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl AddAssign for Vector {
    fn add_assign(&mut self, rhs: Vector) {
        self.x += rhs.x;
        self.y += rhs.y;
    }
}

impl Sub for Vector {
    type Output = Vector;

    fn sub(self, rhs: Vector) -> Vector {
        Vector::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl Mul<f64> for Vector {
    type Output = Vector;

    fn mul(self, rhs: f64) -> Vector {
        Vector::new(self.x * rhs, self.y * rhs)
    }
}

impl Neg for Vector {
    type Output = Vector;

    fn neg(self) -> Vector {
        Vector::new(-self.x, -self.y)
    }
}
