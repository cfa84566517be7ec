use crate::geometry::{Rect, Vector, VelocityVector};

/// Base state shared by everything that lives in a scene.
///
/// Game types hold an `Entity` field and expose it through
/// [`Node::entity_mut`](super::capability::Node::entity_mut).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Entity {
    /// Hidden entities still tick and collide but draw nothing.
    pub visible: bool,
    /// Position and size in the parent group's coordinate space.
    pub bounds: Rect,
    /// Applied by [`Entity::advance`].
    pub velocity: VelocityVector,
}

impl Default for Entity {
    fn default() -> Self {
        Self::new(Rect::default())
    }
}

impl Entity {
    /// Visible, stationary entity occupying `bounds`.
    pub fn new(bounds: Rect) -> Self {
        Self {
            visible: true,
            bounds,
            velocity: VelocityVector::zero(),
        }
    }

    /// Direct bounds overlap test, independent of any collider capability.
    pub fn collides_with(&self, other: &Entity) -> bool {
        self.bounds.intersects_with(&other.bounds)
    }

    /// Place the top-left corner at `pos`.
    pub fn move_to(&mut self, pos: Vector) {
        self.bounds.pos = pos;
    }

    /// Move by `distance`.
    pub fn push(&mut self, distance: Vector) {
        self.bounds.pos += distance;
    }

    /// Apply one tick of velocity at `tick_rate` ticks per second.
    pub fn advance(&mut self, tick_rate: u32) {
        let movement = self.velocity.next_movement(tick_rate);
        self.push(movement);
    }
}
