use crate::backend::surface::{Color, LineCap, LineStyle, Surface};
use crate::engine::Engine;
use crate::error::EngineError;
use crate::geometry::{Rect, Vector};

use super::capability::{FixedUpdate, Node, Render};
use super::entity::Entity;

/// A straight stroke starting at the entity's position.
#[derive(Debug, Clone, PartialEq)]
pub struct LineEntity {
    pub entity: Entity,
    pub direction: Vector,
    pub length: f64,
    pub style: LineStyle,
}

impl LineEntity {
    pub fn new(from: Vector, direction: Vector, length: f64, thickness: f64, color: Color) -> Self {
        Self {
            entity: Entity::new(Rect::from_parts(from, Default::default())),
            direction,
            length,
            style: LineStyle {
                width: thickness,
                color,
                cap: LineCap::default(),
            },
        }
    }

    pub fn between(from: Vector, to: Vector, thickness: f64, color: Color) -> Self {
        Self::new(
            from,
            from.direction_to(to),
            from.distance_to(to),
            thickness,
            color,
        )
    }

    pub fn set_cap(&mut self, cap: LineCap) {
        self.style.cap = cap;
    }

    pub fn from(&self) -> Vector {
        self.entity.bounds.pos
    }

    pub fn to(&self) -> Vector {
        self.from() + self.direction * self.length
    }
}

impl Render for LineEntity {
    fn render(&mut self, surface: &mut dyn Surface, _engine: &Engine) -> Result<(), EngineError> {
        surface.stroke_line(self.from(), self.to(), &self.style);
        Ok(())
    }
}

impl FixedUpdate for LineEntity {
    fn fixed_update(&mut self, engine: &Engine) {
        self.entity.advance(engine.max_tps());
    }
}

impl Node for LineEntity {
    fn entity_mut(&mut self) -> &mut Entity {
        &mut self.entity
    }

    fn as_render(&mut self) -> Option<&mut dyn Render> {
        Some(self)
    }

    fn as_fixed_update(&mut self) -> Option<&mut dyn FixedUpdate> {
        Some(self)
    }
}
