use std::sync::{PoisonError, RwLock};

use crate::backend::surface::{Color, FontSpec, Surface};
use crate::engine::Engine;
use crate::error::EngineError;
use crate::geometry::{Dimensions, Rect, Vector};

use super::capability::{FixedUpdate, Node, Render};
use super::entity::Entity;

/// Font and colour used by [`TextEntity::simple`].
#[derive(Debug, Clone, PartialEq)]
pub struct TextStyle {
    pub font: FontSpec,
    pub color: Color,
}

impl Default for TextStyle {
    fn default() -> Self {
        Self {
            font: FontSpec::new("", 20.0),
            color: Color::WHITE,
        }
    }
}

static DEFAULT_STYLE: RwLock<Option<TextStyle>> = RwLock::new(None);

/// Which axes a [`TextEntity`] is centred on inside its centring rect.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TextCentering {
    pub vertical: bool,
    pub horizontal: bool,
}

impl TextCentering {
    pub const NONE: TextCentering = TextCentering {
        vertical: false,
        horizontal: false,
    };
    pub const VERTICAL: TextCentering = TextCentering {
        vertical: true,
        horizontal: false,
    };
    pub const HORIZONTAL: TextCentering = TextCentering {
        vertical: false,
        horizontal: true,
    };
    pub const BOTH: TextCentering = TextCentering {
        vertical: true,
        horizontal: true,
    };
}

/// A single line of text.
///
/// The entity's size is the measured extent of the text. Measuring needs the
/// drawing surface, so it happens lazily on the next render after the text
/// or font changes. Centring is applied at the same time; an unset centring
/// rect means the engine's bounds.
#[derive(Debug, Clone, PartialEq)]
pub struct TextEntity {
    pub entity: Entity,
    text: String,
    font: FontSpec,
    color: Color,
    centered_in: Rect,
    centering: TextCentering,
    measured: bool,
}

impl TextEntity {
    pub fn new(text: impl Into<String>, font: FontSpec, color: Color) -> Self {
        Self {
            entity: Entity::default(),
            text: text.into(),
            font,
            color,
            centered_in: Rect::default(),
            centering: TextCentering::NONE,
            measured: false,
        }
    }

    /// Text in the process-wide default style.
    pub fn simple(text: impl Into<String>) -> Self {
        let style = Self::default_style();
        Self::new(text, style.font, style.color)
    }

    pub fn set_default_style(style: TextStyle) {
        *DEFAULT_STYLE.write().unwrap_or_else(PoisonError::into_inner) = Some(style);
    }

    pub fn default_style() -> TextStyle {
        DEFAULT_STYLE
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
            .unwrap_or_default()
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn font(&self) -> &FontSpec {
        &self.font
    }

    pub fn color(&self) -> Color {
        self.color
    }

    pub fn is_measured(&self) -> bool {
        self.measured
    }

    pub fn set_text(&mut self, text: impl Into<String>) {
        let text = text.into();
        if text != self.text {
            self.text = text;
            self.measured = false;
        }
    }

    pub fn set_font(&mut self, font: FontSpec) {
        self.font = font;
        self.measured = false;
    }

    pub fn set_font_size(&mut self, size: f64) {
        self.font.size = size;
        self.measured = false;
    }

    pub fn set_color(&mut self, color: Color) {
        self.color = color;
    }

    pub fn set_centered_in(&mut self, rect: Rect) {
        self.centered_in = rect;
        self.measured = false;
    }

    pub fn set_centering(&mut self, centering: TextCentering) {
        self.centering = centering;
        self.measured = false;
    }

    /// Size the entity to its text and apply centring.
    pub fn measure(&mut self, surface: &mut dyn Surface, engine: &Engine) {
        let metrics = surface.measure_text(&self.text, &self.font);
        self.entity.bounds.size = Dimensions::new(metrics.width, metrics.height);

        let area = if self.centered_in.is_zero() {
            engine.bounds()
        } else {
            self.centered_in
        };
        if self.centering.vertical {
            self.entity.bounds.pos.y = area.height() / 2.0 - metrics.height / 2.0;
        }
        if self.centering.horizontal {
            self.entity.bounds.pos.x = area.width() / 2.0 - metrics.width / 2.0;
        }
        self.measured = true;
    }
}

impl Render for TextEntity {
    fn render(&mut self, surface: &mut dyn Surface, engine: &Engine) -> Result<(), EngineError> {
        if !self.measured {
            self.measure(surface, engine);
        }
        let bounds = self.entity.bounds;
        let baseline = Vector::new(bounds.x(), bounds.y() + bounds.height());
        surface.fill_text(&self.text, baseline, &self.font, self.color);
        Ok(())
    }
}

impl FixedUpdate for TextEntity {
    fn fixed_update(&mut self, engine: &Engine) {
        self.entity.advance(engine.max_tps());
    }
}

impl Node for TextEntity {
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
