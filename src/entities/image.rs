use std::path::Path;
use std::sync::Arc;

use log::debug;

use crate::backend::surface::{Color, ImageData, ImageHandle, Surface};
use crate::engine::Engine;
use crate::error::EngineError;
use crate::geometry::{Dimensions, Rect};

use super::capability::{FixedUpdate, Node, Render};
use super::entity::Entity;

/// An entity drawn as a bitmap stretched over its bounds.
///
/// The pixels are uploaded to the drawing surface on the first render and
/// the returned handle is reused afterwards.
#[derive(Debug, Clone)]
pub struct ImageEntity {
    pub entity: Entity,
    image: Arc<ImageData>,
    handle: Option<ImageHandle>,
}

impl ImageEntity {
    /// Entity at the origin, sized to the image.
    pub fn new(image: impl Into<Arc<ImageData>>) -> Self {
        let image = image.into();
        let bounds = Rect::from_size(f64::from(image.width), f64::from(image.height));
        Self {
            entity: Entity::new(bounds),
            image,
            handle: None,
        }
    }

    /// Decode an image file from disk.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, EngineError> {
        let path = path.as_ref();
        let bytes = std::fs::read(path).map_err(|source| EngineError::ImageLoad {
            path: path.to_path_buf(),
            source,
        })?;
        let decoded = ::image::load_from_memory(&bytes)?.to_rgba8();
        let (width, height) = decoded.dimensions();
        debug!("decoded {} ({width}x{height})", path.display());
        Ok(Self::new(ImageData::new(width, height, decoded.into_raw())?))
    }

    /// Solid rectangle.
    pub fn rect(color: Color, size: Dimensions) -> Self {
        let width = size.width.max(0.0).round() as u32;
        let height = size.height.max(0.0).round() as u32;
        Self::new(ImageData::filled(width, height, color))
    }

    /// Solid disk on a transparent square of side `2 × radius`.
    pub fn circle(color: Color, radius: f64) -> Self {
        let side = (radius.max(0.0) * 2.0).round() as u32;
        let mut data = ImageData::filled(side, side, Color::TRANSPARENT);
        let center = f64::from(side) / 2.0;
        for y in 0..side {
            for x in 0..side {
                let dx = f64::from(x) + 0.5 - center;
                let dy = f64::from(y) + 0.5 - center;
                if dx * dx + dy * dy <= radius * radius {
                    data.set_pixel(x, y, color);
                }
            }
        }
        Self::new(data)
    }

    pub fn image(&self) -> &ImageData {
        &self.image
    }
}

impl Render for ImageEntity {
    fn render(&mut self, surface: &mut dyn Surface, _engine: &Engine) -> Result<(), EngineError> {
        let handle = match self.handle {
            Some(handle) => handle,
            None => {
                let handle = surface.load_image(&self.image)?;
                self.handle = Some(handle);
                handle
            }
        };

        if self.entity.visible {
            surface.draw_image(handle, self.entity.bounds);
        }
        Ok(())
    }
}

impl FixedUpdate for ImageEntity {
    fn fixed_update(&mut self, engine: &Engine) {
        self.entity.advance(engine.max_tps());
    }
}

impl Node for ImageEntity {
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
