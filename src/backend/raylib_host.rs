//! Window host backed by raylib (cargo feature `raylib`).
//!
//! raylib must be driven from the thread that created the window, which is
//! the thread that calls [`Engine::run`](crate::engine::Engine::run).
//! Keyboard and mouse state is polled once per frame and turned into
//! [`InputEvent`]s before the frame is drawn.

use std::io::Cursor;

use ::raylib::prelude::{
    Color as RlColor, Font, Image, KeyboardKey, MouseButton as RlMouseButton, RaylibDraw,
    RaylibDrawHandle, RaylibHandle, RaylibThread, Rectangle, Texture2D, Vector2, measure_text_ex,
};
use log::{info, warn};
use rustc_hash::FxHashMap;

use crate::error::EngineError;
use crate::events::input::{InputEvent, KeyEvent, MouseButton};
use crate::geometry::{Dimensions, Rect, Vector};

use super::host::{FrameHandler, WindowHost};
use super::surface::{Color, FontSpec, ImageData, ImageHandle, LineCap, LineStyle, Surface, TextMetrics};

const MOUSE_BUTTONS: [(RlMouseButton, MouseButton); 5] = [
    (RlMouseButton::MOUSE_BUTTON_LEFT, MouseButton::Left),
    (RlMouseButton::MOUSE_BUTTON_MIDDLE, MouseButton::Middle),
    (RlMouseButton::MOUSE_BUTTON_RIGHT, MouseButton::Right),
    (RlMouseButton::MOUSE_BUTTON_SIDE, MouseButton::X1),
    (RlMouseButton::MOUSE_BUTTON_EXTRA, MouseButton::X2),
];

fn rl_color(c: Color) -> RlColor {
    RlColor::new(c.r, c.g, c.b, c.a)
}

fn rl_vec(v: Vector) -> Vector2 {
    Vector2::new(v.x as f32, v.y as f32)
}

fn rl_rect(r: Rect) -> Rectangle {
    Rectangle::new(r.x() as f32, r.y() as f32, r.width() as f32, r.height() as f32)
}

pub struct RaylibHost {
    rl: RaylibHandle,
    thread: RaylibThread,
    size: Dimensions,
    textures: FxHashMap<ImageHandle, Texture2D>,
    /// `None` marks a font that failed to load; the default font is used.
    fonts: FxHashMap<String, Option<Font>>,
    next_image: u64,
    held_keys: Vec<KeyboardKey>,
    mouse_pos: Vector2,
}

impl RaylibHost {
    /// Open a window of the given size.
    pub fn open(title: &str, size: Dimensions, target_fps: u32) -> Self {
        let (mut rl, thread) = ::raylib::init()
            .size(size.width as i32, size.height as i32)
            .title(title)
            .build();
        rl.set_target_fps(target_fps);
        // ESC should not close the window behind the engine's back
        rl.set_exit_key(None);
        let mouse_pos = rl.get_mouse_position();
        info!("opened {}x{} raylib window", size.width, size.height);

        Self {
            rl,
            thread,
            size,
            textures: FxHashMap::default(),
            fonts: FxHashMap::default(),
            next_image: 0,
            held_keys: Vec::new(),
            mouse_pos,
        }
    }

    fn poll_input(&mut self) -> Vec<InputEvent> {
        let mut events = Vec::new();

        while let Some(key) = self.rl.get_key_pressed() {
            if !self.held_keys.contains(&key) {
                self.held_keys.push(key);
            }
            events.push(InputEvent::KeyDown(key_event(key)));
        }
        let rl = &self.rl;
        self.held_keys.retain(|&key| {
            if rl.is_key_released(key) {
                events.push(InputEvent::KeyUp(key_event(key)));
                false
            } else {
                true
            }
        });
        while let Some(ch) = self.rl.get_char_pressed() {
            events.push(InputEvent::KeyChar(ch));
        }

        let pos = self.rl.get_mouse_position();
        if pos != self.mouse_pos {
            self.mouse_pos = pos;
            events.push(InputEvent::MouseMove {
                pos: Vector::new(f64::from(pos.x), f64::from(pos.y)),
            });
        }
        let at = Vector::new(f64::from(pos.x), f64::from(pos.y));
        for (rl_button, button) in MOUSE_BUTTONS {
            if self.rl.is_mouse_button_pressed(rl_button) {
                events.push(InputEvent::MouseDown { button, pos: at });
            }
            if self.rl.is_mouse_button_released(rl_button) {
                events.push(InputEvent::MouseUp { button, pos: at });
            }
        }
        events
    }
}

fn key_event(key: KeyboardKey) -> KeyEvent {
    let name = format!("{key:?}");
    KeyEvent::new(key as i32, None, name.trim_start_matches("KEY_"))
}

impl WindowHost for RaylibHost {
    fn dimensions(&self) -> Dimensions {
        self.size
    }

    fn set_title(&mut self, title: &str) {
        self.rl.set_window_title(&self.thread, title);
    }

    fn set_cursor_visible(&mut self, visible: bool) {
        if visible {
            self.rl.show_cursor();
        } else {
            self.rl.hide_cursor();
        }
    }

    fn main_loop(&mut self, handler: &mut dyn FrameHandler) -> Result<(), EngineError> {
        while !self.rl.window_should_close() && !handler.should_close() {
            for event in self.poll_input() {
                handler.input(event);
            }

            {
                let mut d = self.rl.begin_drawing(&self.thread);
                let mut surface = RaylibSurface {
                    d: &mut d,
                    thread: &self.thread,
                    size: self.size,
                    textures: &mut self.textures,
                    fonts: &mut self.fonts,
                    next_image: &mut self.next_image,
                };
                handler.frame(&mut surface)?;
            }

            if let Some(title) = handler.take_title() {
                self.set_title(&title);
            }
        }
        Ok(())
    }
}

/// [`Surface`] over one frame's raylib draw handle.
struct RaylibSurface<'a, 'b> {
    d: &'a mut RaylibDrawHandle<'b>,
    thread: &'a RaylibThread,
    size: Dimensions,
    textures: &'a mut FxHashMap<ImageHandle, Texture2D>,
    fonts: &'a mut FxHashMap<String, Option<Font>>,
    next_image: &'a mut u64,
}

impl RaylibSurface<'_, '_> {
    fn ensure_font(&mut self, path: &str) {
        if path.is_empty() || self.fonts.contains_key(path) {
            return;
        }
        let font = match self.d.load_font(self.thread, path) {
            Ok(font) => Some(font),
            Err(err) => {
                warn!("failed to load font {path}: {err}; using the default font");
                None
            }
        };
        self.fonts.insert(path.to_string(), font);
    }
}

impl Surface for RaylibSurface<'_, '_> {
    fn width(&self) -> f64 {
        self.size.width
    }

    fn height(&self) -> f64 {
        self.size.height
    }

    fn fill_rect(&mut self, rect: Rect, color: Color) {
        self.d.draw_rectangle_rec(rl_rect(rect), rl_color(color));
    }

    fn clear(&mut self, color: Color) {
        self.d.clear_background(rl_color(color));
    }

    fn load_image(&mut self, image: &ImageData) -> Result<ImageHandle, EngineError> {
        let rgba = ::image::RgbaImage::from_raw(image.width, image.height, image.pixels.clone())
            .ok_or_else(|| EngineError::InvalidImage("pixel buffer size mismatch".into()))?;
        let mut png = Cursor::new(Vec::new());
        rgba.write_to(&mut png, ::image::ImageFormat::Png)?;

        let decoded = Image::load_image_from_mem(".png", png.get_ref())
            .map_err(|e| EngineError::Surface(e.to_string()))?;
        let texture = self
            .d
            .load_texture_from_image(self.thread, &decoded)
            .map_err(|e| EngineError::Surface(e.to_string()))?;

        *self.next_image += 1;
        let handle = ImageHandle(*self.next_image);
        self.textures.insert(handle, texture);
        Ok(handle)
    }

    fn draw_image(&mut self, image: ImageHandle, dest: Rect) {
        if let Some(texture) = self.textures.get(&image) {
            let source = Rectangle::new(0.0, 0.0, texture.width as f32, texture.height as f32);
            self.d.draw_texture_pro(
                texture,
                source,
                rl_rect(dest),
                Vector2::zero(),
                0.0,
                RlColor::WHITE,
            );
        }
    }

    fn stroke_line(&mut self, from: Vector, to: Vector, style: &LineStyle) {
        let color = rl_color(style.color);
        let thick = style.width as f32;
        let (start, end) = match style.cap {
            LineCap::Square => {
                let dir = from.direction_to(to) * (style.width / 2.0);
                (from - dir, to + dir)
            }
            LineCap::Butt | LineCap::Round => (from, to),
        };
        self.d.draw_line_ex(rl_vec(start), rl_vec(end), thick, color);
        if style.cap == LineCap::Round {
            self.d.draw_circle_v(rl_vec(from), thick / 2.0, color);
            self.d.draw_circle_v(rl_vec(to), thick / 2.0, color);
        }
    }

    fn measure_text(&mut self, text: &str, font: &FontSpec) -> TextMetrics {
        self.ensure_font(&font.path);
        let size = font.size as f32;
        let spacing = size / 10.0;
        let measured = match self.fonts.get(&font.path).and_then(Option::as_ref) {
            Some(f) => measure_text_ex(f, text, size, spacing),
            None => measure_text_ex(self.d.get_font_default(), text, size, spacing),
        };
        TextMetrics {
            width: f64::from(measured.x),
            height: f64::from(measured.y),
        }
    }

    fn fill_text(&mut self, text: &str, baseline: Vector, font: &FontSpec, color: Color) {
        self.ensure_font(&font.path);
        let size = font.size as f32;
        let spacing = size / 10.0;
        // raylib positions text by its top-left corner
        let top_left = rl_vec(Vector::new(baseline.x, baseline.y - font.size));
        match self.fonts.get(&font.path).and_then(Option::as_ref) {
            Some(f) => self.d.draw_text_ex(f, text, top_left, size, spacing, rl_color(color)),
            None => {
                let default = self.d.get_font_default();
                self.d.draw_text_ex(&default, text, top_left, size, spacing, rl_color(color));
            }
        }
    }
}
