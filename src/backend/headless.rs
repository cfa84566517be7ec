//! In-memory window host.
//!
//! [`HeadlessHost`] runs the frame loop without a window: it plays a fixed
//! number of frames, injects scripted input at chosen frames, and records
//! every draw call on a [`RecordingSurface`]. Tests and the demo's
//! `--headless` mode use it.

use std::thread;
use std::time::Duration;

use rustc_hash::FxHashMap;

use crate::error::EngineError;
use crate::events::input::InputEvent;
use crate::geometry::{Dimensions, Rect, Vector};

use super::host::{FrameHandler, WindowHost};
use super::surface::{Color, FontSpec, ImageData, ImageHandle, LineStyle, Surface, TextMetrics};

/// One recorded drawing operation.
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCall {
    FillRect { rect: Rect, color: Color },
    Image { image: ImageHandle, dest: Rect },
    Line { from: Vector, to: Vector, style: LineStyle },
    Text { text: String, baseline: Vector, color: Color },
}

/// Surface that records draw calls instead of rasterising them.
///
/// Text is measured with a fixed advance of `0.6 × size` per character and a
/// height of `size`.
#[derive(Debug, Default)]
pub struct RecordingSurface {
    size: Dimensions,
    calls: Vec<DrawCall>,
    images: FxHashMap<ImageHandle, (u32, u32)>,
    next_image: u64,
}

impl RecordingSurface {
    pub fn new(size: Dimensions) -> Self {
        Self {
            size,
            ..Self::default()
        }
    }

    /// Calls recorded since the last [`RecordingSurface::begin_frame`].
    pub fn calls(&self) -> &[DrawCall] {
        &self.calls
    }

    pub fn begin_frame(&mut self) {
        self.calls.clear();
    }

    /// Number of images uploaded so far.
    pub fn image_count(&self) -> usize {
        self.images.len()
    }
}

impl Surface for RecordingSurface {
    fn width(&self) -> f64 {
        self.size.width
    }

    fn height(&self) -> f64 {
        self.size.height
    }

    fn fill_rect(&mut self, rect: Rect, color: Color) {
        self.calls.push(DrawCall::FillRect { rect, color });
    }

    fn load_image(&mut self, image: &ImageData) -> Result<ImageHandle, EngineError> {
        if image.width == 0 || image.height == 0 {
            return Err(EngineError::Surface("cannot upload an empty image".into()));
        }
        self.next_image += 1;
        let handle = ImageHandle(self.next_image);
        self.images.insert(handle, (image.width, image.height));
        Ok(handle)
    }

    fn draw_image(&mut self, image: ImageHandle, dest: Rect) {
        self.calls.push(DrawCall::Image { image, dest });
    }

    fn stroke_line(&mut self, from: Vector, to: Vector, style: &LineStyle) {
        self.calls.push(DrawCall::Line {
            from,
            to,
            style: *style,
        });
    }

    fn measure_text(&mut self, text: &str, font: &FontSpec) -> TextMetrics {
        TextMetrics {
            width: text.chars().count() as f64 * font.size * 0.6,
            height: font.size,
        }
    }

    fn fill_text(&mut self, text: &str, baseline: Vector, _font: &FontSpec, color: Color) {
        self.calls.push(DrawCall::Text {
            text: text.to_string(),
            baseline,
            color,
        });
    }
}

/// Window host that needs no display.
pub struct HeadlessHost {
    surface: RecordingSurface,
    max_frames: Option<u64>,
    frame_interval: Option<Duration>,
    script: FxHashMap<u64, Vec<InputEvent>>,
    frames_run: u64,
    title: String,
    cursor_visible: bool,
}

impl HeadlessHost {
    pub fn new(dimensions: Dimensions) -> Self {
        Self {
            surface: RecordingSurface::new(dimensions),
            max_frames: None,
            frame_interval: None,
            script: FxHashMap::default(),
            frames_run: 0,
            title: String::new(),
            cursor_visible: true,
        }
    }

    /// Stop after `frames` frames. Without a limit the loop only ends when
    /// the handler asks it to.
    pub fn with_frame_limit(mut self, frames: u64) -> Self {
        self.max_frames = Some(frames);
        self
    }

    /// Sleep this long after each frame, standing in for vsync.
    pub fn with_frame_interval(mut self, interval: Duration) -> Self {
        self.frame_interval = Some(interval);
        self
    }

    /// Deliver `event` just before frame number `frame` (zero based).
    pub fn push_input(&mut self, frame: u64, event: InputEvent) {
        self.script.entry(frame).or_default().push(event);
    }

    pub fn surface(&self) -> &RecordingSurface {
        &self.surface
    }

    pub fn frames_run(&self) -> u64 {
        self.frames_run
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn cursor_visible(&self) -> bool {
        self.cursor_visible
    }
}

impl WindowHost for HeadlessHost {
    fn dimensions(&self) -> Dimensions {
        Dimensions::new(self.surface.width(), self.surface.height())
    }

    fn set_title(&mut self, title: &str) {
        self.title = title.to_string();
    }

    fn set_cursor_visible(&mut self, visible: bool) {
        self.cursor_visible = visible;
    }

    fn main_loop(&mut self, handler: &mut dyn FrameHandler) -> Result<(), EngineError> {
        loop {
            if handler.should_close() || self.max_frames.is_some_and(|max| self.frames_run >= max)
            {
                return Ok(());
            }

            if let Some(events) = self.script.remove(&self.frames_run) {
                for event in events {
                    handler.input(event);
                }
            }

            self.surface.begin_frame();
            handler.frame(&mut self.surface)?;
            self.frames_run += 1;

            if let Some(title) = handler.take_title() {
                self.set_title(&title);
            }

            if let Some(interval) = self.frame_interval {
                thread::sleep(interval);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct CountingHandler {
        frames: u64,
        inputs: Vec<InputEvent>,
        close_after: Option<u64>,
    }

    impl FrameHandler for CountingHandler {
        fn input(&mut self, event: InputEvent) {
            self.inputs.push(event);
        }

        fn frame(&mut self, surface: &mut dyn Surface) -> Result<(), EngineError> {
            self.frames += 1;
            surface.clear(Color::BLACK);
            Ok(())
        }

        fn take_title(&mut self) -> Option<String> {
            (self.frames == 1).then(|| "first".to_string())
        }

        fn should_close(&self) -> bool {
            self.close_after.is_some_and(|n| self.frames >= n)
        }
    }

    #[test]
    fn test_runs_frame_limit_and_delivers_script() {
        let mut host = HeadlessHost::new(Dimensions::new(40.0, 30.0)).with_frame_limit(3);
        host.push_input(1, InputEvent::KeyChar('x'));
        let mut handler = CountingHandler {
            frames: 0,
            inputs: Vec::new(),
            close_after: None,
        };

        host.main_loop(&mut handler).unwrap();

        assert_eq!(handler.frames, 3);
        assert_eq!(host.frames_run(), 3);
        assert_eq!(handler.inputs, vec![InputEvent::KeyChar('x')]);
        assert_eq!(host.title(), "first");
        assert_eq!(
            host.surface().calls(),
            &[DrawCall::FillRect {
                rect: Rect::from_size(40.0, 30.0),
                color: Color::BLACK
            }]
        );
    }

    #[test]
    fn test_handler_can_close_loop() {
        let mut host = HeadlessHost::new(Dimensions::new(10.0, 10.0));
        let mut handler = CountingHandler {
            frames: 0,
            inputs: Vec::new(),
            close_after: Some(5),
        };
        host.main_loop(&mut handler).unwrap();
        assert_eq!(handler.frames, 5);
    }

    #[test]
    fn test_measure_text_is_deterministic() {
        let mut surface = RecordingSurface::new(Dimensions::new(10.0, 10.0));
        let m = surface.measure_text("abcd", &FontSpec::new("font.ttf", 10.0));
        assert_eq!(m, TextMetrics { width: 24.0, height: 10.0 });
    }
}
