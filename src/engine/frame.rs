use log::error;

use crate::backend::host::FrameHandler;
use crate::backend::surface::{Color, Surface};
use crate::error::EngineError;
use crate::events::input::InputEvent;

use super::Engine;
use super::stats::RateCounter;

/// Bridges a window host's main loop to the engine's render pass.
pub(crate) struct FrameDriver {
    engine: Engine,
    counter: RateCounter,
}

impl FrameDriver {
    pub(crate) fn new(engine: Engine) -> Self {
        Self {
            engine,
            counter: RateCounter::new(),
        }
    }
}

impl FrameHandler for FrameDriver {
    fn input(&mut self, event: InputEvent) {
        self.engine.dispatch_input(&event);
    }

    fn frame(&mut self, surface: &mut dyn Surface) -> Result<(), EngineError> {
        self.engine.apply_queued_scene();

        surface.clear(Color::BLACK);
        if let Err(err) = self.engine.render_frame(surface) {
            error!("render failed: {err}");
            return Err(err);
        }

        if let Some(fps) = self.counter.record() {
            self.engine.report_fps(fps);
        }
        Ok(())
    }

    fn take_title(&mut self) -> Option<String> {
        self.engine.take_pending_title()
    }

    fn should_close(&self) -> bool {
        self.engine.quit_requested()
    }
}
