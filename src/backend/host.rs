//! Window host capability.
//!
//! A [`WindowHost`] owns the OS window and its drawing surface and runs the
//! blocking frame loop. The engine plugs into it through [`FrameHandler`]:
//! the host delivers input events and asks for one frame at a time, on the
//! thread that owns the window.

use crate::error::EngineError;
use crate::events::input::InputEvent;
use crate::geometry::Dimensions;

use super::surface::Surface;

/// Callbacks a host invokes from inside its main loop.
pub trait FrameHandler {
    /// Called for each input event, before the frame it arrived with.
    fn input(&mut self, event: InputEvent);

    /// Draw one frame. An error ends the main loop and is returned from it.
    fn frame(&mut self, surface: &mut dyn Surface) -> Result<(), EngineError>;

    /// Window title change requested since the last call, if any.
    fn take_title(&mut self) -> Option<String>;

    /// Whether the handler wants the loop to stop.
    fn should_close(&self) -> bool;
}

pub trait WindowHost {
    /// Pixel size of the window's drawing area.
    fn dimensions(&self) -> Dimensions;

    fn set_title(&mut self, title: &str);

    fn set_cursor_visible(&mut self, visible: bool);

    /// Run the frame loop until the window closes or the handler asks to stop.
    ///
    /// Implementations must, per iteration: deliver pending input through
    /// [`FrameHandler::input`], call [`FrameHandler::frame`] once, then apply
    /// any title returned by [`FrameHandler::take_title`].
    fn main_loop(&mut self, handler: &mut dyn FrameHandler) -> Result<(), EngineError>;
}
