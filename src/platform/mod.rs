//=========================================================================
// Desktop Platform
//=========================================================================
//
// Bridges Winit (OS-level events) with the logic thread through the
// PlatformAdapter channels.
//
// Architecture:
// ```text
//  Main Thread:                       Logic Thread:
//  ┌───────────────────────────┐     ┌──────────────────┐
//  │  Winit Event Loop         │     │  Orchestrator    │
//  │   ↓                       │     │                  │
//  │  InputProcessor           │     │                  │
//  │   ├─ Converts Winit       │     │                  │
//  │   └─ Tracks modifiers     │     │                  │
//  │   ↓                       │     │                  │
//  │  InputBuffer              │     │                  │
//  │   ↓                       │     │                  │
//  │  RedrawRequested ─────────┼────►│  PlatformEvent   │
//  │   ↓ (flush + present)     │     │                  │
//  │  Frame ◄──────────────────┼─────│  DisplayList     │
//  └───────────────────────────┘     └──────────────────┘
//
//  Frame Boundary: RedrawRequested
//    → All buffered input sent as one PlatformEvent::Input
//    → Latest rendered Frame consumed, older ones skipped
//    → Empty buffers NOT sent
// ```
//
// The window is created lazily in `resumed` and dropped on `suspended`,
// which is what mobile targets require. No GPU work happens here; frames
// are consumed and counted.
//
//=========================================================================

//=== Submodules ==========================================================

mod input_buffer;
mod input_processor;

//=== External Dependencies ===============================================

use crossbeam_channel::{Receiver, Sender};
use log::{debug, error, info, trace, warn};
use winit::{
    application::ApplicationHandler,
    dpi::{LogicalSize, PhysicalSize},
    event::WindowEvent,
    event_loop::{ActiveEventLoop, EventLoop},
    window::{Window, WindowAttributes, WindowId},
};

//=== Internal Dependencies ===============================================

use crate::core::config::WindowConfig;
use crate::core::platform_bridge::{
    Frame, PlatformAdapter, PlatformError, PlatformEvent, SurfaceSize,
};
use input_buffer::InputBuffer;
use input_processor::InputProcessor;

//=== DesktopPlatform =====================================================

/// Winit-backed platform. Must run on the main thread on macOS/iOS.
pub(crate) struct DesktopPlatform {
    window: WindowConfig,
}

impl DesktopPlatform {
    pub(crate) fn new(window: WindowConfig) -> Self {
        Self { window }
    }
}

impl PlatformAdapter for DesktopPlatform {
    fn run(
        self,
        events: Sender<PlatformEvent>,
        frames: Receiver<Frame>,
    ) -> Result<(), PlatformError> {
        debug!(target: "platform", "starting winit event loop");

        let event_loop =
            EventLoop::new().map_err(|err| PlatformError::EventLoopCreation(err.to_string()))?;

        let mut handler = WindowHandler::new(self.window, events, frames);
        event_loop
            .run_app(&mut handler)
            .map_err(|err| PlatformError::EventLoopExecution(err.to_string()))?;

        match handler.error.take() {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}

//=== WindowHandler =======================================================

struct WindowHandler {
    config: WindowConfig,

    /// None until `resumed()`, and again while suspended.
    window: Option<Window>,

    buffer: InputBuffer,
    input_processor: InputProcessor,
    events: Sender<PlatformEvent>,
    frames: Receiver<Frame>,

    suspended: bool,
    presented: u64,
    error: Option<PlatformError>,
}

impl WindowHandler {
    fn new(config: WindowConfig, events: Sender<PlatformEvent>, frames: Receiver<Frame>) -> Self {
        Self {
            config,
            window: None,
            buffer: InputBuffer::new(),
            input_processor: InputProcessor::new(),
            events,
            frames,
            suspended: false,
            presented: 0,
            error: None,
        }
    }

    //--- Internal Helpers -------------------------------------------------

    /// If the logic thread is gone the event is dropped; the window stays
    /// usable so the user can still close it.
    fn send(&self, event: PlatformEvent) {
        if let Err(err) = self.events.send(event) {
            warn!(target: "platform", "logic thread disconnected, dropping {:?}", err.0);
        }
    }

    fn flush_input_buffer(&mut self) {
        if let Some(batch) = self.buffer.drain() {
            trace!(target: "platform", "flushing {} input events", batch.len());
            self.send(PlatformEvent::Input(batch));
        }
    }

    /// Takes every rendered frame waiting and presents only the newest.
    fn consume_frames(&mut self) -> Option<u64> {
        let latest = self.frames.try_iter().last()?;
        self.present(&latest);
        Some(latest.number)
    }

    fn present(&mut self, frame: &Frame) {
        self.presented += 1;
        trace!(
            target: "platform",
            "presenting frame {} ({} commands)",
            frame.number,
            frame.commands.len()
        );
    }

    fn create_window(&mut self, event_loop: &ActiveEventLoop) {
        let attrs = WindowAttributes::default()
            .with_title(self.config.title.clone())
            .with_inner_size(LogicalSize::new(self.config.width, self.config.height));

        match event_loop.create_window(attrs) {
            Ok(window) => {
                let size = surface_size(window.inner_size());
                info!(
                    target: "platform",
                    "window created: {}x{} @ {}x DPI",
                    size.width,
                    size.height,
                    window.scale_factor()
                );
                window.request_redraw();
                self.window = Some(window);
                self.send(PlatformEvent::SurfaceCreated(size));
            }
            Err(err) => {
                error!(target: "platform", "window creation failed: {}", err);
                self.error = Some(PlatformError::WindowCreation(err.to_string()));
                self.send(PlatformEvent::Closed);
                event_loop.exit();
            }
        }
    }
}

fn surface_size(size: PhysicalSize<u32>) -> SurfaceSize {
    SurfaceSize::new(size.width, size.height)
}

//=== Winit Integration ===================================================

impl ApplicationHandler for WindowHandler {
    /// Startup, and every return from the background on mobile.
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.suspended {
            self.suspended = false;
            self.send(PlatformEvent::Resumed);
        }

        if self.window.is_none() {
            self.create_window(event_loop);
        }
    }

    fn suspended(&mut self, _event_loop: &ActiveEventLoop) {
        info!(target: "platform", "suspended, releasing window");
        self.suspended = true;
        self.buffer.clear();
        self.input_processor.release_all();
        self.window = None;
        self.send(PlatformEvent::Paused);
        self.send(PlatformEvent::SurfaceDestroyed);
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _window_id: WindowId, event: WindowEvent) {
        match &event {
            WindowEvent::CloseRequested => {
                info!(target: "platform", "window close requested");
                self.send(PlatformEvent::Closed);
                event_loop.exit();
            }

            WindowEvent::Resized(size) => {
                let size = surface_size(*size);
                if !size.is_empty() {
                    self.send(PlatformEvent::SurfaceChanged(size));
                }
            }

            WindowEvent::Focused(false) => {
                self.input_processor.release_all();
            }

            WindowEvent::ModifiersChanged(modifiers) => {
                self.input_processor.update_modifiers(modifiers.state());
            }

            WindowEvent::CursorMoved { position, .. } => {
                let event = self
                    .input_processor
                    .process_mouse_move(position.x as f32, position.y as f32);
                self.buffer.push(event);
            }

            WindowEvent::KeyboardInput { event: key_event, .. } => {
                match self.input_processor.process_key_event(key_event) {
                    Some(event) => self.buffer.push(event),
                    None => trace!(target: "platform", "unmapped key ignored"),
                }
            }

            WindowEvent::MouseInput { state, button, .. } => {
                let event = self.input_processor.process_mouse_button(*button, *state);
                self.buffer.push(event);
            }

            WindowEvent::Touch(touch) => {
                let event = self.input_processor.process_touch(touch);
                self.buffer.push(event);
            }

            WindowEvent::RedrawRequested => {
                self.flush_input_buffer();
                self.consume_frames();

                if let Some(window) = &self.window {
                    window.request_redraw();
                }
            }

            _ => {}
        }
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::platform_bridge::{InputEvent, KeyCode, Modifiers};
    use crossbeam_channel::unbounded;

    fn handler() -> (WindowHandler, Receiver<PlatformEvent>, Sender<Frame>) {
        let (event_tx, event_rx) = unbounded();
        let (frame_tx, frame_rx) = unbounded();
        (
            WindowHandler::new(WindowConfig::default(), event_tx, frame_rx),
            event_rx,
            frame_tx,
        )
    }

    fn space() -> InputEvent {
        InputEvent::KeyDown {
            key: KeyCode::Space,
            modifiers: Modifiers::NONE,
        }
    }

    #[test]
    fn window_is_created_lazily() {
        let (handler, _events, _frames) = handler();
        assert!(handler.window.is_none());
    }

    #[test]
    fn flush_empty_buffer_is_noop() {
        let (mut handler, events, _frames) = handler();
        handler.flush_input_buffer();
        assert!(events.try_recv().is_err());
    }

    #[test]
    fn flush_sends_buffered_events_once() {
        let (mut handler, events, _frames) = handler();
        handler.buffer.push(space());

        handler.flush_input_buffer();
        handler.flush_input_buffer();

        assert_eq!(events.try_recv(), Ok(PlatformEvent::Input(vec![space()])));
        assert!(events.try_recv().is_err());
    }

    #[test]
    fn flush_handles_disconnected_channel() {
        let (mut handler, events, _frames) = handler();
        handler.buffer.push(space());
        drop(events);

        handler.flush_input_buffer();
        assert!(handler.buffer.is_empty());
    }

    #[test]
    fn only_the_newest_frame_is_presented() {
        let (mut handler, _events, frames) = handler();
        assert_eq!(handler.consume_frames(), None);

        for number in 1..=3 {
            frames
                .send(Frame {
                    number,
                    commands: Vec::new(),
                })
                .unwrap();
        }

        assert_eq!(handler.consume_frames(), Some(3));
        assert_eq!(handler.presented, 1);
        assert_eq!(handler.consume_frames(), None);
    }

    #[test]
    fn physical_size_maps_to_surface_size() {
        assert_eq!(
            surface_size(PhysicalSize::new(1280, 720)),
            SurfaceSize::new(1280, 720)
        );
    }
}
