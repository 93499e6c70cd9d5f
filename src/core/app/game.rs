//=========================================================================
// Game Callbacks
//=========================================================================
//
// Hooks the logic thread calls into user code. Every hook has a no-op
// default, so a game only overrides what it needs.
//
//   on_start
//     ├─ on_surface_ready / on_surface_changed / on_surface_lost
//     ├─ on_input            (per event, before the tick)
//     ├─ on_update           (per fixed step, before systems run)
//     ├─ on_draw             (after the engine's drawables)
//     └─ on_pause / on_resume
//   on_stop
//
//=========================================================================

use crate::core::engine::Engine;
use crate::core::platform_bridge::{InputEvent, Renderer, SurfaceSize};

//=== GraphicsListener ====================================================

/// Surface lifecycle notifications.
pub trait GraphicsListener {
    fn on_surface_ready(&mut self, _engine: &mut Engine, _size: SurfaceSize) {}

    fn on_surface_changed(&mut self, _engine: &mut Engine, _size: SurfaceSize) {}

    /// Drawing stops until the next `on_surface_ready`.
    fn on_surface_lost(&mut self, _engine: &mut Engine) {}
}

//=== Game ================================================================

/// A game driven by an [`Application`](super::Application).
///
/// The game is moved to the logic thread and handed back by
/// [`Application::run_with`](super::Application::run_with) once that
/// thread ends.
pub trait Game: GraphicsListener + Send + 'static {
    /// Runs once, right after the engine starts.
    fn on_start(&mut self, _engine: &mut Engine) {}

    /// Runs once per fixed step, before the engine's systems.
    fn on_update(&mut self, _engine: &mut Engine, _dt: f64) {}

    /// Draws on top of the engine's drawables.
    fn on_draw(&self, _engine: &Engine, _renderer: &mut dyn Renderer) {}

    fn on_input(&mut self, _engine: &mut Engine, _event: &InputEvent) {}

    fn on_pause(&mut self, _engine: &mut Engine) {}

    fn on_resume(&mut self, _engine: &mut Engine) {}

    /// Runs once before the engine stops. Systems are still attached.
    fn on_stop(&mut self, _engine: &mut Engine) {}
}
