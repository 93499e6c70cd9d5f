//=========================================================================
// Engine
//=========================================================================
//
// Owns the world, its systems and the drawables, and drives one logic
// tick at a time.
//
// Tick:
//   1. Publish finished asset loads
//   2. Run enabled systems (priority order)
//   3. Dispatch events (pending → current, listeners)
//
// Draw:
//   clear(clear_color) → visible drawables, ascending layer, stable
//
//=========================================================================

//=== External Dependencies ===============================================

use std::sync::Arc;

use log::{debug, info};

//=== Internal Dependencies ===============================================

use super::events::{StateChanged, SurfaceChanged, SurfaceLost, SurfaceReady};
use super::{EngineError, EngineState};
use crate::core::config::EngineConfig;
use crate::core::ecs::{System, SystemId, SystemsManager, World};
use crate::core::math::Color4f;
use crate::core::memory::IdMap;
use crate::core::platform_bridge::{
    Drawable, LocalNativeBridge, NativeBridge, Renderer, SurfaceSize,
};

//=== DrawableId ==========================================================

/// Handle returned by [`Engine::add_drawable`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DrawableId(u64);

//=== Engine ==============================================================

pub struct Engine {
    world: World,
    systems: SystemsManager,
    drawables: IdMap<Box<dyn Drawable>>,
    state: EngineState,
    frame: u64,
    elapsed: f64,
    clear_color: Color4f,
    surface: Option<SurfaceSize>,
    native: Arc<dyn NativeBridge>,
}

impl Engine {
    pub fn new(config: &EngineConfig) -> Self {
        Self {
            world: World::new(config.asset_root.clone()),
            systems: SystemsManager::new(),
            drawables: IdMap::new(),
            state: EngineState::Created,
            frame: 0,
            elapsed: 0.0,
            clear_color: config.clear_color,
            surface: None,
            native: Arc::new(LocalNativeBridge::new()),
        }
    }

    /// Replaces the default in-process native bridge.
    pub fn with_native_bridge(mut self, native: Arc<dyn NativeBridge>) -> Self {
        self.native = native;
        self
    }

    //--- Lifecycle --------------------------------------------------------

    fn transition(
        &mut self,
        action: &'static str,
        allowed: &[EngineState],
        to: EngineState,
    ) -> Result<(), EngineError> {
        let from = self.state;
        if !allowed.contains(&from) {
            return Err(EngineError::InvalidTransition { from, action });
        }

        self.state = to;
        info!(target: "engine", "engine {} -> {}", from, to);
        self.world.events_mut().publish(StateChanged { from, to });
        Ok(())
    }

    pub fn start(&mut self) -> Result<(), EngineError> {
        self.transition("start", &[EngineState::Created], EngineState::Running)
    }

    pub fn pause(&mut self) -> Result<(), EngineError> {
        self.transition("pause", &[EngineState::Running], EngineState::Paused)
    }

    pub fn resume(&mut self) -> Result<(), EngineError> {
        self.transition("resume", &[EngineState::Paused], EngineState::Running)
    }

    /// Stops the engine and detaches every system. Final.
    pub fn stop(&mut self) -> Result<(), EngineError> {
        self.transition(
            "stop",
            &[EngineState::Created, EngineState::Running, EngineState::Paused],
            EngineState::Stopped,
        )?;
        self.systems.clear(&mut self.world);
        Ok(())
    }

    pub fn state(&self) -> EngineState {
        self.state
    }

    pub fn is_running(&self) -> bool {
        self.state == EngineState::Running
    }

    //--- Tick -------------------------------------------------------------

    /// Runs one logic tick of `dt` seconds. No-op unless running.
    ///
    /// Returns `true` if the tick ran.
    pub fn update(&mut self, dt: f64) -> bool {
        if self.state != EngineState::Running {
            return false;
        }

        self.world.poll_assets();
        self.systems.update_all(&mut self.world, dt);
        self.world.events_mut().dispatch();

        self.frame += 1;
        self.elapsed += dt;
        true
    }

    /// Number of ticks run so far.
    pub fn frame(&self) -> u64 {
        self.frame
    }

    /// Simulated seconds run so far.
    pub fn elapsed(&self) -> f64 {
        self.elapsed
    }

    //--- Systems ----------------------------------------------------------

    pub fn add_system<S: System + 'static>(&mut self, system: S) -> SystemId {
        self.systems.add(&mut self.world, system)
    }

    pub fn remove_system(&mut self, id: SystemId) -> Option<Box<dyn System>> {
        self.systems.remove(&mut self.world, id)
    }

    pub fn set_system_enabled(&mut self, id: SystemId, enabled: bool) -> bool {
        self.systems.set_enabled(id, enabled)
    }

    pub fn system_count(&self) -> usize {
        self.systems.len()
    }

    //--- Drawing ----------------------------------------------------------

    pub fn add_drawable(&mut self, drawable: Box<dyn Drawable>) -> DrawableId {
        DrawableId(self.drawables.insert(drawable))
    }

    pub fn remove_drawable(&mut self, id: DrawableId) -> Option<Box<dyn Drawable>> {
        self.drawables.remove(id.0)
    }

    pub fn drawable_count(&self) -> usize {
        self.drawables.len()
    }

    /// Clears with the clear color, then draws visible drawables by layer.
    ///
    /// Drawables sharing a layer keep their insertion order. Returns how
    /// many were drawn.
    pub fn draw(&self, renderer: &mut dyn Renderer) -> usize {
        renderer.clear(self.clear_color);

        let mut visible: Vec<&dyn Drawable> = self
            .drawables
            .iter()
            .map(|(_, drawable)| drawable.as_ref())
            .filter(|drawable| drawable.is_visible())
            .collect();
        visible.sort_by_key(|drawable| drawable.layer());

        for drawable in &visible {
            drawable.draw(renderer);
        }
        visible.len()
    }

    pub fn clear_color(&self) -> Color4f {
        self.clear_color
    }

    pub fn set_clear_color(&mut self, color: Color4f) {
        self.clear_color = color;
    }

    //--- Surface ----------------------------------------------------------

    pub fn surface(&self) -> Option<SurfaceSize> {
        self.surface
    }

    /// Records a new or resized surface and publishes the matching event.
    pub fn surface_ready(&mut self, size: SurfaceSize) {
        let had_surface = self.surface.replace(size).is_some();
        if had_surface {
            debug!(target: "engine", "surface changed to {}x{}", size.width, size.height);
            self.world.events_mut().publish(SurfaceChanged(size));
        } else {
            info!(target: "engine", "surface ready ({}x{})", size.width, size.height);
            self.world.events_mut().publish(SurfaceReady(size));
        }
    }

    pub fn surface_lost(&mut self) {
        if self.surface.take().is_some() {
            info!(target: "engine", "surface lost");
            self.world.events_mut().publish(SurfaceLost);
        }
    }

    //--- Accessors --------------------------------------------------------

    pub fn world(&self) -> &World {
        &self.world
    }

    pub fn world_mut(&mut self) -> &mut World {
        &mut self.world
    }

    pub fn native(&self) -> &dyn NativeBridge {
        self.native.as_ref()
    }

    pub fn native_bridge(&self) -> Arc<dyn NativeBridge> {
        Arc::clone(&self.native)
    }
}

impl Default for Engine {
    fn default() -> Self {
        Self::new(&EngineConfig::default())
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
