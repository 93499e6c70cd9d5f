//=========================================================================
// Arcade Engine
//=========================================================================
//
// Fixed-timestep driver over an `Engine`.
//
//   elapsed ──► accumulator ──► n × (on_tick + Engine::update(step))
//                    │
//                    └─ remainder kept for the next frame, alpha = acc / step
//
// At most `max_frame_skip` ticks run per call. Anything beyond that is
// dropped so a long stall does not turn into a burst of catch-up ticks.
//
//=========================================================================

//=== External Dependencies ===============================================

use log::{debug, warn};

//=== Internal Dependencies ===============================================

use super::Engine;
use crate::core::config::EngineConfig;

//=== ArcadeEngine ========================================================

pub struct ArcadeEngine {
    engine: Engine,
    step: f64,
    accumulator: f64,
    max_frame_skip: u32,
}

impl ArcadeEngine {
    /// # Panics
    ///
    /// Panics if `step` is not positive or `max_frame_skip` is zero.
    pub fn new(engine: Engine, step: f64, max_frame_skip: u32) -> Self {
        assert!(step > 0.0, "Step must be positive, got {}", step);
        assert!(max_frame_skip > 0, "Max frame skip must be positive");
        Self {
            engine,
            step,
            accumulator: 0.0,
            max_frame_skip,
        }
    }

    /// Builds the engine and timing from a validated config.
    pub fn from_config(config: &EngineConfig) -> Self {
        Self::new(
            Engine::new(config),
            config.tick_duration(),
            config.max_frame_skip,
        )
    }

    //--- advance() --------------------------------------------------------
    //
    // Adds `elapsed` seconds and runs every whole step that fits. Each tick
    // calls `on_tick(engine, step)` and then `Engine::update(step)`.
    //
    // Nothing accumulates while the engine is not running, so resuming
    // does not replay the paused time.
    //
    pub fn advance<F>(&mut self, elapsed: f64, mut on_tick: F) -> usize
    where
        F: FnMut(&mut Engine, f64),
    {
        if !self.engine.is_running() {
            self.accumulator = 0.0;
            return 0;
        }

        if !elapsed.is_finite() {
            warn!(target: "engine", "ignoring non-finite frame time {}", elapsed);
            return 0;
        }
        self.accumulator += elapsed.max(0.0);

        let mut ticks = 0;
        while self.accumulator >= self.step && ticks < self.max_frame_skip {
            on_tick(&mut self.engine, self.step);
            self.engine.update(self.step);
            self.accumulator -= self.step;
            ticks += 1;

            if !self.engine.is_running() {
                self.accumulator = 0.0;
                break;
            }
        }

        if self.accumulator >= self.step {
            let dropped = (self.accumulator / self.step).floor();
            debug!(
                target: "engine",
                "frame skip limit reached, dropping {} ticks ({:.3}s)",
                dropped,
                dropped * self.step
            );
            self.accumulator -= dropped * self.step;
        }

        ticks as usize
    }

    /// Fraction of a step left in the accumulator, in `[0, 1)`.
    ///
    /// Renderers use it to interpolate between the last two ticks.
    pub fn alpha(&self) -> f64 {
        self.accumulator / self.step
    }

    pub fn reset_accumulator(&mut self) {
        self.accumulator = 0.0;
    }

    //--- Accessors --------------------------------------------------------

    pub fn engine(&self) -> &Engine {
        &self.engine
    }

    pub fn engine_mut(&mut self) -> &mut Engine {
        &mut self.engine
    }

    pub fn into_engine(self) -> Engine {
        self.engine
    }

    pub fn step(&self) -> f64 {
        self.step
    }

    pub fn accumulator(&self) -> f64 {
        self.accumulator
    }

    pub fn max_frame_skip(&self) -> u32 {
        self.max_frame_skip
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
