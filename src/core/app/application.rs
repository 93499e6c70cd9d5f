//=========================================================================
// Application
//=========================================================================
//
// Entry point tying a Game, the engine and a platform together.
//
// Architecture:
// ```text
//     ApplicationBuilder ──build(game)──> Application ──run()──> [Runtime]
//         │                                   │
//         ├─ with_config()                    ├─ spawns logic thread
//         ├─ with_tps()                       ├─ runs platform (blocks)
//         ├─ with_channel_capacity()          └─ joins, returns the game
//         └─ with_native_bridge()
// ```
//
//=========================================================================

//=== External Dependencies ===============================================

use std::path::Path;
use std::sync::Arc;

use crossbeam_channel::{bounded, Receiver, Sender};
use log::{error, info, warn};
use thiserror::Error;

//=== Internal Dependencies ===============================================

use super::orchestrator::Orchestrator;
use super::Game;
use crate::core::config::{ConfigError, EngineConfig};
use crate::core::engine::{ArcadeEngine, Engine};
use crate::core::platform_bridge::{
    logger, ConsoleLogger, Frame, NativeBridge, PlatformAdapter, PlatformError, PlatformEvent,
};
use crate::platform::DesktopPlatform;

//=== AppError ============================================================

#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Platform(#[from] PlatformError),

    #[error("failed to spawn logic thread: {0}")]
    Spawn(#[source] std::io::Error),

    #[error("logic thread panicked")]
    LogicThreadPanicked,
}

//=== ApplicationBuilder ==================================================

/// Builder for configuring and constructing an [`Application`].
///
/// # Default Values
///
/// See [`EngineConfig::default`]: 60 TPS, a 128 event channel, at most
/// five catch-up ticks per frame.
///
/// # Examples
///
/// ```no_run
/// use bt_engine::prelude::*;
///
/// struct Pong;
/// impl GraphicsListener for Pong {}
/// impl Game for Pong {}
///
/// ApplicationBuilder::new()
///     .with_tps(120)
///     .with_channel_capacity(256)
///     .build(Pong)
///     .run()
///     .expect("pong crashed");
/// ```
pub struct ApplicationBuilder {
    config: EngineConfig,
    native: Option<Arc<dyn NativeBridge>>,
    console_logging: bool,
}

impl ApplicationBuilder {
    pub fn new() -> Self {
        Self {
            config: EngineConfig::default(),
            native: None,
            console_logging: false,
        }
    }

    /// Replaces the whole configuration.
    pub fn with_config(mut self, config: EngineConfig) -> Self {
        self.config = config;
        self
    }

    /// Loads the configuration from a RON file.
    pub fn with_config_file(self, path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        Ok(self.with_config(EngineConfig::load(path)?))
    }

    /// Sets the fixed logic rate.
    ///
    /// # Panics
    ///
    /// Panics if `tps == 0`.
    pub fn with_tps(mut self, tps: u32) -> Self {
        assert!(tps > 0, "TPS must be positive, got {}", tps);
        self.config.tps = tps;
        self
    }

    /// Sets the channel capacity for platform → logic communication.
    ///
    /// # Panics
    ///
    /// Panics if `capacity == 0`.
    pub fn with_channel_capacity(mut self, capacity: usize) -> Self {
        assert!(capacity > 0, "Channel capacity must be positive");
        self.config.channel_capacity = capacity;
        self
    }

    pub fn with_native_bridge(mut self, native: Arc<dyn NativeBridge>) -> Self {
        self.native = Some(native);
        self
    }

    /// Installs a [`ConsoleLogger`] at the configured log level on run.
    pub fn with_console_logging(mut self) -> Self {
        self.console_logging = true;
        self
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn build<G: Game>(self, game: G) -> Application<G> {
        info!(
            target: "engine",
            "building application (TPS: {}, channel: {})",
            self.config.tps,
            self.config.channel_capacity
        );

        Application {
            config: self.config,
            native: self.native,
            console_logging: self.console_logging,
            game,
        }
    }
}

impl Default for ApplicationBuilder {
    fn default() -> Self {
        Self::new()
    }
}

//=== Application =========================================================

pub struct Application<G: Game> {
    config: EngineConfig,
    native: Option<Arc<dyn NativeBridge>>,
    console_logging: bool,
    game: G,
}

impl<G: Game> Application<G> {
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Runs the desktop (winit) platform on the calling thread.
    ///
    /// Blocks until the window closes. Must be called from the main
    /// thread on platforms where winit requires it.
    pub fn run(self) -> Result<G, AppError> {
        let platform = DesktopPlatform::new(self.config.window.clone());
        self.run_with(platform)
    }

    //--- run_with() -------------------------------------------------------
    //
    // 1. Validates config, creates the event and frame channels
    // 2. Spawns the logic thread
    // 3. Runs the platform (blocks here)
    // 4. Platform returns → channel disconnects → logic thread ends
    // 5. Joins the logic thread and hands the game back
    //
    pub fn run_with<P: PlatformAdapter>(self, platform: P) -> Result<G, AppError> {
        self.config.validate()?;

        if self.console_logging {
            if let Err(err) = logger::init(ConsoleLogger, self.config.log_level.into()) {
                warn!(target: "engine", "console logging not installed: {}", err);
            }
        }

        info!(target: "engine", "starting application (TPS: {})", self.config.tps);

        //--- 1. Create communication channels ------------------------------
        let (event_tx, event_rx): (Sender<PlatformEvent>, Receiver<PlatformEvent>) =
            bounded(self.config.channel_capacity);
        let (frame_tx, frame_rx): (Sender<Frame>, Receiver<Frame>) = bounded(2);

        //--- 2. Spawn the logic thread -------------------------------------
        let mut engine = Engine::new(&self.config);
        if let Some(native) = self.native {
            engine = engine.with_native_bridge(native);
        }
        let arcade = ArcadeEngine::new(
            engine,
            self.config.tick_duration(),
            self.config.max_frame_skip,
        );

        let logic = Orchestrator::new(arcade, self.game, event_rx, frame_tx)
            .spawn()
            .map_err(AppError::Spawn)?;
        info!(target: "engine", "logic thread spawned");

        //--- 3. Run the platform -------------------------------------------
        let platform_result = platform.run(event_tx, frame_rx);
        if let Err(err) = &platform_result {
            error!(target: "platform", "platform error: {}", err);
        }
        info!(target: "platform", "platform event loop exited");

        //--- 4. Wait for the logic thread ----------------------------------
        let game = match logic.join() {
            Ok(game) => game,
            Err(_) => {
                error!(target: "engine", "logic thread panicked");
                return Err(AppError::LogicThreadPanicked);
            }
        };

        platform_result?;
        info!(target: "engine", "application shutdown complete");
        Ok(game)
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::app::GraphicsListener;
    use crate::core::platform_bridge::{
        InputEvent, KeyCode, LocalNativeBridge, Modifiers, NativeValue, SurfaceSize,
    };
    use std::time::Duration;

    #[derive(Default)]
    struct Probe {
        started: bool,
        stopped: bool,
        surface: Option<SurfaceSize>,
        keys: Vec<KeyCode>,
        updates: usize,
        device: Option<NativeValue>,
    }

    impl GraphicsListener for Probe {
        fn on_surface_ready(&mut self, _engine: &mut Engine, size: SurfaceSize) {
            self.surface = Some(size);
        }
    }

    impl Game for Probe {
        fn on_start(&mut self, engine: &mut Engine) {
            self.started = true;
            self.device = engine.native().call("device.name", &[]).ok();
        }

        fn on_update(&mut self, _engine: &mut Engine, _dt: f64) {
            self.updates += 1;
        }

        fn on_input(&mut self, _engine: &mut Engine, event: &InputEvent) {
            self.keys.extend(event.key());
        }

        fn on_stop(&mut self, _engine: &mut Engine) {
            self.stopped = true;
        }
    }

    /// Plays a fixed script and waits for one rendered frame.
    struct ScriptedPlatform {
        frame_timeout: Duration,
    }

    impl PlatformAdapter for ScriptedPlatform {
        fn run(
            self,
            events: Sender<PlatformEvent>,
            frames: Receiver<Frame>,
        ) -> Result<(), PlatformError> {
            let send = |event| {
                events
                    .send(event)
                    .map_err(|err| PlatformError::EventLoopExecution(err.to_string()))
            };

            send(PlatformEvent::SurfaceCreated(SurfaceSize::new(320, 200)))?;
            send(PlatformEvent::Input(vec![InputEvent::KeyDown {
                key: KeyCode::Enter,
                modifiers: Modifiers::NONE,
            }]))?;

            frames
                .recv_timeout(self.frame_timeout)
                .map_err(|err| PlatformError::EventLoopExecution(err.to_string()))?;

            send(PlatformEvent::Closed)
        }
    }

    struct FailingPlatform;

    impl PlatformAdapter for FailingPlatform {
        fn run(self, _: Sender<PlatformEvent>, _: Receiver<Frame>) -> Result<(), PlatformError> {
            Err(PlatformError::WindowCreation("no display".into()))
        }
    }

    struct Panicking;
    impl GraphicsListener for Panicking {}
    impl Game for Panicking {
        fn on_start(&mut self, _engine: &mut Engine) {
            panic!("boom");
        }
    }

    fn scripted() -> ScriptedPlatform {
        ScriptedPlatform {
            frame_timeout: Duration::from_secs(5),
        }
    }

    #[test]
    fn builder_defaults() {
        let builder = ApplicationBuilder::new();
        assert_eq!(builder.config(), &EngineConfig::default());
    }

    #[test]
    fn builder_fluent_api_chaining() {
        let app = ApplicationBuilder::new()
            .with_tps(120)
            .with_channel_capacity(256)
            .build(Probe::default());

        assert_eq!(app.config().tps, 120);
        assert_eq!(app.config().channel_capacity, 256);
    }

    #[test]
    #[should_panic(expected = "TPS must be positive")]
    fn builder_with_tps_panics_on_zero() {
        ApplicationBuilder::new().with_tps(0);
    }

    #[test]
    #[should_panic(expected = "Channel capacity must be positive")]
    fn builder_with_channel_capacity_panics_on_zero() {
        ApplicationBuilder::new().with_channel_capacity(0);
    }

    #[test]
    fn builder_reads_config_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("game.ron");
        std::fs::write(&path, "(tps: 30, window: (title: \"pong\"))").unwrap();

        let builder = ApplicationBuilder::new().with_config_file(&path).unwrap();
        assert_eq!(builder.config().tps, 30);
        assert_eq!(builder.config().window.title, "pong");
    }

    #[test]
    fn run_with_drives_the_game_until_closed() {
        let native = LocalNativeBridge::new();
        native.register("device.name", |_| Ok("scripted".into()));

        let game = ApplicationBuilder::new()
            .with_tps(200)
            .with_native_bridge(Arc::new(native))
            .build(Probe::default())
            .run_with(scripted())
            .unwrap();

        assert!(game.started);
        assert!(game.stopped);
        assert!(game.updates > 0);
        assert_eq!(game.surface, Some(SurfaceSize::new(320, 200)));
        assert_eq!(game.keys, vec![KeyCode::Enter]);
        assert_eq!(game.device, Some(NativeValue::from("scripted")));
    }

    #[test]
    fn platform_failure_is_reported() {
        let result = ApplicationBuilder::new()
            .build(Probe::default())
            .run_with(FailingPlatform);
        assert!(matches!(
            result,
            Err(AppError::Platform(PlatformError::WindowCreation(_)))
        ));
    }

    #[test]
    fn invalid_config_is_rejected_before_running() {
        let config = EngineConfig {
            max_frame_skip: 0,
            ..EngineConfig::default()
        };
        let result = ApplicationBuilder::new()
            .with_config(config)
            .build(Probe::default())
            .run_with(FailingPlatform);
        assert!(matches!(result, Err(AppError::Config(ConfigError::Invalid(_)))));
    }

    #[test]
    fn logic_thread_panic_is_reported() {
        let result = ApplicationBuilder::new()
            .build(Panicking)
            .run_with(ScriptedPlatform {
                frame_timeout: Duration::from_millis(50),
            });
        assert!(matches!(result, Err(AppError::LogicThreadPanicked)));
    }
}
