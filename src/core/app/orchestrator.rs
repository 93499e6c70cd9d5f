//=========================================================================
// Orchestrator
//=========================================================================
//
// Runs the game on the logic (non-platform) thread.
//
// Each pass:
//   1. Collect platform events (bounded, non-blocking)
//   2. Apply them: lifecycle, surface, input
//   3. Advance the arcade engine by wall-clock time
//   4. Render a Frame and offer it to the platform
//   5. Sleep off what is left of the step
//
// Communication with the platform happens only through the two
// channels. Frames are offered with try_send: if the platform has not
// consumed the previous ones yet, the new frame is dropped.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::io;
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use crossbeam_channel::{Receiver, Sender, TrySendError};
use log::{debug, info, trace};

//=== Internal Dependencies ===============================================

use super::Game;
use crate::core::engine::ArcadeEngine;
use crate::core::platform_bridge::{
    DisplayList, EventCollector, Frame, PlatformEvent, TickControl,
};

//=== Orchestrator ========================================================

pub(crate) struct Orchestrator<G: Game> {
    arcade: ArcadeEngine,
    game: G,
    collector: EventCollector,
    frames: Sender<Frame>,
    step: Duration,
}

impl<G: Game> Orchestrator<G> {
    pub(crate) fn new(
        arcade: ArcadeEngine,
        game: G,
        events: Receiver<PlatformEvent>,
        frames: Sender<Frame>,
    ) -> Self {
        let step = Duration::from_secs_f64(arcade.step());
        Self {
            arcade,
            game,
            collector: EventCollector::new(events),
            frames,
            step,
        }
    }

    //--- spawn() ----------------------------------------------------------
    //
    // Moves the orchestrator onto a named logic thread. The thread hands
    // the game back when it ends.
    //
    pub(crate) fn spawn(self) -> io::Result<JoinHandle<G>> {
        thread::Builder::new()
            .name("bt-logic".into())
            .spawn(move || self.run())
    }

    pub(crate) fn run(mut self) -> G {
        self.start();

        let mut last = Instant::now();
        loop {
            let pass_start = Instant::now();

            //--- Step 1: Gather platform events ----------------------------
            let control = self.collector.collect_frame();

            //--- Step 2: Apply them -----------------------------------------
            for event in self.collector.take_events() {
                self.apply(event);
            }

            if control == TickControl::Exit {
                info!(target: "engine", "logic thread exiting");
                break;
            }

            //--- Step 3: Advance --------------------------------------------
            let now = Instant::now();
            let elapsed = now.duration_since(last).as_secs_f64();
            last = now;

            let game = &mut self.game;
            let ticks = self
                .arcade
                .advance(elapsed, |engine, dt| game.on_update(engine, dt));

            //--- Step 4: Render ---------------------------------------------
            if ticks > 0 && self.arcade.engine().surface().is_some() {
                self.render();
            }

            //--- Step 5: Pacing ---------------------------------------------
            let spent = pass_start.elapsed();
            if spent < self.step {
                thread::sleep(self.step - spent);
            }
        }

        self.shutdown();
        self.game
    }

    //--- Lifecycle --------------------------------------------------------

    fn start(&mut self) {
        let engine = self.arcade.engine_mut();
        if let Err(err) = engine.start() {
            debug!(target: "engine", "{}", err);
            return;
        }
        self.game.on_start(engine);
    }

    fn shutdown(&mut self) {
        let engine = self.arcade.engine_mut();
        if engine.state().is_final() {
            return;
        }

        self.game.on_stop(engine);
        if let Err(err) = engine.stop() {
            debug!(target: "engine", "{}", err);
        }
    }

    //--- apply() ----------------------------------------------------------
    //
    // Maps one platform event onto the engine and the game callbacks.
    //
    fn apply(&mut self, event: PlatformEvent) {
        let engine = self.arcade.engine_mut();
        let game = &mut self.game;

        match event {
            // Either signal reports a change once a surface exists.
            PlatformEvent::SurfaceCreated(size) | PlatformEvent::SurfaceChanged(size) => {
                let had_surface = engine.surface().is_some();
                engine.surface_ready(size);
                if had_surface {
                    game.on_surface_changed(engine, size);
                } else {
                    game.on_surface_ready(engine, size);
                }
            }

            PlatformEvent::SurfaceDestroyed => {
                if engine.surface().is_some() {
                    engine.surface_lost();
                    game.on_surface_lost(engine);
                }
            }

            PlatformEvent::Paused => match engine.pause() {
                Ok(()) => game.on_pause(engine),
                Err(err) => debug!(target: "engine", "{}", err),
            },

            PlatformEvent::Resumed => match engine.resume() {
                Ok(()) => game.on_resume(engine),
                Err(err) => debug!(target: "engine", "{}", err),
            },

            PlatformEvent::Input(batch) => {
                for input in batch {
                    game.on_input(engine, &input);
                    engine.world_mut().events_mut().publish(input);
                }
            }

            // Consumed by the collector.
            PlatformEvent::Closed => {}
        }
    }

    //--- render() ---------------------------------------------------------

    fn render(&self) {
        let engine = self.arcade.engine();

        let mut list = DisplayList::new();
        engine.draw(&mut list);
        self.game.on_draw(engine, &mut list);
        let frame = list.into_frame(engine.frame());

        match self.frames.try_send(frame) {
            Ok(()) => {}
            Err(TrySendError::Full(frame)) => {
                trace!(target: "engine", "platform behind, dropped frame {}", frame.number);
            }
            // The platform is gone; the collector reports it next pass.
            Err(TrySendError::Disconnected(_)) => {}
        }
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::app::GraphicsListener;
    use crate::core::config::EngineConfig;
    use crate::core::engine::{Engine, EngineState, SurfaceChanged, SurfaceReady};
    use crate::core::math::{Color4f, Rect};
    use crate::core::platform_bridge::{
        InputEvent, KeyCode, Modifiers, Renderer, RenderCommand, SurfaceSize,
    };
    use crossbeam_channel::{bounded, unbounded};

    #[derive(Default)]
    struct Recorder {
        calls: Vec<String>,
        updates: usize,
    }

    impl GraphicsListener for Recorder {
        fn on_surface_ready(&mut self, _engine: &mut Engine, size: SurfaceSize) {
            self.calls.push(format!("ready {}x{}", size.width, size.height));
        }

        fn on_surface_changed(&mut self, _engine: &mut Engine, size: SurfaceSize) {
            self.calls.push(format!("changed {}x{}", size.width, size.height));
        }

        fn on_surface_lost(&mut self, _engine: &mut Engine) {
            self.calls.push("lost".into());
        }
    }

    impl Game for Recorder {
        fn on_start(&mut self, _engine: &mut Engine) {
            self.calls.push("start".into());
        }

        fn on_update(&mut self, _engine: &mut Engine, _dt: f64) {
            self.updates += 1;
        }

        fn on_draw(&self, _engine: &Engine, renderer: &mut dyn Renderer) {
            renderer.fill_rect(Rect::new(0.0, 0.0, 2.0, 2.0), Color4f::GREEN);
        }

        fn on_input(&mut self, _engine: &mut Engine, event: &InputEvent) {
            self.calls.push(format!("input {:?}", event.key()));
        }

        fn on_pause(&mut self, _engine: &mut Engine) {
            self.calls.push("pause".into());
        }

        fn on_resume(&mut self, _engine: &mut Engine) {
            self.calls.push("resume".into());
        }

        fn on_stop(&mut self, _engine: &mut Engine) {
            self.calls.push("stop".into());
        }
    }

    fn orchestrator(
        events: Receiver<PlatformEvent>,
        frames: Sender<Frame>,
    ) -> Orchestrator<Recorder> {
        let config = EngineConfig {
            tps: 100,
            ..EngineConfig::default()
        };
        Orchestrator::new(
            ArcadeEngine::from_config(&config),
            Recorder::default(),
            events,
            frames,
        )
    }

    #[test]
    fn maps_platform_events_to_callbacks() {
        let (_event_tx, event_rx) = unbounded();
        let (frame_tx, _frame_rx) = unbounded();
        let mut orchestrator = orchestrator(event_rx, frame_tx);
        orchestrator.start();

        for event in [
            PlatformEvent::SurfaceChanged(SurfaceSize::new(10, 10)),
            PlatformEvent::SurfaceChanged(SurfaceSize::new(20, 10)),
            PlatformEvent::Input(vec![InputEvent::KeyDown {
                key: KeyCode::Space,
                modifiers: Modifiers::NONE,
            }]),
            PlatformEvent::Resumed,
            PlatformEvent::Paused,
            PlatformEvent::Paused,
            PlatformEvent::Resumed,
            PlatformEvent::SurfaceDestroyed,
            PlatformEvent::SurfaceDestroyed,
        ] {
            orchestrator.apply(event);
        }
        orchestrator.shutdown();
        orchestrator.shutdown();

        assert_eq!(
            orchestrator.game.calls,
            vec![
                "start",
                "ready 10x10",
                "changed 20x10",
                "input Some(Space)",
                "pause",
                "resume",
                "lost",
                "stop",
            ]
        );
        assert_eq!(orchestrator.arcade.engine().state(), EngineState::Stopped);
    }

    #[test]
    fn input_is_published_to_the_world() {
        let (_event_tx, event_rx) = unbounded();
        let (frame_tx, _frame_rx) = unbounded();
        let mut orchestrator = orchestrator(event_rx, frame_tx);
        orchestrator.start();

        let input = InputEvent::PointerMoved {
            pointer: crate::core::platform_bridge::PointerId::Touch(3),
            x: 4.0,
            y: 5.0,
        };
        orchestrator.apply(PlatformEvent::SurfaceCreated(SurfaceSize::new(8, 8)));
        orchestrator.apply(PlatformEvent::Input(vec![input]));
        orchestrator.arcade.engine_mut().update(0.01);

        let events = orchestrator.arcade.engine().world().events();
        assert_eq!(events.read::<InputEvent>(), &[input]);
        assert_eq!(events.read::<SurfaceReady>().len(), 1);
    }

    #[test]
    fn repeated_surface_creation_reports_a_change() {
        let (_event_tx, event_rx) = unbounded();
        let (frame_tx, _frame_rx) = unbounded();
        let mut orchestrator = orchestrator(event_rx, frame_tx);
        orchestrator.start();

        orchestrator.apply(PlatformEvent::SurfaceCreated(SurfaceSize::new(8, 8)));
        orchestrator.apply(PlatformEvent::SurfaceCreated(SurfaceSize::new(16, 8)));
        orchestrator.arcade.engine_mut().update(0.01);

        assert_eq!(
            orchestrator.game.calls,
            vec!["start", "ready 8x8", "changed 16x8"]
        );
        let events = orchestrator.arcade.engine().world().events();
        assert_eq!(events.read::<SurfaceReady>().len(), 1);
        assert_eq!(events.read::<SurfaceChanged>().len(), 1);
    }

    #[test]
    fn render_drops_frames_when_platform_is_behind() {
        let (_event_tx, event_rx) = unbounded();
        let (frame_tx, frame_rx) = bounded(1);
        let mut orchestrator = orchestrator(event_rx, frame_tx);
        orchestrator.start();
        orchestrator.arcade.engine_mut().update(0.01);

        orchestrator.render();
        orchestrator.render();

        let frame = frame_rx.try_recv().unwrap();
        assert!(frame_rx.try_recv().is_err());
        assert_eq!(frame.number, 1);
        assert_eq!(frame.clear_color(), Some(Color4f::BLACK));
        assert!(matches!(
            frame.commands.last(),
            Some(RenderCommand::FillRect { color, .. }) if *color == Color4f::GREEN
        ));
    }

    #[test]
    fn run_exits_on_closed_and_returns_game() {
        let (event_tx, event_rx) = unbounded();
        let (frame_tx, _frame_rx) = unbounded();

        event_tx.send(PlatformEvent::SurfaceCreated(SurfaceSize::new(4, 4))).unwrap();
        event_tx.send(PlatformEvent::Closed).unwrap();

        let game = orchestrator(event_rx, frame_tx).run();
        assert_eq!(game.calls, vec!["start", "ready 4x4", "stop"]);
    }

    #[test]
    fn run_exits_when_platform_hangs_up() {
        let (event_tx, event_rx) = unbounded();
        let (frame_tx, _frame_rx) = unbounded();
        drop(event_tx);

        let handle = orchestrator(event_rx, frame_tx).spawn().unwrap();
        let game = handle.join().unwrap();
        assert_eq!(game.calls, vec!["start", "stop"]);
    }
}
