//! Single-threaded cooperative render/update loop.
//!
//! Each tick runs, strictly in order: read the tracked target from the
//! camera controls, re-target the stream window, advance renderer animation
//! state, present one frame. The tick function is plain and synchronous so a
//! test harness can drive it without a display; `run_frames` drives it from
//! a frame clock.

use std::time::{Duration, Instant};

use tracing::info;

use crate::player::CameraControls;
use crate::render::ChunkRenderer;
use crate::world::window::StreamWindow;

pub struct Game<R: ChunkRenderer, C: CameraControls> {
    window: StreamWindow,
    renderer: R,
    controls: C,
}

impl<R: ChunkRenderer, C: CameraControls> Game<R, C> {
    pub fn new(window: StreamWindow, renderer: R, controls: C) -> Self {
        Game {
            window,
            renderer,
            controls,
        }
    }

    /// Startup barrier: loads the full starting resident set before the loop
    /// begins, so the first presented frame already has its surrounding
    /// chunks registered. Does nothing if the window is already streaming.
    pub fn init(&mut self) {
        if self.window.center().is_some() {
            return;
        }
        let target = self.controls.target();
        self.window.init(target, &mut self.renderer);
    }

    /// One cooperative tick.
    pub fn tick(&mut self, dt: f32) {
        self.controls.update(dt);
        let target = self.controls.target();
        self.window.update_center(target, &mut self.renderer);
        self.renderer.advance(dt);
        self.renderer.present_frame();
    }

    /// Drives `tick` from a frame clock for a fixed number of frames. The
    /// loop itself has no terminal condition; the frame budget stands in for
    /// the hosting process tearing down the display surface.
    pub fn run_frames(&mut self, frame_rate: u32, frames: u64) {
        self.init();
        let mut clock = FrameClock::new(frame_rate);
        for _ in 0..frames {
            let dt = clock.tick();
            self.tick(dt);
        }
        info!(frames, "frame budget exhausted, leaving the loop");
    }

    /// Tears down the stream window, unloading every resident chunk.
    pub fn shutdown(&mut self) {
        self.window.close(&mut self.renderer);
    }

    pub fn window(&self) -> &StreamWindow {
        &self.window
    }

    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    pub fn controls(&self) -> &C {
        &self.controls
    }
}

/// Fixed-step frame clock: sleeps out the remainder of each frame and
/// reports the elapsed time, clamped so a stall never produces a huge step.
pub struct FrameClock {
    frame_duration: Duration,
    last: Instant,
}

impl FrameClock {
    pub fn new(frame_rate: u32) -> Self {
        FrameClock {
            frame_duration: Duration::from_secs(1) / frame_rate.max(1),
            last: Instant::now(),
        }
    }

    pub fn tick(&mut self) -> f32 {
        let elapsed = self.last.elapsed();
        if elapsed < self.frame_duration {
            std::thread::sleep(self.frame_duration - elapsed);
        }
        let now = Instant::now();
        let dt = (now - self.last).as_secs_f32().min(0.1);
        self.last = now;
        dt
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::chunk::{ChunkCoord, ChunkData};
    use crate::world::generator::{GenerationConfig, ShapeMode, TerrainGenerator};
    use crate::world::provider::ChunkProvider;
    use glam::Vec3;
    use rustc_hash::FxHashSet;
    use std::sync::Arc;

    #[derive(Clone, Copy, PartialEq, Eq, Debug)]
    enum Event {
        Register(ChunkCoord),
        Unregister(ChunkCoord),
        Frame,
    }

    #[derive(Default)]
    struct RecordingRenderer {
        events: Vec<Event>,
        registered: FxHashSet<ChunkCoord>,
    }

    impl ChunkRenderer for RecordingRenderer {
        fn register_chunk(&mut self, coord: ChunkCoord, _chunk: &ChunkData) {
            assert!(self.registered.insert(coord));
            self.events.push(Event::Register(coord));
        }

        fn unregister_chunk(&mut self, coord: ChunkCoord) {
            assert!(self.registered.remove(&coord));
            self.events.push(Event::Unregister(coord));
        }

        fn advance(&mut self, _dt: f32) {}

        fn present_frame(&mut self) {
            self.events.push(Event::Frame);
        }
    }

    struct ScriptedControls {
        path: Vec<Vec3>,
        cursor: usize,
    }

    impl ScriptedControls {
        fn new(path: Vec<Vec3>) -> Self {
            ScriptedControls { path, cursor: 0 }
        }
    }

    impl CameraControls for ScriptedControls {
        fn update(&mut self, _dt: f32) {
            if self.cursor + 1 < self.path.len() {
                self.cursor += 1;
            }
        }

        fn target(&self) -> Vec3 {
            self.path[self.cursor]
        }
    }

    fn test_game(path: Vec<Vec3>) -> Game<RecordingRenderer, ScriptedControls> {
        let config = Arc::new(GenerationConfig::new(5, ShapeMode::VonNeumann, 1));
        let provider = Arc::new(ChunkProvider::new(Arc::new(TerrainGenerator::new(&config))));
        let window = StreamWindow::new(provider, config);
        Game::new(window, RecordingRenderer::default(), ScriptedControls::new(path))
    }

    #[test]
    fn startup_barrier_loads_before_the_first_frame() {
        let mut game = test_game(vec![Vec3::new(0.5, 100.0, 0.5)]);
        game.init();

        let frames = game
            .renderer()
            .events
            .iter()
            .filter(|&&event| event == Event::Frame)
            .count();
        assert_eq!(frames, 0, "no frame may be presented before the initial load");
        assert_eq!(game.renderer().registered.len(), 9);

        game.tick(0.016);
        assert_eq!(game.renderer().events.last(), Some(&Event::Frame));
    }

    #[test]
    fn tick_streams_before_presenting() {
        // Second position is one chunk east of the first.
        let mut game = test_game(vec![Vec3::new(0.5, 100.0, 0.5), Vec3::new(16.5, 100.0, 0.5)]);
        game.init();
        let before = game.renderer().events.len();

        game.tick(0.016);

        let tick_events = &game.renderer().events[before..];
        assert_eq!(tick_events.last(), Some(&Event::Frame));
        let frame_at = tick_events.len() - 1;
        let registers = tick_events[..frame_at]
            .iter()
            .filter(|event| matches!(event, Event::Register(_)))
            .count();
        let unregisters = tick_events[..frame_at]
            .iter()
            .filter(|event| matches!(event, Event::Unregister(_)))
            .count();
        // One-chunk move at view distance 1: three columns in, three out,
        // all settled before the frame was presented.
        assert_eq!((registers, unregisters), (3, 3));
        assert_eq!(game.window().resident_count(), 9);
    }

    #[test]
    fn static_camera_ticks_only_present() {
        let mut game = test_game(vec![Vec3::new(0.5, 100.0, 0.5)]);
        game.init();
        let before = game.renderer().events.len();

        for _ in 0..3 {
            game.tick(0.016);
        }

        let tick_events = &game.renderer().events[before..];
        assert!(tick_events.iter().all(|&event| event == Event::Frame));
    }

    #[test]
    fn shutdown_unloads_everything() {
        let mut game = test_game(vec![Vec3::new(0.5, 100.0, 0.5)]);
        game.init();
        game.tick(0.016);
        game.shutdown();

        assert_eq!(game.window().resident_count(), 0);
        assert!(game.renderer().registered.is_empty());
    }

    #[test]
    fn frame_clock_clamps_large_steps() {
        let mut clock = FrameClock::new(1000);
        let dt = clock.tick();
        assert!(dt >= 0.0);
        assert!(dt <= 0.1);
    }
}
