use std::time::{Duration, Instant};

use anyhow::Result;
use winit::{
    dpi::LogicalSize,
    event::{ElementState, Event, KeyEvent, WindowEvent},
    event_loop::{ActiveEventLoop, ControlFlow, EventLoop},
    keyboard::{KeyCode, PhysicalKey},
    window::Window,
};

use crate::{input::InputState, render::Renderer, render::Surface};

/// Upper bound on catch-up ticks run in one frame after a stall.
pub const MAX_TICKS_PER_FRAME: u32 = 5;

/// Configuration values for the engine window and runtime behavior.
#[derive(Debug, Clone, PartialEq)]
pub struct EngineConfig {
    pub title: String,
    pub width: u32,
    pub height: u32,
    pub vsync: bool,
    /// Game updates per second.
    pub tick_rate: u32,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            title: "Arcade2D Game".into(),
            width: 640,
            height: 480,
            vsync: true,
            tick_rate: 60,
        }
    }
}

/// Main entrypoint for running an Arcade2D game.
#[derive(Debug, Default)]
pub struct Engine {
    config: EngineConfig,
}

impl Engine {
    /// Create a new engine instance with default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Override the window title.
    #[must_use]
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.config.title = title.into();
        self
    }

    /// Override the initial window size in logical pixels.
    #[must_use]
    pub fn with_size(mut self, width: u32, height: u32) -> Self {
        self.config.width = width;
        self.config.height = height;
        self
    }

    /// Enable or disable vertical sync.
    #[must_use]
    pub fn with_vsync(mut self, vsync: bool) -> Self {
        self.config.vsync = vsync;
        self
    }

    /// Override how many times per second `Game::update` runs.
    #[must_use]
    pub fn with_tick_rate(mut self, ticks_per_second: u32) -> Self {
        self.config.tick_rate = ticks_per_second.max(1);
        self
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Run the provided game until the window is closed or a fatal error occurs.
    ///
    /// An error from the game or the renderer stops the loop and is returned.
    pub fn run<G: Game + 'static>(self, mut game: G) -> Result<()> {
        let config = self.config;

        let event_loop = EventLoop::new()?;
        event_loop.set_control_flow(ControlFlow::Poll);

        let mut window_attributes = Window::default_attributes();
        window_attributes.title = config.title.clone();
        window_attributes.inner_size = Some(LogicalSize::new(config.width, config.height).into());
        #[allow(deprecated)]
        let window = event_loop.create_window(window_attributes)?;

        // The window lives for the entire program, so a 'static borrow is fine.
        let window: &'static Window = Box::leak(Box::new(window));

        log::info!(
            "starting '{}' at {}x{}, {} ticks/s, vsync {}",
            config.title,
            config.width,
            config.height,
            config.tick_rate,
            config.vsync
        );

        let mut renderer = Renderer::new(window, config.vsync)?;
        let mut clock = FixedStep::from_rate(config.tick_rate);
        let mut ctx = EngineContext::new();
        game.init(&mut ctx)?;

        let mut fatal: Option<anyhow::Error> = None;
        let mut last_frame = Instant::now();

        #[allow(deprecated)]
        event_loop.run(|event, elwt| {
            let outcome = match event {
                Event::WindowEvent { event, .. } => {
                    ctx.handle_window_event(&event);

                    match event {
                        WindowEvent::CloseRequested => {
                            elwt.exit();
                            Ok(())
                        }
                        WindowEvent::KeyboardInput { event, .. } if is_escape_pressed(&event) => {
                            elwt.exit();
                            Ok(())
                        }
                        WindowEvent::Resized(new_size) => {
                            renderer.resize(new_size);
                            Ok(())
                        }
                        WindowEvent::RedrawRequested => render_frame(&mut renderer, &mut game),
                        _ => Ok(()),
                    }
                }
                Event::AboutToWait => {
                    let now = Instant::now();
                    clock.push(now - last_frame);
                    last_frame = now;

                    let result = run_ticks(&mut clock, &mut ctx, |ctx| game.update(ctx));
                    window.request_redraw();
                    result.map(|_| ())
                }
                _ => Ok(()),
            };

            if let Err(err) = outcome {
                abort(elwt, &mut fatal, err);
            }
        })?;

        match fatal {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}

/// Stop the loop and keep the first error for `run` to return.
fn abort(elwt: &ActiveEventLoop, fatal: &mut Option<anyhow::Error>, err: anyhow::Error) {
    if fatal.is_none() {
        *fatal = Some(err);
    }
    elwt.exit();
}

fn is_escape_pressed(event: &KeyEvent) -> bool {
    event.state == ElementState::Pressed
        && matches!(event.physical_key, PhysicalKey::Code(KeyCode::Escape))
}

/// Fixed-rate clock turning variable frame times into whole simulation ticks.
#[derive(Debug, Clone, PartialEq)]
pub struct FixedStep {
    delta: Duration,
    accumulator: Duration,
}

impl FixedStep {
    pub fn from_rate(ticks_per_second: u32) -> Self {
        Self {
            delta: Duration::from_secs_f64(1.0 / f64::from(ticks_per_second.max(1))),
            accumulator: Duration::ZERO,
        }
    }

    /// Length of one tick.
    pub fn delta(&self) -> Duration {
        self.delta
    }

    /// Add elapsed wall time.
    pub fn push(&mut self, elapsed: Duration) {
        self.accumulator += elapsed;
    }

    /// Consume one tick's worth of accumulated time, if available.
    pub fn next_tick(&mut self) -> bool {
        if self.accumulator >= self.delta {
            self.accumulator -= self.delta;
            true
        } else {
            false
        }
    }

    /// Drop whole ticks that could not be run, keeping the partial remainder.
    pub fn discard_backlog(&mut self) {
        while self.accumulator >= self.delta {
            self.accumulator -= self.delta;
        }
    }

    /// How far into the next tick we are, in `0.0..=1.0`.
    pub fn alpha(&self) -> f32 {
        (self.accumulator.as_secs_f32() / self.delta.as_secs_f32()).min(1.0)
    }
}

/// Run every whole tick the clock has accumulated, at most [`MAX_TICKS_PER_FRAME`].
///
/// After a stall the remaining backlog is dropped. Key edges are cleared only
/// when at least one tick ran, so a press is never lost between ticks.
/// Returns the number of ticks run.
fn run_ticks<F>(clock: &mut FixedStep, ctx: &mut EngineContext, mut update: F) -> Result<u32>
where
    F: FnMut(&mut EngineContext) -> Result<()>,
{
    let mut ticks = 0;
    while ticks < MAX_TICKS_PER_FRAME && clock.next_tick() {
        update(ctx)?;
        ticks += 1;
    }

    if ticks == MAX_TICKS_PER_FRAME {
        clock.discard_backlog();
    }
    if ticks > 0 {
        ctx.input.begin_frame();
    }
    Ok(ticks)
}

fn render_frame<G: Game>(renderer: &mut Renderer<'_>, game: &mut G) -> Result<()> {
    let Some(mut frame) = renderer.begin_frame()? else {
        return Ok(());
    };

    game.draw(&mut frame);

    let (width, height) = renderer.surface_size();
    let logical_size = game.layout(width, height);
    renderer.end_frame(frame, logical_size)
}

/// Shared context provided to game code each tick.
#[derive(Debug, Default)]
pub struct EngineContext {
    input: InputState,
}

impl EngineContext {
    fn new() -> Self {
        Self::default()
    }

    fn handle_window_event(&mut self, event: &WindowEvent) {
        if let WindowEvent::KeyboardInput { event, .. } = event {
            self.input.handle_key(event);
        }
    }

    /// Access the current input state.
    pub fn input(&self) -> &InputState {
        &self.input
    }
}

/// Trait implemented by user code to hook into the engine lifecycle.
pub trait Game {
    /// Called once after the window is created but before the first tick.
    fn init(&mut self, _ctx: &mut EngineContext) -> Result<()> {
        Ok(())
    }

    /// Advance game state by one tick.
    fn update(&mut self, ctx: &mut EngineContext) -> Result<()>;

    /// Draw the current state. Called once per presented frame.
    fn draw(&mut self, surface: &mut dyn Surface);

    /// Logical canvas size for a window of the given size.
    ///
    /// The renderer scales the canvas to fit the window, keeping its aspect ratio.
    fn layout(&self, outside_width: u32, outside_height: u32) -> (u32, u32) {
        (outside_width, outside_height)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_overrides_defaults() {
        let engine = Engine::new()
            .with_title("Test")
            .with_size(320, 200)
            .with_vsync(false)
            .with_tick_rate(30);

        assert_eq!(
            engine.config(),
            &EngineConfig {
                title: "Test".into(),
                width: 320,
                height: 200,
                vsync: false,
                tick_rate: 30,
            }
        );
    }

    #[test]
    fn zero_tick_rate_is_clamped() {
        let engine = Engine::new().with_tick_rate(0);
        assert_eq!(engine.config().tick_rate, 1);
    }

    #[test]
    fn fixed_step_counts_whole_ticks() {
        let mut clock = FixedStep::from_rate(60);
        clock.push(Duration::from_millis(51));

        let mut ticks = 0;
        while clock.next_tick() {
            ticks += 1;
        }
        assert_eq!(ticks, 3);
    }

    #[test]
    fn fixed_step_carries_remainder() {
        let mut clock = FixedStep::from_rate(60);
        clock.push(Duration::from_millis(10));
        assert!(!clock.next_tick());
        assert!(clock.alpha() > 0.5 && clock.alpha() < 0.7);

        clock.push(Duration::from_millis(10));
        assert!(clock.next_tick());
        assert!(!clock.next_tick());
    }

    #[test]
    fn stall_runs_capped_ticks_and_drops_backlog() {
        let mut clock = FixedStep::from_rate(60);
        let mut ctx = EngineContext::new();
        clock.push(Duration::from_secs(1));

        let mut updates = 0;
        let ran = run_ticks(&mut clock, &mut ctx, |_| {
            updates += 1;
            Ok(())
        })
        .unwrap();

        assert_eq!(ran, MAX_TICKS_PER_FRAME);
        assert_eq!(updates, MAX_TICKS_PER_FRAME);
        assert!(!clock.next_tick());
        assert!(clock.alpha() < 1.0);
    }

    #[test]
    fn key_edges_survive_frames_without_ticks() {
        let mut clock = FixedStep::from_rate(60);
        let mut ctx = EngineContext::new();
        ctx.input.set_key(KeyCode::Space, ElementState::Pressed);

        clock.push(Duration::from_millis(5));
        let ran = run_ticks(&mut clock, &mut ctx, |_| Ok(())).unwrap();
        assert_eq!(ran, 0);
        assert!(ctx.input().is_key_pressed(KeyCode::Space));

        clock.push(Duration::from_millis(15));
        let mut seen = false;
        let ran = run_ticks(&mut clock, &mut ctx, |ctx| {
            seen = ctx.input().is_key_pressed(KeyCode::Space);
            Ok(())
        })
        .unwrap();
        assert_eq!(ran, 1);
        assert!(seen);
        assert!(!ctx.input().is_key_pressed(KeyCode::Space));
        assert!(ctx.input().is_key_down(KeyCode::Space));
    }

    #[test]
    fn update_error_stops_ticking() {
        let mut clock = FixedStep::from_rate(60);
        let mut ctx = EngineContext::new();
        clock.push(Duration::from_millis(51));

        let mut updates = 0;
        let result = run_ticks(&mut clock, &mut ctx, |_| {
            updates += 1;
            anyhow::bail!("boom")
        });

        assert!(result.is_err());
        assert_eq!(updates, 1);
    }

    #[test]
    fn discard_backlog_keeps_partial_tick() {
        let mut clock = FixedStep::from_rate(10);
        clock.push(Duration::from_millis(1_050));
        clock.discard_backlog();

        assert!(!clock.next_tick());
        assert!((clock.alpha() - 0.5).abs() < 1e-3);
    }
}
