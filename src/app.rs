//! Window, event loop and tick scheduling
//!
//! One thread, three kinds of callbacks: the tick timer (via
//! `ControlFlow::WaitUntil`), redraw requests and keyboard events. Each tick
//! is followed by a redraw request, so frames follow the tick cadence.

use std::sync::Arc;
use std::time::{Duration, Instant};

use winit::{
    application::ApplicationHandler,
    dpi::LogicalSize,
    event::WindowEvent,
    event_loop::{ActiveEventLoop, ControlFlow, EventLoop},
    window::{Window, WindowId},
};

use crate::consts::{FIELD_HEIGHT, FIELD_WIDTH, MAX_CATCHUP_TICKS};
use crate::error::{SetupError, SetupResult};
use crate::input::InputCollector;
use crate::renderer::{DrawCommand, GpuRenderer, render};
use crate::settings::Settings;
use crate::sim::{GameState, tick};

/// Fixed-interval tick schedule
#[derive(Debug, Clone)]
pub struct TickClock {
    interval: Duration,
    next: Instant,
}

impl TickClock {
    pub fn new(interval: Duration, now: Instant) -> Self {
        Self {
            interval,
            next: now + interval,
        }
    }

    /// When the next tick is due
    pub fn next_deadline(&self) -> Instant {
        self.next
    }

    /// Number of ticks due at `now`, advancing the schedule past them.
    /// At most `MAX_CATCHUP_TICKS` run; beyond that the schedule restarts
    /// from `now` instead of replaying the backlog.
    pub fn due(&mut self, now: Instant) -> u32 {
        let mut count = 0;
        while now >= self.next && count < MAX_CATCHUP_TICKS {
            self.next += self.interval;
            count += 1;
        }
        if now >= self.next {
            log::warn!("Tick schedule fell behind, skipping backlog");
            self.next = now + self.interval;
        }
        count
    }
}

/// The running game: scene, input and (once the window exists) the renderer
pub struct App {
    settings: Settings,
    state: GameState,
    input: InputCollector,
    window: Option<Arc<Window>>,
    renderer: Option<GpuRenderer>,
    clock: TickClock,
    commands: Vec<DrawCommand>,
    error: Option<SetupError>,
}

impl App {
    pub fn new(settings: Settings) -> Self {
        let clock = TickClock::new(settings.tick_interval(), Instant::now());
        Self {
            settings,
            state: GameState::new(),
            input: InputCollector::new(),
            window: None,
            renderer: None,
            clock,
            commands: Vec::new(),
            error: None,
        }
    }

    /// Open the window and run until it is closed
    pub fn run(settings: Settings) -> SetupResult<()> {
        let event_loop = EventLoop::new()?;
        let mut app = App::new(settings);
        event_loop.run_app(&mut app)?;
        match app.error.take() {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }

    fn init(&mut self, event_loop: &ActiveEventLoop) -> SetupResult<()> {
        log::info!("Initializing window and renderer");

        let attrs = Window::default_attributes()
            .with_title(self.settings.title.clone())
            .with_inner_size(LogicalSize::new(FIELD_WIDTH as f64, FIELD_HEIGHT as f64));
        let window = Arc::new(event_loop.create_window(attrs)?);

        let renderer = pollster::block_on(GpuRenderer::new(
            Arc::clone(&window),
            &self.settings,
            &self.state,
        ))?;

        self.clock = TickClock::new(self.settings.tick_interval(), Instant::now());
        window.request_redraw();
        self.window = Some(window);
        self.renderer = Some(renderer);
        Ok(())
    }

    /// Stop the loop; `run` hands the error back to `main`
    fn fail(&mut self, event_loop: &ActiveEventLoop, error: SetupError) {
        self.error = Some(error);
        event_loop.exit();
    }

    /// Run every tick that is due. Returns how many ran.
    fn run_due_ticks(&mut self, now: Instant) -> u32 {
        let due = self.clock.due(now);
        let dt = self.settings.sim_dt();
        let intents = self.input.intents();
        for _ in 0..due {
            tick(&mut self.state, &intents, dt);
        }
        due
    }

    fn redraw(&mut self, event_loop: &ActiveEventLoop) {
        let Some(renderer) = self.renderer.as_mut() else {
            return;
        };

        self.commands.clear();
        render(&self.state, &mut self.commands);

        match renderer.render(&self.commands) {
            Ok(()) => {}
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => renderer.reconfigure(),
            Err(wgpu::SurfaceError::OutOfMemory) => {
                log::error!("Out of memory!");
                event_loop.exit();
            }
            Err(e) => log::warn!("Render error: {:?}", e),
        }
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.renderer.is_some() || self.error.is_some() {
            return;
        }
        if let Err(e) = self.init(event_loop) {
            self.fail(event_loop, e);
        }
    }

    fn about_to_wait(&mut self, event_loop: &ActiveEventLoop) {
        if self.renderer.is_none() {
            return;
        }
        if self.run_due_ticks(Instant::now()) > 0 {
            if let Some(window) = &self.window {
                window.request_redraw();
            }
        }
        event_loop.set_control_flow(ControlFlow::WaitUntil(self.clock.next_deadline()));
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _id: WindowId, event: WindowEvent) {
        match event {
            WindowEvent::CloseRequested => {
                log::info!("Window closed (score {})", self.state.score);
                event_loop.exit();
            }

            WindowEvent::Resized(size) => {
                if let Some(renderer) = &mut self.renderer {
                    renderer.resize(size.width, size.height);
                }
            }

            WindowEvent::KeyboardInput { event, .. } => {
                self.input.handle_key(event.physical_key, event.state);
            }

            WindowEvent::Focused(false) => self.input.release_all(),

            WindowEvent::RedrawRequested => self.redraw(event_loop),

            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const INTERVAL: Duration = Duration::from_millis(20);

    #[test]
    fn test_nothing_due_before_deadline() {
        let start = Instant::now();
        let mut clock = TickClock::new(INTERVAL, start);
        assert_eq!(clock.due(start), 0);
        assert_eq!(clock.due(start + Duration::from_millis(19)), 0);
        assert_eq!(clock.next_deadline(), start + INTERVAL);
    }

    #[test]
    fn test_one_tick_per_interval() {
        let start = Instant::now();
        let mut clock = TickClock::new(INTERVAL, start);
        assert_eq!(clock.due(start + INTERVAL), 1);
        assert_eq!(clock.due(start + INTERVAL), 0);
        assert_eq!(clock.due(start + INTERVAL * 2), 1);
        assert_eq!(clock.next_deadline(), start + INTERVAL * 3);
    }

    #[test]
    fn test_short_backlog_catches_up() {
        let start = Instant::now();
        let mut clock = TickClock::new(INTERVAL, start);
        assert_eq!(clock.due(start + INTERVAL * 3), 3);
        assert_eq!(clock.next_deadline(), start + INTERVAL * 4);
    }

    #[test]
    fn test_long_backlog_is_dropped() {
        let start = Instant::now();
        let mut clock = TickClock::new(INTERVAL, start);
        let late = start + INTERVAL * 100;
        assert_eq!(clock.due(late), MAX_CATCHUP_TICKS);
        assert_eq!(clock.next_deadline(), late + INTERVAL);
        assert_eq!(clock.due(late), 0);
    }

    #[test]
    fn test_due_ticks_advance_state() {
        let mut app = App::new(Settings::default());
        let start = Instant::now();
        app.clock = TickClock::new(INTERVAL, start);
        app.input.set(crate::input::GameKey::Right, true);

        assert_eq!(app.run_due_ticks(start + INTERVAL * 2), 2);
        assert_eq!(app.state.time_ticks, 2);
        assert!(app.state.paddle.pos.x > 320.0);
    }
}
