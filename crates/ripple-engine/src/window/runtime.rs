use std::time::Instant;

use anyhow::{Context, Result};
use ouroboros::self_referencing;

use winit::application::ApplicationHandler;
use winit::dpi::LogicalSize;
use winit::event::WindowEvent;
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::window::{Fullscreen, Window, WindowId};

use crate::core::{App as CoreApp, AppControl, FrameCtx, logical_viewport};
use crate::device::{Gpu, GpuInit};
use crate::input::platform::translate_window_event;
use crate::input::{DEFAULT_TAP_SLOP, InputAction, InputState, Tap};
use crate::time::{FrameClock, FrameTime};

/// How the session window is presented.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum WindowMode {
    Windowed,
    /// Borderless fullscreen on the current monitor.
    Fullscreen,
}

impl WindowMode {
    fn fullscreen(self) -> Option<Fullscreen> {
        match self {
            WindowMode::Windowed => None,
            WindowMode::Fullscreen => Some(Fullscreen::Borderless(None)),
        }
    }

    fn toggled(self) -> Self {
        match self {
            WindowMode::Windowed => WindowMode::Fullscreen,
            WindowMode::Fullscreen => WindowMode::Windowed,
        }
    }
}

/// Window/runtime configuration.
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    pub title: String,

    /// Size used in windowed mode.
    pub initial_size: LogicalSize<f64>,

    pub mode: WindowMode,

    /// Tap movement tolerance in logical pixels.
    pub tap_slop: f32,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            title: "ripple".to_string(),
            initial_size: LogicalSize::new(1280.0, 720.0),
            mode: WindowMode::Fullscreen,
            tap_slop: DEFAULT_TAP_SLOP,
        }
    }
}

/// Entry point for the runtime.
pub struct Runtime;

impl Runtime {
    /// Opens the session window and drives `app` until it exits or the
    /// window closes. GPU initialization failure ends the loop with an error.
    pub fn run<A>(config: RuntimeConfig, gpu_init: GpuInit, app: A) -> Result<()>
    where
        A: 'static + CoreApp,
    {
        let event_loop = EventLoop::new().context("failed to create winit EventLoop")?;
        let mut state = AppState::new(config, gpu_init, app);

        event_loop
            .run_app(&mut state)
            .context("winit event loop terminated with error")?;

        match state.startup_error.take() {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}

#[self_referencing]
struct WindowEntry {
    input_state: InputState,
    clock: FrameClock,

    window: Window,

    #[borrows(window)]
    #[covariant]
    gpu: Gpu<'this>,
}

struct AppState<A>
where
    A: CoreApp + 'static,
{
    config: RuntimeConfig,
    gpu_init: GpuInit,
    app: A,

    mode: WindowMode,
    entry: Option<WindowEntry>,
    startup_error: Option<anyhow::Error>,
    exit_requested: bool,
}

impl<A> AppState<A>
where
    A: CoreApp + 'static,
{
    fn new(config: RuntimeConfig, gpu_init: GpuInit, app: A) -> Self {
        Self {
            mode: config.mode,
            config,
            gpu_init,
            app,
            entry: None,
            startup_error: None,
            exit_requested: false,
        }
    }

    fn request_exit(&mut self) {
        self.exit_requested = true;
    }

    fn create_window_entry(&mut self, event_loop: &ActiveEventLoop) -> Result<()> {
        let attrs = Window::default_attributes()
            .with_title(self.config.title.clone())
            .with_inner_size(self.config.initial_size)
            .with_fullscreen(self.mode.fullscreen());

        let window = event_loop
            .create_window(attrs)
            .context("failed to create window")?;

        let gpu_init = self.gpu_init.clone();

        let entry = WindowEntryTryBuilder {
            input_state: InputState::with_tap_slop(self.config.tap_slop),
            clock: FrameClock::default(),
            window,
            gpu_builder: |w| pollster::block_on(Gpu::new(w, gpu_init)),
        }
        .try_build()
        .context("GPU initialization failed")?;

        log::info!("window ready ({:?})", self.mode);
        self.entry = Some(entry);
        Ok(())
    }

    /// Acts on a directive returned by an app callback.
    fn apply_control(&mut self, event_loop: &ActiveEventLoop, control: AppControl) {
        match control {
            AppControl::Continue => {}
            AppControl::ToggleFullscreen => {
                self.mode = self.mode.toggled();
                log::info!("switching to {:?}", self.mode);
                let fullscreen = self.mode.fullscreen();
                if let Some(entry) = self.entry.as_ref() {
                    entry.with_window(|w| w.set_fullscreen(fullscreen));
                }
            }
            AppControl::Exit => {
                self.request_exit();
                event_loop.exit();
            }
        }
    }

    /// Feeds one platform event through input translation and dispatches the
    /// resulting tap or key press to the app.
    ///
    /// `received` stamps the tap; it shares the monotonic clock that frames
    /// age ripples against.
    fn dispatch_input(
        &mut self,
        window_id: WindowId,
        event: &WindowEvent,
        received: Instant,
    ) -> AppControl {
        // Split borrows to avoid `self` capture inside `ouroboros` closures.
        let (app, entry) = (&mut self.app, &mut self.entry);
        let Some(entry) = entry.as_mut() else {
            return AppControl::Continue;
        };

        entry.with_mut(|fields| {
            let action = translate_window_event(fields.window, fields.input_state, event)
                .and_then(|ev| fields.input_state.apply_event(ev));

            match action {
                Some(InputAction::KeyPressed(key)) => app.on_key(window_id, key),
                Some(InputAction::Tap(pos)) => {
                    match Tap::new(pos, logical_viewport(fields.window), received) {
                        Some(tap) => app.on_tap(window_id, tap),
                        None => {
                            log::debug!("tap at {pos:?} dropped: window has no area");
                            AppControl::Continue
                        }
                    }
                }
                None => AppControl::Continue,
            }
        })
    }

    fn redraw(&mut self) -> AppControl {
        let (app, entry) = (&mut self.app, &mut self.entry);
        let Some(entry) = entry.as_mut() else {
            return AppControl::Continue;
        };

        entry.with_mut(|fields| {
            let ft: FrameTime = fields.clock.tick();
            let mut ctx = FrameCtx {
                window: fields.window,
                gpu: fields.gpu,
                time: ft,
            };
            app.on_frame(&mut ctx)
        })
    }
}

impl<A> ApplicationHandler for AppState<A>
where
    A: CoreApp + 'static,
{
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.entry.is_some() {
            return;
        }

        if let Err(e) = self.create_window_entry(event_loop) {
            log::error!("failed to start session: {e:#}");
            self.startup_error = Some(e);
            self.request_exit();
            event_loop.exit();
            return;
        }

        if let Some(entry) = self.entry.as_ref() {
            entry.with_window(|w| w.request_redraw());
        }
    }

    fn about_to_wait(&mut self, event_loop: &ActiveEventLoop) {
        if self.exit_requested {
            event_loop.exit();
            return;
        }

        event_loop.set_control_flow(ControlFlow::Wait);

        // Continuous redraw; FIFO presentation paces it to the display.
        if let Some(entry) = self.entry.as_ref() {
            entry.with_window(|w| w.request_redraw());
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        window_id: WindowId,
        event: WindowEvent,
    ) {
        if self.exit_requested {
            event_loop.exit();
            return;
        }

        let control = self.app.on_window_event(window_id, &event);
        self.apply_control(event_loop, control);
        if self.exit_requested {
            return;
        }

        let control = self.dispatch_input(window_id, &event, Instant::now());
        self.apply_control(event_loop, control);

        if self.exit_requested {
            return;
        }

        // Runtime-managed window lifecycle / resize / redraw handling.
        match &event {
            WindowEvent::CloseRequested => {
                self.entry = None;
                self.request_exit();
                event_loop.exit();
            }

            WindowEvent::Resized(new_size) => {
                if let Some(entry) = self.entry.as_mut() {
                    entry.with_gpu_mut(|gpu| gpu.resize(*new_size));
                    entry.with_window(|w| w.request_redraw());
                }
            }

            WindowEvent::ScaleFactorChanged { .. } => {
                if let Some(entry) = self.entry.as_mut() {
                    let new_size = entry.with_window(|w| w.inner_size());
                    entry.with_gpu_mut(|gpu| gpu.resize(new_size));
                    entry.with_window(|w| w.request_redraw());
                }
            }

            WindowEvent::RedrawRequested => {
                let control = self.redraw();
                self.apply_control(event_loop, control);
            }

            _ => {}
        }

        if self.exit_requested {
            event_loop.exit();
        }
    }
}
