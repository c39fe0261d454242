use winit::window::WindowId;

use ripple_engine::core::{App, AppControl, FrameCtx};
use ripple_engine::device::BackgroundImage;
use ripple_engine::input::{Key, Tap};
use ripple_engine::paint::Color;
use ripple_engine::render::RipplePass;
use ripple_engine::ripple::RippleStore;

use crate::config::SessionConfig;

/// Fragment binding slot the ripple parameters start at.
const FIRST_BINDING: u32 = 0;

/// One rendering session: taps feed the store, frames drain it into the pass.
pub struct RippleSession {
    store: RippleStore,
    pass: RipplePass,
    clear: Color,
}

impl RippleSession {
    pub fn new(config: &SessionConfig, background: BackgroundImage) -> Self {
        Self {
            store: RippleStore::new(config.time_to_die),
            pass: RipplePass::new(FIRST_BINDING, background),
            clear: config.clear,
        }
    }
}

impl App for RippleSession {
    fn on_tap(&mut self, _window_id: WindowId, tap: Tap) -> AppControl {
        log::trace!("tap at {:?}", tap.position);
        self.store.add_at(tap.uv, tap.at);
        AppControl::Continue
    }

    fn on_key(&mut self, _window_id: WindowId, key: Key) -> AppControl {
        match key {
            Key::Escape => {
                log::info!("escape pressed, ending session");
                AppControl::Exit
            }
            Key::Space => {
                log::debug!("clearing {} ripples", self.store.len());
                self.store.clear();
                AppControl::Continue
            }
            Key::F11 => AppControl::ToggleFullscreen,
            _ => AppControl::Continue,
        }
    }

    fn on_frame(&mut self, ctx: &mut FrameCtx<'_, '_>) -> AppControl {
        let block = self.store.update_and_export_at(ctx.time.now);
        let pass = &mut self.pass;

        ctx.render(self.clear, |rctx, target| pass.render(rctx, target, &block))
    }
}

#[cfg(test)]
mod tests {
    use std::time::{Duration, Instant};

    use approx::assert_abs_diff_eq;

    use super::*;
    use ripple_engine::coords::{Vec2, Viewport};
    use ripple_engine::device::RgbaImage;

    fn background() -> BackgroundImage {
        BackgroundImage::from_rgba(RgbaImage::new(2, 2), false).unwrap()
    }

    fn session() -> RippleSession {
        RippleSession::new(&SessionConfig::default(), background())
    }

    fn window_id() -> WindowId {
        WindowId::dummy()
    }

    fn tap_at(x: f32, y: f32, at: Instant) -> Tap {
        Tap::new(Vec2::new(x, y), Viewport::new(200.0, 100.0), at).unwrap()
    }

    #[test]
    fn tap_adds_a_ripple_at_its_uv() {
        let mut s = session();
        let t0 = Instant::now();

        assert_eq!(s.on_tap(window_id(), tap_at(100.0, 0.0, t0)), AppControl::Continue);

        let block = s.store.update_and_export_at(t0);
        assert_eq!(block.count(), 1);
        assert_eq!(block.survivors()[0].origin, [0.5, 1.0]);
    }

    #[test]
    fn ripple_ages_from_the_tap_instant() {
        let mut s = session();
        // Far enough ahead that a wall-clock stamp would read a different age.
        let received = Instant::now() + Duration::from_secs(5);
        s.on_tap(window_id(), tap_at(50.0, 50.0, received));

        let block = s.store.update_and_export_at(received + Duration::from_secs(1));
        assert_eq!(block.count(), 1);
        assert_abs_diff_eq!(block.survivors()[0].age, 1.0, epsilon = 1e-6);
    }

    #[test]
    fn space_clears_and_escape_exits() {
        let mut s = session();
        let t0 = Instant::now();
        s.on_tap(window_id(), tap_at(1.0, 1.0, t0));
        s.on_tap(window_id(), tap_at(1.0, 1.0, t0));

        assert_eq!(s.on_key(window_id(), Key::Space), AppControl::Continue);
        assert!(s.store.is_empty());
        assert_eq!(s.on_key(window_id(), Key::Escape), AppControl::Exit);
    }

    #[test]
    fn f11_toggles_fullscreen_from_the_key_callback() {
        let mut s = session();
        assert_eq!(s.on_key(window_id(), Key::F11), AppControl::ToggleFullscreen);
        assert_eq!(s.on_key(window_id(), Key::Unknown(42)), AppControl::Continue);
    }

    #[test]
    fn store_uses_configured_lifetime() {
        let config = SessionConfig {
            time_to_die: 3.0,
            ..SessionConfig::default()
        };
        let s = RippleSession::new(&config, background());
        assert_eq!(s.store.time_to_die(), 3.0);
    }
}
