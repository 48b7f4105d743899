/// Longest frame delta the clock will accept, in seconds.
pub const MAX_FRAME_TIME: f32 = 1.0;

/// Most logic updates run for a single host frame.
pub const MAX_UPDATES_PER_FRAME: u32 = 10;

/// What one host frame should do.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameSteps {
    /// Number of logic updates to run.
    pub updates: u32,
    /// Whether the render list should be rebuilt this frame.
    pub render: bool,
    /// Interpolation alpha between the previous and current logic state (0.0 to 1.0).
    pub alpha: f32,
}

/// Fixed-rate logic clock with an optional independent render cap.
///
/// Game logic runs at `fps` regardless of how often the host calls in;
/// leftover time becomes the interpolation alpha. With a `render_fps` set,
/// rendering is throttled on its own accumulator.
pub struct FrameClock {
    fps: f32,
    render_fps: Option<f32>,
    /// Accumulated logic time not yet consumed by updates.
    lag: f32,
    /// Accumulated render time when a render cap is active.
    render_lag: f32,
}

impl FrameClock {
    pub fn new(fps: f32, render_fps: Option<f32>) -> Self {
        Self {
            fps,
            render_fps,
            lag: 0.0,
            render_lag: 0.0,
        }
    }

    /// Feed one host frame delta. Returns the work to do this frame.
    pub fn advance(&mut self, frame_dt: f32) -> FrameSteps {
        let elapsed = frame_dt.clamp(0.0, MAX_FRAME_TIME);
        let step = self.dt();

        self.lag += elapsed;
        let mut updates = (self.lag / step) as u32;
        if updates > MAX_UPDATES_PER_FRAME {
            // Cap to prevent spiral of death; the backlog is dropped
            updates = MAX_UPDATES_PER_FRAME;
            self.lag = 0.0;
        } else {
            self.lag -= updates as f32 * step;
        }

        let render = match self.render_fps {
            Some(render_fps) => {
                let render_step = 1.0 / render_fps;
                self.render_lag += elapsed;
                if self.render_lag >= render_step {
                    self.render_lag %= render_step;
                    true
                } else {
                    false
                }
            }
            None => true,
        };

        FrameSteps {
            updates,
            render,
            alpha: self.alpha(),
        }
    }

    /// Interpolation alpha for rendering between ticks (0.0 to 1.0).
    pub fn alpha(&self) -> f32 {
        (self.lag / self.dt()).clamp(0.0, 1.0)
    }

    /// Seconds per logic update.
    pub fn dt(&self) -> f32 {
        1.0 / self.fps
    }

    pub fn fps(&self) -> f32 {
        self.fps
    }

    pub fn set_fps(&mut self, fps: f32) {
        self.fps = fps;
        self.lag = 0.0;
    }

    pub fn render_fps(&self) -> Option<f32> {
        self.render_fps
    }

    /// Cap the render rate, or pass `None` to render every host frame.
    pub fn set_render_fps(&mut self, render_fps: Option<f32>) {
        self.render_fps = render_fps;
        self.render_lag = 0.0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn one_step_exact() {
        let mut clock = FrameClock::new(60.0, None);
        let steps = clock.advance(1.0 / 60.0);
        assert_eq!(steps.updates, 1);
        assert!(steps.render);
    }

    #[test]
    fn accumulates_partial() {
        let mut clock = FrameClock::new(60.0, None);
        assert_eq!(clock.advance(0.008).updates, 0); // half a frame
        assert_eq!(clock.advance(0.010).updates, 1); // over one frame total
    }

    #[test]
    fn caps_at_ten_steps() {
        let mut clock = FrameClock::new(60.0, None);
        assert_eq!(clock.advance(5.0).updates, 10);
        assert_eq!(clock.advance(0.0).updates, 0);
    }

    #[test]
    fn alpha_is_between_zero_and_one() {
        let mut clock = FrameClock::new(60.0, None);
        let a = clock.advance(0.008).alpha;
        assert!((0.0..=1.0).contains(&a), "alpha was {}", a);
        assert!(a > 0.4 && a < 0.5, "alpha was {}", a);
    }

    #[test]
    fn render_cap_throttles_rendering() {
        let mut clock = FrameClock::new(60.0, Some(16.0));
        let rendered: Vec<bool> = (0..8).map(|_| clock.advance(1.0 / 64.0).render).collect();
        assert_eq!(rendered, [false, false, false, true, false, false, false, true]);
    }

    #[test]
    fn changing_fps_resets_lag() {
        let mut clock = FrameClock::new(60.0, None);
        clock.advance(0.01);
        clock.set_fps(30.0);
        assert_eq!(clock.alpha(), 0.0);
        assert_eq!(clock.advance(1.0 / 60.0).updates, 0);
        assert_eq!(clock.advance(1.0 / 60.0 + 0.001).updates, 1);
    }
}
