//! Frame timing: turns variable-rate frame callbacks into fixed logic ticks

/// Delta between two frames
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameDelta {
    /// Elapsed milliseconds, capped
    pub dt: f64,
    /// `dt` divided by the reference frame duration
    pub dt_factor: f64,
}

/// Tracks the previous frame timestamp
#[derive(Debug, Clone)]
pub struct FrameClock {
    last_time: Option<f64>,
    max_delta: f64,
    reference_frame: f64,
}

impl FrameClock {
    pub fn new(max_delta: f64, reference_frame: f64) -> Self {
        Self {
            last_time: None,
            max_delta,
            reference_frame,
        }
    }

    /// Record a frame timestamp and return the capped delta since the last one.
    ///
    /// The first frame yields a zero delta.
    pub fn frame(&mut self, timestamp: f64) -> FrameDelta {
        let last = self.last_time.unwrap_or(timestamp);
        let dt = (timestamp - last).clamp(0.0, self.max_delta);
        self.last_time = Some(timestamp);

        FrameDelta {
            dt,
            dt_factor: dt / self.reference_frame,
        }
    }
}

/// Unconsumed time waiting to be turned into ticks
#[derive(Debug, Clone, Default)]
pub struct Accumulator {
    pending: f64,
}

impl Accumulator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, dt: f64) {
        self.pending += dt;
    }

    /// Take one `interval` worth of time if enough has accumulated.
    ///
    /// Callers re-read the interval on every call so speed changes take
    /// effect between ticks of the same frame.
    pub fn try_consume(&mut self, interval: f64) -> bool {
        if interval > 0.0 && self.pending >= interval {
            self.pending -= interval;
            true
        } else {
            false
        }
    }

    pub fn reset(&mut self) {
        self.pending = 0.0;
    }

    pub fn pending(&self) -> f64 {
        self.pending
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_frame_is_zero() {
        let mut clock = FrameClock::new(50.0, 16.67);
        let delta = clock.frame(1234.0);
        assert_eq!(delta.dt, 0.0);
        assert_eq!(delta.dt_factor, 0.0);
    }

    #[test]
    fn test_delta_capped_after_stall() {
        let mut clock = FrameClock::new(50.0, 16.67);
        clock.frame(0.0);
        assert_eq!(clock.frame(16.0).dt, 16.0);
        assert_eq!(clock.frame(2016.0).dt, 50.0);
    }

    #[test]
    fn test_dt_factor_normalised() {
        let mut clock = FrameClock::new(50.0, 16.67);
        clock.frame(0.0);
        let delta = clock.frame(16.67);
        assert!((delta.dt_factor - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_accumulator_fires_whole_ticks() {
        let mut acc = Accumulator::new();
        acc.add(50.0);
        acc.add(50.0);
        acc.add(50.0);

        let mut ticks = 0;
        while acc.try_consume(60.0) {
            ticks += 1;
        }
        assert_eq!(ticks, 2);
        assert_eq!(acc.pending(), 30.0);
    }

    #[test]
    fn test_accumulator_never_negative() {
        let mut acc = Accumulator::new();
        acc.add(10.0);
        assert!(!acc.try_consume(20.0));
        assert_eq!(acc.pending(), 10.0);
        assert!(!acc.try_consume(0.0));
    }

    #[test]
    fn test_frame_rate_independent_tick_count() {
        // 1 second at 60 Hz and at 144 Hz yields the same number of ticks
        for hz in [60.0, 144.0] {
            let mut clock = FrameClock::new(50.0, 16.67);
            let mut acc = Accumulator::new();
            let step = 1000.0 / hz;
            let mut ticks = 0;
            let mut t = 0.0;
            clock.frame(t);
            while t < 1000.0 - 1e-6 {
                t += step;
                acc.add(clock.frame(t).dt);
                while acc.try_consume(100.0) {
                    ticks += 1;
                }
            }
            assert!((9..=10).contains(&ticks), "{} Hz gave {} ticks", hz, ticks);
        }
    }
}
