use std::time::{Duration, Instant};

pub struct Time {
    start: Instant,
    last: Instant,
    pub delta: Duration,
}
impl Time {
    pub fn new() -> Self {
        let now = Instant::now();
        Self { start: now, last: now, delta: Duration::from_secs_f32(0.0) }
    }
    pub fn tick(&mut self) {
        let now = Instant::now();
        self.delta = now - self.last;
        self.last = now;
    }
    pub fn delta_seconds(&self) -> f32 {
        self.delta.as_secs_f32()
    }
    pub fn elapsed_seconds(&self) -> f32 {
        self.last.duration_since(self.start).as_secs_f32()
    }
}

impl Default for Time {
    fn default() -> Self {
        Self::new()
    }
}

/// Fixed-step accumulator. Raw frame deltas are clamped to `max_frame_delta`
/// before accumulation so a stalled tab or a debugger pause never turns into
/// one huge integration step; the simulation then drains whole steps of
/// `step` seconds each.
#[derive(Debug, Clone, Copy)]
pub struct FixedTimestep {
    pub step: f32,
    pub max_frame_delta: f32,
    accumulator: f32,
}

impl FixedTimestep {
    pub fn new(step: f32, max_frame_delta: f32) -> Self {
        Self { step, max_frame_delta, accumulator: 0.0 }
    }

    /// Feeds one display-frame delta and returns how many fixed steps to run.
    pub fn accumulate(&mut self, frame_delta: f32) -> u32 {
        self.accumulator += frame_delta.min(self.max_frame_delta).max(0.0);
        let mut steps = 0;
        while self.accumulator >= self.step {
            self.accumulator -= self.step;
            steps += 1;
        }
        steps
    }

    /// Remainder fraction of a step, usable for render-side interpolation.
    pub fn alpha(&self) -> f32 {
        if self.step > 0.0 {
            self.accumulator / self.step
        } else {
            0.0
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn drains_whole_steps_and_keeps_remainder() {
        let mut ts = FixedTimestep::new(1.0 / 60.0, 0.1);
        assert_eq!(ts.accumulate(0.05), 3);
        assert!(ts.alpha() > 0.0 && ts.alpha() < 1.0);
    }

    #[test]
    fn clamps_stall_deltas() {
        let mut ts = FixedTimestep::new(1.0 / 60.0, 0.1);
        // A two-second stall must integrate as at most 0.1s worth of steps.
        assert_eq!(ts.accumulate(2.0), 6);
    }

    #[test]
    fn negative_deltas_are_ignored() {
        let mut ts = FixedTimestep::new(1.0 / 60.0, 0.1);
        assert_eq!(ts.accumulate(-0.5), 0);
    }
}
