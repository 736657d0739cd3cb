use std::time::Instant;

const FPS_SAMPLE_COUNT: usize = 60;

/// Fixed-timestep clock in milliseconds.
///
/// Wall-clock time is fed in per rendered frame; `should_step` then hands out
/// whole `fixed_dt_ms` slices so the simulation always advances by the same dt.
pub struct FrameClock {
    pub fixed_dt_ms: f64,
    pub max_frame_ms: f64,
    accumulator_ms: f64,
    pub total_time_ms: f64,
    pub fixed_step_count: u64,
    pub frame_count: u64,
    pub steps_this_frame: u32,
    pub real_dt_ms: f64,
    last_instant: Option<Instant>,

    frame_samples: [f64; FPS_SAMPLE_COUNT],
    sample_index: usize,
    pub smoothed_fps: f64,
    pub smoothed_frame_time_ms: f64,
}

impl FrameClock {
    pub fn new(fps: u32) -> Self {
        let fixed_dt_ms = 1000.0 / fps.max(1) as f64;
        Self {
            fixed_dt_ms,
            max_frame_ms: 250.0,
            accumulator_ms: 0.0,
            total_time_ms: 0.0,
            fixed_step_count: 0,
            frame_count: 0,
            steps_this_frame: 0,
            real_dt_ms: 0.0,
            last_instant: None,
            frame_samples: [fixed_dt_ms; FPS_SAMPLE_COUNT],
            sample_index: 0,
            smoothed_fps: 1000.0 / fixed_dt_ms,
            smoothed_frame_time_ms: fixed_dt_ms,
        }
    }

    /// Measure the wall-clock delta since the previous call and feed it in.
    /// The first call measures nothing and feeds exactly one fixed step.
    pub fn begin_frame_now(&mut self) {
        let now = Instant::now();
        let real_dt_ms = match self.last_instant {
            Some(prev) => now.duration_since(prev).as_secs_f64() * 1000.0,
            None => self.fixed_dt_ms,
        };
        self.last_instant = Some(now);
        self.begin_frame(real_dt_ms);
    }

    pub fn begin_frame(&mut self, real_dt_ms: f64) {
        self.real_dt_ms = real_dt_ms.max(0.0);

        // Spiral-of-death cap
        if self.real_dt_ms > self.max_frame_ms {
            log::warn!(
                "Frame took {:.1}ms, capping to {}ms",
                self.real_dt_ms,
                self.max_frame_ms
            );
            self.real_dt_ms = self.max_frame_ms;
        }

        self.accumulator_ms += self.real_dt_ms;
        self.steps_this_frame = 0;
        self.frame_count += 1;

        self.frame_samples[self.sample_index] = self.real_dt_ms;
        self.sample_index = (self.sample_index + 1) % FPS_SAMPLE_COUNT;
        let avg_ms: f64 = self.frame_samples.iter().sum::<f64>() / FPS_SAMPLE_COUNT as f64;
        self.smoothed_frame_time_ms = avg_ms;
        self.smoothed_fps = if avg_ms > 0.0 { 1000.0 / avg_ms } else { 0.0 };
    }

    pub fn should_step(&mut self) -> bool {
        if self.accumulator_ms >= self.fixed_dt_ms {
            self.accumulator_ms -= self.fixed_dt_ms;
            self.total_time_ms += self.fixed_dt_ms;
            self.fixed_step_count += 1;
            self.steps_this_frame += 1;
            true
        } else {
            false
        }
    }

    /// Time left in the accumulator, for pacing a real-time loop.
    pub fn time_until_next_step_ms(&self) -> f64 {
        (self.fixed_dt_ms - self.accumulator_ms).max(0.0)
    }
}

impl Default for FrameClock {
    fn default() -> Self {
        Self::new(60)
    }
}
