//! Time management utilities
//!
//! The [`Clock`] turns irregular rendering-frame deltas into a steady stream of
//! fixed simulation ticks. Frame-based timing elsewhere (cooldowns, animation
//! stepping) reads [`Clock::frame_count`] instead of wall-clock time.

use std::time::Duration;

use crate::config::ClockConfig;

/// Largest accepted time scale
pub const MAX_TIME_SCALE: f32 = 100.0;

/// Nominal duration of one tick when nothing else is configured (60 Hz)
pub const DEFAULT_FIXED_TIMESTEP: Duration = Duration::from_nanos(16_666_667);

/// Shortest accepted scaled timestep; a zero threshold would never drain
pub const MIN_SCALED_TIMESTEP: Duration = Duration::from_nanos(1);

const RATE_WINDOW: Duration = Duration::from_secs(1);

/// Fixed-timestep accumulator clock
#[derive(Debug, Clone)]
pub struct Clock {
    fixed_timestep: Duration,
    time_scale: f32,
    accumulator: Duration,
    frame_count: u64,
    skip_next: bool,
    rejected_time_scales: u64,

    // Measured tick rate over a rolling one-second window
    rate_window: Duration,
    rate_window_ticks: u32,
    ticks_per_second: f32,
}

impl Default for Clock {
    fn default() -> Self {
        Self::new(DEFAULT_FIXED_TIMESTEP)
    }
}

impl Clock {
    /// Create a clock ticking once per `fixed_timestep` at time scale 1.0
    ///
    /// A zero timestep would never let the accumulator drain, so it falls back
    /// to [`DEFAULT_FIXED_TIMESTEP`].
    pub fn new(fixed_timestep: Duration) -> Self {
        let fixed_timestep = if fixed_timestep.is_zero() {
            log::warn!("Zero fixed timestep requested, using {:?}", DEFAULT_FIXED_TIMESTEP);
            DEFAULT_FIXED_TIMESTEP
        } else {
            fixed_timestep
        };

        Self {
            fixed_timestep,
            time_scale: 1.0,
            accumulator: Duration::ZERO,
            frame_count: 0,
            skip_next: false,
            rejected_time_scales: 0,
            rate_window: Duration::ZERO,
            rate_window_ticks: 0,
            ticks_per_second: 0.0,
        }
    }

    /// Create a clock from configuration
    ///
    /// The configured time scale goes through [`Clock::set_time_scale`], so an
    /// out-of-range value leaves the clock at 1.0.
    pub fn from_config(config: &ClockConfig) -> Self {
        let timestep = Duration::try_from_secs_f64(config.fixed_timestep_secs).unwrap_or(Duration::ZERO);

        let mut clock = Self::new(timestep);
        clock.set_time_scale(config.time_scale);
        clock
    }

    /// Feed one rendering frame's wall-clock delta
    ///
    /// Returns the number of fixed ticks that elapsed. At most one nominal
    /// frame of time is accepted per call, so a long stall never turns into a
    /// burst of catch-up ticks.
    pub fn advance(&mut self, delta: Duration) -> u32 {
        if self.skip_next {
            self.skip_next = false;
            return 0;
        }

        let threshold = self.scaled_timestep();
        self.accumulator += delta.min(threshold);

        let mut ticks = 0;
        while self.accumulator >= threshold {
            self.accumulator -= threshold;
            self.frame_count += 1;
            ticks += 1;
        }

        self.track_rate(delta, ticks);
        ticks
    }

    /// Change the simulation speed
    ///
    /// Values `<= 0`, above [`MAX_TIME_SCALE`] or NaN are ignored and the
    /// previous scale is kept.
    pub fn set_time_scale(&mut self, scale: f32) {
        if !(scale > 0.0 && scale <= MAX_TIME_SCALE) {
            self.rejected_time_scales += 1;
            log::warn!("Ignoring time scale {} (keeping {})", scale, self.time_scale);
            return;
        }

        self.time_scale = scale;
    }

    /// Zero the accumulator; the next [`Clock::advance`] call is skipped
    pub fn reset(&mut self) {
        self.accumulator = Duration::ZERO;
        self.skip_next = true;
        self.rate_window = Duration::ZERO;
        self.rate_window_ticks = 0;
    }

    /// Wall-clock time that must accumulate before one tick elapses
    ///
    /// Never shorter than [`MIN_SCALED_TIMESTEP`].
    pub fn scaled_timestep(&self) -> Duration {
        let scaled = if (self.time_scale - 1.0).abs() < f32::EPSILON {
            self.fixed_timestep
        } else {
            self.fixed_timestep.div_f64(f64::from(self.time_scale))
        };
        scaled.max(MIN_SCALED_TIMESTEP)
    }

    /// Ticks elapsed since the clock was created
    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }

    /// Current time scale
    pub fn time_scale(&self) -> f32 {
        self.time_scale
    }

    /// Nominal (unscaled) tick duration
    pub fn fixed_timestep(&self) -> Duration {
        self.fixed_timestep
    }

    /// Time carried over towards the next tick
    pub fn accumulated(&self) -> Duration {
        self.accumulator
    }

    /// Number of rejected [`Clock::set_time_scale`] calls
    pub fn rejected_time_scales(&self) -> u64 {
        self.rejected_time_scales
    }

    /// Tick rate measured over the last full second of wall-clock time
    pub fn ticks_per_second(&self) -> f32 {
        self.ticks_per_second
    }

    fn track_rate(&mut self, delta: Duration, ticks: u32) {
        self.rate_window += delta;
        self.rate_window_ticks += ticks;

        if self.rate_window >= RATE_WINDOW {
            self.ticks_per_second = self.rate_window_ticks as f32 / self.rate_window.as_secs_f32();
            self.rate_window = Duration::ZERO;
            self.rate_window_ticks = 0;
        }
    }
}

/// Frame-count based cooldown
///
/// Fires at most once every `frames` ticks:
///
/// ```
/// use quad_engine::foundation::time::Cooldown;
///
/// let mut fire = Cooldown::new(120);
/// assert!(fire.try_fire(10));
/// assert!(!fire.try_fire(100));
/// assert!(fire.try_fire(130));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cooldown {
    frames: u64,
    last_fired: Option<u64>,
}

impl Cooldown {
    /// Create a cooldown that is ready immediately
    pub fn new(frames: u64) -> Self {
        Self { frames, last_fired: None }
    }

    /// Whether the cooldown has elapsed at `frame`
    pub fn is_ready(&self, frame: u64) -> bool {
        self.last_fired
            .map_or(true, |last| last.saturating_add(self.frames) <= frame)
    }

    /// Fire if ready, restarting the cooldown from `frame`
    pub fn try_fire(&mut self, frame: u64) -> bool {
        if self.is_ready(frame) {
            self.last_fired = Some(frame);
            true
        } else {
            false
        }
    }

    /// Make the cooldown ready again
    pub fn reset(&mut self) {
        self.last_fired = None;
    }

    /// Cooldown length in frames
    pub fn frames(&self) -> u64 {
        self.frames
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const STEP: Duration = Duration::from_millis(20);

    fn run(clock: &mut Clock, delta: Duration, calls: usize) -> u32 {
        (0..calls).map(|_| clock.advance(delta)).sum()
    }

    #[test]
    fn test_one_tick_per_nominal_frame() {
        let mut clock = Clock::new(STEP);
        assert_eq!(run(&mut clock, STEP, 10), 10);
        assert_eq!(clock.frame_count(), 10);
    }

    #[test]
    fn test_partial_frames_accumulate() {
        let mut clock = Clock::new(STEP);
        assert_eq!(clock.advance(STEP / 2), 0);
        assert_eq!(clock.advance(STEP / 2), 1);
        assert_eq!(clock.accumulated(), Duration::ZERO);
    }

    #[test]
    fn test_long_stall_is_capped() {
        let mut clock = Clock::new(STEP);
        assert_eq!(clock.advance(Duration::from_secs(5)), 1);
        assert!(clock.accumulated() < STEP);
    }

    #[test]
    fn test_double_time_scale_halves_wall_time() {
        let mut normal = Clock::new(STEP);
        let mut fast = Clock::new(STEP);
        fast.set_time_scale(2.0);

        let normal_ticks = run(&mut normal, STEP / 2, 40);
        let fast_ticks = run(&mut fast, STEP / 2, 40);

        assert_eq!(normal_ticks, 20);
        assert_eq!(fast_ticks, 40);
    }

    #[test]
    fn test_invalid_time_scale_is_ignored() {
        let mut clock = Clock::new(STEP);
        clock.set_time_scale(0.5);

        for scale in [0.0, -1.0, 150.0, f32::NAN] {
            clock.set_time_scale(scale);
            assert_eq!(clock.time_scale(), 0.5);
        }
        assert_eq!(clock.rejected_time_scales(), 4);
    }

    #[test]
    fn test_reset_skips_next_advance() {
        let mut clock = Clock::new(STEP);
        clock.advance(STEP / 2);
        clock.reset();

        assert_eq!(clock.accumulated(), Duration::ZERO);
        assert_eq!(clock.advance(STEP), 0);
        assert_eq!(clock.advance(STEP), 1);
        assert_eq!(clock.frame_count(), 1);
    }

    #[test]
    fn test_frame_count_never_decreases() {
        let mut clock = Clock::new(STEP);
        let mut last = 0;
        for delta_ms in [3, 50, 0, 7, 20, 1, 19] {
            clock.advance(Duration::from_millis(delta_ms));
            assert!(clock.frame_count() >= last);
            last = clock.frame_count();
        }
    }

    #[test]
    fn test_ticks_per_second_measurement() {
        let mut clock = Clock::new(STEP);
        run(&mut clock, STEP, 50);
        assert!((clock.ticks_per_second() - 50.0).abs() < 0.5);
    }

    #[test]
    fn test_zero_timestep_falls_back_to_default() {
        let clock = Clock::new(Duration::ZERO);
        assert_eq!(clock.fixed_timestep(), DEFAULT_FIXED_TIMESTEP);
    }

    #[test]
    fn test_tiny_scaled_timestep_still_drains() {
        let mut clock = Clock::new(Duration::from_nanos(1));
        clock.set_time_scale(MAX_TIME_SCALE);

        assert_eq!(clock.scaled_timestep(), MIN_SCALED_TIMESTEP);
        assert_eq!(clock.advance(Duration::from_millis(16)), 1);
        assert_eq!(clock.accumulated(), Duration::ZERO);
    }

    #[test]
    fn test_unrepresentable_config_timestep_falls_back() {
        for secs in [1e20, f64::MAX, -0.5, f64::NAN] {
            let config = ClockConfig {
                fixed_timestep_secs: secs,
                ..ClockConfig::default()
            };
            assert_eq!(Clock::from_config(&config).fixed_timestep(), DEFAULT_FIXED_TIMESTEP);
        }
    }

    #[test]
    fn test_cooldown() {
        let mut cooldown = Cooldown::new(30);
        assert!(cooldown.is_ready(0));
        assert!(cooldown.try_fire(5));
        assert!(!cooldown.is_ready(34));
        assert!(cooldown.is_ready(35));

        cooldown.reset();
        assert!(cooldown.try_fire(6));
    }
}
