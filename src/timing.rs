//! Cooldown and sampling gates for the capture loop.
//!
//! All decisions take the tick time explicitly so they can be driven by
//! frame timestamps rather than the wall clock.

use crate::config::TimingConfig;
use crate::error::MotionVisionError;
use std::num::NonZeroU32;
use std::time::{Duration, Instant};

/// Snapshot of the loop's timing bookkeeping
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TimingState {
    pub last_motion_timestamp: Option<Instant>,
    pub last_api_call_timestamp: Option<Instant>,
    pub frame_counter: u64,
}

/// Tracks when motion was last seen and when the API was last called
#[derive(Debug, Clone)]
pub struct RateGate {
    motion_cooldown: Duration,
    api_cooldown: Duration,
    last_motion: Option<Instant>,
    last_api_call: Option<Instant>,
}

impl RateGate {
    pub fn new(motion_cooldown: Duration, api_cooldown: Duration) -> Self {
        Self {
            motion_cooldown,
            api_cooldown,
            last_motion: None,
            last_api_call: None,
        }
    }

    pub fn from_config(config: &TimingConfig) -> Self {
        Self::new(config.motion_cooldown(), config.api_cooldown())
    }

    /// False while inside the motion cooldown window
    pub fn should_check_motion(&self, now: Instant) -> bool {
        outside_window(self.last_motion, self.motion_cooldown, now)
    }

    pub fn record_motion(&mut self, now: Instant) {
        self.last_motion = Some(now);
    }

    /// False while inside the API cooldown window
    pub fn should_call_api(&self, now: Instant) -> bool {
        outside_window(self.last_api_call, self.api_cooldown, now)
    }

    pub fn record_api_call(&mut self, now: Instant) {
        self.last_api_call = Some(now);
    }

    /// Time left before the API may be called again
    pub fn api_cooldown_remaining(&self, now: Instant) -> Duration {
        remaining(self.last_api_call, self.api_cooldown, now)
    }

    pub fn last_motion(&self) -> Option<Instant> {
        self.last_motion
    }

    pub fn last_api_call(&self) -> Option<Instant> {
        self.last_api_call
    }
}

fn outside_window(last: Option<Instant>, cooldown: Duration, now: Instant) -> bool {
    match last {
        None => true,
        Some(last) => now.saturating_duration_since(last) >= cooldown,
    }
}

fn remaining(last: Option<Instant>, cooldown: Duration, now: Instant) -> Duration {
    match last {
        None => Duration::ZERO,
        Some(last) => cooldown.saturating_sub(now.saturating_duration_since(last)),
    }
}

/// Every-Nth-frame gate with a 1-based frame counter
#[derive(Debug, Clone)]
pub struct FrameSampler {
    sample_rate: NonZeroU32,
    frame_counter: u64,
}

impl FrameSampler {
    pub fn new(sample_rate: u32) -> Result<Self, MotionVisionError> {
        let sample_rate = NonZeroU32::new(sample_rate).ok_or_else(|| {
            config::ConfigError::Message("Timing sample_rate must be greater than 0".to_string())
        })?;

        Ok(Self {
            sample_rate,
            frame_counter: 0,
        })
    }

    pub fn should_process(frame_index: u64, sample_rate: NonZeroU32) -> bool {
        frame_index % sample_rate.get() as u64 == 0
    }

    /// Count a new frame and report whether it is eligible for processing
    pub fn next_frame(&mut self) -> (u64, bool) {
        self.frame_counter += 1;
        (
            self.frame_counter,
            Self::should_process(self.frame_counter, self.sample_rate),
        )
    }

    pub fn frame_counter(&self) -> u64 {
        self.frame_counter
    }

    pub fn sample_rate(&self) -> NonZeroU32 {
        self.sample_rate
    }
}

/// Combined view of the gate and sampler state
pub fn timing_state(gate: &RateGate, sampler: &FrameSampler) -> TimingState {
    TimingState {
        last_motion_timestamp: gate.last_motion(),
        last_api_call_timestamp: gate.last_api_call(),
        frame_counter: sampler.frame_counter(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn secs(s: f64) -> Duration {
        Duration::from_secs_f64(s)
    }

    #[test]
    fn test_gates_open_before_any_event() {
        let gate = RateGate::new(secs(5.0), secs(10.0));
        let now = Instant::now();

        assert!(gate.should_check_motion(now));
        assert!(gate.should_call_api(now));
        assert_eq!(gate.api_cooldown_remaining(now), Duration::ZERO);
    }

    #[test]
    fn test_motion_cooldown_window() {
        let mut gate = RateGate::new(secs(5.0), secs(10.0));
        let t0 = Instant::now();
        gate.record_motion(t0);

        for offset in [0.0, 0.5, 2.0, 4.999] {
            assert!(!gate.should_check_motion(t0 + secs(offset)), "offset {}", offset);
        }
        for offset in [5.0, 5.001, 60.0] {
            assert!(gate.should_check_motion(t0 + secs(offset)), "offset {}", offset);
        }
    }

    #[test]
    fn test_api_cooldown_is_independent_of_motion() {
        let mut gate = RateGate::new(secs(1.0), secs(10.0));
        let t0 = Instant::now();

        gate.record_motion(t0);
        assert!(gate.should_call_api(t0));

        gate.record_api_call(t0);
        assert!(!gate.should_call_api(t0 + secs(3.0)));
        assert!(gate.should_check_motion(t0 + secs(3.0)));
        assert_eq!(gate.api_cooldown_remaining(t0 + secs(3.0)), secs(7.0));
        assert!(gate.should_call_api(t0 + secs(10.0)));
    }

    #[test]
    fn test_zero_cooldown_never_blocks() {
        let mut gate = RateGate::new(Duration::ZERO, Duration::ZERO);
        let t0 = Instant::now();
        gate.record_motion(t0);
        gate.record_api_call(t0);

        assert!(gate.should_check_motion(t0));
        assert!(gate.should_call_api(t0));
    }

    #[test]
    fn test_should_process_is_modulo() {
        for k in 1..=7u32 {
            let rate = NonZeroU32::new(k).unwrap();
            for i in 1..=50u64 {
                assert_eq!(FrameSampler::should_process(i, rate), i % k as u64 == 0);
            }
        }
    }

    #[test]
    fn test_sampler_counts_every_frame() {
        let mut sampler = FrameSampler::new(3).unwrap();

        let decisions: Vec<(u64, bool)> = (0..6).map(|_| sampler.next_frame()).collect();
        assert_eq!(
            decisions,
            vec![
                (1, false),
                (2, false),
                (3, true),
                (4, false),
                (5, false),
                (6, true)
            ]
        );
        assert_eq!(sampler.frame_counter(), 6);
    }

    #[test]
    fn test_zero_sample_rate_is_configuration_error() {
        assert!(matches!(
            FrameSampler::new(0),
            Err(MotionVisionError::Config(_))
        ));
    }

    #[test]
    fn test_timing_state_snapshot() {
        let mut gate = RateGate::new(secs(5.0), secs(10.0));
        let mut sampler = FrameSampler::new(1).unwrap();
        let t0 = Instant::now();

        sampler.next_frame();
        gate.record_motion(t0);

        let state = timing_state(&gate, &sampler);
        assert_eq!(state.frame_counter, 1);
        assert_eq!(state.last_motion_timestamp, Some(t0));
        assert_eq!(state.last_api_call_timestamp, None);
    }
}
