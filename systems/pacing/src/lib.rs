#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Deterministic pacing system that turns elapsed time into traversal steps.

use std::time::Duration;

use slide_grid_core::{Command, Event};

/// Time spent tweening between cells plus the pause before the next step.
pub const DEFAULT_STEP_INTERVAL: Duration = Duration::from_millis(600);

/// Configuration parameters required to construct the pacing system.
#[derive(Clone, Copy, Debug)]
pub struct Config {
    step_interval: Duration,
}

impl Config {
    /// Creates a new configuration using the provided step cadence.
    #[must_use]
    pub const fn new(step_interval: Duration) -> Self {
        Self { step_interval }
    }

    /// Simulated time that must elapse between consecutive steps.
    #[must_use]
    pub const fn step_interval(&self) -> Duration {
        self.step_interval
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new(DEFAULT_STEP_INTERVAL)
    }
}

/// Pure system that emits step commands while a traversal is running.
#[derive(Debug)]
pub struct Pacing {
    step_interval: Duration,
    accumulator: Duration,
    running: bool,
}

impl Pacing {
    /// Creates a new pacing system using the supplied configuration.
    #[must_use]
    pub fn new(config: Config) -> Self {
        Self {
            step_interval: config.step_interval,
            accumulator: Duration::ZERO,
            running: false,
        }
    }

    /// Reports whether the system believes a traversal is in flight.
    #[must_use]
    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Consumes world events and emits one step command per elapsed interval.
    pub fn handle(&mut self, events: &[Event], out: &mut Vec<Command>) {
        for event in events {
            match event {
                Event::TraversalStarted { .. } => {
                    self.running = true;
                    self.accumulator = Duration::ZERO;
                }
                Event::TraversalStopped
                | Event::TraversalSucceeded { .. }
                | Event::TraversalFailed { .. } => {
                    self.running = false;
                    self.accumulator = Duration::ZERO;
                }
                Event::TimeAdvanced { dt } if self.running => {
                    self.accumulator = self.accumulator.saturating_add(*dt);
                }
                _ => {}
            }
        }

        for _ in 0..self.resolve_step_attempts() {
            out.push(Command::Step);
        }
    }

    fn resolve_step_attempts(&mut self) -> usize {
        if self.step_interval.is_zero() || !self.running {
            return 0;
        }

        let mut attempts = 0;
        while self.accumulator >= self.step_interval {
            self.accumulator -= self.step_interval;
            attempts += 1;
        }
        attempts
    }
}
