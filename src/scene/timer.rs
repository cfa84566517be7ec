//! Interval timers owned by a scene.
//!
//! Timers are checked once per simulation tick. A timer created with
//! [`Timer::new`] estimates elapsed time from the tick count and the tick
//! rate the engine measured over the last second, so it drifts when the
//! simulation runs slow and cannot fire before a rate has been measured.
//! [`Timer::wall_clock`] measures real elapsed time instead.

use std::sync::Arc;
use std::time::Instant;

use crate::engine::Engine;

use super::Scene;

/// Callback fired when a timer's interval elapses.
pub trait TimerTrigger: Send + Sync {
    fn on_triggered(&self, engine: &Engine, scene: &Scene);
}

impl<F> TimerTrigger for F
where
    F: Fn(&Engine, &Scene) + Send + Sync,
{
    fn on_triggered(&self, engine: &Engine, scene: &Scene) {
        self(engine, scene)
    }
}

#[derive(Debug, Clone, Copy)]
enum Clock {
    MeasuredTicks { ticks: u64 },
    WallClock { since: Option<Instant> },
}

#[derive(Clone)]
pub struct Timer {
    seconds: f64,
    clock: Clock,
    trigger: Arc<dyn TimerTrigger>,
}

impl Timer {
    /// Timer driven by the tick count and the measured tick rate.
    pub fn new<F>(seconds: f64, trigger: F) -> Self
    where
        F: Fn(&Engine, &Scene) + Send + Sync + 'static,
    {
        Self::with_trigger(seconds, Arc::new(trigger), Clock::MeasuredTicks { ticks: 0 })
    }

    /// Timer driven by real elapsed time, counted from the first tick it
    /// sees.
    pub fn wall_clock<F>(seconds: f64, trigger: F) -> Self
    where
        F: Fn(&Engine, &Scene) + Send + Sync + 'static,
    {
        Self::with_trigger(seconds, Arc::new(trigger), Clock::WallClock { since: None })
    }

    /// Tick-driven timer with a trigger object instead of a closure.
    pub fn from_trigger(seconds: f64, trigger: Arc<dyn TimerTrigger>) -> Self {
        Self::with_trigger(seconds, trigger, Clock::MeasuredTicks { ticks: 0 })
    }

    fn with_trigger(seconds: f64, trigger: Arc<dyn TimerTrigger>, clock: Clock) -> Self {
        Self {
            seconds,
            clock,
            trigger,
        }
    }

    pub fn seconds(&self) -> f64 {
        self.seconds
    }

    /// Advance by one tick. Returns the trigger when the interval has
    /// elapsed; the caller invokes it.
    pub(crate) fn tick(&mut self, measured_tps: u32) -> Option<Arc<dyn TimerTrigger>> {
        let fired = match &mut self.clock {
            Clock::MeasuredTicks { ticks } => {
                let elapsed = measured_tps > 0
                    && *ticks as f64 / f64::from(measured_tps) > self.seconds;
                if elapsed {
                    *ticks = 0;
                }
                *ticks += 1;
                elapsed
            }
            Clock::WallClock { since } => {
                let now = Instant::now();
                let start = *since.get_or_insert(now);
                let elapsed = now.duration_since(start).as_secs_f64() > self.seconds;
                if elapsed {
                    *since = Some(now);
                }
                elapsed
            }
        };
        fired.then(|| Arc::clone(&self.trigger))
    }
}

impl std::fmt::Debug for Timer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Timer")
            .field("seconds", &self.seconds)
            .field("clock", &self.clock)
            .finish_non_exhaustive()
    }
}
