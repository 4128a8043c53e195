use std::time::{Duration, Instant};

use log::{debug, warn};

// A tick fired this fraction of a period late counts as late
const LOOP_SLOW_THRESHOLD: f64 = 0.3;
// Consecutive late ticks before the loop is reported as running slow
const LOOP_SLOW_COUNT: u32 = 10;
const MIN_PERIOD: Duration = Duration::from_millis(1);

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SchedulerConfig {
    /// Nominal time between two ticks
    pub period: Duration,
    /// Added to the next wait by `delay_tick()`
    pub delay: Duration,
    /// Removed from the next wait by `hurry_tick()`
    pub hurry: Duration,
    /// Overdue ticks replayed before the schedule is re-seated at `now`
    pub max_catch_up: u32,
}

/// Timing of a single tick handed to the step callback.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TickInfo {
    /// Scheduled time of this tick, measured from the first `start()`
    pub time: Duration,
    /// Scheduled time elapsed since the previous tick
    pub delta: Duration,
    /// Set on catch-up ticks that are followed by another overdue tick
    pub physics_only: bool,
}

/// Fixed-period tick source with one-shot timing nudges.
///
/// The scheduler does not own a thread or a callback. The owner polls it with
/// the current time and runs one step per returned `TickInfo`. Each deadline is
/// derived from the previous deadline rather than from the poll time, so late
/// polls do not accumulate into a slower step rate.
pub struct StepScheduler {
    config: SchedulerConfig,
    origin: Option<Instant>,
    next_deadline: Option<Instant>,
    last_tick: Option<Instant>,
    delay_requested: bool,
    hurry_requested: bool,
    late_ticks: u32,
    running_slow: bool,
}

impl StepScheduler {
    /// The period is raised to at least 1 ms and the hurry capped at half
    /// a period.
    pub fn new(mut config: SchedulerConfig) -> Self {
        config.period = config.period.max(MIN_PERIOD);
        let max_hurry = config.period / 2;
        if config.hurry > max_hurry {
            warn!(
                "hurry of {:?} exceeds half the {:?} period, capping at {:?}",
                config.hurry, config.period, max_hurry
            );
            config.hurry = max_hurry;
        }
        Self {
            config,
            origin: None,
            next_deadline: None,
            last_tick: None,
            delay_requested: false,
            hurry_requested: false,
            late_ticks: 0,
            running_slow: false,
        }
    }

    pub fn config(&self) -> &SchedulerConfig {
        &self.config
    }

    /// Begins ticking; the first tick is due one period after `now`.
    /// Calling `start()` on a running scheduler does nothing.
    pub fn start(&mut self, now: Instant) {
        if self.is_running() {
            return;
        }
        self.origin.get_or_insert(now);
        self.last_tick = Some(now);
        self.next_deadline = Some(now + self.config.period);
        self.late_ticks = 0;
    }

    /// Stops ticking. Pending nudges are discarded.
    pub fn stop(&mut self) {
        self.next_deadline = None;
        self.delay_requested = false;
        self.hurry_requested = false;
    }

    pub fn is_running(&self) -> bool {
        self.next_deadline.is_some()
    }

    /// Deadline of the next tick, including any pending nudge
    pub fn next_deadline(&self) -> Option<Instant> {
        self.next_deadline.map(|base| self.adjusted(base))
    }

    /// Lengthens the next wait by the configured delay. Repeated calls before
    /// the next tick have no further effect; returns whether this call did.
    pub fn delay_tick(&mut self) -> bool {
        if self.delay_requested {
            return false;
        }
        debug!("delaying next tick by {:?}", self.config.delay);
        self.delay_requested = true;
        true
    }

    /// Shortens the next wait by the configured hurry amount. Repeated calls
    /// before the next tick have no further effect; returns whether this call did.
    pub fn hurry_tick(&mut self) -> bool {
        if self.hurry_requested {
            return false;
        }
        debug!("hurrying next tick by {:?}", self.config.hurry);
        self.hurry_requested = true;
        true
    }

    /// Returns whether the loop was flagged as running slow since the last call
    pub fn take_running_slow(&mut self) -> bool {
        std::mem::replace(&mut self.running_slow, false)
    }

    /// Fires the next tick if it is due at `now`. Call repeatedly until it
    /// returns `None` to run every overdue tick.
    pub fn poll(&mut self, now: Instant) -> Option<TickInfo> {
        let deadline = self.adjusted(self.next_deadline?);
        if now < deadline {
            return None;
        }
        self.delay_requested = false;
        self.hurry_requested = false;

        let period = self.config.period;
        let behind = now.duration_since(deadline);
        let (fire_at, physics_only) = if behind > period * self.config.max_catch_up {
            warn!(
                "Scheduler fell {:?} behind, dropping missed steps and re-seating the schedule",
                behind
            );
            (now, false)
        } else {
            (deadline, behind >= period)
        };
        self.track_lateness(behind);

        let origin = *self.origin.get_or_insert(fire_at);
        let last_tick = self.last_tick.unwrap_or(fire_at);
        self.last_tick = Some(fire_at);
        self.next_deadline = Some(fire_at + period);

        Some(TickInfo {
            time: fire_at.saturating_duration_since(origin),
            delta: fire_at.saturating_duration_since(last_tick),
            physics_only,
        })
    }

    fn adjusted(&self, base: Instant) -> Instant {
        let mut deadline = base;
        if self.delay_requested {
            deadline += self.config.delay;
        }
        if self.hurry_requested {
            deadline = deadline.checked_sub(self.config.hurry).unwrap_or(deadline);
        }
        match self.last_tick {
            Some(last_tick) => deadline.max(last_tick),
            None => deadline,
        }
    }

    fn track_lateness(&mut self, behind: Duration) {
        if behind.as_secs_f64() > self.config.period.as_secs_f64() * LOOP_SLOW_THRESHOLD {
            self.late_ticks += 1;
        } else {
            self.late_ticks = 0;
        }
        if self.late_ticks >= LOOP_SLOW_COUNT {
            warn!("Scheduler is running slow");
            self.running_slow = true;
            self.late_ticks = 0;
        }
    }
}
