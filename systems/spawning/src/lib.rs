#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Deterministic spawning system deciding when visitors walk into the gym.
//!
//! The spawner keeps the in-game clock, follows the daily [`WaveSchedule`]
//! and emits [`Arrival`] values that the visitor roster admits. Identifiers
//! are allocated monotonically so a replay with the same seed produces the
//! same visitors.

mod clock;
mod schedule;

use std::time::Duration;

use gym_floor_core::{Arrival, Chance, Event, Roll, StationType, VisitorId, WorldPoint};
use tracing::{debug, info};

pub use clock::GameClock;
pub use schedule::{ArrivalRange, ScheduleError, Traffic, WaveSchedule, Window};

/// Configuration parameters required to construct the spawning system.
#[derive(Clone, Debug, PartialEq)]
pub struct Config {
    schedule: WaveSchedule,
    spawn_point: WorldPoint,
    spawn_stagger: f32,
}

impl Config {
    /// Creates a new configuration using the provided schedule and off-map
    /// spawn point. Visitors of one wave line up `spawn_stagger` pixels apart
    /// towards the west.
    #[must_use]
    pub const fn new(schedule: WaveSchedule, spawn_point: WorldPoint, spawn_stagger: f32) -> Self {
        Self {
            schedule,
            spawn_point,
            spawn_stagger,
        }
    }

    /// Validates the schedule and builds the configuration.
    pub fn validated(
        schedule: WaveSchedule,
        spawn_point: WorldPoint,
        spawn_stagger: f32,
    ) -> Result<Self, ScheduleError> {
        schedule.validate()?;
        Ok(Self::new(schedule, spawn_point, spawn_stagger))
    }

    /// Daily arrival schedule.
    #[must_use]
    pub const fn schedule(&self) -> &WaveSchedule {
        &self.schedule
    }
}

/// Pure system that emits arrivals according to the time of day.
#[derive(Debug)]
pub struct WaveSpawner {
    config: Config,
    clock: GameClock,
    traffic: Traffic,
    accumulator: Duration,
    next_id: u32,
}

impl WaveSpawner {
    /// Creates a new spawner using the supplied configuration.
    #[must_use]
    pub fn new(config: Config) -> Self {
        let clock = GameClock::new();
        let traffic = config.schedule.traffic(clock.hour());
        Self {
            config,
            clock,
            traffic,
            accumulator: Duration::ZERO,
            next_id: 0,
        }
    }

    /// In-game clock driven by the spawner.
    #[must_use]
    pub const fn clock(&self) -> &GameClock {
        &self.clock
    }

    /// Traffic of the current hour.
    #[must_use]
    pub const fn traffic(&self) -> Traffic {
        self.traffic
    }

    /// Number of visitors created so far.
    #[must_use]
    pub const fn spawned(&self) -> u32 {
        self.next_id
    }

    /// Consumes events and the roster's population figures to emit arrivals.
    ///
    /// `active` counts every visitor on the floor and `queued` those waiting
    /// to check in; new arrivals join the queue behind them.
    pub fn handle(
        &mut self,
        events: &[Event],
        active: usize,
        queued: u32,
        chance: &mut dyn Chance,
        out: &mut Vec<Arrival>,
    ) {
        let mut accumulated = Duration::ZERO;
        for event in events {
            if let Event::TimeAdvanced { dt } = event {
                accumulated = accumulated.saturating_add(*dt);
            }
        }

        if accumulated.is_zero() {
            return;
        }

        self.clock.advance(accumulated);
        self.update_traffic();

        let schedule = &self.config.schedule;
        if !self.clock.is_open(schedule.opening_hour, schedule.closing_hour) {
            self.accumulator = Duration::ZERO;
            return;
        }
        let (Some(interval), Some(range)) = (
            schedule.interval(self.traffic),
            schedule.arrivals(self.traffic),
        ) else {
            self.accumulator = Duration::ZERO;
            return;
        };

        let cap = usize::try_from(schedule.population_cap).unwrap_or(usize::MAX);

        self.accumulator = self.accumulator.saturating_add(accumulated);
        let attempts = self.resolve_spawn_attempts(interval);
        let mut active = active;
        let mut queued = queued;

        for _ in 0..attempts {
            if active >= cap {
                debug!(active, cap, "population cap reached");
                continue;
            }
            if self.traffic == Traffic::OffPeak && !chance.roll(Roll::OffPeakArrival) {
                debug!("off-peak check admitted nobody");
                continue;
            }

            let wanted = chance.between(range.min, range.max);
            let room = u32::try_from(cap - active).unwrap_or(u32::MAX);
            let count = wanted.min(room);
            for index in 0..count {
                out.push(self.arrival(index, queued + index, chance));
            }
            active += count as usize;
            queued += count;
            info!(count, time = %self.clock, traffic = ?self.traffic, "visitors arriving");
        }
    }

    fn update_traffic(&mut self) {
        let traffic = self.config.schedule.traffic(self.clock.hour());
        if traffic != self.traffic {
            info!(time = %self.clock, from = ?self.traffic, to = ?traffic, "traffic changed");
            self.traffic = traffic;
            self.accumulator = Duration::ZERO;
        }
    }

    fn resolve_spawn_attempts(&mut self, interval: Duration) -> usize {
        if interval.is_zero() {
            return 0;
        }

        let mut attempts = 0;
        while self.accumulator >= interval {
            self.accumulator -= interval;
            attempts += 1;
        }
        attempts
    }

    fn arrival(&mut self, index: u32, queue_position: u32, chance: &mut dyn Chance) -> Arrival {
        let visitor = VisitorId::new(self.next_id);
        self.next_id = self.next_id.wrapping_add(1);
        let preferred = chance
            .roll(Roll::PrefersStation)
            .then(|| StationType::ALL[chance.pick(StationType::ALL.len())]);
        Arrival {
            visitor,
            position: self
                .config
                .spawn_point
                .offset(-(index as f32) * self.config.spawn_stagger, 0.0),
            arrived_at: self.clock.elapsed(),
            queue_position,
            preferred,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolves_spawn_attempts_without_interval() {
        let config = Config::new(WaveSchedule::default(), WorldPoint::new(-80.0, 168.0), 20.0);
        let mut spawner = WaveSpawner::new(config);
        spawner.accumulator = Duration::from_secs(10);
        assert_eq!(spawner.resolve_spawn_attempts(Duration::ZERO), 0);
        assert_eq!(spawner.resolve_spawn_attempts(Duration::from_secs(3)), 3);
        assert_eq!(spawner.accumulator, Duration::from_secs(1));
    }

    #[test]
    fn opens_in_peak_traffic() {
        let config = Config::new(WaveSchedule::default(), WorldPoint::new(-80.0, 168.0), 20.0);
        let spawner = WaveSpawner::new(config);
        assert_eq!(spawner.traffic(), Traffic::Peak);
        assert_eq!(spawner.clock().label(), "05:00 AM");
    }
}
