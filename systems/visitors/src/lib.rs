#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Visitor behavior system driving every autonomous gym visitor.
//!
//! Each visitor walks to the check-in queue, checks in at the front desk,
//! then alternates between workout stations until its stay runs out and it
//! walks back out through the entrance. Visitors that leave a bench dirty may
//! fetch supplies from a trashcan and wipe it down themselves. The roster
//! reacts to [`Event::TimeAdvanced`] and mutates the world exclusively
//! through its visitor-facing entry points.

mod selection;
mod visitor;

use std::time::Duration;

use gym_floor_core::{Arrival, Event, Timings, VisitorId};
use gym_floor_world::{FloorLayout, World};
use tracing::{debug, info};

pub use selection::standing_point;
pub use visitor::{queue_slot, Activity, CleaningPhase, Visitor};

use visitor::{Context, Outcome};

/// Configuration parameters for the visitor system.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Config {
    timings: Timings,
    layout: FloorLayout,
}

impl Config {
    /// Creates a new configuration from behavior timings and floor landmarks.
    #[must_use]
    pub const fn new(timings: Timings, layout: FloorLayout) -> Self {
        Self { timings, layout }
    }

    /// Behavior timings.
    #[must_use]
    pub const fn timings(&self) -> &Timings {
        &self.timings
    }

    /// Floor landmarks.
    #[must_use]
    pub const fn layout(&self) -> &FloorLayout {
        &self.layout
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new(Timings::default(), FloorLayout::default())
    }
}

/// Roster of every visitor currently in the simulation.
#[derive(Debug)]
pub struct Visitors {
    config: Config,
    visitors: Vec<Visitor>,
    now: Duration,
}

impl Visitors {
    /// Creates an empty roster.
    #[must_use]
    pub fn new(config: Config) -> Self {
        Self {
            config,
            visitors: Vec::new(),
            now: Duration::ZERO,
        }
    }

    /// Configuration the roster runs with.
    #[must_use]
    pub const fn config(&self) -> &Config {
        &self.config
    }

    /// Adds freshly spawned visitors to the end of the check-in queue.
    pub fn admit(&mut self, arrivals: &[Arrival], out_events: &mut Vec<Event>) {
        for arrival in arrivals {
            // keep queue slots contiguous whatever the spawner asked for
            let position = arrival.queue_position.min(self.queued());
            let visitor = Visitor::new(
                arrival.visitor,
                arrival.position,
                arrival.arrived_at,
                position,
                arrival.preferred,
                self.config.timings.behavior_interval(),
            );
            info!(
                visitor = arrival.visitor.get(),
                queue_position = position,
                preferred = ?arrival.preferred,
                "visitor arrived"
            );
            out_events.push(Event::VisitorArrived {
                visitor: arrival.visitor,
            });
            self.visitors.push(visitor);
        }
    }

    /// Advances every visitor by the time reported in `events`.
    pub fn handle(&mut self, events: &[Event], world: &mut World, out_events: &mut Vec<Event>) {
        let dt = events
            .iter()
            .filter_map(|event| match event {
                Event::TimeAdvanced { dt } => Some(*dt),
                _ => None,
            })
            .fold(Duration::ZERO, Duration::saturating_add);
        if dt.is_zero() {
            return;
        }
        self.now = self.now.saturating_add(dt);

        for index in 0..self.visitors.len() {
            let mut ctx = Context {
                world: &mut *world,
                config: &self.config,
                now: self.now,
                events: &mut *out_events,
            };
            let outcome = self.visitors[index].update(&mut ctx, dt);
            self.settle(index, outcome, world, out_events);
        }

        self.reap();
    }

    /// Completes check-in for a visitor wherever it stands in the queue.
    ///
    /// Returns `false` when the visitor is unknown, already checked in or
    /// leaving.
    pub fn check_in(
        &mut self,
        id: VisitorId,
        world: &mut World,
        out_events: &mut Vec<Event>,
    ) -> bool {
        let Some(index) = self.visitors.iter().position(|visitor| visitor.id() == id) else {
            return false;
        };
        let mut outcome = Outcome::default();
        let mut ctx = Context {
            world: &mut *world,
            config: &self.config,
            now: self.now,
            events: &mut *out_events,
        };
        let checked_in = self.visitors[index].check_in(&mut ctx, &mut outcome);
        self.settle(index, outcome, world, out_events);
        checked_in
    }

    /// Number of visitors in the simulation.
    #[must_use]
    pub fn len(&self) -> usize {
        self.visitors.len()
    }

    /// Reports whether the gym floor is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.visitors.is_empty()
    }

    /// Number of visitors waiting in the check-in queue.
    #[must_use]
    pub fn queued(&self) -> u32 {
        let queued = self
            .visitors
            .iter()
            .filter(|visitor| visitor.queue_position().is_some())
            .count();
        u32::try_from(queued).unwrap_or(u32::MAX)
    }

    /// Looks a visitor up by identifier.
    #[must_use]
    pub fn get(&self, id: VisitorId) -> Option<&Visitor> {
        self.visitors.iter().find(|visitor| visitor.id() == id)
    }

    /// Visitors in arrival order.
    pub fn iter(&self) -> impl Iterator<Item = &Visitor> {
        self.visitors.iter()
    }

    /// Simulated time the roster has advanced through.
    #[must_use]
    pub const fn now(&self) -> Duration {
        self.now
    }

    fn settle(
        &mut self,
        index: usize,
        outcome: Outcome,
        world: &mut World,
        out_events: &mut Vec<Event>,
    ) {
        let Some(slot) = outcome.left_queue else {
            return;
        };
        debug!(slot, "check-in queue moves up");
        for (other, visitor) in self.visitors.iter_mut().enumerate() {
            if other == index {
                continue;
            }
            let Some(position) = visitor.queue_position() else {
                continue;
            };
            if position <= slot {
                continue;
            }
            visitor.set_queue_position(position - 1);
            let mut ctx = Context {
                world: &mut *world,
                config: &self.config,
                now: self.now,
                events: &mut *out_events,
            };
            visitor.requeue(&mut ctx);
        }
    }

    fn reap(&mut self) {
        self.visitors.retain(|visitor| !visitor.is_ready_to_remove());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gym_floor_core::{Chance, Roll, WorldPoint};
    use gym_floor_world::TileMap;

    #[derive(Debug)]
    struct Never;

    impl Chance for Never {
        fn roll(&mut self, _roll: Roll) -> bool {
            false
        }

        fn pick(&mut self, _len: usize) -> usize {
            0
        }

        fn between(&mut self, low: u32, _high: u32) -> u32 {
            low
        }
    }

    fn arrival(id: u32, queue_position: u32) -> Arrival {
        Arrival {
            visitor: VisitorId::new(id),
            position: WorldPoint::new(24.0, 172.0),
            arrived_at: Duration::ZERO,
            queue_position,
            preferred: None,
        }
    }

    #[test]
    fn admitted_queue_positions_stay_contiguous() {
        let mut visitors = Visitors::new(Config::default());
        let mut events = Vec::new();
        visitors.admit(&[arrival(1, 0), arrival(2, 7), arrival(3, 9)], &mut events);

        let positions: Vec<_> = visitors.iter().map(Visitor::queue_position).collect();
        assert_eq!(positions, vec![Some(0), Some(1), Some(2)]);
        assert_eq!(visitors.queued(), 3);
        assert_eq!(events.len(), 3);
    }

    #[test]
    fn forced_check_in_moves_the_queue_up() {
        let mut world = World::new(TileMap::gym().expect("layout"), Box::new(Never));
        let mut visitors = Visitors::new(Config::default());
        let mut events = Vec::new();
        visitors.admit(&[arrival(1, 0), arrival(2, 1), arrival(3, 2)], &mut events);

        assert!(visitors.check_in(VisitorId::new(1), &mut world, &mut events));
        assert!(!visitors.check_in(VisitorId::new(1), &mut world, &mut events));
        assert!(events.contains(&Event::VisitorCheckedIn {
            visitor: VisitorId::new(1)
        }));

        let positions: Vec<_> = visitors.iter().map(Visitor::queue_position).collect();
        assert_eq!(positions, vec![None, Some(0), Some(1)]);
    }

    #[test]
    fn events_without_time_leave_the_roster_untouched() {
        let mut world = World::new(TileMap::gym().expect("layout"), Box::new(Never));
        let mut visitors = Visitors::new(Config::default());
        let mut events = Vec::new();
        visitors.admit(&[arrival(1, 0)], &mut events);
        let before: Vec<_> = visitors.iter().cloned().collect();

        visitors.handle(&[], &mut world, &mut events);
        assert_eq!(visitors.iter().cloned().collect::<Vec<_>>(), before);
        assert_eq!(visitors.now(), Duration::ZERO);
    }
}
