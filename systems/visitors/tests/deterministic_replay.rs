use std::{
    collections::hash_map::DefaultHasher,
    hash::{Hash, Hasher},
    time::Duration,
};

use gym_floor_core::{Arrival, Command, Event, Odds, VisitorId, WorldPoint};
use gym_floor_system_visitors::{Activity, Config, Visitor, Visitors};
use gym_floor_world::{self as world, SeededChance, TileMap, World};

#[test]
fn deterministic_replay_produces_identical_runs() {
    let first = replay(11, scripted_arrivals());
    let second = replay(11, scripted_arrivals());

    assert_eq!(first, second, "replay diverged between runs");
    assert_eq!(first.fingerprint(), second.fingerprint());
    assert!(
        first.events.iter().any(|event| event.starts_with("VisitorCheckedIn")),
        "nobody checked in"
    );
}

#[test]
fn every_arrival_is_announced_once() {
    let outcome = replay(3, scripted_arrivals());
    let arrived = outcome
        .events
        .iter()
        .filter(|event| event.starts_with("VisitorArrived"))
        .count();
    assert_eq!(arrived, scripted_arrivals().len());
}

fn replay(seed: u64, arrivals: Vec<(usize, Arrival)>) -> ReplayOutcome {
    let tiles = TileMap::gym().expect("built-in layout");
    let mut world = World::new(tiles, Box::new(SeededChance::new(seed, Odds::default())));
    let mut visitors = Visitors::new(Config::default());
    let mut log = Vec::new();
    let dt = Duration::from_millis(100);

    for frame in 0..2_400 {
        let due: Vec<Arrival> = arrivals
            .iter()
            .filter(|(at, _)| *at == frame)
            .map(|(_, arrival)| *arrival)
            .collect();
        let mut events = Vec::new();
        if !due.is_empty() {
            visitors.admit(&due, &mut events);
        }

        world::apply(&mut world, Command::Tick { dt }, &mut events);
        let world_events = events.clone();
        visitors.handle(&world_events, &mut world, &mut events);
        record_events(&events, &mut log);
    }

    let visitors = visitors.iter().map(VisitorState::from).collect();
    ReplayOutcome {
        visitors,
        events: log,
    }
}

fn record_events(events: &[Event], log: &mut Vec<String>) {
    log.extend(events.iter().map(|event| format!("{event:?}")));
}

fn scripted_arrivals() -> Vec<(usize, Arrival)> {
    let batch = |frame: usize, first: u32, count: u32| {
        (0..count).map(move |offset| {
            let id = first + offset;
            (
                frame,
                Arrival {
                    visitor: VisitorId::new(id),
                    position: WorldPoint::new(-80.0 - offset as f32 * 20.0, 168.0),
                    arrived_at: Duration::from_millis(frame as u64 * 100),
                    queue_position: id,
                    preferred: None,
                },
            )
        })
    };
    batch(0, 0, 2).chain(batch(200, 2, 3)).collect()
}

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
struct ReplayOutcome {
    visitors: Vec<VisitorState>,
    events: Vec<String>,
}

impl ReplayOutcome {
    fn fingerprint(&self) -> u64 {
        let mut hasher = DefaultHasher::new();
        self.hash(&mut hasher);
        hasher.finish()
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
struct VisitorState {
    id: VisitorId,
    x: i32,
    y: i32,
    activity: Activity,
    checked_in: bool,
}

impl From<&Visitor> for VisitorState {
    fn from(visitor: &Visitor) -> Self {
        let position = visitor.position();
        Self {
            id: visitor.id(),
            x: position.x().round() as i32,
            y: position.y().round() as i32,
            activity: visitor.activity(),
            checked_in: visitor.is_checked_in(),
        }
    }
}
