//! Headless loop wiring the spawner, the visitor roster and the world.

use std::{fmt, time::Duration};

use anyhow::{Context, Result};
use gym_floor_core::{Command, Event, StockItem};
use gym_floor_system_spawning::{self as spawning, WaveSpawner};
use gym_floor_system_visitors::{self as visitors, Visitors};
use gym_floor_world::{self as world, query, FloorLayout, SeededChance, World};
use tracing::info;

use crate::config::SimulationConfig;

/// Owns every piece of simulation state and advances it one tick at a time.
#[derive(Debug)]
pub(crate) struct Simulation {
    world: World,
    visitors: Visitors,
    spawner: WaveSpawner,
    tick: Duration,
    summary: Summary,
}

impl Simulation {
    pub(crate) fn new(config: &SimulationConfig) -> Result<Self> {
        let tiles = config.tiles()?;
        let layout = FloorLayout::default();
        let world = World::new(tiles, Box::new(SeededChance::new(config.seed, config.odds)))
            .with_layout(layout);
        let visitors = Visitors::new(visitors::Config::new(config.timings, layout));
        let spawning = spawning::Config::validated(
            config.schedule.clone(),
            layout.spawn_point,
            layout.spawn_stagger,
        )
        .context("invalid wave schedule")?;

        Ok(Self {
            world,
            visitors,
            spawner: WaveSpawner::new(spawning),
            tick: config.tick(),
            summary: Summary::default(),
        })
    }

    /// Advances every system by one fixed tick.
    pub(crate) fn step(&mut self) {
        let mut events = Vec::new();
        world::apply(&mut self.world, Command::Tick { dt: self.tick }, &mut events);

        let mut arrivals = Vec::new();
        self.spawner.handle(
            &events,
            self.visitors.len(),
            self.visitors.queued(),
            self.world.chance_mut(),
            &mut arrivals,
        );
        self.visitors.admit(&arrivals, &mut events);

        let world_events = events.clone();
        self.visitors
            .handle(&world_events, &mut self.world, &mut events);
        self.summary.record(&events);
    }

    /// Runs the requested number of ticks and reports what happened.
    pub(crate) fn run(mut self, ticks: u64) -> Summary {
        for _ in 0..ticks {
            self.step();
        }
        info!(
            time = %self.spawner.clock(),
            remaining = self.visitors.len(),
            "simulation finished"
        );
        self.summary.finish(&self.world, self.visitors.len())
    }
}

/// Tallies of one run.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub(crate) struct Summary {
    pub(crate) arrivals: u32,
    pub(crate) check_ins: u32,
    pub(crate) departures: u32,
    pub(crate) timed_out: u32,
    pub(crate) interactions: u32,
    pub(crate) rejected: u32,
    pub(crate) cleanings: u32,
    pub(crate) remaining: usize,
    pub(crate) dirty_left: usize,
    pub(crate) treadmills_running: usize,
    pub(crate) dumbbells_on_floor: u32,
    pub(crate) plates_on_floor: u32,
}

impl Summary {
    fn record(&mut self, events: &[Event]) {
        for event in events {
            match event {
                Event::VisitorArrived { .. } => self.arrivals += 1,
                Event::VisitorCheckedIn { .. } => self.check_ins += 1,
                Event::VisitorLeft { timed_out, .. } => {
                    self.departures += 1;
                    if *timed_out {
                        self.timed_out += 1;
                    }
                }
                Event::InteractionStarted { .. } => self.interactions += 1,
                Event::InteractionRejected { .. } => self.rejected += 1,
                Event::CleaningFinished { .. } => self.cleanings += 1,
                _ => {}
            }
        }
    }

    fn finish(mut self, world: &World, remaining: usize) -> Self {
        let equipment = query::equipment(world);
        self.remaining = remaining;
        self.dirty_left = equipment.iter().filter(|item| item.is_dirty()).count();
        self.treadmills_running = equipment
            .iter()
            .filter(|item| item.is_left_running())
            .count();
        for levels in equipment.iter().filter_map(|item| item.stock()) {
            match levels.item {
                StockItem::Dumbbell => self.dumbbells_on_floor += levels.floor,
                StockItem::Plate => self.plates_on_floor += levels.floor,
            }
        }
        self
    }
}

impl fmt::Display for Summary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "arrivals:            {}", self.arrivals)?;
        writeln!(f, "check-ins:           {}", self.check_ins)?;
        writeln!(
            f,
            "departures:          {} ({} timed out)",
            self.departures, self.timed_out
        )?;
        writeln!(f, "still on the floor:  {}", self.remaining)?;
        writeln!(
            f,
            "interactions:        {} ({} rejected)",
            self.interactions, self.rejected
        )?;
        writeln!(f, "cleanings:           {}", self.cleanings)?;
        writeln!(f, "dirty equipment:     {}", self.dirty_left)?;
        writeln!(f, "treadmills running:  {}", self.treadmills_running)?;
        writeln!(f, "dumbbells on floor:  {}", self.dumbbells_on_floor)?;
        write!(f, "plates on floor:     {}", self.plates_on_floor)
    }
}
