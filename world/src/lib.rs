#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative world state management for the Gym Floor simulation.
//!
//! The world owns the static tile map, the equipment registry, the shared
//! pathfinding grid and the player. Player-driven mutations arrive as
//! [`Command`] values through [`apply`]; visitor controllers use the explicit
//! entry points on [`World`] so that every occupancy change is funnelled
//! through the obstacle cache invalidation.

mod chance;
mod collision;
mod equipment;
mod navigation;
mod stock;
mod tiles;

use std::time::Duration;

use gym_floor_core::{
    AgentKind, CellCoord, Chance, Command, EquipmentId, EquipmentKind, Event, HitboxSet,
    StockItem, VisitorId, WorldPoint,
};
use tracing::debug;

pub use chance::SeededChance;
pub use collision::CollisionOracle;
pub use equipment::{
    cleaning_duration, footprint_for, interaction_duration, Equipment, EquipmentRegistry,
    Footprint,
};
pub use navigation::PathfindingGrid;
pub use stock::StockLevels;
pub use tiles::{LayoutError, TileMap};

use stock::{DUMBBELL_CAPACITY, PAIR, PLATE_CAPACITY};

/// Landmarks of the floor that visitors and the spawner navigate by.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FloorLayout {
    /// Walkable tile just inside the entrance, used as the departure staging cell.
    pub entrance: CellCoord,
    /// Check-in queue slot next to the front desk; later slots extend west.
    pub queue_head: CellCoord,
    /// Off-map point where the first visitor of a batch appears.
    pub spawn_point: WorldPoint,
    /// Westward spacing between visitors spawned in the same batch.
    pub spawn_stagger: f32,
    /// Off-map point departing visitors walk to.
    pub exit_point: WorldPoint,
    /// Tile the player starts on.
    pub player_start: CellCoord,
}

impl Default for FloorLayout {
    fn default() -> Self {
        Self {
            entrance: CellCoord::new(0, 10),
            queue_head: CellCoord::new(8, 11),
            spawn_point: WorldPoint::new(-80.0, 168.0),
            spawn_stagger: 20.0,
            exit_point: WorldPoint::new(-80.0, 168.0),
            player_start: CellCoord::new(13, 14),
        }
    }
}

/// Converts the center position of a humanoid into its sprite's top-left.
#[must_use]
pub fn sprite_origin(center: WorldPoint) -> WorldPoint {
    center.offset(-8.0, -12.0)
}

/// The player character and what it carries.
#[derive(Clone, Debug, PartialEq)]
pub struct Player {
    position: WorldPoint,
    dumbbells: u32,
    plates: u32,
}

impl Player {
    /// Top-left corner of the player's sprite box.
    #[must_use]
    pub const fn position(&self) -> WorldPoint {
        self.position
    }

    /// Dumbbells in the player's hands.
    #[must_use]
    pub const fn dumbbells(&self) -> u32 {
        self.dumbbells
    }

    /// Plates in the player's hands.
    #[must_use]
    pub const fn plates(&self) -> u32 {
        self.plates
    }

    fn held(&self, item: StockItem) -> u32 {
        match item {
            StockItem::Dumbbell => self.dumbbells,
            StockItem::Plate => self.plates,
        }
    }

    fn held_mut(&mut self, item: StockItem) -> &mut u32 {
        match item {
            StockItem::Dumbbell => &mut self.dumbbells,
            StockItem::Plate => &mut self.plates,
        }
    }
}

/// Represents the authoritative gym floor.
#[derive(Debug)]
pub struct World {
    tiles: TileMap,
    equipment: EquipmentRegistry,
    pathfinding: PathfindingGrid,
    layout: FloorLayout,
    player: Player,
    chance: Box<dyn Chance>,
    elapsed: Duration,
}

impl World {
    /// Creates a world from a tile map, placing one piece of equipment per
    /// object anchor.
    #[must_use]
    pub fn new(tiles: TileMap, chance: Box<dyn Chance>) -> Self {
        let equipment = EquipmentRegistry::from_objects(tiles.objects());
        let pathfinding = PathfindingGrid::new(tiles.columns(), tiles.rows());
        let layout = FloorLayout::default();
        debug!(
            columns = tiles.columns(),
            rows = tiles.rows(),
            equipment = equipment.iter().count(),
            "world created"
        );
        Self {
            player: Player {
                position: sprite_origin(layout.player_start.center()),
                dumbbells: 0,
                plates: 0,
            },
            tiles,
            equipment,
            pathfinding,
            layout,
            chance,
            elapsed: Duration::ZERO,
        }
    }

    /// Replaces the floor landmarks.
    #[must_use]
    pub fn with_layout(mut self, layout: FloorLayout) -> Self {
        self.player.position = sprite_origin(layout.player_start.center());
        self.layout = layout;
        self
    }

    /// Places equipment on the floor after setup.
    pub fn add_equipment(&mut self, cell: CellCoord, kind: EquipmentKind) -> EquipmentId {
        self.pathfinding.mark_dirty();
        self.equipment.add_equipment(cell, kind)
    }

    /// Removes equipment from the floor.
    pub fn remove_equipment(&mut self, id: EquipmentId) -> bool {
        let removed = self.equipment.remove_equipment(id).is_some();
        if removed {
            self.pathfinding.mark_dirty();
        }
        removed
    }

    /// Claims equipment for a visitor. See [`EquipmentRegistry::start_interaction`].
    pub fn start_interaction(
        &mut self,
        id: EquipmentId,
        visitor: VisitorId,
        out_events: &mut Vec<Event>,
    ) -> bool {
        let started = self.equipment.start_interaction(id, visitor, out_events);
        if started {
            self.pathfinding.mark_dirty();
        }
        started
    }

    /// Starts a cleaning cycle on dirty equipment.
    pub fn start_cleaning(&mut self, id: EquipmentId, out_events: &mut Vec<Event>) -> bool {
        self.equipment.start_cleaning(id, out_events)
    }

    /// Finds a path between two world points over the shared grid.
    pub fn find_path(
        &mut self,
        start: WorldPoint,
        goal: WorldPoint,
        allow_diagonal: bool,
    ) -> Option<Vec<CellCoord>> {
        self.pathfinding
            .find_path(&self.tiles, &self.equipment, start, goal, allow_diagonal)
    }

    /// Finds a path to a walkable tile around a piece of equipment.
    pub fn find_path_near(
        &mut self,
        start: WorldPoint,
        target: EquipmentId,
        allow_diagonal: bool,
        radius: u32,
    ) -> Option<Vec<CellCoord>> {
        let rect = self.equipment.get(target)?.collision_rect();
        self.pathfinding.find_path_near(
            &self.tiles,
            &self.equipment,
            start,
            rect,
            allow_diagonal,
            radius,
        )
    }

    /// Walkable cell at or closest to `point`, searching `radius` rings.
    pub fn nearest_walkable(&mut self, point: WorldPoint, radius: u32) -> Option<CellCoord> {
        self.pathfinding
            .nearest_walkable(&self.tiles, &self.equipment, point, radius)
    }

    /// Forces the obstacle cache to be recomputed on the next query.
    pub fn mark_dirty(&mut self) {
        self.pathfinding.mark_dirty();
    }

    /// Rebuilds the obstacle cache now if it is stale.
    pub fn rebuild_if_dirty(&mut self) -> bool {
        self.pathfinding.rebuild_if_dirty(&self.tiles, &self.equipment)
    }

    /// Reports whether a sprite with its top-left at `origin` fits.
    #[must_use]
    pub fn can_occupy(&self, origin: WorldPoint, hitboxes: &HitboxSet, agent: AgentKind) -> bool {
        CollisionOracle::new(&self.tiles, &self.equipment).can_occupy(origin, hitboxes, agent)
    }

    /// Randomness shared by the world and its systems.
    pub fn chance_mut(&mut self) -> &mut dyn Chance {
        self.chance.as_mut()
    }

    fn move_player(&mut self, dx: f32, dy: f32, out_events: &mut Vec<Event>) {
        let start = self.player.position;
        let mut position = start;
        for (step_x, step_y) in [(dx, 0.0), (0.0, dy)] {
            if step_x == 0.0 && step_y == 0.0 {
                continue;
            }
            let candidate = position.offset(step_x, step_y);
            if self.can_occupy(candidate, &HitboxSet::HUMANOID, AgentKind::Player) {
                position = candidate;
            }
        }
        if position != start {
            self.player.position = position;
            out_events.push(Event::PlayerMoved { position });
        }
    }

    fn pick_up(&mut self, id: EquipmentId, item: StockItem, out_events: &mut Vec<Event>) {
        let capacity = hand_capacity(item);
        let room = capacity.saturating_sub(self.player.held(item));
        let taken = self.equipment.pick_up(id, item, PAIR.min(room), out_events);
        if taken > 0 {
            *self.player.held_mut(item) += taken;
            self.pathfinding.mark_dirty();
        }
    }

    fn put_back(&mut self, id: EquipmentId, item: StockItem, out_events: &mut Vec<Event>) {
        let batch = match item {
            StockItem::Dumbbell => DUMBBELL_CAPACITY,
            StockItem::Plate => PAIR,
        };
        let offered = self.player.held(item).min(batch);
        if offered == 0 {
            return;
        }
        let accepted = self.equipment.restock(id, item, offered, out_events);
        if accepted > 0 {
            *self.player.held_mut(item) -= accepted;
            self.pathfinding.mark_dirty();
        }
    }
}

fn hand_capacity(item: StockItem) -> u32 {
    match item {
        StockItem::Dumbbell => DUMBBELL_CAPACITY,
        StockItem::Plate => PLATE_CAPACITY,
    }
}

/// Applies the provided command to the world, mutating state deterministically.
pub fn apply(world: &mut World, command: Command, out_events: &mut Vec<Event>) {
    match command {
        Command::Tick { dt } => {
            world.elapsed = world.elapsed.saturating_add(dt);
            out_events.push(Event::TimeAdvanced { dt });
            if world
                .equipment
                .update(dt, world.chance.as_mut(), out_events)
            {
                world.pathfinding.mark_dirty();
            }
        }
        Command::MovePlayer { dx, dy } => world.move_player(dx, dy, out_events),
        Command::PickUpFloorDumbbells { equipment } => {
            world.pick_up(equipment, StockItem::Dumbbell, out_events);
        }
        Command::ReturnDumbbells { equipment } => {
            world.put_back(equipment, StockItem::Dumbbell, out_events);
        }
        Command::PickUpFloorPlates { equipment } => {
            world.pick_up(equipment, StockItem::Plate, out_events);
        }
        Command::ReturnPlates { equipment } => {
            world.put_back(equipment, StockItem::Plate, out_events);
        }
        Command::TurnOffTreadmill { equipment } => {
            let _ = world.equipment.turn_off(equipment, out_events);
        }
        Command::CleanEquipment { equipment } => {
            let _ = world.equipment.start_cleaning(equipment, out_events);
        }
        Command::SetWall { cell, blocked } => {
            if world.tiles.set_wall(cell, blocked) {
                world.pathfinding.mark_dirty();
            }
        }
    }
}

/// Query functions that provide read-only access to the world state.
pub mod query {
    use std::time::Duration;

    use gym_floor_core::{EquipmentId, StockItem};

    use super::{
        CollisionOracle, Equipment, EquipmentRegistry, FloorLayout, PathfindingGrid, Player,
        TileMap, World,
    };

    /// Provides read-only access to the static tile map.
    #[must_use]
    pub fn tiles(world: &World) -> &TileMap {
        &world.tiles
    }

    /// Provides read-only access to the equipment registry.
    #[must_use]
    pub fn equipment(world: &World) -> &EquipmentRegistry {
        &world.equipment
    }

    /// Looks a piece of equipment up by identifier.
    #[must_use]
    pub fn equipment_by_id(world: &World, id: EquipmentId) -> Option<&Equipment> {
        world.equipment.get(id)
    }

    /// Provides read-only access to the shared pathfinding grid.
    #[must_use]
    pub fn pathfinding(world: &World) -> &PathfindingGrid {
        &world.pathfinding
    }

    /// Floor landmarks.
    #[must_use]
    pub fn layout(world: &World) -> &FloorLayout {
        &world.layout
    }

    /// The player character.
    #[must_use]
    pub fn player(world: &World) -> &Player {
        &world.player
    }

    /// Simulated time the world has advanced through.
    #[must_use]
    pub fn elapsed(world: &World) -> Duration {
        world.elapsed
    }

    /// Collision oracle over the current floor.
    #[must_use]
    pub fn collision_oracle(world: &World) -> CollisionOracle<'_> {
        CollisionOracle::new(&world.tiles, &world.equipment)
    }

    /// Units of a consumable across every rack, floor pile, borrower and the
    /// player's hands.
    #[must_use]
    pub fn stock_total(world: &World, item: StockItem) -> u32 {
        world.equipment.stock_total(item) + world.player.held(item)
    }
}
