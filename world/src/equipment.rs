//! Authoritative equipment state: occupancy, timers, dirt and stock.

use std::{collections::BTreeMap, time::Duration};

use gym_floor_core::{
    CellCoord, Chance, EquipmentId, EquipmentKind, Event, Rect, Roll, StationType, StockItem,
    VisitorId, WorldPoint,
};
use tracing::debug;

use crate::stock::{DumbbellStock, PlateStock, Stock, StockLevels, PAIR};

const CLEANING_FRAME: Duration = Duration::from_millis(300);
const CLEANING_FRAMES: u32 = 3;
const WORKOUT_FRAME: Duration = Duration::from_millis(200);
const WORKOUT_FRAMES: u32 = 4;
const DIRTY_FRAME: u32 = 6;
const FIRST_CLEANING_FRAME: u32 = 7;
const FIRST_RUNNING_FRAME: u32 = 7;

/// Collision hitbox of an equipment kind, relative to its anchor tile center.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Footprint {
    /// Width in world pixels.
    pub width: i32,
    /// Height in world pixels.
    pub height: i32,
    /// Horizontal shift applied after centering.
    pub offset_x: i32,
    /// Vertical shift applied after centering.
    pub offset_y: i32,
}

/// Reports the collision hitbox associated with an equipment kind.
#[must_use]
pub fn footprint_for(kind: EquipmentKind) -> Footprint {
    let (width, height, offset_x, offset_y) = match kind {
        EquipmentKind::Bench => (32, 23, 0, 0),
        EquipmentKind::SmallBench => (22, 22, -1, 0),
        EquipmentKind::Treadmill => (48, 24, 0, 10),
        EquipmentKind::DumbbellRack => (32, 32, -7, 0),
        EquipmentKind::SquatRack => (48, 12, 0, 4),
        EquipmentKind::FrontDesk => (64, 8, 0, -24),
        EquipmentKind::Trashcan => (16, 10, 0, 4),
    };
    Footprint {
        width,
        height,
        offset_x,
        offset_y,
    }
}

/// Length of one interaction, or `None` when the kind cannot be occupied.
#[must_use]
pub fn interaction_duration(kind: EquipmentKind) -> Option<Duration> {
    match kind {
        EquipmentKind::Bench | EquipmentKind::SmallBench | EquipmentKind::SquatRack => {
            Some(Duration::from_secs(5))
        }
        EquipmentKind::Treadmill => Some(Duration::from_secs(8)),
        EquipmentKind::DumbbellRack => Some(Duration::from_secs(6)),
        EquipmentKind::FrontDesk => Some(Duration::from_secs(3)),
        EquipmentKind::Trashcan => None,
    }
}

/// Length of a full cleaning cycle.
#[must_use]
pub fn cleaning_duration() -> Duration {
    CLEANING_FRAME * CLEANING_FRAMES
}

/// One interactable piece of equipment placed on the floor.
#[derive(Clone, Debug)]
pub struct Equipment {
    id: EquipmentId,
    kind: EquipmentKind,
    anchor: CellCoord,
    collision_rect: Rect,
    occupant: Option<VisitorId>,
    elapsed: Duration,
    dirty: bool,
    cleaning: Option<Duration>,
    left_running: bool,
    stock: Stock,
}

impl Equipment {
    fn new(id: EquipmentId, kind: EquipmentKind, anchor: CellCoord) -> Self {
        let center = anchor.center();
        let footprint = footprint_for(kind);
        let collision_rect = Rect::new(
            center.x() - (footprint.width / 2) as f32 + footprint.offset_x as f32,
            center.y() - (footprint.height / 2) as f32 + footprint.offset_y as f32,
            footprint.width as f32,
            footprint.height as f32,
        );
        let stock = match kind {
            EquipmentKind::DumbbellRack => Stock::Dumbbells(DumbbellStock::full()),
            EquipmentKind::SquatRack => Stock::Plates(PlateStock::full()),
            _ => Stock::None,
        };
        Self {
            id,
            kind,
            anchor,
            collision_rect,
            occupant: None,
            elapsed: Duration::ZERO,
            dirty: false,
            cleaning: None,
            left_running: false,
            stock,
        }
    }

    /// Identifier allocated by the registry.
    #[must_use]
    pub const fn id(&self) -> EquipmentId {
        self.id
    }

    /// Kind of equipment.
    #[must_use]
    pub const fn kind(&self) -> EquipmentKind {
        self.kind
    }

    /// Tile the equipment was placed on.
    #[must_use]
    pub const fn anchor(&self) -> CellCoord {
        self.anchor
    }

    /// World position of the equipment (center of its anchor tile).
    #[must_use]
    pub fn position(&self) -> WorldPoint {
        self.anchor.center()
    }

    /// Rectangle that blocks movement and pathfinding.
    #[must_use]
    pub const fn collision_rect(&self) -> Rect {
        self.collision_rect
    }

    /// Visitor currently occupying the equipment.
    #[must_use]
    pub const fn occupant(&self) -> Option<VisitorId> {
        self.occupant
    }

    /// Reports whether an interaction is running.
    #[must_use]
    pub const fn in_use(&self) -> bool {
        self.occupant.is_some()
    }

    /// Reports whether the equipment needs cleaning before reuse.
    #[must_use]
    pub const fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Reports whether a cleaning cycle is running.
    #[must_use]
    pub const fn is_cleaning(&self) -> bool {
        self.cleaning.is_some()
    }

    /// Reports whether a treadmill was left running.
    #[must_use]
    pub const fn is_left_running(&self) -> bool {
        self.left_running
    }

    /// Inventory figures for racks, `None` for everything else.
    #[must_use]
    pub fn stock(&self) -> Option<StockLevels> {
        self.stock.levels()
    }

    /// Reports whether a visitor may start an interaction right now.
    #[must_use]
    pub fn is_available(&self) -> bool {
        if self.occupant.is_some() || self.dirty {
            return false;
        }
        match &self.stock {
            Stock::None => true,
            Stock::Dumbbells(stock) => stock.racked() >= PAIR && stock.rack_frame() != 3,
            Stock::Plates(stock) => stock.racked() > 0 && stock.frame() == 0,
        }
    }

    /// Animation frame the renderer should draw for the equipment itself.
    #[must_use]
    pub fn visual_frame(&self) -> u32 {
        match &self.stock {
            Stock::Dumbbells(stock) => return stock.rack_frame(),
            Stock::Plates(stock) => return stock.frame(),
            Stock::None => {}
        }
        if let Some(cleaning) = self.cleaning {
            let step = frame_step(cleaning, CLEANING_FRAME).min(CLEANING_FRAMES - 1);
            return FIRST_CLEANING_FRAME + step;
        }
        let animated = matches!(
            self.kind.station(),
            Some(StationType::Bench | StationType::Treadmill)
        );
        if self.occupant.is_some() && animated {
            return 1 + frame_step(self.elapsed, WORKOUT_FRAME) % WORKOUT_FRAMES;
        }
        if self.left_running {
            return FIRST_RUNNING_FRAME + frame_step(self.elapsed, WORKOUT_FRAME) % WORKOUT_FRAMES;
        }
        if self.dirty {
            return DIRTY_FRAME;
        }
        0
    }

    /// Frame of the floor pile next to a dumbbell rack.
    #[must_use]
    pub fn floor_frame(&self) -> Option<u32> {
        match &self.stock {
            Stock::Dumbbells(stock) => Some(stock.floor_frame()),
            _ => None,
        }
    }

    fn contains_tile_center(&self, cell: CellCoord) -> bool {
        let center = cell.center();
        let rect = &self.collision_rect;
        center.x() > rect.left()
            && center.x() < rect.right()
            && center.y() > rect.top()
            && center.y() < rect.bottom()
    }
}

fn frame_step(elapsed: Duration, frame: Duration) -> u32 {
    let step = elapsed.as_millis() / frame.as_millis().max(1);
    u32::try_from(step).unwrap_or(u32::MAX)
}

/// Registry that stores equipment and manages identifier allocation.
#[derive(Clone, Debug, Default)]
pub struct EquipmentRegistry {
    entries: BTreeMap<EquipmentId, Equipment>,
    next_equipment_id: u32,
}

impl EquipmentRegistry {
    /// Creates an empty registry with a reset identifier counter.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Places one piece of equipment per object anchor of the layout.
    pub fn from_objects(objects: impl IntoIterator<Item = (CellCoord, EquipmentKind)>) -> Self {
        let mut registry = Self::new();
        for (cell, kind) in objects {
            let _ = registry.add_equipment(cell, kind);
        }
        registry
    }

    /// Constructs and stores one piece of equipment anchored on `cell`.
    pub fn add_equipment(&mut self, cell: CellCoord, kind: EquipmentKind) -> EquipmentId {
        let id = EquipmentId::new(self.next_equipment_id);
        self.next_equipment_id = self.next_equipment_id.saturating_add(1);
        let _ = self.entries.insert(id, Equipment::new(id, kind, cell));
        id
    }

    /// Removes a piece of equipment from the floor.
    pub fn remove_equipment(&mut self, id: EquipmentId) -> Option<Equipment> {
        self.entries.remove(&id)
    }

    /// Looks a piece of equipment up by identifier.
    #[must_use]
    pub fn get(&self, id: EquipmentId) -> Option<&Equipment> {
        self.entries.get(&id)
    }

    /// Every piece of equipment in identifier order.
    pub fn iter(&self) -> impl Iterator<Item = &Equipment> {
        self.entries.values()
    }

    /// Collision rectangles of every piece of equipment.
    pub fn collision_objects(&self) -> impl Iterator<Item = (Rect, &Equipment)> {
        self.entries
            .values()
            .map(|equipment| (equipment.collision_rect, equipment))
    }

    /// Equipment anchored on the tile, or covering its center.
    #[must_use]
    pub fn object_at_tile(&self, cell: CellCoord) -> Option<&Equipment> {
        self.entries
            .values()
            .find(|equipment| equipment.anchor == cell)
            .or_else(|| {
                self.entries
                    .values()
                    .find(|equipment| equipment.contains_tile_center(cell))
            })
    }

    /// Equipment of one kind in identifier order.
    pub fn objects_of_kind(&self, kind: EquipmentKind) -> impl Iterator<Item = &Equipment> {
        self.entries
            .values()
            .filter(move |equipment| equipment.kind == kind)
    }

    /// Equipment offering one workout station in identifier order.
    pub fn stations(&self, station: StationType) -> impl Iterator<Item = &Equipment> {
        self.entries
            .values()
            .filter(move |equipment| equipment.kind.station() == Some(station))
    }

    /// Closest equipment of a kind to a world point.
    #[must_use]
    pub fn nearest(&self, kind: EquipmentKind, from: WorldPoint) -> Option<&Equipment> {
        self.objects_of_kind(kind).fold(None, |best: Option<&Equipment>, candidate| {
            match best {
                Some(current)
                    if current.position().distance(from) <= candidate.position().distance(from) =>
                {
                    Some(current)
                }
                _ => Some(candidate),
            }
        })
    }

    /// Reports whether the equipment exists and accepts a new occupant.
    #[must_use]
    pub fn is_available(&self, id: EquipmentId) -> bool {
        self.entries.get(&id).is_some_and(Equipment::is_available)
    }

    /// Units of one consumable accounted for across every rack.
    #[must_use]
    pub fn stock_total(&self, item: StockItem) -> u32 {
        self.entries
            .values()
            .filter_map(Equipment::stock)
            .filter(|levels| levels.item == item)
            .map(|levels| levels.total())
            .sum()
    }

    /// Claims the equipment for a visitor. Fails without side effects when
    /// the equipment is busy, dirty, out of stock or cannot be occupied.
    pub fn start_interaction(
        &mut self,
        id: EquipmentId,
        visitor: VisitorId,
        out_events: &mut Vec<Event>,
    ) -> bool {
        let Some(equipment) = self.entries.get_mut(&id) else {
            return false;
        };
        if interaction_duration(equipment.kind).is_none() || !equipment.is_available() {
            debug!(equipment = id.get(), visitor = visitor.get(), "interaction rejected");
            out_events.push(Event::InteractionRejected {
                equipment: id,
                visitor,
            });
            return false;
        }

        let stocked = match &mut equipment.stock {
            Stock::None => true,
            Stock::Dumbbells(stock) => stock.lend(),
            Stock::Plates(stock) => stock.load(),
        };
        if !stocked {
            debug!(
                equipment = id.get(),
                visitor = visitor.get(),
                "interaction rejected, stock ran out"
            );
            out_events.push(Event::InteractionRejected {
                equipment: id,
                visitor,
            });
            return false;
        }

        equipment.occupant = Some(visitor);
        equipment.elapsed = Duration::ZERO;
        equipment.left_running = false;
        debug!(
            equipment = id.get(),
            visitor = visitor.get(),
            kind = ?equipment.kind,
            "interaction started"
        );
        out_events.push(Event::InteractionStarted {
            equipment: id,
            visitor,
        });
        true
    }

    /// Releases the occupant and resolves the randomised aftermath of the
    /// interaction. Returns `false` when nothing was occupying the equipment.
    pub fn end_interaction(
        &mut self,
        id: EquipmentId,
        chance: &mut dyn Chance,
        out_events: &mut Vec<Event>,
    ) -> bool {
        let Some(equipment) = self.entries.get_mut(&id) else {
            return false;
        };
        let Some(visitor) = equipment.occupant.take() else {
            return false;
        };
        equipment.elapsed = Duration::ZERO;
        let kind = equipment.kind;
        out_events.push(Event::InteractionEnded {
            equipment: id,
            visitor,
        });

        match kind {
            EquipmentKind::Bench | EquipmentKind::SmallBench => {
                if chance.roll(Roll::BenchTurnsDirty) {
                    self.turn_dirty(id, out_events);
                }
            }
            EquipmentKind::Treadmill => {
                if chance.roll(Roll::TreadmillLeftRunning) {
                    equipment.left_running = true;
                    debug!(equipment = id.get(), "treadmill left running");
                    out_events.push(Event::TreadmillLeftRunning { equipment: id });
                }
                if chance.roll(Roll::TreadmillTurnsDirty) {
                    self.turn_dirty(id, out_events);
                }
            }
            EquipmentKind::DumbbellRack => {
                let Stock::Dumbbells(stock) = &mut equipment.stock else {
                    return true;
                };
                let pair = stock.take_borrowed();
                if chance.roll(Roll::DumbbellsDropped) {
                    stock.drop_on_floor(pair);
                    out_events.push(Event::StockDropped {
                        equipment: id,
                        item: StockItem::Dumbbell,
                        count: pair,
                    });
                } else {
                    self.return_dumbbells(id, pair, out_events);
                }
            }
            EquipmentKind::SquatRack => {
                let Stock::Plates(stock) = &mut equipment.stock else {
                    return true;
                };
                let stripped = chance.roll(Roll::SquatRackStripped);
                let dropped = stock.unload(stripped);
                if dropped > 0 {
                    out_events.push(Event::StockDropped {
                        equipment: id,
                        item: StockItem::Plate,
                        count: dropped,
                    });
                }
            }
            EquipmentKind::FrontDesk | EquipmentKind::Trashcan => {}
        }
        true
    }

    /// Starts a cleaning cycle on dirty equipment that is not being cleaned.
    pub fn start_cleaning(&mut self, id: EquipmentId, out_events: &mut Vec<Event>) -> bool {
        let Some(equipment) = self.entries.get_mut(&id) else {
            return false;
        };
        if !equipment.dirty || equipment.cleaning.is_some() {
            return false;
        }
        equipment.cleaning = Some(Duration::ZERO);
        debug!(equipment = id.get(), "cleaning started");
        out_events.push(Event::CleaningStarted { equipment: id });
        true
    }

    /// Switches a running treadmill off.
    pub fn turn_off(&mut self, id: EquipmentId, out_events: &mut Vec<Event>) -> bool {
        let Some(equipment) = self.entries.get_mut(&id) else {
            return false;
        };
        if !equipment.left_running {
            return false;
        }
        equipment.left_running = false;
        equipment.elapsed = Duration::ZERO;
        out_events.push(Event::TreadmillTurnedOff { equipment: id });
        true
    }

    /// Takes up to `max` units of the equipment's consumable off the floor.
    pub fn pick_up(
        &mut self,
        id: EquipmentId,
        item: StockItem,
        max: u32,
        out_events: &mut Vec<Event>,
    ) -> u32 {
        let Some(equipment) = self.entries.get_mut(&id) else {
            return 0;
        };
        let taken = match (&mut equipment.stock, item) {
            (Stock::Dumbbells(stock), StockItem::Dumbbell) => stock.pick_up(max),
            (Stock::Plates(stock), StockItem::Plate) => stock.pick_up(max),
            _ => 0,
        };
        if taken > 0 {
            out_events.push(Event::StockPickedUp {
                equipment: id,
                item,
                count: taken,
            });
        }
        taken
    }

    /// Racks up to `count` units of the consumable, returning how many fit.
    pub fn restock(
        &mut self,
        id: EquipmentId,
        item: StockItem,
        count: u32,
        out_events: &mut Vec<Event>,
    ) -> u32 {
        let Some(equipment) = self.entries.get_mut(&id) else {
            return 0;
        };
        let accepted = match (&mut equipment.stock, item) {
            (Stock::Dumbbells(stock), StockItem::Dumbbell) => stock.rack(count),
            (Stock::Plates(stock), StockItem::Plate) => stock.rack(count),
            _ => 0,
        };
        if accepted > 0 {
            out_events.push(Event::StockReturned {
                equipment: id,
                item,
                count: accepted,
            });
        }
        accepted
    }

    /// Advances every timer, ending interactions that ran their course.
    ///
    /// Returns `true` when occupancy or stock changed, meaning cached
    /// walkability derived from the registry is stale.
    pub fn update(
        &mut self,
        dt: Duration,
        chance: &mut dyn Chance,
        out_events: &mut Vec<Event>,
    ) -> bool {
        let mut finished = Vec::new();
        for equipment in self.entries.values_mut() {
            equipment.elapsed = equipment.elapsed.saturating_add(dt);

            if let Some(cleaning) = equipment.cleaning.as_mut() {
                *cleaning = cleaning.saturating_add(dt);
                if *cleaning >= cleaning_duration() {
                    equipment.cleaning = None;
                    equipment.dirty = false;
                    debug!(equipment = equipment.id.get(), "cleaning finished");
                    out_events.push(Event::CleaningFinished {
                        equipment: equipment.id,
                    });
                }
            }

            if equipment.occupant.is_some() {
                let done = interaction_duration(equipment.kind)
                    .map_or(true, |duration| equipment.elapsed >= duration);
                if done {
                    finished.push(equipment.id);
                }
            }
        }

        let mut changed = false;
        for id in finished {
            changed |= self.end_interaction(id, chance, out_events);
        }
        changed
    }

    fn turn_dirty(&mut self, id: EquipmentId, out_events: &mut Vec<Event>) {
        if let Some(equipment) = self.entries.get_mut(&id) {
            equipment.dirty = true;
            debug!(equipment = id.get(), "equipment turned dirty");
            out_events.push(Event::EquipmentTurnedDirty { equipment: id });
        }
    }

    /// Re-racks a pair on its home rack, the closest rack with space, or the
    /// home floor when every rack is full.
    fn return_dumbbells(&mut self, home: EquipmentId, count: u32, out_events: &mut Vec<Event>) {
        let Some(origin) = self.entries.get(&home).map(Equipment::position) else {
            return;
        };
        let target = if rack_space(self.entries.get(&home)) > 0 {
            Some(home)
        } else {
            self.objects_of_kind(EquipmentKind::DumbbellRack)
                .filter(|rack| rack.id != home && rack_space(Some(rack)) > 0)
                .fold(None, |best: Option<(&Equipment, f32)>, rack| {
                    let distance = rack.position().distance(origin);
                    match best {
                        Some((_, closest)) if closest <= distance => best,
                        _ => Some((rack, distance)),
                    }
                })
                .map(|(rack, _)| rack.id)
        };

        let mut remaining = count;
        if let Some(target) = target {
            remaining -= self.restock(target, StockItem::Dumbbell, count, out_events);
        }
        if remaining > 0 {
            if let Some(Stock::Dumbbells(stock)) =
                self.entries.get_mut(&home).map(|equipment| &mut equipment.stock)
            {
                stock.drop_on_floor(remaining);
                out_events.push(Event::StockDropped {
                    equipment: home,
                    item: StockItem::Dumbbell,
                    count: remaining,
                });
            }
        }
    }
}

fn rack_space(equipment: Option<&Equipment>) -> u32 {
    match equipment.map(|equipment| &equipment.stock) {
        Some(Stock::Dumbbells(stock)) => stock.space(),
        _ => 0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug)]
    struct Always(bool);

    impl Chance for Always {
        fn roll(&mut self, _roll: Roll) -> bool {
            self.0
        }

        fn pick(&mut self, _len: usize) -> usize {
            0
        }

        fn between(&mut self, low: u32, _high: u32) -> u32 {
            low
        }
    }

    #[test]
    fn bench_collision_rect_spans_three_tiles() {
        let mut registry = EquipmentRegistry::new();
        let id = registry.add_equipment(CellCoord::new(5, 5), EquipmentKind::Bench);
        let rect = registry.get(id).expect("bench").collision_rect();
        assert_eq!(rect, Rect::new(72.0, 77.0, 32.0, 23.0));
    }

    #[test]
    fn small_bench_halves_odd_sizes_downwards() {
        let mut registry = EquipmentRegistry::new();
        let id = registry.add_equipment(CellCoord::new(0, 0), EquipmentKind::SmallBench);
        let rect = registry.get(id).expect("small bench").collision_rect();
        assert_eq!(rect, Rect::new(-4.0, -3.0, 22.0, 22.0));
    }

    #[test]
    fn trashcans_cannot_be_occupied() {
        let mut registry = EquipmentRegistry::new();
        let mut events = Vec::new();
        let id = registry.add_equipment(CellCoord::new(2, 2), EquipmentKind::Trashcan);
        assert!(registry.is_available(id));
        assert!(!registry.start_interaction(id, VisitorId::new(0), &mut events));
        assert!(registry.get(id).is_some_and(|trashcan| !trashcan.in_use()));
    }

    #[test]
    fn released_station_accepts_the_next_visitor() {
        let mut registry = EquipmentRegistry::new();
        let mut events = Vec::new();
        let first = VisitorId::new(1);
        let second = VisitorId::new(2);

        let treadmill = registry.add_equipment(CellCoord::new(2, 2), EquipmentKind::Treadmill);
        assert!(registry.start_interaction(treadmill, first, &mut events));
        assert!(!registry.start_interaction(treadmill, second, &mut events));
        assert!(registry.end_interaction(treadmill, &mut Always(false), &mut events));
        assert!(registry.start_interaction(treadmill, second, &mut events));
        assert_eq!(registry.get(treadmill).and_then(Equipment::occupant), Some(second));

        let squat_rack = registry.add_equipment(CellCoord::new(8, 2), EquipmentKind::SquatRack);
        assert!(registry.start_interaction(squat_rack, first, &mut events));
        assert!(!registry.start_interaction(squat_rack, second, &mut events));
        assert!(registry.end_interaction(squat_rack, &mut Always(false), &mut events));
        // the dropped plates go back before the rack counts as available
        assert!(!registry.is_available(squat_rack));
        let plates = registry.pick_up(squat_rack, StockItem::Plate, 2, &mut events);
        assert_eq!(registry.restock(squat_rack, StockItem::Plate, plates, &mut events), 2);
        assert!(registry.start_interaction(squat_rack, second, &mut events));
        assert_eq!(registry.get(squat_rack).and_then(Equipment::occupant), Some(second));

        let rejected = events
            .iter()
            .filter(|event| {
                matches!(event, Event::InteractionRejected { visitor, .. } if *visitor == second)
            })
            .count();
        assert_eq!(rejected, 2);
    }

    #[test]
    fn interactions_time_out_through_update() {
        let mut registry = EquipmentRegistry::new();
        let mut events = Vec::new();
        let id = registry.add_equipment(CellCoord::new(2, 2), EquipmentKind::Bench);
        assert!(registry.start_interaction(id, VisitorId::new(3), &mut events));

        assert!(!registry.update(Duration::from_secs(4), &mut Always(false), &mut events));
        assert!(registry.get(id).is_some_and(Equipment::in_use));
        assert!(registry.update(Duration::from_secs(1), &mut Always(true), &mut events));

        let bench = registry.get(id).expect("bench");
        assert!(!bench.in_use());
        assert!(bench.is_dirty());
        assert_eq!(bench.visual_frame(), DIRTY_FRAME);
        assert!(!registry.is_available(id));
        assert!(events.contains(&Event::EquipmentTurnedDirty { equipment: id }));
    }

    #[test]
    fn cleaning_runs_three_frames_then_clears_dirt() {
        let mut registry = EquipmentRegistry::new();
        let mut events = Vec::new();
        let id = registry.add_equipment(CellCoord::new(2, 2), EquipmentKind::Bench);
        assert!(!registry.start_cleaning(id, &mut events));
        assert!(registry.start_interaction(id, VisitorId::new(0), &mut events));
        assert!(registry.end_interaction(id, &mut Always(true), &mut events));

        assert!(registry.start_cleaning(id, &mut events));
        assert!(!registry.start_cleaning(id, &mut events));
        let _ = registry.update(Duration::from_millis(300), &mut Always(false), &mut events);
        assert_eq!(registry.get(id).expect("bench").visual_frame(), 8);
        let _ = registry.update(Duration::from_millis(600), &mut Always(false), &mut events);

        let bench = registry.get(id).expect("bench");
        assert!(!bench.is_dirty());
        assert!(!bench.is_cleaning());
        assert!(events.contains(&Event::CleaningFinished { equipment: id }));
    }

    #[test]
    fn treadmill_keeps_running_until_turned_off() {
        let mut registry = EquipmentRegistry::new();
        let mut events = Vec::new();
        let id = registry.add_equipment(CellCoord::new(2, 2), EquipmentKind::Treadmill);
        assert!(registry.start_interaction(id, VisitorId::new(0), &mut events));
        assert!(registry.end_interaction(id, &mut Always(true), &mut events));
        let treadmill = registry.get(id).expect("treadmill");
        assert!(treadmill.is_left_running());
        assert_eq!(treadmill.visual_frame(), FIRST_RUNNING_FRAME);

        assert!(registry.turn_off(id, &mut events));
        assert!(!registry.turn_off(id, &mut events));
        assert!(!registry.get(id).expect("treadmill").is_left_running());
    }

    #[test]
    fn full_rack_sends_dumbbells_to_the_closest_rack_with_space() {
        let mut registry = EquipmentRegistry::new();
        let mut events = Vec::new();
        let home = registry.add_equipment(CellCoord::new(2, 2), EquipmentKind::DumbbellRack);
        let far = registry.add_equipment(CellCoord::new(20, 2), EquipmentKind::DumbbellRack);
        let near = registry.add_equipment(CellCoord::new(6, 2), EquipmentKind::DumbbellRack);
        for rack in [far, near] {
            assert!(registry.start_interaction(rack, VisitorId::new(9), &mut events));
            assert!(registry.end_interaction(rack, &mut Always(true), &mut events));
        }

        assert!(registry.start_interaction(home, VisitorId::new(1), &mut events));
        assert_eq!(registry.restock(home, StockItem::Dumbbell, 2, &mut events), 2);
        assert!(registry.end_interaction(home, &mut Always(false), &mut events));

        let racked = |id| registry.get(id).and_then(Equipment::stock).map(|levels| levels.racked);
        assert_eq!(racked(home), Some(6));
        assert_eq!(racked(near), Some(6));
        assert_eq!(racked(far), Some(4));
    }

    #[test]
    fn squat_rack_needs_every_plate_back_before_reuse() {
        let mut registry = EquipmentRegistry::new();
        let mut events = Vec::new();
        let id = registry.add_equipment(CellCoord::new(2, 2), EquipmentKind::SquatRack);
        assert!(registry.start_interaction(id, VisitorId::new(0), &mut events));
        assert!(registry.end_interaction(id, &mut Always(false), &mut events));
        assert!(!registry.is_available(id));

        assert_eq!(registry.pick_up(id, StockItem::Plate, 2, &mut events), 2);
        assert_eq!(registry.restock(id, StockItem::Plate, 2, &mut events), 2);
        assert!(registry.is_available(id));
    }

    #[test]
    fn object_lookup_prefers_the_anchor() {
        let mut registry = EquipmentRegistry::new();
        let bench = registry.add_equipment(CellCoord::new(5, 5), EquipmentKind::Bench);
        assert_eq!(registry.object_at_tile(CellCoord::new(5, 5)).map(Equipment::id), Some(bench));
        assert_eq!(registry.object_at_tile(CellCoord::new(4, 5)).map(Equipment::id), Some(bench));
        assert!(registry.object_at_tile(CellCoord::new(8, 8)).is_none());
    }

    #[test]
    fn nearest_picks_the_closest_of_a_kind() {
        let mut registry = EquipmentRegistry::new();
        let _ = registry.add_equipment(CellCoord::new(1, 1), EquipmentKind::Trashcan);
        let close = registry.add_equipment(CellCoord::new(9, 9), EquipmentKind::Trashcan);
        let found = registry.nearest(EquipmentKind::Trashcan, CellCoord::new(8, 8).center());
        assert_eq!(found.map(Equipment::id), Some(close));
        assert!(registry
            .nearest(EquipmentKind::FrontDesk, WorldPoint::default())
            .is_none());
    }
}
