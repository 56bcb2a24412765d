#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the Gym Floor simulation.
//!
//! This crate defines the message surface that connects adapters, the
//! authoritative world, and the visitor and spawning systems. Adapters submit
//! [`Command`] values describing player-driven mutations, the world executes
//! them via its `apply` entry point and broadcasts [`Event`] values that
//! downstream collaborators (audio, scoring, logging) consume without ever
//! feeding back into the simulation truth. Randomised outcomes are funnelled
//! through the [`Chance`] trait so every probabilistic branch can be pinned
//! in tests.

use std::{fmt, time::Duration};

use serde::{Deserialize, Serialize};

/// Side length of a single square tile measured in world pixels.
pub const TILE_LENGTH: f32 = 16.0;

/// Commands that express all player-driven world mutations.
#[derive(Clone, Debug, PartialEq)]
pub enum Command {
    /// Advances every equipment timer by the provided delta time.
    Tick {
        /// Duration of simulated time that elapsed since the previous tick.
        dt: Duration,
    },
    /// Moves the player by the provided offset when the floor allows it.
    MovePlayer {
        /// Horizontal displacement in world pixels.
        dx: f32,
        /// Vertical displacement in world pixels.
        dy: f32,
    },
    /// Picks dumbbells up from the floor stock next to a rack.
    PickUpFloorDumbbells {
        /// Rack whose floor stock is collected.
        equipment: EquipmentId,
    },
    /// Puts the dumbbells the player carries back into a rack.
    ReturnDumbbells {
        /// Rack receiving the dumbbells.
        equipment: EquipmentId,
    },
    /// Picks weight plates up from the floor stock next to a squat rack.
    PickUpFloorPlates {
        /// Squat rack whose floor stock is collected.
        equipment: EquipmentId,
    },
    /// Puts the plates the player carries back onto a squat rack.
    ReturnPlates {
        /// Squat rack receiving the plates.
        equipment: EquipmentId,
    },
    /// Switches off a treadmill that a visitor left running.
    TurnOffTreadmill {
        /// Treadmill being switched off.
        equipment: EquipmentId,
    },
    /// Starts a cleaning cycle on dirty equipment on behalf of the player.
    CleanEquipment {
        /// Equipment being cleaned.
        equipment: EquipmentId,
    },
    /// Toggles whether a tile of the static wall layer blocks movement.
    SetWall {
        /// Tile whose collidability changes.
        cell: CellCoord,
        /// Whether the tile blocks movement after the change.
        blocked: bool,
    },
}

/// Events broadcast by the world and the systems after processing work.
#[derive(Clone, Debug, PartialEq)]
pub enum Event {
    /// Indicates that the simulation clock advanced.
    TimeAdvanced {
        /// Duration of simulated time that elapsed in the tick.
        dt: Duration,
    },
    /// A visitor claimed a piece of equipment.
    InteractionStarted {
        /// Equipment that became occupied.
        equipment: EquipmentId,
        /// Visitor now occupying the equipment.
        visitor: VisitorId,
    },
    /// A visitor failed to claim a piece of equipment.
    InteractionRejected {
        /// Equipment that refused the claim.
        equipment: EquipmentId,
        /// Visitor whose claim was refused.
        visitor: VisitorId,
    },
    /// A visitor released the equipment it was using.
    InteractionEnded {
        /// Equipment that became free.
        equipment: EquipmentId,
        /// Visitor that used the equipment.
        visitor: VisitorId,
    },
    /// Equipment was left dirty and needs a cleaning cycle.
    EquipmentTurnedDirty {
        /// Equipment that turned dirty.
        equipment: EquipmentId,
    },
    /// A treadmill was left running after its visitor stepped off.
    TreadmillLeftRunning {
        /// Treadmill that keeps running.
        equipment: EquipmentId,
    },
    /// A running treadmill was switched off.
    TreadmillTurnedOff {
        /// Treadmill that stopped.
        equipment: EquipmentId,
    },
    /// A cleaning cycle began.
    CleaningStarted {
        /// Equipment being cleaned.
        equipment: EquipmentId,
    },
    /// A cleaning cycle finished and cleared the dirty flag.
    CleaningFinished {
        /// Equipment that is clean again.
        equipment: EquipmentId,
    },
    /// Consumable items were left on the floor next to their equipment.
    StockDropped {
        /// Equipment the items belong to.
        equipment: EquipmentId,
        /// Kind of consumable that was dropped.
        item: StockItem,
        /// Number of units dropped.
        count: u32,
    },
    /// Consumable items were put back into their equipment.
    StockReturned {
        /// Equipment that received the items.
        equipment: EquipmentId,
        /// Kind of consumable that was returned.
        item: StockItem,
        /// Number of units returned.
        count: u32,
    },
    /// The player picked consumable items up from the floor.
    StockPickedUp {
        /// Equipment whose floor stock shrank.
        equipment: EquipmentId,
        /// Kind of consumable collected.
        item: StockItem,
        /// Number of units collected.
        count: u32,
    },
    /// The player moved to a new position.
    PlayerMoved {
        /// Top-left corner of the player's sprite box after moving.
        position: WorldPoint,
    },
    /// A visitor entered the simulation.
    VisitorArrived {
        /// Visitor that arrived.
        visitor: VisitorId,
    },
    /// A visitor completed check-in at the front desk.
    VisitorCheckedIn {
        /// Visitor that checked in.
        visitor: VisitorId,
    },
    /// A visitor started walking out of the gym.
    VisitorDeparting {
        /// Visitor that is leaving.
        visitor: VisitorId,
    },
    /// A visitor was removed from the simulation.
    VisitorLeft {
        /// Visitor that left.
        visitor: VisitorId,
        /// Whether removal was forced by the departure timeout.
        timed_out: bool,
    },
}

/// Unique identifier assigned to a visitor.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct VisitorId(u32);

impl VisitorId {
    /// Creates a new visitor identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Unique identifier assigned to a piece of equipment.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EquipmentId(u32);

impl EquipmentId {
    /// Creates a new equipment identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the equipment identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Location of a single grid cell expressed as column and row coordinates.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CellCoord {
    column: u32,
    row: u32,
}

impl CellCoord {
    /// Creates a new grid cell coordinate.
    #[must_use]
    pub const fn new(column: u32, row: u32) -> Self {
        Self { column, row }
    }

    /// Zero-based column index of the cell.
    #[must_use]
    pub const fn column(&self) -> u32 {
        self.column
    }

    /// Zero-based row index of the cell.
    #[must_use]
    pub const fn row(&self) -> u32 {
        self.row
    }

    /// Computes the Manhattan distance between two cell coordinates.
    #[must_use]
    pub fn manhattan_distance(self, other: CellCoord) -> u32 {
        self.column().abs_diff(other.column()) + self.row().abs_diff(other.row())
    }

    /// Computes the Chebyshev (king move) distance between two cells.
    #[must_use]
    pub fn chebyshev_distance(self, other: CellCoord) -> u32 {
        self.column()
            .abs_diff(other.column())
            .max(self.row().abs_diff(other.row()))
    }

    /// World-space center of the cell.
    #[must_use]
    pub fn center(self) -> WorldPoint {
        let half = TILE_LENGTH / 2.0;
        WorldPoint::new(
            self.column as f32 * TILE_LENGTH + half,
            self.row as f32 * TILE_LENGTH + half,
        )
    }
}

/// Continuous position measured in world pixels.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct WorldPoint {
    x: f32,
    y: f32,
}

impl WorldPoint {
    /// Creates a new world position.
    #[must_use]
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Horizontal coordinate.
    #[must_use]
    pub const fn x(&self) -> f32 {
        self.x
    }

    /// Vertical coordinate, growing downwards.
    #[must_use]
    pub const fn y(&self) -> f32 {
        self.y
    }

    /// Returns the point shifted by the provided offset.
    #[must_use]
    pub fn offset(self, dx: f32, dy: f32) -> Self {
        Self::new(self.x + dx, self.y + dy)
    }

    /// Euclidean distance between two points.
    #[must_use]
    pub fn distance(self, other: WorldPoint) -> f32 {
        let dx = other.x - self.x;
        let dy = other.y - self.y;
        (dx * dx + dy * dy).sqrt()
    }
}

/// Axis-aligned rectangle measured in world pixels.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    x: f32,
    y: f32,
    width: f32,
    height: f32,
}

impl Rect {
    /// Creates a rectangle from its top-left corner and size.
    #[must_use]
    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Left edge.
    #[must_use]
    pub const fn left(&self) -> f32 {
        self.x
    }

    /// Top edge.
    #[must_use]
    pub const fn top(&self) -> f32 {
        self.y
    }

    /// Right edge; the rectangle covers `left..right`.
    #[must_use]
    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    /// Bottom edge; the rectangle covers `top..bottom`.
    #[must_use]
    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }

    /// Width of the rectangle.
    #[must_use]
    pub const fn width(&self) -> f32 {
        self.width
    }

    /// Height of the rectangle.
    #[must_use]
    pub const fn height(&self) -> f32 {
        self.height
    }

    /// Center of the rectangle.
    #[must_use]
    pub fn center(&self) -> WorldPoint {
        WorldPoint::new(self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    /// Reports whether two rectangles overlap. Touching edges do not count.
    #[must_use]
    pub fn intersects(&self, other: &Rect) -> bool {
        self.left() < other.right()
            && other.left() < self.right()
            && self.top() < other.bottom()
            && other.top() < self.bottom()
    }
}

/// Rectangle expressed relative to an agent's sprite origin.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Hitbox {
    x: f32,
    y: f32,
    width: f32,
    height: f32,
}

impl Hitbox {
    /// Creates a hitbox offset from the sprite origin.
    #[must_use]
    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Places the hitbox in world space for a sprite anchored at `origin`.
    #[must_use]
    pub fn at(&self, origin: WorldPoint) -> Rect {
        Rect::new(
            origin.x() + self.x,
            origin.y() + self.y,
            self.width,
            self.height,
        )
    }
}

/// Named collision shape of an agent: wall probe points plus hitboxes.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct HitboxSet {
    probes: &'static [(f32, f32)],
    boxes: &'static [Hitbox],
}

const HUMANOID_PROBES: [(f32, f32); 4] = [(8.0, 8.0), (8.0, 24.0), (4.0, 16.0), (12.0, 16.0)];
const HUMANOID_BOXES: [Hitbox; 2] = [
    // body
    Hitbox::new(6.0, 10.0, 4.0, 12.0),
    // feet
    Hitbox::new(4.0, 22.0, 8.0, 6.0),
];

impl HitboxSet {
    /// Collision shape shared by the player and visitors (16x32 sprite box).
    pub const HUMANOID: HitboxSet = HitboxSet {
        probes: &HUMANOID_PROBES,
        boxes: &HUMANOID_BOXES,
    };

    /// Points tested against the static wall layer, relative to the origin.
    #[must_use]
    pub const fn probes(&self) -> &'static [(f32, f32)] {
        self.probes
    }

    /// Rectangles tested against equipment, relative to the origin.
    #[must_use]
    pub const fn boxes(&self) -> &'static [Hitbox] {
        self.boxes
    }
}

/// Who is asking the collision oracle for permission to move.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum AgentKind {
    /// The player character.
    Player,
    /// A visitor walking on the floor.
    Visitor,
    /// A visitor entering or leaving through the off-map entrance. Points off
    /// the map are passable and equipment is ignored.
    Transit,
}

/// Direction a sprite faces.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Facing {
    /// Facing towards decreasing rows.
    Up,
    /// Facing towards increasing rows.
    #[default]
    Down,
    /// Facing towards decreasing columns.
    Left,
    /// Facing towards increasing columns.
    Right,
}

/// Kinds of equipment that can be placed on the gym floor.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum EquipmentKind {
    /// Full size weight bench.
    Bench,
    /// Compact bench; counts as a bench for station variety.
    SmallBench,
    /// Treadmill.
    Treadmill,
    /// Rack of dumbbells lent out two at a time.
    DumbbellRack,
    /// Squat rack loaded with weight plates.
    SquatRack,
    /// Reception desk where visitors check in.
    FrontDesk,
    /// Trashcan visited while cleaning a bench.
    Trashcan,
}

impl EquipmentKind {
    /// Decodes an object-layer tile code. `-1` and unknown codes are empty.
    #[must_use]
    pub const fn from_tile_code(code: i32) -> Option<Self> {
        match code {
            0 => Some(Self::Bench),
            1 => Some(Self::Treadmill),
            2 => Some(Self::DumbbellRack),
            3 => Some(Self::SmallBench),
            4 => Some(Self::SquatRack),
            5 => Some(Self::FrontDesk),
            6 => Some(Self::Trashcan),
            _ => None,
        }
    }

    /// Object-layer tile code that places this kind.
    #[must_use]
    pub const fn tile_code(self) -> i32 {
        match self {
            Self::Bench => 0,
            Self::Treadmill => 1,
            Self::DumbbellRack => 2,
            Self::SmallBench => 3,
            Self::SquatRack => 4,
            Self::FrontDesk => 5,
            Self::Trashcan => 6,
        }
    }

    /// Workout station this equipment offers, if visitors train on it.
    #[must_use]
    pub const fn station(self) -> Option<StationType> {
        match self {
            Self::Bench | Self::SmallBench => Some(StationType::Bench),
            Self::Treadmill => Some(StationType::Treadmill),
            Self::DumbbellRack => Some(StationType::DumbbellRack),
            Self::SquatRack => Some(StationType::SquatRack),
            Self::FrontDesk | Self::Trashcan => None,
        }
    }
}

/// Workout station categories used by the variety rule.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum StationType {
    /// Treadmills.
    Treadmill,
    /// Benches of any size.
    Bench,
    /// Dumbbell racks.
    DumbbellRack,
    /// Squat racks.
    SquatRack,
}

impl StationType {
    /// Every station type in canonical selection order.
    pub const ALL: [StationType; 4] = [
        StationType::Treadmill,
        StationType::Bench,
        StationType::DumbbellRack,
        StationType::SquatRack,
    ];
}

/// Consumable items lent out by racks.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StockItem {
    /// Dumbbells, lent and returned in pairs.
    Dumbbell,
    /// Weight plates.
    Plate,
}

/// Probabilistic outcomes resolved through [`Chance`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Roll {
    /// A bench turns dirty when its visitor finishes.
    BenchTurnsDirty,
    /// A treadmill turns dirty when its visitor finishes.
    TreadmillTurnsDirty,
    /// A treadmill keeps running after its visitor steps off.
    TreadmillLeftRunning,
    /// Dumbbells are dropped on the floor instead of being re-racked.
    DumbbellsDropped,
    /// Every plate comes off the squat rack instead of just the loaded pair.
    SquatRackStripped,
    /// A visitor cleans the dirty bench it just used.
    VisitorCleansBench,
    /// A new visitor sticks to one preferred station type.
    PrefersStation,
    /// An off-peak check lets new visitors in.
    OffPeakArrival,
}

/// Injectable source of every randomised decision in the simulation.
pub trait Chance: fmt::Debug {
    /// Resolves a probabilistic outcome.
    fn roll(&mut self, roll: Roll) -> bool;

    /// Picks a uniformly distributed index in `0..len`. `len` is never zero.
    fn pick(&mut self, len: usize) -> usize;

    /// Picks a uniformly distributed value in `low..=high`.
    fn between(&mut self, low: u32, high: u32) -> u32;
}

/// Configurable probabilities backing each [`Roll`].
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Odds {
    /// Probability that a bench turns dirty after use.
    pub bench_dirty: f32,
    /// Probability that a treadmill turns dirty after use.
    pub treadmill_dirty: f32,
    /// Probability that a treadmill is left running after use.
    pub treadmill_left_running: f32,
    /// Probability that dumbbells end up on the floor after use.
    pub dumbbells_dropped: f32,
    /// Probability that a squat rack is stripped of every plate after use.
    pub squat_rack_stripped: f32,
    /// Probability that a visitor cleans the dirty bench it used.
    pub visitor_cleans_bench: f32,
    /// Probability that a new visitor prefers one station type.
    pub prefers_station: f32,
    /// Probability that an off-peak check admits visitors.
    pub off_peak_arrival: f32,
}

impl Default for Odds {
    fn default() -> Self {
        Self {
            bench_dirty: 1.0,
            treadmill_dirty: 0.0,
            treadmill_left_running: 0.4,
            dumbbells_dropped: 0.4,
            squat_rack_stripped: 0.5,
            visitor_cleans_bench: 0.4,
            prefers_station: 0.25,
            off_peak_arrival: 0.5,
        }
    }
}

impl Odds {
    /// Probability configured for the provided outcome.
    #[must_use]
    pub fn probability(&self, roll: Roll) -> f32 {
        match roll {
            Roll::BenchTurnsDirty => self.bench_dirty,
            Roll::TreadmillTurnsDirty => self.treadmill_dirty,
            Roll::TreadmillLeftRunning => self.treadmill_left_running,
            Roll::DumbbellsDropped => self.dumbbells_dropped,
            Roll::SquatRackStripped => self.squat_rack_stripped,
            Roll::VisitorCleansBench => self.visitor_cleans_bench,
            Roll::PrefersStation => self.prefers_station,
            Roll::OffPeakArrival => self.off_peak_arrival,
        }
    }
}

/// Visitor produced by the spawner and admitted into the roster.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Arrival {
    /// Stable identifier allocated by the spawner.
    pub visitor: VisitorId,
    /// Off-map center position the visitor appears at.
    pub position: WorldPoint,
    /// Simulation time of the arrival.
    pub arrived_at: Duration,
    /// Check-in queue slot the visitor walks to.
    pub queue_position: u32,
    /// Station type the visitor favours, if any.
    pub preferred: Option<StationType>,
}

/// Tuning of visitor movement and behavior timers.
///
/// Durations are stored in seconds so configuration files stay readable.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Timings {
    /// Walking speed in world pixels per second.
    pub visitor_speed: f32,
    /// Pause between two equipment selections of an idle visitor.
    pub behavior_interval_secs: f32,
    /// Time spent at the front desk while checking in.
    pub check_in_secs: f32,
    /// Time after arrival at which a visitor wants to leave.
    pub stay_secs: f32,
    /// Time after which a departing visitor is removed wherever it stands.
    pub departure_timeout_secs: f32,
    /// Distance in world pixels at which a waypoint counts as reached.
    pub waypoint_tolerance: f32,
    /// Distance in world pixels at which the trashcan counts as reached.
    pub trashcan_proximity: f32,
    /// Largest ring searched around equipment for a reachable standing tile.
    pub near_search_radius: u32,
    /// Number of targets tried before an idle visitor gives up for a while.
    pub selection_attempts: u32,
}

impl Default for Timings {
    fn default() -> Self {
        Self {
            visitor_speed: 30.0,
            behavior_interval_secs: 2.0,
            check_in_secs: 3.0,
            stay_secs: 180.0,
            departure_timeout_secs: 30.0,
            waypoint_tolerance: 3.0,
            trashcan_proximity: 20.0,
            near_search_radius: 2,
            selection_attempts: 4,
        }
    }
}

impl Timings {
    /// Pause between two equipment selections.
    #[must_use]
    pub fn behavior_interval(&self) -> Duration {
        seconds(self.behavior_interval_secs)
    }

    /// Duration of the front-desk check-in.
    #[must_use]
    pub fn check_in(&self) -> Duration {
        seconds(self.check_in_secs)
    }

    /// Stay length measured from arrival.
    #[must_use]
    pub fn stay(&self) -> Duration {
        seconds(self.stay_secs)
    }

    /// Hard limit on the length of a departure.
    #[must_use]
    pub fn departure_timeout(&self) -> Duration {
        seconds(self.departure_timeout_secs)
    }
}

fn seconds(value: f32) -> Duration {
    Duration::try_from_secs_f32(value).unwrap_or(Duration::ZERO)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::{de::DeserializeOwned, Serialize};

    #[test]
    fn manhattan_distance_matches_expectation() {
        let origin = CellCoord::new(1, 1);
        let destination = CellCoord::new(4, 3);
        assert_eq!(origin.manhattan_distance(destination), 5);
        assert_eq!(destination.manhattan_distance(origin), 5);
    }

    #[test]
    fn chebyshev_distance_takes_the_longer_axis() {
        let origin = CellCoord::new(2, 3);
        assert_eq!(origin.chebyshev_distance(CellCoord::new(9, 5)), 7);
        assert_eq!(origin.chebyshev_distance(origin), 0);
    }

    #[test]
    fn cell_center_sits_mid_tile() {
        let center = CellCoord::new(3, 10).center();
        assert_eq!(center, WorldPoint::new(56.0, 168.0));
    }

    #[test]
    fn touching_rectangles_do_not_intersect() {
        let left = Rect::new(0.0, 0.0, 16.0, 16.0);
        let right = Rect::new(16.0, 0.0, 16.0, 16.0);
        let overlapping = Rect::new(15.0, 15.0, 4.0, 4.0);
        assert!(!left.intersects(&right));
        assert!(left.intersects(&overlapping));
        assert!(right.intersects(&overlapping));
    }

    #[test]
    fn tile_codes_round_trip() {
        for code in 0..7 {
            let kind = EquipmentKind::from_tile_code(code).expect("known code");
            assert_eq!(kind.tile_code(), code);
        }
        assert_eq!(EquipmentKind::from_tile_code(-1), None);
        assert_eq!(EquipmentKind::from_tile_code(7), None);
    }

    #[test]
    fn small_bench_shares_the_bench_station() {
        assert_eq!(EquipmentKind::SmallBench.station(), Some(StationType::Bench));
        assert_eq!(EquipmentKind::Trashcan.station(), None);
        assert_eq!(EquipmentKind::FrontDesk.station(), None);
    }

    fn assert_round_trip<T>(value: &T)
    where
        T: Serialize + DeserializeOwned + PartialEq + std::fmt::Debug,
    {
        let bytes = bincode::serialize(value).expect("serialize");
        let restored: T = bincode::deserialize(&bytes).expect("deserialize");
        assert_eq!(&restored, value);
    }

    #[test]
    fn odds_round_trip_through_bincode() {
        let odds = Odds {
            dumbbells_dropped: 0.9,
            ..Odds::default()
        };
        assert_round_trip(&odds);
    }

    #[test]
    fn timings_convert_seconds_to_durations() {
        let timings = Timings {
            stay_secs: 90.5,
            check_in_secs: -1.0,
            ..Timings::default()
        };
        assert_eq!(timings.stay(), Duration::from_millis(90_500));
        assert_eq!(timings.check_in(), Duration::ZERO);
        assert_eq!(timings.behavior_interval(), Duration::from_secs(2));
        assert_round_trip(&timings);
    }

    #[test]
    fn default_odds_follow_each_roll() {
        let odds = Odds::default();
        assert!((odds.probability(Roll::BenchTurnsDirty) - 1.0).abs() < f32::EPSILON);
        assert!((odds.probability(Roll::DumbbellsDropped) - 0.4).abs() < f32::EPSILON);
        assert!((odds.probability(Roll::SquatRackStripped) - 0.5).abs() < f32::EPSILON);
        assert!((odds.probability(Roll::VisitorCleansBench) - 0.4).abs() < f32::EPSILON);
    }
}
