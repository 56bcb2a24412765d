//! Per-visitor behavior controller.

use std::time::Duration;

use gym_floor_core::{
    AgentKind, CellCoord, EquipmentId, EquipmentKind, Event, Facing, HitboxSet, Roll, StationType,
    VisitorId, WorldPoint,
};
use gym_floor_world::{query, sprite_origin, World};
use tracing::{debug, info, trace, warn};

use crate::{
    selection::{self, Selection},
    Config,
};

mod cleaning;

/// Vertical distance between a visitor's center and the point it stands on.
const PIVOT_DROP: f32 = 4.0;
/// Distance from a tile center within which the facing may change.
const FACING_WINDOW: f32 = 4.0;
const SPRITE_WIDTH: f32 = 16.0;
const SPRITE_HEIGHT: f32 = 32.0;
/// Random cells tried before a visitor with nothing to do stays put.
const WANDER_ATTEMPTS: usize = 20;

/// Coarse activity of a visitor, as seen by renderers and tests.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Activity {
    /// Waiting for the next decision.
    Idle,
    /// Walking along a path.
    Moving,
    /// Checking in, working out or cleaning.
    Interacting,
    /// Walking out of the gym.
    Departing,
}

/// Sub-behavior entered after leaving a dirty bench behind.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum CleaningPhase {
    /// Fetching supplies from the nearest trashcan.
    GoingToTrashcan,
    /// Walking back to the dirty bench.
    ReturningToBench,
    /// Wiping the bench down.
    CleaningBench,
}

/// Why a visitor is walking.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Errand {
    Queue,
    Workout(EquipmentId),
    Trashcan(EquipmentId),
    Bench,
    Wander,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Task {
    CheckIn { elapsed: Duration },
    Workout(EquipmentId),
    Cleaning,
}

#[derive(Clone, Debug, PartialEq)]
pub(crate) enum State {
    Idle,
    Moving {
        path: Vec<CellCoord>,
        cursor: usize,
        errand: Errand,
        blocked_for: Duration,
    },
    Interacting(Task),
    Departing {
        path: Option<Vec<CellCoord>>,
        cursor: usize,
        elapsed: Duration,
        since_plan: Duration,
    },
}

/// Result of advancing one visitor, consumed by the roster.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub(crate) struct Outcome {
    pub(crate) left_queue: Option<u32>,
}

/// Shared state handed to a visitor while it updates.
pub(crate) struct Context<'a> {
    pub(crate) world: &'a mut World,
    pub(crate) config: &'a Config,
    pub(crate) now: Duration,
    pub(crate) events: &'a mut Vec<Event>,
}

/// One autonomous gym visitor.
#[derive(Clone, Debug, PartialEq)]
pub struct Visitor {
    id: VisitorId,
    center: WorldPoint,
    facing: Facing,
    hidden: bool,
    working_out: bool,
    checked_in: bool,
    queue_position: Option<u32>,
    pub(crate) state: State,
    pub(crate) cleaning: Option<(CleaningPhase, EquipmentId)>,
    target: Option<EquipmentId>,
    last_station: Option<StationType>,
    preferred: Option<StationType>,
    arrived_at: Duration,
    behavior_timer: Duration,
    departure_pending: bool,
    pending_dirty_check: Option<EquipmentId>,
    removed: bool,
}

impl Visitor {
    pub(crate) fn new(
        id: VisitorId,
        center: WorldPoint,
        arrived_at: Duration,
        queue_position: u32,
        preferred: Option<StationType>,
        behavior_interval: Duration,
    ) -> Self {
        Self {
            id,
            center,
            facing: Facing::Right,
            hidden: false,
            working_out: false,
            checked_in: false,
            queue_position: Some(queue_position),
            state: State::Idle,
            cleaning: None,
            target: None,
            last_station: None,
            preferred,
            arrived_at,
            behavior_timer: behavior_interval,
            departure_pending: false,
            pending_dirty_check: None,
            removed: false,
        }
    }

    /// Stable identifier.
    #[must_use]
    pub const fn id(&self) -> VisitorId {
        self.id
    }

    /// Center of the visitor's sprite in world pixels.
    #[must_use]
    pub const fn position(&self) -> WorldPoint {
        self.center
    }

    /// Point the visitor stands on; paths and waypoints are measured from it.
    #[must_use]
    pub fn pivot(&self) -> WorldPoint {
        self.center.offset(0.0, PIVOT_DROP)
    }

    /// Direction the sprite faces.
    #[must_use]
    pub const fn facing(&self) -> Facing {
        self.facing
    }

    /// Coarse activity.
    #[must_use]
    pub fn activity(&self) -> Activity {
        match self.state {
            State::Idle => Activity::Idle,
            State::Moving { .. } => Activity::Moving,
            State::Interacting(_) => Activity::Interacting,
            State::Departing { .. } => Activity::Departing,
        }
    }

    /// Cleaning sub-phase, if the visitor is cleaning up after itself.
    #[must_use]
    pub fn cleaning_phase(&self) -> Option<CleaningPhase> {
        self.cleaning.map(|(phase, _)| phase)
    }

    /// Whether the sprite is hidden behind the equipment being used.
    #[must_use]
    pub const fn is_hidden(&self) -> bool {
        self.hidden
    }

    /// Whether the visitor is lifting dumbbells in front of a rack.
    #[must_use]
    pub const fn is_working_out(&self) -> bool {
        self.working_out
    }

    /// Whether the visitor completed check-in.
    #[must_use]
    pub const fn is_checked_in(&self) -> bool {
        self.checked_in
    }

    /// Check-in queue slot, `None` once checked in or leaving.
    #[must_use]
    pub const fn queue_position(&self) -> Option<u32> {
        self.queue_position
    }

    /// Equipment the visitor is heading to or using.
    #[must_use]
    pub const fn target(&self) -> Option<EquipmentId> {
        self.target
    }

    /// Station type of the last completed workout.
    #[must_use]
    pub const fn last_station(&self) -> Option<StationType> {
        self.last_station
    }

    /// Station type the visitor favours.
    #[must_use]
    pub const fn preferred(&self) -> Option<StationType> {
        self.preferred
    }

    /// Simulation time the visitor arrived at.
    #[must_use]
    pub const fn arrived_at(&self) -> Duration {
        self.arrived_at
    }

    /// Whether the stay ran out and the visitor leaves at the next chance.
    #[must_use]
    pub const fn is_departure_pending(&self) -> bool {
        self.departure_pending
    }

    /// Whether the roster may drop the visitor.
    #[must_use]
    pub const fn is_ready_to_remove(&self) -> bool {
        self.removed
    }

    pub(crate) fn set_queue_position(&mut self, position: u32) {
        self.queue_position = Some(position);
    }

    /// Advances the visitor by `dt`.
    pub(crate) fn update(&mut self, ctx: &mut Context<'_>, dt: Duration) -> Outcome {
        let mut outcome = Outcome::default();

        if matches!(self.state, State::Departing { .. }) {
            self.update_departure(ctx, dt);
            return outcome;
        }

        let stay = ctx.now.saturating_sub(self.arrived_at);
        if !self.departure_pending && stay >= ctx.config.timings.stay() {
            self.departure_pending = true;
            debug!(visitor = self.id.get(), "departure pending");
        }
        if self.departure_pending && self.can_depart_now() {
            self.start_departure(ctx, &mut outcome);
            return outcome;
        }

        match self.state.clone() {
            State::Idle => self.update_idle(ctx, dt, &mut outcome),
            State::Moving { .. } => self.update_moving(ctx, dt, &mut outcome),
            State::Interacting(task) => self.update_interacting(ctx, dt, task, &mut outcome),
            State::Departing { .. } => {}
        }
        outcome
    }

    /// Idle or walking without a committed interaction.
    fn can_depart_now(&self) -> bool {
        if self.cleaning.is_some() || self.pending_dirty_check.is_some() {
            return false;
        }
        match self.state {
            State::Idle => true,
            State::Moving { errand, .. } => {
                matches!(errand, Errand::Queue | Errand::Workout(_) | Errand::Wander)
            }
            State::Interacting(_) | State::Departing { .. } => false,
        }
    }

    fn update_idle(&mut self, ctx: &mut Context<'_>, dt: Duration, outcome: &mut Outcome) {
        if let Some(bench) = self.pending_dirty_check.take() {
            let dirty =
                query::equipment_by_id(ctx.world, bench).is_some_and(|bench| bench.is_dirty());
            if dirty && ctx.world.chance_mut().roll(Roll::VisitorCleansBench) {
                self.go_to_trashcan(ctx, bench, outcome);
            } else {
                self.finish_normally(ctx, outcome);
            }
            return;
        }

        self.behavior_timer = self.behavior_timer.saturating_add(dt);

        if !self.checked_in {
            self.update_queue(ctx);
            return;
        }

        if self.behavior_timer < ctx.config.timings.behavior_interval() {
            return;
        }
        self.behavior_timer = Duration::ZERO;
        match selection::choose(self, ctx) {
            Selection::Station(equipment, path) => {
                debug!(
                    visitor = self.id.get(),
                    equipment = equipment.get(),
                    "heading to equipment"
                );
                self.walk(path, Errand::Workout(equipment));
            }
            Selection::Unreachable => {
                debug!(visitor = self.id.get(), "no station reachable, waiting");
            }
            Selection::NoCandidates => self.wander(ctx),
        }
    }

    fn update_queue(&mut self, ctx: &mut Context<'_>) {
        let Some(position) = self.queue_position else {
            return;
        };
        let slot = queue_slot(ctx.config.layout.queue_head, position);
        let tolerance = ctx.config.timings.waypoint_tolerance;
        if self.pivot().distance(slot.center()) <= tolerance {
            if position == 0 {
                debug!(visitor = self.id.get(), "checking in");
                self.state = State::Interacting(Task::CheckIn {
                    elapsed: Duration::ZERO,
                });
            }
            return;
        }

        if self.behavior_timer < ctx.config.timings.behavior_interval() {
            return;
        }
        self.behavior_timer = Duration::ZERO;
        self.walk_to_queue(ctx);
    }

    /// Paths to the current queue slot; stays idle when the slot is unreachable.
    pub(crate) fn walk_to_queue(&mut self, ctx: &mut Context<'_>) {
        let Some(position) = self.queue_position else {
            return;
        };
        let head = ctx.config.layout.queue_head;
        if position > head.column() {
            warn!(visitor = self.id.get(), position, "queue slot off the map, clamped");
        }
        let slot = queue_slot(head, position);
        match self.route(ctx, slot.center()) {
            Some(path) => {
                debug!(visitor = self.id.get(), position, "walking to queue slot");
                self.walk(path, Errand::Queue);
            }
            None => {
                debug!(visitor = self.id.get(), position, "queue slot unreachable");
                self.state = State::Idle;
            }
        }
    }

    /// Re-plans after the queue moved up, unless busy elsewhere.
    pub(crate) fn requeue(&mut self, ctx: &mut Context<'_>) {
        let queued_walk = matches!(
            self.state,
            State::Moving {
                errand: Errand::Queue,
                ..
            }
        );
        if matches!(self.state, State::Idle) || queued_walk {
            self.walk_to_queue(ctx);
        }
    }

    /// Completes check-in regardless of the visitor's place in the queue.
    pub(crate) fn check_in(&mut self, ctx: &mut Context<'_>, outcome: &mut Outcome) -> bool {
        if self.checked_in || matches!(self.state, State::Departing { .. }) {
            return false;
        }
        self.checked_in = true;
        outcome.left_queue = self.queue_position.take();
        self.state = State::Idle;
        // selection runs on the next update
        self.behavior_timer = ctx.config.timings.behavior_interval();
        info!(visitor = self.id.get(), "visitor checked in");
        ctx.events.push(Event::VisitorCheckedIn { visitor: self.id });
        if self.departure_pending {
            self.start_departure(ctx, outcome);
        }
        true
    }

    fn update_moving(&mut self, ctx: &mut Context<'_>, dt: Duration, outcome: &mut Outcome) {
        let State::Moving {
            path,
            mut cursor,
            errand,
            mut blocked_for,
        } = self.state.clone()
        else {
            return;
        };

        if let Errand::Trashcan(trashcan) = errand {
            let close = query::equipment_by_id(ctx.world, trashcan).is_some_and(|trashcan| {
                self.pivot().distance(trashcan.position()) <= ctx.config.timings.trashcan_proximity
            });
            if close {
                self.at_trashcan(ctx, outcome);
                return;
            }
        }

        let Some(cell) = path.get(cursor).copied() else {
            self.arrive(ctx, errand, outcome);
            return;
        };

        match self.step_towards(ctx, cell.center(), dt, true) {
            Step::Reached => {
                cursor += 1;
                blocked_for = Duration::ZERO;
            }
            Step::Advanced => blocked_for = Duration::ZERO,
            Step::Blocked => blocked_for = blocked_for.saturating_add(dt),
        }

        if cursor >= path.len() {
            self.arrive(ctx, errand, outcome);
            return;
        }

        if blocked_for >= ctx.config.timings.behavior_interval() {
            debug!(visitor = self.id.get(), ?errand, "stuck on the way, giving up");
            self.give_up(ctx, errand, outcome);
            return;
        }

        self.state = State::Moving {
            path,
            cursor,
            errand,
            blocked_for,
        };
    }

    fn give_up(&mut self, ctx: &mut Context<'_>, errand: Errand, outcome: &mut Outcome) {
        match errand {
            Errand::Queue | Errand::Wander => {
                self.state = State::Idle;
                self.behavior_timer = Duration::ZERO;
            }
            Errand::Workout(_) => {
                self.target = None;
                self.state = State::Idle;
                self.behavior_timer = Duration::ZERO;
            }
            Errand::Trashcan(_) | Errand::Bench => self.abandon_cleaning(ctx, outcome),
        }
    }

    fn arrive(&mut self, ctx: &mut Context<'_>, errand: Errand, outcome: &mut Outcome) {
        self.state = State::Idle;
        match errand {
            Errand::Queue | Errand::Wander => {}
            Errand::Workout(id) => self.begin_workout(ctx, id),
            Errand::Trashcan(_) => self.at_trashcan(ctx, outcome),
            Errand::Bench => self.at_bench(ctx, outcome),
        }
    }

    fn begin_workout(&mut self, ctx: &mut Context<'_>, id: EquipmentId) {
        if self.cleaning.is_some() {
            return;
        }
        if !ctx.world.start_interaction(id, self.id, ctx.events) {
            debug!(visitor = self.id.get(), equipment = id.get(), "equipment taken, back to idle");
            self.target = None;
            self.behavior_timer = Duration::ZERO;
            return;
        }

        match query::equipment_by_id(ctx.world, id).map(|equipment| equipment.kind()) {
            Some(EquipmentKind::DumbbellRack) => self.working_out = true,
            Some(EquipmentKind::FrontDesk) | None => {}
            Some(_) => self.hidden = true,
        }
        self.state = State::Interacting(Task::Workout(id));
    }

    fn update_interacting(
        &mut self,
        ctx: &mut Context<'_>,
        dt: Duration,
        task: Task,
        outcome: &mut Outcome,
    ) {
        match task {
            Task::CheckIn { elapsed } => {
                let elapsed = elapsed.saturating_add(dt);
                if elapsed >= ctx.config.timings.check_in() {
                    let _ = self.check_in(ctx, outcome);
                } else {
                    self.state = State::Interacting(Task::CheckIn { elapsed });
                }
            }
            Task::Workout(id) => {
                let equipment = query::equipment_by_id(ctx.world, id);
                let still_using =
                    equipment.is_some_and(|equipment| equipment.occupant() == Some(self.id));
                if !still_using {
                    let kind = equipment.map(|equipment| equipment.kind());
                    self.complete_workout(ctx, id, kind, outcome);
                }
            }
            Task::Cleaning => self.poll_cleaning(ctx, outcome),
        }
    }

    fn complete_workout(
        &mut self,
        ctx: &mut Context<'_>,
        id: EquipmentId,
        kind: Option<EquipmentKind>,
        outcome: &mut Outcome,
    ) {
        self.hidden = false;
        self.working_out = false;
        self.target = None;
        self.state = State::Idle;
        if let Some(station) = kind.and_then(EquipmentKind::station) {
            self.last_station = Some(station);
        }
        debug!(visitor = self.id.get(), equipment = id.get(), "workout finished");

        if matches!(kind, Some(EquipmentKind::Bench | EquipmentKind::SmallBench)) {
            self.pending_dirty_check = Some(id);
        } else {
            self.finish_normally(ctx, outcome);
        }
    }

    /// Ends whatever the visitor was doing and starts a pending departure.
    pub(crate) fn finish_normally(&mut self, ctx: &mut Context<'_>, outcome: &mut Outcome) {
        self.cleaning = None;
        self.target = None;
        self.state = State::Idle;
        self.behavior_timer = Duration::ZERO;
        if self.departure_pending {
            self.start_departure(ctx, outcome);
        }
    }

    fn start_departure(&mut self, ctx: &mut Context<'_>, outcome: &mut Outcome) {
        if let Some(position) = self.queue_position.take() {
            outcome.left_queue = Some(position);
        }
        self.departure_pending = true;
        self.target = None;
        self.cleaning = None;
        self.pending_dirty_check = None;
        self.hidden = false;
        self.working_out = false;

        let path = self.route_out(ctx);
        info!(visitor = self.id.get(), "visitor departing");
        ctx.events.push(Event::VisitorDeparting { visitor: self.id });
        self.state = State::Departing {
            path,
            cursor: 0,
            elapsed: Duration::ZERO,
            since_plan: Duration::ZERO,
        };
    }

    fn route_out(&self, ctx: &mut Context<'_>) -> Option<Vec<CellCoord>> {
        let staging = ctx.config.layout.entrance.center();
        let path = self.route(ctx, staging);
        if path.is_none() {
            debug!(visitor = self.id.get(), "no way to the entrance yet");
        }
        path
    }

    fn update_departure(&mut self, ctx: &mut Context<'_>, dt: Duration) {
        let State::Departing {
            path,
            mut cursor,
            elapsed,
            mut since_plan,
        } = self.state.clone()
        else {
            return;
        };

        let elapsed = elapsed.saturating_add(dt);
        if elapsed >= ctx.config.timings.departure_timeout() {
            warn!(visitor = self.id.get(), "departure timed out, removing visitor");
            self.remove(ctx, true);
            return;
        }

        let Some(path) = path else {
            // replan on the behavior clock until the timeout gives up
            since_plan = since_plan.saturating_add(dt);
            let path = if since_plan >= ctx.config.timings.behavior_interval() {
                since_plan = Duration::ZERO;
                self.route_out(ctx)
            } else {
                None
            };
            self.state = State::Departing {
                path,
                cursor: 0,
                elapsed,
                since_plan,
            };
            return;
        };

        let (goal, leg) = match path.get(cursor) {
            Some(cell) => (cell.center(), "entrance"),
            None => (ctx.config.layout.exit_point.offset(0.0, PIVOT_DROP), "exit"),
        };
        match self.step_towards(ctx, goal, dt, true) {
            Step::Reached if cursor < path.len() => cursor += 1,
            Step::Reached | Step::Advanced => {}
            Step::Blocked => trace!(visitor = self.id.get(), leg, "departure blocked"),
        }

        if self.is_off_map(ctx.world) {
            self.remove(ctx, false);
            return;
        }

        self.state = State::Departing {
            path: Some(path),
            cursor,
            elapsed,
            since_plan,
        };
    }

    fn remove(&mut self, ctx: &mut Context<'_>, timed_out: bool) {
        if self.removed {
            return;
        }
        self.removed = true;
        info!(visitor = self.id.get(), timed_out, "visitor left");
        ctx.events.push(Event::VisitorLeft {
            visitor: self.id,
            timed_out,
        });
    }

    /// Where path searches begin. A visitor standing on a cell the grid
    /// blocks, such as the row in front of an occupied bench, searches from
    /// the closest walkable cell and walks onto it first.
    pub(crate) fn search_origin(&self, ctx: &mut Context<'_>) -> WorldPoint {
        let pivot = self.pivot();
        let radius = ctx.config.timings.near_search_radius.max(1);
        ctx.world
            .nearest_walkable(pivot, radius)
            .map_or(pivot, CellCoord::center)
    }

    pub(crate) fn route(&self, ctx: &mut Context<'_>, goal: WorldPoint) -> Option<Vec<CellCoord>> {
        let origin = self.search_origin(ctx);
        ctx.world.find_path(origin, goal, false)
    }

    /// Strolls to a random walkable cell when no station is on offer.
    fn wander(&mut self, ctx: &mut Context<'_>) {
        let _ = ctx.world.rebuild_if_dirty();
        let grid = query::pathfinding(ctx.world);
        let columns = grid.columns();
        let cells = usize::try_from(columns.saturating_mul(grid.rows())).unwrap_or(0);
        if cells == 0 {
            return;
        }

        for _ in 0..WANDER_ATTEMPTS {
            let index = u32::try_from(ctx.world.chance_mut().pick(cells)).unwrap_or(0);
            let cell = CellCoord::new(index % columns, index / columns);
            if !query::pathfinding(ctx.world).is_walkable(cell) {
                continue;
            }
            if let Some(path) = self.route(ctx, cell.center()) {
                debug!(visitor = self.id.get(), ?cell, "wandering");
                self.walk(path, Errand::Wander);
                return;
            }
        }
    }

    /// Starts walking along `path` for the provided errand.
    pub(crate) fn walk(&mut self, path: Vec<CellCoord>, errand: Errand) {
        if let Errand::Workout(id) = errand {
            self.target = Some(id);
        }
        self.state = State::Moving {
            path,
            cursor: 0,
            errand,
            blocked_for: Duration::ZERO,
        };
    }

    /// Moves the pivot towards `goal`, at most `speed * dt`.
    fn step_towards(
        &mut self,
        ctx: &Context<'_>,
        goal: WorldPoint,
        dt: Duration,
        collide: bool,
    ) -> Step {
        let tolerance = ctx.config.timings.waypoint_tolerance;
        let pivot = self.pivot();
        let distance = pivot.distance(goal);
        if distance <= tolerance {
            return Step::Reached;
        }

        let travel = (ctx.config.timings.visitor_speed * dt.as_secs_f32()).min(distance);
        let dx = (goal.x() - pivot.x()) / distance * travel;
        let dy = (goal.y() - pivot.y()) / distance * travel;
        let next = self.center.offset(dx, dy);

        if collide {
            let agent = self.agent_kind(ctx.world, next);
            if !ctx
                .world
                .can_occupy(sprite_origin(next), &HitboxSet::HUMANOID, agent)
            {
                return Step::Blocked;
            }
        }

        let cell_center = query::pathfinding(ctx.world)
            .world_to_grid(pivot)
            .center();
        if pivot.distance(cell_center) <= FACING_WINDOW {
            self.facing = facing_for(dx, dy);
        }
        self.center = next;

        if self.pivot().distance(goal) <= tolerance {
            Step::Reached
        } else {
            Step::Advanced
        }
    }

    /// Visitors whose sprite overlaps the map edge walk through the entrance.
    fn agent_kind(&self, world: &World, center: WorldPoint) -> AgentKind {
        let tiles = query::tiles(world);
        let origin = sprite_origin(center);
        let inside = origin.x() >= 0.0
            && origin.y() >= 0.0
            && origin.x() + SPRITE_WIDTH <= tiles.width()
            && origin.y() + SPRITE_HEIGHT <= tiles.height();
        if inside {
            AgentKind::Visitor
        } else {
            AgentKind::Transit
        }
    }

    fn is_off_map(&self, world: &World) -> bool {
        let tiles = query::tiles(world);
        let origin = sprite_origin(self.center);
        origin.x() + SPRITE_WIDTH < 0.0
            || origin.y() + SPRITE_HEIGHT < 0.0
            || origin.x() > tiles.width()
            || origin.y() > tiles.height()
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Step {
    Reached,
    Advanced,
    Blocked,
}

fn facing_for(dx: f32, dy: f32) -> Facing {
    if dx.abs() >= dy.abs() {
        if dx < 0.0 {
            Facing::Left
        } else {
            Facing::Right
        }
    } else if dy < 0.0 {
        Facing::Up
    } else {
        Facing::Down
    }
}

/// Queue slot `position` cells west of the head, clamped to the first column.
#[must_use]
pub fn queue_slot(head: CellCoord, position: u32) -> CellCoord {
    CellCoord::new(head.column().saturating_sub(position), head.row())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn queue_slots_extend_west_and_clamp() {
        let head = CellCoord::new(8, 11);
        assert_eq!(queue_slot(head, 0), head);
        assert_eq!(queue_slot(head, 3), CellCoord::new(5, 11));
        assert_eq!(queue_slot(head, 12), CellCoord::new(0, 11));
    }

    #[test]
    fn facing_follows_the_dominant_axis() {
        assert_eq!(facing_for(1.0, 0.5), Facing::Right);
        assert_eq!(facing_for(-1.0, 0.5), Facing::Left);
        assert_eq!(facing_for(0.2, -1.0), Facing::Up);
        assert_eq!(facing_for(0.0, 1.0), Facing::Down);
    }
}
