//! Wiping down a dirty bench: trashcan, back to the bench, clean.

use gym_floor_core::{CellCoord, EquipmentId, EquipmentKind, StationType, WorldPoint, TILE_LENGTH};
use gym_floor_world::query;
use tracing::{debug, info};

use super::{CleaningPhase, Context, Errand, Outcome, State, Task, Visitor};

/// Standing spots tried around a trashcan, relative to its position.
const TRASHCAN_APPROACHES: [(f32, f32); 6] = [
    (16.0, 8.0),
    (-16.0, 8.0),
    (0.0, 35.0),
    (0.0, -16.0),
    (8.0, 8.0),
    (-8.0, 8.0),
];

/// Standing spots tried in front of a bench, relative to the tile below its anchor.
const BENCH_APPROACHES: [(f32, f32); 6] = [
    (0.0, 0.0),
    (16.0, 0.0),
    (-16.0, 0.0),
    (0.0, 16.0),
    (8.0, 8.0),
    (-8.0, 8.0),
];

impl Visitor {
    pub(super) fn go_to_trashcan(
        &mut self,
        ctx: &mut Context<'_>,
        bench: EquipmentId,
        outcome: &mut Outcome,
    ) {
        let Some(bench_position) =
            query::equipment_by_id(ctx.world, bench).map(|bench| bench.position())
        else {
            self.finish_normally(ctx, outcome);
            return;
        };
        let trashcan = query::equipment(ctx.world)
            .nearest(EquipmentKind::Trashcan, bench_position)
            .map(|trashcan| (trashcan.id(), trashcan.position()));
        let Some((trashcan, position)) = trashcan else {
            debug!(visitor = self.id.get(), "no trashcan on the floor");
            self.finish_normally(ctx, outcome);
            return;
        };

        match self.path_via(ctx, position, &TRASHCAN_APPROACHES) {
            Some(path) => {
                info!(
                    visitor = self.id.get(),
                    bench = bench.get(),
                    "visitor cleaning up after itself"
                );
                self.cleaning = Some((CleaningPhase::GoingToTrashcan, bench));
                self.walk(path, Errand::Trashcan(trashcan));
            }
            None => {
                debug!(visitor = self.id.get(), "trashcan unreachable");
                self.finish_normally(ctx, outcome);
            }
        }
    }

    pub(super) fn at_trashcan(&mut self, ctx: &mut Context<'_>, outcome: &mut Outcome) {
        let Some((_, bench)) = self.cleaning else {
            self.finish_normally(ctx, outcome);
            return;
        };
        let Some(anchor) = self.dirty_bench_anchor(ctx, bench) else {
            debug!(visitor = self.id.get(), bench = bench.get(), "bench already clean");
            self.finish_normally(ctx, outcome);
            return;
        };

        let front = WorldPoint::new(
            anchor.column() as f32 * TILE_LENGTH + TILE_LENGTH / 2.0,
            (anchor.row() + 1) as f32 * TILE_LENGTH + TILE_LENGTH / 2.0,
        );
        match self.path_via(ctx, front, &BENCH_APPROACHES) {
            Some(path) => {
                self.cleaning = Some((CleaningPhase::ReturningToBench, bench));
                self.walk(path, Errand::Bench);
            }
            None => {
                debug!(visitor = self.id.get(), "bench unreachable from the trashcan");
                self.abandon_cleaning(ctx, outcome);
            }
        }
    }

    pub(super) fn at_bench(&mut self, ctx: &mut Context<'_>, outcome: &mut Outcome) {
        let Some((_, bench)) = self.cleaning else {
            self.finish_normally(ctx, outcome);
            return;
        };
        if self.dirty_bench_anchor(ctx, bench).is_none()
            || !ctx.world.start_cleaning(bench, ctx.events)
        {
            self.finish_normally(ctx, outcome);
            return;
        }
        self.cleaning = Some((CleaningPhase::CleaningBench, bench));
        self.state = State::Interacting(Task::Cleaning);
    }

    pub(super) fn poll_cleaning(&mut self, ctx: &mut Context<'_>, outcome: &mut Outcome) {
        let Some((_, bench)) = self.cleaning else {
            self.finish_normally(ctx, outcome);
            return;
        };
        let cleaning = query::equipment_by_id(ctx.world, bench).is_some_and(|b| b.is_cleaning());
        if cleaning {
            return;
        }
        info!(visitor = self.id.get(), bench = bench.get(), "bench cleaned");
        self.last_station = Some(StationType::Bench);
        self.finish_normally(ctx, outcome);
    }

    pub(super) fn abandon_cleaning(&mut self, ctx: &mut Context<'_>, outcome: &mut Outcome) {
        debug!(visitor = self.id.get(), "cleaning abandoned");
        self.finish_normally(ctx, outcome);
    }

    fn dirty_bench_anchor(&self, ctx: &Context<'_>, bench: EquipmentId) -> Option<CellCoord> {
        query::equipment_by_id(ctx.world, bench)
            .filter(|bench| bench.is_dirty())
            .map(|bench| bench.anchor())
    }

    /// First path found to one of the offsets around `around`.
    fn path_via(
        &self,
        ctx: &mut Context<'_>,
        around: WorldPoint,
        offsets: &[(f32, f32)],
    ) -> Option<Vec<CellCoord>> {
        let origin = self.search_origin(ctx);
        offsets
            .iter()
            .find_map(|&(dx, dy)| ctx.world.find_path(origin, around.offset(dx, dy), false))
    }
}
