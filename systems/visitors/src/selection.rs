//! Choosing the next workout station for an idle visitor.

use gym_floor_core::{CellCoord, EquipmentId, StationType, WorldPoint};
use gym_floor_world::{query, Equipment};
use tracing::debug;

use crate::visitor::{Context, Visitor};

/// Outcome of one round of station selection.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) enum Selection {
    /// A station and the path leading to it.
    Station(EquipmentId, Vec<CellCoord>),
    /// Stations exist but none could be reached.
    Unreachable,
    /// The floor offers no station the visitor may use.
    NoCandidates,
}

/// Picks a station and a path to it, honouring the variety rule.
///
/// The station type used last is never picked twice in a row. A preferred
/// type wins whenever it has candidates; otherwise a type and then a
/// candidate are drawn at random. Types whose candidates turned out to be
/// unreachable are skipped on the following attempts.
pub(crate) fn choose(visitor: &Visitor, ctx: &mut Context<'_>) -> Selection {
    let origin = visitor.search_origin(ctx);
    let mut exhausted: Vec<StationType> = Vec::new();

    for _ in 0..ctx.config.timings.selection_attempts.max(1) {
        let candidates = candidates_by_type(ctx, visitor.last_station(), &exhausted);
        if candidates.is_empty() {
            return if exhausted.is_empty() {
                Selection::NoCandidates
            } else {
                Selection::Unreachable
            };
        }

        let preferred = visitor
            .preferred()
            .and_then(|preferred| candidates.iter().find(|(station, _)| *station == preferred));
        let (station, equipment) = match preferred {
            Some(entry) => entry.clone(),
            None => {
                let index = ctx.world.chance_mut().pick(candidates.len());
                candidates[index].clone()
            }
        };
        let index = ctx.world.chance_mut().pick(equipment.len());
        let (id, standing) = equipment[index];

        let radius = ctx.config.timings.near_search_radius;
        let path = ctx
            .world
            .find_path(origin, standing, false)
            .or_else(|| ctx.world.find_path_near(origin, id, false, radius));
        if let Some(path) = path {
            return Selection::Station(id, path);
        }
        debug!(
            visitor = visitor.id().get(),
            equipment = id.get(),
            ?station,
            "station unreachable"
        );
        exhausted.push(station);
    }
    Selection::Unreachable
}

type Candidates = Vec<(StationType, Vec<(EquipmentId, WorldPoint)>)>;

fn candidates_by_type(
    ctx: &Context<'_>,
    last: Option<StationType>,
    exhausted: &[StationType],
) -> Candidates {
    let registry = query::equipment(ctx.world);
    StationType::ALL
        .into_iter()
        .filter(|station| Some(*station) != last && !exhausted.contains(station))
        .filter_map(|station| {
            let equipment: Vec<_> = registry
                .stations(station)
                .filter(|equipment| offered(station, equipment))
                .map(|equipment| (equipment.id(), standing_point(equipment)))
                .collect();
            (!equipment.is_empty()).then_some((station, equipment))
        })
        .collect()
}

/// Dumbbell racks are only offered while they can lend a pair; other
/// stations are claimed or rejected on arrival.
fn offered(station: StationType, equipment: &Equipment) -> bool {
    match station {
        StationType::DumbbellRack => equipment.is_available(),
        StationType::Treadmill | StationType::Bench | StationType::SquatRack => true,
    }
}

/// Point one tile below the middle of the equipment's bottom edge.
#[must_use]
pub fn standing_point(equipment: &Equipment) -> WorldPoint {
    let rect = equipment.collision_rect();
    WorldPoint::new(rect.center().x(), rect.bottom() + 16.0)
}
