//! Movement permission checks shared by the player and visitors.

use gym_floor_core::{AgentKind, HitboxSet, WorldPoint};

use crate::{equipment::EquipmentRegistry, tiles::TileMap};

/// Read-only view answering whether an agent may stand somewhere.
#[derive(Clone, Copy, Debug)]
pub struct CollisionOracle<'a> {
    tiles: &'a TileMap,
    equipment: &'a EquipmentRegistry,
}

impl<'a> CollisionOracle<'a> {
    /// Creates an oracle over the static walls and the registered equipment.
    #[must_use]
    pub const fn new(tiles: &'a TileMap, equipment: &'a EquipmentRegistry) -> Self {
        Self { tiles, equipment }
    }

    /// Reports whether a sprite with its top-left corner at `origin` fits.
    ///
    /// Wall probes that land on collidable or off-map tiles block the move,
    /// as does any hitbox overlapping an equipment collision rectangle.
    /// [`AgentKind::Transit`] agents pass off-map probes and ignore equipment.
    #[must_use]
    pub fn can_occupy(&self, origin: WorldPoint, hitboxes: &HitboxSet, agent: AgentKind) -> bool {
        let transit = agent == AgentKind::Transit;

        for &(dx, dy) in hitboxes.probes() {
            match self.tiles.cell_at(origin.offset(dx, dy)) {
                Some(cell) if self.tiles.is_collidable(cell) => return false,
                Some(_) => {}
                None if transit => {}
                None => return false,
            }
        }

        if transit {
            return true;
        }

        hitboxes.boxes().iter().all(|hitbox| {
            let body = hitbox.at(origin);
            self.equipment
                .collision_objects()
                .all(|(rect, _)| !rect.intersects(&body))
        })
    }
}
