//! Lazily rebuilt obstacle cache and A* search shared by every agent.

use std::{cmp::Ordering, collections::BinaryHeap, f32::consts::SQRT_2};

use gym_floor_core::{CellCoord, Rect, WorldPoint, TILE_LENGTH};
use tracing::trace;

use crate::{equipment::EquipmentRegistry, tiles::TileMap};

/// Orthogonal steps first, diagonals after; diagonal mode expands all eight.
const STEPS: [(i64, i64); 8] = [
    (0, 1),
    (1, 0),
    (0, -1),
    (-1, 0),
    (1, 1),
    (1, -1),
    (-1, 1),
    (-1, -1),
];

/// Walkability grid plus reusable A* buffers.
///
/// The grid mirrors the tile map's dimensions. Walkability is derived from the
/// wall layer and from every equipment collision rectangle; it is only
/// recomputed on the first query after [`PathfindingGrid::mark_dirty`], so
/// agents that query the grid within one tick share a single rebuild.
#[derive(Clone, Debug)]
pub struct PathfindingGrid {
    columns: u32,
    rows: u32,
    walkable: Vec<bool>,
    dirty: bool,
    g_costs: Vec<f32>,
    parents: Vec<Option<usize>>,
    closed: Vec<bool>,
    open: BinaryHeap<OpenNode>,
}

impl PathfindingGrid {
    /// Creates a grid with the provided dimensions. The cache starts dirty.
    #[must_use]
    pub fn new(columns: u32, rows: u32) -> Self {
        let cell_count = usize::try_from(columns)
            .ok()
            .zip(usize::try_from(rows).ok())
            .and_then(|(columns, rows)| columns.checked_mul(rows))
            .unwrap_or(0);
        Self {
            columns,
            rows,
            walkable: vec![true; cell_count],
            dirty: true,
            g_costs: vec![f32::INFINITY; cell_count],
            parents: vec![None; cell_count],
            closed: vec![false; cell_count],
            open: BinaryHeap::new(),
        }
    }

    /// Number of columns in the grid.
    #[must_use]
    pub const fn columns(&self) -> u32 {
        self.columns
    }

    /// Number of rows in the grid.
    #[must_use]
    pub const fn rows(&self) -> u32 {
        self.rows
    }

    /// Flags the obstacle cache as stale.
    pub fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    /// Reports whether the next query will rebuild the obstacle cache.
    #[must_use]
    pub const fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Dense walkability flags stored in row-major order.
    #[must_use]
    pub fn cells(&self) -> &[bool] {
        &self.walkable
    }

    /// Recomputes walkability when the cache is stale. Returns whether a
    /// rebuild happened.
    pub fn rebuild_if_dirty(&mut self, tiles: &TileMap, equipment: &EquipmentRegistry) -> bool {
        if !self.dirty {
            return false;
        }

        self.walkable.fill(true);
        for row in 0..self.rows {
            for column in 0..self.columns {
                let cell = CellCoord::new(column, row);
                if tiles.is_collidable(cell) {
                    self.block(cell);
                }
            }
        }

        for (rect, object) in equipment.collision_objects() {
            let Some((columns, rows)) = self.covered_cells(&rect) else {
                continue;
            };
            for row in rows.0..=rows.1 {
                for column in columns.0..=columns.1 {
                    self.block(CellCoord::new(column, row));
                }
            }
            // An occupied object also blocks the row in front of it.
            if object.in_use() {
                let front = rows.1.saturating_add(1);
                if front < self.rows {
                    for column in columns.0..=columns.1 {
                        self.block(CellCoord::new(column, front));
                    }
                }
            }
        }

        self.dirty = false;
        trace!(columns = self.columns, rows = self.rows, "obstacle cache rebuilt");
        true
    }

    /// Reports whether the cell is on the grid and walkable in the cache.
    #[must_use]
    pub fn is_walkable(&self, cell: CellCoord) -> bool {
        self.index(cell)
            .and_then(|index| self.walkable.get(index).copied())
            .unwrap_or(false)
    }

    /// Converts a world point into the grid cell containing it, clamped to
    /// the grid bounds.
    #[must_use]
    pub fn world_to_grid(&self, point: WorldPoint) -> CellCoord {
        CellCoord::new(
            clamp_axis(point.x(), self.columns),
            clamp_axis(point.y(), self.rows),
        )
    }

    /// World-space center of a grid cell.
    #[must_use]
    pub fn grid_to_world(&self, cell: CellCoord) -> WorldPoint {
        cell.center()
    }

    /// Finds a path between two world points.
    ///
    /// The returned cells run from the start cell to the goal cell inclusive.
    /// `None` means the goal is unreachable or either endpoint is blocked.
    pub fn find_path(
        &mut self,
        tiles: &TileMap,
        equipment: &EquipmentRegistry,
        start: WorldPoint,
        goal: WorldPoint,
        allow_diagonal: bool,
    ) -> Option<Vec<CellCoord>> {
        let _ = self.rebuild_if_dirty(tiles, equipment);
        let start = self.world_to_grid(start);
        let goal = self.world_to_grid(goal);
        self.search(start, goal, allow_diagonal)
    }

    /// Finds a path to any walkable cell in the rings around a rectangle's
    /// center, trying the cells closest to the start first.
    pub fn find_path_near(
        &mut self,
        tiles: &TileMap,
        equipment: &EquipmentRegistry,
        start: WorldPoint,
        target: Rect,
        allow_diagonal: bool,
        radius: u32,
    ) -> Option<Vec<CellCoord>> {
        let _ = self.rebuild_if_dirty(tiles, equipment);
        let start = self.world_to_grid(start);
        let center = self.world_to_grid(target.center());

        let mut candidates = self.accessible_cells_near(center, radius);
        candidates.sort_by_key(|cell| cell.manhattan_distance(start));
        candidates
            .into_iter()
            .find_map(|candidate| self.search(start, candidate, allow_diagonal))
    }

    /// The cell under `point` when it is walkable, otherwise the walkable
    /// cell within `radius` rings whose center lies closest to `point`.
    pub fn nearest_walkable(
        &mut self,
        tiles: &TileMap,
        equipment: &EquipmentRegistry,
        point: WorldPoint,
        radius: u32,
    ) -> Option<CellCoord> {
        let _ = self.rebuild_if_dirty(tiles, equipment);
        let cell = self.world_to_grid(point);
        if self.is_walkable(cell) {
            return Some(cell);
        }
        self.accessible_cells_near(cell, radius)
            .into_iter()
            .min_by(|a, b| {
                point
                    .distance(a.center())
                    .total_cmp(&point.distance(b.center()))
            })
    }

    /// Walkable cells on the square rings `1..=radius` around `center`.
    ///
    /// Uses the cache as it stands; callers rebuild first when needed.
    #[must_use]
    pub fn accessible_cells_near(&self, center: CellCoord, radius: u32) -> Vec<CellCoord> {
        let mut cells = Vec::new();
        let radius = i64::from(radius);
        for ring in 1..=radius {
            for dx in -ring..=ring {
                for dy in -ring..=ring {
                    if dx.abs().max(dy.abs()) != ring {
                        continue;
                    }
                    if let Some(cell) = self.offset(center, dx, dy) {
                        if self.is_walkable(cell) {
                            cells.push(cell);
                        }
                    }
                }
            }
        }
        cells
    }

    fn search(
        &mut self,
        start: CellCoord,
        goal: CellCoord,
        allow_diagonal: bool,
    ) -> Option<Vec<CellCoord>> {
        let start_index = self.index(start)?;
        let goal_index = self.index(goal)?;
        if !self.walkable[start_index] || !self.walkable[goal_index] {
            return None;
        }

        self.g_costs.fill(f32::INFINITY);
        self.parents.fill(None);
        self.closed.fill(false);
        self.open.clear();

        let mut sequence = 0_u64;
        self.g_costs[start_index] = 0.0;
        self.open.push(OpenNode {
            f_cost: heuristic(start, goal),
            sequence,
            index: start_index,
        });

        let steps = if allow_diagonal { &STEPS[..] } else { &STEPS[..4] };

        while let Some(node) = self.open.pop() {
            if self.closed[node.index] {
                continue;
            }
            if node.index == goal_index {
                return Some(self.reconstruct(goal_index));
            }
            self.closed[node.index] = true;

            let cell = self.cell_at(node.index);
            let g_cost = self.g_costs[node.index];

            for &(dx, dy) in steps {
                let Some(next) = self.offset(cell, dx, dy) else {
                    continue;
                };
                let Some(next_index) = self.index(next) else {
                    continue;
                };
                if !self.walkable[next_index] || self.closed[next_index] {
                    continue;
                }

                let diagonal = dx != 0 && dy != 0;
                let cuts_corner =
                    !(self.walkable_offset(cell, dx, 0) && self.walkable_offset(cell, 0, dy));
                if diagonal && cuts_corner {
                    continue;
                }

                let tentative = g_cost + if diagonal { SQRT_2 } else { 1.0 };
                if tentative >= self.g_costs[next_index] {
                    continue;
                }

                self.g_costs[next_index] = tentative;
                self.parents[next_index] = Some(node.index);
                sequence += 1;
                self.open.push(OpenNode {
                    f_cost: tentative + heuristic(next, goal),
                    sequence,
                    index: next_index,
                });
            }
        }

        None
    }

    fn reconstruct(&self, goal_index: usize) -> Vec<CellCoord> {
        let mut path = vec![self.cell_at(goal_index)];
        let mut current = goal_index;
        while let Some(parent) = self.parents[current] {
            path.push(self.cell_at(parent));
            current = parent;
        }
        path.reverse();
        path
    }

    fn block(&mut self, cell: CellCoord) {
        if let Some(slot) = self.index(cell).and_then(|index| self.walkable.get_mut(index)) {
            *slot = false;
        }
    }

    fn walkable_offset(&self, cell: CellCoord, dx: i64, dy: i64) -> bool {
        self.offset(cell, dx, dy)
            .is_some_and(|neighbor| self.is_walkable(neighbor))
    }

    /// Inclusive column and row ranges of the cells a rectangle touches,
    /// clamped to the grid. `None` when the rectangle misses the grid.
    fn covered_cells(&self, rect: &Rect) -> Option<((u32, u32), (u32, u32))> {
        let columns = covered_axis(rect.left(), rect.right(), self.columns)?;
        let rows = covered_axis(rect.top(), rect.bottom(), self.rows)?;
        Some((columns, rows))
    }

    fn offset(&self, cell: CellCoord, dx: i64, dy: i64) -> Option<CellCoord> {
        let column = i64::from(cell.column()) + dx;
        let row = i64::from(cell.row()) + dy;
        let column = u32::try_from(column).ok()?;
        let row = u32::try_from(row).ok()?;
        (column < self.columns && row < self.rows).then(|| CellCoord::new(column, row))
    }

    fn index(&self, cell: CellCoord) -> Option<usize> {
        if cell.column() >= self.columns || cell.row() >= self.rows {
            return None;
        }
        let width = usize::try_from(self.columns).ok()?;
        index(width, cell)
    }

    fn cell_at(&self, index: usize) -> CellCoord {
        let width = usize::try_from(self.columns).unwrap_or(1).max(1);
        let column = u32::try_from(index % width).unwrap_or(u32::MAX);
        let row = u32::try_from(index / width).unwrap_or(u32::MAX);
        CellCoord::new(column, row)
    }
}

/// Open-set entry ordered so the binary heap pops the lowest f-cost first,
/// oldest entry first among equal costs.
#[derive(Clone, Copy, Debug)]
struct OpenNode {
    f_cost: f32,
    sequence: u64,
    index: usize,
}

impl Ord for OpenNode {
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .f_cost
            .total_cmp(&self.f_cost)
            .then_with(|| other.sequence.cmp(&self.sequence))
    }
}

impl PartialOrd for OpenNode {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for OpenNode {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for OpenNode {}

/// Manhattan distance, also used when diagonal steps are allowed.
fn heuristic(from: CellCoord, to: CellCoord) -> f32 {
    from.manhattan_distance(to) as f32
}

fn clamp_axis(value: f32, cells: u32) -> u32 {
    let last = cells.saturating_sub(1);
    let cell = (value / TILE_LENGTH).floor();
    if cell <= 0.0 {
        0
    } else if cell >= last as f32 {
        last
    } else {
        cell as u32
    }
}

fn covered_axis(start: f32, end: f32, cells: u32) -> Option<(u32, u32)> {
    let last = i64::from(cells.checked_sub(1)?);
    let first = (start / TILE_LENGTH).floor() as i64;
    let final_cell = (end / TILE_LENGTH).floor() as i64;
    if final_cell < 0 || first > last {
        return None;
    }
    let first = u32::try_from(first.clamp(0, last)).ok()?;
    let final_cell = u32::try_from(final_cell.clamp(0, last)).ok()?;
    Some((first, final_cell))
}

fn index(width: usize, cell: CellCoord) -> Option<usize> {
    let column = usize::try_from(cell.column()).ok()?;
    let row = usize::try_from(cell.row()).ok()?;
    row.checked_mul(width)?.checked_add(column)
}

#[cfg(test)]
mod tests {
    use super::*;
    use gym_floor_core::EquipmentKind;

    fn open_floor(columns: u32, rows: u32) -> TileMap {
        let cells = usize::try_from(columns * rows).expect("small grid");
        TileMap::from_layers(columns, rows, vec![false; cells], vec![-1; cells]).expect("layers")
    }

    #[test]
    fn world_to_grid_floors_and_clamps() {
        let grid = PathfindingGrid::new(4, 3);
        assert_eq!(grid.world_to_grid(WorldPoint::new(17.0, 31.9)), CellCoord::new(1, 1));
        assert_eq!(grid.world_to_grid(WorldPoint::new(-80.0, 500.0)), CellCoord::new(0, 2));
        assert_eq!(grid.grid_to_world(CellCoord::new(2, 1)), WorldPoint::new(40.0, 24.0));
    }

    #[test]
    fn start_equal_to_goal_yields_single_cell() {
        let tiles = open_floor(3, 3);
        let equipment = EquipmentRegistry::new();
        let mut grid = PathfindingGrid::new(3, 3);
        let point = CellCoord::new(1, 1).center();
        let path = grid.find_path(&tiles, &equipment, point, point, false);
        assert_eq!(path, Some(vec![CellCoord::new(1, 1)]));
    }

    #[test]
    fn blocked_goal_has_no_path() {
        let mut tiles = open_floor(3, 3);
        assert!(tiles.set_wall(CellCoord::new(2, 2), true));
        let equipment = EquipmentRegistry::new();
        let mut grid = PathfindingGrid::new(3, 3);
        let path = grid.find_path(
            &tiles,
            &equipment,
            CellCoord::new(0, 0).center(),
            CellCoord::new(2, 2).center(),
            true,
        );
        assert_eq!(path, None);
    }

    #[test]
    fn occupied_equipment_blocks_the_row_in_front() {
        let tiles = open_floor(10, 10);
        let mut equipment = EquipmentRegistry::new();
        let bench = equipment.add_equipment(CellCoord::new(5, 5), EquipmentKind::Bench);
        let mut grid = PathfindingGrid::new(10, 10);

        assert!(grid.rebuild_if_dirty(&tiles, &equipment));
        assert!(grid.is_walkable(CellCoord::new(5, 7)));

        let mut events = Vec::new();
        assert!(equipment.start_interaction(bench, gym_floor_core::VisitorId::new(0), &mut events));
        grid.mark_dirty();
        assert!(grid.rebuild_if_dirty(&tiles, &equipment));
        for column in 4..=6 {
            assert!(!grid.is_walkable(CellCoord::new(column, 7)));
        }
        assert!(grid.is_walkable(CellCoord::new(5, 8)));
    }

    #[test]
    fn stranded_point_resolves_to_the_closest_walkable_cell() {
        let tiles = open_floor(10, 10);
        let mut equipment = EquipmentRegistry::new();
        let bench = equipment.add_equipment(CellCoord::new(5, 5), EquipmentKind::Bench);
        let mut events = Vec::new();
        assert!(equipment.start_interaction(bench, gym_floor_core::VisitorId::new(0), &mut events));
        let mut grid = PathfindingGrid::new(10, 10);

        let stranded = CellCoord::new(5, 7).center();
        let goal = CellCoord::new(0, 9).center();
        assert_eq!(grid.find_path(&tiles, &equipment, stranded, goal, false), None);

        let escape = grid.nearest_walkable(&tiles, &equipment, stranded, 1);
        assert_eq!(escape, Some(CellCoord::new(5, 8)));
        let open = CellCoord::new(2, 2).center();
        assert_eq!(
            grid.nearest_walkable(&tiles, &equipment, open, 1),
            Some(CellCoord::new(2, 2))
        );
        assert_eq!(grid.nearest_walkable(&tiles, &equipment, stranded, 0), None);
    }

    #[test]
    fn near_cells_are_ringed_around_the_center() {
        let grid = PathfindingGrid::new(5, 5);
        let cells = grid.accessible_cells_near(CellCoord::new(0, 0), 1);
        assert_eq!(
            cells,
            vec![CellCoord::new(0, 1), CellCoord::new(1, 0), CellCoord::new(1, 1)]
        );
        assert_eq!(grid.accessible_cells_near(CellCoord::new(2, 2), 2).len(), 24);
    }

    #[test]
    fn find_path_near_stops_beside_the_object() {
        let tiles = open_floor(10, 10);
        let mut equipment = EquipmentRegistry::new();
        let bench = equipment.add_equipment(CellCoord::new(5, 5), EquipmentKind::Bench);
        let rect = equipment.get(bench).expect("bench").collision_rect();
        let mut grid = PathfindingGrid::new(10, 10);

        let path = grid
            .find_path_near(&tiles, &equipment, CellCoord::new(0, 5).center(), rect, false, 2)
            .expect("reachable");
        assert_eq!(path.last().copied(), Some(CellCoord::new(3, 5)));
    }

    #[test]
    fn open_node_order_prefers_low_cost_then_age() {
        let mut heap = BinaryHeap::new();
        heap.push(OpenNode { f_cost: 2.0, sequence: 0, index: 0 });
        heap.push(OpenNode { f_cost: 1.0, sequence: 2, index: 1 });
        heap.push(OpenNode { f_cost: 1.0, sequence: 1, index: 2 });
        let order: Vec<usize> = std::iter::from_fn(|| heap.pop().map(|node| node.index)).collect();
        assert_eq!(order, vec![2, 1, 0]);
    }
}
