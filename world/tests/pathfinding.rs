use gym_floor_core::{CellCoord, EquipmentKind, WorldPoint};
use gym_floor_world::{EquipmentRegistry, PathfindingGrid, TileMap};

fn open_floor(columns: u32, rows: u32) -> TileMap {
    let cells = (columns * rows) as usize;
    TileMap::from_layers(columns, rows, vec![false; cells], vec![-1; cells]).expect("layers")
}

fn center(column: u32, row: u32) -> WorldPoint {
    CellCoord::new(column, row).center()
}

fn assert_connected(path: &[CellCoord], allow_diagonal: bool) {
    for pair in path.windows(2) {
        let step = pair[0].chebyshev_distance(pair[1]);
        assert_eq!(step, 1, "{:?} -> {:?} is not a single step", pair[0], pair[1]);
        if !allow_diagonal {
            assert_eq!(pair[0].manhattan_distance(pair[1]), 1);
        }
    }
}

#[test]
fn open_grid_paths_have_minimal_length() {
    let tiles = open_floor(20, 20);
    let equipment = EquipmentRegistry::new();
    let mut grid = PathfindingGrid::new(20, 20);

    let pairs = [((0, 0), (19, 19)), ((2, 3), (15, 7)), ((18, 1), (4, 12))];
    for ((sx, sy), (gx, gy)) in pairs {
        let start = CellCoord::new(sx, sy);
        let goal = CellCoord::new(gx, gy);

        let orthogonal = grid
            .find_path(&tiles, &equipment, center(sx, sy), center(gx, gy), false)
            .expect("orthogonal path");
        assert_eq!(orthogonal.len() as u32, start.manhattan_distance(goal) + 1);
        assert_connected(&orthogonal, false);

        let diagonal = grid
            .find_path(&tiles, &equipment, center(sx, sy), center(gx, gy), true)
            .expect("diagonal path");
        assert_eq!(diagonal.len() as u32, start.chebyshev_distance(goal) + 1);
        assert_connected(&diagonal, true);
        assert_eq!(diagonal.first(), Some(&start));
        assert_eq!(diagonal.last(), Some(&goal));
    }
}

/// `g + h` for every cell of a path, with Manhattan distance to the goal as `h`.
fn f_costs(path: &[CellCoord]) -> Vec<f32> {
    let Some(goal) = path.last().copied() else {
        return Vec::new();
    };
    let mut g = 0.0_f32;
    let mut costs = Vec::with_capacity(path.len());
    for (index, cell) in path.iter().enumerate() {
        if index > 0 {
            g += if path[index - 1].manhattan_distance(*cell) == 2 {
                std::f32::consts::SQRT_2
            } else {
                1.0
            };
        }
        costs.push(g + cell.manhattan_distance(goal) as f32);
    }
    costs
}

#[test]
fn corner_to_corner_f_costs_follow_the_heuristic() {
    let tiles = open_floor(20, 20);
    let equipment = EquipmentRegistry::new();
    let mut grid = PathfindingGrid::new(20, 20);

    let orthogonal = grid
        .find_path(&tiles, &equipment, center(0, 0), center(19, 19), false)
        .expect("orthogonal path");
    let costs = f_costs(&orthogonal);
    assert_eq!(costs.len(), 39);
    for pair in costs.windows(2) {
        assert!(pair[1] >= pair[0] - 1e-4, "f-cost fell from {} to {}", pair[0], pair[1]);
    }

    let diagonal = grid
        .find_path(&tiles, &equipment, center(0, 0), center(19, 19), true)
        .expect("diagonal path");
    assert_eq!(diagonal.len(), 20);
    assert_eq!(
        diagonal.iter().filter(|cell| cell.column() == cell.row()).count(),
        20
    );
    // Manhattan overestimates a diagonal step by 2 - sqrt(2)
    let costs = f_costs(&diagonal);
    let shrink = 2.0 - std::f32::consts::SQRT_2;
    for pair in costs.windows(2) {
        assert!((pair[0] - pair[1] - shrink).abs() < 1e-4);
    }
}

#[test]
fn diagonal_steps_never_cut_corners() {
    let mut tiles = open_floor(3, 3);
    assert!(tiles.set_wall(CellCoord::new(1, 0), true));
    assert!(tiles.set_wall(CellCoord::new(0, 1), true));
    let equipment = EquipmentRegistry::new();
    let mut grid = PathfindingGrid::new(3, 3);

    let path = grid.find_path(&tiles, &equipment, center(0, 0), center(1, 1), true);
    assert_eq!(path, None);

    let mut tiles = open_floor(3, 3);
    assert!(tiles.set_wall(CellCoord::new(1, 0), true));
    grid.mark_dirty();
    let path = grid
        .find_path(&tiles, &equipment, center(0, 0), center(1, 1), true)
        .expect("path around the corner");
    assert_eq!(
        path,
        vec![CellCoord::new(0, 0), CellCoord::new(0, 1), CellCoord::new(1, 1)]
    );
}

#[test]
fn bench_footprint_forces_a_detour() {
    let tiles = open_floor(10, 10);
    let mut equipment = EquipmentRegistry::new();
    let _ = equipment.add_equipment(CellCoord::new(5, 5), EquipmentKind::Bench);
    let mut grid = PathfindingGrid::new(10, 10);

    let path = grid
        .find_path(&tiles, &equipment, center(0, 5), center(9, 5), false)
        .expect("path around the bench");

    assert_connected(&path, false);
    assert_eq!(path.len(), 14);
    for cell in &path {
        let inside = (4..=6).contains(&cell.column()) && (4..=6).contains(&cell.row());
        assert!(!inside, "{cell:?} lies under the bench");
    }
}

#[test]
fn cache_follows_registered_equipment() {
    let tiles = open_floor(10, 10);
    let mut equipment = EquipmentRegistry::new();
    let bench = equipment.add_equipment(CellCoord::new(5, 5), EquipmentKind::Bench);
    let mut grid = PathfindingGrid::new(10, 10);

    grid.mark_dirty();
    let _ = grid.find_path(&tiles, &equipment, center(0, 0), center(9, 9), false);
    for row in 4..=6 {
        for column in 4..=6 {
            assert!(!grid.is_walkable(CellCoord::new(column, row)));
        }
    }

    assert!(equipment.remove_equipment(bench).is_some());
    grid.mark_dirty();
    let _ = grid.find_path(&tiles, &equipment, center(0, 0), center(9, 9), false);
    assert!(grid.cells().iter().all(|walkable| *walkable));
}

#[test]
fn rebuild_without_invalidation_is_a_no_op() {
    let tiles = TileMap::gym().expect("layout");
    let equipment = EquipmentRegistry::from_objects(tiles.objects());
    let mut grid = PathfindingGrid::new(tiles.columns(), tiles.rows());

    assert!(grid.rebuild_if_dirty(&tiles, &equipment));
    let first = grid.cells().to_vec();
    assert!(!grid.rebuild_if_dirty(&tiles, &equipment));
    assert_eq!(grid.cells(), first.as_slice());
}

#[test]
fn gym_entrance_reaches_every_station() {
    let tiles = TileMap::gym().expect("layout");
    let equipment = EquipmentRegistry::from_objects(tiles.objects());
    let mut grid = PathfindingGrid::new(tiles.columns(), tiles.rows());

    for object in equipment.iter() {
        if object.kind().station().is_none() {
            continue;
        }
        let rect = object.collision_rect();
        let standing = WorldPoint::new(rect.center().x(), rect.bottom() + 16.0);
        let path = grid.find_path(&tiles, &equipment, center(0, 10), standing, false);
        assert!(path.is_some(), "{:?} at {:?} is unreachable", object.kind(), object.anchor());
    }
}
