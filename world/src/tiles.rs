//! Static map source: wall layer, object layer and the ASCII layout reader.

use gym_floor_core::{CellCoord, EquipmentKind, WorldPoint, TILE_LENGTH};
use thiserror::Error;

/// Built-in gym floor used by the command-line adapter.
///
/// The entrance opens on the west wall at rows 10 and 11, the check-in queue
/// runs along row 11 towards the front desk and the workout stations line the
/// north and south halves of the room.
const GYM_LAYOUT: &str = "\
############################
#..........................#
#..........................#
#..T....T.....B....B....b..#
#..........................#
#..........................#
#..........................#
#..........................#
#........................X.#
#..........................#
........F..................#
...........................#
#.............D....D....S..#
#..........................#
#..........................#
#..........................#
#..........................#
############################";

/// Reasons a layout cannot be turned into a [`TileMap`].
#[derive(Debug, Error, PartialEq, Eq)]
pub enum LayoutError {
    /// The layout contains no rows.
    #[error("layout is empty")]
    Empty,
    /// A row does not match the width of the first row.
    #[error("row {row} has {found} tiles but the layout is {expected} tiles wide")]
    RaggedRow {
        /// Zero-based row index.
        row: u32,
        /// Width of the first row.
        expected: u32,
        /// Width of the offending row.
        found: u32,
    },
    /// A glyph is not part of the layout alphabet.
    #[error("unknown glyph {glyph:?} at column {column}, row {row}")]
    UnknownGlyph {
        /// Offending character.
        glyph: char,
        /// Zero-based column index.
        column: u32,
        /// Zero-based row index.
        row: u32,
    },
    /// A layer does not hold exactly one entry per tile.
    #[error("layer holds {found} tiles, expected {expected}")]
    LayerSize {
        /// Number of tiles implied by the dimensions.
        expected: usize,
        /// Number of entries supplied.
        found: usize,
    },
}

/// Static tile layers of the gym floor.
#[derive(Clone, Debug, PartialEq)]
pub struct TileMap {
    columns: u32,
    rows: u32,
    walls: Vec<bool>,
    objects: Vec<Option<EquipmentKind>>,
}

impl TileMap {
    /// Builds a map from a wall layer and an object layer of tile codes.
    ///
    /// Both layers are stored row-major. Object codes follow
    /// [`EquipmentKind::from_tile_code`]; `-1` marks an empty tile.
    pub fn from_layers(
        columns: u32,
        rows: u32,
        walls: Vec<bool>,
        objects: Vec<i32>,
    ) -> Result<Self, LayoutError> {
        let expected = tile_count(columns, rows);
        if expected == 0 {
            return Err(LayoutError::Empty);
        }
        if walls.len() != expected {
            return Err(LayoutError::LayerSize {
                expected,
                found: walls.len(),
            });
        }
        if objects.len() != expected {
            return Err(LayoutError::LayerSize {
                expected,
                found: objects.len(),
            });
        }

        Ok(Self {
            columns,
            rows,
            walls,
            objects: objects
                .into_iter()
                .map(EquipmentKind::from_tile_code)
                .collect(),
        })
    }

    /// Reads an ASCII layout.
    ///
    /// `#` is a wall and `.` is floor. Equipment glyphs place one anchor on a
    /// floor tile: `B` bench, `T` treadmill, `D` dumbbell rack, `b` small
    /// bench, `S` squat rack, `F` front desk and `X` trashcan. Blank lines are
    /// ignored.
    pub fn parse(text: &str) -> Result<Self, LayoutError> {
        let lines: Vec<&str> = text
            .lines()
            .map(str::trim_end)
            .filter(|line| !line.is_empty())
            .collect();
        let Some(first) = lines.first() else {
            return Err(LayoutError::Empty);
        };

        let columns = first.chars().count() as u32;
        let rows = lines.len() as u32;
        let mut walls = Vec::with_capacity(tile_count(columns, rows));
        let mut objects = Vec::with_capacity(walls.capacity());

        for (row, line) in lines.iter().enumerate() {
            let found = line.chars().count() as u32;
            if found != columns {
                return Err(LayoutError::RaggedRow {
                    row: row as u32,
                    expected: columns,
                    found,
                });
            }

            for (column, glyph) in line.chars().enumerate() {
                let object = match glyph {
                    '#' | '.' => None,
                    'B' => Some(EquipmentKind::Bench),
                    'T' => Some(EquipmentKind::Treadmill),
                    'D' => Some(EquipmentKind::DumbbellRack),
                    'b' => Some(EquipmentKind::SmallBench),
                    'S' => Some(EquipmentKind::SquatRack),
                    'F' => Some(EquipmentKind::FrontDesk),
                    'X' => Some(EquipmentKind::Trashcan),
                    other => {
                        return Err(LayoutError::UnknownGlyph {
                            glyph: other,
                            column: column as u32,
                            row: row as u32,
                        })
                    }
                };
                walls.push(glyph == '#');
                objects.push(object);
            }
        }

        Ok(Self {
            columns,
            rows,
            walls,
            objects,
        })
    }

    /// The built-in gym floor.
    pub fn gym() -> Result<Self, LayoutError> {
        Self::parse(GYM_LAYOUT)
    }

    /// Number of tile columns.
    #[must_use]
    pub const fn columns(&self) -> u32 {
        self.columns
    }

    /// Number of tile rows.
    #[must_use]
    pub const fn rows(&self) -> u32 {
        self.rows
    }

    /// Width of the floor in world pixels.
    #[must_use]
    pub fn width(&self) -> f32 {
        self.columns as f32 * TILE_LENGTH
    }

    /// Height of the floor in world pixels.
    #[must_use]
    pub fn height(&self) -> f32 {
        self.rows as f32 * TILE_LENGTH
    }

    /// Reports whether the tile blocks movement. Tiles off the map always do.
    #[must_use]
    pub fn is_collidable(&self, cell: CellCoord) -> bool {
        self.index(cell)
            .and_then(|index| self.walls.get(index).copied())
            .unwrap_or(true)
    }

    /// Changes the collidability of a tile, returning whether anything changed.
    pub fn set_wall(&mut self, cell: CellCoord, blocked: bool) -> bool {
        let Some(slot) = self.index(cell).and_then(|index| self.walls.get_mut(index)) else {
            return false;
        };
        if *slot == blocked {
            return false;
        }
        *slot = blocked;
        true
    }

    /// Equipment anchors recorded in the object layer, in row-major order.
    pub fn objects(&self) -> impl Iterator<Item = (CellCoord, EquipmentKind)> + '_ {
        let columns = self.columns.max(1);
        self.objects
            .iter()
            .enumerate()
            .filter_map(move |(index, object)| {
                let kind = (*object)?;
                let index = u32::try_from(index).ok()?;
                Some((CellCoord::new(index % columns, index / columns), kind))
            })
    }

    /// Tile containing the point, or `None` when the point is off the map.
    #[must_use]
    pub fn cell_at(&self, point: WorldPoint) -> Option<CellCoord> {
        if !self.contains(point) {
            return None;
        }
        let column = (point.x() / TILE_LENGTH).floor() as u32;
        let row = (point.y() / TILE_LENGTH).floor() as u32;
        Some(CellCoord::new(column, row))
    }

    /// Reports whether the point lies on the map.
    #[must_use]
    pub fn contains(&self, point: WorldPoint) -> bool {
        point.x() >= 0.0
            && point.y() >= 0.0
            && point.x() < self.width()
            && point.y() < self.height()
    }

    fn index(&self, cell: CellCoord) -> Option<usize> {
        if cell.column() >= self.columns || cell.row() >= self.rows {
            return None;
        }
        let width = usize::try_from(self.columns).ok()?;
        let row = usize::try_from(cell.row()).ok()?;
        let column = usize::try_from(cell.column()).ok()?;
        row.checked_mul(width)?.checked_add(column)
    }
}

fn tile_count(columns: u32, rows: u32) -> usize {
    let columns = usize::try_from(columns).unwrap_or(0);
    let rows = usize::try_from(rows).unwrap_or(0);
    columns.checked_mul(rows).unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_reads_walls_and_objects() {
        let map = TileMap::parse("###\n#B.\n#.X\n").expect("valid layout");
        assert_eq!(map.columns(), 3);
        assert_eq!(map.rows(), 3);
        assert!(map.is_collidable(CellCoord::new(0, 1)));
        assert!(!map.is_collidable(CellCoord::new(1, 1)));

        let objects: Vec<_> = map.objects().collect();
        assert_eq!(
            objects,
            vec![
                (CellCoord::new(1, 1), EquipmentKind::Bench),
                (CellCoord::new(2, 2), EquipmentKind::Trashcan),
            ]
        );
    }

    #[test]
    fn parse_rejects_ragged_rows() {
        let error = TileMap::parse("###\n##\n").expect_err("ragged");
        assert_eq!(
            error,
            LayoutError::RaggedRow {
                row: 1,
                expected: 3,
                found: 2
            }
        );
    }

    #[test]
    fn parse_rejects_unknown_glyphs() {
        let error = TileMap::parse("#?#").expect_err("unknown glyph");
        assert!(matches!(error, LayoutError::UnknownGlyph { glyph: '?', .. }));
    }

    #[test]
    fn from_layers_decodes_tile_codes() {
        let map = TileMap::from_layers(2, 1, vec![false, true], vec![4, -1]).expect("layers");
        assert_eq!(
            map.objects().collect::<Vec<_>>(),
            vec![(CellCoord::new(0, 0), EquipmentKind::SquatRack)]
        );
        assert!(map.is_collidable(CellCoord::new(1, 0)));
    }

    #[test]
    fn from_layers_checks_layer_sizes() {
        let error = TileMap::from_layers(2, 2, vec![false; 3], vec![-1; 4]).expect_err("short");
        assert_eq!(
            error,
            LayoutError::LayerSize {
                expected: 4,
                found: 3
            }
        );
    }

    #[test]
    fn off_map_tiles_are_collidable() {
        let map = TileMap::parse("..\n..").expect("layout");
        assert!(map.is_collidable(CellCoord::new(2, 0)));
        assert_eq!(map.cell_at(WorldPoint::new(-1.0, 4.0)), None);
        assert_eq!(
            map.cell_at(WorldPoint::new(17.0, 31.0)),
            Some(CellCoord::new(1, 1))
        );
    }

    #[test]
    fn set_wall_reports_changes() {
        let mut map = TileMap::parse("..").expect("layout");
        assert!(map.set_wall(CellCoord::new(1, 0), true));
        assert!(!map.set_wall(CellCoord::new(1, 0), true));
        assert!(map.is_collidable(CellCoord::new(1, 0)));
    }

    #[test]
    fn gym_layout_opens_the_entrance() {
        let map = TileMap::gym().expect("built-in layout");
        assert_eq!((map.columns(), map.rows()), (28, 18));
        assert!(!map.is_collidable(CellCoord::new(0, 10)));
        assert!(!map.is_collidable(CellCoord::new(0, 11)));
        assert!(map.is_collidable(CellCoord::new(0, 9)));
        assert_eq!(map.objects().count(), 10);
    }
}
