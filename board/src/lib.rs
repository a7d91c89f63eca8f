#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Sparse tile grid and level data for Slide Grid.
//!
//! A [`Grid`] is populated once from authored level data and stays read-only
//! while a traversal runs. All descriptor invariants are checked when the grid
//! is constructed so the simulation never has to second-guess its input.

use std::collections::{BTreeMap, HashMap};

use log::warn;
use serde::{Deserialize, Serialize};
use slide_grid_core::{Direction, GridCoord, TileDescriptor, TileKind};
use thiserror::Error;

/// Errors reported while constructing a grid from authored tiles.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum GridError {
    /// Two tiles were placed on the same cell.
    #[error("more than one tile placed at ({}, {})", .coord.column(), .coord.row())]
    DuplicateCoordinate {
        /// Cell that received more than one tile.
        coord: GridCoord,
    },
    /// A teleport tile was authored without a pairing identifier.
    #[error("teleport tile at ({}, {}) has teleport id 0", .coord.column(), .coord.row())]
    ZeroTeleportId {
        /// Cell holding the offending teleport tile.
        coord: GridCoord,
    },
    /// More than two teleport tiles share an identifier.
    #[error("teleport id {teleport_id} is shared by {count} tiles; pairs need exactly two")]
    AmbiguousTeleportId {
        /// Identifier shared by too many tiles.
        teleport_id: u32,
        /// Number of teleport tiles carrying the identifier.
        count: usize,
    },
}

/// Read-only mapping from coordinates to tile descriptors.
///
/// Enumeration order is the order in which tiles were supplied, which keeps
/// teleport pair search deterministic.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Grid {
    tiles: Vec<(GridCoord, TileDescriptor)>,
    index: HashMap<GridCoord, usize>,
}

impl Grid {
    /// Builds a grid from `(coordinate, descriptor)` pairs, validating every
    /// descriptor invariant up front.
    pub fn from_tiles<I>(tiles: I) -> Result<Self, GridError>
    where
        I: IntoIterator<Item = (GridCoord, TileDescriptor)>,
    {
        let mut grid = Self::default();
        for (coord, tile) in tiles {
            if grid.index.contains_key(&coord) {
                return Err(GridError::DuplicateCoordinate { coord });
            }
            if tile.kind() == TileKind::Teleport && tile.teleport_id() == 0 {
                return Err(GridError::ZeroTeleportId { coord });
            }
            let _ = grid.index.insert(coord, grid.tiles.len());
            grid.tiles.push((coord, tile));
        }
        grid.validate_teleport_pairs()?;
        Ok(grid)
    }

    fn validate_teleport_pairs(&self) -> Result<(), GridError> {
        let mut counts: BTreeMap<u32, usize> = BTreeMap::new();
        for (_, tile) in &self.tiles {
            if tile.kind() == TileKind::Teleport {
                *counts.entry(tile.teleport_id()).or_insert(0) += 1;
            }
        }

        for (teleport_id, count) in counts {
            if count > 2 {
                return Err(GridError::AmbiguousTeleportId { teleport_id, count });
            }
            if count == 1 {
                warn!("[Board] Teleport id {teleport_id} has no pair; entering it will fail");
            }
        }
        Ok(())
    }

    /// Returns the descriptor placed at `coord`, if any.
    #[must_use]
    pub fn tile(&self, coord: GridCoord) -> Option<&TileDescriptor> {
        self.index.get(&coord).map(|&slot| &self.tiles[slot].1)
    }

    /// Reports whether a tile is placed at `coord`.
    #[must_use]
    pub fn contains(&self, coord: GridCoord) -> bool {
        self.index.contains_key(&coord)
    }

    /// Iterates every placed tile in insertion order.
    pub fn tiles(&self) -> impl Iterator<Item = (GridCoord, &TileDescriptor)> {
        self.tiles.iter().map(|(coord, tile)| (*coord, tile))
    }

    /// Number of placed tiles.
    #[must_use]
    pub fn len(&self) -> usize {
        self.tiles.len()
    }

    /// Reports whether no tiles are placed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tiles.is_empty()
    }
}

/// A validated level ready to be simulated.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Level {
    grid: Grid,
    start: GridCoord,
    start_direction: Direction,
}

impl Level {
    /// Grid the agent traverses.
    #[must_use]
    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    /// Cell the agent occupies when a run begins.
    #[must_use]
    pub const fn start(&self) -> GridCoord {
        self.start
    }

    /// Direction the agent travels in when a run begins.
    #[must_use]
    pub const fn start_direction(&self) -> Direction {
        self.start_direction
    }

    /// Consumes the level, yielding its grid.
    #[must_use]
    pub fn into_grid(self) -> Grid {
        self.grid
    }
}

/// Authored level data as stored on disk or in transfer strings.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LevelDefinition {
    /// Cell the agent occupies when a run begins.
    pub start: GridCoord,
    /// Direction the agent travels in when a run begins.
    pub start_direction: Direction,
    /// Tiles composing the board.
    #[serde(default)]
    pub tiles: Vec<TileEntry>,
}

impl LevelDefinition {
    /// Validates the authored data and produces a playable level.
    pub fn build(&self) -> Result<Level, GridError> {
        let grid = Grid::from_tiles(
            self.tiles
                .iter()
                .map(|entry| (GridCoord::new(entry.column, entry.row), entry.tile)),
        )?;
        Ok(Level {
            grid,
            start: self.start,
            start_direction: self.start_direction,
        })
    }
}

/// Single authored tile placed at a column and row.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TileEntry {
    /// Column of the cell holding the tile.
    pub column: i32,
    /// Row of the cell holding the tile.
    pub row: i32,
    /// Descriptor authored for the cell.
    #[serde(flatten)]
    pub tile: TileDescriptor,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn normal() -> TileDescriptor {
        TileDescriptor::new(TileKind::Normal)
    }

    #[test]
    fn lookup_returns_placed_tiles_only() {
        let grid = Grid::from_tiles([
            (GridCoord::new(0, 0), TileDescriptor::new(TileKind::StartingTile)),
            (GridCoord::new(1, 0), normal()),
        ])
        .expect("valid grid");

        assert_eq!(grid.len(), 2);
        assert_eq!(
            grid.tile(GridCoord::new(0, 0)).map(TileDescriptor::kind),
            Some(TileKind::StartingTile)
        );
        assert!(grid.tile(GridCoord::new(5, 5)).is_none());
        assert!(!grid.contains(GridCoord::new(-1, 0)));
    }

    #[test]
    fn enumeration_preserves_insertion_order() {
        let coords = [
            GridCoord::new(3, 1),
            GridCoord::new(-2, 0),
            GridCoord::new(0, 7),
        ];
        let grid = Grid::from_tiles(coords.iter().map(|&coord| (coord, normal())))
            .expect("valid grid");

        let enumerated: Vec<_> = grid.tiles().map(|(coord, _)| coord).collect();
        assert_eq!(enumerated, coords);
    }

    #[test]
    fn duplicate_coordinates_are_rejected() {
        let error = Grid::from_tiles([
            (GridCoord::new(1, 1), normal()),
            (GridCoord::new(1, 1), normal()),
        ])
        .unwrap_err();

        assert_eq!(
            error,
            GridError::DuplicateCoordinate {
                coord: GridCoord::new(1, 1)
            }
        );
    }

    #[test]
    fn teleport_without_identifier_is_rejected() {
        let error = Grid::from_tiles([(
            GridCoord::new(2, 0),
            TileDescriptor::new(TileKind::Teleport),
        )])
        .unwrap_err();

        assert_eq!(
            error,
            GridError::ZeroTeleportId {
                coord: GridCoord::new(2, 0)
            }
        );
    }

    #[test]
    fn three_teleports_sharing_an_identifier_are_rejected() {
        let error = Grid::from_tiles([
            (GridCoord::new(0, 0), TileDescriptor::teleport(4, Direction::East)),
            (GridCoord::new(1, 0), TileDescriptor::teleport(4, Direction::East)),
            (GridCoord::new(2, 0), TileDescriptor::teleport(4, Direction::East)),
        ])
        .unwrap_err();

        assert_eq!(
            error,
            GridError::AmbiguousTeleportId {
                teleport_id: 4,
                count: 3
            }
        );
    }

    #[test]
    fn unpaired_teleport_is_accepted() {
        let grid = Grid::from_tiles([(
            GridCoord::new(0, 0),
            TileDescriptor::teleport(9, Direction::West),
        )]);
        assert!(grid.is_ok());
    }

    #[test]
    fn non_teleport_tiles_ignore_teleport_identifiers() {
        let grid = Grid::from_tiles([
            (GridCoord::new(0, 0), normal().with_teleport_id(3)),
            (GridCoord::new(1, 0), normal().with_teleport_id(3)),
            (GridCoord::new(2, 0), TileDescriptor::teleport(3, Direction::East)),
            (GridCoord::new(3, 0), TileDescriptor::teleport(3, Direction::East)),
        ]);
        assert!(grid.is_ok());
    }

    #[test]
    fn level_definition_builds_grid_and_start() {
        let definition = LevelDefinition {
            start: GridCoord::new(0, 0),
            start_direction: Direction::North,
            tiles: vec![TileEntry {
                column: 0,
                row: 1,
                tile: TileDescriptor::new(TileKind::GoalTile),
            }],
        };

        let level = definition.build().expect("valid level");
        assert_eq!(level.start(), GridCoord::new(0, 0));
        assert_eq!(level.start_direction(), Direction::North);
        assert!(level.grid().contains(GridCoord::new(0, 1)));
    }
}
