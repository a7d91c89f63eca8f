#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure tile effect resolution for Slide Grid.
//!
//! [`resolve`] decides what happens when the agent enters a tile. It never
//! mutates the grid and never commits state: new positions and directions are
//! returned so the world alone decides when they take effect.

use log::{debug, warn};
use slide_grid_board::Grid;
use slide_grid_core::{Direction, FailReason, GridCoord, TileDescriptor, TileKind};

/// Outcome of entering a tile.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Resolution {
    /// The agent keeps moving from the tile in `direction`.
    Continue {
        /// Direction to travel in after leaving the tile.
        direction: Direction,
    },
    /// The agent reached a goal.
    Win,
    /// The traversal terminates on this tile.
    Fail {
        /// Diagnostic reason for the failure.
        reason: FailReason,
    },
    /// The agent is relocated to the paired teleport tile.
    Teleport {
        /// Cell of the paired teleport tile.
        position: GridCoord,
        /// Exit direction configured on the paired tile.
        direction: Direction,
    },
    /// The agent jumps ahead, keeping its direction.
    Jump {
        /// Landing cell of the jump.
        position: GridCoord,
    },
}

impl Resolution {
    const fn fail(reason: FailReason) -> Self {
        Self::Fail { reason }
    }
}

/// Resolves the effect of `tile`, located at `position`, on an agent entering
/// it while travelling in `direction`.
#[must_use]
pub fn resolve(
    tile: &TileDescriptor,
    grid: &Grid,
    direction: Direction,
    position: GridCoord,
) -> Resolution {
    match tile.kind() {
        TileKind::Normal | TileKind::StartingTile => {
            debug!("[EffectResolver] {:?} tile at {position:?} - continue", tile.kind());
            Resolution::Continue { direction }
        }
        TileKind::GoalTile => {
            debug!("[EffectResolver] Goal tile at {position:?} - win");
            Resolution::Win
        }
        TileKind::Block | TileKind::Empty => {
            debug!("[EffectResolver] {:?} tile at {position:?} - fail", tile.kind());
            Resolution::fail(FailReason::Blocked)
        }
        TileKind::Locked
        | TileKind::Portal
        | TileKind::JumpVertical
        | TileKind::SpeedUp
        | TileKind::Trigger
        | TileKind::Door => {
            warn!(
                "[EffectResolver] Tile kind {:?} not yet implemented - treating as normal",
                tile.kind()
            );
            Resolution::Continue { direction }
        }
        TileKind::Rotate90Left => Resolution::Continue {
            direction: direction.rotate_left(),
        },
        TileKind::Rotate90Right => Resolution::Continue {
            direction: direction.rotate_right(),
        },
        TileKind::Rotate180 => Resolution::Continue {
            direction: direction.reversed(),
        },
        TileKind::Teleport => match find_teleport_pair(grid, tile.teleport_id(), position) {
            Some((position, direction)) => Resolution::Teleport {
                position,
                direction,
            },
            None => Resolution::fail(FailReason::MissingTeleportPair),
        },
        TileKind::JumpForward => resolve_jump(tile, grid, direction, position),
    }
}

/// Locates the teleport tile paired with `teleport_id`, skipping the tile at
/// `current`. Returns the pair's cell and exit direction.
///
/// The first match in grid enumeration order wins; grids reject identifiers
/// shared by more than two tiles, so at most one candidate exists.
#[must_use]
pub fn find_teleport_pair(
    grid: &Grid,
    teleport_id: u32,
    current: GridCoord,
) -> Option<(GridCoord, Direction)> {
    if teleport_id == 0 {
        warn!("[EffectResolver] Teleport id is 0, no pairing possible");
        return None;
    }

    let pair = grid.tiles().find(|(coord, tile)| {
        *coord != current
            && tile.kind() == TileKind::Teleport
            && tile.teleport_id() == teleport_id
    });

    match pair {
        Some((coord, tile)) => {
            debug!(
                "[EffectResolver] Found teleport pair at {coord:?} exiting {:?}",
                tile.exit_direction()
            );
            Some((coord, tile.exit_direction()))
        }
        None => {
            warn!("[EffectResolver] No teleport pair found for id {teleport_id}");
            None
        }
    }
}

fn resolve_jump(
    tile: &TileDescriptor,
    grid: &Grid,
    direction: Direction,
    position: GridCoord,
) -> Resolution {
    let blocked_midway = position
        .neighbor(direction)
        .and_then(|intermediate| grid.tile(intermediate))
        .is_some_and(TileDescriptor::is_not_jumpable);
    if blocked_midway {
        debug!("[EffectResolver] Jump from {position:?} crosses a non-jumpable tile");
        return Resolution::fail(FailReason::UnjumpableTile);
    }

    let Some(landing) = tile
        .jump_distance()
        .checked_add(1)
        .and_then(|cells| position.advanced(direction, cells))
    else {
        return Resolution::fail(FailReason::InvalidLanding);
    };

    match grid.tile(landing) {
        Some(target) if target.is_walkable() => {
            debug!("[EffectResolver] Jump from {position:?} lands on {landing:?}");
            Resolution::Jump { position: landing }
        }
        _ => {
            debug!("[EffectResolver] Jump from {position:?} has no walkable landing");
            Resolution::fail(FailReason::InvalidLanding)
        }
    }
}
