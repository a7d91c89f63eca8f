#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the Slide Grid engine.
//!
//! This crate defines the message surface that connects adapters, the
//! authoritative world, and pure systems. Adapters submit [`Command`] values
//! describing desired mutations, the world executes those commands via its
//! `apply` entry point, and then broadcasts [`Event`] values for systems to
//! react to deterministically. Systems consume event streams, query immutable
//! snapshots, and respond exclusively with new command batches.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Commands that express all permissible world mutations.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Command {
    /// Begins a new traversal, discarding any previous traversal state.
    StartTraversal {
        /// Cell the agent occupies when the traversal begins.
        position: GridCoord,
        /// Direction the agent travels in when the traversal begins.
        direction: Direction,
    },
    /// Cancels the active traversal and returns the stepper to idle.
    StopTraversal,
    /// Advances the active traversal by a single cell.
    Step,
    /// Advances the simulation clock by the provided delta time.
    Tick {
        /// Duration of simulated time that elapsed since the previous tick.
        dt: Duration,
    },
}

/// Events broadcast by the world after processing commands.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Event {
    /// Indicates that the simulation clock advanced.
    TimeAdvanced {
        /// Duration of simulated time that elapsed in the tick.
        dt: Duration,
    },
    /// Confirms that a traversal began.
    TraversalStarted {
        /// Cell the agent starts from.
        position: GridCoord,
        /// Direction the agent starts travelling in.
        direction: Direction,
    },
    /// Confirms that the agent moved onto the next cell in a straight line.
    AgentAdvanced {
        /// Cell the agent occupied before moving.
        from: GridCoord,
        /// Cell the agent occupies after moving.
        to: GridCoord,
    },
    /// Reports that a tile redirected the agent.
    DirectionChanged {
        /// Cell whose tile changed the direction.
        at: GridCoord,
        /// Direction before the tile was entered.
        from: Direction,
        /// Direction after the tile was resolved.
        to: Direction,
    },
    /// Reports that the agent entered a teleport tile and emerged at its pair.
    AgentTeleported {
        /// Teleport tile the agent entered.
        entry: GridCoord,
        /// Paired teleport tile the agent now occupies.
        exit: GridCoord,
        /// Exit direction configured on the paired tile.
        direction: Direction,
    },
    /// Reports that the agent jumped across one or more cells.
    AgentJumped {
        /// Jump tile the agent entered.
        from: GridCoord,
        /// First cell that was jumped over.
        over: GridCoord,
        /// Cell the agent landed on.
        to: GridCoord,
    },
    /// Announces that the agent reached a goal tile.
    TraversalSucceeded {
        /// Goal cell the agent occupies.
        position: GridCoord,
    },
    /// Announces that the traversal terminated without reaching a goal.
    TraversalFailed {
        /// Cell the agent occupied when the traversal failed.
        position: GridCoord,
        /// Diagnostic reason for the failure.
        reason: FailReason,
    },
    /// Confirms that an active traversal was cancelled externally.
    TraversalStopped,
}

/// Lifecycle of the traversal stepper.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum TraversalStatus {
    /// No traversal is active.
    #[default]
    Idle,
    /// A traversal is active and accepts steps.
    Running,
    /// The last traversal reached a goal tile.
    Succeeded,
    /// The last traversal terminated without reaching a goal.
    Failed,
}

impl TraversalStatus {
    /// Reports whether the status is terminal until the next start.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Succeeded | Self::Failed)
    }
}

/// Diagnostic reasons a traversal may fail.
///
/// Every reason collapses into the same terminal failure signal; the variant
/// only exists so adapters can explain what happened.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FailReason {
    /// No tile exists on the cell ahead of the agent.
    NoTileAhead,
    /// The cell ahead holds a locked tile.
    LockedTile,
    /// The agent entered a block or empty tile.
    Blocked,
    /// A teleport tile had no usable pair.
    MissingTeleportPair,
    /// A jump tried to pass over a tile flagged as not jumpable.
    UnjumpableTile,
    /// A jump landing cell is missing or not walkable.
    InvalidLanding,
    /// The agent returned to a previously visited cell heading the same way.
    LoopDetected,
    /// The configured step ceiling was reached.
    StepLimitExceeded,
}

impl FailReason {
    /// Human-readable description suitable for diagnostics.
    #[must_use]
    pub const fn description(self) -> &'static str {
        match self {
            Self::NoTileAhead => "no traversable tile ahead",
            Self::LockedTile => "locked tile ahead",
            Self::Blocked => "blocked by tile",
            Self::MissingTeleportPair => "teleport has no pair",
            Self::UnjumpableTile => "jump crosses a non-jumpable tile",
            Self::InvalidLanding => "jump landing is not walkable",
            Self::LoopDetected => "traversal entered a loop",
            Self::StepLimitExceeded => "step limit exceeded",
        }
    }
}

/// Location of a single grid cell expressed as signed column and row.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct GridCoord {
    column: i32,
    row: i32,
}

impl GridCoord {
    /// Creates a new grid coordinate.
    #[must_use]
    pub const fn new(column: i32, row: i32) -> Self {
        Self { column, row }
    }

    /// Column index of the cell.
    #[must_use]
    pub const fn column(&self) -> i32 {
        self.column
    }

    /// Row index of the cell.
    #[must_use]
    pub const fn row(&self) -> i32 {
        self.row
    }

    /// Neighbouring cell one step in the provided direction.
    ///
    /// Returns `None` when the neighbour lies outside the representable range.
    #[must_use]
    pub fn neighbor(self, direction: Direction) -> Option<Self> {
        self.advanced(direction, 1)
    }

    /// Cell reached by moving `cells` steps in the provided direction.
    ///
    /// Returns `None` when the destination lies outside the representable
    /// range, which callers treat the same as a missing tile.
    #[must_use]
    pub fn advanced(self, direction: Direction, cells: u32) -> Option<Self> {
        let (dx, dy) = direction.offset();
        let distance = i64::from(cells);
        let column = i64::from(self.column) + i64::from(dx) * distance;
        let row = i64::from(self.row) + i64::from(dy) * distance;
        Some(Self {
            column: i32::try_from(column).ok()?,
            row: i32::try_from(row).ok()?,
        })
    }
}

/// Axis-aligned unit direction the agent travels in.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    /// Unit vector `(1, 0)`.
    East,
    /// Unit vector `(-1, 0)`.
    West,
    /// Unit vector `(0, 1)`.
    North,
    /// Unit vector `(0, -1)`.
    South,
}

impl Direction {
    /// All four directions in declaration order.
    pub const ALL: [Self; 4] = [Self::East, Self::West, Self::North, Self::South];

    /// Column and row delta represented by the direction.
    #[must_use]
    pub const fn offset(self) -> (i32, i32) {
        match self {
            Self::East => (1, 0),
            Self::West => (-1, 0),
            Self::North => (0, 1),
            Self::South => (0, -1),
        }
    }

    /// Rotates the direction 90 degrees anticlockwise: `(dx, dy)` becomes `(-dy, dx)`.
    #[must_use]
    pub const fn rotate_left(self) -> Self {
        match self {
            Self::East => Self::North,
            Self::North => Self::West,
            Self::West => Self::South,
            Self::South => Self::East,
        }
    }

    /// Rotates the direction 90 degrees clockwise: `(dx, dy)` becomes `(dy, -dx)`.
    #[must_use]
    pub const fn rotate_right(self) -> Self {
        match self {
            Self::East => Self::South,
            Self::South => Self::West,
            Self::West => Self::North,
            Self::North => Self::East,
        }
    }

    /// Reverses the direction: `(dx, dy)` becomes `(-dx, -dy)`.
    #[must_use]
    pub const fn reversed(self) -> Self {
        match self {
            Self::East => Self::West,
            Self::West => Self::East,
            Self::North => Self::South,
            Self::South => Self::North,
        }
    }
}

impl TryFrom<(i32, i32)> for Direction {
    type Error = DirectionError;

    fn try_from(offset: (i32, i32)) -> Result<Self, Self::Error> {
        match offset {
            (1, 0) => Ok(Self::East),
            (-1, 0) => Ok(Self::West),
            (0, 1) => Ok(Self::North),
            (0, -1) => Ok(Self::South),
            (dx, dy) => Err(DirectionError::NotAxisAligned { dx, dy }),
        }
    }
}

/// Errors raised when converting raw vectors into directions.
#[derive(Clone, Copy, Debug, Error, PartialEq, Eq)]
pub enum DirectionError {
    /// The vector is not one of the four unit vectors.
    #[error("({dx}, {dy}) is not an axis-aligned unit vector")]
    NotAxisAligned {
        /// Column delta of the rejected vector.
        dx: i32,
        /// Row delta of the rejected vector.
        dy: i32,
    },
}

/// Behaviour class of a tile.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TileKind {
    /// Plain walkable tile.
    Normal,
    /// Tile the agent starts on.
    StartingTile,
    /// Tile that wins the traversal when entered.
    GoalTile,
    /// Solid tile that fails the traversal when entered.
    Block,
    /// Hole that fails the traversal when entered.
    Empty,
    /// Locked tile; behaves as a normal tile once entered.
    Locked,
    /// Portal tile; not yet implemented.
    Portal,
    /// Paired teleport terminus.
    Teleport,
    /// Turns the agent 90 degrees anticlockwise.
    Rotate90Left,
    /// Turns the agent 90 degrees clockwise.
    Rotate90Right,
    /// Reverses the agent.
    Rotate180,
    /// Jumps the agent forward across one or more cells.
    JumpForward,
    /// Vertical jump; not yet implemented.
    JumpVertical,
    /// Speed boost; not yet implemented.
    SpeedUp,
    /// Trigger plate; not yet implemented.
    Trigger,
    /// Door; not yet implemented.
    Door,
}

impl TileKind {
    /// Every tile kind in declaration order.
    pub const ALL: [Self; 16] = [
        Self::Normal,
        Self::StartingTile,
        Self::GoalTile,
        Self::Block,
        Self::Empty,
        Self::Locked,
        Self::Portal,
        Self::Teleport,
        Self::Rotate90Left,
        Self::Rotate90Right,
        Self::Rotate180,
        Self::JumpForward,
        Self::JumpVertical,
        Self::SpeedUp,
        Self::Trigger,
        Self::Door,
    ];
}

/// Immutable per-cell configuration authored with the level.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TileDescriptor {
    kind: TileKind,
    #[serde(default = "default_walkable")]
    walkable: bool,
    #[serde(default)]
    locked: bool,
    #[serde(default)]
    not_jumpable: bool,
    #[serde(default = "default_jump_distance")]
    jump_distance: u32,
    #[serde(default)]
    teleport_id: u32,
    #[serde(default = "default_exit_direction")]
    exit_direction: Direction,
}

const DEFAULT_JUMP_DISTANCE: u32 = 1;

fn default_walkable() -> bool {
    true
}

fn default_jump_distance() -> u32 {
    DEFAULT_JUMP_DISTANCE
}

fn default_exit_direction() -> Direction {
    Direction::East
}

impl TileDescriptor {
    /// Creates a walkable, unlocked, jumpable descriptor of the provided kind.
    #[must_use]
    pub const fn new(kind: TileKind) -> Self {
        Self {
            kind,
            walkable: true,
            locked: false,
            not_jumpable: false,
            jump_distance: DEFAULT_JUMP_DISTANCE,
            teleport_id: 0,
            exit_direction: Direction::East,
        }
    }

    /// Creates a teleport terminus paired by `teleport_id`.
    #[must_use]
    pub const fn teleport(teleport_id: u32, exit_direction: Direction) -> Self {
        Self::new(TileKind::Teleport)
            .with_teleport_id(teleport_id)
            .with_exit_direction(exit_direction)
    }

    /// Creates a forward jump tile skipping `jump_distance` cells.
    #[must_use]
    pub const fn jump(jump_distance: u32) -> Self {
        Self::new(TileKind::JumpForward).with_jump_distance(jump_distance)
    }

    /// Returns a copy with the walkable flag replaced.
    #[must_use]
    pub const fn with_walkable(mut self, walkable: bool) -> Self {
        self.walkable = walkable;
        self
    }

    /// Returns a copy with the locked flag replaced.
    #[must_use]
    pub const fn with_locked(mut self, locked: bool) -> Self {
        self.locked = locked;
        self
    }

    /// Returns a copy with the not-jumpable flag replaced.
    #[must_use]
    pub const fn with_not_jumpable(mut self, not_jumpable: bool) -> Self {
        self.not_jumpable = not_jumpable;
        self
    }

    /// Returns a copy with the jump distance replaced.
    #[must_use]
    pub const fn with_jump_distance(mut self, jump_distance: u32) -> Self {
        self.jump_distance = jump_distance;
        self
    }

    /// Returns a copy with the teleport identifier replaced.
    #[must_use]
    pub const fn with_teleport_id(mut self, teleport_id: u32) -> Self {
        self.teleport_id = teleport_id;
        self
    }

    /// Returns a copy with the teleport exit direction replaced.
    #[must_use]
    pub const fn with_exit_direction(mut self, exit_direction: Direction) -> Self {
        self.exit_direction = exit_direction;
        self
    }

    /// Behaviour class of the tile.
    #[must_use]
    pub const fn kind(&self) -> TileKind {
        self.kind
    }

    /// Reports whether a jump may land on the tile.
    #[must_use]
    pub const fn is_walkable(&self) -> bool {
        self.walkable
    }

    /// Reports whether the tile refuses entry.
    #[must_use]
    pub const fn is_locked(&self) -> bool {
        self.locked
    }

    /// Reports whether the tile may not be jumped over.
    #[must_use]
    pub const fn is_not_jumpable(&self) -> bool {
        self.not_jumpable
    }

    /// Number of cells skipped by a jump; the landing cell is one further.
    #[must_use]
    pub const fn jump_distance(&self) -> u32 {
        self.jump_distance
    }

    /// Teleport pairing identifier, `0` when the tile is not a terminus.
    #[must_use]
    pub const fn teleport_id(&self) -> u32 {
        self.teleport_id
    }

    /// Direction assigned to the agent after arriving through this tile.
    #[must_use]
    pub const fn exit_direction(&self) -> Direction {
        self.exit_direction
    }

    /// Reports whether the player may pick the tile during setup.
    #[must_use]
    pub const fn is_selectable(&self) -> bool {
        !matches!(
            self.kind,
            TileKind::StartingTile | TileKind::GoalTile | TileKind::Locked
        )
    }

    /// Reports whether the player may rearrange the tile during setup.
    ///
    /// Unlike [`Self::is_selectable`], this honours the locked flag rather
    /// than the [`TileKind::Locked`] kind.
    #[must_use]
    pub const fn is_movable(&self) -> bool {
        !self.locked && !matches!(self.kind, TileKind::StartingTile | TileKind::GoalTile)
    }
}

#[cfg(test)]
mod tests {
    use super::{Direction, DirectionError, GridCoord, TileDescriptor, TileKind};
    use serde::{de::DeserializeOwned, Serialize};

    #[test]
    fn setup_rules_exclude_endpoints() {
        for kind in TileKind::ALL {
            let tile = TileDescriptor::new(kind);
            let endpoint = matches!(kind, TileKind::StartingTile | TileKind::GoalTile);

            assert_eq!(
                tile.is_selectable(),
                !endpoint && kind != TileKind::Locked,
                "selectable for {kind:?}"
            );
            assert_eq!(tile.is_movable(), !endpoint, "movable for {kind:?}");

            let locked = tile.with_locked(true);
            assert_eq!(locked.is_selectable(), tile.is_selectable());
            assert!(!locked.is_movable(), "locked {kind:?} stays in place");
        }
    }

    #[test]
    fn rotations_compose_for_every_direction() {
        for direction in Direction::ALL {
            assert_eq!(direction.rotate_right().rotate_left(), direction);
            assert_eq!(direction.rotate_left().rotate_right(), direction);
            assert_eq!(direction.reversed().reversed(), direction);
            assert_eq!(direction.reversed(), direction.rotate_left().rotate_left());
            assert_eq!(direction.reversed(), direction.rotate_right().rotate_right());
        }
    }

    #[test]
    fn rotations_match_vector_formulas() {
        for direction in Direction::ALL {
            let (dx, dy) = direction.offset();
            assert_eq!(direction.rotate_left().offset(), (-dy, dx));
            assert_eq!(direction.rotate_right().offset(), (dy, -dx));
            assert_eq!(direction.reversed().offset(), (-dx, -dy));
        }
    }

    #[test]
    fn direction_conversion_rejects_diagonals() {
        assert_eq!(Direction::try_from((0, 1)), Ok(Direction::North));
        assert_eq!(
            Direction::try_from((1, 1)),
            Err(DirectionError::NotAxisAligned { dx: 1, dy: 1 })
        );
        assert!(Direction::try_from((2, 0)).is_err());
    }

    #[test]
    fn advanced_scales_offset() {
        let origin = GridCoord::new(0, 0);
        assert_eq!(
            origin.advanced(Direction::East, 2),
            Some(GridCoord::new(2, 0))
        );
        assert_eq!(
            origin.neighbor(Direction::South),
            Some(GridCoord::new(0, -1))
        );
    }

    #[test]
    fn advanced_reports_overflow_as_missing() {
        let edge = GridCoord::new(i32::MAX, 0);
        assert_eq!(edge.neighbor(Direction::East), None);
        assert_eq!(GridCoord::new(0, 0).advanced(Direction::West, u32::MAX), None);
    }

    #[test]
    fn descriptor_defaults_match_authoring_defaults() {
        let tile = TileDescriptor::new(TileKind::Normal);
        assert!(tile.is_walkable());
        assert!(!tile.is_locked());
        assert!(!tile.is_not_jumpable());
        assert_eq!(tile.jump_distance(), 1);
        assert_eq!(tile.teleport_id(), 0);
        assert_eq!(tile.exit_direction(), Direction::East);
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
    fn teleport_descriptor_round_trips_through_bincode() {
        assert_round_trip(&TileDescriptor::teleport(7, Direction::North));
    }

    #[test]
    fn grid_coord_round_trips_through_bincode() {
        assert_round_trip(&GridCoord::new(-3, 12));
    }
}
