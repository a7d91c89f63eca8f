#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative traversal state for Slide Grid.
//!
//! The world owns the grid and the single traversal in flight. Adapters and
//! systems drive it exclusively through [`apply`], which commits the outcome
//! of each step and reports it as [`Event`] values.

use std::collections::HashSet;

use log::{debug, info};
use slide_grid_board::Grid;
use slide_grid_core::{Command, Direction, Event, FailReason, GridCoord, TraversalStatus};
use slide_grid_system_effects::{resolve, Resolution};

/// Tunables applied to every traversal run by a world.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct WorldConfig {
    max_steps: Option<u32>,
}

impl WorldConfig {
    /// Creates a configuration with an optional ceiling on steps per run.
    #[must_use]
    pub const fn new(max_steps: Option<u32>) -> Self {
        Self { max_steps }
    }

    /// Maximum number of committed steps before a run fails, if any.
    #[must_use]
    pub const fn max_steps(&self) -> Option<u32> {
        self.max_steps
    }
}

/// Represents the authoritative Slide Grid world state.
#[derive(Debug)]
pub struct World {
    grid: Grid,
    config: WorldConfig,
    status: TraversalStatus,
    traversal: Option<Traversal>,
    tick_index: u64,
}

impl World {
    /// Creates an idle world traversing the provided grid.
    #[must_use]
    pub fn new(grid: Grid, config: WorldConfig) -> Self {
        Self {
            grid,
            config,
            status: TraversalStatus::Idle,
            traversal: None,
            tick_index: 0,
        }
    }

    fn start(&mut self, position: GridCoord, direction: Direction, out_events: &mut Vec<Event>) {
        self.traversal = Some(Traversal::new(position, direction));
        self.status = TraversalStatus::Running;
        debug!("[Traversal] Started at {position:?} heading {direction:?}");
        out_events.push(Event::TraversalStarted {
            position,
            direction,
        });
    }

    fn stop(&mut self, out_events: &mut Vec<Event>) {
        if self.status == TraversalStatus::Idle {
            return;
        }
        let was_running = self.status == TraversalStatus::Running;
        self.traversal = None;
        self.status = TraversalStatus::Idle;
        if was_running {
            debug!("[Traversal] Stopped");
            out_events.push(Event::TraversalStopped);
        }
    }

    fn step(&mut self, out_events: &mut Vec<Event>) {
        if self.status != TraversalStatus::Running {
            return;
        }
        let Some(traversal) = self.traversal.as_mut() else {
            return;
        };

        let from = traversal.position;
        let heading = traversal.direction;
        let Some((candidate, tile)) = from
            .neighbor(heading)
            .and_then(|candidate| self.grid.tile(candidate).map(|tile| (candidate, tile)))
        else {
            self.status = TraversalStatus::Failed;
            finish_failed(from, FailReason::NoTileAhead, out_events);
            return;
        };

        if tile.is_locked() {
            self.status = TraversalStatus::Failed;
            finish_failed(from, FailReason::LockedTile, out_events);
            return;
        }

        match resolve(tile, &self.grid, heading, candidate) {
            Resolution::Fail { reason } => {
                self.status = TraversalStatus::Failed;
                finish_failed(from, reason, out_events);
                return;
            }
            Resolution::Win => {
                traversal.commit(candidate, heading);
                out_events.push(Event::AgentAdvanced {
                    from,
                    to: candidate,
                });
                self.status = TraversalStatus::Succeeded;
                info!("[Traversal] Goal reached at {candidate:?}");
                out_events.push(Event::TraversalSucceeded {
                    position: candidate,
                });
                return;
            }
            Resolution::Continue { direction } => {
                traversal.commit(candidate, direction);
                out_events.push(Event::AgentAdvanced {
                    from,
                    to: candidate,
                });
                if direction != heading {
                    out_events.push(Event::DirectionChanged {
                        at: candidate,
                        from: heading,
                        to: direction,
                    });
                }
            }
            Resolution::Teleport {
                position,
                direction,
            } => {
                traversal.commit(position, direction);
                out_events.push(Event::AgentAdvanced {
                    from,
                    to: candidate,
                });
                out_events.push(Event::AgentTeleported {
                    entry: candidate,
                    exit: position,
                    direction,
                });
            }
            Resolution::Jump { position } => {
                traversal.commit(position, heading);
                out_events.push(Event::AgentAdvanced {
                    from,
                    to: candidate,
                });
                out_events.push(Event::AgentJumped {
                    from: candidate,
                    over: candidate.neighbor(heading).unwrap_or(position),
                    to: position,
                });
            }
        }

        let reason = if traversal.revisited() {
            Some(FailReason::LoopDetected)
        } else if self
            .config
            .max_steps
            .is_some_and(|limit| traversal.steps >= limit)
        {
            Some(FailReason::StepLimitExceeded)
        } else {
            None
        };

        if let Some(reason) = reason {
            let position = traversal.position;
            self.status = TraversalStatus::Failed;
            finish_failed(position, reason, out_events);
        }
    }
}

fn finish_failed(position: GridCoord, reason: FailReason, out_events: &mut Vec<Event>) {
    info!(
        "[Traversal] Failed at {position:?}: {}",
        reason.description()
    );
    out_events.push(Event::TraversalFailed { position, reason });
}

/// Applies the provided command to the world, mutating state deterministically.
pub fn apply(world: &mut World, command: Command, out_events: &mut Vec<Event>) {
    match command {
        Command::StartTraversal {
            position,
            direction,
        } => world.start(position, direction, out_events),
        Command::StopTraversal => world.stop(out_events),
        Command::Step => world.step(out_events),
        Command::Tick { dt } => {
            world.tick_index = world.tick_index.saturating_add(1);
            out_events.push(Event::TimeAdvanced { dt });
        }
    }
}

/// Swaps the world's grid, discarding any traversal built against the old one.
pub fn replace_grid(world: &mut World, grid: Grid, out_events: &mut Vec<Event>) {
    world.stop(out_events);
    world.grid = grid;
}

/// Query functions that provide read-only access to the world state.
pub mod query {
    use super::World;
    use slide_grid_board::Grid;
    use slide_grid_core::{Direction, GridCoord, TraversalStatus};

    /// Provides read-only access to the grid being traversed.
    #[must_use]
    pub fn grid(world: &World) -> &Grid {
        &world.grid
    }

    /// Current lifecycle status of the traversal stepper.
    #[must_use]
    pub fn traversal_status(world: &World) -> TraversalStatus {
        world.status
    }

    /// Cell the agent occupies, if a traversal exists.
    #[must_use]
    pub fn position(world: &World) -> Option<GridCoord> {
        world.traversal.as_ref().map(|traversal| traversal.position)
    }

    /// Direction the agent travels in, if a traversal exists.
    #[must_use]
    pub fn direction(world: &World) -> Option<Direction> {
        world.traversal.as_ref().map(|traversal| traversal.direction)
    }

    /// Number of steps committed by the current traversal.
    #[must_use]
    pub fn steps_taken(world: &World) -> u32 {
        world.traversal.as_ref().map_or(0, |traversal| traversal.steps)
    }

    /// Number of ticks processed since the world was created.
    #[must_use]
    pub fn tick_index(world: &World) -> u64 {
        world.tick_index
    }
}

#[derive(Clone, Debug)]
struct Traversal {
    position: GridCoord,
    direction: Direction,
    steps: u32,
    visited: HashSet<(GridCoord, Direction)>,
    repeated: bool,
}

impl Traversal {
    fn new(position: GridCoord, direction: Direction) -> Self {
        let mut visited = HashSet::new();
        let _ = visited.insert((position, direction));
        Self {
            position,
            direction,
            steps: 0,
            visited,
            repeated: false,
        }
    }

    fn commit(&mut self, position: GridCoord, direction: Direction) {
        self.position = position;
        self.direction = direction;
        self.steps = self.steps.saturating_add(1);
        self.repeated = !self.visited.insert((position, direction));
    }

    // The grid cannot change mid-run, so a repeated state repeats forever.
    fn revisited(&self) -> bool {
        self.repeated
    }
}
