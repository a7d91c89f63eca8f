#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Run controller that owns the level's game phase.
//!
//! The controller translates player intent (play, retry) into traversal
//! commands and reacts to the world's terminal events by moving between
//! [`RunPhase`] values and notifying registered handlers. Handlers are owned
//! by the controller and dropped with it.

use std::fmt;

use log::info;
use slide_grid_core::{Command, Direction, Event, GridCoord};

/// Overall phase of a level attempt.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum RunPhase {
    /// The player is arranging the board and may press play.
    #[default]
    Setup,
    /// A traversal is in flight.
    Playing,
    /// The last traversal reached the goal.
    Won,
    /// The last traversal failed.
    Lost,
}

type Handler = Box<dyn FnMut()>;

/// Drives level phases from player intent and world events.
pub struct RunController {
    start: GridCoord,
    start_direction: Direction,
    phase: RunPhase,
    succeeded_handlers: Vec<Handler>,
    failed_handlers: Vec<Handler>,
}

impl RunController {
    /// Creates a controller that starts traversals from the provided cell.
    #[must_use]
    pub fn new(start: GridCoord, start_direction: Direction) -> Self {
        Self {
            start,
            start_direction,
            phase: RunPhase::Setup,
            succeeded_handlers: Vec::new(),
            failed_handlers: Vec::new(),
        }
    }

    /// Current phase of the level attempt.
    #[must_use]
    pub fn phase(&self) -> RunPhase {
        self.phase
    }

    /// Registers a handler invoked each time a traversal reaches the goal.
    pub fn on_succeeded<F>(&mut self, handler: F)
    where
        F: FnMut() + 'static,
    {
        self.succeeded_handlers.push(Box::new(handler));
    }

    /// Registers a handler invoked each time a traversal fails.
    pub fn on_failed<F>(&mut self, handler: F)
    where
        F: FnMut() + 'static,
    {
        self.failed_handlers.push(Box::new(handler));
    }

    /// Starts a traversal when the level is in setup; ignored otherwise.
    pub fn play(&mut self, out: &mut Vec<Command>) {
        if self.phase != RunPhase::Setup {
            return;
        }

        self.phase = RunPhase::Playing;
        info!("[RunController] Setup -> Playing");
        out.push(Command::StartTraversal {
            position: self.start,
            direction: self.start_direction,
        });
    }

    /// Cancels any traversal and returns the level to setup.
    pub fn retry(&mut self, out: &mut Vec<Command>) {
        info!("[RunController] {:?} -> Setup", self.phase);
        self.phase = RunPhase::Setup;
        out.push(Command::StopTraversal);
    }

    /// Consumes world events, transitioning phases on terminal outcomes.
    pub fn handle(&mut self, events: &[Event]) {
        for event in events {
            if self.phase != RunPhase::Playing {
                return;
            }

            match event {
                Event::TraversalSucceeded { .. } => {
                    self.phase = RunPhase::Won;
                    info!("[RunController] Playing -> Won");
                    for handler in &mut self.succeeded_handlers {
                        handler();
                    }
                }
                Event::TraversalFailed { .. } => {
                    self.phase = RunPhase::Lost;
                    info!("[RunController] Playing -> Lost");
                    for handler in &mut self.failed_handlers {
                        handler();
                    }
                }
                Event::TraversalStopped => {
                    self.phase = RunPhase::Setup;
                    info!("[RunController] Playing -> Setup");
                }
                _ => {}
            }
        }
    }
}

impl fmt::Debug for RunController {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RunController")
            .field("start", &self.start)
            .field("start_direction", &self.start_direction)
            .field("phase", &self.phase)
            .field("succeeded_handlers", &self.succeeded_handlers.len())
            .field("failed_handlers", &self.failed_handlers.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn play_is_ignored_outside_setup() {
        let mut controller = RunController::new(GridCoord::new(0, 0), Direction::East);
        let mut commands = Vec::new();

        controller.play(&mut commands);
        controller.play(&mut commands);

        assert_eq!(commands.len(), 1, "second press is ignored while playing");
        assert_eq!(controller.phase(), RunPhase::Playing);
    }

    #[test]
    fn terminal_events_are_ignored_during_setup() {
        let mut controller = RunController::new(GridCoord::new(0, 0), Direction::East);
        controller.handle(&[Event::TraversalSucceeded {
            position: GridCoord::new(1, 0),
        }]);
        assert_eq!(controller.phase(), RunPhase::Setup);
    }
}
