use std::time::Duration;

use slide_grid_board::Level;
use slide_grid_core::{Command, Event};
use slide_grid_system_pacing::{Config, Pacing};
use slide_grid_system_run_control::{RunController, RunPhase};
use slide_grid_world::{self as world, World, WorldConfig};

/// Timing and limits applied to a headless run.
#[derive(Clone, Copy, Debug)]
pub(crate) struct RunOptions {
    /// Simulated time advanced per tick.
    pub(crate) tick: Duration,
    /// Simulated time between consecutive steps.
    pub(crate) step_interval: Duration,
    /// Optional ceiling on steps before the run fails.
    pub(crate) max_steps: Option<u32>,
}

/// Outcome of a headless run.
#[derive(Debug)]
pub(crate) struct RunReport {
    /// Phase the run controller settled in.
    pub(crate) phase: RunPhase,
    /// Every event broadcast by the world, in order.
    pub(crate) events: Vec<Event>,
    /// Number of ticks simulated.
    pub(crate) ticks: u64,
}

/// Plays a level from setup until the run controller leaves the playing phase.
pub(crate) fn run(level: Level, options: RunOptions) -> RunReport {
    let start = level.start();
    let start_direction = level.start_direction();
    let mut world = World::new(level.into_grid(), WorldConfig::new(options.max_steps));
    let mut pacing = Pacing::new(Config::new(options.step_interval));
    let mut controller = RunController::new(start, start_direction);
    let mut trace = Vec::new();

    let mut commands = Vec::new();
    controller.play(&mut commands);
    dispatch(&mut world, &mut pacing, &mut controller, commands, &mut trace);

    let mut ticks = 0;
    while controller.phase() == RunPhase::Playing {
        ticks += 1;
        let tick = vec![Command::Tick { dt: options.tick }];
        dispatch(&mut world, &mut pacing, &mut controller, tick, &mut trace);
    }

    RunReport {
        phase: controller.phase(),
        events: trace,
        ticks,
    }
}

fn dispatch(
    world: &mut World,
    pacing: &mut Pacing,
    controller: &mut RunController,
    mut commands: Vec<Command>,
    trace: &mut Vec<Event>,
) {
    while !commands.is_empty() {
        let mut events = Vec::new();
        for command in commands.drain(..) {
            world::apply(world, command, &mut events);
        }
        controller.handle(&events);
        pacing.handle(&events, &mut commands);
        trace.extend(events.into_iter().filter(|event| {
            !matches!(event, Event::TimeAdvanced { .. })
        }));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use slide_grid_board::LevelDefinition;
    use slide_grid_core::GridCoord;

    const TUTORIAL: &str = include_str!("../levels/tutorial.toml");

    fn options() -> RunOptions {
        RunOptions {
            tick: Duration::from_millis(100),
            step_interval: Duration::from_millis(600),
            max_steps: None,
        }
    }

    #[test]
    fn tutorial_level_is_won() {
        let definition: LevelDefinition = toml::from_str(TUTORIAL).expect("tutorial parses");
        let level = definition.build().expect("tutorial validates");

        let report = run(level, options());

        assert_eq!(report.phase, RunPhase::Won);
        assert_eq!(report.ticks, 30, "five steps of six ticks each");
        assert_eq!(
            report.events.last(),
            Some(&Event::TraversalSucceeded {
                position: GridCoord::new(10, 4)
            })
        );
    }

    #[test]
    fn step_limit_loses_the_tutorial() {
        let definition: LevelDefinition = toml::from_str(TUTORIAL).expect("tutorial parses");
        let level = definition.build().expect("tutorial validates");

        let report = run(
            level,
            RunOptions {
                max_steps: Some(2),
                ..options()
            },
        );

        assert_eq!(report.phase, RunPhase::Lost);
    }
}
