use crate::error::MowerResult;
use crate::lawn::Lawn;
use crate::mower::{Command, Mower, Program, Status};
use crate::replay::{create_replay_logger, ReplayLogger};
use crate::scenario::Scenario;
use log::{info, trace};
use serde::Serialize;

/// Replays the programs of a scenario on its mowers.
/// Main entry point for running a scenario.
pub struct ScenarioPlayer {
    scenario: Scenario,
    replay_logger: Box<dyn ReplayLogger>,
}

/// One entry of a mower history: the command just applied and the status it led to.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize)]
pub struct Step {
    pub status: Status,
    pub command: Command,
}

/// Step-by-step record of a replay, for visualizers.
#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize)]
pub struct History {
    /// The steps of each mower where the index is the mower rank in the scenario.
    pub steps: Vec<Vec<Step>>,
    /// The status of each mower before its program ran.
    pub initial: Vec<Status>,
}

impl History {
    /// Number of frames needed to show every mower: its initial status plus one per step.
    pub fn frame_count(&self) -> usize {
        self.steps.iter().map(|steps| steps.len() + 1).sum()
    }

    /// Maps a frame number to the mower it shows and the step within that mower's program.
    ///
    /// Step 0 is the initial status of the mower.
    pub fn locate(&self, frame: usize) -> Option<(usize, usize)> {
        let mut first = 0;
        for (mower, steps) in self.steps.iter().enumerate() {
            if frame < first + steps.len() + 1 {
                return Some((mower, frame - first));
            }
            first += steps.len() + 1;
        }
        None
    }

    /// The status of a mower after `step` commands.
    pub fn status_at(&self, mower: usize, step: usize) -> Option<Status> {
        match step {
            0 => self.initial.get(mower).copied(),
            _ => self
                .steps
                .get(mower)
                .and_then(|steps| steps.get(step - 1))
                .map(|step| step.status),
        }
    }

    /// The command a mower runs after `step` commands, if its program is not over.
    pub fn next_command(&self, mower: usize, step: usize) -> Option<Command> {
        self.steps
            .get(mower)
            .and_then(|steps| steps.get(step))
            .map(|step| step.command)
    }

    /// The final status of each mower formatted as `x y O`.
    pub fn final_statuses(&self) -> Vec<String> {
        (0..self.initial.len())
            .filter_map(|mower| {
                let last = self.steps.get(mower).map_or(0, |steps| steps.len());
                self.status_at(mower, last)
            })
            .map(|status| status.to_string())
            .collect()
    }
}

impl ScenarioPlayer {
    /// Creates a new player.
    ///
    /// # Arguments
    /// * `scenario` - The parsed scenario to replay.
    /// * `replay_filename` - The filename to save the replay to. If `None`, no replay will be saved.
    pub fn new(scenario: Scenario, replay_filename: Option<String>) -> MowerResult<ScenarioPlayer> {
        let bounds = scenario.lawn().bounds()?;
        Ok(ScenarioPlayer::with_replay_logger(
            scenario,
            create_replay_logger(replay_filename, bounds),
        ))
    }

    /// Creates a new player reporting every step to the given logger.
    pub fn with_replay_logger(
        scenario: Scenario,
        replay_logger: Box<dyn ReplayLogger>,
    ) -> ScenarioPlayer {
        ScenarioPlayer {
            scenario,
            replay_logger,
        }
    }

    /// Runs the program of every mower, in file order.
    ///
    /// Returns the final status of each mower formatted as `x y O`.
    pub fn replay(&mut self) -> MowerResult<Vec<String>> {
        self.replay_logger.clear();
        let (lawn, mowers) = self.scenario.split_mut();

        let mut statuses = Vec::with_capacity(mowers.len());
        for (mower, program) in mowers.iter_mut() {
            play(lawn, mower, program, self.replay_logger.as_mut())?;
            statuses.push(mower.status().to_string());
        }

        self.replay_logger.save()?;
        info!("Replayed {} mower(s)", statuses.len());
        Ok(statuses)
    }

    /// Runs the program of every mower one command at a time and records each step.
    pub fn replay_with_history(&mut self) -> MowerResult<History> {
        self.replay_logger.clear();
        let (lawn, mowers) = self.scenario.split_mut();

        let mut history = History::default();
        for (mower, program) in mowers.iter_mut() {
            history.initial.push(mower.status());
            history
                .steps
                .push(play(lawn, mower, program, self.replay_logger.as_mut())?);
        }

        self.replay_logger.save()?;
        info!(
            "Replayed {} mower(s) over {} frame(s)",
            history.steps.len(),
            history.frame_count()
        );
        Ok(history)
    }

    /// Draws one frame of a history to the console.
    ///
    /// Returns `false` once `frame` is past the end of the history.
    pub fn draw_frame(&self, history: &History, frame: usize, title: &str) -> MowerResult<bool> {
        let Some((mower, step)) = history.locate(frame) else {
            return Ok(false);
        };
        let Some(status) = history.status_at(mower, step) else {
            return Ok(false);
        };

        let title = format!("{}\nMower {}, step {}", title, mower + 1, step);
        self.scenario
            .lawn()
            .draw(&title, &status, history.next_command(mower, step))?;
        Ok(true)
    }

    pub fn scenario(&self) -> &Scenario {
        &self.scenario
    }

    pub fn into_scenario(self) -> Scenario {
        self.scenario
    }
}

// Applies a program command by command, reporting each one to the logger
fn play(
    lawn: &Lawn,
    mower: &mut Mower,
    program: &Program,
    replay_logger: &mut dyn ReplayLogger,
) -> MowerResult<Vec<Step>> {
    replay_logger.log_start(mower.id(), program.to_string(), mower.status());

    let mut steps = Vec::with_capacity(program.len());
    for (index, command) in program.commands().iter().enumerate() {
        let outcome = mower.apply_command(*command, lawn)?;
        let status = mower.status();
        trace!("Mower {} {:?} on {} -> {}", mower.id(), outcome, command, status);

        replay_logger.log_step(mower.id(), index + 1, *command, outcome, status);
        steps.push(Step {
            status,
            command: *command,
        });
    }

    replay_logger.log_finish(mower.id(), mower.status());
    Ok(steps)
}
