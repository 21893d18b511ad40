//! # mowers_engine
//!
//! The core engine for robotic mowers on a rectangular lawn.
//! A scenario file gives the lawn bounds followed by, for each mower, its initial
//! status and the program of `A` (forward), `G` (left) and `D` (right) commands to run.

pub mod player;
pub use player::History;
pub use player::ScenarioPlayer;
pub use player::Step;

pub mod replay;
pub use replay::ReplayLogger;

pub mod scenario;
pub use scenario::Scenario;

pub use error::{MowerError, MowerResult};
pub use lawn::{GridBounds, Lawn};
pub use mower::{Command, CommandOutcome, Mower, Orientation, Position, Program, Status, Turn};

mod error;
mod lawn;
mod mower;
