use crate::error::{MowerError, MowerResult};
use crate::lawn::Lawn;
use rand::distributions::{Distribution, Standard};
use rand::Rng;
use serde::{Serialize, Serializer};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Represents the compass heading of a mower.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum Orientation {
    North,
    East,
    South,
    West,
}

// Keep this order: turning walks the cycle by index.
const ORIENTATIONS: [Orientation; 4] = [
    Orientation::North,
    Orientation::East,
    Orientation::South,
    Orientation::West,
];

#[derive(Clone, Copy)]
enum Axis {
    X,
    Y,
}

// Forward motion for each orientation, indexed like `ORIENTATIONS`.
// Only one coordinate ever changes, by one cell.
const FORWARD_DELTAS: [(Axis, i64); 4] = [(Axis::Y, 1), (Axis::X, 1), (Axis::Y, -1), (Axis::X, -1)];

impl Orientation {
    /// Parses one of the `N`, `E`, `S`, `W` symbols.
    pub fn from_symbol(symbol: char) -> MowerResult<Orientation> {
        match symbol {
            'N' => Ok(Orientation::North),
            'E' => Ok(Orientation::East),
            'S' => Ok(Orientation::South),
            'W' => Ok(Orientation::West),
            _ => Err(MowerError::InvalidOrientationSymbol { symbol }),
        }
    }

    pub fn symbol(self) -> char {
        match self {
            Orientation::North => 'N',
            Orientation::East => 'E',
            Orientation::South => 'S',
            Orientation::West => 'W',
        }
    }

    /// The orientation reached after a quarter turn in the given direction.
    pub fn turned(self, turn: Turn) -> Orientation {
        let step = match turn {
            Turn::Right => 1,
            // Retreating one step is advancing three in a cycle of four
            Turn::Left => ORIENTATIONS.len() - 1,
        };
        ORIENTATIONS[(self.index() + step) % ORIENTATIONS.len()]
    }

    fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for Orientation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.symbol())
    }
}

impl Serialize for Orientation {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// A cell of the lawn. The origin (0, 0) is the lower-left corner.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq, Serialize)]
pub struct Position {
    pub x: u32,
    pub y: u32,
}

impl Position {
    pub fn new(x: u32, y: u32) -> Position {
        Position { x, y }
    }

    /// Creates a position from raw signed coordinates.
    ///
    /// Fails with `InvalidPosition` when a coordinate is negative or too large.
    pub fn from_raw(x: i64, y: i64) -> MowerResult<Position> {
        match (u32::try_from(x), u32::try_from(y)) {
            (Ok(x), Ok(y)) => Ok(Position { x, y }),
            _ => Err(MowerError::InvalidPosition { x, y }),
        }
    }
}

/// The direction of a quarter turn.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Turn {
    Right,
    Left,
}

/// A single instruction of a mower program.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum Command {
    /// Move one cell ahead (`A`).
    Forward,
    /// Quarter turn to the left (`G`).
    TurnLeft,
    /// Quarter turn to the right (`D`).
    TurnRight,
}

impl Command {
    /// Parses one of the `A`, `G`, `D` symbols.
    pub fn from_symbol(symbol: char) -> MowerResult<Command> {
        match symbol {
            'A' => Ok(Command::Forward),
            'G' => Ok(Command::TurnLeft),
            'D' => Ok(Command::TurnRight),
            _ => Err(MowerError::InvalidCommand { symbol }),
        }
    }

    pub fn symbol(self) -> char {
        match self {
            Command::Forward => 'A',
            Command::TurnLeft => 'G',
            Command::TurnRight => 'D',
        }
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.symbol())
    }
}

impl Serialize for Command {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl Distribution<Command> for Standard {
    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> Command {
        match rng.gen_range(0..3) {
            0 => Command::Forward,
            1 => Command::TurnLeft,
            _ => Command::TurnRight,
        }
    }
}

/// What applying a command did to a mower.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize)]
pub enum CommandOutcome {
    /// The mower advanced one cell.
    Move,
    /// The mower changed orientation.
    Turn,
    /// The mower faced the edge of the lawn and stayed in place.
    Blocked,
}

/// An ordered sequence of commands for one mower.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct Program {
    commands: Vec<Command>,
}

impl Program {
    pub fn new(commands: Vec<Command>) -> Program {
        Program { commands }
    }

    /// Generates a program of `len` random commands.
    pub fn random<R: Rng + ?Sized>(rng: &mut R, len: usize) -> Program {
        Program {
            commands: (0..len).map(|_| rng.gen()).collect(),
        }
    }

    pub fn commands(&self) -> &[Command] {
        &self.commands
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }
}

impl FromStr for Program {
    type Err = MowerError;

    /// Parses a string of `A`, `G`, `D` symbols, rejecting it whole on the first unknown one.
    fn from_str(codes: &str) -> MowerResult<Program> {
        codes
            .chars()
            .map(Command::from_symbol)
            .collect::<MowerResult<Vec<_>>>()
            .map(Program::new)
    }
}

impl FromIterator<Command> for Program {
    fn from_iter<I: IntoIterator<Item = Command>>(iter: I) -> Program {
        Program::new(iter.into_iter().collect())
    }
}

impl fmt::Display for Program {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.commands
            .iter()
            .try_for_each(|command| write!(f, "{}", command))
    }
}

/// Snapshot of a mower: where it stands and where it faces.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize)]
pub struct Status {
    #[serde(flatten)]
    pub position: Position,
    pub orientation: Orientation,
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} {}",
            self.position.x, self.position.y, self.orientation
        )
    }
}

/// A robotic mower.
///
/// The mower does not own the lawn: every move is checked against the lawn handed to it,
/// so several mowers can share the same bounds.
#[derive(Clone, Debug, PartialEq)]
pub struct Mower {
    id: String,
    position: Position,
    orientation: Orientation,
}

impl Mower {
    /// Creates a new mower.
    ///
    /// Bounds are not checked here since the lawn may not be configured yet.
    ///
    /// # Arguments
    /// * `position` - The initial position of the mower.
    /// * `orientation` - The initial orientation of the mower.
    pub fn new(position: Position, orientation: Orientation) -> Mower {
        Mower {
            id: Uuid::new_v4().to_string(),
            position,
            orientation,
        }
    }

    /// Creates a new mower from unchecked coordinates and an orientation symbol.
    pub fn from_raw(x: i64, y: i64, orientation: char) -> MowerResult<Mower> {
        let position = Position::from_raw(x, y)?;
        let orientation = Orientation::from_symbol(orientation)?;
        Ok(Mower::new(position, orientation))
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn position(&self) -> Position {
        self.position
    }

    pub fn orientation(&self) -> Orientation {
        self.orientation
    }

    pub fn status(&self) -> Status {
        Status {
            position: self.position,
            orientation: self.orientation,
        }
    }

    /// Moves the mower one cell ahead.
    ///
    /// A move that would leave the lawn is ignored and reported as `Blocked`.
    /// Fails only when the lawn has no bounds.
    pub fn move_forward(&mut self, lawn: &Lawn) -> MowerResult<CommandOutcome> {
        let bounds = lawn.bounds()?;
        let (axis, delta) = FORWARD_DELTAS[self.orientation.index()];
        let (current, max) = match axis {
            Axis::X => (self.position.x, bounds.max_x),
            Axis::Y => (self.position.y, bounds.max_y),
        };

        let next = current as i64 + delta;
        if next < 0 || next > max as i64 {
            return Ok(CommandOutcome::Blocked);
        }

        match axis {
            Axis::X => self.position.x = next as u32,
            Axis::Y => self.position.y = next as u32,
        }
        Ok(CommandOutcome::Move)
    }

    pub fn turn(&mut self, turn: Turn) {
        self.orientation = self.orientation.turned(turn);
    }

    pub fn apply_command(&mut self, command: Command, lawn: &Lawn) -> MowerResult<CommandOutcome> {
        match command {
            Command::Forward => self.move_forward(lawn),
            Command::TurnLeft => {
                self.turn(Turn::Left);
                Ok(CommandOutcome::Turn)
            }
            Command::TurnRight => {
                self.turn(Turn::Right);
                Ok(CommandOutcome::Turn)
            }
        }
    }

    /// Applies a single raw command symbol.
    pub fn apply_code(&mut self, symbol: char, lawn: &Lawn) -> MowerResult<CommandOutcome> {
        self.apply_command(Command::from_symbol(symbol)?, lawn)
    }

    /// Applies every command of the program in order, stopping at the first error.
    pub fn apply_program(&mut self, program: &Program, lawn: &Lawn) -> MowerResult<()> {
        for command in program.commands() {
            self.apply_command(*command, lawn)?;
        }
        Ok(())
    }

    /// Applies a raw string of command symbols.
    ///
    /// The whole string is validated first: an unknown symbol leaves the mower untouched.
    pub fn apply_codes(&mut self, codes: &str, lawn: &Lawn) -> MowerResult<()> {
        let program: Program = codes.parse()?;
        self.apply_program(&program, lawn)
    }
}
