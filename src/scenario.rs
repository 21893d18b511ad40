use crate::error::{MowerError, MowerResult};
use crate::lawn::{GridBounds, Lawn};
use crate::mower::{Command, Mower, Orientation, Position, Program};
use log::{debug, info, warn};
use regex::{Captures, Regex};
use std::fs;
use std::path::Path;
use std::sync::LazyLock;

static BOUNDS_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^([-+]?\d+) ([-+]?\d+)$").unwrap());

// The orientation is matched loosely so that a wrong symbol is reported as such
static STATUS_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^([-+]?\d+) ([-+]?\d+) (.)$").unwrap());

/// A parsed scenario: the lawn and every mower with the program it has to run, in file order.
#[derive(Clone, Debug)]
pub struct Scenario {
    lawn: Lawn,
    mowers: Vec<(Mower, Program)>,
}

impl Scenario {
    /// Creates a scenario without mowers on a lawn with the given bounds.
    pub fn new(bounds: GridBounds) -> Scenario {
        Scenario {
            lawn: Lawn::with_bounds(bounds),
            mowers: Vec::new(),
        }
    }

    /// Parses the contents of a scenario file.
    ///
    /// The first line holds the lawn bounds. It is followed by pairs of lines: a mower
    /// status (`x y O`) and the program of that mower. Parsing stops at the first blank
    /// status line or at the end of the input, and fails on the first invalid line.
    pub fn parse(contents: &str) -> MowerResult<Scenario> {
        // `lines` strips one `\n` or `\r\n` terminator, any other `\r` stays in the line
        let mut lines = contents
            .lines()
            .enumerate()
            .map(|(index, line)| (index + 1, line));

        let (_, first) = lines.next().unwrap_or((1, ""));
        let bounds = parse_bounds(first, 1)?;
        let mut lawn = Lawn::new();
        lawn.configure(bounds)?;

        let mut mowers = Vec::new();
        let mut pending: Option<(usize, Position, Orientation)> = None;

        for (line_number, line) in lines {
            if line_number % 2 == 0 {
                if line.is_empty() {
                    break;
                }
                let (position, orientation) = parse_mower_status(line, line_number, &bounds)?;
                pending = Some((line_number, position, orientation));
            } else {
                let program = parse_program(line, line_number)?;
                if let Some((_, position, orientation)) = pending.take() {
                    let mower = Mower::new(position, orientation);
                    debug!(
                        "Mower {} starts at {} with program '{}'",
                        mower.id(),
                        mower.status(),
                        program
                    );
                    mowers.push((mower, program));
                }
            }
        }

        if let Some((line_number, _, _)) = pending {
            warn!(
                "Ignoring the mower status on line {} since no program follows it",
                line_number
            );
        }

        info!(
            "Parsed a {}x{} lawn with {} mower(s)",
            bounds.max_x,
            bounds.max_y,
            mowers.len()
        );

        Ok(Scenario { lawn, mowers })
    }

    /// Reads and parses a scenario file.
    ///
    /// # Arguments
    /// * `path` - The path to the scenario file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> MowerResult<Scenario> {
        let contents = fs::read_to_string(path)?;
        Scenario::parse(&contents)
    }

    /// Adds a mower and its program after the ones already in the scenario.
    ///
    /// Fails with `PositionOutsideLawn` when the mower does not stand on the lawn.
    pub fn add_mower(&mut self, mower: Mower, program: Program) -> MowerResult<()> {
        let position = mower.position();
        if !self.lawn.bounds()?.contains(position) {
            return Err(MowerError::PositionOutsideLawn {
                x: position.x,
                y: position.y,
            });
        }
        self.mowers.push((mower, program));
        Ok(())
    }

    pub fn lawn(&self) -> &Lawn {
        &self.lawn
    }

    pub fn mowers(&self) -> &[(Mower, Program)] {
        &self.mowers
    }

    pub fn len(&self) -> usize {
        self.mowers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.mowers.is_empty()
    }

    // Mowers are mutated while the lawn is read, so both are handed out at once
    pub(crate) fn split_mut(&mut self) -> (&Lawn, &mut [(Mower, Program)]) {
        (&self.lawn, &mut self.mowers)
    }
}

/// Parses the bounds line (`%d %d`).
pub fn parse_bounds(line: &str, line_number: usize) -> MowerResult<GridBounds> {
    let captures = BOUNDS_PATTERN
        .captures(line)
        .ok_or(MowerError::MalformedBoundsLine { line: line_number })?;

    let max_x = read_coordinate(&captures, 1, line_number)?;
    let max_y = read_coordinate(&captures, 2, line_number)?;

    Ok(GridBounds::new(max_x, max_y))
}

/// Parses a mower status line (`%d %d O`) and checks it against the lawn bounds.
pub fn parse_mower_status(
    line: &str,
    line_number: usize,
    bounds: &GridBounds,
) -> MowerResult<(Position, Orientation)> {
    let captures = STATUS_PATTERN
        .captures(line)
        .ok_or(MowerError::MalformedStatusLine { line: line_number })?;

    let position = Position::new(
        read_coordinate(&captures, 1, line_number)?,
        read_coordinate(&captures, 2, line_number)?,
    );
    if !bounds.contains(position) {
        return Err(MowerError::OutOfBounds { line: line_number });
    }

    let orientation = captures[3]
        .chars()
        .next()
        .and_then(|symbol| Orientation::from_symbol(symbol).ok())
        .ok_or(MowerError::InvalidOrientation { line: line_number })?;

    Ok((position, orientation))
}

/// Parses a program line. Every symbol must be one of `A`, `G`, `D`; an empty line is an empty program.
pub fn parse_program(line: &str, line_number: usize) -> MowerResult<Program> {
    line.chars()
        .map(|symbol| {
            Command::from_symbol(symbol).map_err(|_| MowerError::InvalidCommandChar {
                line: line_number,
                symbol,
            })
        })
        .collect::<MowerResult<Vec<_>>>()
        .map(Program::new)
}

fn read_coordinate(captures: &Captures, group: usize, line_number: usize) -> MowerResult<u32> {
    let value: i64 = captures[group]
        .parse()
        .map_err(|_| MowerError::NotAnInteger { line: line_number })?;

    if value < 0 {
        return Err(MowerError::NegativeCoordinate { line: line_number });
    }

    u32::try_from(value).map_err(|_| MowerError::NotAnInteger { line: line_number })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn when_parsing_a_scenario_the_lawn_and_mowers_are_created_in_file_order() {
        let scenario = Scenario::parse("5 5\n1 2 N\nGAGAGAGAA\n3 3 E\nAADAADADDA\n").unwrap();

        assert_eq!(scenario.lawn().bounds().unwrap(), GridBounds::new(5, 5));
        assert_eq!(scenario.len(), 2);

        let (first, program) = &scenario.mowers()[0];
        assert_eq!(first.status().to_string(), "1 2 N");
        assert_eq!(program.to_string(), "GAGAGAGAA");

        let (second, program) = &scenario.mowers()[1];
        assert_eq!(second.status().to_string(), "3 3 E");
        assert_eq!(program.to_string(), "AADAADADDA");
    }

    #[test]
    fn when_parsing_a_scenario_with_carriage_returns_they_are_stripped() {
        let scenario = Scenario::parse("5 5\r\n1 2 N\r\nGA\r\n").unwrap();

        assert_eq!(scenario.len(), 1);
        assert_eq!(scenario.mowers()[0].1.to_string(), "GA");
    }

    #[test]
    fn when_a_line_has_an_extra_carriage_return_only_one_terminator_is_stripped() {
        let result = Scenario::parse("5 5\n1 2 N\nGA\r\r\n");

        assert!(matches!(
            result,
            Err(MowerError::InvalidCommandChar {
                line: 3,
                symbol: '\r'
            })
        ));
    }

    #[test]
    fn when_parsing_a_scenario_it_stops_at_the_first_blank_status_line() {
        let scenario = Scenario::parse("5 5\n1 2 N\nA\n\n3 3 E\nA\n").unwrap();

        assert_eq!(scenario.len(), 1);
    }

    #[test]
    fn when_a_program_line_is_empty_the_mower_gets_an_empty_program() {
        let scenario = Scenario::parse("5 5\n1 2 N\n\n3 3 E\nA\n").unwrap();

        assert_eq!(scenario.len(), 2);
        assert!(scenario.mowers()[0].1.is_empty());
        assert_eq!(scenario.mowers()[1].0.status().to_string(), "3 3 E");
    }

    #[test]
    fn when_a_status_line_has_no_program_it_is_ignored() {
        let scenario = Scenario::parse("5 5\n1 2 N\nA\n3 3 E").unwrap();

        assert_eq!(scenario.len(), 1);
    }

    #[test]
    fn when_a_scenario_only_has_bounds_no_mowers_are_created() {
        let scenario = Scenario::parse("4 7\n").unwrap();

        assert!(scenario.is_empty());
        assert_eq!(scenario.lawn().bounds().unwrap(), GridBounds::new(4, 7));
    }

    #[test]
    fn when_the_bounds_line_is_missing_a_coordinate_the_parse_fails_on_line_1() {
        let result = Scenario::parse("5\n1 2 N\nA\n");

        assert!(matches!(
            result,
            Err(MowerError::MalformedBoundsLine { line: 1 })
        ));
    }

    #[test]
    fn when_the_input_is_empty_the_parse_fails_on_line_1() {
        let result = Scenario::parse("");

        assert!(matches!(
            result,
            Err(MowerError::MalformedBoundsLine { line: 1 })
        ));
    }

    #[test]
    fn when_parsing_bounds_with_extra_content_the_line_is_malformed() {
        assert!(matches!(
            parse_bounds("5 5 N", 1),
            Err(MowerError::MalformedBoundsLine { line: 1 })
        ));
        assert!(matches!(
            parse_bounds("5  5", 1),
            Err(MowerError::MalformedBoundsLine { line: 1 })
        ));
    }

    #[test]
    fn when_parsing_bounds_with_a_negative_coordinate_a_negative_coordinate_error_is_returned() {
        assert!(matches!(
            parse_bounds("-1 5", 1),
            Err(MowerError::NegativeCoordinate { line: 1 })
        ));
    }

    #[test]
    fn when_parsing_bounds_with_a_huge_coordinate_a_not_an_integer_error_is_returned() {
        assert!(matches!(
            parse_bounds("99999999999999999999 5", 1),
            Err(MowerError::NotAnInteger { line: 1 })
        ));
        assert!(matches!(
            parse_bounds("5 4294967296", 1),
            Err(MowerError::NotAnInteger { line: 1 })
        ));
    }

    #[test]
    fn when_parsing_bounds_with_an_explicit_sign_the_value_is_accepted() {
        assert_eq!(parse_bounds("+3 0", 1).unwrap(), GridBounds::new(3, 0));
    }

    #[test]
    fn when_a_status_exceeds_the_bounds_an_out_of_bounds_error_is_returned_for_that_line() {
        let result = Scenario::parse("2 2\n3 0 N\nA\n");

        assert!(matches!(result, Err(MowerError::OutOfBounds { line: 2 })));
    }

    #[test]
    fn when_a_status_equals_the_bounds_it_is_accepted() {
        let bounds = GridBounds::new(2, 3);

        let (position, orientation) = parse_mower_status("2 3 W", 4, &bounds).unwrap();

        assert_eq!(position, Position::new(2, 3));
        assert_eq!(orientation, Orientation::West);
    }

    #[test]
    fn when_a_status_has_an_unknown_orientation_an_invalid_orientation_error_is_returned() {
        let bounds = GridBounds::new(5, 5);

        assert!(matches!(
            parse_mower_status("1 1 X", 6, &bounds),
            Err(MowerError::InvalidOrientation { line: 6 })
        ));
    }

    #[test]
    fn when_a_status_line_is_malformed_a_malformed_status_error_is_returned() {
        let bounds = GridBounds::new(5, 5);

        for line in ["1 1", "1 1 NN", "a 1 N", "1 1  N"] {
            assert!(
                matches!(
                    parse_mower_status(line, 2, &bounds),
                    Err(MowerError::MalformedStatusLine { line: 2 })
                ),
                "line {:?}",
                line
            );
        }
    }

    #[test]
    fn when_a_status_has_a_negative_coordinate_a_negative_coordinate_error_is_returned() {
        let result = Scenario::parse("5 5\n1 -2 N\nA\n");

        assert!(matches!(
            result,
            Err(MowerError::NegativeCoordinate { line: 2 })
        ));
    }

    #[test]
    fn when_formatting_a_status_and_parsing_it_back_the_values_round_trip() {
        let bounds = GridBounds::new(5, 5);
        let mower = Mower::from_raw(4, 0, 'S').unwrap();

        let (position, orientation) =
            parse_mower_status(&mower.status().to_string(), 2, &bounds).unwrap();

        assert_eq!(position, mower.position());
        assert_eq!(orientation, mower.orientation());
    }

    #[test]
    fn when_a_program_has_an_invalid_command_the_error_names_the_line_and_symbol() {
        let result = Scenario::parse("5 5\n1 2 N\nAGX\n");

        assert!(matches!(
            result,
            Err(MowerError::InvalidCommandChar {
                line: 3,
                symbol: 'X'
            })
        ));
    }

    #[test]
    fn when_a_program_uses_lowercase_symbols_it_is_rejected() {
        assert!(matches!(
            parse_program("aGD", 5),
            Err(MowerError::InvalidCommandChar {
                line: 5,
                symbol: 'a'
            })
        ));
    }

    #[test]
    fn when_a_later_line_is_invalid_no_scenario_is_returned() {
        let result = Scenario::parse("5 5\n1 2 N\nA\n3 3 E\nA\n9 9 N\nA\n");

        assert!(matches!(result, Err(MowerError::OutOfBounds { line: 6 })));
    }

    #[test]
    fn when_adding_a_mower_on_the_lawn_it_is_appended_after_the_others() {
        let mut scenario = Scenario::new(GridBounds::new(5, 5));

        scenario
            .add_mower(Mower::from_raw(5, 5, 'S').unwrap(), "A".parse().unwrap())
            .unwrap();
        scenario
            .add_mower(Mower::from_raw(0, 0, 'N').unwrap(), Program::default())
            .unwrap();

        assert_eq!(scenario.len(), 2);
        assert_eq!(scenario.mowers()[0].0.status().to_string(), "5 5 S");
        assert_eq!(scenario.mowers()[1].0.status().to_string(), "0 0 N");
    }

    #[test]
    fn when_adding_a_mower_outside_the_lawn_it_is_rejected() {
        let mut scenario = Scenario::new(GridBounds::new(5, 5));

        let result = scenario.add_mower(
            Mower::from_raw(9, 2, 'N').unwrap(),
            "AA".parse().unwrap(),
        );

        assert!(matches!(
            result,
            Err(MowerError::PositionOutsideLawn { x: 9, y: 2 })
        ));
        assert!(scenario.is_empty());
    }
}
