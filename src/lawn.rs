use crate::error::{MowerError, MowerResult};
use crate::mower::{Command, Orientation, Position, Status};
use crossterm::{
    cursor::Hide,
    execute,
    style::{Color, Print, SetForegroundColor},
    terminal::{Clear, ClearType},
};
use serde::Serialize;
use std::io::{stdout, Write};

/// The inclusive upper-right corner of the lawn. The lower-left corner is always (0, 0).
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize)]
pub struct GridBounds {
    pub max_x: u32,
    pub max_y: u32,
}

impl GridBounds {
    pub fn new(max_x: u32, max_y: u32) -> GridBounds {
        GridBounds { max_x, max_y }
    }

    pub fn contains(&self, position: Position) -> bool {
        position.x <= self.max_x && position.y <= self.max_y
    }
}

/// The lawn shared by all mowers of a scenario.
///
/// Bounds are written once, then only read by the mowers moving on it.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct Lawn {
    bounds: Option<GridBounds>,
}

impl Lawn {
    /// Creates a lawn whose bounds are not known yet.
    pub fn new() -> Lawn {
        Lawn { bounds: None }
    }

    pub fn with_bounds(bounds: GridBounds) -> Lawn {
        Lawn {
            bounds: Some(bounds),
        }
    }

    /// Sets the bounds of the lawn. Only the first call succeeds.
    pub fn configure(&mut self, bounds: GridBounds) -> MowerResult<()> {
        if self.bounds.is_some() {
            return Err(MowerError::BoundsAlreadyConfigured);
        }
        self.bounds = Some(bounds);
        Ok(())
    }

    pub fn bounds(&self) -> MowerResult<GridBounds> {
        self.bounds.ok_or(MowerError::BoundsNotConfigured)
    }

    pub fn is_configured(&self) -> bool {
        self.bounds.is_some()
    }

    /// Renders the lawn with a single mower on it.
    ///
    /// The top row is `max_y` so that north points up. Mowed cells are `.` and the
    /// mower shows its heading as an arrow.
    ///
    /// # Arguments
    /// * `status` - The status of the mower to show.
    /// * `next` - The command the mower is about to run, if any.
    pub fn render(&self, status: &Status, next: Option<Command>) -> MowerResult<String> {
        let bounds = self.bounds()?;
        let mut frame = header(status, next);
        for row in rows(&bounds, status) {
            frame.push_str(&row);
            frame.push('\n');
        }
        Ok(frame)
    }

    /// Draws the same frame as `render` to the console, with the mower in colour.
    pub fn draw(&self, title: &str, status: &Status, next: Option<Command>) -> MowerResult<()> {
        let bounds = self.bounds()?;
        let mut stdout = stdout();

        execute!(
            stdout,
            Clear(ClearType::All),
            Hide,
            Print(title),
            Print("\n"),
            Print(header(status, next))
        )?;

        for row in rows(&bounds, status) {
            for cell in row.chars() {
                let color = if cell == EMPTY_CELL {
                    Color::Green
                } else {
                    Color::Blue
                };
                execute!(
                    stdout,
                    SetForegroundColor(color),
                    Print(cell),
                    SetForegroundColor(Color::Reset)
                )?;
            }
            execute!(stdout, Print("\n"))?;
        }

        stdout.flush()?;
        Ok(())
    }
}

const EMPTY_CELL: char = '.';

fn header(status: &Status, next: Option<Command>) -> String {
    let mut header = format!(
        "Status: position=({}, {}), orientation={}\n",
        status.position.x, status.position.y, status.orientation
    );
    if let Some(command) = next {
        header.push_str(&format!("Next action: {}\n", command));
    }
    header.push('\n');
    header
}

// Rows from north (`max_y`) down to south (0)
fn rows(bounds: &GridBounds, status: &Status) -> Vec<String> {
    (0..=bounds.max_y)
        .rev()
        .map(|y| (0..=bounds.max_x).map(|x| cell_char(status, x, y)).collect())
        .collect()
}

fn cell_char(status: &Status, x: u32, y: u32) -> char {
    if status.position != Position::new(x, y) {
        return EMPTY_CELL;
    }
    match status.orientation {
        Orientation::North => '^',
        Orientation::East => '>',
        Orientation::South => 'v',
        Orientation::West => '<',
    }
}
