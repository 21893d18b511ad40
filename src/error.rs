use thiserror::Error;

/// Result type for mower operations.
pub type MowerResult<T> = Result<T, MowerError>;

/// Errors raised while building, parsing or replaying a mowing scenario.
///
/// Variants carrying a `line` come from the scenario parser and hold the 1-based
/// line number of the offending input line.
#[derive(Debug, Error)]
pub enum MowerError {
    /// A raw position had a negative or unrepresentable coordinate.
    #[error("position should be a pair of positive coordinates, got ({x}, {y})")]
    InvalidPosition { x: i64, y: i64 },

    /// A status line named an orientation outside N, E, S, W.
    #[error("Error line {line}: orientation should be one of N, E, S, W")]
    InvalidOrientation { line: usize },

    /// A raw orientation symbol outside N, E, S, W.
    #[error("orientation should be one of N, E, S, W, got '{symbol}'")]
    InvalidOrientationSymbol { symbol: char },

    /// A raw command symbol outside A, G, D.
    #[error("command should be one of A, G, D, got '{symbol}'")]
    InvalidCommand { symbol: char },

    /// A program line contained a symbol outside A, G, D.
    #[error("Error line {line}: programs should be a sequence matching \"[AGD]*\", found '{symbol}'")]
    InvalidCommandChar { line: usize, symbol: char },

    #[error("Error line {line}, format expected: \"%d %d\"")]
    MalformedBoundsLine { line: usize },

    #[error("Error line {line}, format expected: \"%d %d {{one char in N,E,S,W}}\"")]
    MalformedStatusLine { line: usize },

    #[error("Error line {line}: not a valid integer")]
    NotAnInteger { line: usize },

    #[error("Error line {line}: not a positive integer")]
    NegativeCoordinate { line: usize },

    /// A mower status lies outside the lawn declared on line 1.
    #[error("Error line {line}, coordinates should be less or equal than line 1 coordinates")]
    OutOfBounds { line: usize },

    /// A mower was added to a scenario at a position the lawn does not contain.
    #[error("position ({x}, {y}) is outside the lawn")]
    PositionOutsideLawn { x: u32, y: u32 },

    #[error("lawn bounds are not configured, a mower cannot move")]
    BoundsNotConfigured,

    #[error("lawn bounds are already configured for this scenario")]
    BoundsAlreadyConfigured,

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("replay serialization failed: {0}")]
    Json(#[from] serde_json::Error),
}

impl MowerError {
    /// The 1-based input line the error refers to, if it came from the parser.
    pub fn line(&self) -> Option<usize> {
        match self {
            MowerError::InvalidOrientation { line }
            | MowerError::InvalidCommandChar { line, .. }
            | MowerError::MalformedBoundsLine { line }
            | MowerError::MalformedStatusLine { line }
            | MowerError::NotAnInteger { line }
            | MowerError::NegativeCoordinate { line }
            | MowerError::OutOfBounds { line } => Some(*line),
            _ => None,
        }
    }
}
