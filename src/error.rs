//! Construction-time error types.
//!
//! The simulation itself never fails: lost balls, cleared levels and exhausted
//! lives are game states. Errors only come from building a session out of
//! malformed data (level grids, tuning JSON).

use std::fmt;

/// Top-level error enum for building a game session.
#[derive(Debug)]
pub enum GameError {
    /// A level grid references a glyph that has no block type.
    UnknownGlyph {
        /// Level index (0-based).
        level: usize,
        /// Row index inside the level.
        row: usize,
        /// Column index inside the row.
        column: usize,
        /// The offending glyph.
        glyph: char,
    },

    /// A level grid row has no glyphs, so its column width is undefined.
    EmptyRow {
        level: usize,
        row: usize,
    },

    /// The level set contains no levels at all.
    NoLevels,

    /// The play area is too narrow to lay out blocks and the paddle.
    DegeneratePlayArea {
        /// Width that was rejected.
        width: f32,
    },

    /// Tuning or level JSON could not be parsed.
    Config(serde_json::Error),
}

impl fmt::Display for GameError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GameError::UnknownGlyph {
                level,
                row,
                column,
                glyph,
            } => write!(
                f,
                "level {level}: unknown block glyph {glyph:?} at row {row}, column {column}"
            ),
            GameError::EmptyRow { level, row } => {
                write!(f, "level {level}: row {row} has no blocks")
            }
            GameError::NoLevels => write!(f, "level set is empty"),
            GameError::DegeneratePlayArea { width } => {
                write!(f, "play area width {width} is too small")
            }
            GameError::Config(err) => write!(f, "invalid configuration: {err}"),
        }
    }
}

impl std::error::Error for GameError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            GameError::Config(err) => Some(err),
            _ => None,
        }
    }
}

impl From<serde_json::Error> for GameError {
    fn from(err: serde_json::Error) -> Self {
        GameError::Config(err)
    }
}
