//! Board coordinates as they appear in a spoken command.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use shakmaty::Square;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseCoordError {
    #[error("coordinate must be exactly two characters, got {0:?}")]
    Length(String),

    #[error("invalid file character {0:?}")]
    File(char),

    #[error("invalid rank character {0:?}")]
    Rank(char),
}

/// A file/rank pair kept exactly as it was heard.
///
/// The file is any ASCII word character and the rank any ASCII digit. Neither is
/// checked against an 8x8 board, so `i9` or `z0` are valid coordinates whose grid
/// indices simply fall off the board. Use [`BoardCoord::to_square`] when a real
/// square is needed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub struct BoardCoord {
    file: char,
    rank: char,
}

impl BoardCoord {
    pub fn new(file: char, rank: char) -> Result<Self, ParseCoordError> {
        if !is_word_char(file) {
            return Err(ParseCoordError::File(file));
        }
        if !rank.is_ascii_digit() {
            return Err(ParseCoordError::Rank(rank));
        }
        Ok(Self { file, rank })
    }

    pub fn file(&self) -> char {
        self.file
    }

    pub fn rank(&self) -> char {
        self.rank
    }

    /// Numeric value of the rank digit (0-9).
    pub fn rank_digit(&self) -> u32 {
        u32::from(self.rank as u8 - b'0')
    }

    /// Grid row, with rank 8 on row 0: `8 - rank`.
    pub fn grid_x(&self) -> i32 {
        8 - self.rank_digit() as i32
    }

    /// Grid column, counted from `'a'` by character code.
    pub fn grid_y(&self) -> i32 {
        self.file as i32 - 'a' as i32
    }

    /// The matching square on a standard board, if the coordinate is one.
    pub fn to_square(&self) -> Option<Square> {
        self.to_string().parse().ok()
    }
}

fn is_word_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

impl fmt::Display for BoardCoord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.file, self.rank)
    }
}

impl FromStr for BoardCoord {
    type Err = ParseCoordError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut chars = s.chars();
        match (chars.next(), chars.next(), chars.next()) {
            (Some(file), Some(rank), None) => Self::new(file, rank),
            _ => Err(ParseCoordError::Length(s.to_string())),
        }
    }
}

impl From<BoardCoord> for String {
    fn from(coord: BoardCoord) -> Self {
        coord.to_string()
    }
}

impl TryFrom<String> for BoardCoord {
    type Error = ParseCoordError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}
