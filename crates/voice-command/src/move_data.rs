use std::fmt;

use serde::{Deserialize, Serialize};
use shakmaty::Square;

use crate::coord::BoardCoord;

/// A move extracted from a transcript.
///
/// `from_x`/`to_x` are grid rows (rank 8 is row 0) and `from_y`/`to_y` grid
/// columns (file `a` is column 0). They are derived from the coordinates and
/// never range-checked.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParsedMove {
    pub piece: String, // not checked against any piece vocabulary
    pub from: BoardCoord,
    pub to: BoardCoord,
    pub from_x: i32,
    pub from_y: i32,
    pub to_x: i32,
    pub to_y: i32,
}

impl ParsedMove {
    pub fn new(piece: impl Into<String>, from: BoardCoord, to: BoardCoord) -> Self {
        Self {
            piece: piece.into(),
            from,
            to,
            from_x: from.grid_x(),
            from_y: from.grid_y(),
            to_x: to.grid_x(),
            to_y: to.grid_y(),
        }
    }

    pub fn from_square(&self) -> Option<Square> {
        self.from.to_square()
    }

    pub fn to_square(&self) -> Option<Square> {
        self.to.to_square()
    }

    /// True when both coordinates name squares of a standard 8x8 board.
    pub fn is_on_board(&self) -> bool {
        self.from_square().is_some() && self.to_square().is_some()
    }
}

impl fmt::Display for ParsedMove {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} from {} to {}", self.piece, self.from, self.to)
    }
}
