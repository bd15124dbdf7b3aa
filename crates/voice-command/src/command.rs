//! Voice move command parsing with a single fixed regex grammar.
//!
//! ```text
//! "move " <piece> " from " <file><rank> " to " <file><rank>
//! ```
//!
//! The pattern is searched anywhere in the transcript, so surrounding words are
//! ignored. Matching is case-sensitive; transcripts arrive lowercased from the
//! recognizer.

use std::sync::LazyLock;

use regex::Regex;

use crate::coord::BoardCoord;
use crate::move_data::ParsedMove;

// ASCII classes on purpose: `\w`/`\d` are Unicode-aware in the regex crate.
static MOVE_COMMAND_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"move ([A-Za-z0-9_]+) from ([A-Za-z0-9_])([0-9]) to ([A-Za-z0-9_])([0-9])")
        .expect("move command pattern is valid")
});

/// Parse a transcript into a move command.
/// Returns `None` when the transcript does not contain the move phrase.
pub fn parse_move_command(command: &str) -> Option<ParsedMove> {
    let caps = MOVE_COMMAND_RE.captures(command)?;

    let piece = caps.get(1)?.as_str();
    let from = coord(caps.get(2)?.as_str(), caps.get(3)?.as_str())?;
    let to = coord(caps.get(4)?.as_str(), caps.get(5)?.as_str())?;

    Some(ParsedMove::new(piece, from, to))
}

fn coord(file: &str, rank: &str) -> Option<BoardCoord> {
    BoardCoord::new(file.chars().next()?, rank.chars().next()?).ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_basic() {
        let mv = parse_move_command("move knight from a1 to b2").unwrap();
        assert_eq!(mv.piece, "knight");
        assert_eq!(mv.from.to_string(), "a1");
        assert_eq!(mv.to.to_string(), "b2");
        assert_eq!((mv.from_x, mv.from_y), (7, 0));
        assert_eq!((mv.to_x, mv.to_y), (6, 1));
    }

    #[test]
    fn test_parse_ignores_surrounding_words() {
        let mv = parse_move_command("please move knight from a1 to b2 now").unwrap();
        assert_eq!(mv, parse_move_command("move knight from a1 to b2").unwrap());

        // "remove" contains "move"
        let mv = parse_move_command("remove pawn from e2 to e4").unwrap();
        assert_eq!(mv.piece, "pawn");

        // Trailing digits after the rank are not part of the match
        let mv = parse_move_command("move rook from a1 to a88").unwrap();
        assert_eq!(mv.to.to_string(), "a8");
    }

    #[test]
    fn test_parse_rejects_malformed() {
        assert!(parse_move_command("mve knight from a1 to b2").is_none());
        assert!(parse_move_command("move pawn e2 to e4").is_none());
        assert!(parse_move_command("move pawn from e2 e4").is_none());
        assert!(parse_move_command("move from e2 to e4").is_none());
        assert!(parse_move_command("move pawn from ee to e4").is_none());
        assert!(parse_move_command("move pawn from e to e4").is_none());
        assert!(parse_move_command("move  pawn from e2 to e4").is_none());
        assert!(parse_move_command("").is_none());
    }

    #[test]
    fn test_parse_is_case_sensitive() {
        assert!(parse_move_command("Move knight from a1 to b2").is_none());
        assert!(parse_move_command("MOVE KNIGHT FROM A1 TO B2").is_none());
        // Uppercase files are still word characters
        let mv = parse_move_command("move knight from A1 to b2").unwrap();
        assert_eq!(mv.from_y, 'A' as i32 - 'a' as i32);
    }

    #[test]
    fn test_parse_multi_word_piece_does_not_match() {
        assert!(parse_move_command("move white knight from g1 to f3").is_none());
        let mv = parse_move_command("move white_knight from g1 to f3").unwrap();
        assert_eq!(mv.piece, "white_knight");
    }

    #[test]
    fn test_parse_first_phrase_wins() {
        let mv = parse_move_command("move pawn from e2 to e4 move knight from g8 to f6").unwrap();
        assert_eq!(mv.piece, "pawn");
    }

    #[test]
    fn test_parse_rejects_unicode_digits() {
        // Arabic-Indic digit two
        assert!(parse_move_command("move pawn from e\u{0662} to e4").is_none());
    }

    #[test]
    fn test_parse_off_board_is_permitted() {
        let mv = parse_move_command("move queen from i9 to z0").unwrap();
        assert_eq!((mv.from_x, mv.from_y), (-1, 8));
        assert_eq!((mv.to_x, mv.to_y), (8, 25));
        assert!(!mv.is_on_board());

        let mv = parse_move_command("move x from 11 to 22").unwrap();
        assert_eq!(mv.from_y, -48);
    }

    #[test]
    fn test_parse_is_idempotent() {
        let input = "move bishop from c1 to g5";
        assert_eq!(parse_move_command(input), parse_move_command(input));
    }
}
