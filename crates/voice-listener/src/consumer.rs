//! Move consumers: whatever owns the board receives accepted moves here.

use std::io::Write;

use tracing::debug;
use voice_command::ParsedMove;

use crate::error::ListenerError;

pub trait MoveConsumer {
    fn apply(&mut self, mv: &ParsedMove) -> Result<(), ListenerError>;
}

/// No board attached: the dispatcher's log line is the only trace of the move.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogConsumer;

impl MoveConsumer for LogConsumer {
    fn apply(&mut self, mv: &ParsedMove) -> Result<(), ListenerError> {
        debug!(
            from_x = mv.from_x,
            from_y = mv.from_y,
            to_x = mv.to_x,
            to_y = mv.to_y,
            "No board attached, move not applied"
        );
        Ok(())
    }
}

/// Writes each move as one JSON object per line.
pub struct JsonLinesConsumer<W> {
    writer: W,
}

impl<W: Write> JsonLinesConsumer<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write> MoveConsumer for JsonLinesConsumer<W> {
    fn apply(&mut self, mv: &ParsedMove) -> Result<(), ListenerError> {
        serde_json::to_writer(&mut self.writer, mv)?;
        self.writer.write_all(b"\n")?;
        self.writer.flush()?;
        Ok(())
    }
}

impl MoveConsumer for Vec<ParsedMove> {
    fn apply(&mut self, mv: &ParsedMove) -> Result<(), ListenerError> {
        self.push(mv.clone());
        Ok(())
    }
}
