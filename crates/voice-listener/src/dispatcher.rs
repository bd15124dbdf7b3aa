//! Single consumer of the recognizer's event channel.
//!
//! Logs every lifecycle event, runs the move parser on each transcript and hands
//! accepted moves to a [`MoveConsumer`].

use tokio::sync::mpsc;
use tracing::{error, info, warn};
use voice_command::{parse_move_command, ParsedMove};

use crate::consumer::MoveConsumer;
use crate::error::ListenerError;
use crate::event::{EndReason, RecognitionError, RecognitionEvent, Transcript};

/// Treat `text` as a finalized utterance and parse it, with no recognizer involved.
/// The text is normalized the same way a recognizer transcript is.
pub fn one_shot(text: &str) -> Option<ParsedMove> {
    let transcript = Transcript::new(text);
    parse_move_command(&transcript.text)
}

/// What happened to one transcript.
#[derive(Debug, Clone, PartialEq)]
pub enum CommandOutcome {
    /// Parsed and handed to the consumer.
    Applied(ParsedMove),
    /// Parsed, but withheld because a coordinate is off the board.
    OffBoard(ParsedMove),
    Unrecognized,
}

/// Everything observed during one recognition cycle.
#[derive(Debug, Clone, PartialEq)]
pub struct CycleReport {
    pub transcript: Option<Transcript>,
    pub outcome: Option<CommandOutcome>,
    pub error: Option<RecognitionError>,
    pub end: EndReason,
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct DispatchStats {
    pub applied: u64,
    pub off_board: u64,
    pub unrecognized: u64,
    pub errors: u64,
}

pub struct Dispatcher<C> {
    consumer: C,
    require_on_board: bool,
    stats: DispatchStats,
}

impl<C: MoveConsumer> Dispatcher<C> {
    pub fn new(consumer: C) -> Self {
        Self {
            consumer,
            require_on_board: false,
            stats: DispatchStats::default(),
        }
    }

    /// Withhold moves whose coordinates are not squares of an 8x8 board.
    /// Off by default: the parser accepts any file letter and rank digit.
    pub fn with_require_on_board(mut self, require: bool) -> Self {
        self.require_on_board = require;
        self
    }

    pub fn consumer(&self) -> &C {
        &self.consumer
    }

    pub fn into_consumer(self) -> C {
        self.consumer
    }

    pub fn stats(&self) -> DispatchStats {
        self.stats
    }

    pub fn handle_transcript(
        &mut self,
        transcript: &Transcript,
    ) -> Result<CommandOutcome, ListenerError> {
        info!(command = %transcript.text, "Handling command");

        let Some(mv) = parse_move_command(&transcript.text) else {
            info!("Could not understand the command");
            self.stats.unrecognized += 1;
            return Ok(CommandOutcome::Unrecognized);
        };

        if self.require_on_board && !mv.is_on_board() {
            warn!(piece = %mv.piece, from = %mv.from, to = %mv.to, "Move command is off the board");
            self.stats.off_board += 1;
            return Ok(CommandOutcome::OffBoard(mv));
        }

        info!(piece = %mv.piece, from = %mv.from, to = %mv.to, "Move command: {mv}");
        self.consumer.apply(&mv)?;
        self.stats.applied += 1;
        Ok(CommandOutcome::Applied(mv))
    }

    /// Consume events until the end of the current cycle.
    ///
    /// A failing consumer does not cut the cycle short: the remaining events are
    /// still drained up to `End`, then the consumer's error is returned.
    pub async fn run_cycle(
        &mut self,
        events: &mut mpsc::Receiver<RecognitionEvent>,
    ) -> Result<CycleReport, ListenerError> {
        let mut transcript = None;
        let mut outcome = None;
        let mut failure = None;
        let mut apply_error = None;

        loop {
            let event = events.recv().await.ok_or(ListenerError::ChannelClosed)?;
            match event {
                RecognitionEvent::Start => info!("Listening..."),
                RecognitionEvent::Result(t) => {
                    info!(transcript = %t.text, "Recognition result");
                    match self.handle_transcript(&t) {
                        Ok(o) => outcome = Some(o),
                        Err(e) => {
                            error!(error = %e, "Move consumer failed");
                            apply_error = Some(e);
                        }
                    }
                    transcript = Some(t);
                }
                RecognitionEvent::Error(err) => {
                    error!(code = err.code(), error = %err, "Speech recognition error");
                    self.stats.errors += 1;
                    failure = Some(err);
                }
                RecognitionEvent::End(end) => {
                    info!(reason = ?end, "Recognition ended");
                    if let Some(e) = apply_error {
                        return Err(e);
                    }
                    return Ok(CycleReport {
                        transcript,
                        outcome,
                        error: failure,
                        end,
                    });
                }
            }
        }
    }
}
