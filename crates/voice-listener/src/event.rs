//! Recognition lifecycle events delivered over the recognizer's channel.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A finalized, lowercased utterance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transcript {
    pub text: String,
    pub received_at: DateTime<Utc>,
}

impl Transcript {
    /// Build a transcript from raw provider text. Only the case is normalized.
    pub fn new(raw: &str) -> Self {
        Self {
            text: raw.to_lowercase(),
            received_at: Utc::now(),
        }
    }
}

/// Why a recognition cycle ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EndReason {
    /// The provider produced a transcript or an error.
    Completed,
    /// `Recognizer::stop` cancelled the cycle.
    Stopped,
    /// The provider has no more input.
    SourceClosed,
}

/// Error reported by a speech provider. Delivered as an event, never raised.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RecognitionError {
    #[error("no speech was detected")]
    NoSpeech,

    #[error("recognition was aborted")]
    Aborted,

    #[error("audio capture failed: {0}")]
    AudioCapture(String),

    #[error("network error: {0}")]
    Network(String),

    #[error("permission to capture audio was denied")]
    NotAllowed,

    #[error("{0}")]
    Other(String),
}

impl RecognitionError {
    /// Stable error code, matching the names used by browser speech APIs.
    pub fn code(&self) -> &'static str {
        match self {
            Self::NoSpeech => "no-speech",
            Self::Aborted => "aborted",
            Self::AudioCapture(_) => "audio-capture",
            Self::Network(_) => "network",
            Self::NotAllowed => "not-allowed",
            Self::Other(_) => "other",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum RecognitionEvent {
    Start,
    Result(Transcript),
    Error(RecognitionError),
    End(EndReason),
}
