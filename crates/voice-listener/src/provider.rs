//! Speech providers: the sources finalized utterances come from.
//!
//! Audio capture and speech-to-text live outside this crate. A provider hands the
//! recognizer one best-guess transcript per call and nothing else: no interim
//! results, no alternatives.

use std::collections::VecDeque;
use std::future::Future;

use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader, Lines, Stdin};
use tracing::debug;

use crate::event::RecognitionError;

pub const DEFAULT_LANG: &str = "en-US";

/// Per-cycle settings handed to the provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecognitionSettings {
    pub lang: String,
}

impl Default for RecognitionSettings {
    fn default() -> Self {
        Self {
            lang: DEFAULT_LANG.to_string(),
        }
    }
}

pub trait SpeechProvider: Send + 'static {
    /// Wait for one utterance and return its transcript.
    /// `Ok(None)` means the source is exhausted and will never produce more.
    fn recognize(
        &mut self,
        settings: &RecognitionSettings,
    ) -> impl Future<Output = Result<Option<String>, RecognitionError>> + Send;
}

/// Treats every line of a reader as one utterance.
pub struct LineProvider<R> {
    lines: Lines<R>,
}

impl<R> LineProvider<R>
where
    R: AsyncBufRead + Unpin + Send + 'static,
{
    pub fn new(reader: R) -> Self {
        Self {
            lines: reader.lines(),
        }
    }
}

impl LineProvider<BufReader<Stdin>> {
    pub fn stdin() -> Self {
        Self::new(BufReader::new(tokio::io::stdin()))
    }
}

impl<R> SpeechProvider for LineProvider<R>
where
    R: AsyncBufRead + Unpin + Send + 'static,
{
    async fn recognize(
        &mut self,
        settings: &RecognitionSettings,
    ) -> Result<Option<String>, RecognitionError> {
        debug!(lang = %settings.lang, "Waiting for an utterance line");
        match self.lines.next_line().await {
            Ok(Some(line)) if line.trim().is_empty() => Err(RecognitionError::NoSpeech),
            Ok(line) => Ok(line),
            Err(e) => Err(RecognitionError::AudioCapture(e.to_string())),
        }
    }
}

/// One step of a [`ScriptedProvider`] playback.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScriptStep {
    Say(String),
    Fail(RecognitionError),
    /// Never produce anything; only `Recognizer::stop` ends the cycle.
    Hang,
}

/// Plays back a fixed script, then reports the source as closed.
#[derive(Debug, Default)]
pub struct ScriptedProvider {
    steps: VecDeque<ScriptStep>,
    langs: Vec<String>,
}

impl ScriptedProvider {
    pub fn new(steps: impl IntoIterator<Item = ScriptStep>) -> Self {
        Self {
            steps: steps.into_iter().collect(),
            langs: Vec::new(),
        }
    }

    /// Script that says each phrase in turn.
    pub fn saying<I, S>(phrases: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::new(phrases.into_iter().map(|p| ScriptStep::Say(p.into())))
    }

    pub fn remaining(&self) -> usize {
        self.steps.len()
    }

    /// Language of every cycle this provider served, in order.
    pub fn langs(&self) -> &[String] {
        &self.langs
    }
}

impl SpeechProvider for ScriptedProvider {
    async fn recognize(
        &mut self,
        settings: &RecognitionSettings,
    ) -> Result<Option<String>, RecognitionError> {
        self.langs.push(settings.lang.clone());
        match self.steps.pop_front() {
            Some(ScriptStep::Say(text)) => Ok(Some(text)),
            Some(ScriptStep::Fail(err)) => Err(err),
            Some(ScriptStep::Hang) => std::future::pending().await,
            None => Ok(None),
        }
    }
}
