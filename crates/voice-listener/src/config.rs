//! Listener configuration from environment variables

use std::env;
use std::str::FromStr;
use std::sync::LazyLock;

use regex::Regex;

use crate::error::ListenerError;
use crate::provider::{RecognitionSettings, DEFAULT_LANG};
use crate::recognizer::MIN_EVENT_BUFFER;

// Primary language subtag with optional region/script subtags: "en", "en-US", "zh-Hant-TW".
static LANG_TAG_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z]{2,3}(-[A-Za-z0-9]{2,8})*$").expect("language tag pattern is valid")
});

/// Where utterances come from.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SpeechSource {
    /// One utterance per line of standard input.
    Stdin,
    /// No recognition support on this host; the listener stays inert.
    Disabled,
}

impl FromStr for SpeechSource {
    type Err = ListenerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "stdin" => Ok(Self::Stdin),
            "none" | "disabled" => Ok(Self::Disabled),
            other => Err(ListenerError::Config(format!(
                "VOICE_SOURCE must be 'stdin' or 'none', got '{other}'"
            ))),
        }
    }
}

/// Where accepted moves go.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OutputMode {
    Log,
    Json,
}

impl FromStr for OutputMode {
    type Err = ListenerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "log" => Ok(Self::Log),
            "json" => Ok(Self::Json),
            other => Err(ListenerError::Config(format!(
                "VOICE_OUTPUT must be 'log' or 'json', got '{other}'"
            ))),
        }
    }
}

#[derive(Clone, Debug)]
pub struct ListenerConfig {
    /// Recognition language tag
    pub lang: String,

    /// Utterance source
    pub source: SpeechSource,

    /// Recognition cycles to run; 0 keeps going until the source closes
    pub sessions: u32,

    /// Capacity of the recognition event channel
    pub event_buffer: usize,

    /// Consumer for accepted moves
    pub output: OutputMode,

    /// Withhold moves that are off an 8x8 board
    pub require_on_board: bool,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            lang: DEFAULT_LANG.to_string(),
            source: SpeechSource::Stdin,
            sessions: 1,
            event_buffer: 16,
            output: OutputMode::Log,
            require_on_board: false,
        }
    }
}

impl ListenerConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, ListenerError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration from any key lookup; unset keys fall back to defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ListenerError> {
        let defaults = Self::default();

        let lang = lookup("VOICE_LANG").unwrap_or(defaults.lang);
        if !LANG_TAG_RE.is_match(&lang) {
            return Err(ListenerError::Config(format!(
                "VOICE_LANG is not a language tag: '{lang}'"
            )));
        }

        let source = match lookup("VOICE_SOURCE") {
            Some(v) => v.parse()?,
            None => defaults.source,
        };

        let sessions = parse_number(&lookup, "VOICE_SESSIONS")?.unwrap_or(defaults.sessions);

        let event_buffer =
            parse_number(&lookup, "VOICE_EVENT_BUFFER")?.unwrap_or(defaults.event_buffer);
        if event_buffer < MIN_EVENT_BUFFER {
            return Err(ListenerError::Config(format!(
                "VOICE_EVENT_BUFFER must be at least {MIN_EVENT_BUFFER}, got {event_buffer}"
            )));
        }

        let output = match lookup("VOICE_OUTPUT") {
            Some(v) => v.parse()?,
            None => defaults.output,
        };

        let require_on_board = match lookup("VOICE_REQUIRE_ON_BOARD") {
            Some(v) => parse_bool("VOICE_REQUIRE_ON_BOARD", &v)?,
            None => defaults.require_on_board,
        };

        Ok(Self {
            lang,
            source,
            sessions,
            event_buffer,
            output,
            require_on_board,
        })
    }

    pub fn settings(&self) -> RecognitionSettings {
        RecognitionSettings {
            lang: self.lang.clone(),
        }
    }
}

fn parse_number<T: FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &str,
) -> Result<Option<T>, ListenerError> {
    match lookup(key) {
        Some(v) => v
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| ListenerError::Config(format!("{key} must be a number, got '{v}'"))),
        None => Ok(None),
    }
}

fn parse_bool(key: &str, value: &str) -> Result<bool, ListenerError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(ListenerError::Config(format!(
            "{key} must be a boolean, got '{value}'"
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn load(pairs: &[(&str, &str)]) -> Result<ListenerConfig, ListenerError> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        ListenerConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn defaults_when_unset() {
        let config = load(&[]).unwrap();
        assert_eq!(config.lang, "en-US");
        assert_eq!(config.source, SpeechSource::Stdin);
        assert_eq!(config.sessions, 1);
        assert_eq!(config.event_buffer, 16);
        assert_eq!(config.output, OutputMode::Log);
        assert!(!config.require_on_board);
        assert_eq!(config.settings().lang, "en-US");
    }

    #[test]
    fn reads_all_values() {
        let config = load(&[
            ("VOICE_LANG", "de-DE"),
            ("VOICE_SOURCE", "none"),
            ("VOICE_SESSIONS", "0"),
            ("VOICE_EVENT_BUFFER", "32"),
            ("VOICE_OUTPUT", "JSON"),
            ("VOICE_REQUIRE_ON_BOARD", "yes"),
        ])
        .unwrap();
        assert_eq!(config.lang, "de-DE");
        assert_eq!(config.source, SpeechSource::Disabled);
        assert_eq!(config.sessions, 0);
        assert_eq!(config.event_buffer, 32);
        assert_eq!(config.output, OutputMode::Json);
        assert!(config.require_on_board);
    }

    #[test]
    fn rejects_invalid_values() {
        for pairs in [
            [("VOICE_LANG", "english please")],
            [("VOICE_LANG", "")],
            [("VOICE_SOURCE", "microphone")],
            [("VOICE_EVENT_BUFFER", "5")],
            [("VOICE_EVENT_BUFFER", "2")],
            [("VOICE_OUTPUT", "xml")],
            [("VOICE_REQUIRE_ON_BOARD", "maybe")],
        ] {
            assert!(
                matches!(load(&pairs), Err(ListenerError::Config(_))),
                "expected config error for {pairs:?}"
            );
        }
    }

    #[test]
    fn accepts_language_tags() {
        for tag in ["en", "en-US", "zh-Hant-TW", "es-419"] {
            assert_eq!(load(&[("VOICE_LANG", tag)]).unwrap().lang, tag);
        }
    }
}
