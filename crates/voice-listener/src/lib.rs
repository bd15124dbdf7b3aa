pub use voice_command;

pub mod config;
pub mod consumer;
pub mod dispatcher;
pub mod error;
pub mod event;
pub mod provider;
pub mod recognizer;
