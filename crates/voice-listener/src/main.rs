//! Voice move listener
//!
//! Takes finalized utterances from the configured source, one recognition cycle at a
//! time, and reports every `move <piece> from <a1> to <b2>` command it hears.

use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use voice_listener::config::{ListenerConfig, OutputMode, SpeechSource};
use voice_listener::consumer::{JsonLinesConsumer, LogConsumer, MoveConsumer};
use voice_listener::dispatcher::{one_shot, Dispatcher};
use voice_listener::event::EndReason;
use voice_listener::provider::{LineProvider, SpeechProvider};
use voice_listener::recognizer::Recognizer;

/// Parse --command "<text>" from CLI args
fn parse_command_arg() -> Option<String> {
    let args: Vec<String> = std::env::args().collect();
    args.iter()
        .position(|arg| arg == "--command")
        .and_then(|i| args.get(i + 1).cloned())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Logs go to stderr so JSON output on stdout stays clean
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive(tracing::Level::INFO.into()))
        .with_writer(std::io::stderr)
        .init();

    // Load .env file for local dev
    let _ = dotenvy::dotenv();

    // --command mode: parse one phrase and exit
    if let Some(text) = parse_command_arg() {
        match one_shot(&text) {
            Some(mv) => println!("{}", serde_json::to_string(&mv)?),
            None => info!(command = %text, "Could not understand the command"),
        }
        return Ok(());
    }

    let config = ListenerConfig::from_env()?;
    info!(
        lang = %config.lang,
        source = ?config.source,
        sessions = config.sessions,
        output = ?config.output,
        require_on_board = config.require_on_board,
        "Listener config loaded"
    );

    if config.source == SpeechSource::Disabled {
        warn!("Speech recognition is not supported on this host, listener stays inert");
        return Ok(());
    }

    let provider = LineProvider::stdin();
    match config.output {
        OutputMode::Log => listen(&config, provider, LogConsumer).await,
        OutputMode::Json => {
            listen(&config, provider, JsonLinesConsumer::new(std::io::stdout())).await
        }
    }
}

async fn listen<P, C>(config: &ListenerConfig, provider: P, consumer: C) -> anyhow::Result<()>
where
    P: SpeechProvider,
    C: MoveConsumer,
{
    let (mut recognizer, mut events) =
        Recognizer::new(provider, config.settings(), config.event_buffer);
    let mut dispatcher = Dispatcher::new(consumer).with_require_on_board(config.require_on_board);
    let mut cycles = 0u32;

    while config.sessions == 0 || cycles < config.sessions {
        recognizer.start().await?;

        let report = tokio::select! {
            report = dispatcher.run_cycle(&mut events) => report?,
            _ = tokio::signal::ctrl_c() => {
                info!("Interrupted, stopping recognition");
                recognizer.stop().await?;
                break;
            }
        };
        cycles += 1;

        if report.end == EndReason::SourceClosed {
            info!("Speech source closed");
            break;
        }
    }

    recognizer.stop().await?;

    let stats = dispatcher.stats();
    info!(
        cycles,
        applied = stats.applied,
        off_board = stats.off_board,
        unrecognized = stats.unrecognized,
        errors = stats.errors,
        "Listener finished"
    );
    Ok(())
}
