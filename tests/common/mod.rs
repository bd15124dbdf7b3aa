use tokio::io::BufReader;
use voice_listener::consumer::MoveConsumer;
use voice_listener::dispatcher::{CycleReport, Dispatcher};
use voice_listener::provider::{LineProvider, RecognitionSettings, SpeechProvider};
use voice_listener::recognizer::Recognizer;

/// A line provider over a fixed block of text, one utterance per line.
#[allow(dead_code)]
pub fn lines(text: &'static str) -> LineProvider<BufReader<&'static [u8]>> {
    LineProvider::new(BufReader::new(text.as_bytes()))
}

/// Run recognition cycles until the source closes, collecting every report.
#[allow(dead_code)]
pub async fn run_until_closed<P, C>(provider: P, dispatcher: &mut Dispatcher<C>) -> Vec<CycleReport>
where
    P: SpeechProvider,
    C: MoveConsumer,
{
    let (mut recognizer, mut events) = Recognizer::new(provider, RecognitionSettings::default(), 8);
    let mut reports = Vec::new();
    loop {
        recognizer.start().await.expect("start");
        let report = dispatcher.run_cycle(&mut events).await.expect("cycle");
        let closed = report.end == voice_listener::event::EndReason::SourceClosed;
        reports.push(report);
        if closed {
            break;
        }
    }
    recognizer.stop().await.expect("stop");
    reports
}
