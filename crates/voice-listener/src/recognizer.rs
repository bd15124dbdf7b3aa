//! Recognizer handle: owns a speech provider and runs one recognition cycle at a time.
//!
//! Each `start()` spawns a task that emits `Start`, at most one `Result` or `Error`,
//! and finally `End` on the event channel. The task owns the provider while it runs
//! and hands it back when the cycle is over, so there is never more than one
//! utterance in flight.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use crate::error::ListenerError;
use crate::event::{EndReason, RecognitionEvent, Transcript};
use crate::provider::{RecognitionSettings, SpeechProvider};

/// Smallest event buffer that holds two complete cycles of three events each.
pub const MIN_EVENT_BUFFER: usize = 6;

struct ActiveCycle<P> {
    handle: JoinHandle<P>,
    stop: oneshot::Sender<()>,
    // Set before `End` is sent, so a consumer that saw `End` may start again.
    done: Arc<AtomicBool>,
}

impl<P> ActiveCycle<P> {
    fn is_done(&self) -> bool {
        self.done.load(Ordering::Acquire) || self.handle.is_finished()
    }
}

pub struct Recognizer<P: SpeechProvider> {
    settings: RecognitionSettings,
    events: mpsc::Sender<RecognitionEvent>,
    provider: Option<P>,
    active: Option<ActiveCycle<P>>,
}

impl<P: SpeechProvider> Recognizer<P> {
    /// Create an idle recognizer and the receiving end of its event channel.
    /// `buffer` is raised to [`MIN_EVENT_BUFFER`] if smaller.
    pub fn new(
        provider: P,
        settings: RecognitionSettings,
        buffer: usize,
    ) -> (Self, mpsc::Receiver<RecognitionEvent>) {
        let (events, rx) = mpsc::channel(buffer.max(MIN_EVENT_BUFFER));
        let recognizer = Self {
            settings,
            events,
            provider: Some(provider),
            active: None,
        };
        (recognizer, rx)
    }

    pub fn settings(&self) -> &RecognitionSettings {
        &self.settings
    }

    /// The provider, while no cycle holds it.
    pub fn provider(&self) -> Option<&P> {
        self.provider.as_ref()
    }

    pub fn is_listening(&self) -> bool {
        self.active.as_ref().is_some_and(|cycle| !cycle.is_done())
    }

    /// Begin one recognition cycle.
    pub async fn start(&mut self) -> Result<(), ListenerError> {
        if self.active.as_ref().is_some_and(ActiveCycle::is_done) {
            self.reclaim().await?;
        }
        if self.active.is_some() {
            return Err(ListenerError::AlreadyListening);
        }

        let provider = self.provider.take().ok_or(ListenerError::ProviderLost)?;
        let (stop, stop_rx) = oneshot::channel();
        let done = Arc::new(AtomicBool::new(false));
        let handle = tokio::spawn(run_cycle(
            provider,
            self.settings.clone(),
            self.events.clone(),
            stop_rx,
            Arc::clone(&done),
        ));
        self.active = Some(ActiveCycle { handle, stop, done });
        debug!(lang = %self.settings.lang, "Recognition cycle started");
        Ok(())
    }

    /// Cancel the in-flight cycle, if any, and wait for it to end.
    /// An utterance still being captured is discarded.
    pub async fn stop(&mut self) -> Result<(), ListenerError> {
        if let Some(cycle) = self.active.take() {
            // The cycle may already be over; then there is nobody to notify.
            let _ = cycle.stop.send(());
            self.provider = Some(cycle.handle.await?);
            debug!("Recognition cycle stopped");
        }
        Ok(())
    }

    /// Wait for the in-flight cycle to end on its own.
    pub async fn wait(&mut self) -> Result<(), ListenerError> {
        self.reclaim().await
    }

    async fn reclaim(&mut self) -> Result<(), ListenerError> {
        if let Some(cycle) = self.active.take() {
            self.provider = Some(cycle.handle.await?);
        }
        Ok(())
    }
}

impl<P: SpeechProvider> Drop for Recognizer<P> {
    fn drop(&mut self) {
        if let Some(cycle) = self.active.take() {
            cycle.handle.abort();
        }
    }
}

/// Stop request as seen from inside the cycle task. Can be awaited any number of
/// times; once stopped it stays stopped.
struct StopSignal {
    rx: Option<oneshot::Receiver<()>>,
    stopped: bool,
}

impl StopSignal {
    fn new(rx: oneshot::Receiver<()>) -> Self {
        Self {
            rx: Some(rx),
            stopped: false,
        }
    }

    /// Resolves once a stop has been requested. Never resolves if the handle
    /// went away without asking.
    async fn requested(&mut self) {
        if self.stopped {
            return;
        }
        let Some(rx) = self.rx.as_mut() else {
            return std::future::pending().await;
        };
        let result = rx.await;
        self.rx = None;
        if result.is_err() {
            return std::future::pending().await;
        }
        self.stopped = true;
    }
}

#[derive(Debug, PartialEq, Eq)]
enum Delivery {
    Sent,
    Closed,
    Stopped,
}

/// Send one event, giving up if a stop arrives while the channel is full.
async fn deliver(
    events: &mpsc::Sender<RecognitionEvent>,
    event: RecognitionEvent,
    stop: &mut StopSignal,
) -> Delivery {
    tokio::select! {
        biased;
        sent = events.send(event) => match sent {
            Ok(()) => Delivery::Sent,
            Err(_) => Delivery::Closed,
        },
        () = stop.requested() => Delivery::Stopped,
    }
}

async fn run_cycle<P: SpeechProvider>(
    provider: P,
    settings: RecognitionSettings,
    events: mpsc::Sender<RecognitionEvent>,
    stop: oneshot::Receiver<()>,
    done: Arc<AtomicBool>,
) -> P {
    let mut stop = StopSignal::new(stop);
    let (provider, end) = capture(provider, &settings, &events, &mut stop).await;
    done.store(true, Ordering::Release);
    if let Some(end) = end {
        let event = RecognitionEvent::End(end);
        if deliver(&events, event.clone(), &mut stop).await == Delivery::Stopped
            && events.try_send(event).is_err()
        {
            warn!(reason = ?end, "Event channel full after stop, end of cycle dropped");
        }
    }
    provider
}

/// Runs the capture half of a cycle. Returns `None` for the end reason when the
/// event receiver is gone and there is nobody left to tell.
async fn capture<P: SpeechProvider>(
    mut provider: P,
    settings: &RecognitionSettings,
    events: &mpsc::Sender<RecognitionEvent>,
    stop: &mut StopSignal,
) -> (P, Option<EndReason>) {
    match deliver(events, RecognitionEvent::Start, stop).await {
        Delivery::Sent => {}
        Delivery::Closed => return (provider, None),
        Delivery::Stopped => return (provider, Some(EndReason::Stopped)),
    }

    // Provider first: an utterance that is already available wins over a stop request.
    let outcome = tokio::select! {
        biased;
        result = provider.recognize(settings) => Some(result),
        () = stop.requested() => None,
    };

    let (event, end) = match outcome {
        None => return (provider, Some(EndReason::Stopped)),
        Some(Ok(None)) => return (provider, Some(EndReason::SourceClosed)),
        Some(Ok(Some(raw))) => (
            RecognitionEvent::Result(Transcript::new(&raw)),
            EndReason::Completed,
        ),
        Some(Err(err)) => (RecognitionEvent::Error(err), EndReason::Completed),
    };

    match deliver(events, event, stop).await {
        Delivery::Sent => (provider, Some(end)),
        Delivery::Closed => (provider, None),
        Delivery::Stopped => (provider, Some(EndReason::Stopped)),
    }
}
