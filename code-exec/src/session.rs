use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::{
    config::ExecConfig,
    dispatcher::{DispatchOutcome, Dispatcher},
    error::Error,
    preview::PreviewExit,
    scheduler::DebounceScheduler,
    types::{ExecutionResult, Language, PreviewState, SourceSnapshot},
};

/// Source of buffer contents, owned by the editing surface
pub trait Editor: Send + 'static {
    /// The buffer currently selected by the user
    fn active_language(&self) -> Language;

    fn current_text(&self, language: Language) -> String;
}

/// Sink for everything the session reports back
pub trait Display: Send + 'static {
    fn show_output(&mut self, result: &ExecutionResult);

    fn show_preview_state(&mut self, state: PreviewState);

    fn clear(&mut self);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionEvent {
    ContentChanged(Language),
    ClearRequested,
    Shutdown,
}

/// Producer side of a running session
#[derive(Debug, Clone)]
pub struct SessionHandle {
    events: mpsc::UnboundedSender<SessionEvent>,
}

impl SessionHandle {
    pub fn notify_changed(&self, language: Language) -> Result<(), Error> {
        self.send(SessionEvent::ContentChanged(language))
    }

    /// Cancel any pending run, clear the display and stop a live preview
    pub fn clear(&self) -> Result<(), Error> {
        self.send(SessionEvent::ClearRequested)
    }

    pub fn shutdown(&self) -> Result<(), Error> {
        self.send(SessionEvent::Shutdown)
    }

    fn send(&self, event: SessionEvent) -> Result<(), Error> {
        self.events.send(event).map_err(|_| Error::SessionClosed)
    }
}

/// Single-consumer event loop tying editor changes, the debounce countdown
/// and preview exits to one dispatcher.
///
/// Dispatches are awaited inside the loop, so only one is ever in flight and
/// events arriving meanwhile wait until it returns.
pub struct Session<E, D> {
    editor: E,
    display: D,
    scheduler: DebounceScheduler,
    dispatcher: Dispatcher,
    events: mpsc::UnboundedReceiver<SessionEvent>,
    preview_exits: mpsc::UnboundedReceiver<PreviewExit>,
}

impl<E: Editor, D: Display> Session<E, D> {
    pub async fn new(
        config: &ExecConfig,
        editor: E,
        display: D,
    ) -> Result<(Self, SessionHandle), Error> {
        let (dispatcher, preview_exits) = Dispatcher::new(config).await?;
        let (tx, events) = mpsc::unbounded_channel();

        let session = Self {
            editor,
            display,
            scheduler: DebounceScheduler::new(config.debounce()),
            dispatcher,
            events,
            preview_exits,
        };
        Ok((session, SessionHandle { events: tx }))
    }

    pub fn spawn(self) -> JoinHandle<()> {
        tokio::spawn(self.run())
    }

    /// Run until shut down or every handle is dropped
    pub async fn run(mut self) {
        info!("Session started (debounce {:?})", self.scheduler.delay());

        loop {
            tokio::select! {
                event = self.events.recv() => match event {
                    Some(SessionEvent::ContentChanged(language)) => {
                        self.scheduler.notify_changed(language)
                    }
                    Some(SessionEvent::ClearRequested) => self.clear(),
                    Some(SessionEvent::Shutdown) | None => break,
                },
                () = self.scheduler.fired() => self.run_active().await,
                Some(exit) = self.preview_exits.recv() => self.preview_exited(exit),
            }
        }

        self.scheduler.cancel();
        self.dispatcher.preview_mut().stop();
        info!("Session stopped");
    }

    async fn run_active(&mut self) {
        let language = self.editor.active_language();
        let snapshot = SourceSnapshot::new(language, self.editor.current_text(language));

        match self.dispatcher.dispatch(&snapshot).await {
            DispatchOutcome::Output(result) => self.display.show_output(&result),
            DispatchOutcome::Preview(state) => self.display.show_preview_state(state),
        }
    }

    fn preview_exited(&mut self, exit: PreviewExit) {
        if let Some(state) = self.dispatcher.preview_mut().on_exit(exit) {
            self.display.show_preview_state(state);
        }
    }

    fn clear(&mut self) {
        debug!("Clear requested");
        self.scheduler.cancel();
        self.display.clear();
        self.dispatcher.preview_mut().stop();
    }
}
