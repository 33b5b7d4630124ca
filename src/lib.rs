//! Terminal front end: runs a source file once, or watches it and re-runs it
//! through a debounced session every time it changes on disk.

use anyhow::{anyhow, Context, Result};
use code_exec::{
    DispatchOutcome, Dispatcher, Display, Editor, ExecConfig, ExecutionResult, Language,
    PreviewState, Session, SessionHandle, SourceSnapshot, Stage,
};
use notify::{Event, RecommendedWatcher, RecursiveMode, Watcher};
use std::future::Future;
use std::io::Write;
use std::path::Path;
use std::sync::{Arc, Mutex, PoisonError};
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

/// A single buffer backed by a file on disk
#[derive(Debug, Clone)]
pub struct FileEditor {
    language: Language,
    text: Arc<Mutex<String>>,
}

impl FileEditor {
    pub fn new(language: Language) -> Self {
        Self {
            language,
            text: Arc::default(),
        }
    }

    /// Replace the buffer text. Returns whether it changed.
    pub fn replace_text(&self, text: String) -> bool {
        let mut current = self.text.lock().unwrap_or_else(PoisonError::into_inner);
        if *current == text {
            return false;
        }
        *current = text;
        true
    }
}

impl Editor for FileEditor {
    fn active_language(&self) -> Language {
        self.language
    }

    fn current_text(&self, language: Language) -> String {
        if language != self.language {
            return String::new();
        }
        self.text
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

/// Writes results and preview lifecycle changes to a terminal stream
pub struct TerminalDisplay<W> {
    out: W,
}

impl<W: Write + Send + 'static> TerminalDisplay<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn write(&mut self, text: &str) {
        if let Err(e) = self
            .out
            .write_all(text.as_bytes())
            .and_then(|()| self.out.flush())
        {
            warn!("Failed to write to terminal: {}", e);
        }
    }
}

impl<W: Write + Send + 'static> Display for TerminalDisplay<W> {
    fn show_output(&mut self, result: &ExecutionResult) {
        let rendered = render_result(result);
        self.write(&rendered);
    }

    fn show_preview_state(&mut self, state: PreviewState) {
        self.write(&render_preview(state));
    }

    fn clear(&mut self) {
        self.write("\x1b[2J\x1b[H");
    }
}

/// Render a plain run result. Failures carry a header naming the failed step.
pub fn render_result(result: &ExecutionResult) -> String {
    let mut rendered = if result.is_success() {
        result.output.clone()
    } else {
        let step = match result.stage {
            Stage::Compile => "compilation failed",
            Stage::Run => "run failed",
        };
        format!("--- {} ---\n{}", step, result.output)
    };
    if !rendered.ends_with('\n') {
        rendered.push('\n');
    }
    rendered
}

pub fn render_preview(state: PreviewState) -> String {
    format!("[preview {}]\n", state)
}

/// Pick the language of `path`: the explicit choice wins, otherwise the file
/// extension decides.
pub fn resolve_language(path: &Path, explicit: Option<Language>) -> Result<Language> {
    if let Some(language) = explicit {
        return Ok(language);
    }
    path.extension()
        .and_then(|ext| ext.to_str())
        .and_then(Language::from_extension)
        .ok_or_else(|| {
            anyhow!(
                "cannot infer a language from {}, pass --language",
                path.display()
            )
        })
}

/// What a one-shot run produced
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunReport {
    Output(ExecutionResult),
    /// Final state of a preview child, reported once it exits
    Preview(PreviewState),
}

impl RunReport {
    pub fn is_success(&self) -> bool {
        match self {
            RunReport::Output(result) => result.is_success(),
            RunReport::Preview(state) => *state == PreviewState::Finished,
        }
    }
}

/// Dispatch the file once without debouncing. A preview run is waited on
/// until its child exits.
pub async fn run_once(
    config: &ExecConfig,
    path: &Path,
    language: Option<Language>,
) -> Result<RunReport> {
    let language = resolve_language(path, language)?;
    let text = tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("failed to read {}", path.display()))?;

    let (mut dispatcher, mut exits) = Dispatcher::new(config).await?;
    match dispatcher
        .dispatch(&SourceSnapshot::new(language, text))
        .await
    {
        DispatchOutcome::Output(result) => Ok(RunReport::Output(result)),
        DispatchOutcome::Preview(PreviewState::Running) => {
            info!("Waiting for preview to exit");
            while let Some(exit) = exits.recv().await {
                if let Some(state) = dispatcher.preview_mut().on_exit(exit) {
                    return Ok(RunReport::Preview(state));
                }
            }
            Ok(RunReport::Preview(dispatcher.preview().state()))
        }
        DispatchOutcome::Preview(state) => Ok(RunReport::Preview(state)),
    }
}

/// Watch `path` and feed every change into a debounced session until
/// `shutdown` resolves. The file's initial contents count as a change.
pub async fn watch_with<D, F>(
    config: &ExecConfig,
    path: &Path,
    language: Option<Language>,
    display: D,
    shutdown: F,
) -> Result<()>
where
    D: Display,
    F: Future<Output = ()>,
{
    let language = resolve_language(path, language)?;
    let path = tokio::fs::canonicalize(path)
        .await
        .with_context(|| format!("failed to resolve {}", path.display()))?;
    let parent = path
        .parent()
        .ok_or_else(|| anyhow!("{} has no parent directory", path.display()))?;

    let editor = FileEditor::new(language);
    let (session, handle) = Session::new(config, editor.clone(), display).await?;
    let task = session.spawn();

    // Editors often save by renaming over the file, so the directory is watched
    let (tx, mut fs_events) = mpsc::unbounded_channel();
    let mut watcher = RecommendedWatcher::new(
        move |res: notify::Result<Event>| {
            let _ = tx.send(res);
        },
        notify::Config::default(),
    )?;
    watcher.watch(parent, RecursiveMode::NonRecursive)?;
    info!("Watching {} as {}", path.display(), language);

    reload(&editor, &handle, &path).await?;
    tokio::pin!(shutdown);

    loop {
        tokio::select! {
            () = &mut shutdown => break,
            Some(res) = fs_events.recv() => match res {
                Ok(event) if event.paths.iter().any(|p| p == &path) => {
                    reload(&editor, &handle, &path).await?;
                }
                Ok(_) => {}
                Err(e) => warn!("Watch error: {:?}", e),
            },
        }
    }

    drop(watcher);
    // Already gone if the session stopped on its own
    let _ = handle.shutdown();
    task.await.context("session task failed")?;
    Ok(())
}

async fn reload(editor: &FileEditor, handle: &SessionHandle, path: &Path) -> Result<()> {
    match tokio::fs::read_to_string(path).await {
        Ok(text) => {
            if editor.replace_text(text) {
                debug!("{} changed", path.display());
                handle.notify_changed(editor.active_language())?;
            }
        }
        // Mid-save, the rename event follows
        Err(e) => debug!("Failed to read {}: {}", path.display(), e),
    }
    Ok(())
}
