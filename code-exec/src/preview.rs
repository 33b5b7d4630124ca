use std::process::{ExitStatus, Stdio};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::process::{Child, Command};
use tokio::sync::{mpsc, oneshot};
use tracing::{debug, error, info, warn};

use crate::types::PreviewState;

/// Exit notification of one preview child
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PreviewExit {
    pub generation: u64,
    pub state: PreviewState,
}

struct LivePreview {
    generation: u64,
    pid: Option<u32>,
    /// Set by the watcher once the child is reaped and its pid may be reused
    reaped: Arc<AtomicBool>,
    terminate: oneshot::Sender<()>,
}

/// Owns at most one long-lived GUI child process.
///
/// The child's streams are never read; only its lifecycle is reported. Exits
/// arrive asynchronously on the receiver returned by [`PreviewManager::new`]
/// and must be fed back through [`PreviewManager::on_exit`].
pub struct PreviewManager {
    program: String,
    flag: String,
    state: PreviewState,
    generation: u64,
    live: Option<LivePreview>,
    exits: mpsc::UnboundedSender<PreviewExit>,
}

impl PreviewManager {
    pub fn new(
        program: impl Into<String>,
        flag: impl Into<String>,
    ) -> (Self, mpsc::UnboundedReceiver<PreviewExit>) {
        let (exits, rx) = mpsc::unbounded_channel();
        let manager = Self {
            program: program.into(),
            flag: flag.into(),
            state: PreviewState::Idle,
            generation: 0,
            live: None,
            exits,
        };
        (manager, rx)
    }

    pub fn state(&self) -> PreviewState {
        self.state
    }

    /// Pid of the current child, if one is live
    pub fn pid(&self) -> Option<u32> {
        self.live.as_ref().and_then(|live| live.pid)
    }

    /// Terminate any live child, then launch `program flag text`
    pub fn start(&mut self, text: &str) -> PreviewState {
        self.terminate_live();

        self.generation += 1;
        self.state = PreviewState::Starting;

        let spawned = Command::new(&self.program)
            .arg(&self.flag)
            .arg(text)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .kill_on_drop(true)
            .spawn();

        match spawned {
            Ok(child) => {
                let pid = child.id();
                let reaped = Arc::new(AtomicBool::new(false));
                let (terminate, terminate_rx) = oneshot::channel();
                tokio::spawn(watch_child(
                    child,
                    self.generation,
                    reaped.clone(),
                    terminate_rx,
                    self.exits.clone(),
                ));
                self.live = Some(LivePreview {
                    generation: self.generation,
                    pid,
                    reaped,
                    terminate,
                });
                self.state = PreviewState::Running;
                info!("Preview {} running (pid {:?})", self.generation, pid);
            }
            Err(e) => {
                error!("Failed to start preview with {}: {}", self.program, e);
                self.state = PreviewState::Errored;
            }
        }

        self.state
    }

    /// Signal the live child to terminate. The state changes only once its
    /// exit is reported.
    pub fn stop(&mut self) {
        if self.state == PreviewState::Running {
            self.terminate_live();
        }
    }

    /// Apply an exit notification. Returns the new state, or `None` when the
    /// exit belongs to a superseded child.
    pub fn on_exit(&mut self, exit: PreviewExit) -> Option<PreviewState> {
        if exit.generation != self.generation {
            debug!(
                "Ignoring exit of superseded preview {} (current {})",
                exit.generation, self.generation
            );
            return None;
        }

        self.live = None;
        self.state = exit.state;
        info!("Preview {} {}", exit.generation, exit.state);
        Some(self.state)
    }

    /// Signals the live child before returning, so a following spawn never
    /// overlaps a child that has not been told to stop.
    fn terminate_live(&mut self) {
        if let Some(live) = self.live.take() {
            debug!("Terminating preview {}", live.generation);
            if let Some(pid) = live.pid {
                if !live.reaped.load(Ordering::Acquire) {
                    send_terminate(pid);
                }
            }
            // The watcher may already have observed the exit
            let _ = live.terminate.send(());
        }
    }
}

impl Drop for PreviewManager {
    fn drop(&mut self) {
        self.terminate_live();
    }
}

async fn watch_child(
    mut child: Child,
    generation: u64,
    reaped: Arc<AtomicBool>,
    mut terminate: oneshot::Receiver<()>,
    exits: mpsc::UnboundedSender<PreviewExit>,
) {
    let status = tokio::select! {
        status = child.wait() => status,
        _ = &mut terminate => {
            kill_after_request(&mut child);
            child.wait().await
        }
    };
    reaped.store(true, Ordering::Release);

    let state = match status {
        Ok(status) => exit_state(status),
        Err(e) => {
            error!("Failed to wait for preview {}: {}", generation, e);
            PreviewState::Errored
        }
    };

    // The session may have shut down already
    let _ = exits.send(PreviewExit { generation, state });
}

/// Any exit with a code is a normal exit, whatever the code. Only death by
/// signal counts as a crash.
fn exit_state(status: ExitStatus) -> PreviewState {
    if status.code().is_some() {
        if !status.success() {
            debug!("Preview exited with status: {}", status);
        }
        PreviewState::Finished
    } else {
        debug!("Preview killed: {}", status);
        PreviewState::Errored
    }
}

#[cfg(unix)]
fn send_terminate(pid: u32) {
    use nix::sys::signal::{kill, Signal};
    use nix::unistd::Pid;

    if let Err(e) = kill(Pid::from_raw(pid as i32), Signal::SIGTERM) {
        warn!("Failed to signal preview process {}: {}", pid, e);
    }
}

#[cfg(not(unix))]
fn send_terminate(_pid: u32) {}

// SIGTERM was already sent by the manager
#[cfg(unix)]
fn kill_after_request(_child: &mut Child) {}

#[cfg(not(unix))]
fn kill_after_request(child: &mut Child) {
    if let Err(e) = child.start_kill() {
        warn!("Failed to kill preview process: {}", e);
    }
}
