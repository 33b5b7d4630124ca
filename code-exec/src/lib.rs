//! # Code Execution Service
//!
//! Runs source text for a fixed set of languages as the user types: changes
//! are debounced, the active buffer is staged to a scratch directory, its
//! toolchain is invoked and one text payload is reported back. Python
//! snippets that import a GUI toolkit are launched as a long-lived preview
//! process whose lifecycle is reported instead of its output.

mod artifacts;
mod config;
mod dispatcher;
mod error;
mod languages;
mod preview;
mod runner;
mod scheduler;
mod session;
mod types;

#[cfg(test)]
mod tests;

pub use artifacts::{ArtifactStore, StagingDescriptor};
pub use config::{ExecConfig, ToolchainOverride, DEFAULT_DEBOUNCE_MS, DEFAULT_SCRATCH_DIR};
pub use dispatcher::{classify, DispatchOutcome, Dispatcher, RunMode};
pub use error::Error;
pub use languages::{check_command, LanguageSpec, Recipe, Registry, ToolchainStatus, GUI_MARKERS};
pub use preview::{PreviewExit, PreviewManager};
pub use runner::{CommandOutput, ProcessRunner};
pub use scheduler::DebounceScheduler;
pub use session::{Display, Editor, Session, SessionEvent, SessionHandle};
pub use types::{
    ExecutionResult, ExecutionStatus, Language, PreviewState, SourceSnapshot, Stage,
};

/// Result type for code execution operations
pub type Result<T> = std::result::Result<T, Error>;
