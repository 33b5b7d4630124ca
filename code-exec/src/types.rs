use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::Error;

/// Supported programming languages
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    Python,
    Rust,
    Go,
    C,
    Cpp,
}

impl Language {
    pub const ALL: [Language; 5] = [
        Language::Python,
        Language::Rust,
        Language::Go,
        Language::C,
        Language::Cpp,
    ];

    /// Human readable name, as shown on the editor tab
    pub fn display_name(&self) -> &'static str {
        match self {
            Language::Python => "Python",
            Language::Rust => "Rust",
            Language::Go => "Go",
            Language::C => "C",
            Language::Cpp => "C++",
        }
    }

    /// Stable lowercase identifier used for scratch file names and the wire format
    pub fn id(&self) -> &'static str {
        match self {
            Language::Python => "python",
            Language::Rust => "rust",
            Language::Go => "go",
            Language::C => "c",
            Language::Cpp => "cpp",
        }
    }

    pub fn from_extension(extension: &str) -> Option<Self> {
        match extension.to_ascii_lowercase().as_str() {
            "py" => Some(Language::Python),
            "rs" => Some(Language::Rust),
            "go" => Some(Language::Go),
            "c" => Some(Language::C),
            "cpp" | "cc" | "cxx" => Some(Language::Cpp),
            _ => None,
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

impl FromStr for Language {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "python" | "py" => Ok(Language::Python),
            "rust" | "rs" => Ok(Language::Rust),
            "go" | "golang" => Ok(Language::Go),
            "c" => Ok(Language::C),
            "cpp" | "c++" | "cxx" | "cc" => Ok(Language::Cpp),
            _ => Err(Error::UnsupportedLanguage(s.to_string())),
        }
    }
}

/// The text of one buffer, captured when the debounce countdown fires
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceSnapshot {
    pub language: Language,
    pub text: String,
}

impl SourceSnapshot {
    pub fn new(language: Language, text: impl Into<String>) -> Self {
        Self {
            language,
            text: text.into(),
        }
    }
}

/// Execution status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExecutionStatus {
    Success,
    Error,
}

/// Which step of a recipe produced the payload
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Stage {
    Compile,
    Run,
}

/// Outcome of one plain dispatch. Carries exactly one textual payload:
/// stdout on success, the diagnostic stream on failure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExecutionResult {
    pub status: ExecutionStatus,
    pub stage: Stage,
    pub output: String,
}

impl ExecutionResult {
    pub fn success(stage: Stage, output: impl Into<String>) -> Self {
        Self {
            status: ExecutionStatus::Success,
            stage,
            output: output.into(),
        }
    }

    pub fn failure(stage: Stage, output: impl Into<String>) -> Self {
        Self {
            status: ExecutionStatus::Error,
            stage,
            output: output.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        self.status == ExecutionStatus::Success
    }
}

/// Lifecycle of the GUI preview child process
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PreviewState {
    #[default]
    Idle,
    Starting,
    Running,
    Finished,
    Errored,
}

impl PreviewState {
    pub fn is_terminal(&self) -> bool {
        matches!(self, PreviewState::Finished | PreviewState::Errored)
    }
}

impl fmt::Display for PreviewState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            PreviewState::Idle => "idle",
            PreviewState::Starting => "starting",
            PreviewState::Running => "running",
            PreviewState::Finished => "finished",
            PreviewState::Errored => "error",
        };
        f.write_str(label)
    }
}
