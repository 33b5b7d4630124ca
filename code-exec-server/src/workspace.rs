use code_exec::{Display, Editor, ExecutionResult, Language, PreviewState};
use serde::Serialize;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

/// Editor buffers and display state of one remote editing surface
#[derive(Debug, Clone, Serialize)]
pub struct Workspace {
    pub active: Language,
    pub buffers: HashMap<Language, String>,
    pub output: Option<ExecutionResult>,
    pub preview: PreviewState,
}

impl Default for Workspace {
    fn default() -> Self {
        Self {
            active: Language::Python,
            buffers: HashMap::new(),
            output: None,
            preview: PreviewState::Idle,
        }
    }
}

/// Shared between the HTTP handlers and the session task
#[derive(Debug, Clone, Default)]
pub struct SharedWorkspace(Arc<Mutex<Workspace>>);

impl SharedWorkspace {
    fn lock(&self) -> MutexGuard<'_, Workspace> {
        // Every update is a single assignment, a poisoned guard is still consistent
        self.0.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn snapshot(&self) -> Workspace {
        self.lock().clone()
    }

    pub fn buffer(&self, language: Language) -> String {
        self.lock().buffers.get(&language).cloned().unwrap_or_default()
    }

    pub fn set_buffer(&self, language: Language, code: String) {
        self.lock().buffers.insert(language, code);
    }

    pub fn set_active(&self, language: Language) {
        self.lock().active = language;
    }
}

impl Editor for SharedWorkspace {
    fn active_language(&self) -> Language {
        self.lock().active
    }

    fn current_text(&self, language: Language) -> String {
        self.buffer(language)
    }
}

impl Display for SharedWorkspace {
    fn show_output(&mut self, result: &ExecutionResult) {
        self.lock().output = Some(result.clone());
    }

    fn show_preview_state(&mut self, state: PreviewState) {
        self.lock().preview = state;
    }

    fn clear(&mut self) {
        self.lock().output = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use code_exec::Stage;

    #[test]
    fn test_editor_view_of_buffers() {
        let workspace = SharedWorkspace::default();
        workspace.set_buffer(Language::Go, "package main".to_string());
        workspace.set_active(Language::Go);

        assert_eq!(workspace.active_language(), Language::Go);
        assert_eq!(workspace.current_text(Language::Go), "package main");
        assert_eq!(workspace.current_text(Language::C), "");
    }

    #[test]
    fn test_clear_keeps_preview_state() {
        let mut workspace = SharedWorkspace::default();
        workspace.show_output(&ExecutionResult::success(Stage::Run, "hi\n"));
        workspace.show_preview_state(PreviewState::Running);

        workspace.clear();
        let snapshot = workspace.snapshot();
        assert!(snapshot.output.is_none());
        assert_eq!(snapshot.preview, PreviewState::Running);
    }
}
