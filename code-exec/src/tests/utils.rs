pub mod defaults {
    use crate::{Dispatcher, ExecConfig, Language, PreviewExit, Result};
    use std::path::Path;
    use tempfile::TempDir;
    use tokio::sync::mpsc;

    pub fn test_config(scratch: &Path) -> ExecConfig {
        ExecConfig::default().with_scratch_dir(scratch)
    }

    /// Python replaced by `sh -c`, so inline runs need no interpreter
    pub fn shell_config(scratch: &Path) -> ExecConfig {
        test_config(scratch).with_program(Language::Python, "sh")
    }

    pub async fn setup_test_dispatcher(
    ) -> Result<(TempDir, Dispatcher, mpsc::UnboundedReceiver<PreviewExit>)> {
        let dir = tempfile::tempdir()?;
        let (dispatcher, exits) = Dispatcher::new(&test_config(dir.path())).await?;
        Ok((dir, dispatcher, exits))
    }
}

pub mod recorder {
    use crate::{Display, Editor, ExecutionResult, Language, PreviewState};
    use std::collections::HashMap;
    use std::sync::{Arc, Mutex};
    use tokio::sync::mpsc;

    #[derive(Debug, Clone, PartialEq, Eq)]
    pub enum Shown {
        Output(ExecutionResult),
        Preview(PreviewState),
        Cleared,
    }

    #[derive(Debug)]
    struct Buffers {
        active: Language,
        texts: HashMap<Language, String>,
    }

    /// Editor whose buffers the test mutates between notifications
    #[derive(Debug, Clone)]
    pub struct SharedEditor(Arc<Mutex<Buffers>>);

    impl SharedEditor {
        pub fn new(active: Language) -> Self {
            Self(Arc::new(Mutex::new(Buffers {
                active,
                texts: HashMap::new(),
            })))
        }

        pub fn set_text(&self, language: Language, text: &str) {
            self.0.lock().unwrap().texts.insert(language, text.to_string());
        }

        pub fn set_active(&self, language: Language) {
            self.0.lock().unwrap().active = language;
        }
    }

    impl Editor for SharedEditor {
        fn active_language(&self) -> Language {
            self.0.lock().unwrap().active
        }

        fn current_text(&self, language: Language) -> String {
            self.0
                .lock()
                .unwrap()
                .texts
                .get(&language)
                .cloned()
                .unwrap_or_default()
        }
    }

    /// Display forwarding everything it is shown to the test
    pub struct RecordingDisplay(mpsc::UnboundedSender<Shown>);

    impl RecordingDisplay {
        pub fn new() -> (Self, mpsc::UnboundedReceiver<Shown>) {
            let (tx, rx) = mpsc::unbounded_channel();
            (Self(tx), rx)
        }
    }

    impl Display for RecordingDisplay {
        fn show_output(&mut self, result: &ExecutionResult) {
            let _ = self.0.send(Shown::Output(result.clone()));
        }

        fn show_preview_state(&mut self, state: PreviewState) {
            let _ = self.0.send(Shown::Preview(state));
        }

        fn clear(&mut self) {
            let _ = self.0.send(Shown::Cleared);
        }
    }
}
