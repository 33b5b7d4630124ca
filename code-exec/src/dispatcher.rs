use std::path::Path;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::{
    artifacts::ArtifactStore,
    config::ExecConfig,
    error::Error,
    languages::{Recipe, Registry, GUI_MARKERS},
    preview::{PreviewExit, PreviewManager},
    runner::{CommandOutput, ProcessRunner},
    types::{ExecutionResult, Language, PreviewState, SourceSnapshot, Stage},
};

/// Which path a snapshot takes through the dispatcher
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunMode {
    PlainRun,
    PreviewRun,
}

/// Heuristic GUI detection: Python text mentioning one of the fixed toolkit
/// markers runs as a preview. Plain substring match, no parsing.
pub fn classify(language: Language, text: &str) -> RunMode {
    if language == Language::Python && GUI_MARKERS.iter().any(|marker| text.contains(marker)) {
        RunMode::PreviewRun
    } else {
        RunMode::PlainRun
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DispatchOutcome {
    /// Inline output of a plain run
    Output(ExecutionResult),
    /// A preview child was started; its outcome arrives later as a lifecycle change
    Preview(PreviewState),
}

/// Drives the artifact store, process runner and preview manager for one
/// snapshot at a time.
///
/// Dispatch awaits every compile and run step to completion. Callers that
/// await it inline block until the toolchain returns; there is no timeout.
pub struct Dispatcher {
    registry: Registry,
    store: ArtifactStore,
    runner: ProcessRunner,
    preview: PreviewManager,
}

impl Dispatcher {
    /// Create a dispatcher and the channel on which preview exits are reported
    pub async fn new(
        config: &ExecConfig,
    ) -> Result<(Self, mpsc::UnboundedReceiver<PreviewExit>), Error> {
        let registry = Registry::new(config);
        let store = ArtifactStore::open(&config.scratch_dir).await?;
        let runner = ProcessRunner::new(store.root());

        let (program, flag) = match &registry.get(Language::Python).recipe {
            Recipe::Inline { program, flag } => (program.clone(), flag.clone()),
            other => (other.program().to_string(), "-c".to_string()),
        };
        let (preview, exits) = PreviewManager::new(program, flag);

        Ok((
            Self {
                registry,
                store,
                runner,
                preview,
            },
            exits,
        ))
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    pub fn store(&self) -> &ArtifactStore {
        &self.store
    }

    pub fn preview(&self) -> &PreviewManager {
        &self.preview
    }

    pub fn preview_mut(&mut self) -> &mut PreviewManager {
        &mut self.preview
    }

    /// Stage the snapshot, then either run it inline or hand it to the
    /// preview manager. Never fails: every error becomes a result payload.
    pub async fn dispatch(&mut self, snapshot: &SourceSnapshot) -> DispatchOutcome {
        let language = snapshot.language;
        info!("Dispatching {} ({} bytes)", language, snapshot.text.len());

        let descriptor = match self.store.stage(language, &snapshot.text).await {
            Ok(path) => path,
            Err(e) => {
                warn!("Failed to stage {} source: {}", language, e);
                return DispatchOutcome::Output(ExecutionResult::failure(
                    Stage::Run,
                    e.to_string(),
                ));
            }
        };

        match classify(language, &snapshot.text) {
            RunMode::PreviewRun => {
                info!("GUI toolkit detected, starting preview");
                DispatchOutcome::Preview(self.preview.start(&snapshot.text))
            }
            RunMode::PlainRun => DispatchOutcome::Output(self.execute(language, &descriptor).await),
        }
    }

    /// Run a staged descriptor according to the language's recipe
    pub async fn execute(&self, language: Language, descriptor: &Path) -> ExecutionResult {
        let spec = self.registry.get(language);

        let result = match &spec.recipe {
            Recipe::Inline { program, flag } => self.run_inline(program, flag, descriptor).await,
            Recipe::CompileThenRun { compiler, args } => {
                self.compile_then_run(compiler, args, spec.extension, descriptor)
                    .await
            }
            Recipe::RunFromSource { program, args } => {
                self.run_from_source(program, args, spec.extension, descriptor)
                    .await
            }
        };

        if result.is_success() {
            info!("{} run succeeded", language);
        } else {
            info!("{} {:?} step failed", language, result.stage);
        }
        result
    }

    async fn run_inline(&self, program: &str, flag: &str, descriptor: &Path) -> ExecutionResult {
        let output = async {
            let staged = self.store.load(descriptor).await?;
            self.runner.run(program, &[flag, staged.code.as_str()]).await
        }
        .await;

        into_result(Stage::Run, output)
    }

    async fn run_from_source(
        &self,
        program: &str,
        args: &[String],
        extension: &str,
        descriptor: &Path,
    ) -> ExecutionResult {
        let output = async {
            let source = self.store.materialize_source(descriptor, extension).await?;
            let source = source.to_string_lossy();
            let mut argv: Vec<&str> = args.iter().map(String::as_str).collect();
            argv.push(&source);
            self.runner.run(program, &argv).await
        }
        .await;

        into_result(Stage::Run, output)
    }

    async fn compile_then_run(
        &self,
        compiler: &str,
        args: &[String],
        extension: &str,
        descriptor: &Path,
    ) -> ExecutionResult {
        let binary = self.store.binary_path();

        let result = self
            .compile_and_run_binary(compiler, args, extension, descriptor, &binary)
            .await;

        // Removed whatever the outcome
        self.store.cleanup_binary(&binary).await;
        result
    }

    async fn compile_and_run_binary(
        &self,
        compiler: &str,
        args: &[String],
        extension: &str,
        descriptor: &Path,
        binary: &Path,
    ) -> ExecutionResult {
        let compiled = async {
            let source = self.store.materialize_source(descriptor, extension).await?;
            let source = source.to_string_lossy();
            let binary = binary.to_string_lossy();
            let mut argv: Vec<&str> = args.iter().map(String::as_str).collect();
            argv.extend([&*source, "-o", &*binary]);
            self.runner.run(compiler, &argv).await
        }
        .await;

        match compiled {
            Ok(output) if output.success() => {
                if !output.stderr.trim().is_empty() {
                    debug!("Compiler warnings: {}", output.stderr);
                }
            }
            other => return into_result(Stage::Compile, other),
        }

        let binary = binary.to_string_lossy();
        into_result(Stage::Run, self.runner.run(&binary, &[]).await)
    }
}

fn into_result(stage: Stage, output: Result<CommandOutput, Error>) -> ExecutionResult {
    match output {
        Ok(output) if output.success() => ExecutionResult::success(stage, output.into_payload()),
        Ok(output) => ExecutionResult::failure(stage, output.into_payload()),
        Err(e) => {
            warn!("{:?} step could not be invoked: {}", stage, e);
            ExecutionResult::failure(stage, e.to_string())
        }
    }
}
