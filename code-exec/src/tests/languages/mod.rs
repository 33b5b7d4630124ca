use crate::{DispatchOutcome, Dispatcher, ExecutionResult, Language, SourceSnapshot};

pub mod c;
pub mod go;
pub mod python;
pub mod rust;

// Common test utilities for language tests
pub(crate) async fn dispatch_output(
    dispatcher: &mut Dispatcher,
    language: Language,
    code: &str,
) -> ExecutionResult {
    match dispatcher
        .dispatch(&SourceSnapshot::new(language, code))
        .await
    {
        DispatchOutcome::Output(result) => result,
        other => panic!("expected inline output, got {:?}", other),
    }
}
