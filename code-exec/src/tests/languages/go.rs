use super::dispatch_output;
use crate::{
    languages::skip_if_not_available,
    tests::{
        fixtures::{code_samples::GO_HELLO, failing_samples::GO_SYNTAX_ERROR},
        utils::defaults::setup_test_dispatcher,
    },
    Language, Result, Stage,
};

#[tokio::test]
async fn test_go_runs_from_source() -> Result<()> {
    if skip_if_not_available(&["go"]) {
        return Ok(());
    }
    let (_dir, mut dispatcher, _exits) = setup_test_dispatcher().await?;

    let result = dispatch_output(&mut dispatcher, Language::Go, GO_HELLO).await;
    assert!(result.is_success(), "unexpected failure: {}", result.output);
    assert_eq!(result.output, "Hello, World!\n");
    assert!(dispatcher.store().source_path("go").exists());
    Ok(())
}

#[tokio::test]
async fn test_go_syntax_error() -> Result<()> {
    if skip_if_not_available(&["go"]) {
        return Ok(());
    }
    let (_dir, mut dispatcher, _exits) = setup_test_dispatcher().await?;

    let result = dispatch_output(&mut dispatcher, Language::Go, GO_SYNTAX_ERROR).await;
    assert!(!result.is_success());
    assert_eq!(result.stage, Stage::Run);
    assert!(!result.output.is_empty());
    Ok(())
}
