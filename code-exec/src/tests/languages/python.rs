use super::dispatch_output;
use crate::{
    languages::skip_if_not_available,
    tests::{
        fixtures::{code_samples::*, failing_samples::*},
        utils::defaults::setup_test_dispatcher,
    },
    DispatchOutcome, Language, PreviewState, Result, SourceSnapshot, Stage,
};

#[tokio::test]
async fn test_python_prints_inline() -> Result<()> {
    if skip_if_not_available(&["python3"]) {
        return Ok(());
    }
    let (_dir, mut dispatcher, _exits) = setup_test_dispatcher().await?;

    let result = dispatch_output(&mut dispatcher, Language::Python, PYTHON_HI).await;
    assert!(result.is_success());
    assert_eq!(result.output, "hi\n");
    Ok(())
}

#[tokio::test]
async fn test_python_error_reports_stderr_only() -> Result<()> {
    if skip_if_not_available(&["python3"]) {
        return Ok(());
    }
    let (_dir, mut dispatcher, _exits) = setup_test_dispatcher().await?;

    let result = dispatch_output(&mut dispatcher, Language::Python, PYTHON_RAISES).await;
    assert!(!result.is_success());
    assert_eq!(result.stage, Stage::Run);
    assert!(result.output.contains("ValueError: boom"));
    Ok(())
}

#[tokio::test]
async fn test_python_empty_buffer_still_runs() -> Result<()> {
    if skip_if_not_available(&["python3"]) {
        return Ok(());
    }
    let (_dir, mut dispatcher, _exits) = setup_test_dispatcher().await?;

    let result = dispatch_output(&mut dispatcher, Language::Python, "").await;
    assert!(result.is_success());
    assert_eq!(result.output, "");
    Ok(())
}

#[tokio::test]
async fn test_python_dispatch_is_repeatable() -> Result<()> {
    if skip_if_not_available(&["python3"]) {
        return Ok(());
    }
    let (_dir, mut dispatcher, _exits) = setup_test_dispatcher().await?;

    let first = dispatch_output(&mut dispatcher, Language::Python, PYTHON_HELLO).await;
    let second = dispatch_output(&mut dispatcher, Language::Python, PYTHON_HELLO).await;
    assert_eq!(first, second);
    Ok(())
}

#[tokio::test]
async fn test_python_gui_snippet_starts_preview() -> Result<()> {
    if skip_if_not_available(&["python3"]) {
        return Ok(());
    }
    let (_dir, mut dispatcher, mut exits) = setup_test_dispatcher().await?;

    // Fails on machines without a display or tkinter, which is still a lifecycle
    let code = "import tkinter\nprint('never shown')";
    let outcome = dispatcher
        .dispatch(&SourceSnapshot::new(Language::Python, code))
        .await;
    assert_eq!(outcome, DispatchOutcome::Preview(PreviewState::Running));

    let exit = exits.recv().await.unwrap();
    let state = dispatcher.preview_mut().on_exit(exit).unwrap();
    assert!(state.is_terminal());
    Ok(())
}
