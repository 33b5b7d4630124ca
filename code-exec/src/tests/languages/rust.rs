use super::dispatch_output;
use crate::{
    languages::skip_if_not_available,
    tests::{
        fixtures::{code_samples::RUST_HELLO, failing_samples::*},
        utils::defaults::setup_test_dispatcher,
    },
    Language, Result, Stage,
};

#[tokio::test]
async fn test_rust_hello_world() -> Result<()> {
    if skip_if_not_available(&["rustc"]) {
        return Ok(());
    }
    let (_dir, mut dispatcher, _exits) = setup_test_dispatcher().await?;

    let result = dispatch_output(&mut dispatcher, Language::Rust, RUST_HELLO).await;
    assert!(result.is_success(), "unexpected failure: {}", result.output);
    assert_eq!(result.output, "Hello, World!\n");
    assert!(!dispatcher.store().binary_path().exists());
    Ok(())
}

#[tokio::test]
async fn test_rust_compile_error_skips_run() -> Result<()> {
    if skip_if_not_available(&["rustc"]) {
        return Ok(());
    }
    let (_dir, mut dispatcher, _exits) = setup_test_dispatcher().await?;

    let result = dispatch_output(&mut dispatcher, Language::Rust, RUST_SYNTAX_ERROR).await;
    assert!(!result.is_success());
    assert_eq!(result.stage, Stage::Compile);
    assert!(result.output.contains("error"));
    assert!(!dispatcher.store().binary_path().exists());
    Ok(())
}

#[tokio::test]
async fn test_rust_panic_is_run_failure() -> Result<()> {
    if skip_if_not_available(&["rustc"]) {
        return Ok(());
    }
    let (_dir, mut dispatcher, _exits) = setup_test_dispatcher().await?;

    let result = dispatch_output(&mut dispatcher, Language::Rust, RUST_PANICS).await;
    assert!(!result.is_success());
    assert_eq!(result.stage, Stage::Run);
    assert!(result.output.contains("runtime failure"));
    assert!(!dispatcher.store().binary_path().exists());
    Ok(())
}
