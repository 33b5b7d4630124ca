use super::dispatch_output;
use crate::{
    languages::skip_if_not_available,
    runner::ProcessRunner,
    tests::{
        fixtures::{code_samples::*, failing_samples::*},
        utils::defaults::setup_test_dispatcher,
    },
    Language, Result, Stage,
};

#[tokio::test]
async fn test_c_hello_world() -> Result<()> {
    if skip_if_not_available(&["gcc"]) {
        return Ok(());
    }
    let (_dir, mut dispatcher, _exits) = setup_test_dispatcher().await?;

    let result = dispatch_output(&mut dispatcher, Language::C, C_HELLO).await;
    assert!(result.is_success(), "unexpected failure: {}", result.output);
    assert_eq!(result.output, "Hello, World!\n");
    assert!(!dispatcher.store().binary_path().exists());
    Ok(())
}

#[tokio::test]
async fn test_c_compile_error_is_compiler_diagnostic() -> Result<()> {
    if skip_if_not_available(&["gcc"]) {
        return Ok(());
    }
    let (dir, mut dispatcher, _exits) = setup_test_dispatcher().await?;

    let result = dispatch_output(&mut dispatcher, Language::C, C_SYNTAX_ERROR).await;
    assert!(!result.is_success());
    assert_eq!(result.stage, Stage::Compile);

    // Same diagnostics as invoking the compiler by hand
    let store = dispatcher.store();
    let source = store.source_path("c");
    let binary = store.binary_path();
    let manual = ProcessRunner::new(dir.path())
        .run(
            "gcc",
            &[&*source.to_string_lossy(), "-o", &*binary.to_string_lossy()],
        )
        .await?;
    assert_eq!(result.output, manual.stderr);
    assert!(!binary.exists());
    Ok(())
}

#[tokio::test]
async fn test_c_silent_success_is_empty_output() -> Result<()> {
    if skip_if_not_available(&["gcc"]) {
        return Ok(());
    }
    let (_dir, mut dispatcher, _exits) = setup_test_dispatcher().await?;

    let result = dispatch_output(&mut dispatcher, Language::C, C_SILENT).await;
    assert!(result.is_success());
    assert_eq!(result.stage, Stage::Run);
    assert_eq!(result.output, "");
    Ok(())
}

#[tokio::test]
async fn test_cpp_hello_world() -> Result<()> {
    if skip_if_not_available(&["g++"]) {
        return Ok(());
    }
    let (_dir, mut dispatcher, _exits) = setup_test_dispatcher().await?;

    let result = dispatch_output(&mut dispatcher, Language::Cpp, CPP_HELLO).await;
    assert!(result.is_success(), "unexpected failure: {}", result.output);
    assert_eq!(result.output, "Hello, World!\n");
    assert!(!dispatcher.store().binary_path().exists());
    Ok(())
}
