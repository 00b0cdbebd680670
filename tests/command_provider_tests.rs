//! Runs `CommandProvider` against real programs.
#![cfg(unix)]

use std::sync::Arc;

use schat::inference::{CommandProvider, Provider, ProviderError, ProviderRegistry, invoke};

// ============================================================================
// Success
// ============================================================================

#[tokio::test]
async fn test_echo_returns_trimmed_stdout() {
    let provider = CommandProvider::new("echo", "echo {{prompt}}");
    let reply = provider.invoke("hello world").await.unwrap();
    assert_eq!(reply, "hello world");
}

#[tokio::test]
async fn test_system_prompt_is_prepended() {
    let provider =
        CommandProvider::new("echo", "echo {{prompt}}").with_system_prompt("Be brief. ");
    let reply = provider.invoke("hi").await.unwrap();
    assert_eq!(reply, "Be brief. hi");
}

#[tokio::test]
async fn test_prompt_whitespace_is_collapsed_into_args() {
    let provider = CommandProvider::new("echo", "echo {{ prompt }}");
    let reply = provider.invoke("a   b\n\nc").await.unwrap();
    assert_eq!(reply, "a b c");
}

#[tokio::test]
async fn test_registry_dispatch_uses_the_named_command() {
    let mut registry = ProviderRegistry::new();
    registry.register(Arc::new(CommandProvider::new("first", "echo first {{prompt}}")));
    registry.register(Arc::new(CommandProvider::new("second", "echo second {{prompt}}")));

    assert_eq!(invoke(&registry, "second", "x").await.unwrap(), "second x");
    assert_eq!(invoke(&registry, "first", "x").await.unwrap(), "first x");
}

// ============================================================================
// Failures
// ============================================================================

#[tokio::test]
async fn test_nonzero_exit_is_failed() {
    let provider = CommandProvider::new("false", "false {{prompt}}");
    let err = provider.invoke("anything").await.unwrap_err();
    match err {
        ProviderError::Failed { ref status, .. } => {
            assert!(status.contains('1'), "unexpected status: {status}");
            assert!(err.to_string().contains("exit status"));
        }
        other => panic!("expected Failed, got {other:?}"),
    }
}

#[tokio::test]
async fn test_stderr_is_reported_on_failure() {
    let provider = CommandProvider::new("ls", "ls {{prompt}}");
    let err = provider
        .invoke("/definitely/not/a/real/path")
        .await
        .unwrap_err();
    match err {
        ProviderError::Failed { ref stderr, .. } => assert!(!stderr.is_empty()),
        other => panic!("expected Failed, got {other:?}"),
    }
}

#[tokio::test]
async fn test_missing_binary_is_spawn_error() {
    let provider = CommandProvider::new("ghost", "schat-no-such-binary-xyz {{prompt}}");
    let err = provider.invoke("hi").await.unwrap_err();
    assert!(
        matches!(err, ProviderError::Spawn { ref program, .. } if program == "schat-no-such-binary-xyz"),
        "got {err:?}"
    );
}

#[tokio::test]
async fn test_silent_success_is_empty_output() {
    let provider = CommandProvider::new("true", "true {{prompt}}");
    let err = provider.invoke("hi").await.unwrap_err();
    assert!(matches!(err, ProviderError::EmptyOutput), "got {err:?}");
}

#[tokio::test]
async fn test_unknown_provider_spawns_nothing() {
    let registry = ProviderRegistry::new();
    let err = invoke(&registry, "missing", "hi").await.unwrap_err();
    assert!(matches!(err, ProviderError::UnknownProvider(ref id) if id == "missing"));
}
