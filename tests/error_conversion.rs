// tests/error_conversion.rs

use anyhow::Context;
use blocktask::errors::TaskError;

fn assert_send_sync<T: Send + Sync + 'static>() {}

#[test]
fn task_error_crosses_into_anyhow() {
    assert_send_sync::<TaskError>();

    let lua_err = mlua::Error::runtime("attempt to index nil");
    let err: TaskError = lua_err.into();
    match &err {
        TaskError::Lua(msg) => assert_eq!(msg, "attempt to index nil"),
        other => panic!("Expected Lua error, got: {:?}", other),
    }

    let result: Result<(), TaskError> = Err(err);
    let wrapped = result.context("loading startup script").unwrap_err();
    assert_eq!(wrapped.to_string(), "loading startup script");
    assert!(format!("{wrapped:#}").contains("attempt to index nil"));
}

#[test]
fn callback_errors_keep_the_inner_message() {
    let inner = mlua::Error::runtime("boom");
    let wrapped = mlua::Error::CallbackError {
        traceback: "stack traceback:".to_string(),
        cause: std::sync::Arc::new(inner),
    };
    let err = TaskError::from(wrapped);
    assert_eq!(err.to_string(), "Lua error: boom");
}
