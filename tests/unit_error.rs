/// Unit tests for CompilerError and CompilerResult.

use std::error::Error;
use std::io;

use ferrous_inject::{CompilerError, CompilerResult, ObjectType};

#[test]
fn test_error_display_class_not_found() {
    let error = CompilerError::ClassNotFound(ObjectType::new("com/example/Missing"));
    assert_eq!(error.to_string(), "Class not found: com.example.Missing");
}

#[test]
fn test_error_display_name_exhausted() {
    let error = CompilerError::NameExhausted {
        pattern: "com/example/Service$ConstructorProvider{}$main".to_string(),
    };
    assert_eq!(
        error.to_string(),
        "Cannot generate a unique name with pattern: com/example/Service$ConstructorProvider{}$main"
    );
}

#[test]
fn test_error_display_emission() {
    let error = CompilerError::Emission {
        ty: ObjectType::new("com/example/Service$ConstructorProvider0$main"),
        message: "unsupported value".to_string(),
    };
    assert_eq!(
        error.to_string(),
        "Failed to emit com.example.Service$ConstructorProvider0$main: unsupported value"
    );
}

#[test]
fn test_error_display_config() {
    let error = CompilerError::Config("project_name must not be empty".to_string());
    assert_eq!(error.to_string(), "Invalid configuration: project_name must not be empty");
}

#[test]
fn test_io_error_converts_and_keeps_source() {
    fn flush() -> CompilerResult<()> {
        Err(io::Error::new(io::ErrorKind::Other, "disk full"))?;
        Ok(())
    }

    let error = flush().unwrap_err();
    assert!(matches!(error, CompilerError::Io(_)));
    assert_eq!(error.to_string(), "I/O error: disk full");
    assert!(error.source().is_some());
}

#[test]
fn test_error_is_send_and_sync() {
    fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<CompilerError>();
}
