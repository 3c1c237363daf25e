//! Error reporting for structural validation.

use std::error::Error;

/// Sink for validation errors.
///
/// Reporting never halts the caller: analysis keeps going where it is safe
/// to, and the pipeline polls [`has_errors`](ErrorReporter::has_errors)
/// before moving on to generation.
pub trait ErrorReporter {
    /// Records an error message with an optional underlying cause.
    fn report_error(&mut self, message: String, cause: Option<&dyn Error>);

    fn has_errors(&self) -> bool;

    /// All messages reported so far, in order.
    fn errors(&self) -> &[String];
}

/// Reporter that keeps every message in memory and mirrors it to `tracing`.
#[derive(Debug, Default)]
pub struct CollectingReporter {
    errors: Vec<String>,
}

impl CollectingReporter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn into_errors(self) -> Vec<String> {
        self.errors
    }
}

impl ErrorReporter for CollectingReporter {
    fn report_error(&mut self, message: String, cause: Option<&dyn Error>) {
        match cause {
            Some(cause) => tracing::error!(cause = %cause, "{message}"),
            None => tracing::error!("{message}"),
        }
        self.errors.push(message);
    }

    fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    fn errors(&self) -> &[String] {
        &self.errors
    }
}

/// Shorthand used throughout analysis for cause-less errors.
pub(crate) fn report(reporter: &mut dyn ErrorReporter, message: impl Into<String>) {
    reporter.report_error(message.into(), None);
}
