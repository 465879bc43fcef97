use anyhow::Error;
use tracing::span::Span;

pub trait LogError {
    fn log_error(&self, context: &str, error: Error);
}

impl LogError for Span {
    fn log_error(&self, context: &str, error: Error) {
        self.in_scope(|| {
            tracing::error!("{context}: {error:?}");
        });
    }
}

/// Workers have nobody to return errors to, so they log them in the current span instead.
pub trait LogFailure<T> {
    fn log_failure(self, context: &str) -> Option<T>;
}

impl<T> LogFailure<T> for anyhow::Result<T> {
    fn log_failure(self, context: &str) -> Option<T> {
        match self {
            Ok(value) => Some(value),
            Err(error) => {
                Span::current().log_error(context, error);
                None
            }
        }
    }
}
