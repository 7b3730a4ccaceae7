//! Invocation context for query execution
//!
//! Context carries query parameters and the caller's cancellation and deadline signals.

use crate::error::{Error, Result};
use crate::value::Value;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Shared flag a caller flips to abandon a running query
#[derive(Debug, Clone, Default)]
pub struct CancellationToken(Arc<AtomicBool>);

impl CancellationToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// Execution context containing parameters and cancellation state
#[derive(Debug, Clone, Default)]
pub struct Context {
    /// Query parameters. Stored both with and without the leading `$`.
    pub parameters: Arc<HashMap<Arc<str>, Value>>,
    cancellation: CancellationToken,
    deadline: Option<Instant>,
}

impl Context {
    pub fn new() -> Self {
        Self::default()
    }

    /// Context observing an existing cancellation token.
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancellation = token;
        self
    }

    pub fn with_deadline(mut self, deadline: Instant) -> Self {
        self.deadline = Some(deadline);
        self
    }

    pub fn with_timeout(self, timeout: Duration) -> Self {
        self.with_deadline(Instant::now() + timeout)
    }

    pub fn cancellation(&self) -> &CancellationToken {
        &self.cancellation
    }

    /// Set a parameter
    pub fn set_parameter(&mut self, name: impl Into<Arc<str>>, value: Value) {
        let name: Arc<str> = name.into();
        let parameters = Arc::make_mut(&mut self.parameters);
        parameters.insert(name.clone(), value.clone());

        let raw = name.as_ref();
        if let Some(stripped) = raw.strip_prefix('$') {
            parameters.insert(Arc::from(stripped), value);
        } else {
            parameters.insert(Arc::from(format!("${}", raw)), value);
        }
    }

    pub fn with_parameter(mut self, name: impl Into<Arc<str>>, value: Value) -> Self {
        self.set_parameter(name, value);
        self
    }

    /// Get a parameter value, by either spelling
    pub fn get_parameter(&self, name: &str) -> Option<&Value> {
        self.parameters.get(name)
    }

    /// Fail if the caller cancelled or the deadline passed; `stage` names the work in progress.
    pub fn check(&self, stage: &str) -> Result<()> {
        if self.cancellation.is_cancelled() {
            return Err(Error::Cancelled {
                stage: stage.to_string(),
            });
        }
        match self.deadline {
            Some(deadline) if Instant::now() >= deadline => Err(Error::DeadlineExceeded {
                stage: stage.to_string(),
            }),
            _ => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parameters_answer_both_spellings() {
        let ctx = Context::new().with_parameter("$limit", Value::Integer(5));
        assert_eq!(ctx.get_parameter("limit"), Some(&Value::Integer(5)));
        assert_eq!(ctx.get_parameter("$limit"), Some(&Value::Integer(5)));
    }

    #[test]
    fn cancelled_token_fails_check() {
        let ctx = Context::new();
        assert!(ctx.check("resolving").is_ok());
        ctx.cancellation().cancel();
        assert_eq!(
            ctx.check("resolving"),
            Err(Error::Cancelled {
                stage: "resolving".into()
            })
        );
    }

    #[test]
    fn passed_deadline_fails_check() {
        let ctx = Context::new().with_deadline(Instant::now());
        assert!(matches!(
            ctx.check("returning"),
            Err(Error::DeadlineExceeded { .. })
        ));
    }
}
