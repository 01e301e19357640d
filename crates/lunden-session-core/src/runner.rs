use std::future::Future;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use crate::ports::PortError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RequestPhase {
    #[default]
    Idle,
    Loading,
    Succeeded,
    Failed,
}

/// Normalized failure handed to a runner's error callback.
///
/// `message` is `None` when the underlying service rejected the request
/// without attaching any wording; the call site substitutes its own
/// field-specific fallback in that case.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestError {
    message: Option<String>,
}

impl RequestError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: Some(message.into()),
        }
    }

    pub fn from_port(err: &PortError) -> Self {
        match err {
            PortError::Rejected(message) => Self {
                message: message.clone().filter(|m| !m.is_empty()),
            },
            other => Self {
                message: Some(other.to_string()),
            },
        }
    }

    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }

    pub fn message_or<'a>(&'a self, fallback: &'a str) -> &'a str {
        self.message.as_deref().unwrap_or(fallback)
    }
}

#[derive(Debug, Clone, Default)]
pub struct RequestState {
    pub phase: RequestPhase,
    pub error: Option<RequestError>,
}

/// Wraps one fallible async action with observable idle/loading/settled
/// phases and at-most-once success/error callbacks per invocation.
///
/// Failures are never returned to the caller of [`RequestRunner::invoke`];
/// they are funneled through the error callback, and the boolean result
/// only reports whether the action settled successfully. A second invoke
/// while one is in flight is rejected outright: the flows built on top of
/// this are strictly sequential, and queuing would replay stale input.
pub struct RequestRunner<T> {
    state: Arc<Mutex<RequestState>>,
    timeout: Duration,
    on_success: Box<dyn Fn(T) + Send + Sync>,
    on_error: Box<dyn Fn(RequestError) + Send + Sync>,
}

impl<T> RequestRunner<T> {
    pub fn new(
        timeout: Duration,
        on_success: Box<dyn Fn(T) + Send + Sync>,
        on_error: Box<dyn Fn(RequestError) + Send + Sync>,
    ) -> Self {
        Self {
            state: Arc::new(Mutex::new(RequestState::default())),
            timeout,
            on_success,
            on_error,
        }
    }

    pub fn is_loading(&self) -> bool {
        self.state
            .lock()
            .map(|g| g.phase == RequestPhase::Loading)
            .unwrap_or(false)
    }

    pub fn phase(&self) -> RequestPhase {
        self.state.lock().map(|g| g.phase).unwrap_or_default()
    }

    pub fn last_error(&self) -> Option<RequestError> {
        self.state.lock().ok().and_then(|g| g.error.clone())
    }

    pub async fn invoke<F>(&self, action: F) -> bool
    where
        F: Future<Output = Result<T, PortError>>,
    {
        if !self.begin() {
            tracing::warn!("request rejected: a previous invocation is still in flight");
            return false;
        }

        match tokio::time::timeout(self.timeout, action).await {
            Ok(Ok(value)) => {
                self.settle(RequestPhase::Succeeded, None);
                (self.on_success)(value);
                true
            }
            Ok(Err(err)) => {
                let normalized = RequestError::from_port(&err);
                self.settle(RequestPhase::Failed, Some(normalized.clone()));
                (self.on_error)(normalized);
                false
            }
            Err(_) => {
                let timed_out = RequestError::new(format!(
                    "request timed out after {}ms",
                    self.timeout.as_millis()
                ));
                self.settle(RequestPhase::Failed, Some(timed_out.clone()));
                (self.on_error)(timed_out);
                false
            }
        }
    }

    fn begin(&self) -> bool {
        let Ok(mut g) = self.state.lock() else {
            return false;
        };
        if g.phase == RequestPhase::Loading {
            return false;
        }
        g.phase = RequestPhase::Loading;
        g.error = None;
        true
    }

    fn settle(&self, phase: RequestPhase, error: Option<RequestError>) {
        if let Ok(mut g) = self.state.lock() {
            g.phase = phase;
            g.error = error;
        }
    }
}
