//! Single-role execution.
//!
//! [`RoleExecutor`] is the isolation boundary of an analysis: it times one
//! completion call, parses the text, and turns every failure into a zero-value
//! output plus an error note. It never returns an error itself.

use crate::ports::completion::CompletionGateway;
use incident_domain::{AgentRole, RoleTiming};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Semaphore;
use tokio::time::Instant;
use tracing::{debug, info, warn};

/// Error note recorded when the backend returns no text
pub const EMPTY_RESPONSE: &str = "empty response";

/// Outcome of one role call
#[derive(Debug, Clone, PartialEq)]
pub struct RoleRun<T> {
    pub role: AgentRole,
    /// Parsed output, or the zero value when the call failed
    pub output: T,
    pub timing: RoleTiming,
    pub error: Option<String>,
}

impl<T> RoleRun<T> {
    pub fn is_success(&self) -> bool {
        self.error.is_none()
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> RoleRun<U> {
        RoleRun {
            role: self.role,
            output: f(self.output),
            timing: self.timing,
            error: self.error,
        }
    }
}

/// Runs roles against a completion gateway
pub struct RoleExecutor<G: CompletionGateway + ?Sized> {
    gateway: Arc<G>,
    temperature: f32,
    call_timeout: Option<Duration>,
    origin: Instant,
    limiter: Option<Arc<Semaphore>>,
}

impl<G: CompletionGateway + ?Sized> Clone for RoleExecutor<G> {
    fn clone(&self) -> Self {
        Self {
            gateway: Arc::clone(&self.gateway),
            temperature: self.temperature,
            call_timeout: self.call_timeout,
            origin: self.origin,
            limiter: self.limiter.clone(),
        }
    }
}

impl<G: CompletionGateway + ?Sized> RoleExecutor<G> {
    /// `origin` is the analysis start; role timings are offsets from it.
    pub fn new(gateway: Arc<G>, origin: Instant) -> Self {
        Self {
            gateway,
            temperature: 0.2,
            call_timeout: None,
            origin,
            limiter: None,
        }
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    pub fn with_call_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.call_timeout = timeout;
        self
    }

    /// Share a concurrency limit with other executors
    pub fn with_limiter(mut self, limiter: Arc<Semaphore>) -> Self {
        self.limiter = Some(limiter);
        self
    }

    /// Run one role: call the gateway, parse the text, record timing.
    pub async fn run<T: Default>(
        &self,
        role: AgentRole,
        prompt: &str,
        max_tokens: u32,
        parser: fn(&str) -> T,
    ) -> RoleRun<T> {
        let _permit = match &self.limiter {
            Some(limiter) => Arc::clone(limiter).acquire_owned().await.ok(),
            None => None,
        };

        let start = Instant::now();
        info!("[{}] started", role);

        let call = self.gateway.complete(prompt, max_tokens, self.temperature);
        let result = match self.call_timeout {
            Some(timeout) => match tokio::time::timeout(timeout, call).await {
                Ok(r) => r.map_err(|e| e.to_string()),
                Err(_) => Err(format!("timed out after {}", format_duration(timeout))),
            },
            None => call.await.map_err(|e| e.to_string()),
        };

        let timing = RoleTiming::new(
            start.saturating_duration_since(self.origin),
            start.elapsed(),
        );

        let (output, error) = match result {
            Ok(text) if text.trim().is_empty() => {
                warn!("[{}] empty response", role);
                (T::default(), Some(EMPTY_RESPONSE.to_string()))
            }
            Ok(text) => {
                info!("[{}] done in {:.2}s", role, timing.elapsed.as_secs_f64());
                debug!("[{}] raw response ({} bytes)", role, text.len());
                (parser(&text), None)
            }
            Err(e) => {
                warn!("[{}] failed: {}", role, e);
                (T::default(), Some(e))
            }
        };

        RoleRun {
            role,
            output,
            timing,
            error,
        }
    }
}

fn format_duration(duration: Duration) -> String {
    if duration.subsec_millis() == 0 {
        format!("{}s", duration.as_secs())
    } else {
        format!("{}ms", duration.as_millis())
    }
}
