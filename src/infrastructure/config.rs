// Infrastructure: Client configuration
// Single place that decides server, timeout, options and failure handling for a run

use std::time::Duration;

use crate::domain::models::SolverOptions;
use crate::domain::value_objects::FailurePolicy;

/// Public solver service used when no server is given
pub const DEFAULT_SERVER: &str = "http://byu.apopt.com";

#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub server: String,
    /// Per-request timeout; `None` leaves the HTTP client default
    pub timeout: Option<Duration>,
    pub options: SolverOptions,
    pub retrieve_solution: bool,
    pub failure_policy: FailurePolicy,
}

impl ClientConfig {
    pub fn new(server: impl Into<String>) -> Self {
        Self {
            server: server.into(),
            timeout: None,
            options: SolverOptions::default(),
            retrieve_solution: true,
            failure_policy: FailurePolicy::default(),
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn with_options(mut self, options: SolverOptions) -> Self {
        self.options = options;
        self
    }

    pub fn with_failure_policy(mut self, policy: FailurePolicy) -> Self {
        self.failure_policy = policy;
        self
    }

    pub fn without_solution(mut self) -> Self {
        self.retrieve_solution = false;
        self
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self::new(DEFAULT_SERVER)
    }
}
