// Domain layer: Session concepts and the transport contract
pub mod domain;

// Application layer: The solve-run use case
pub mod application;

// Infrastructure layer: External concerns (HTTP, files, logging)
pub mod infrastructure;

// Command-line parsing and legacy flag handling
pub mod cli;

// Re-export commonly used types
pub use domain::{
    AppName, Command, FailurePolicy, ModelPayload, ModelStub, SessionState, SessionStep,
    SolutionArtifact, SolveReport, SolverOption, SolverOptions, Transport, TransportError,
    FAILURE_SENTINEL,
};

pub use application::{DriverError, SessionDriver};

pub use infrastructure::{ClientConfig, HttpTransport, DEFAULT_SERVER};
