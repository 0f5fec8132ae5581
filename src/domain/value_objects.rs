// Domain value objects representing core session concepts

use std::fmt;
use std::path::{Path, PathBuf};

/// Session identifier used to namespace remote solver state
///
/// Only alphanumeric characters survive, folded to lower case. Every command
/// of one run is sent under the same name.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct AppName(String);

impl AppName {
    /// Sanitize an arbitrary string into an application name
    pub fn new(raw: &str) -> Self {
        let name = raw
            .chars()
            .filter(|c| c.is_alphanumeric())
            .flat_map(char::to_lowercase)
            .collect();
        Self(name)
    }

    /// Derive the name from a model stub's base name
    pub fn from_stub(stub: &ModelStub) -> Self {
        Self::new(&stub.base_name())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for AppName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Model path with its extension stripped
///
/// `dir/model.nl` and `dir/model` both give the stub `dir/model`; the model
/// is read from `<stub>.nl` and the solution written to `<stub>.sol`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelStub(PathBuf);

impl ModelStub {
    pub fn from_path(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        let stub = match path.file_stem() {
            Some(stem) if path.extension().is_some() => path.with_file_name(stem),
            _ => path.to_path_buf(),
        };
        Self(stub)
    }

    /// File name of the stub, without directory
    pub fn base_name(&self) -> String {
        self.0
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default()
    }

    pub fn model_path(&self) -> PathBuf {
        self.with_extension("nl")
    }

    pub fn solution_path(&self) -> PathBuf {
        self.with_extension("sol")
    }

    pub fn as_path(&self) -> &Path {
        &self.0
    }

    fn with_extension(&self, ext: &str) -> PathBuf {
        let mut name = self.0.clone().into_os_string();
        name.push(".");
        name.push(ext);
        PathBuf::from(name)
    }
}

/// Text command understood by the remote solver's protocol
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    /// Reset all remote state for the application
    ClearAll,
    /// Upload model text; the wire form carries one leading space
    Load(String),
    /// Set a single numeric solver option
    SetOption { name: String, value: f64 },
    /// Run the solver on the loaded model
    Solve,
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Command::ClearAll => write!(f, "clear all"),
            Command::Load(model) => write!(f, " {}", model),
            Command::SetOption { name, value } => write!(f, "option {} {:.6}", name, value),
            Command::Solve => write!(f, "solve"),
        }
    }
}

/// One network step of a solve run
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionStep {
    ClearPrior,
    LoadModel,
    SetOption(String),
    Solve,
    FetchAddress,
    FetchSolution,
    ClearSession,
}

impl fmt::Display for SessionStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SessionStep::ClearPrior => write!(f, "clear prior session"),
            SessionStep::LoadModel => write!(f, "load model"),
            SessionStep::SetOption(name) => write!(f, "set option {}", name),
            SessionStep::Solve => write!(f, "solve"),
            SessionStep::FetchAddress => write!(f, "fetch client address"),
            SessionStep::FetchSolution => write!(f, "fetch solution"),
            SessionStep::ClearSession => write!(f, "clear session"),
        }
    }
}

/// Where a run stands in the remote session lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Idle,
    Cleared,
    Loaded,
    Configured,
    Solving,
    SolutionFetched,
}

impl fmt::Display for SessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SessionState::Idle => write!(f, "Idle"),
            SessionState::Cleared => write!(f, "Cleared"),
            SessionState::Loaded => write!(f, "Loaded"),
            SessionState::Configured => write!(f, "Configured"),
            SessionState::Solving => write!(f, "Solving"),
            SessionState::SolutionFetched => write!(f, "Solution Fetched"),
        }
    }
}

/// What the driver does when a step fails
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FailurePolicy {
    /// Stop at the first failure, then attempt the final clear
    #[default]
    Abort,
    /// Report the failure and carry on with the next step
    Continue,
}
