use std::path::PathBuf;

use super::value_objects::{AppName, Command, SessionState, SessionStep};

/// Verbatim text of an NL model file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelPayload {
    pub text: String,
}

impl ModelPayload {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }

    /// Command that uploads this model to the remote session
    pub fn load_command(&self) -> Command {
        Command::Load(self.text.clone())
    }
}

/// Named numeric solver option
#[derive(Debug, Clone, PartialEq)]
pub struct SolverOption {
    pub name: String,
    pub value: f64,
}

impl SolverOption {
    pub fn new(name: impl Into<String>, value: f64) -> Self {
        Self {
            name: name.into(),
            value,
        }
    }

    pub fn command(&self) -> Command {
        Command::SetOption {
            name: self.name.clone(),
            value: self.value,
        }
    }
}

/// Ordered list of options pushed to the solver before each solve
#[derive(Debug, Clone, PartialEq)]
pub struct SolverOptions {
    options: Vec<SolverOption>,
}

impl SolverOptions {
    pub fn empty() -> Self {
        Self {
            options: Vec::new(),
        }
    }

    /// Set a value, keeping the position of an existing option
    pub fn set(&mut self, name: impl Into<String>, value: f64) {
        let name = name.into();
        match self.options.iter_mut().find(|o| o.name == name) {
            Some(existing) => existing.value = value,
            None => self.options.push(SolverOption::new(name, value)),
        }
    }

    pub fn with(mut self, name: impl Into<String>, value: f64) -> Self {
        self.set(name, value);
        self
    }

    pub fn get(&self, name: &str) -> Option<f64> {
        self.options.iter().find(|o| o.name == name).map(|o| o.value)
    }

    pub fn iter(&self) -> impl Iterator<Item = &SolverOption> {
        self.options.iter()
    }

    pub fn len(&self) -> usize {
        self.options.len()
    }

    pub fn is_empty(&self) -> bool {
        self.options.is_empty()
    }
}

impl Default for SolverOptions {
    fn default() -> Self {
        Self::empty()
            .with("minlp_maximum_iterations", 10000.0)
            .with("minlp_max_iter_with_int_sol", 500.0)
            // Only the NLP path is currently served remotely
            .with("minlp_as_nlp", 1.0)
            .with("minlp_branch_method", 3.0)
            .with("minlp_gap_tol", 1.0e-2)
            .with("minlp_integer_tol", 1.0e-2)
            .with("minlp_integer_max", 2.0e9)
            .with("minlp_integer_leaves", 1.0)
            .with("minlp_print_level", 1.0)
            .with("nlp_maximum_iterations", 500.0)
            .with("objective_convergence_tolerance", 1.0e-6)
            .with("constraint_convergence_tolerance", 1.0e-6)
    }
}

/// Solution file body as written locally
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SolutionArtifact {
    pub text: String,
}

impl SolutionArtifact {
    /// Build from the raw server response, dropping every carriage return
    pub fn from_response(raw: &str) -> Self {
        Self {
            text: raw.replace('\r', ""),
        }
    }
}

/// Outcome of one solve run
#[derive(Debug, Clone)]
pub struct SolveReport {
    pub app: AppName,
    pub solve_output: Option<String>,
    pub solution_path: Option<PathBuf>,
    pub failed_steps: Vec<SessionStep>,
    pub final_state: SessionState,
}

impl SolveReport {
    pub fn new(app: AppName) -> Self {
        Self {
            app,
            solve_output: None,
            solution_path: None,
            failed_steps: Vec::new(),
            final_state: SessionState::Idle,
        }
    }

    pub fn is_clean(&self) -> bool {
        self.failed_steps.is_empty()
    }
}
