// Session driver: one full solve cycle against a stateful remote session
//
// Sequence: clear → load → options → solve → (ip + solution) → clear
// Each step is awaited before the next; nothing is retried.

use std::path::PathBuf;

use tracing::{debug, info, warn};

use crate::domain::{
    models::{SolutionArtifact, SolveReport, SolverOptions},
    transport::{Transport, TransportError, FAILURE_SENTINEL},
    value_objects::{AppName, Command, FailurePolicy, ModelStub, SessionState, SessionStep},
};
use crate::infrastructure::{config::ClientConfig, files};

/// Error types for a solve run
#[derive(Debug, thiserror::Error)]
pub enum DriverError {
    #[error("failed to read model file {path}: {source}")]
    ReadModel {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to write solution file {path}: {source}")]
    WriteSolution {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("step '{step}' failed: {source}")]
    Step {
        step: SessionStep,
        #[source]
        source: TransportError,
    },
}

pub type Result<T> = std::result::Result<T, DriverError>;

/// Receives the solver log as soon as `solve` answers
pub type SolveOutputSink = Box<dyn Fn(&str) + Send + Sync>;

pub struct SessionDriver<T: Transport> {
    transport: T,
    options: SolverOptions,
    retrieve_solution: bool,
    policy: FailurePolicy,
    solve_sink: Option<SolveOutputSink>,
}

impl<T: Transport> SessionDriver<T> {
    pub fn new(transport: T, config: &ClientConfig) -> Self {
        Self {
            transport,
            options: config.options.clone(),
            retrieve_solution: config.retrieve_solution,
            policy: config.failure_policy,
            solve_sink: None,
        }
    }

    /// Hand the solve response to `sink` before any later step can fail
    pub fn on_solve_output(mut self, sink: impl Fn(&str) + Send + Sync + 'static) -> Self {
        self.solve_sink = Some(Box::new(sink));
        self
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Solve `<stub>.nl` remotely and write `<stub>.sol`
    ///
    /// The model is read before any request is sent. Under
    /// [`FailurePolicy::Abort`] the first failed step ends the run, but the
    /// final `clear all` is still attempted; a failure of that final clear is
    /// itself returned as the run's error. The solve log goes to the sink
    /// registered with [`SessionDriver::on_solve_output`] even when a later
    /// step aborts. Under [`FailurePolicy::Continue`]
    /// failures are collected in [`SolveReport::failed_steps`] instead.
    pub async fn run(&self, stub: &ModelStub) -> Result<SolveReport> {
        let app = AppName::from_stub(stub);
        let model_path = stub.model_path();
        let payload = files::read_model(&model_path).map_err(|source| DriverError::ReadModel {
            path: model_path.clone(),
            source,
        })?;

        info!(app = %app, model = %model_path.display(), policy = ?self.policy, "starting solve run");

        let mut report = SolveReport::new(app);
        let outcome = self.drive(&mut report, stub, payload.load_command()).await;

        if let Err(err) = outcome {
            warn!(error = %err, "aborting run, releasing remote session");
            self.release(&mut report).await;
            return Err(err);
        }

        let cleared = self.transport.send(&report.app, &Command::ClearAll).await;
        if self
            .settle(&mut report, SessionStep::ClearSession, cleared)?
            .is_some()
        {
            advance(&mut report, SessionState::Cleared);
        }

        info!(
            app = %report.app,
            failed_steps = report.failed_steps.len(),
            state = %report.final_state,
            "solve run finished"
        );
        Ok(report)
    }

    async fn drive(&self, report: &mut SolveReport, stub: &ModelStub, load: Command) -> Result<()> {
        let app = report.app.clone();

        let cleared = self.transport.send(&app, &Command::ClearAll).await;
        if self.settle(report, SessionStep::ClearPrior, cleared)?.is_some() {
            advance(report, SessionState::Cleared);
        }

        let loaded = self.transport.send(&app, &load).await;
        if self.settle(report, SessionStep::LoadModel, loaded)?.is_some() {
            info!(app = %app, "loaded NL file");
            advance(report, SessionState::Loaded);
        }

        let mut configured = true;
        for option in self.options.iter() {
            let outcome = self.transport.send(&app, &option.command()).await;
            let step = SessionStep::SetOption(option.name.clone());
            configured &= self.settle(report, step, outcome)?.is_some();
        }
        if configured {
            advance(report, SessionState::Configured);
        }

        advance(report, SessionState::Solving);
        let solved = self.transport.send(&app, &Command::Solve).await;
        let output = self
            .settle(report, SessionStep::Solve, solved)?
            .unwrap_or_else(|| FAILURE_SENTINEL.to_string());
        if let Some(sink) = &self.solve_sink {
            sink(&output);
        }
        report.solve_output = Some(output);

        if self.retrieve_solution {
            self.retrieve(report, stub).await?;
        } else {
            debug!("solution retrieval disabled");
        }

        Ok(())
    }

    async fn retrieve(&self, report: &mut SolveReport, stub: &ModelStub) -> Result<()> {
        let address = self.transport.client_address().await;
        let Some(ip) = self.settle(report, SessionStep::FetchAddress, address)? else {
            warn!("no client address, skipping solution download");
            return Ok(());
        };
        let ip = ip.trim().to_string();

        let fetched = self.transport.fetch_solution(&ip, &report.app).await;
        let Some(raw) = self.settle(report, SessionStep::FetchSolution, fetched)? else {
            return Ok(());
        };

        let artifact = SolutionArtifact::from_response(&raw);
        let path = stub.solution_path();
        files::write_solution(&path, &artifact).map_err(|source| DriverError::WriteSolution {
            path: path.clone(),
            source,
        })?;

        info!(path = %path.display(), bytes = artifact.text.len(), "successfully returned sol file");
        report.solution_path = Some(path);
        advance(report, SessionState::SolutionFetched);
        Ok(())
    }

    /// Best-effort `clear all` after an aborted run
    async fn release(&self, report: &mut SolveReport) {
        match self.transport.send(&report.app, &Command::ClearAll).await {
            Ok(_) => advance(report, SessionState::Cleared),
            Err(err) => {
                warn!(error = %err, "failed to clear remote session");
                report.failed_steps.push(SessionStep::ClearSession);
            }
        }
    }

    /// Apply the failure policy to one step's outcome
    fn settle(
        &self,
        report: &mut SolveReport,
        step: SessionStep,
        outcome: std::result::Result<String, TransportError>,
    ) -> Result<Option<String>> {
        match outcome {
            Ok(body) => {
                debug!(step = %step, bytes = body.len(), "step completed");
                Ok(Some(body))
            }
            Err(source) => match self.policy {
                FailurePolicy::Abort => Err(DriverError::Step { step, source }),
                FailurePolicy::Continue => {
                    warn!(step = %step, error = %source, "{}", source.sentinel());
                    report.failed_steps.push(step);
                    Ok(None)
                }
            },
        }
    }
}

fn advance(report: &mut SolveReport, next: SessionState) {
    debug!(from = %report.final_state, to = %next, "session state");
    report.final_state = next;
}
