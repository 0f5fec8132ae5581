//! In-process stand-in for the remote solver service.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::extract::{Form, Path, State};
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::Router;
use tokio::net::TcpListener;

pub const STUB_IP: &str = "127.0.0.1";

/// How the stub answers `solve`
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SolveBehavior {
    Ok,
    ServerError,
    Slow(Duration),
}

#[derive(Clone)]
pub struct StubServer {
    requests: Arc<Mutex<Vec<(String, String)>>>,
    solution: Arc<String>,
    solve: SolveBehavior,
    solve_reply: Arc<String>,
    missing_solution: bool,
}

impl StubServer {
    pub fn new(solution: &str) -> Self {
        Self {
            requests: Arc::new(Mutex::new(Vec::new())),
            solution: Arc::new(solution.to_string()),
            solve: SolveBehavior::Ok,
            solve_reply: Arc::new("OK".to_string()),
            missing_solution: false,
        }
    }

    /// Answer `solve` with `reply` instead of `OK`
    pub fn with_solve_reply(mut self, reply: &str) -> Self {
        self.solve_reply = Arc::new(reply.to_string());
        self
    }

    /// Serve 404 for every solution file, as when the solver wrote none
    pub fn without_solution_file(mut self) -> Self {
        self.missing_solution = true;
        self
    }

    pub fn with_solve(mut self, behavior: SolveBehavior) -> Self {
        self.solve = behavior;
        self
    }

    /// `(p, a)` pairs in arrival order
    pub fn requests(&self) -> Vec<(String, String)> {
        self.requests.lock().unwrap().clone()
    }

    pub fn commands(&self) -> Vec<String> {
        self.requests().into_iter().map(|(_, a)| a).collect()
    }

    /// Serve on an ephemeral port and return the base URL
    pub async fn spawn(&self) -> String {
        let app = Router::new()
            .route("/online/apopt.php", post(command))
            .route("/ip.php", get(address))
            .route("/online/{folder}/{file}", get(solution))
            .with_state(self.clone());

        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        format!("http://{}", addr)
    }
}

async fn command(
    State(stub): State<StubServer>,
    Form(form): Form<HashMap<String, String>>,
) -> (StatusCode, String) {
    let app = form.get("p").cloned().unwrap_or_default();
    let line = form.get("a").cloned().unwrap_or_default();
    stub.requests.lock().unwrap().push((app, line.clone()));

    if line != "solve" {
        return (StatusCode::OK, String::new());
    }
    match stub.solve {
        SolveBehavior::Ok => (StatusCode::OK, stub.solve_reply.as_ref().clone()),
        SolveBehavior::ServerError => (
            StatusCode::INTERNAL_SERVER_ERROR,
            "solver crashed".to_string(),
        ),
        SolveBehavior::Slow(delay) => {
            tokio::time::sleep(delay).await;
            (StatusCode::OK, stub.solve_reply.as_ref().clone())
        }
    }
}

async fn address() -> String {
    format!("{}\n", STUB_IP)
}

async fn solution(
    State(stub): State<StubServer>,
    Path((folder, file)): Path<(String, String)>,
) -> (StatusCode, String) {
    let known = !stub.missing_solution
        && folder.starts_with(&format!("{}_", STUB_IP))
        && file == format!("{}.sol", folder);
    if known {
        (StatusCode::OK, stub.solution.as_ref().clone())
    } else {
        (StatusCode::NOT_FOUND, "no such solution".to_string())
    }
}

/// Closed local port, for connection-refused scenarios
pub async fn unreachable_server() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{}", addr)
}
