// Infrastructure: HTTP implementation of the transport contract
// Talks form-encoded POST for commands and plain GET for addresses and files

use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;
use tracing::{debug, trace};
use url::Url;

use super::config::ClientConfig;
use crate::domain::transport::{Result, Transport, TransportError};
use crate::domain::value_objects::{AppName, Command};

const COMMAND_PATH: &str = "/online/apopt.php";
const ADDRESS_PATH: &str = "/ip.php";
const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded";

/// Transport bound to one solver server
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: reqwest::Client,
    base: String,
}

impl HttpTransport {
    pub fn new(config: &ClientConfig) -> Result<Self> {
        let base = normalize_base(&config.server)?;

        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder
            .build()
            .map_err(|e| TransportError::Network(format!("failed to create HTTP client: {}", e)))?;

        Ok(Self { client, base })
    }

    pub fn base_url(&self) -> &str {
        &self.base
    }

    pub fn command_url(&self) -> String {
        format!("{}{}", self.base, COMMAND_PATH)
    }

    pub fn address_url(&self) -> String {
        format!("{}{}", self.base, ADDRESS_PATH)
    }

    pub fn solution_url(&self, ip: &str, app: &AppName) -> String {
        let folder = format!("{}_{}", ip, app);
        format!("{}/online/{}/{}.sol", self.base, folder, folder)
    }

    async fn get_text(&self, url: &str) -> Result<String> {
        debug!(url, "GET");
        let response = self.client.get(url).send().await.map_err(map_error)?;
        read_body(response).await
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn send(&self, app: &AppName, command: &Command) -> Result<String> {
        let line = command.to_string();
        let body = encode_form(app, &line);
        let url = self.command_url();

        debug!(app = %app, bytes = line.len(), "POST {}", COMMAND_PATH);
        trace!(command = %line, "command text");

        let response = self
            .client
            .post(&url)
            .header(CONTENT_TYPE, FORM_CONTENT_TYPE)
            .body(body)
            .send()
            .await
            .map_err(map_error)?;
        read_body(response).await
    }

    async fn client_address(&self) -> Result<String> {
        let url = self.address_url();
        let body = self.get_text(&url).await?;
        Ok(body.trim().to_string())
    }

    async fn fetch_solution(&self, ip: &str, app: &AppName) -> Result<String> {
        let url = self.solution_url(ip, app);
        self.get_text(&url).await
    }
}

/// Form body with `p` (application) and `a` (command text)
pub fn encode_form(app: &AppName, command: &str) -> String {
    let app: String = app
        .as_str()
        .to_lowercase()
        .chars()
        .filter(|c| !c.is_whitespace())
        .collect();
    url::form_urlencoded::Serializer::new(String::new())
        .append_pair("p", &app)
        .append_pair("a", command)
        .finish()
}

fn normalize_base(raw: &str) -> Result<String> {
    let trimmed = raw.trim().trim_end_matches('/');
    let invalid = |reason: String| TransportError::InvalidUrl {
        url: raw.to_string(),
        reason,
    };

    let parsed = Url::parse(trimmed).map_err(|e| invalid(e.to_string()))?;
    match parsed.scheme() {
        "http" | "https" => Ok(trimmed.to_string()),
        other => Err(invalid(format!("unsupported scheme '{}'", other))),
    }
}

fn map_error(error: reqwest::Error) -> TransportError {
    if error.is_timeout() {
        TransportError::Timeout
    } else {
        TransportError::Network(error.to_string())
    }
}

async fn read_body(response: reqwest::Response) -> Result<String> {
    let status = response.status();
    let body = response.text().await.map_err(map_error)?;
    if status.is_success() {
        Ok(body)
    } else {
        Err(TransportError::Server {
            status: status.as_u16(),
            body,
        })
    }
}
