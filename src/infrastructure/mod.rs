// Infrastructure module: HTTP, files, configuration and logging

pub mod config;
pub mod files;
pub mod http_transport;
pub mod logging;

pub use config::{ClientConfig, DEFAULT_SERVER};
pub use http_transport::HttpTransport;
