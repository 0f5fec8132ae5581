// Application module: use cases built on the transport contract

pub mod session_driver;

pub use session_driver::{DriverError, SessionDriver};
