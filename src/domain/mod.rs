// Domain module: session concepts and the transport contract

pub mod models;
pub mod transport;
pub mod value_objects;

pub use models::*;
pub use transport::*;
pub use value_objects::*;
