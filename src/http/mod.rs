//! Request executor for probe traffic

pub mod client;
pub mod response;
pub mod transport;

pub use client::{Executor, ProbeRequest};
pub use response::{Exchange, ProbeResponse};
pub use transport::classify_transport_error;
