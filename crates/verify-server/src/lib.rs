//! HTTP service that checks wallet sign-in signatures.

pub mod config;
pub mod error;
pub mod routes;

pub use config::{init_tracing, Cli};
pub use error::VerifyError;
pub use routes::{router, VerifyRequest, VerifyResponse};
