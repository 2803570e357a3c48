//! Vigil - concurrent web vulnerability probe
//!
//! Sends a structured battery of probes (sensitive paths, security headers,
//! default credentials, SQL/NoSQL/XSS payloads) to a single HTTP target,
//! classifies each response and aggregates the results into typed findings.
//!
//! ```no_run
//! use vigil::config::ScanTarget;
//! use vigil::scanner::ScanEngine;
//!
//! # async fn run() -> vigil::error::Result<()> {
//! let target = ScanTarget::new("http://localhost:8080")?;
//! let report = ScanEngine::with_defaults().scan(target).await?;
//! println!("{}", report.to_json()?);
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod error;
pub mod http;
pub mod logging;
pub mod models;
pub mod patterns;
pub mod scanner;
