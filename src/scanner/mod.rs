//! Scan engine and probe family definitions

pub mod classify;
pub mod content;
pub mod credentials;
pub mod defaults;
pub mod files;
pub mod headers;
pub mod injection;
pub mod orchestrator;
pub mod server;
pub mod session;
pub mod work;

use crate::config::ScanTarget;
use crate::error::Result;
use crate::http::Executor;
use crate::models::{Family, ScanError, ScanErrorKind, ScanReport};
use async_trait::async_trait;
use futures::FutureExt;
use orchestrator::{panic_message, run_items, ProbeContext};
use session::{ScanSession, ScanState};
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tracing::{error, info};

pub use classify::{classify, classify_with};
pub use work::{FileKind, WorkItem};

/// A group of related probes run as one unit by the scan engine
#[async_trait]
pub trait ProbeFamily: Send + Sync {
    /// Which family this is; decides category gating and error tagging
    fn family(&self) -> Family;

    /// Returns a description of what this family checks
    fn description(&self) -> &str;

    /// Builds the complete work item set. May probe the target to discover endpoints.
    async fn plan(&self, ctx: &ProbeContext) -> Vec<WorkItem>;
}

/// Runs every active probe family against one target
pub struct ScanEngine {
    families: Vec<Arc<dyn ProbeFamily>>,
}

impl ScanEngine {
    /// Creates a new ScanEngine with no registered families
    pub fn new() -> Self {
        Self {
            families: Vec::new(),
        }
    }

    /// Creates a ScanEngine with the content, credentials and injection families
    pub fn with_defaults() -> Self {
        let mut engine = Self::new();
        engine.register(Arc::new(content::ContentFamily));
        engine.register(Arc::new(credentials::CredentialsFamily));
        engine.register(Arc::new(injection::InjectionFamily));
        engine
    }

    pub fn register(&mut self, family: Arc<dyn ProbeFamily>) {
        self.families.push(family);
    }

    /// Returns (family, description) for every registered family
    pub fn list_families(&self) -> Vec<(Family, &str)> {
        self.families
            .iter()
            .map(|f| (f.family(), f.description()))
            .collect()
    }

    /// Scans the target into a fresh session
    pub async fn scan(&self, target: ScanTarget) -> Result<ScanReport> {
        self.scan_into(target, Arc::new(ScanSession::new())).await
    }

    /// Scans the target into a caller-owned session, clearing it first
    pub async fn scan_into(&self, target: ScanTarget, session: Arc<ScanSession>) -> Result<ScanReport> {
        let target = Arc::new(target);
        let executor = Executor::new(Arc::clone(&target))?;

        session.clear();
        session.set_state(ScanState::Running);

        let mut report = ScanReport::new(target.base_url.as_str());
        let ctx = ProbeContext::new(executor.clone(), Arc::clone(&session));

        let active: Vec<Arc<dyn ProbeFamily>> = self
            .families
            .iter()
            .filter(|f| target.family_enabled(f.family()))
            .cloned()
            .collect();
        info!(
            "Scanning {} with {} families, concurrency {}",
            target.base_url,
            active.len(),
            target.concurrency()
        );

        let family_permits = Arc::new(Semaphore::new(
            active.len().min(target.concurrency()).max(1),
        ));

        let mut set = JoinSet::new();
        for family in active {
            let ctx = ctx.clone();
            let permits = Arc::clone(&family_permits);
            let kind = family.family();

            set.spawn(async move {
                let _permit = permits.acquire_owned().await.ok();
                let run = async {
                    let items = family.plan(&ctx).await;
                    run_items(&ctx, kind, items).await
                };
                (kind, AssertUnwindSafe(run).catch_unwind().await)
            });
        }

        while let Some(joined) = set.join_next().await {
            match joined {
                Ok((kind, Ok(probes))) => {
                    info!("Family '{kind}' completed: {probes} probes");
                    report.families_completed.push(kind);
                }
                Ok((kind, Err(payload))) => {
                    let cause = panic_message(payload);
                    error!("Family '{kind}' panicked: {cause}");
                    session.add_error(
                        ScanError::new(ScanErrorKind::Generic, format!("family panicked: {cause}"))
                            .in_family(kind),
                    );
                }
                Err(e) => {
                    error!("Family task failed: {e}");
                    session.add_error(ScanError::new(ScanErrorKind::Generic, e.to_string()));
                }
            }
        }

        session.set_state(ScanState::Done);

        report.findings = session.findings();
        report.errors = session.errors();
        report.total_requests = executor.request_count();
        report.finish();

        info!(
            "Scan finished: {} findings, {} errors, {} requests",
            report.findings.len(),
            report.errors.len(),
            report.total_requests
        );

        Ok(report)
    }
}

impl Default for ScanEngine {
    fn default() -> Self {
        Self::with_defaults()
    }
}
