//! Fan-out of work items onto tokio tasks under the scan-wide request limit

use crate::config::ScanTarget;
use crate::http::{Executor, ProbeRequest, ProbeResponse};
use crate::models::{Family, ScanError, ScanErrorKind};
use crate::patterns::Signatures;
use crate::scanner::classify::classify_with;
use crate::scanner::session::ScanSession;
use crate::scanner::work::WorkItem;
use std::any::Any;
use std::sync::Arc;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tracing::{debug, error, info};

/// Everything a probe needs, shared by every family of one scan. Cheap to clone.
#[derive(Clone)]
pub struct ProbeContext {
    pub executor: Executor,
    pub session: Arc<ScanSession>,
    permits: Arc<Semaphore>,
    signatures: &'static Signatures,
}

impl ProbeContext {
    /// The request semaphore is sized from the target's concurrency and
    /// shared by every family, bounding total in-flight requests.
    pub fn new(executor: Executor, session: Arc<ScanSession>) -> Self {
        let permits = Arc::new(Semaphore::new(executor.target().concurrency()));
        Self {
            executor,
            session,
            permits,
            signatures: Signatures::global(),
        }
    }

    pub fn target(&self) -> &ScanTarget {
        self.executor.target()
    }

    pub fn signatures(&self) -> &'static Signatures {
        self.signatures
    }

    /// Sends one request under a permit. Warnings and transport failures are
    /// recorded in the session; `None` means there is no evidence to classify.
    pub async fn fetch(&self, request: &ProbeRequest) -> Option<ProbeResponse> {
        let _permit = self.permits.acquire().await.ok()?;
        match self.executor.execute(request).await {
            Ok(exchange) => {
                for warning in exchange.warnings {
                    self.session.add_error(warning);
                }
                Some(exchange.response)
            }
            Err(e) => {
                self.session.add_error(e);
                None
            }
        }
    }

    /// Runs a single work item end to end
    pub async fn probe(&self, item: WorkItem) {
        let request = match item.build_request(self.target()) {
            Ok(request) => request,
            Err(e) => {
                debug!("Skipping {}: {e}", item.describe());
                self.session.add_error(ScanError::new(
                    ScanErrorKind::Generic,
                    format!("could not build request for {}: {e}", item.describe()),
                ));
                return;
            }
        };

        let Some(response) = self.fetch(&request).await else {
            return;
        };

        if let Some(finding) = classify_with(&item, &response, self.signatures) {
            debug!("{} -> {} ({})", item.describe(), finding.message, finding.risk);
            self.session.add_finding(finding);
        }
    }
}

/// Schedules every enabled item as its own task and waits for all of them.
/// Returns the number of items that ran.
pub async fn run_items(ctx: &ProbeContext, family: Family, items: Vec<WorkItem>) -> usize {
    let items: Vec<WorkItem> = items
        .into_iter()
        .filter(|item| ctx.target().is_enabled(item.gate()))
        .collect();
    let total = items.len();
    info!("Running {total} {family} probes");

    let mut set = JoinSet::new();
    for item in items {
        let ctx = ctx.clone();
        set.spawn(async move { ctx.probe(item).await });
    }

    while let Some(joined) = set.join_next().await {
        if let Err(e) = joined {
            let cause = if e.is_panic() {
                panic_message(e.into_panic())
            } else {
                e.to_string()
            };
            error!("Probe task in {family} family panicked: {cause}");
            ctx.session.add_error(
                ScanError::new(ScanErrorKind::Generic, format!("probe task panicked: {cause}"))
                    .in_family(family),
            );
        }
    }

    total
}

/// Best-effort text of a panic payload
pub fn panic_message(payload: Box<dyn Any + Send>) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_panic_message() {
        assert_eq!(panic_message(Box::new("boom")), "boom");
        assert_eq!(panic_message(Box::new(String::from("bang"))), "bang");
        assert_eq!(panic_message(Box::new(42u8)), "unknown panic");
    }
}
