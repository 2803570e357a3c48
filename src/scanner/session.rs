//! Thread-safe accumulator for one scan's findings and errors

use crate::models::{Finding, ScanError};
use serde::Serialize;
use std::sync::Mutex;

/// Lifecycle of a session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ScanState {
    Idle,
    Running,
    Done,
}

/// Findings and errors collected by every probe family of a scan.
///
/// Shared as `Arc<ScanSession>`; probes only append. Lists grow until
/// [`clear`](ScanSession::clear) is called.
#[derive(Debug)]
pub struct ScanSession {
    findings: Mutex<Vec<Finding>>,
    errors: Mutex<Vec<ScanError>>,
    state: Mutex<ScanState>,
}

impl ScanSession {
    pub fn new() -> Self {
        Self {
            findings: Mutex::new(Vec::new()),
            errors: Mutex::new(Vec::new()),
            state: Mutex::new(ScanState::Idle),
        }
    }

    pub fn add_finding(&self, finding: Finding) {
        let mut findings = self.findings.lock().unwrap_or_else(|e| e.into_inner());
        findings.push(finding);
    }

    pub fn add_error(&self, error: ScanError) {
        let mut errors = self.errors.lock().unwrap_or_else(|e| e.into_inner());
        errors.push(error);
    }

    /// Snapshot of the findings recorded so far
    pub fn findings(&self) -> Vec<Finding> {
        let findings = self.findings.lock().unwrap_or_else(|e| e.into_inner());
        findings.clone()
    }

    /// Snapshot of the errors recorded so far
    pub fn errors(&self) -> Vec<ScanError> {
        let errors = self.errors.lock().unwrap_or_else(|e| e.into_inner());
        errors.clone()
    }

    pub fn finding_count(&self) -> usize {
        self.findings.lock().unwrap_or_else(|e| e.into_inner()).len()
    }

    pub fn error_count(&self) -> usize {
        self.errors.lock().unwrap_or_else(|e| e.into_inner()).len()
    }

    /// Empties both lists and returns the session to `Idle`. Idempotent.
    pub fn clear(&self) {
        self.findings
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clear();
        self.errors.lock().unwrap_or_else(|e| e.into_inner()).clear();
        self.set_state(ScanState::Idle);
    }

    pub fn state(&self) -> ScanState {
        *self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    pub(crate) fn set_state(&self, state: ScanState) {
        *self.state.lock().unwrap_or_else(|e| e.into_inner()) = state;
    }
}

impl Default for ScanSession {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Category, RiskLevel, ScanErrorKind};
    use std::collections::HashSet;
    use std::sync::Arc;

    fn finding(n: usize) -> Finding {
        Finding::new(
            format!("finding {n}"),
            RiskLevel::Low,
            Category::Headers,
            "http://example.com",
        )
    }

    #[test]
    fn test_clear_is_idempotent() {
        let session = ScanSession::new();
        session.add_finding(finding(1));
        session.add_error(ScanError::new(ScanErrorKind::Timeout, "slow"));
        session.set_state(ScanState::Done);

        session.clear();
        assert_eq!(session.finding_count(), 0);
        assert_eq!(session.error_count(), 0);
        assert_eq!(session.state(), ScanState::Idle);

        session.clear();
        assert!(session.findings().is_empty());
        assert!(session.errors().is_empty());
        assert_eq!(session.state(), ScanState::Idle);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_appends_are_not_lost() {
        const WORKERS: usize = 16;
        const PER_WORKER: usize = 50;

        let session = Arc::new(ScanSession::new());
        let mut handles = Vec::new();
        for worker in 0..WORKERS {
            let session = Arc::clone(&session);
            handles.push(tokio::spawn(async move {
                for i in 0..PER_WORKER {
                    session.add_finding(finding(worker * PER_WORKER + i));
                    tokio::task::yield_now().await;
                }
            }));
        }
        for handle in handles {
            handle.await.unwrap();
        }

        let findings = session.findings();
        assert_eq!(findings.len(), WORKERS * PER_WORKER);
        let messages: HashSet<_> = findings.iter().map(|f| f.message.clone()).collect();
        assert_eq!(messages.len(), WORKERS * PER_WORKER);
    }

    #[test]
    fn test_snapshots_are_independent() {
        let session = ScanSession::new();
        session.add_finding(finding(1));
        let snapshot = session.findings();
        session.add_finding(finding(2));
        assert_eq!(snapshot.len(), 1);
        assert_eq!(session.finding_count(), 2);
    }
}
