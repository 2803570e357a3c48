//! Content and configuration family: files, headers, default pages and server settings

use crate::config::ScanTarget;
use crate::models::{Family, ProbeCategory, RiskLevel};
use crate::patterns::catalog::{
    BACKUP_BASE_PATHS, BACKUP_EXTENSIONS, DEFAULT_PAGES, ERROR_PATHS, HTTP_METHODS,
    LISTING_DIRECTORIES, REDIRECT_PROBES, SECURITY_HEADERS, SENSITIVE_FILES,
};
use crate::scanner::orchestrator::ProbeContext;
use crate::scanner::work::{FileKind, WorkItem};
use crate::scanner::ProbeFamily;
use async_trait::async_trait;

pub struct ContentFamily;

#[async_trait]
impl ProbeFamily for ContentFamily {
    fn family(&self) -> Family {
        Family::Content
    }

    fn description(&self) -> &str {
        "Checks for exposed files, missing security headers, default pages and server misconfiguration"
    }

    async fn plan(&self, ctx: &ProbeContext) -> Vec<WorkItem> {
        content_items(ctx.target())
    }
}

/// The full content work set for the target's enabled categories
pub fn content_items(target: &ScanTarget) -> Vec<WorkItem> {
    let mut items = Vec::new();

    if target.is_enabled(ProbeCategory::Files) {
        items.extend(file_items(target));
    }

    if target.is_enabled(ProbeCategory::Headers) {
        items.extend(SECURITY_HEADERS.iter().map(|h| WorkItem::Header {
            name: h.name,
            accepted_values: h.accepted_values,
            risk: h.risk,
            required: h.required,
            description: h.description,
        }));
        if target.is_https() {
            items.push(WorkItem::TransportSecurity {
                https: target.is_https(),
            });
        }
    }

    if target.is_enabled(ProbeCategory::Defaults) {
        items.extend(
            DEFAULT_PAGES
                .iter()
                .map(|&path| WorkItem::DefaultPage { path }),
        );
    }

    if target.is_enabled(ProbeCategory::Server) {
        items.extend(HTTP_METHODS.iter().map(|m| WorkItem::Method {
            verb: m.verb,
            dangerous: m.dangerous,
            description: m.description,
        }));
        items.push(WorkItem::ServerBanner);
        items.extend(ERROR_PATHS.iter().map(|&path| WorkItem::ErrorPage { path }));
        items.extend(
            REDIRECT_PROBES
                .iter()
                .map(|&(path, description)| WorkItem::Redirect { path, description }),
        );
    }

    items
}

fn file_items(target: &ScanTarget) -> Vec<WorkItem> {
    let mut items: Vec<WorkItem> = SENSITIVE_FILES
        .iter()
        .map(|file| WorkItem::File {
            url: target.url_for(file.path),
            path: file.path.to_string(),
            risk: file.risk,
            label: file.description.to_string(),
            kind: FileKind::Sensitive,
        })
        .collect();

    for base in BACKUP_BASE_PATHS {
        for ext in BACKUP_EXTENSIONS {
            let path = format!("{base}{ext}");
            items.push(WorkItem::File {
                url: target.url_for(&path),
                path,
                risk: RiskLevel::High,
                label: "Backup file".to_string(),
                kind: FileKind::Backup,
            });
        }
    }

    // Backups of the scanned resource itself sit next to it, not under it
    let own_path = target.base_url.path().trim_end_matches('/');
    if !own_path.is_empty() {
        for ext in BACKUP_EXTENSIONS {
            let mut url = target.base_url.clone();
            url.set_path(&format!("{own_path}{ext}"));
            url.set_query(None);
            items.push(WorkItem::File {
                url: url.to_string(),
                path: format!("{own_path}{ext}"),
                risk: RiskLevel::High,
                label: "Backup file".to_string(),
                kind: FileKind::Backup,
            });
        }
    }

    items.extend(LISTING_DIRECTORIES.iter().map(|dir| WorkItem::File {
        url: target.url_for(dir),
        path: dir.to_string(),
        risk: RiskLevel::Medium,
        label: "Directory listing".to_string(),
        kind: FileKind::DirectoryListing,
    }));

    items
}
