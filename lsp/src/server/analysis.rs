use std::sync::Arc;

use dashmap::DashMap;
use macrorify_core::AnalysisSession;
use tokio::task;
use tokio::time::{sleep, Duration};
use tower_lsp::lsp_types::Url;
use tracing::debug;

use crate::convert;

use super::state::{Document, MacrorifyLanguageServer};

impl MacrorifyLanguageServer {
    /// Re-validate `uri` after the configured debounce delay, unless the
    /// document moved past `scheduled_version` in the meantime.
    pub(crate) fn schedule_diagnostics(&self, uri: Url, scheduled_version: i32) {
        let documents = self.documents.clone();
        let client = self.client.clone();
        let config = self.config();
        tokio::spawn(async move {
            sleep(Duration::from_millis(config.debounce_ms)).await;

            let reusable = {
                let Some(doc) = documents.get(&uri) else {
                    return;
                };
                if doc.version != scheduled_version {
                    return;
                }
                if doc.published_hash == Some(doc.content_hash) {
                    debug!(%uri, "content unchanged, skipping analysis");
                    return;
                }
                doc.session.clone().filter(|_| doc.session_hash == Some(doc.content_hash))
            };
            let session = match reusable {
                Some(session) => session,
                None => match rebuild(&documents, &uri).await {
                    Some(session) => session,
                    None => return,
                },
            };

            {
                let Some(mut doc) = documents.get_mut(&uri) else {
                    return;
                };
                if doc.version != scheduled_version || doc.session_hash != Some(doc.content_hash) {
                    return;
                }
                doc.published_hash = doc.session_hash;
            }
            let diagnostics = convert::diagnostics_to_lsp(session.diagnostics(), config.check_errors);
            client
                .publish_diagnostics(uri, diagnostics, Some(scheduled_version))
                .await;
        });
    }

    /// The latest installed session for `uri` together with the current
    /// document text. Builds one if none was installed yet.
    pub(crate) async fn session_for(&self, uri: &Url) -> Option<(Arc<AnalysisSession>, String)> {
        let (session, text) = {
            let doc = self.documents.get(uri)?;
            (doc.session.clone(), doc.content.to_string())
        };
        let session = match session {
            Some(session) => session,
            None => rebuild(&self.documents, uri).await?,
        };
        Some((session, text))
    }

    /// Re-publish diagnostics for every open document.
    pub(crate) fn revalidate_all(&self) {
        let pending: Vec<(Url, i32)> = self
            .documents
            .iter_mut()
            .map(|mut doc| {
                doc.published_hash = None;
                (doc.key().clone(), doc.version)
            })
            .collect();
        for (uri, version) in pending {
            self.schedule_diagnostics(uri, version);
        }
    }
}

/// Build a session from the current text of `uri`. It is installed only if
/// the document did not change while it was being built; either way the
/// caller gets the session for the text it read.
async fn rebuild(documents: &DashMap<Url, Document>, uri: &Url) -> Option<Arc<AnalysisSession>> {
    let (text, version, hash) = {
        let doc = documents.get(uri)?;
        (doc.content.to_string(), doc.version, doc.content_hash)
    };

    let session = Arc::new(task::spawn_blocking(move || AnalysisSession::new(text)).await.ok()?);

    if let Some(mut doc) = documents.get_mut(uri) {
        if doc.version == version && doc.content_hash == hash {
            doc.session = Some(session.clone());
            doc.session_hash = Some(hash);
            debug!(%uri, version, diagnostics = session.diagnostics().len(), "analysis installed");
        } else {
            debug!(%uri, version, "document moved on, analysis not installed");
        }
    }
    Some(session)
}
