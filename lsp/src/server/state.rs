use std::sync::{Arc, Mutex, PoisonError};

use dashmap::DashMap;
use macrorify_core::AnalysisSession;
use ropey::Rope;
use tower_lsp::lsp_types::Url;
use tower_lsp::Client;

use super::config::ServerConfig;

/// An open Macrorify document and the latest analysis built from it.
#[derive(Debug, Default)]
pub(crate) struct Document {
    pub(crate) content: Rope,
    pub(crate) version: i32,
    pub(crate) content_hash: u64,
    /// Latest installed session. May lag one edit behind `content`.
    pub(crate) session: Option<Arc<AnalysisSession>>,
    /// Hash of the text `session` was built from.
    pub(crate) session_hash: Option<u64>,
    /// Hash of the text whose diagnostics were last published.
    pub(crate) published_hash: Option<u64>,
}

/// Primary LSP server state shared across handlers.
pub(crate) struct MacrorifyLanguageServer {
    pub(crate) client: Client,
    pub(crate) documents: Arc<DashMap<Url, Document>>,
    pub(crate) config: Mutex<ServerConfig>,
    /// Session that produced the most recent completion list; resolve
    /// requests look symbol ids up in it.
    pub(crate) last_completed: Mutex<Option<Arc<AnalysisSession>>>,
}

impl MacrorifyLanguageServer {
    pub(crate) fn new(client: Client) -> Self {
        Self {
            client,
            documents: Arc::new(DashMap::new()),
            config: Mutex::new(ServerConfig::default()),
            last_completed: Mutex::new(None),
        }
    }

    pub(crate) fn config(&self) -> ServerConfig {
        self.config.lock().unwrap_or_else(PoisonError::into_inner).clone()
    }

    pub(crate) fn set_config(&self, config: ServerConfig) {
        *self.config.lock().unwrap_or_else(PoisonError::into_inner) = config;
    }
}
