use std::sync::PoisonError;

use macrorify_core::{completion, SymbolTable};
use ropey::Rope;
use tower_lsp::jsonrpc::Result;
use tower_lsp::lsp_types::*;
use tower_lsp::LanguageServer;
use tracing::{debug, info};

use crate::convert;

use super::{
    state::{Document, MacrorifyLanguageServer},
    text::{apply_change, content_hash},
};

#[tower_lsp::async_trait]
impl LanguageServer for MacrorifyLanguageServer {
    async fn initialize(&self, params: InitializeParams) -> Result<InitializeResult> {
        info!("Macrorify Language Server initializing with params: {:?}", params.root_uri);

        Ok(InitializeResult {
            capabilities: ServerCapabilities {
                text_document_sync: Some(TextDocumentSyncCapability::Kind(TextDocumentSyncKind::INCREMENTAL)),
                completion_provider: Some(CompletionOptions {
                    resolve_provider: Some(true),
                    trigger_characters: Some(vec![".".to_string()]),
                    work_done_progress_options: Default::default(),
                    all_commit_characters: None,
                    completion_item: None,
                }),
                ..Default::default()
            },
            server_info: Some(ServerInfo {
                name: "Macrorify Language Server".to_string(),
                version: Some(env!("CARGO_PKG_VERSION").to_string()),
            }),
        })
    }

    async fn initialized(&self, _: InitializedParams) {
        info!("Macrorify Language Server initialized");
        self.client
            .log_message(MessageType::INFO, "Macrorify Language Server started")
            .await;
        self.load_config().await;
    }

    async fn shutdown(&self) -> Result<()> {
        info!("Macrorify Language Server shutting down");
        Ok(())
    }

    async fn did_change_configuration(&self, _params: DidChangeConfigurationParams) {
        info!("configuration changed, reloading");
        self.load_config().await;
        self.revalidate_all();
    }

    async fn did_open(&self, params: DidOpenTextDocumentParams) {
        let uri = params.text_document.uri;
        let version = params.text_document.version;
        info!(%uri, version, "document opened");

        let document = Document {
            content_hash: content_hash(&params.text_document.text),
            content: Rope::from_str(&params.text_document.text),
            version,
            ..Default::default()
        };
        self.documents.insert(uri.clone(), document);
        self.schedule_diagnostics(uri, version);
    }

    async fn did_change(&self, params: DidChangeTextDocumentParams) {
        let uri = params.text_document.uri;
        let version = params.text_document.version;

        {
            let mut entry = self.documents.entry(uri.clone()).or_default();
            entry.version = version;
            for change in &params.content_changes {
                apply_change(&mut entry.content, change);
            }
            entry.content_hash = content_hash(&entry.content.to_string());
            debug!(%uri, version, changes = params.content_changes.len(), "document changed");
        }

        self.schedule_diagnostics(uri, version);
    }

    async fn did_close(&self, params: DidCloseTextDocumentParams) {
        let uri = params.text_document.uri;
        info!(%uri, "document closed");
        self.documents.remove(&uri);
        self.client.publish_diagnostics(uri, Vec::new(), None).await;
    }

    async fn completion(&self, params: CompletionParams) -> Result<Option<CompletionResponse>> {
        let uri = &params.text_document_position.text_document.uri;
        let position = params.text_document_position.position;

        let Some((session, text)) = self.session_for(uri).await else {
            return Ok(None);
        };
        let candidates = session.complete(&text, convert::position_from_lsp(position));
        debug!(%uri, line = position.line, count = candidates.len(), "completion");

        *self.last_completed.lock().unwrap_or_else(PoisonError::into_inner) = Some(session);
        let items = candidates.iter().map(convert::completion_item).collect();
        Ok(Some(CompletionResponse::Array(items)))
    }

    async fn completion_resolve(&self, item: CompletionItem) -> Result<CompletionItem> {
        let Some(key) = convert::resolution_key(&item) else {
            return Ok(item);
        };
        let session = self.last_completed.lock().unwrap_or_else(PoisonError::into_inner).clone();
        let resolution = match session {
            Some(session) => session.resolve(&key),
            None => completion::resolve(&key, &SymbolTable::default()),
        };
        Ok(convert::apply_resolution(item, resolution))
    }
}
