#[cfg(test)]
mod tests {
    use macrorify_core::AnalysisSession;
    use ropey::Rope;
    use serde_json::json;
    use tower_lsp::lsp_types::*;
    use tower_lsp::{LanguageServer, LspService};

    use crate::server::cli::{is_safe_path, render, try_cli_analyze};
    use crate::server::config::ServerConfig;
    use crate::server::state::MacrorifyLanguageServer;
    use crate::server::text::{apply_change, char_index, content_hash};

    fn uri() -> Url {
        Url::parse("file:///tmp/script.mcr").unwrap()
    }

    async fn open(server: &MacrorifyLanguageServer, text: &str) {
        server
            .did_open(DidOpenTextDocumentParams {
                text_document: TextDocumentItem::new(uri(), "macrorify".to_string(), 1, text.to_string()),
            })
            .await;
    }

    async fn complete(server: &MacrorifyLanguageServer, line: u32, character: u32) -> Vec<CompletionItem> {
        let params = CompletionParams {
            text_document_position: TextDocumentPositionParams::new(
                TextDocumentIdentifier::new(uri()),
                Position::new(line, character),
            ),
            work_done_progress_params: Default::default(),
            partial_result_params: Default::default(),
            context: None,
        };
        match server.completion(params).await.unwrap() {
            Some(CompletionResponse::Array(items)) => items,
            Some(CompletionResponse::List(list)) => list.items,
            None => Vec::new(),
        }
    }

    #[tokio::test]
    async fn completion_follows_variable_types() {
        let (service, _socket) = LspService::new(MacrorifyLanguageServer::new);
        let server = service.inner();
        open(server, "var r = Region(0, 0, 10, 10);\nr.").await;

        let items = complete(server, 1, 2).await;
        let find = items.iter().find(|i| i.label == "find").unwrap();
        assert_eq!(find.kind, Some(CompletionItemKind::METHOD));
        assert!(find.data.is_some());
    }

    #[tokio::test]
    async fn resolve_uses_the_completing_session() {
        let (service, _socket) = LspService::new(MacrorifyLanguageServer::new);
        let server = service.inner();
        open(server, "var count = 0;\ncount = \"x\";\n").await;

        let items = complete(server, 2, 0).await;
        let count = items.iter().find(|i| i.label == "count").cloned().unwrap();
        assert_eq!(count.data, Some(json!(["varNameIntellisense", 0])));

        let resolved = server.completion_resolve(count).await.unwrap();
        assert_eq!(resolved.detail.as_deref(), Some("var count: number"));
        match resolved.documentation {
            Some(Documentation::String(doc)) => assert!(doc.contains("line 2: \"x\" (string)"), "{doc}"),
            other => panic!("unexpected documentation {other:?}"),
        }
    }

    #[tokio::test]
    async fn resolve_without_session_uses_catalog() {
        let (service, _socket) = LspService::new(MacrorifyLanguageServer::new);
        let item = CompletionItem {
            label: "nothing".to_string(),
            data: Some(json!("nothing")),
            ..Default::default()
        };
        let resolved = service.inner().completion_resolve(item).await.unwrap();
        assert_eq!(resolved.detail.as_deref(), Some("no info"));
        assert!(resolved.documentation.is_none());
    }

    #[tokio::test]
    async fn incremental_changes_update_the_document() {
        let (service, _socket) = LspService::new(MacrorifyLanguageServer::new);
        let server = service.inner();
        open(server, "var a = 1;\n").await;

        server
            .did_change(DidChangeTextDocumentParams {
                text_document: VersionedTextDocumentIdentifier::new(uri(), 2),
                content_changes: vec![TextDocumentContentChangeEvent {
                    range: Some(Range::new(Position::new(0, 8), Position::new(0, 9))),
                    range_length: None,
                    text: "\"s\"".to_string(),
                }],
            })
            .await;

        let doc = server.documents.get(&uri()).unwrap();
        assert_eq!(doc.content.to_string(), "var a = \"s\";\n");
        assert_eq!(doc.version, 2);
        assert_eq!(doc.content_hash, content_hash("var a = \"s\";\n"));
    }

    #[tokio::test]
    async fn closed_documents_complete_nothing() {
        let (service, _socket) = LspService::new(MacrorifyLanguageServer::new);
        let server = service.inner();
        open(server, "var a = 1;\n").await;
        server
            .did_close(DidCloseTextDocumentParams {
                text_document: TextDocumentIdentifier::new(uri()),
            })
            .await;

        assert!(server.documents.get(&uri()).is_none());
        assert!(complete(server, 1, 0).await.is_empty());
    }

    #[test]
    fn config_section_overlay() {
        let mut config = ServerConfig::default();
        assert_eq!(config.check_errors, 1000);
        assert_eq!(config.debounce_ms, 200);

        config.apply_section(json!({"checkErrors": 5, "debounceMs": 0})).unwrap();
        assert_eq!(config, ServerConfig { check_errors: 5, debounce_ms: 0 });

        config.apply_section(json!({"checkErrors": 0})).unwrap();
        assert_eq!(config.check_errors, 5);

        config.apply_section(serde_json::Value::Null).unwrap();
        assert!(config.apply_section(json!({"checkErrors": "many"})).is_err());
    }

    #[test]
    fn utf16_positions_map_to_chars() {
        let rope = Rope::from_str("var s = \"😀\";\nx;");
        assert_eq!(char_index(&rope, Position::new(0, 9)), 9);
        assert_eq!(char_index(&rope, Position::new(0, 11)), 10);
        assert_eq!(char_index(&rope, Position::new(0, 99)), 12);
        assert_eq!(char_index(&rope, Position::new(1, 1)), 14);
        assert_eq!(char_index(&rope, Position::new(7, 0)), rope.len_chars());
    }

    #[test]
    fn full_replacement_and_insertions() {
        let mut rope = Rope::from_str("old");
        apply_change(
            &mut rope,
            &TextDocumentContentChangeEvent {
                range: None,
                range_length: None,
                text: "var a = 1;".to_string(),
            },
        );
        apply_change(
            &mut rope,
            &TextDocumentContentChangeEvent {
                range: Some(Range::new(Position::new(0, 10), Position::new(0, 10))),
                range_length: None,
                text: "\na;".to_string(),
            },
        );
        assert_eq!(rope.to_string(), "var a = 1;\na;");
    }

    #[test]
    fn cli_paths_must_stay_relative() {
        assert!(is_safe_path("scripts/main.mcr"));
        assert!(!is_safe_path(""));
        assert!(!is_safe_path("/etc/passwd"));
        assert!(!is_safe_path("../secret.mcr"));
        assert!(!is_safe_path("a/../../b"));
        assert!(!is_safe_path("C:\\macro.mcr"));
        assert!(!is_safe_path("a\nb"));
    }

    #[test]
    fn cli_arguments() {
        assert!(try_cli_analyze(Vec::new()).unwrap().is_none());
        assert!(try_cli_analyze(vec!["--stdio".to_string()]).unwrap().is_none());
        assert!(try_cli_analyze(vec!["--analyze".to_string()]).is_err());
        assert!(try_cli_analyze(vec!["--analyze".to_string(), "../x.mcr".to_string()]).is_err());
        assert!(try_cli_analyze(vec!["--analyze".to_string(), "missing/file.mcr".to_string()]).is_err());
    }

    #[test]
    fn cli_errors_only_output() {
        let session = AnalysisSession::new("var a = 1\nlet x = 5;\n");
        assert_eq!(
            render(&session, true).unwrap(),
            "Line 2:1: 'let' declaration isn't supported. Use 'var' instead - it has the same properties."
        );

        let clean = AnalysisSession::new("var a = 1;\n");
        assert_eq!(render(&clean, true).unwrap(), "No errors found");
    }

    #[test]
    fn cli_json_output() {
        let session = AnalysisSession::new("fun go(a) {\n}\nclass Box() {\n}\nvar b = 2\n");
        let value: serde_json::Value = serde_json::from_str(&render(&session, false).unwrap()).unwrap();
        assert_eq!(value["functions"], json!(["go"]));
        assert_eq!(value["classes"], json!(["Box"]));
        assert_eq!(value["symbols"][1]["name"], json!("b"));
        assert_eq!(value["symbols"][1]["tag"], json!("number"));
        assert_eq!(value["diagnostics"][0]["severity"], json!("warning"));
        assert_eq!(value["diagnostics"][0]["range"]["start"], json!({"line": 4, "character": 0}));
    }
}
