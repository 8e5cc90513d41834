use macrorify_core::{catalog, AnalysisSession, Position, ResolutionKey, TypeTag};
use macrorify_lsp::convert::{apply_resolution, completion_item, resolution_key};
use tower_lsp::lsp_types::{CompletionItemKind, Documentation};

fn items(text: &str, line: u32, character: u32) -> Vec<tower_lsp::lsp_types::CompletionItem> {
    let session = AnalysisSession::new(text);
    session
        .complete(text, Position::new(line, character))
        .iter()
        .map(completion_item)
        .collect()
}

#[test]
fn test_map_constructor_completion() {
    let items = items("Map().", 0, 6);
    let labels: Vec<&str> = items.iter().map(|i| i.label.as_str()).collect();
    assert_eq!(labels, catalog::members(TypeTag::Map).methods.to_vec());
    assert!(items.iter().all(|i| i.kind == Some(CompletionItemKind::METHOD)));
}

#[test]
fn test_function_items_insert_call() {
    let items = items("fun greet(name) {\n}\n", 2, 0);
    let greet = items.iter().find(|i| i.label == "greet").expect("greet offered");
    assert_eq!(greet.kind, Some(CompletionItemKind::FUNCTION));
    assert_eq!(greet.insert_text.as_deref(), Some("greet()"));
}

#[test]
fn test_resolution_key_round_trips_through_data() {
    let text = "var total = 10;\n";
    let session = AnalysisSession::new(text);
    let candidates = session.complete(text, Position::new(1, 0));

    for candidate in &candidates {
        let item = completion_item(candidate);
        assert_eq!(resolution_key(&item).as_ref(), Some(&candidate.resolution_key));
    }

    let total = candidates.iter().find(|c| c.label == "total").expect("total offered");
    let item = apply_resolution(completion_item(total), session.resolve(&total.resolution_key));
    assert_eq!(item.detail.as_deref(), Some("var total: number"));
    assert!(matches!(item.documentation, Some(Documentation::String(ref doc)) if doc.contains("Scope: global")));
}

#[test]
fn test_keyword_hints_resolve() {
    let session = AnalysisSession::new("");
    let resolution = session.resolve(&ResolutionKey::Catalog("for".to_string()));
    assert_ne!(resolution.detail, "no info");
    assert!(!resolution.documentation.is_empty());
}
