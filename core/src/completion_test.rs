#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use serde_json::json;

    use crate::catalog::{self, CandidateKind, VARIABLE_HINT};
    use crate::completion::{complete, resolve, Candidate, ResolutionKey};
    use crate::source::Position;
    use crate::symbols::{SymbolId, SymbolTable};
    use crate::types::TypeTag;

    fn at(text: &str, line: u32, character: u32) -> Vec<Candidate> {
        complete(text, Position::new(line, character), &SymbolTable::build(text))
    }

    /// Completion at the very end of `text`.
    fn at_end(text: &str) -> Vec<Candidate> {
        let line = text.split('\n').count() as u32 - 1;
        let last = text.rsplit('\n').next().unwrap_or("");
        at(text, line, last.encode_utf16().count() as u32)
    }

    fn labels(candidates: &[Candidate]) -> Vec<&str> {
        candidates.iter().map(|c| c.label.as_str()).collect()
    }

    fn member_labels(tag: TypeTag) -> Vec<&'static str> {
        catalog::members(tag).iter().map(|(label, _)| label).collect()
    }

    #[test]
    fn map_constructor_members() {
        let candidates = at_end("Map().");
        assert_eq!(labels(&candidates), catalog::members(TypeTag::Map).methods.to_vec());
        assert!(candidates.iter().all(|c| c.kind == CandidateKind::Method));
        assert_eq!(
            candidates[0].resolution_key,
            ResolutionKey::Catalog(catalog::member_key(TypeTag::Map, candidates[0].label.as_str()))
        );
    }

    #[test]
    fn members_follow_variable_types() {
        let strings = at_end("var s = \"abc\";\ns.");
        assert_eq!(labels(&strings), member_labels(TypeTag::String));

        let matches = at_end("var r = Region(0, 0, 10, 10);\nr.find(\"x\").");
        assert_eq!(labels(&matches), member_labels(TypeTag::RegionMatch));

        let partial = at_end("var s = \"abc\";\ns.char");
        assert_eq!(labels(&partial), member_labels(TypeTag::String));
    }

    #[test]
    fn constants_come_before_methods() {
        let candidates = at_end("Point.");
        assert_eq!(candidates[0].label, "LEFT");
        assert_eq!(candidates[0].kind, CandidateKind::Constant);
        assert_eq!(candidates.last().map(|c| c.kind), Some(CandidateKind::Method));
    }

    #[test]
    fn unknown_owner_offers_every_member_once() {
        let candidates = at_end("foo().");
        let mut seen = HashSet::new();
        assert!(candidates.iter().all(|c| seen.insert((c.label.clone(), c.kind))));
        let names = labels(&candidates);
        assert!(names.contains(&"charAt"));
        assert!(names.contains(&"push"));
        assert!(names.contains(&"getScore"));
    }

    #[test]
    fn primitive_owners_without_members() {
        assert!(at_end("var b = true;\nb.").is_empty());
    }

    #[test]
    fn block_locals_are_visible_inside_only() {
        let text = "if (true) {\n  var a = 1;\n  \n}\n\n";
        assert!(labels(&at(text, 2, 2)).contains(&"a"));
        assert!(!labels(&at(text, 4, 0)).contains(&"a"));
    }

    #[test]
    fn unclosed_block_stays_visible() {
        let text = "while (x) {\n  var a = 1;\n\n";
        assert!(labels(&at(text, 2, 0)).contains(&"a"));
    }

    #[test]
    fn no_context_means_no_candidates() {
        assert!(at_end("// Map().").is_empty());
        assert!(at_end("Sys.alert(\"Map().").is_empty());
        assert!(at_end("var x").is_empty());
        assert!(at_end("var x = 1; // Map().").is_empty());
        assert!(at("x;", 5, 0).is_empty());
    }

    #[test]
    fn declaration_value_gets_candidates() {
        assert!(!at_end("var x = ").is_empty());
    }

    #[test]
    fn bare_candidates_cover_keywords_and_roots() {
        let candidates = at_end("fun go() {\n}\n");
        let kind_of = |label: &str| candidates.iter().find(|c| c.label == label).map(|c| c.kind);
        assert_eq!(kind_of("var"), Some(CandidateKind::Keyword));
        assert_eq!(kind_of("while"), Some(CandidateKind::Keyword));
        assert_eq!(kind_of("out"), Some(CandidateKind::Function));
        assert_eq!(kind_of("Sys"), Some(CandidateKind::Class));

        let go = candidates.iter().find(|c| c.label == "go");
        assert_eq!(go.and_then(|c| c.insert_text.as_deref()), Some("go()"));
    }

    #[test]
    fn shadowed_names_are_offered_once() {
        let text = "var a = 1;\nfun f(a) {\n  \n}\n";
        let candidates = at(text, 3, 2);
        let hits: Vec<&Candidate> = candidates.iter().filter(|c| c.label == "a").collect();
        assert_eq!(hits.len(), 1);
        assert_eq!(
            hits[0].resolution_key,
            ResolutionKey::Symbol(VARIABLE_HINT.to_string(), SymbolId(1))
        );
    }

    #[test]
    fn resolve_describes_symbols() {
        let text = "var name = \"text\";\nname = 5;\n";
        let table = SymbolTable::build(text);
        let candidates = complete(text, Position::new(2, 0), &table);
        let name = candidates.iter().find(|c| c.label == "name").map(|c| c.resolution_key.clone());
        let Some(key) = name else {
            panic!("name should be offered");
        };

        let resolution = resolve(&key, &table);
        assert_eq!(resolution.detail, "var name: string");
        assert!(resolution.documentation.contains("Scope: global"));
        assert!(resolution.documentation.contains("Declared value: \"text\""));
        assert!(resolution.documentation.contains("line 2: 5 (number)"));
    }

    #[test]
    fn resolve_catalog_entries() {
        let table = SymbolTable::default();
        let var = resolve(&ResolutionKey::Catalog("var".to_string()), &table);
        assert_ne!(var.detail, "no info");
        assert!(!var.documentation.is_empty());

        let push = resolve(&ResolutionKey::Catalog(catalog::member_key(TypeTag::Array, "push")), &table);
        assert_ne!(push.detail, "no info");

        let unknown = resolve(&ResolutionKey::Catalog("nothing.here".to_string()), &table);
        assert_eq!(unknown.detail, "no info");
        assert_eq!(unknown.documentation, "");

        let stale = resolve(&ResolutionKey::Symbol(VARIABLE_HINT.to_string(), SymbolId(9)), &table);
        assert_eq!(stale.detail, catalog::hint(VARIABLE_HINT).map(|h| h.detail).unwrap_or_default());
    }

    #[test]
    fn resolution_keys_serialize_compactly() {
        let symbol = ResolutionKey::Symbol(VARIABLE_HINT.to_string(), SymbolId(3));
        assert_eq!(serde_json::to_value(&symbol).ok(), Some(json!(["varNameIntellisense", 3])));
        assert_eq!(
            serde_json::from_value::<ResolutionKey>(json!(["varNameIntellisense", 3])).ok(),
            Some(symbol)
        );
        assert_eq!(
            serde_json::to_value(ResolutionKey::Catalog("if".to_string())).ok(),
            Some(json!("if"))
        );

        let candidate = Candidate {
            label: "go".to_string(),
            kind: CandidateKind::Function,
            resolution_key: ResolutionKey::Catalog("funNameIntellisense".to_string()),
            insert_text: None,
        };
        assert_eq!(
            serde_json::to_value(&candidate).ok(),
            Some(json!({"label": "go", "kind": "function", "resolutionKey": "funNameIntellisense"}))
        );
    }
}
