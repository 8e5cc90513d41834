use macrorify_core::{validate, AnalysisSession};
use macrorify_lsp::convert::{diagnostics_to_lsp, DIAGNOSTIC_SOURCE};
use tower_lsp::lsp_types::{DiagnosticSeverity, Position, Range};

#[test]
fn test_condition_assignment_position() {
    let code = "var i = 1;\nif (i = 0) {\n}";
    let diagnostics = diagnostics_to_lsp(&validate(code), 1000);

    assert_eq!(diagnostics.len(), 1);
    let diagnostic = &diagnostics[0];
    assert_eq!(diagnostic.severity, Some(DiagnosticSeverity::ERROR));
    assert_eq!(diagnostic.source.as_deref(), Some(DIAGNOSTIC_SOURCE));
    assert_eq!(diagnostic.message, "'=' or '!' excepted.");
    assert_eq!(diagnostic.range, Range::new(Position::new(1, 6), Position::new(1, 7)));
}

#[test]
fn test_columns_count_utf16_units() {
    // The emoji is two UTF-16 units, so `&&` starts at column 16.
    let code = "var s = \"😀\"; s && s;";
    let diagnostics = diagnostics_to_lsp(&validate(code), 1000);

    let and = diagnostics
        .iter()
        .find(|d| d.message == "Use 'and' instead")
        .expect("expected an '&&' diagnostic");
    assert_eq!(and.range, Range::new(Position::new(0, 16), Position::new(0, 18)));
}

#[test]
fn test_warnings_and_errors_are_distinguished() {
    let code = "var a = 1\nwhile (true) {\n}\n";
    let diagnostics = diagnostics_to_lsp(&validate(code), 1000);

    let severities: Vec<_> = diagnostics.iter().map(|d| d.severity).collect();
    assert_eq!(
        severities,
        vec![Some(DiagnosticSeverity::WARNING), Some(DiagnosticSeverity::ERROR)]
    );
}

#[test]
fn test_published_diagnostics_are_capped() {
    let code = "var a = 1\n".repeat(20);
    let session = AnalysisSession::new(code);
    assert_eq!(session.diagnostics().len(), 20);

    let capped = diagnostics_to_lsp(session.diagnostics(), 5);
    assert_eq!(capped.len(), 5);
    assert_eq!(capped[4].range.start.line, 4);
}

#[test]
fn test_malformed_lines_never_stop_the_scan() {
    let code = "for (((;\nif )( {\nvar = = ;\n}}}}\nfun (\nvar ok = 1\n";
    let diagnostics = validate(code);
    assert!(diagnostics.iter().any(|d| d.range.start.line == 5));
}
