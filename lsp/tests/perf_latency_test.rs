use std::time::{Duration, Instant};

use macrorify_core::{AnalysisSession, Position};

fn assert_under(label: &str, dur: Duration, max: Duration) {
    eprintln!("{} took: {:?} (limit: {:?})", label, dur, max);
    assert!(dur <= max, "{} exceeded budget: {:?} > {:?}", label, dur, max);
}

fn large_document() -> String {
    let mut doc = String::with_capacity(200_000);
    for i in 0..300 {
        doc.push_str("// refresh the region\n");
        doc.push_str(&format!("var r{i} = Region(0, 0, 10, 10);\n"));
        doc.push_str(&format!("if (r{i}.find(\"a.png\") != null) {{\n"));
        doc.push_str("  Sys.alert(\"found\");\n");
        doc.push_str("}\n");
    }
    doc
}

#[test]
fn test_session_build_large_document_latency() {
    let doc = large_document();

    let start = Instant::now();
    let session = AnalysisSession::new(doc);
    let elapsed = start.elapsed();

    assert_eq!(session.table().symbols().len(), 300);
    // Debug builds vary; keep threshold generous
    assert_under("session(large doc)", elapsed, Duration::from_millis(3000));
}

#[test]
fn test_completion_latency() {
    let doc = large_document();
    let session = AnalysisSession::new(doc.clone());
    let last_line = doc.lines().count() as u32;

    let start = Instant::now();
    let candidates = session.complete(&doc, Position::new(last_line, 0));
    let elapsed = start.elapsed();

    assert!(candidates.iter().any(|c| c.label == "r299"));
    assert_under("complete(large doc)", elapsed, Duration::from_millis(200));
}
