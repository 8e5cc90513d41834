use std::path::{Component, Path};

use anyhow::{bail, Context};
use macrorify_core::{AnalysisSession, Severity};

const USAGE: &str = "Usage: macrorify-lsp --analyze [--errors-only] <relative-file-path>
  --analyze <file>     : Full analysis with JSON output
  --errors-only        : Show only errors in simple format";

/// Handle `--analyze` when present in `args` (program name excluded).
/// `Ok(None)` means the server should start normally.
pub(crate) fn try_cli_analyze<I>(args: I) -> anyhow::Result<Option<String>>
where
    I: IntoIterator<Item = String>,
{
    let args: Vec<String> = args.into_iter().collect();
    if !args.iter().any(|a| a == "--analyze") {
        return Ok(None);
    }

    let errors_only = args.iter().any(|a| a == "--errors-only");
    let Some(path) = args.iter().find(|a| !a.starts_with("--")) else {
        bail!("{USAGE}");
    };
    let content = read_file_content(path)?;
    let session = AnalysisSession::new(content);
    render(&session, errors_only).map(Some)
}

pub(crate) fn render(session: &AnalysisSession, errors_only: bool) -> anyhow::Result<String> {
    if errors_only {
        let errors: Vec<String> = session
            .diagnostics()
            .iter()
            .filter(|d| d.severity == Severity::Error)
            .map(|d| format!("Line {}: {}", d.range.start, d.message))
            .collect();
        if errors.is_empty() {
            return Ok("No errors found".to_string());
        }
        return Ok(errors.join("\n"));
    }

    let table = session.table();
    let output = serde_json::json!({
        "diagnostics": session.diagnostics(),
        "symbols": table.symbols(),
        "functions": table.functions(),
        "classes": table.classes(),
    });
    serde_json::to_string_pretty(&output).context("Failed to encode analysis as JSON")
}

/// Relative paths only, without `..`, control characters or a drive prefix.
pub(crate) fn is_safe_path(path: &str) -> bool {
    if path.is_empty() || path.chars().any(|c| matches!(c, '\0' | '\n' | '\r' | '\t')) {
        return false;
    }
    if path.as_bytes().get(1) == Some(&b':') {
        return false;
    }
    let path = Path::new(path);
    !path.is_absolute() && !path.components().any(|c| c == Component::ParentDir)
}

pub(crate) fn read_file_content(path: &str) -> anyhow::Result<String> {
    if !is_safe_path(path) {
        bail!("Unsafe file path: {path}");
    }
    std::fs::read_to_string(path).with_context(|| format!("Failed to read file '{path}'"))
}
