use super::{trimmed_span, LineContext, LineRule, Reporter};

/// Statements should end with `;`. Lines ending a block (`}`) or opening
/// one (`{`) are exempt.
pub struct Termination;

impl LineRule for Termination {
    fn name(&self) -> &'static str {
        "termination"
    }

    fn check(&self, ctx: &LineContext<'_>, out: &mut Reporter<'_>) {
        let code = ctx.code();
        let trimmed = code.trim();
        if trimmed.is_empty() || trimmed.ends_with([';', '}', '{']) {
            return;
        }
        let (start, end) = trimmed_span(code);
        out.warning(start, end, "It's better to end strings with semicolon");
    }
}
