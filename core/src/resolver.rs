use once_cell::sync::Lazy;
use regex::Regex;

use crate::token::split_top_level;
use crate::types::TypeTag;

/// Anything that can answer "what is the current type of this name".
pub trait SymbolLookup {
    fn tag_of(&self, name: &str) -> Option<TypeTag>;
}

impl<F> SymbolLookup for F
where
    F: Fn(&str) -> Option<TypeTag>,
{
    fn tag_of(&self, name: &str) -> Option<TypeTag> {
        self(name)
    }
}

/// A lookup that knows no names.
pub struct NoSymbols;

impl SymbolLookup for NoSymbols {
    fn tag_of(&self, _name: &str) -> Option<TypeTag> {
        None
    }
}

enum Shape {
    /// The whole subject is exactly this namespace name.
    Root(&'static str),
    /// The whole subject matches an anchored pattern.
    Pattern(Regex),
}

impl Shape {
    fn matches(&self, subject: &str) -> bool {
        match self {
            Shape::Root(name) => subject == *name,
            Shape::Pattern(re) => re.is_match(subject),
        }
    }
}

struct Rule {
    shape: Shape,
    tag: TypeTag,
}

enum Src {
    Root(&'static str),
    Pattern(&'static str),
}

/// Ordered shape table. The first matching row wins, so chained-call shapes
/// must stay above the bare call shape of the same built-in.
const RULE_TABLE: &[(Src, TypeTag)] = &[
    (Src::Pattern(r#"^["'`]"#), TypeTag::String),
    (Src::Pattern(r"^\["), TypeTag::Array),
    (Src::Pattern(r"^-?\d"), TypeTag::Number),
    (Src::Pattern(r"^(true|false)$"), TypeTag::Boolean),
    (Src::Pattern(r"^null$"), TypeTag::Null),
    (Src::Root("Sys"), TypeTag::Sys),
    (Src::Pattern(r"^Map\s*(\(.*\))?$"), TypeTag::Map),
    (Src::Root("Math"), TypeTag::Math),
    (Src::Root("Point"), TypeTag::Point),
    (Src::Pattern(r"^Point\s*\(.*\)$"), TypeTag::PointValue),
    (Src::Pattern(r"^SwipePoint\s*\(.*\)$"), TypeTag::SwipePointValue),
    (Src::Root("MultiSwipe"), TypeTag::MultiSwipe),
    (
        Src::Pattern(r"^MultiSwipe\s*(\(.*\))?\.builder\s*\(.*\)$"),
        TypeTag::MultiSwipeBuilder,
    ),
    (Src::Root("Touch"), TypeTag::Touch),
    (
        Src::Pattern(r"^Region\s*\(.*\)\.(findText|findMultiText|findAllText|findAnyText)\s*\(.*\)$"),
        TypeTag::RegionTextMatch,
    ),
    (
        Src::Pattern(r"^Region\s*\(.*\)\.(find|findMulti|findAll|findAny)\s*\(.*\)$"),
        TypeTag::RegionMatch,
    ),
    (Src::Pattern(r"^Region\s*\(.*\)$"), TypeTag::RegionValue),
    (Src::Root("Region"), TypeTag::Region),
    (Src::Root("Template"), TypeTag::Template),
    (
        Src::Pattern(r"^Template\.(image|text|color|setDefaultScale)\s*\(.*\)$"),
        TypeTag::TemplateBuilder,
    ),
    (
        Src::Pattern(r"^Setting\.builder\s*\(.*\)\.build\s*\(.*\)$"),
        TypeTag::SettingDialog,
    ),
    (Src::Pattern(r"^Setting\.builder\s*\(.*\)$"), TypeTag::SettingBuilder),
    (Src::Root("Setting"), TypeTag::Setting),
    (Src::Pattern(r"^OnScreenText\s*\(.*\)$"), TypeTag::OnScreenTextValue),
    (Src::Root("OnScreenText"), TypeTag::OnScreenText),
    (Src::Pattern(r"^DateTime\s*\(.*\)$"), TypeTag::DateTimeValue),
    (Src::Root("DateTime"), TypeTag::DateTime),
    (Src::Pattern(r"^TimeSpan\s*\(.*\)$"), TypeTag::TimeSpanValue),
    (Src::Root("TimeSpan"), TypeTag::TimeSpan),
    (Src::Pattern(r"^Stopwatch\s*\(.*\)$"), TypeTag::StopwatchValue),
    (Src::Pattern(r"^Clipboard\s*\(.*\)$"), TypeTag::ClipboardValue),
    (Src::Pattern(r"^Overlay\s*\(.*\)$"), TypeTag::OverlayValue),
    (Src::Root("File"), TypeTag::File),
    (Src::Root("Cache"), TypeTag::Cache),
    (Src::Root("Env"), TypeTag::Env),
    (Src::Pattern(r"^Version\s*\(.*\)$"), TypeTag::VersionValue),
];

static RULES: Lazy<Vec<Rule>> = Lazy::new(|| {
    RULE_TABLE
        .iter()
        .filter_map(|(src, tag)| {
            let shape = match src {
                Src::Root(name) => Shape::Root(name),
                Src::Pattern(src) => match Regex::new(src) {
                    Ok(re) => Shape::Pattern(re),
                    Err(err) => {
                        tracing::error!("invalid shape pattern {src}: {err}");
                        return None;
                    }
                },
            };
            Some(Rule { shape, tag: *tag })
        })
        .collect()
});

/// Number of compiled shape rules; equals `RULE_TABLE.len()` when every
/// pattern compiled.
pub fn rule_count() -> usize {
    RULES.len()
}

/// Run the shape cascade over an already substituted subject.
pub fn classify(subject: &str) -> TypeTag {
    let subject = normalize(subject);
    RULES
        .iter()
        .find(|rule| rule.shape.matches(subject))
        .map(|rule| rule.tag)
        .unwrap_or(TypeTag::Any)
}

/// Infer the type of an expression fragment.
///
/// Every dot segment that names a known symbol is replaced by the canonical
/// text of that symbol's type first, so `r.find("x")` with `r: Region()`
/// classifies like `Region().find("x")`.
pub fn resolve(fragment: &str, symbols: &impl SymbolLookup) -> TypeTag {
    classify(&substitute(fragment, symbols))
}

/// Replace symbol references by the canonical text of their types.
pub fn substitute(fragment: &str, symbols: &impl SymbolLookup) -> String {
    let fragment = normalize(fragment);
    split_top_level(fragment, '.')
        .into_iter()
        .map(|(_, segment)| {
            let segment = segment.trim();
            match symbols.tag_of(segment) {
                Some(tag) if tag != TypeTag::Any => tag.canonical(),
                _ => segment,
            }
        })
        .collect::<Vec<_>>()
        .join(".")
}

fn normalize(fragment: &str) -> &str {
    fragment.trim().trim_end_matches(';').trim_end()
}
