#[cfg(test)]
mod tests {
    use crate::resolver::{classify, resolve, rule_count, substitute, NoSymbols};
    use crate::types::TypeTag;

    fn lookup(name: &str) -> Option<TypeTag> {
        match name {
            "r" => Some(TypeTag::RegionValue),
            "m" => Some(TypeTag::Map),
            "unknown" => Some(TypeTag::Any),
            _ => None,
        }
    }

    #[test]
    fn every_shape_rule_compiles() {
        assert_eq!(rule_count(), 36);
    }

    #[test]
    fn literals() {
        assert_eq!(classify(r#""text""#), TypeTag::String);
        assert_eq!(classify("'text'"), TypeTag::String);
        assert_eq!(classify("[1, 2]"), TypeTag::Array);
        assert_eq!(classify("-5"), TypeTag::Number);
        assert_eq!(classify("3.14;"), TypeTag::Number);
        assert_eq!(classify("true"), TypeTag::Boolean);
        assert_eq!(classify("null"), TypeTag::Null);
        assert_eq!(classify("trueish"), TypeTag::Any);
    }

    #[test]
    fn chained_find_beats_bare_region() {
        assert_eq!(classify(r#"Region(0,0,10,10).find("x")"#), TypeTag::RegionMatch);
        assert_eq!(classify(r#"Region(0,0,10,10).findText("x")"#), TypeTag::RegionTextMatch);
        assert_eq!(classify("Region(0,0,10,10)"), TypeTag::RegionValue);
        assert_eq!(classify("Region"), TypeTag::Region);
    }

    #[test]
    fn builders() {
        assert_eq!(classify("MultiSwipe.builder()"), TypeTag::MultiSwipeBuilder);
        assert_eq!(classify("Setting.builder().add(\"a\")"), TypeTag::SettingBuilder);
        assert_eq!(classify("Setting.builder().build()"), TypeTag::SettingDialog);
        assert_eq!(classify("Template.image(\"a.png\")"), TypeTag::TemplateBuilder);
        assert_eq!(classify("Map()"), TypeTag::Map);
        assert_eq!(classify("Stopwatch()"), TypeTag::StopwatchValue);
    }

    #[test]
    fn canonical_text_classifies_back() {
        for tag in TypeTag::ALL {
            assert_eq!(classify(tag.canonical()), tag, "canonical of {tag:?}");
        }
    }

    #[test]
    fn unknown_fragments_are_any() {
        assert_eq!(classify("foo(1)"), TypeTag::Any);
        assert_eq!(classify(""), TypeTag::Any);
        assert_eq!(resolve("nobody.find()", &NoSymbols), TypeTag::Any);
    }

    #[test]
    fn symbols_are_substituted_per_segment() {
        assert_eq!(substitute(r#"r.find("x")"#, &lookup), r#"Region().find("x")"#);
        assert_eq!(resolve(r#"r.find("x")"#, &lookup), TypeTag::RegionMatch);
        assert_eq!(resolve("m", &lookup), TypeTag::Map);
        assert_eq!(resolve("r;", &lookup), TypeTag::RegionValue);
    }

    #[test]
    fn any_typed_symbols_are_not_substituted() {
        assert_eq!(substitute("unknown.x", &lookup), "unknown.x");
    }

    #[test]
    fn closures_work_as_lookups() {
        let only_s = |name: &str| (name == "s").then_some(TypeTag::String);
        assert_eq!(resolve("s", &only_s), TypeTag::String);
    }
}
