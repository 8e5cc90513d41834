#[cfg(test)]
mod tests {
    use crate::source::{
        analysis_view, byte_offset_of_column, in_open_string, split_lines, utf16_column, Position, Range,
    };

    #[test]
    fn analysis_view_blanks_strings_and_drops_comments() {
        let view = analysis_view(r#"var s = "{ // }"; // trailing"#);
        assert_eq!(view, r#"var s = "      "; "#);
    }

    #[test]
    fn analysis_view_keeps_byte_offsets() {
        let raw = "var s = \"héllo\"; x";
        let view = analysis_view(raw);
        assert_eq!(view.len(), raw.len());
        assert_eq!(view.find('x'), raw.find('x'));
    }

    #[test]
    fn analysis_view_handles_escaped_quotes() {
        assert_eq!(analysis_view(r#"a = "x\"y"; b"#), r#"a = "    "; b"#);
    }

    #[test]
    fn split_lines_handles_crlf_and_trailing_newline() {
        let lines = split_lines("a;\r\nb;\n");
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0].raw, "a;");
        assert_eq!(lines[1].raw, "b;");
        assert_eq!(lines[1].offset, 4);
    }

    #[test]
    fn comment_and_blank_lines() {
        let lines = split_lines("  // note\n   \nx;");
        assert!(lines[0].is_comment());
        assert!(lines[1].is_blank());
        assert!(!lines[2].is_comment());
        assert_eq!(lines[2].indent(), 0);
    }

    #[test]
    fn columns_are_utf16() {
        let line = "var 😀 = 1;";
        let emoji_end = "var 😀".len();
        assert_eq!(utf16_column(line, emoji_end), 6);
        assert_eq!(byte_offset_of_column(line, 6), emoji_end);
        assert_eq!(byte_offset_of_column(line, 100), line.len());
    }

    #[test]
    fn line_range_uses_utf16_columns() {
        let lines = split_lines("x;\n\"é\" x;");
        let range = lines[1].range(5, 6);
        assert_eq!(range, Range::new(Position::new(1, 4), Position::new(1, 5)));
        assert_eq!(range.to_string(), "2:5-6");
    }

    #[test]
    fn open_string_detection() {
        assert!(in_open_string("Sys.alert(\"Map()."));
        assert!(in_open_string("x = 'abc"));
        assert!(!in_open_string("x = \"a\" + b."));
        assert!(!in_open_string("x = \"a\\\"b\"."));
    }
}
