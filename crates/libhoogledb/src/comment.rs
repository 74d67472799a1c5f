//! Hoogle comment formatting and the hard-newline placeholder.
//!
//! Rendered text carries hard line breaks as [`NEWLINE_PLACEHOLDER`] so that markup
//! serialization cannot fold them into ordinary whitespace. Every write path swaps the
//! placeholder for a real newline with [`substitute_placeholder`] just before emission.

/// Token standing in for a hard line break until the text is emitted.
pub const NEWLINE_PLACEHOLDER: &str = "$newline$";

/// Prefix of the first line of a doc comment.
const DOC_OPENER: &str = "-- | ";

/// Prefix of every following line of a doc comment.
const DOC_CONTINUATION: &str = "--  ";

/// Turn rendered text into a Hoogle doc comment block.
///
/// The text is trimmed first; empty input yields an empty string so callers can skip it.
pub fn to_doc_comment(text: &str) -> String {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return String::new();
    }
    let body = trimmed
        .split('\n')
        .collect::<Vec<_>>()
        .join(&format!("\n{DOC_CONTINUATION}"));
    format!("{DOC_OPENER}{body}")
}

/// Replace every newline placeholder with a real newline.
pub fn substitute_placeholder(text: &str) -> String {
    text.replace(NEWLINE_PLACEHOLDER, "\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn empty_text_has_no_comment() {
        assert_eq!(to_doc_comment(""), "");
        assert_eq!(to_doc_comment(" \n\t "), "");
    }

    #[test]
    fn single_line() {
        assert_eq!(to_doc_comment("  Maps a function. "), "-- | Maps a function.");
    }

    #[test]
    fn continuation_lines() {
        assert_eq!(
            to_doc_comment("\nFirst line\nsecond line\n\nlast\n"),
            "-- | First line\n--  second line\n--  \n--  last"
        );
    }

    #[test]
    fn placeholder_becomes_newline() {
        assert_eq!(substitute_placeholder("a$newline$b$newline$"), "a\nb\n");
        assert_eq!(substitute_placeholder("no tokens"), "no tokens");
    }

    #[test]
    fn substitution_is_idempotent() {
        for input in ["", "x$newline$y", "$newline$$newline$", "$new line$", "$$newline$$"] {
            let once = substitute_placeholder(input);
            assert_eq!(substitute_placeholder(&once), once);
        }
    }

    #[test]
    fn substituted_text_formats_as_comment() {
        let text = substitute_placeholder("\nUse like:$newline$f x");
        assert_eq!(to_doc_comment(&text), "-- | Use like:\n--  f x");
    }
}
