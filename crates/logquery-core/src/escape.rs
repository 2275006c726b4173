use regex::Regex;
use std::sync::LazyLock;

use logquery_types::Term;

/// Operators and metacharacters of the query syntax: && || : \ / + - ! ( ) { } [ ] ^ " ~ * ? $
static SPECIAL_CHARS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"&&|\|\||[:\\/+\-!(){}\[\]^"~*?$]"#).expect("special character pattern is valid")
});

/// Characters that still need escaping inside a quoted phrase
static PHRASE_CHARS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"["\\]"#).expect("phrase character pattern is valid"));

/// Check whether a term spans several words and must be quoted
pub fn is_phrase(term: impl Into<Term>) -> bool {
    term.into().to_string().contains(' ')
}

/// Escape a term so it is read as a literal value inside a query
///
/// Line breaks collapse to spaces first. A term containing a space becomes a
/// quoted phrase with only `"` and `\` escaped; any other term keeps its
/// shape and has every metacharacter backslash-escaped.
pub fn escape(term: impl Into<Term>) -> String {
    let normalized = term
        .into()
        .to_string()
        .replace("\r\n", " ")
        .replace('\n', " ")
        .replace("<br>", " ");

    if is_phrase(normalized.as_str()) {
        let inner = PHRASE_CHARS.replace_all(&normalized, r"\${0}");
        format!("\"{}\"", inner)
    } else {
        SPECIAL_CHARS
            .replace_all(&normalized, r"\${0}")
            .into_owned()
    }
}
