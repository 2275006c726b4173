use logquery_types::{ConcatOptions, MATCH_ALL, MISSING_BUCKET_NAME, Operator, Term};

use crate::escape::escape;

/// Whitespace for blank and match-all checks: BOM counts, NEXT LINE (U+0085)
/// does not
fn is_query_whitespace(c: char) -> bool {
    c == '\u{FEFF}' || (c.is_whitespace() && c != '\u{85}')
}

fn trim_query(query: &str) -> &str {
    query.trim_matches(is_query_whitespace)
}

/// A query that restricts nothing: empty or the match-all wildcard
fn is_unrestricted(query: &str) -> bool {
    let trimmed = trim_query(query);
    trimmed.is_empty() || trimmed == MATCH_ALL
}

/// Add a term to an existing query with `AND`
pub fn add_to_query(old_query: &str, new_term: &str) -> String {
    add_to_query_with(old_query, new_term, Operator::And)
}

/// Add a term to an existing query with the given operator
///
/// An unrestricted side is the identity element: the other side is returned
/// unchanged, so no `* AND x` or dangling operator is produced.
pub fn add_to_query_with(old_query: &str, new_term: &str, operator: impl AsRef<str>) -> String {
    if is_unrestricted(old_query) {
        return new_term.to_string();
    }

    if is_unrestricted(new_term) {
        return old_query.to_string();
    }

    format!("{} {} {}", old_query, operator.as_ref(), new_term)
}

/// Join fragments into one query, skipping blank ones
pub fn concat_query_strings<S: AsRef<str>>(query_strings: &[S], options: &ConcatOptions) -> String {
    let non_empty: Vec<&str> = query_strings
        .iter()
        .map(|s| s.as_ref())
        .filter(|s| !trim_query(s).is_empty())
        .collect();

    // Brackets only disambiguate joins; a lone fragment stays as is
    let bracketed = options.with_brackets && non_empty.len() > 1;
    let separator = format!(" {} ", options.operator);

    non_empty
        .iter()
        .map(|s| {
            if bracketed {
                format!("({})", s)
            } else {
                s.to_string()
            }
        })
        .collect::<Vec<_>>()
        .join(&separator)
}

/// Build an exact-match predicate `field:value`
///
/// The missing bucket marker, raw or escaped, turns into an existence
/// negation. `value` is used verbatim; escape it first if needed.
pub fn predicate(field: &str, value: impl Into<Term>) -> String {
    let value = value.into();

    let is_missing = value
        .as_text()
        .is_some_and(|s| s == MISSING_BUCKET_NAME || s == escape(MISSING_BUCKET_NAME));

    if is_missing {
        format!("NOT _exists_:{}", field)
    } else {
        format!("{}:{}", field, value)
    }
}

/// Escape a value and build its predicate for `field`
pub fn field_query(field: &str, value: impl Into<Term>) -> String {
    predicate(field, escape(value))
}

/// Negate a query; negating an already negated query removes the negation
pub fn not(query: &str) -> String {
    // "NOT " + query starts with "NOT NOT " exactly when query starts with "NOT "
    match query.strip_prefix("NOT ") {
        Some(inner) => inner.to_string(),
        None => format!("NOT {}", query),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_to_match_all() {
        assert_eq!(add_to_query("*", "foo"), "foo");
        assert_eq!(add_to_query("  *  ", "foo"), "foo");
        assert_eq!(add_to_query("", "foo"), "foo");
        assert_eq!(add_to_query("   ", "foo"), "foo");
    }

    #[test]
    fn test_add_match_all_term() {
        assert_eq!(add_to_query("foo", "*"), "foo");
        assert_eq!(add_to_query("foo", ""), "foo");
        assert_eq!(add_to_query("foo", " * "), "foo");
    }

    #[test]
    fn test_add_keeps_operands_untrimmed() {
        assert_eq!(add_to_query(" *", "  bar "), "  bar ");
        assert_eq!(add_to_query("a ", "b"), "a  AND b");
    }

    #[test]
    fn test_trim_matches_browser_whitespace() {
        let options = ConcatOptions::default();
        assert_eq!(concat_query_strings(&["\u{FEFF}", "b"], &options), "b");
        assert_eq!(add_to_query("\u{FEFF}*\u{A0}", "b"), "b");
        assert_eq!(add_to_query("\u{85}*", "b"), "\u{85}* AND b");
        assert_eq!(add_to_query("a", "\u{85}"), "a AND \u{85}");
    }

    #[test]
    fn test_add_with_operator() {
        assert_eq!(add_to_query("a", "b"), "a AND b");
        assert_eq!(add_to_query_with("a", "b", "OR"), "a OR b");
        assert_eq!(add_to_query_with("a", "b", Operator::Not), "a NOT b");
        assert_eq!(add_to_query_with("*", "*", Operator::Or), "*");
    }

    #[test]
    fn test_concat_brackets_multiple() {
        let options = ConcatOptions::default();
        assert_eq!(concat_query_strings(&["a", "b"], &options), "(a) AND (b)");
        assert_eq!(
            concat_query_strings(&["a", "b OR c", "d"], &options),
            "(a) AND (b OR c) AND (d)"
        );
    }

    #[test]
    fn test_concat_single_and_blank() {
        let options = ConcatOptions::default();
        assert_eq!(concat_query_strings(&["a"], &options), "a");
        assert_eq!(concat_query_strings(&[" ", "b"], &options), "b");
        assert_eq!(concat_query_strings(&["", " ", "\t"], &options), "");
        assert_eq!(concat_query_strings::<&str>(&[], &options), "");
    }

    #[test]
    fn test_concat_options() {
        let options = ConcatOptions::default()
            .with_operator(Operator::Or)
            .without_brackets();
        assert_eq!(concat_query_strings(&["a", "", "b"], &options), "a OR b");

        let owned = vec!["x".to_string(), "y".to_string()];
        let options = ConcatOptions::default().with_operator("OR");
        assert_eq!(concat_query_strings(&owned, &options), "(x) OR (y)");
    }

    #[test]
    fn test_predicate() {
        assert_eq!(predicate("field", "x"), "field:x");
        assert_eq!(predicate("count", 42), "count:42");
        assert_eq!(predicate("field", MISSING_BUCKET_NAME), "NOT _exists_:field");
        assert_eq!(
            predicate("field", escape(MISSING_BUCKET_NAME)),
            "NOT _exists_:field"
        );
    }

    #[test]
    fn test_predicate_does_not_escape() {
        assert_eq!(predicate("path", "/var/log"), "path:/var/log");
    }

    #[test]
    fn test_field_query() {
        assert_eq!(field_query("path", "/var/log"), r"path:\/var\/log");
        assert_eq!(field_query("message", "disk full"), "message:\"disk full\"");
        assert_eq!(field_query("source", MISSING_BUCKET_NAME), "NOT _exists_:source");
    }

    #[test]
    fn test_not() {
        assert_eq!(not("field:x"), "NOT field:x");
        assert_eq!(not("NOT field:x"), "field:x");
        assert_eq!(not(&not("field:x")), "field:x");
    }

    #[test]
    fn test_not_only_collapses_at_start() {
        assert_eq!(not("a AND NOT b"), "NOT a AND NOT b");
        assert_eq!(not(" NOT a"), "NOT  NOT a");
        assert_eq!(not("NOTa"), "NOT NOTa");
    }
}
