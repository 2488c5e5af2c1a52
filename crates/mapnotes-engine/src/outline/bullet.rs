//! Splitting one bullet line into key, value and `{...}` expressions.

use std::sync::OnceLock;

use regex::Regex;

use super::node::Expression;

/// Earliest colon that appears before any `{`.
static KEY_REGEX: OnceLock<Regex> = OnceLock::new();
/// `{...}` with the first `}` terminating the span.
static EXPRESSION_REGEX: OnceLock<Regex> = OnceLock::new();

fn key_regex() -> &'static Regex {
    KEY_REGEX.get_or_init(|| Regex::new(r"^([^{]*?):").expect("Invalid key regex"))
}

fn expression_regex() -> &'static Regex {
    EXPRESSION_REGEX
        .get_or_init(|| Regex::new(r"\{(?P<source>[^}]+)\}").expect("Invalid expression regex"))
}

/// The parts of one bullet line.
#[derive(Debug, Clone, PartialEq)]
pub struct Bullet {
    pub key: Option<String>,
    pub value: String,
    pub expressions: Vec<Expression>,
}

/// Parse the text of a bullet (marker already stripped) that starts at
/// `offset` in the document.
pub fn parse_bullet(text: &str, offset: usize) -> Bullet {
    let expressions = scan_expressions(text, offset);

    match key_regex().captures(text).and_then(|c| c.get(1)) {
        Some(key) => Bullet {
            key: Some(key.as_str().trim().to_string()),
            value: text[key.end() + 1..].trim().to_string(),
            expressions,
        },
        None => Bullet {
            key: None,
            value: text.to_string(),
            expressions,
        },
    }
}

/// Find every `{...}` span in `text`, with offsets shifted by `offset`.
pub fn scan_expressions(text: &str, offset: usize) -> Vec<Expression> {
    expression_regex()
        .captures_iter(text)
        .filter_map(|captures| {
            let whole = captures.get(0)?;
            let source = captures.name("source")?;
            Some(Expression::new(
                offset + whole.start(),
                offset + whole.end(),
                source.as_str(),
            ))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    #[rstest]
    #[case("age: 10", Some("age"), "10")]
    #[case("  name :  Bob  ", Some("name"), "Bob")]
    #[case("no key here", None, "no key here")]
    #[case("total {lookup('a:b')}", None, "total {lookup('a:b')}")]
    #[case("time: 10:30", Some("time"), "10:30")]
    #[case("empty:", Some("empty"), "")]
    #[case("", None, "")]
    fn splits_key_and_value(
        #[case] text: &str,
        #[case] key: Option<&str>,
        #[case] value: &str,
    ) {
        let bullet = parse_bullet(text, 0);
        assert_eq!(bullet.key.as_deref(), key);
        assert_eq!(bullet.value, value);
    }

    #[test]
    fn expressions_get_absolute_offsets() {
        let bullet = parse_bullet("sum: {1 + 2} and {map}", 100);
        let spans: Vec<_> = bullet
            .expressions
            .iter()
            .map(|e| (e.from, e.to, e.source.as_str()))
            .collect();
        assert_eq!(spans, vec![(105, 112, "1 + 2"), (117, 122, "map")]);
        assert!(bullet.expressions[1].is_map_widget());
    }

    #[test]
    fn first_closing_brace_terminates() {
        let exprs = scan_expressions("{a{b}c}", 0);
        assert_eq!(exprs.len(), 1);
        assert_eq!(exprs[0].source, "a{b");
        assert_eq!((exprs[0].from, exprs[0].to), (0, 5));
    }

    #[test]
    fn empty_braces_are_not_expressions() {
        assert!(scan_expressions("{} text", 0).is_empty());
    }

    #[test]
    fn expressions_start_unevaluated() {
        let exprs = scan_expressions("{x}", 3);
        assert_eq!(exprs[0].value, None);
        assert!(!exprs[0].failed);
    }
}
