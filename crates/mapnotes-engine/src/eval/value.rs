use std::fmt;
use std::sync::OnceLock;

use regex::Regex;

/// Runtime value of a formula.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Undefined,
    Bool(bool),
    Number(f64),
    Str(String),
}

impl Value {
    pub fn truthy(&self) -> bool {
        match self {
            Value::Undefined => false,
            Value::Bool(b) => *b,
            Value::Number(n) => *n != 0.0 && !n.is_nan(),
            Value::Str(s) => !s.is_empty(),
        }
    }

    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Undefined => "undefined",
            Value::Bool(_) => "boolean",
            Value::Number(_) => "number",
            Value::Str(_) => "string",
        }
    }

    /// Numbers as-is, strings by their leading numeric prefix.
    pub fn to_number(&self) -> Option<f64> {
        match self {
            Value::Number(n) => Some(*n),
            Value::Str(s) => parse_float_prefix(s),
            Value::Undefined | Value::Bool(_) => None,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Undefined => f.write_str("undefined"),
            Value::Bool(b) => write!(f, "{b}"),
            Value::Number(n) => format_number(*n, f),
            Value::Str(s) => f.write_str(s),
        }
    }
}

fn format_number(n: f64, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    if n.is_nan() {
        f.write_str("NaN")
    } else if n.is_infinite() {
        f.write_str(if n > 0.0 { "Infinity" } else { "-Infinity" })
    } else if n == 0.0 {
        // Also covers -0
        f.write_str("0")
    } else {
        write!(f, "{n}")
    }
}

static FLOAT_PREFIX_REGEX: OnceLock<Regex> = OnceLock::new();

/// Parse the longest numeric prefix of `text`, so `"10 km"` gives `10`.
pub fn parse_float_prefix(text: &str) -> Option<f64> {
    let regex = FLOAT_PREFIX_REGEX.get_or_init(|| {
        Regex::new(r"^\s*([+-]?(?:\d+(?:\.\d*)?|\.\d+)(?:[eE][+-]?\d+)?)")
            .expect("Invalid float prefix regex")
    });
    let captures = regex.captures(text)?;
    captures.get(1)?.as_str().parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    #[rstest]
    #[case(Value::Number(3.0), "3")]
    #[case(Value::Number(-0.0), "0")]
    #[case(Value::Number(2.5), "2.5")]
    #[case(Value::Number(0.1 + 0.2), "0.30000000000000004")]
    #[case(Value::Number(f64::NAN), "NaN")]
    #[case(Value::Number(f64::NEG_INFINITY), "-Infinity")]
    #[case(Value::Bool(true), "true")]
    #[case(Value::Undefined, "undefined")]
    #[case(Value::Str("hi".into()), "hi")]
    fn display(#[case] value: Value, #[case] expected: &str) {
        assert_eq!(value.to_string(), expected);
    }

    #[rstest]
    #[case("10", Some(10.0))]
    #[case("  10 km", Some(10.0))]
    #[case("-1.5e2x", Some(-150.0))]
    #[case(".5", Some(0.5))]
    #[case("3.", Some(3.0))]
    #[case("km 10", None)]
    #[case("", None)]
    fn float_prefix(#[case] text: &str, #[case] expected: Option<f64>) {
        assert_eq!(parse_float_prefix(text), expected);
    }

    #[test]
    fn truthiness() {
        assert!(!Value::Undefined.truthy());
        assert!(!Value::Number(0.0).truthy());
        assert!(!Value::Number(f64::NAN).truthy());
        assert!(!Value::Str(String::new()).truthy());
        assert!(Value::Str("0".into()).truthy());
        assert!(Value::Number(-1.0).truthy());
    }
}
