//! # mapnotes-formula
//!
//! A lossless syntax tree for the small formula language written between
//! `{` and `}` in outline bullets, using [Rowan] + [Logos] in the
//! [rust-analyzer] style.
//!
//! [Rowan]: https://docs.rs/rowan
//! [Logos]: https://docs.rs/logos
//! [rust-analyzer]: https://rust-analyzer.github.io/book/contributing/syntax.html
//!
//! ## Architecture Overview
//!
//! ```text
//! Source Text → Lexer → Tokens → Parser → Events → Sink → Rowan Tree → AST
//!               (Logos)          (Grammar)        (GreenNodeBuilder)
//! ```
//!
//! ### 1. Lexer ([`lexer`] module)
//!
//! Every byte becomes part of some token. Unrecognised characters become
//! `UNKNOWN` tokens rather than being dropped.
//!
//! ### 2. Parser ([`parser`] module)
//!
//! Emits events through the marker system. Binary operators are parsed by
//! precedence climbing and adopt their left operand via
//! [`parser::CompletedMarker::precede`].
//!
//! ### 3. Sink ([`parser::sink`] module)
//!
//! Replays events into a green tree and re-inserts whitespace.
//!
//! ### 4. AST ([`ast`] module)
//!
//! Typed wrappers over syntax nodes that the evaluator walks.
//!
//! ## Module Structure
//!
//! ```text
//! mapnotes-formula/
//! ├── lib.rs           # This file - public API and tree tests
//! ├── syntax_kind.rs   # SyntaxKind enum (tokens + nodes) and Rowan integration
//! ├── lexer.rs         # Logos-based tokenizer
//! ├── ast.rs           # Typed expression views
//! └── parser/
//!     ├── mod.rs       # Parser struct, Marker system, public parse() function
//!     ├── event.rs     # Event enum (Start, Token, Finish, Placeholder)
//!     ├── sink.rs      # Converts events to Rowan GreenNode
//!     └── grammar/
//!         ├── mod.rs   # Root rule
//!         └── expr.rs  # Expressions, calls, operators
//! ```
//!
//! ## Quick Start
//!
//! ```
//! use mapnotes_formula::{parse, SyntaxKind};
//! use mapnotes_formula::ast::Expr;
//!
//! let parse = parse("lookup('age') + 1");
//! assert!(!parse.has_errors());
//! assert_eq!(parse.syntax().kind(), SyntaxKind::ROOT);
//! assert!(matches!(parse.expr(), Some(Expr::Binary(_))));
//! ```

pub mod ast;
pub mod lexer;
pub mod parser;
pub mod syntax_kind;

pub use parser::{Parse, SyntaxError, parse};
pub use syntax_kind::{FormulaLang, SyntaxElement, SyntaxKind, SyntaxNode, SyntaxToken};

#[cfg(test)]
mod tests {
    use super::*;
    use insta::assert_snapshot;

    /// Helper to format a syntax tree for snapshot testing.
    fn format_tree(node: &SyntaxNode, indent: usize) -> String {
        let mut result = String::new();
        let prefix = "  ".repeat(indent);

        result.push_str(&format!(
            "{}{:?}@{:?}\n",
            prefix,
            node.kind(),
            node.text_range()
        ));

        for child in node.children_with_tokens() {
            match child {
                rowan::NodeOrToken::Node(n) => {
                    result.push_str(&format_tree(&n, indent + 1));
                }
                rowan::NodeOrToken::Token(t) => {
                    result.push_str(&format!(
                        "{}  {:?}@{:?} {:?}\n",
                        prefix,
                        t.kind(),
                        t.text_range(),
                        t.text()
                    ));
                }
            }
        }

        result
    }

    #[test]
    fn snapshot_binary_expression() {
        let parse = parse("1 + 2");
        assert_snapshot!(format_tree(&parse.syntax(), 0), @r#"
        ROOT@0..5
          BIN_EXPR@0..5
            LITERAL@0..1
              NUMBER@0..1 "1"
            WHITESPACE@1..2 " "
            PLUS@2..3 "+"
            WHITESPACE@3..4 " "
            LITERAL@4..5
              NUMBER@4..5 "2"
        "#);
    }

    #[test]
    fn snapshot_call() {
        let parse = parse("f(x)");
        assert_snapshot!(format_tree(&parse.syntax(), 0), @r#"
        ROOT@0..4
          CALL_EXPR@0..4
            IDENT@0..1 "f"
            ARG_LIST@1..4
              L_PAREN@1..2 "("
              NAME_REF@2..3
                IDENT@2..3 "x"
              R_PAREN@3..4 ")"
        "#);
    }

    // Formulas are typed live, so half-finished input must still give a
    // tree that covers every byte.

    #[test]
    fn roundtrip_preserves_text() {
        let inputs = [
            "1 + 2",
            "  lookup('a.b') ",
            "sum(1, 2",
            "a ? b",
            "(((",
            "1 +* 2",
            "'unterminated",
            "x >= 3 && !y || z",
            "@#~",
        ];

        for input in inputs {
            let parse = parse(input);
            assert_eq!(
                parse.syntax().text().to_string(),
                input,
                "Roundtrip failed for: {:?}",
                input
            );
        }
    }

    #[test]
    fn broken_input_reports_errors() {
        for input in ["", "1 +", "sum(1,", "a ? b", "(", ")", "#"] {
            assert!(parse(input).has_errors(), "no error for {input:?}");
        }
    }

    #[test]
    fn well_formed_input_has_no_errors() {
        for input in [
            "1",
            "lookup('age')",
            "round(lookup('trip.distance') / 3, 2)",
            "a == b ? 'same' : 'different'",
            "-(-1)",
        ] {
            let parse = parse(input);
            assert!(!parse.has_errors(), "{input:?}: {:?}", parse.errors());
        }
    }
}
