//! # Parser Events
//!
//! The parser never touches Rowan directly. It emits a flat sequence of
//! events and the [`Sink`](super::sink::Sink) turns them into a tree:
//!
//! ```text
//! 1 + 2
//!
//! Start(BIN_EXPR)      ← opened later via precede(), see forward_parent
//! Start(LITERAL)
//!   Token(NUMBER)
//! Finish
//! Token(PLUS)
//! Start(LITERAL)
//!   Token(NUMBER)
//! Finish
//! Finish
//! ```
//!
//! Binary expressions only become recognisable after their left operand is
//! parsed. Rather than rewriting the event list, the operand's `Start` gets a
//! `forward_parent` link to the wrapping node, and the sink opens the chain
//! outermost-first.

use crate::syntax_kind::SyntaxKind;

/// An event emitted by the parser during tree construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    /// Begin a new composite node, optionally wrapped by the node whose
    /// `Start` lives at `forward_parent`.
    Start {
        kind: SyntaxKind,
        forward_parent: Option<usize>,
    },

    /// Attach the next `n_raw_tokens` significant tokens to the current node.
    /// Trivia in front of them is attached by the sink automatically.
    Token { kind: SyntaxKind, n_raw_tokens: u8 },

    /// Close the current node.
    Finish,

    /// Reserved slot from `Parser::start`, ignored unless completed.
    Placeholder,
}

impl Event {
    /// Create a start event with no forward parent.
    pub fn start(kind: SyntaxKind) -> Self {
        Event::Start {
            kind,
            forward_parent: None,
        }
    }

    /// Create a token event for a single raw token.
    pub fn token(kind: SyntaxKind) -> Self {
        Event::Token {
            kind,
            n_raw_tokens: 1,
        }
    }
}
