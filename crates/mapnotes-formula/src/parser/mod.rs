//! # Parser - Event-Based Tree Construction
//!
//! Turns the token stream of one formula into a syntax tree using the
//! **event-based** architecture from rust-analyzer.
//!
//! The parser emits a flat list of [`Event`]s instead of building nodes
//! directly; the [`Sink`] replays them into a Rowan green tree. This keeps
//! grammar code free of tree plumbing and lets binary expressions wrap an
//! already-parsed left operand through [`CompletedMarker::precede`].
//!
//! ## The Marker System
//!
//! `parser.start()` returns a [`Marker`] that **must** be completed or
//! abandoned. Dropping it otherwise panics, which catches grammar bugs long
//! before they corrupt a tree.
//!
//! ```ignore
//! let m = p.start();
//! p.bump();                             // NUMBER
//! m.complete(p, SyntaxKind::LITERAL);
//! ```
//!
//! ## Trivia
//!
//! Whitespace is invisible to the grammar: `current()`/`nth()` only look at
//! significant tokens, and the sink puts the whitespace back.
//!
//! ## Errors
//!
//! Parsing never fails. Unexpected input is wrapped in `ERROR` nodes and a
//! [`SyntaxError`] is recorded; the tree text always equals the source.

pub mod event;
pub mod sink;

mod grammar;

use std::fmt;

use rowan::GreenNode;

use crate::ast::Expr;
use crate::lexer::{Token, lex};
use crate::syntax_kind::{SyntaxKind, SyntaxNode};
use event::Event;
use sink::Sink;

/// A problem found while parsing, positioned at a byte offset of the
/// formula source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyntaxError {
    pub message: String,
    pub offset: usize,
}

impl fmt::Display for SyntaxError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} at offset {}", self.message, self.offset)
    }
}

/// Result of parsing one formula: the lossless tree plus any errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Parse {
    green: GreenNode,
    errors: Vec<SyntaxError>,
}

impl Parse {
    /// Root `SyntaxNode` of the formula.
    pub fn syntax(&self) -> SyntaxNode {
        SyntaxNode::new_root(self.green.clone())
    }

    /// The top-level expression, if the formula has one.
    pub fn expr(&self) -> Option<Expr> {
        self.syntax().children().find_map(Expr::cast)
    }

    pub fn errors(&self) -> &[SyntaxError] {
        &self.errors
    }

    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }
}

/// The parser state machine.
///
/// Grammar functions receive `&mut Parser` and use its methods to:
///
/// - Inspect tokens: `current()`, `nth()`, `at()`, `at_end()`
/// - Consume tokens: `bump()`, `eat()`, `expect()`
/// - Build structure: `start()` → `Marker` → `complete()`/`abandon()`
/// - Report problems: `error()`, `err_and_bump()`
pub struct Parser<'t, 'input> {
    tokens: &'t [Token<'input>],
    /// Indices into `tokens` of every non-trivia token
    significant: Vec<usize>,
    pos: usize,
    events: Vec<Event>,
    errors: Vec<SyntaxError>,
}

impl<'t, 'input> Parser<'t, 'input> {
    /// Create a new parser from the full token list.
    pub fn new(tokens: &'t [Token<'input>]) -> Self {
        let significant = tokens
            .iter()
            .enumerate()
            .filter(|(_, t)| !t.kind.is_trivia())
            .map(|(i, _)| i)
            .collect();

        Self {
            tokens,
            significant,
            pos: 0,
            events: Vec::new(),
            errors: Vec::new(),
        }
    }

    /// Parse the tokens into a green tree plus errors.
    pub fn parse(mut self) -> Parse {
        grammar::root(&mut self);
        let sink = Sink::new(self.tokens, self.events);
        Parse {
            green: sink.finish(),
            errors: self.errors,
        }
    }

    /// Start a new node and return a marker.
    pub fn start(&mut self) -> Marker {
        let pos = self.events.len();
        self.events.push(Event::Placeholder);
        Marker {
            pos,
            completed: false,
        }
    }

    /// Current token kind, or EOF if past end.
    pub fn current(&self) -> SyntaxKind {
        self.nth(0)
    }

    /// Look ahead n significant tokens.
    pub fn nth(&self, n: usize) -> SyntaxKind {
        self.significant
            .get(self.pos + n)
            .map(|&i| self.tokens[i].kind)
            .unwrap_or(SyntaxKind::EOF)
    }

    /// Check if at end of input.
    pub fn at_end(&self) -> bool {
        self.pos >= self.significant.len()
    }

    /// Check if current token is of given kind.
    pub fn at(&self, kind: SyntaxKind) -> bool {
        self.current() == kind
    }

    /// Consume the current token if it matches.
    pub fn eat(&mut self, kind: SyntaxKind) -> bool {
        if self.at(kind) {
            self.bump();
            true
        } else {
            false
        }
    }

    /// Consume the current token if it matches, recording an error otherwise.
    pub fn expect(&mut self, kind: SyntaxKind, what: &str) -> bool {
        if self.eat(kind) {
            return true;
        }
        self.error(format!("expected {what}"));
        false
    }

    /// Consume the current token unconditionally.
    pub fn bump(&mut self) {
        if !self.at_end() {
            let kind = self.current();
            self.events.push(Event::token(kind));
            self.pos += 1;
        }
    }

    /// Text of the current token.
    pub fn current_text(&self) -> &'input str {
        self.significant
            .get(self.pos)
            .map(|&i| self.tokens[i].text)
            .unwrap_or("")
    }

    /// Byte offset of the current token, or the end of the source at EOF.
    pub fn current_offset(&self) -> usize {
        match self.significant.get(self.pos) {
            Some(&i) => self.tokens[i].offset,
            None => self
                .tokens
                .last()
                .map(|t| t.offset + t.text.len())
                .unwrap_or(0),
        }
    }

    /// Record an error at the current token without consuming anything.
    pub fn error(&mut self, message: impl Into<String>) {
        let offset = self.current_offset();
        self.errors.push(SyntaxError {
            message: message.into(),
            offset,
        });
    }

    /// Record an error and wrap the current token in an ERROR node.
    pub fn err_and_bump(&mut self, message: impl Into<String>) {
        self.error(message);
        if self.at_end() {
            return;
        }
        let m = self.start();
        self.bump();
        m.complete(self, SyntaxKind::ERROR);
    }
}

/// A marker for a node being constructed.
///
/// Pushes a `Placeholder` event when created. It must then be:
///
/// - **Completed** via `marker.complete(parser, KIND)`, turning the
///   placeholder into `Start { kind, .. }` and pushing `Finish`
/// - **Abandoned** via `marker.abandon(parser)`, dropping the placeholder
///
/// Dropping a marker without either panics.
#[must_use = "Markers must be completed or abandoned, dropping them is a bug"]
pub struct Marker {
    /// Position in the events vector where our Placeholder lives
    pos: usize,
    /// Tracks whether complete() or abandon() was called
    completed: bool,
}

impl Marker {
    /// Complete this marker, creating a node of the given kind.
    pub fn complete(mut self, p: &mut Parser<'_, '_>, kind: SyntaxKind) -> CompletedMarker {
        self.completed = true;
        let event_at_pos = &mut p.events[self.pos];
        assert!(matches!(event_at_pos, Event::Placeholder));
        *event_at_pos = Event::Start {
            kind,
            forward_parent: None,
        };
        p.events.push(Event::Finish);
        CompletedMarker { pos: self.pos }
    }

    /// Abandon this marker without creating a node.
    ///
    /// The placeholder is only removed when it is still the last event;
    /// otherwise it stays inert and the sink skips it.
    pub fn abandon(mut self, p: &mut Parser<'_, '_>) {
        self.completed = true;
        if self.pos == p.events.len() - 1 {
            match p.events.pop() {
                Some(Event::Placeholder) => {}
                _ => unreachable!(),
            }
        }
    }
}

impl Drop for Marker {
    fn drop(&mut self) {
        if !self.completed && !std::thread::panicking() {
            panic!("Marker must be either completed or abandoned");
        }
    }
}

/// A marker for a node that has been completed.
///
/// `precede()` opens a new node *before* this one, which is how a binary
/// expression adopts the operand that was parsed before its operator:
///
/// ```ignore
/// let lhs = atom(p);              // "1"
/// let m = lhs.precede(p);         // BIN_EXPR will start before "1"
/// p.bump();                       // "+"
/// atom(p);                        // "2"
/// m.complete(p, SyntaxKind::BIN_EXPR);
/// ```
#[derive(Debug, Clone, Copy)]
pub struct CompletedMarker {
    /// Position of the Start event for this completed node
    pos: usize,
}

impl CompletedMarker {
    /// Create a new parent node that will contain this node.
    pub fn precede(self, p: &mut Parser<'_, '_>) -> Marker {
        let new_pos = p.events.len();
        p.events.push(Event::Placeholder);

        if let Event::Start { forward_parent, .. } = &mut p.events[self.pos] {
            *forward_parent = Some(new_pos);
        }

        Marker {
            pos: new_pos,
            completed: false,
        }
    }
}

/// Parse formula source into a syntax tree.
pub fn parse(source: &str) -> Parse {
    let tokens = lex(source);
    let parser = Parser::new(&tokens);
    parser.parse()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn parse_empty_input() {
        let parse = parse("");
        assert_eq!(parse.syntax().kind(), SyntaxKind::ROOT);
        assert!(parse.expr().is_none());
        assert_eq!(parse.errors().len(), 1);
        assert_eq!(parse.errors()[0].message, "expected an expression");
    }

    #[test]
    fn parse_preserves_all_text() {
        let input = "  lookup( 'a' ) +\t1 ";
        assert_eq!(parse(input).syntax().text(), input);
    }

    #[test]
    fn error_offsets_point_at_offending_token() {
        let parse = parse("1 + )");
        assert!(parse.has_errors());
        assert_eq!(parse.errors()[0].offset, 4);
    }

    #[test]
    fn marker_must_be_completed() {
        let result = std::panic::catch_unwind(|| {
            let tokens = lex("1");
            let mut parser = Parser::new(&tokens);
            let _marker = parser.start();
        });
        assert!(result.is_err());
    }

    #[test]
    fn marker_can_be_abandoned() {
        let tokens = lex("1");
        let mut parser = Parser::new(&tokens);
        let marker = parser.start();
        marker.abandon(&mut parser);
    }

    #[test]
    fn whitespace_is_invisible_to_lookahead() {
        let tokens = lex("a   (");
        let parser = Parser::new(&tokens);
        assert_eq!(parser.current(), SyntaxKind::IDENT);
        assert_eq!(parser.nth(1), SyntaxKind::L_PAREN);
        assert_eq!(parser.nth(2), SyntaxKind::EOF);
    }
}
