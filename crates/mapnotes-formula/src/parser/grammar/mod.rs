//! # Grammar Rules
//!
//! Grammar functions take a `&mut Parser` and:
//!
//! 1. Inspect the current token (`p.current()`, `p.at()`, `p.nth()`)
//! 2. Consume tokens (`p.bump()`, `p.eat()`, `p.expect()`)
//! 3. Build tree structure (`p.start()` → marker → `complete()`/`abandon()`)
//!
//! ## Module Structure
//!
//! - [`expr`] - Expressions: literals, names, calls, operators
//!
//! ## Error Recovery
//!
//! Grammar functions never bail out. Unexpected tokens are wrapped in ERROR
//! nodes (or left for an enclosing rule to consume) and an error is
//! recorded, so every input produces a tree holding all of its bytes.

mod expr;

use crate::parser::Parser;
use crate::syntax_kind::SyntaxKind;

/// Parse the root of a formula: exactly one expression.
pub fn root(p: &mut Parser<'_, '_>) {
    let m = p.start();

    expr::expr(p);

    if !p.at_end() {
        p.error(format!("unexpected `{}`", p.current_text()));
        let junk = p.start();
        while !p.at_end() {
            p.bump();
        }
        junk.complete(p, SyntaxKind::ERROR);
    }

    m.complete(p, SyntaxKind::ROOT);
}
