//! Expression grammar.
//!
//! Binary operators use precedence climbing: each operator has a left and a
//! right binding power, and a left-associative operator binds slightly
//! tighter on its right. The conditional operator sits below all of them.
//!
//! | Operators | Binding power |
//! |-----------|---------------|
//! | `\|\|` | 1, 2 |
//! | `&&` | 3, 4 |
//! | `==` `!=` | 5, 6 |
//! | `<` `<=` `>` `>=` | 7, 8 |
//! | `+` `-` | 9, 10 |
//! | `*` `/` `%` | 11, 12 |
//! | prefix `-` `+` `!` | 13 |

use crate::parser::{CompletedMarker, Parser};
use crate::syntax_kind::SyntaxKind;

const PREFIX_BP: u8 = 13;

/// Parse a full expression including the conditional operator.
pub(super) fn expr(p: &mut Parser<'_, '_>) -> Option<CompletedMarker> {
    let condition = expr_bp(p, 1)?;
    if !p.at(SyntaxKind::QUESTION) {
        return Some(condition);
    }

    let m = condition.precede(p);
    p.bump(); // ?
    expr(p);
    p.expect(SyntaxKind::COLON, "`:`");
    expr(p);
    Some(m.complete(p, SyntaxKind::CONDITIONAL_EXPR))
}

fn expr_bp(p: &mut Parser<'_, '_>, min_bp: u8) -> Option<CompletedMarker> {
    let mut lhs = lhs(p)?;

    loop {
        let Some((left_bp, right_bp)) = infix_binding_power(p.current()) else {
            break;
        };
        if left_bp < min_bp {
            break;
        }

        let m = lhs.precede(p);
        p.bump(); // operator
        expr_bp(p, right_bp);
        lhs = m.complete(p, SyntaxKind::BIN_EXPR);
    }

    Some(lhs)
}

fn infix_binding_power(kind: SyntaxKind) -> Option<(u8, u8)> {
    let bp = match kind {
        SyntaxKind::PIPE2 => (1, 2),
        SyntaxKind::AMP2 => (3, 4),
        SyntaxKind::EQ2 | SyntaxKind::NEQ => (5, 6),
        SyntaxKind::LT | SyntaxKind::LTE | SyntaxKind::GT | SyntaxKind::GTE => (7, 8),
        SyntaxKind::PLUS | SyntaxKind::MINUS => (9, 10),
        SyntaxKind::STAR | SyntaxKind::SLASH | SyntaxKind::PERCENT => (11, 12),
        _ => return None,
    };
    Some(bp)
}

fn lhs(p: &mut Parser<'_, '_>) -> Option<CompletedMarker> {
    match p.current() {
        SyntaxKind::MINUS | SyntaxKind::PLUS | SyntaxKind::BANG => {
            let m = p.start();
            p.bump();
            expr_bp(p, PREFIX_BP);
            Some(m.complete(p, SyntaxKind::PREFIX_EXPR))
        }
        kind if kind.is_literal() => {
            let m = p.start();
            p.bump();
            Some(m.complete(p, SyntaxKind::LITERAL))
        }
        SyntaxKind::IDENT => {
            if p.nth(1) == SyntaxKind::L_PAREN {
                Some(call(p))
            } else {
                let m = p.start();
                p.bump();
                Some(m.complete(p, SyntaxKind::NAME_REF))
            }
        }
        SyntaxKind::L_PAREN => Some(paren(p)),
        SyntaxKind::R_PAREN | SyntaxKind::COMMA | SyntaxKind::COLON | SyntaxKind::EOF => {
            // Leave closing tokens for the enclosing rule
            p.error("expected an expression");
            None
        }
        _ => {
            p.err_and_bump("expected an expression");
            None
        }
    }
}

/// `name(arg, ...)`
fn call(p: &mut Parser<'_, '_>) -> CompletedMarker {
    let m = p.start();
    p.bump(); // name

    let args = p.start();
    p.bump(); // (
    if !p.at(SyntaxKind::R_PAREN) {
        loop {
            expr(p);
            if !p.eat(SyntaxKind::COMMA) {
                break;
            }
        }
    }
    p.expect(SyntaxKind::R_PAREN, "`)`");
    args.complete(p, SyntaxKind::ARG_LIST);

    m.complete(p, SyntaxKind::CALL_EXPR)
}

fn paren(p: &mut Parser<'_, '_>) -> CompletedMarker {
    let m = p.start();
    p.bump(); // (
    expr(p);
    p.expect(SyntaxKind::R_PAREN, "`)`");
    m.complete(p, SyntaxKind::PAREN_EXPR)
}
