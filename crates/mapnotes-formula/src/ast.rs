//! Typed views over the formula syntax tree.
//!
//! Each wrapper holds a `SyntaxNode` of one kind and exposes the pieces an
//! evaluator needs. Accessors return `Option` because trees built from
//! broken input may be missing any child.

use crate::syntax_kind::{SyntaxKind, SyntaxNode, SyntaxToken};

macro_rules! ast_node {
    ($name:ident, $kind:ident) => {
        #[derive(Debug, Clone, PartialEq, Eq, Hash)]
        pub struct $name(SyntaxNode);

        impl $name {
            pub fn cast(node: SyntaxNode) -> Option<Self> {
                (node.kind() == SyntaxKind::$kind).then(|| Self(node))
            }

            pub fn syntax(&self) -> &SyntaxNode {
                &self.0
            }
        }
    };
}

ast_node!(Literal, LITERAL);
ast_node!(NameRef, NAME_REF);
ast_node!(CallExpr, CALL_EXPR);
ast_node!(ParenExpr, PAREN_EXPR);
ast_node!(PrefixExpr, PREFIX_EXPR);
ast_node!(BinExpr, BIN_EXPR);
ast_node!(ConditionalExpr, CONDITIONAL_EXPR);

/// Any expression node.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Expr {
    Literal(Literal),
    NameRef(NameRef),
    Call(CallExpr),
    Paren(ParenExpr),
    Prefix(PrefixExpr),
    Binary(BinExpr),
    Conditional(ConditionalExpr),
}

impl Expr {
    pub fn cast(node: SyntaxNode) -> Option<Self> {
        let expr = match node.kind() {
            SyntaxKind::LITERAL => Expr::Literal(Literal(node)),
            SyntaxKind::NAME_REF => Expr::NameRef(NameRef(node)),
            SyntaxKind::CALL_EXPR => Expr::Call(CallExpr(node)),
            SyntaxKind::PAREN_EXPR => Expr::Paren(ParenExpr(node)),
            SyntaxKind::PREFIX_EXPR => Expr::Prefix(PrefixExpr(node)),
            SyntaxKind::BIN_EXPR => Expr::Binary(BinExpr(node)),
            SyntaxKind::CONDITIONAL_EXPR => Expr::Conditional(ConditionalExpr(node)),
            _ => return None,
        };
        Some(expr)
    }

    pub fn syntax(&self) -> &SyntaxNode {
        match self {
            Expr::Literal(it) => it.syntax(),
            Expr::NameRef(it) => it.syntax(),
            Expr::Call(it) => it.syntax(),
            Expr::Paren(it) => it.syntax(),
            Expr::Prefix(it) => it.syntax(),
            Expr::Binary(it) => it.syntax(),
            Expr::Conditional(it) => it.syntax(),
        }
    }
}

/// The value written in a literal.
#[derive(Debug, Clone, PartialEq)]
pub enum LiteralValue {
    Number(f64),
    /// String contents with quotes removed and escapes resolved
    String(String),
    Bool(bool),
}

impl Literal {
    pub fn value(&self) -> Option<LiteralValue> {
        let token = first_significant_token(&self.0)?;
        match token.kind() {
            SyntaxKind::NUMBER => token.text().parse().ok().map(LiteralValue::Number),
            SyntaxKind::STRING => Some(LiteralValue::String(unescape(token.text()))),
            SyntaxKind::TRUE_KW => Some(LiteralValue::Bool(true)),
            SyntaxKind::FALSE_KW => Some(LiteralValue::Bool(false)),
            _ => None,
        }
    }
}

impl NameRef {
    pub fn name(&self) -> Option<String> {
        ident(&self.0)
    }
}

impl CallExpr {
    /// Name of the called function.
    pub fn name(&self) -> Option<String> {
        ident(&self.0)
    }

    /// Arguments in source order. Missing or broken arguments are skipped.
    pub fn args(&self) -> Vec<Expr> {
        self.0
            .children()
            .find(|n| n.kind() == SyntaxKind::ARG_LIST)
            .map(|list| list.children().filter_map(Expr::cast).collect())
            .unwrap_or_default()
    }
}

impl ParenExpr {
    pub fn inner(&self) -> Option<Expr> {
        self.0.children().find_map(Expr::cast)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PrefixOp {
    Neg,
    Plus,
    Not,
}

impl PrefixExpr {
    pub fn op(&self) -> Option<PrefixOp> {
        let op = match first_significant_token(&self.0)?.kind() {
            SyntaxKind::MINUS => PrefixOp::Neg,
            SyntaxKind::PLUS => PrefixOp::Plus,
            SyntaxKind::BANG => PrefixOp::Not,
            _ => return None,
        };
        Some(op)
    }

    pub fn operand(&self) -> Option<Expr> {
        self.0.children().find_map(Expr::cast)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BinaryOp {
    Add,
    Sub,
    Mul,
    Div,
    Rem,
    Eq,
    NotEq,
    Lt,
    LtEq,
    Gt,
    GtEq,
    And,
    Or,
}

impl BinaryOp {
    fn from_kind(kind: SyntaxKind) -> Option<Self> {
        let op = match kind {
            SyntaxKind::PLUS => BinaryOp::Add,
            SyntaxKind::MINUS => BinaryOp::Sub,
            SyntaxKind::STAR => BinaryOp::Mul,
            SyntaxKind::SLASH => BinaryOp::Div,
            SyntaxKind::PERCENT => BinaryOp::Rem,
            SyntaxKind::EQ2 => BinaryOp::Eq,
            SyntaxKind::NEQ => BinaryOp::NotEq,
            SyntaxKind::LT => BinaryOp::Lt,
            SyntaxKind::LTE => BinaryOp::LtEq,
            SyntaxKind::GT => BinaryOp::Gt,
            SyntaxKind::GTE => BinaryOp::GtEq,
            SyntaxKind::AMP2 => BinaryOp::And,
            SyntaxKind::PIPE2 => BinaryOp::Or,
            _ => return None,
        };
        Some(op)
    }
}

impl BinExpr {
    pub fn lhs(&self) -> Option<Expr> {
        self.0.children().find_map(Expr::cast)
    }

    pub fn rhs(&self) -> Option<Expr> {
        self.0.children().filter_map(Expr::cast).nth(1)
    }

    /// The operator is the only token directly under a binary expression.
    pub fn op(&self) -> Option<BinaryOp> {
        self.0
            .children_with_tokens()
            .filter_map(|element| element.into_token())
            .find_map(|token| BinaryOp::from_kind(token.kind()))
    }
}

impl ConditionalExpr {
    pub fn condition(&self) -> Option<Expr> {
        self.0.children().find_map(Expr::cast)
    }

    pub fn then_branch(&self) -> Option<Expr> {
        self.0.children().filter_map(Expr::cast).nth(1)
    }

    pub fn else_branch(&self) -> Option<Expr> {
        self.0.children().filter_map(Expr::cast).nth(2)
    }
}

fn first_significant_token(node: &SyntaxNode) -> Option<SyntaxToken> {
    node.children_with_tokens()
        .filter_map(|element| element.into_token())
        .find(|token| !token.kind().is_trivia())
}

fn ident(node: &SyntaxNode) -> Option<String> {
    node.children_with_tokens()
        .filter_map(|element| element.into_token())
        .find(|token| token.kind() == SyntaxKind::IDENT)
        .map(|token| token.text().to_string())
}

/// Strip the surrounding quotes and resolve backslash escapes.
fn unescape(quoted: &str) -> String {
    let inner = quoted
        .get(1..quoted.len().saturating_sub(1))
        .unwrap_or_default();

    let mut out = String::with_capacity(inner.len());
    let mut chars = inner.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('n') => out.push('\n'),
            Some('t') => out.push('\t'),
            Some('r') => out.push('\r'),
            Some('0') => out.push('\0'),
            Some(other) => out.push(other),
            None => out.push('\\'),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    fn expr(input: &str) -> Expr {
        parse(input).expr().unwrap()
    }

    #[rstest]
    #[case("42", LiteralValue::Number(42.0))]
    #[case("1.5e2", LiteralValue::Number(150.0))]
    #[case("'a.b'", LiteralValue::String("a.b".to_string()))]
    #[case(r#""say \"hi\"""#, LiteralValue::String("say \"hi\"".to_string()))]
    #[case(r"'tab\there'", LiteralValue::String("tab\there".to_string()))]
    #[case("true", LiteralValue::Bool(true))]
    #[case("false", LiteralValue::Bool(false))]
    fn literal_values(#[case] input: &str, #[case] expected: LiteralValue) {
        let Expr::Literal(literal) = expr(input) else {
            panic!("{input} is not a literal");
        };
        assert_eq!(literal.value(), Some(expected));
    }

    #[test]
    fn call_name_and_args() {
        let Expr::Call(call) = expr("lookup('trip.distance', 2)") else {
            panic!("expected call");
        };
        assert_eq!(call.name().as_deref(), Some("lookup"));
        let args = call.args();
        assert_eq!(args.len(), 2);
        assert!(matches!(args[0], Expr::Literal(_)));
    }

    #[test]
    fn binary_operands_and_operator() {
        let Expr::Binary(bin) = expr("a - 2 * b") else {
            panic!("expected binary");
        };
        assert_eq!(bin.op(), Some(BinaryOp::Sub));
        assert!(matches!(bin.lhs(), Some(Expr::NameRef(_))));
        let Some(Expr::Binary(rhs)) = bin.rhs() else {
            panic!("expected nested binary");
        };
        assert_eq!(rhs.op(), Some(BinaryOp::Mul));
    }

    #[test]
    fn missing_rhs_is_none() {
        let Expr::Binary(bin) = expr("1 +") else {
            panic!("expected binary");
        };
        assert!(bin.lhs().is_some());
        assert!(bin.rhs().is_none());
    }

    #[test]
    fn conditional_branches() {
        let Expr::Conditional(cond) = expr("x > 1 ? 'big' : 'small'") else {
            panic!("expected conditional");
        };
        assert!(matches!(cond.condition(), Some(Expr::Binary(_))));
        assert!(matches!(cond.then_branch(), Some(Expr::Literal(_))));
        assert!(matches!(cond.else_branch(), Some(Expr::Literal(_))));
    }

    #[test]
    fn prefix_and_paren() {
        let Expr::Prefix(prefix) = expr("-(1 + 2)") else {
            panic!("expected prefix");
        };
        assert_eq!(prefix.op(), Some(PrefixOp::Neg));
        let Some(Expr::Paren(paren)) = prefix.operand() else {
            panic!("expected paren");
        };
        assert!(matches!(paren.inner(), Some(Expr::Binary(_))));
    }

    #[test]
    fn name_ref_name() {
        let Expr::NameRef(name) = expr(" total ") else {
            panic!("expected name");
        };
        assert_eq!(name.name().as_deref(), Some("total"));
    }
}
