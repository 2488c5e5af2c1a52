//! SyntaxKind enum for all tokens and nodes in the formula CST.
//!
//! Tokens and nodes share a single enum, rust-analyzer style. Every byte of
//! the formula source appears as a token somewhere in the tree.

/// All syntax kinds for the formula CST.
///
/// The `repr(u16)` ensures efficient storage in rowan's green tree.
#[repr(u16)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[allow(non_camel_case_types)]
pub enum SyntaxKind {
    // === Tokens (lexer output) ===
    /// Spaces, tabs and line breaks
    WHITESPACE,
    /// Decimal number literal, optionally with fraction and exponent
    NUMBER,
    /// Double- or single-quoted string literal
    STRING,
    /// `true`
    TRUE_KW,
    /// `false`
    FALSE_KW,
    /// Function or variable name
    IDENT,
    /// `+`
    PLUS,
    /// `-`
    MINUS,
    /// `*`
    STAR,
    /// `/`
    SLASH,
    /// `%`
    PERCENT,
    /// `(`
    L_PAREN,
    /// `)`
    R_PAREN,
    /// `,`
    COMMA,
    /// `?`
    QUESTION,
    /// `:`
    COLON,
    /// `!`
    BANG,
    /// `==` or `===`
    EQ2,
    /// `!=` or `!==`
    NEQ,
    /// `<`
    LT,
    /// `<=`
    LTE,
    /// `>`
    GT,
    /// `>=`
    GTE,
    /// `&&`
    AMP2,
    /// `||`
    PIPE2,
    /// Any character the lexer does not recognise
    UNKNOWN,
    /// End of input marker
    EOF,

    // === Composite Nodes (parser output) ===
    /// Root of a formula
    ROOT,
    /// Number, string or boolean literal
    LITERAL,
    /// Bare name, e.g. `price`
    NAME_REF,
    /// Function call, e.g. `lookup("age")`
    CALL_EXPR,
    /// Parenthesised argument list of a call
    ARG_LIST,
    /// Parenthesised expression
    PAREN_EXPR,
    /// Unary operator applied to an operand
    PREFIX_EXPR,
    /// Binary operator with two operands
    BIN_EXPR,
    /// `cond ? then : else`
    CONDITIONAL_EXPR,

    /// Error recovery node
    ERROR,
}

impl SyntaxKind {
    /// Returns true if this kind represents a token (lexer output).
    pub fn is_token(self) -> bool {
        (self as u16) <= (Self::EOF as u16)
    }

    /// Returns true if this kind represents a composite node.
    pub fn is_node(self) -> bool {
        !self.is_token()
    }

    /// Returns true if this kind is trivia the parser never sees.
    pub fn is_trivia(self) -> bool {
        matches!(self, Self::WHITESPACE)
    }

    /// Returns true for the three literal token kinds.
    pub fn is_literal(self) -> bool {
        matches!(
            self,
            Self::NUMBER | Self::STRING | Self::TRUE_KW | Self::FALSE_KW
        )
    }
}

impl From<SyntaxKind> for rowan::SyntaxKind {
    fn from(kind: SyntaxKind) -> Self {
        Self(kind as u16)
    }
}

/// Language definition for rowan.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum FormulaLang {}

impl rowan::Language for FormulaLang {
    type Kind = SyntaxKind;

    fn kind_from_raw(raw: rowan::SyntaxKind) -> Self::Kind {
        assert!(raw.0 <= SyntaxKind::ERROR as u16);
        // SAFETY: We check bounds above and SyntaxKind is repr(u16)
        unsafe { std::mem::transmute::<u16, SyntaxKind>(raw.0) }
    }

    fn kind_to_raw(kind: Self::Kind) -> rowan::SyntaxKind {
        kind.into()
    }
}

/// Type alias for our syntax nodes.
pub type SyntaxNode = rowan::SyntaxNode<FormulaLang>;
/// Type alias for our syntax tokens.
pub type SyntaxToken = rowan::SyntaxToken<FormulaLang>;
/// Type alias for syntax elements (node or token).
pub type SyntaxElement = rowan::SyntaxElement<FormulaLang>;

#[cfg(test)]
mod tests {
    use super::*;
    use rowan::Language;

    #[test]
    fn token_kinds_are_tokens() {
        assert!(SyntaxKind::WHITESPACE.is_token());
        assert!(SyntaxKind::IDENT.is_token());
        assert!(SyntaxKind::EOF.is_token());
    }

    #[test]
    fn node_kinds_are_nodes() {
        assert!(SyntaxKind::ROOT.is_node());
        assert!(SyntaxKind::BIN_EXPR.is_node());
        assert!(SyntaxKind::ERROR.is_node());
    }

    #[test]
    fn only_whitespace_is_trivia() {
        assert!(SyntaxKind::WHITESPACE.is_trivia());
        assert!(!SyntaxKind::STRING.is_trivia());
        assert!(!SyntaxKind::UNKNOWN.is_trivia());
    }

    #[test]
    fn rowan_conversion_roundtrip() {
        let kind = SyntaxKind::CALL_EXPR;
        let raw: rowan::SyntaxKind = kind.into();
        let back = FormulaLang::kind_from_raw(raw);
        assert_eq!(kind, back);
    }
}
