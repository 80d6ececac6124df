use crate::frontend::segmenter::Span;

/// A classified source fragment. Every variant keeps the literal text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token {
    Keyword(String),
    Operator(String),
    Variable(String),
    Value(String),
}

impl Token {
    pub fn text(&self) -> &str {
        match self {
            Token::Keyword(s) | Token::Operator(s) | Token::Variable(s) | Token::Value(s) => s,
        }
    }

    /// Short upper-case kind name used in dumps and diagnostics.
    pub fn kind(&self) -> &'static str {
        match self {
            Token::Keyword(_) => "KEYWORD",
            Token::Operator(_) => "OP",
            Token::Variable(_) => "VAR",
            Token::Value(_) => "VALUE",
        }
    }

    /// Returns true if this token can stand where a value is read
    pub fn is_operand(&self) -> bool {
        matches!(self, Token::Variable(_) | Token::Value(_))
    }

    pub fn is_operator(&self, text: &str) -> bool {
        matches!(self, Token::Operator(s) if s == text)
    }

    pub fn is_keyword(&self, text: &str) -> bool {
        matches!(self, Token::Keyword(s) if s == text)
    }
}

impl std::fmt::Display for Token {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.text())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Spanned {
    pub token: Token,
    pub span: Span,
}

/// One classified statement, in source order.
pub type Statement = Vec<Spanned>;
