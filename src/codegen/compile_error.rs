use crate::frontend::{Spanned, segmenter::Span};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CompileError {
    /// Wrong token count or a token of the wrong kind for the statement form
    Syntax {
        message: String,
        span: Span,
        hint: Option<String>,
    },
    /// An operator with no lowering in this position
    UnsupportedOperator {
        operator: String,
        span: Span,
        reason: String,
    },
    /// A closer with nothing open, or an opener never closed
    UnbalancedBlock {
        keyword: String,
        span: Span,
        reason: String,
    },
    /// A statement form the generator has no lowering for
    UnrecognizedStatement { text: String, span: Span },
    EmptyStatement,
    /// Internal compiler error (shouldn't happen in normal use)
    Internal(String),
}

impl CompileError {
    pub fn syntax(at: &Spanned, message: impl Into<String>) -> Self {
        CompileError::Syntax {
            message: message.into(),
            span: at.span,
            hint: None,
        }
    }

    /// Arity error with the expected statement shape as a hint
    pub fn arity(at: &Spanned, found: usize, form: &str) -> Self {
        CompileError::Syntax {
            message: format!("'{}' statement has {} tokens", at.token, found),
            span: at.span,
            hint: Some(format!("expected `{}`", form)),
        }
    }

    pub fn expected_operand(at: &Spanned) -> Self {
        CompileError::syntax(
            at,
            format!("expected a variable or value, found {} '{}'", at.token.kind(), at.token),
        )
    }

    pub fn unsupported_operator(at: &Spanned, reason: impl Into<String>) -> Self {
        CompileError::UnsupportedOperator {
            operator: at.token.text().to_string(),
            span: at.span,
            reason: reason.into(),
        }
    }

    pub fn unmatched_closer(at: &Spanned, opener: &str) -> Self {
        CompileError::UnbalancedBlock {
            keyword: at.token.text().to_string(),
            span: at.span,
            reason: format!("no open '{}' block to close", opener),
        }
    }

    pub fn unclosed_block(opener: &str, span: Span, closer: &str) -> Self {
        CompileError::UnbalancedBlock {
            keyword: opener.to_string(),
            span,
            reason: format!("block is never closed with '{}'", closer),
        }
    }

    pub fn unrecognized(at: &Spanned) -> Self {
        CompileError::UnrecognizedStatement {
            text: at.token.text().to_string(),
            span: at.span,
        }
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        CompileError::Internal(msg.into())
    }

    pub fn span(&self) -> Option<Span> {
        match self {
            CompileError::Syntax { span, .. }
            | CompileError::UnsupportedOperator { span, .. }
            | CompileError::UnbalancedBlock { span, .. }
            | CompileError::UnrecognizedStatement { span, .. } => Some(*span),
            CompileError::EmptyStatement | CompileError::Internal(_) => None,
        }
    }
}

impl std::fmt::Display for CompileError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if let Some(span) = self.span() {
            write!(f, "{}: ", span)?;
        }
        match self {
            CompileError::Syntax { message, hint, .. } => {
                write!(f, "syntax error: {}", message)?;
                if let Some(h) = hint {
                    write!(f, "\n  hint: {}", h)?;
                }
                Ok(())
            }
            CompileError::UnsupportedOperator {
                operator, reason, ..
            } => write!(f, "unsupported operator '{}': {}", operator, reason),
            CompileError::UnbalancedBlock {
                keyword, reason, ..
            } => write!(f, "unbalanced block '{}': {}", keyword, reason),
            CompileError::UnrecognizedStatement { text, .. } => {
                write!(f, "unrecognised statement starting with '{}'", text)
            }
            CompileError::EmptyStatement => write!(f, "empty statement"),
            CompileError::Internal(msg) => write!(f, "internal error: {}", msg),
        }
    }
}

impl std::error::Error for CompileError {}
