use crate::frontend::segmenter::{Fragment, RawStatement, Span};
use crate::frontend::token::{Spanned, Statement, Token};
use crate::syntax::Syntax;

/// A fragment that fits none of the four token shapes.
///
/// `line` and `col` are the 1-based start of the fragment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassifyError {
    pub fragment: String,
    pub line: usize,
    pub col: usize,
}

impl ClassifyError {
    fn new(fragment: &str, span: Span) -> Self {
        ClassifyError {
            fragment: fragment.to_string(),
            line: span.line,
            col: span.col,
        }
    }
}

impl std::fmt::Display for ClassifyError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}:{}: unrecognised fragment '{}'",
            self.line, self.col, self.fragment
        )
    }
}

impl std::error::Error for ClassifyError {}

pub struct Classifier<'a> {
    syntax: &'a Syntax,
}

impl<'a> Classifier<'a> {
    pub fn new(syntax: &'a Syntax) -> Self {
        Classifier { syntax }
    }

    pub fn classify(&self, statements: Vec<RawStatement>) -> Result<Vec<Statement>, ClassifyError> {
        statements
            .into_iter()
            .map(|statement| {
                statement
                    .into_iter()
                    .map(|fragment| self.classify_fragment(fragment))
                    .collect::<Result<Statement, _>>()
            })
            .collect()
    }

    /// First match wins: keyword, operator, variable, value.
    pub fn classify_fragment(&self, fragment: Fragment) -> Result<Spanned, ClassifyError> {
        let Fragment { text, span } = fragment;

        let token = if self.syntax.is_keyword(&text) {
            Token::Keyword(text)
        } else if self.syntax.is_operator(&text) {
            Token::Operator(text)
        } else if self.is_variable_shape(&text) {
            Token::Variable(text)
        } else if is_value_shape(&text) {
            Token::Value(text)
        } else {
            return Err(ClassifyError::new(&text, span));
        };

        Ok(Spanned { token, span })
    }

    fn is_variable_shape(&self, text: &str) -> bool {
        let mut chars = text.chars();
        if !chars.next().is_some_and(|c| c.is_ascii_alphabetic()) {
            return false;
        }

        let tail = chars.as_str();
        let boundary_start = tail
            .find(|c: char| !(c.is_alphanumeric() || c == '_'))
            .unwrap_or(tail.len());

        tail[boundary_start..].chars().all(|c| self.syntax.is_boundary(c))
    }
}

/// Digit runs and complete string literals are values.
fn is_value_shape(text: &str) -> bool {
    if !text.is_empty() && text.chars().all(|c| c.is_ascii_digit()) {
        return true;
    }
    text.len() >= 2
        && text.starts_with('"')
        && text.ends_with('"')
        && !text[1..text.len() - 1].contains('"')
}

#[cfg(test)]
mod tests {
    use super::*;

    fn classify_one(text: &str) -> Result<Token, ClassifyError> {
        let syntax = Syntax::standard();
        Classifier::new(&syntax)
            .classify_fragment(Fragment {
                text: text.to_string(),
                span: Span { line: 1, col: 1 },
            })
            .map(|s| s.token)
    }

    #[test]
    fn test_keywords() {
        assert_eq!(classify_one("if"), Ok(Token::Keyword("if".to_string())));
        assert_eq!(
            classify_one("print("),
            Ok(Token::Keyword("print(".to_string()))
        );
        assert_eq!(
            classify_one("endwhile"),
            Ok(Token::Keyword("endwhile".to_string()))
        );
    }

    #[test]
    fn test_operators() {
        for op in ["<", "=", "==", ">", "<=", ">=", ".", "+", "-", "*", "/", "^"] {
            assert_eq!(classify_one(op), Ok(Token::Operator(op.to_string())));
        }
    }

    #[test]
    fn test_variables() {
        assert_eq!(classify_one("x"), Ok(Token::Variable("x".to_string())));
        assert_eq!(
            classify_one("foo_2"),
            Ok(Token::Variable("foo_2".to_string()))
        );
        assert_eq!(
            classify_one("print"),
            Ok(Token::Variable("print".to_string()))
        );
        assert_eq!(classify_one("sin("), Ok(Token::Variable("sin(".to_string())));
    }

    #[test]
    fn test_values() {
        assert_eq!(classify_one("42"), Ok(Token::Value("42".to_string())));
        assert_eq!(
            classify_one("\"hello there\""),
            Ok(Token::Value("\"hello there\"".to_string()))
        );
    }

    #[test]
    fn test_keyword_wins_over_variable_shape() {
        assert!(matches!(classify_one("for"), Ok(Token::Keyword(_))));
        assert!(matches!(classify_one("fork"), Ok(Token::Variable(_))));
    }

    #[test]
    fn test_unknown_operator_run_fails() {
        let err = classify_one("=>").unwrap_err();
        assert_eq!(err.fragment, "=>");
        assert_eq!(err.to_string(), "1:1: unrecognised fragment '=>'");
    }

    #[test]
    fn test_mixed_shapes_fail() {
        assert!(classify_one("5(").is_err());
        assert!(classify_one("a.b").is_err());
        assert!(classify_one("\"").is_err());
    }

    #[test]
    fn test_statement_shape_is_preserved() {
        let syntax = Syntax::standard();
        let frag = |text: &str, col| Fragment {
            text: text.to_string(),
            span: Span { line: 1, col },
        };
        let classified = Classifier::new(&syntax)
            .classify(vec![
                vec![frag("x", 1), frag("=", 3), frag("5", 5)],
                vec![frag("endif", 7)],
            ])
            .unwrap();

        assert_eq!(classified.len(), 2);
        assert_eq!(classified[0].len(), 3);
        assert_eq!(classified[0][2].span.col, 5);
        assert_eq!(classified[1][0].token, Token::Keyword("endif".to_string()));
    }

    #[test]
    fn test_first_failure_is_reported() {
        let syntax = Syntax::standard();
        let frag = |text: &str, line| Fragment {
            text: text.to_string(),
            span: Span { line, col: 1 },
        };
        let err = Classifier::new(&syntax)
            .classify(vec![vec![frag("x", 1), frag("=>", 2), frag("<>", 3)]])
            .unwrap_err();
        assert_eq!(err.line, 2);
    }
}
