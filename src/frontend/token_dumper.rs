use std::fmt::Write;

use crate::frontend::segmenter::RawStatement;
use crate::frontend::token::{Statement, Token};

/// Renders intermediate pipeline stages for `--segments` / `--tokens`.
pub struct TokenDumper {
    pub color: bool,
}

impl Default for TokenDumper {
    fn default() -> Self {
        Self { color: true }
    }
}

impl TokenDumper {
    // ANSI colors
    const RESET: &'static str = "\x1b[0m";
    const DIM: &'static str = "\x1b[2m";
    const GRN: &'static str = "\x1b[32m";
    const YEL: &'static str = "\x1b[33m";
    const CYN: &'static str = "\x1b[36m";
    const MAG: &'static str = "\x1b[35m";

    pub fn new() -> Self {
        Self::default()
    }

    pub fn no_color(mut self) -> Self {
        self.color = false;
        self
    }

    fn paint(&self, colr: &'static str) -> (&'static str, &'static str) {
        if self.color {
            (colr, Self::RESET)
        } else {
            ("", "")
        }
    }

    pub fn dump_segments(&self, statements: &[RawStatement]) -> String {
        let mut out = String::new();
        let (dim, reset) = self.paint(Self::DIM);

        for (i, statement) in statements.iter().enumerate() {
            let _ = writeln!(out, "{}statement {}{}", dim, i, reset);
            for fragment in statement {
                let _ = writeln!(
                    out,
                    "[{:02}:{:02}] {{{}}}",
                    fragment.span.line, fragment.span.col, fragment.text
                );
            }
        }
        out
    }

    pub fn dump_tokens(&self, statements: &[Statement]) -> String {
        let mut out = String::new();
        let (dim, dim_reset) = self.paint(Self::DIM);

        for (i, statement) in statements.iter().enumerate() {
            let _ = writeln!(out, "{}statement {}{}", dim, i, dim_reset);
            for s in statement {
                let (colr, reset) = self.paint(Self::color(&s.token));
                let _ = writeln!(
                    out,
                    "[{:02}:{:02}] {}{:<8} {}{}",
                    s.span.line,
                    s.span.col,
                    colr,
                    s.token.kind(),
                    s.token,
                    reset
                );
            }
        }
        out
    }

    fn color(t: &Token) -> &'static str {
        match t {
            Token::Keyword(_) => Self::MAG,
            Token::Operator(_) => Self::CYN,
            Token::Variable(_) => Self::YEL,
            Token::Value(_) => Self::GRN,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frontend::segmenter::Span;
    use crate::frontend::token::Spanned;

    #[test]
    fn test_plain_token_dump() {
        let statements = vec![vec![
            Spanned {
                token: Token::Variable("x".to_string()),
                span: Span { line: 1, col: 1 },
            },
            Spanned {
                token: Token::Value("5".to_string()),
                span: Span { line: 1, col: 5 },
            },
        ]];

        let out = TokenDumper::new().no_color().dump_tokens(&statements);
        assert_eq!(
            out,
            "statement 0\n[01:01] VAR      x\n[01:05] VALUE    5\n"
        );
    }

    #[test]
    fn test_colored_dump_wraps_tokens() {
        let statements = vec![vec![Spanned {
            token: Token::Keyword("endif".to_string()),
            span: Span { line: 3, col: 1 },
        }]];

        let out = TokenDumper::new().dump_tokens(&statements);
        assert!(out.contains("\x1b[35mKEYWORD  endif\x1b[0m"));
    }
}
