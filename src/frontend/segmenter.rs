//! Splits source text into statements of raw fragments.
//!
//! The scan is lenient: characters that start no fragment (whitespace, commas,
//! comment punctuation, stray quotes) are skipped, and fragments left over
//! after the last terminator are discarded rather than reported.

use crate::syntax::Syntax;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Span {
    pub line: usize,
    pub col: usize,
}

impl std::fmt::Display for Span {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.line, self.col)
    }
}

/// Trimmed source text of one fragment, without its terminator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fragment {
    pub text: String,
    pub span: Span,
}

pub type RawStatement = Vec<Fragment>;

pub struct Segmenter<'a> {
    syntax: &'a Syntax,
    source: Vec<char>,
    pos: usize,
    line: usize,
    col: usize,
}

impl<'a> Segmenter<'a> {
    pub fn new(source: &str, syntax: &'a Syntax) -> Self {
        Segmenter {
            syntax,
            source: source.chars().collect(),
            pos: 0,
            line: 1,
            col: 1,
        }
    }

    fn current(&self) -> Option<char> {
        self.source.get(self.pos).copied()
    }

    fn advance(&mut self) -> Option<char> {
        let ch = self.current();
        if ch == Some('\n') {
            self.line += 1;
            self.col = 1;
        } else {
            self.col += 1;
        }
        self.pos += 1;
        ch
    }

    fn span(&self) -> Span {
        Span {
            line: self.line,
            col: self.col,
        }
    }

    /// Consume one trailing boundary character, if present.
    fn read_boundary(&mut self, text: &mut String) {
        if let Some(ch) = self.current() {
            if self.syntax.is_boundary(ch) {
                text.push(ch);
                self.advance();
            }
        }
    }

    /// A string literal must close on the same line.
    fn read_string(&mut self) -> Option<String> {
        let rest = self.source.get(self.pos + 1..)?;
        let close = rest.iter().take_while(|&&c| c != '\n').position(|&c| c == '"')?;

        let mut text = String::new();
        for _ in 0..close + 2 {
            text.extend(self.advance());
        }
        Some(text)
    }

    fn read_word(&mut self) -> String {
        let mut text = String::new();
        text.extend(self.advance());
        while let Some(ch) = self.current() {
            if ch.is_alphanumeric() || ch == '_' {
                text.push(ch);
                self.advance();
            } else {
                break;
            }
        }
        self.read_boundary(&mut text);
        text
    }

    fn read_operator_run(&mut self) -> String {
        let mut text = String::new();
        while let Some(ch) = self.current() {
            if self.syntax.is_operator_char(ch) {
                text.push(ch);
                self.advance();
            } else {
                break;
            }
        }
        if self.current() == Some(' ') {
            text.push(' ');
            self.advance();
        }
        text
    }

    fn read_number(&mut self) -> String {
        let mut text = String::new();
        while let Some(ch) = self.current() {
            if ch.is_ascii_digit() {
                text.push(ch);
                self.advance();
            } else {
                break;
            }
        }
        self.read_boundary(&mut text);
        text
    }

    /// Try each fragment shape at the current position, in priority order.
    fn read_fragment(&mut self) -> Option<String> {
        let ch = self.current()?;
        if ch == '"' {
            if let Some(text) = self.read_string() {
                return Some(text);
            }
        }
        if ch.is_ascii_alphabetic() {
            return Some(self.read_word());
        }
        if self.syntax.is_operator_char(ch) {
            return Some(self.read_operator_run());
        }
        if ch.is_ascii_digit() {
            return Some(self.read_number());
        }
        None
    }

    pub fn segment(&mut self) -> Vec<RawStatement> {
        let mut statements = Vec::new();
        let mut statement = RawStatement::new();

        while self.current().is_some() {
            let span = self.span();
            let Some(raw) = self.read_fragment() else {
                self.advance();
                continue;
            };

            let text = raw.trim();
            if text.is_empty() {
                continue;
            }

            match text.chars().last() {
                Some(last) if self.syntax.is_terminator(last) => {
                    let body = &text[..text.len() - last.len_utf8()];
                    statement.push(Fragment {
                        text: body.to_string(),
                        span,
                    });
                    statements.push(std::mem::take(&mut statement));
                }
                _ if statement.is_empty() && self.syntax.is_block_closer(text) => {
                    statements.push(vec![Fragment {
                        text: text.to_string(),
                        span,
                    }]);
                }
                _ => statement.push(Fragment {
                    text: text.to_string(),
                    span,
                }),
            }
        }

        if !statement.is_empty() {
            log::debug!(
                "discarding {} unterminated fragment(s) starting at {}",
                statement.len(),
                statement[0].span
            );
        }

        statements
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn texts(source: &str) -> Vec<Vec<String>> {
        let syntax = Syntax::standard();
        Segmenter::new(source, &syntax)
            .segment()
            .into_iter()
            .map(|s| s.into_iter().map(|f| f.text).collect())
            .collect()
    }

    fn seg(parts: &[&str]) -> Vec<String> {
        parts.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_simple_assignment() {
        assert_eq!(texts("x = 5;"), vec![seg(&["x", "=", "5"])]);
    }

    #[test]
    fn test_block_header_ends_at_colon() {
        assert_eq!(
            texts("if a < b:\nc = 1;"),
            vec![seg(&["if", "a", "<", "b"]), seg(&["c", "=", "1"])]
        );
    }

    #[test]
    fn test_closing_paren_terminates() {
        assert_eq!(
            texts(r#"print("hi", dev);"#),
            vec![seg(&["print(", "\"hi\"", "dev"])]
        );
    }

    #[test]
    fn test_trailing_statement_is_discarded() {
        assert_eq!(texts("x = 1; y = 2"), vec![seg(&["x", "=", "1"])]);
        assert!(texts("y = 2").is_empty());
    }

    #[test]
    fn test_bare_closer_stands_alone() {
        assert_eq!(
            texts("c = 1;\nendif"),
            vec![seg(&["c", "=", "1"]), seg(&["endif"])]
        );
        assert_eq!(texts("endfor;"), vec![seg(&["endfor"])]);
    }

    #[test]
    fn test_closer_inside_open_statement_is_not_split() {
        assert_eq!(texts("x = endif;"), vec![seg(&["x", "=", "endif"])]);
    }

    #[test]
    fn test_unmatched_characters_are_dropped() {
        assert_eq!(
            texts("# note, x = 1 ; !!\n@ y = 2;"),
            vec![seg(&["note", "x", "=", "1", "y", "=", "2"])]
        );
    }

    #[test]
    fn test_operator_runs_stay_together() {
        assert_eq!(texts("a = b<=c;"), vec![seg(&["a", "=", "b", "<=", "c"])]);
        assert_eq!(texts("a => b;"), vec![seg(&["a", "=>", "b"])]);
    }

    #[test]
    fn test_unclosed_string_drops_quote() {
        assert_eq!(texts("x = \"abc;"), vec![seg(&["x", "=", "abc"])]);
    }

    #[test]
    fn test_string_may_hold_terminators() {
        assert_eq!(
            texts(r#"print("a;b", out);"#),
            vec![seg(&["print(", "\"a;b\"", "out"])]
        );
    }

    #[test]
    fn test_spans_are_one_based() {
        let syntax = Syntax::standard();
        let statements = Segmenter::new("x = 1;\n  yy = 22;", &syntax).segment();
        assert_eq!(statements[0][0].span, Span { line: 1, col: 1 });
        assert_eq!(statements[0][2].span, Span { line: 1, col: 5 });
        assert_eq!(statements[1][0].span, Span { line: 2, col: 3 });
        assert_eq!(statements[1][2].span, Span { line: 2, col: 8 });
    }

    proptest! {
        #[test]
        fn doesnt_crash(s in "\\PC*") {
            let syntax = Syntax::standard();
            let statements = Segmenter::new(&s, &syntax).segment();
            for statement in statements {
                prop_assert!(!statement.is_empty());
            }
        }
    }
}
