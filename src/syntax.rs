//! Fixed vocabularies of the source language.
//!
//! A [`Syntax`] is built once and handed to every pipeline stage by reference.
//! Nothing in here is mutated after construction, so one instance can serve
//! any number of compilations.

use std::collections::HashMap;
use std::sync::OnceLock;

/// Whether an operator compares or computes.
///
/// Comparisons are the only operators allowed in jump conditions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OperatorClass {
    Comparison,
    Arithmetic,
}

/// Target-side name of a source operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Mnemonic {
    pub name: &'static str,
    pub class: OperatorClass,
}

/// Property read operator. Lowers to `sensor`, never to `op`.
pub const SENSOR_OPERATOR: &str = ".";

/// Assignment operator.
pub const ASSIGN_OPERATOR: &str = "=";

#[derive(Debug, Clone)]
pub struct Syntax {
    keywords: Vec<&'static str>,
    operators: Vec<&'static str>,
    block_closers: Vec<&'static str>,
    mnemonics: HashMap<&'static str, Mnemonic>,
    terminators: Vec<char>,
    boundaries: Vec<char>,
    operator_chars: Vec<char>,
}

impl Syntax {
    pub fn standard() -> Self {
        use OperatorClass::*;

        let mnemonics = [
            ("==", "equals", Comparison),
            ("<", "lessThan", Comparison),
            (">", "greaterThan", Comparison),
            ("<=", "lessThanEq", Comparison),
            (">=", "greaterThanEq", Comparison),
            ("+", "add", Arithmetic),
            ("-", "sub", Arithmetic),
            ("*", "mul", Arithmetic),
            ("/", "div", Arithmetic),
            ("^", "pow", Arithmetic),
        ]
        .into_iter()
        .map(|(op, name, class)| (op, Mnemonic { name, class }))
        .collect();

        Syntax {
            keywords: vec![
                "if", "endif", "def", "enddef", "for", "endfor", "while", "endwhile", "print(",
            ],
            operators: vec![
                "<", "=", "==", ">", "<=", ">=", ".", "+", "-", "*", "/", "^",
            ],
            block_closers: vec!["endif", "endfor", "enddef", "endwhile"],
            mnemonics,
            terminators: vec![';', ':', ')'],
            boundaries: vec![';', ':', ' ', '(', ')'],
            operator_chars: vec!['=', '<', '>', '.', '+', '-', '/', '*', '^'],
        }
    }

    /// Shared standard syntax, built on first use.
    pub fn shared() -> &'static Syntax {
        static STANDARD: OnceLock<Syntax> = OnceLock::new();
        STANDARD.get_or_init(Syntax::standard)
    }

    pub fn is_keyword(&self, text: &str) -> bool {
        self.keywords.contains(&text)
    }

    pub fn is_operator(&self, text: &str) -> bool {
        self.operators.contains(&text)
    }

    /// Closers may stand alone as a statement without a terminator.
    pub fn is_block_closer(&self, text: &str) -> bool {
        self.block_closers.contains(&text)
    }

    pub fn mnemonic(&self, operator: &str) -> Option<Mnemonic> {
        self.mnemonics.get(operator).copied()
    }

    pub fn is_terminator(&self, ch: char) -> bool {
        self.terminators.contains(&ch)
    }

    pub fn is_boundary(&self, ch: char) -> bool {
        self.boundaries.contains(&ch)
    }

    pub fn is_operator_char(&self, ch: char) -> bool {
        self.operator_chars.contains(&ch)
    }
}

impl Default for Syntax {
    fn default() -> Self {
        Self::standard()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_mnemonic_is_an_operator() {
        let syntax = Syntax::standard();
        for op in ["==", "<", ">", "<=", ">=", "+", "-", "*", "/", "^"] {
            assert!(syntax.is_operator(op), "{} should be an operator", op);
            assert!(syntax.mnemonic(op).is_some(), "{} should have a mnemonic", op);
        }
    }

    #[test]
    fn test_sensor_and_assign_have_no_mnemonic() {
        let syntax = Syntax::standard();
        assert!(syntax.is_operator(SENSOR_OPERATOR));
        assert!(syntax.is_operator(ASSIGN_OPERATOR));
        assert_eq!(syntax.mnemonic(SENSOR_OPERATOR), None);
        assert_eq!(syntax.mnemonic(ASSIGN_OPERATOR), None);
    }

    #[test]
    fn test_comparison_classes() {
        let syntax = Syntax::standard();
        assert_eq!(
            syntax.mnemonic("<="),
            Some(Mnemonic {
                name: "lessThanEq",
                class: OperatorClass::Comparison
            })
        );
        assert_eq!(
            syntax.mnemonic("^").map(|m| m.class),
            Some(OperatorClass::Arithmetic)
        );
    }

    #[test]
    fn test_closers_are_keywords() {
        let syntax = Syntax::standard();
        for closer in ["endif", "endfor", "enddef", "endwhile"] {
            assert!(syntax.is_keyword(closer));
            assert!(syntax.is_block_closer(closer));
        }
        assert!(!syntax.is_block_closer("if"));
    }
}
