//! # mlogc
//!
//! Translates a small statement language (assignments, `if`, `for`, `print`)
//! into flat, jump-based logic processor code.
//!
//! ## Pipeline
//!
//! - [`segment`]: source text → statements of raw fragments
//! - [`classify`]: fragments → keyword / operator / variable / value tokens
//! - [`generate`]: tokens → [`Program`], resolving forward jumps
//!
//! Each stage runs to completion before the next starts, and the first error
//! aborts the compilation.
//!
//! ```
//! let out = mlogc::compile("x = 2 + 3 + 5;").unwrap();
//! assert_eq!(out, "op add x 2 3\nop add x x 5\nend\n");
//! ```

pub mod codegen;
pub mod frontend;
pub mod syntax;

pub use codegen::{CompileError, Program};
pub use frontend::ClassifyError;
pub use syntax::Syntax;

use frontend::{Classifier, RawStatement, Segmenter, Statement};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error {
    Classify(ClassifyError),
    Compile(CompileError),
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Error::Classify(e) => write!(f, "{}", e),
            Error::Compile(e) => write!(f, "{}", e),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Classify(e) => Some(e),
            Error::Compile(e) => Some(e),
        }
    }
}

impl From<ClassifyError> for Error {
    fn from(e: ClassifyError) -> Self {
        Error::Classify(e)
    }
}

impl From<CompileError> for Error {
    fn from(e: CompileError) -> Self {
        Error::Compile(e)
    }
}

pub fn segment(source: &str, syntax: &Syntax) -> Vec<RawStatement> {
    Segmenter::new(source, syntax).segment()
}

pub fn classify(
    statements: Vec<RawStatement>,
    syntax: &Syntax,
) -> Result<Vec<Statement>, ClassifyError> {
    Classifier::new(syntax).classify(statements)
}

pub fn generate(statements: &[Statement], syntax: &Syntax) -> Result<Program, CompileError> {
    codegen::Compiler::new(syntax).compile(statements)
}

/// Run the whole pipeline with an explicit syntax.
pub fn compile_program_with(source: &str, syntax: &Syntax) -> Result<Program, Error> {
    let raw = segment(source, syntax);
    log::debug!("segmented {} statement(s)", raw.len());

    let statements = classify(raw, syntax)?;
    log::debug!(
        "classified {} token(s)",
        statements.iter().map(Vec::len).sum::<usize>()
    );

    let program = generate(&statements, syntax)?;
    log::debug!("generated {} instruction(s)", program.len());

    Ok(program)
}

pub fn compile_program(source: &str) -> Result<Program, Error> {
    compile_program_with(source, Syntax::shared())
}

/// Compile source text to target program text, one instruction per line.
pub fn compile(source: &str) -> Result<String, Error> {
    compile_program(source).map(|program| program.to_string())
}
