//! Source side of the pipeline: text to statements of classified tokens.

pub mod classifier;
pub mod segmenter;
pub mod token;
pub mod token_dumper;

pub use classifier::{ClassifyError, Classifier};
pub use segmenter::{Fragment, RawStatement, Segmenter, Span};
pub use token::{Spanned, Statement, Token};
