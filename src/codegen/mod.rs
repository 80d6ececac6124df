pub mod compile;
pub mod compile_error;
pub mod disasm;
pub mod ir;
pub mod op;

pub use compile::{BlockKind, Compiler, LOOP_CHECK_VAR, PendingJump};
pub use compile_error::CompileError;
pub use ir::Program;
pub use op::{Condition, Instruction};
