//! Lowers classified statements to target instructions.
//!
//! Statements are dispatched on their first token. Block openers (`if`, `for`)
//! emit a jump whose target is not yet known and record it as a
//! [`PendingJump`]; the matching closer resolves it to a concrete index.

use crate::{
    codegen::{CompileError, Condition, Instruction, Program},
    frontend::{Spanned, Statement, Token, segmenter::Span},
    syntax::{ASSIGN_OPERATOR, OperatorClass, SENSOR_OPERATOR, Syntax},
};

/// Holds the result of a `for` condition between the test and the exit jump.
pub const LOOP_CHECK_VAR: &str = "compilerForLoopJumpChecker";

const IF_FORM: &str = "if <operand> <comparison> <operand>";
const FOR_FORM: &str = "for <var> = <init>, <lhs> <comparison> <rhs>[, <var> = <a> <op> <b>]";
const PRINT_FORM: &str = "print(<value>, <device>)";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockKind {
    If,
    For,
}

impl BlockKind {
    pub fn opener(self) -> &'static str {
        match self {
            BlockKind::If => "if",
            BlockKind::For => "for",
        }
    }

    pub fn closer(self) -> &'static str {
        match self {
            BlockKind::If => "endif",
            BlockKind::For => "endfor",
        }
    }
}

/// A jump emitted with an unknown target.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PendingJump {
    /// Index of the `Jump` instruction to patch
    pub index: usize,
    pub kind: BlockKind,
    /// Where the opening keyword appeared
    pub opened_at: Span,
}

pub struct Compiler<'a> {
    syntax: &'a Syntax,

    /// Output, in emission order
    instructions: Vec<Instruction>,

    /// Open `if` blocks, innermost last
    if_stack: Vec<PendingJump>,

    /// Open `for` blocks, innermost last
    for_stack: Vec<PendingJump>,
}

impl<'a> Compiler<'a> {
    pub fn new(syntax: &'a Syntax) -> Self {
        Self {
            syntax,
            instructions: Vec::new(),
            if_stack: Vec::new(),
            for_stack: Vec::new(),
        }
    }

    pub fn compile(mut self, statements: &[Statement]) -> Result<Program, CompileError> {
        for statement in statements {
            let before = self.instructions.len();
            self.compile_statement(statement)?;
            log::trace!(
                "{:?} -> {} instruction(s)",
                statement.iter().map(|s| s.token.text()).collect::<Vec<_>>(),
                self.instructions.len() - before
            );
        }

        // Report the outermost block that was left open.
        let unclosed = self
            .if_stack
            .iter()
            .chain(self.for_stack.iter())
            .min_by_key(|p| p.index);
        if let Some(pending) = unclosed {
            return Err(CompileError::unclosed_block(
                pending.kind.opener(),
                pending.opened_at,
                pending.kind.closer(),
            ));
        }

        self.instructions.push(Instruction::End);
        Ok(Program {
            instructions: self.instructions,
        })
    }

    fn compile_statement(&mut self, statement: &[Spanned]) -> Result<(), CompileError> {
        let Some(first) = statement.first() else {
            return Err(CompileError::EmptyStatement);
        };

        match &first.token {
            Token::Variable(_) => self.compile_variable_statement(statement),
            Token::Keyword(keyword) => match keyword.as_str() {
                "if" => self.compile_if(statement),
                "endif" => self.compile_endif(statement),
                "for" => self.compile_for(statement),
                "endfor" => self.compile_endfor(statement),
                "print(" => self.compile_print(statement),
                _ => Err(CompileError::unrecognized(first)),
            },
            Token::Operator(_) | Token::Value(_) => Err(CompileError::unrecognized(first)),
        }
    }

    fn compile_variable_statement(&mut self, statement: &[Spanned]) -> Result<(), CompileError> {
        match statement.get(1) {
            Some(second) if second.token.is_operator(ASSIGN_OPERATOR) => {
                self.compile_assignment(statement)
            }
            _ => {
                log::warn!(
                    "{}: ignoring statement '{}': not an assignment",
                    statement[0].span,
                    statement
                        .iter()
                        .map(|s| s.token.text())
                        .collect::<Vec<_>>()
                        .join(" ")
                );
                Ok(())
            }
        }
    }

    /// `dest = a op b op c ...`, folded strictly left to right into `dest`.
    fn compile_assignment(&mut self, statement: &[Spanned]) -> Result<(), CompileError> {
        let dest = &statement[0];
        let rhs = &statement[2..];

        if rhs.is_empty() {
            return Err(CompileError::syntax(
                &statement[1],
                format!("assignment to '{}' has no value", dest.token),
            ));
        }
        if statement.len() % 2 == 0 {
            return Err(CompileError::syntax(
                &statement[1],
                format!(
                    "assignment to '{}' has {} tokens after '='; operands and operators must alternate",
                    dest.token,
                    rhs.len()
                ),
            ));
        }
        for (i, s) in rhs.iter().enumerate() {
            if i % 2 == 0 {
                expect_operand(s)?;
            } else if !matches!(s.token, Token::Operator(_)) {
                return Err(CompileError::syntax(
                    s,
                    format!("expected an operator, found {} '{}'", s.token.kind(), s.token),
                ));
            }
        }

        let dest_text = dest.token.text();
        match rhs {
            [value] => {
                self.instructions.push(Instruction::Set {
                    dest: dest_text.to_string(),
                    value: value.token.text().to_string(),
                });
            }
            [a, op, b, rest @ ..] => {
                let first = self.lower_binary(dest_text, a.token.text(), op, b.token.text())?;
                self.instructions.push(first);

                for pair in rest.chunks_exact(2) {
                    if let [op, b] = pair {
                        let next = self.lower_binary(dest_text, dest_text, op, b.token.text())?;
                        self.instructions.push(next);
                    }
                }
            }
            _ => return Err(CompileError::internal("assignment arity checked above")),
        }

        Ok(())
    }

    /// `.` reads a property; everything else goes through the mnemonic table.
    fn lower_binary(
        &self,
        dest: &str,
        a: &str,
        op: &Spanned,
        b: &str,
    ) -> Result<Instruction, CompileError> {
        let Token::Operator(text) = &op.token else {
            return Err(CompileError::syntax(
                op,
                format!("expected an operator, found {} '{}'", op.token.kind(), op.token),
            ));
        };

        if text == SENSOR_OPERATOR {
            return Ok(Instruction::Sensor {
                dest: dest.to_string(),
                object: a.to_string(),
                property: b.to_string(),
            });
        }

        match self.syntax.mnemonic(text) {
            Some(mnemonic) => Ok(Instruction::Op {
                mnemonic: mnemonic.name.to_string(),
                dest: dest.to_string(),
                a: a.to_string(),
                b: b.to_string(),
            }),
            None => Err(CompileError::unsupported_operator(
                op,
                "no arithmetic or comparison lowering",
            )),
        }
    }

    fn comparison(&self, op: &Spanned) -> Result<&'static str, CompileError> {
        let Token::Operator(text) = &op.token else {
            return Err(CompileError::syntax(
                op,
                format!("expected a comparison operator, found {} '{}'", op.token.kind(), op.token),
            ));
        };

        match self.syntax.mnemonic(text) {
            Some(m) if m.class == OperatorClass::Comparison => Ok(m.name),
            _ => Err(CompileError::unsupported_operator(
                op,
                "a condition needs one of == < > <= >=",
            )),
        }
    }

    /// Conditional jump over the placeholder into the block; the placeholder
    /// fires when the condition is false.
    fn compile_if(&mut self, statement: &[Spanned]) -> Result<(), CompileError> {
        let [keyword, a, op, b] = statement else {
            return Err(CompileError::arity(&statement[0], statement.len(), IF_FORM));
        };
        expect_operand(a)?;
        expect_operand(b)?;
        let mnemonic = self.comparison(op)?;

        let taken = self.instructions.len() + 2;
        self.instructions.push(Instruction::Jump {
            target: Some(taken),
            condition: Condition::Compare {
                mnemonic: mnemonic.to_string(),
                a: a.token.text().to_string(),
                b: b.token.text().to_string(),
            },
        });
        self.push_pending(BlockKind::If, Condition::Always, keyword.span);

        Ok(())
    }

    fn compile_endif(&mut self, statement: &[Spanned]) -> Result<(), CompileError> {
        let closer = expect_bare(statement, "endif")?;
        let pending = self
            .if_stack
            .pop()
            .ok_or_else(|| CompileError::unmatched_closer(closer, BlockKind::If.opener()))?;

        let here = self.instructions.len();
        self.patch(pending, here)
    }

    /// Layout, relative to the `set` at index n:
    ///
    /// ```text
    /// n:   set v init
    /// n+1: jump n+3 always          ; skip the step on entry
    /// n+2: <step>                   ; endfor jumps back here
    /// n+3: op <cmp> check lhs rhs
    /// n+4: jump <exit> equal check false
    /// ```
    fn compile_for(&mut self, statement: &[Spanned]) -> Result<(), CompileError> {
        let keyword = &statement[0];
        let (condition, step) = match statement.len() {
            7 => (&statement[4..7], None),
            8 => (&statement[5..8], None),
            12 => (&statement[4..7], Some(&statement[7..12])),
            14 => (&statement[5..8], Some(&statement[9..14])),
            n => return Err(CompileError::arity(keyword, n, FOR_FORM)),
        };

        let var = expect_variable(&statement[1])?;
        expect_assign(&statement[2])?;
        let init = expect_operand(&statement[3])?;

        let [lhs, cmp, rhs] = condition else {
            return Err(CompileError::internal("for condition slice is three tokens"));
        };
        expect_operand(lhs)?;
        expect_operand(rhs)?;
        let cmp = self.comparison(cmp)?;

        let step = match step {
            Some([step_var, assign, a, op, b]) => {
                let step_var = expect_variable(step_var)?;
                expect_assign(assign)?;
                let a = expect_operand(a)?;
                let b = expect_operand(b)?;
                self.lower_binary(step_var, a, op, b)?
            }
            Some(_) => return Err(CompileError::internal("for step slice is five tokens")),
            None => Instruction::Op {
                mnemonic: "add".to_string(),
                dest: var.to_string(),
                a: var.to_string(),
                b: "1".to_string(),
            },
        };

        self.instructions.push(Instruction::Set {
            dest: var.to_string(),
            value: init.to_string(),
        });
        let test = self.instructions.len() + 2;
        self.instructions.push(Instruction::Jump {
            target: Some(test),
            condition: Condition::Always,
        });
        self.instructions.push(step);
        self.instructions.push(Instruction::Op {
            mnemonic: cmp.to_string(),
            dest: LOOP_CHECK_VAR.to_string(),
            a: lhs.token.text().to_string(),
            b: rhs.token.text().to_string(),
        });
        self.push_pending(
            BlockKind::For,
            Condition::Compare {
                mnemonic: "equal".to_string(),
                a: LOOP_CHECK_VAR.to_string(),
                b: "false".to_string(),
            },
            keyword.span,
        );

        Ok(())
    }

    /// Exit lands just past the back-jump, which returns to the step.
    fn compile_endfor(&mut self, statement: &[Spanned]) -> Result<(), CompileError> {
        let closer = expect_bare(statement, "endfor")?;
        let pending = self
            .for_stack
            .pop()
            .ok_or_else(|| CompileError::unmatched_closer(closer, BlockKind::For.opener()))?;

        let exit = self.instructions.len() + 1;
        self.patch(pending, exit)?;

        // The exit jump sits two instructions after the step.
        self.instructions.push(Instruction::Jump {
            target: Some(pending.index - 2),
            condition: Condition::Always,
        });

        Ok(())
    }

    fn compile_print(&mut self, statement: &[Spanned]) -> Result<(), CompileError> {
        let [_, value, device] = statement else {
            return Err(CompileError::arity(&statement[0], statement.len(), PRINT_FORM));
        };
        let value = expect_operand(value)?;
        let device = expect_operand(device)?;

        self.instructions.push(Instruction::Print(value.to_string()));
        self.instructions
            .push(Instruction::PrintFlush(device.to_string()));

        Ok(())
    }

    fn push_pending(&mut self, kind: BlockKind, condition: Condition, opened_at: Span) {
        let pending = PendingJump {
            index: self.instructions.len(),
            kind,
            opened_at,
        };
        self.instructions.push(Instruction::Jump {
            target: None,
            condition,
        });

        match kind {
            BlockKind::If => self.if_stack.push(pending),
            BlockKind::For => self.for_stack.push(pending),
        }
    }

    /// Each placeholder is resolved exactly once.
    fn patch(&mut self, pending: PendingJump, line: usize) -> Result<(), CompileError> {
        match self.instructions.get_mut(pending.index) {
            Some(Instruction::Jump { target, .. }) if target.is_none() => {
                *target = Some(line);
                Ok(())
            }
            _ => Err(CompileError::internal(format!(
                "no unresolved jump at instruction {} for '{}'",
                pending.index,
                pending.kind.opener()
            ))),
        }
    }
}

fn expect_operand(s: &Spanned) -> Result<&str, CompileError> {
    if s.token.is_operand() {
        Ok(s.token.text())
    } else {
        Err(CompileError::expected_operand(s))
    }
}

fn expect_variable(s: &Spanned) -> Result<&str, CompileError> {
    match &s.token {
        Token::Variable(name) => Ok(name),
        _ => Err(CompileError::syntax(
            s,
            format!("expected a variable, found {} '{}'", s.token.kind(), s.token),
        )),
    }
}

fn expect_assign(s: &Spanned) -> Result<(), CompileError> {
    if s.token.is_operator(ASSIGN_OPERATOR) {
        Ok(())
    } else {
        Err(CompileError::syntax(
            s,
            format!("expected '=', found '{}'", s.token),
        ))
    }
}

/// Closers take no arguments.
fn expect_bare<'s>(statement: &'s [Spanned], closer: &str) -> Result<&'s Spanned, CompileError> {
    match statement {
        [only] => Ok(only),
        _ => Err(CompileError::arity(&statement[0], statement.len(), closer)),
    }
}
