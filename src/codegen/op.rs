use serde::{Deserialize, Serialize};

// =============================================================================
// INSTRUCTION - one line of the target program
// =============================================================================

/// When a `jump` is taken.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Condition {
    Always,
    /// `jump <line> <mnemonic> <a> <b>`
    Compare { mnemonic: String, a: String, b: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Instruction {
    /// `set <dest> <value>`
    Set { dest: String, value: String },

    /// `op <mnemonic> <dest> <a> <b>`
    Op {
        mnemonic: String,
        dest: String,
        a: String,
        b: String,
    },

    /// `sensor <dest> <object> <property>`
    Sensor {
        dest: String,
        object: String,
        property: String,
    },

    /// Absolute jump to an instruction index.
    /// `target` stays `None` until the closing keyword of its block is seen.
    Jump {
        target: Option<usize>,
        condition: Condition,
    },

    Print(String),
    PrintFlush(String),

    End,
}

impl Instruction {
    pub fn jump_target(&self) -> Option<usize> {
        match self {
            Instruction::Jump { target, .. } => *target,
            _ => None,
        }
    }

    pub fn is_unresolved_jump(&self) -> bool {
        matches!(self, Instruction::Jump { target: None, .. })
    }
}

impl std::fmt::Display for Instruction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Instruction::Set { dest, value } => write!(f, "set {} {}", dest, value),
            Instruction::Op {
                mnemonic,
                dest,
                a,
                b,
            } => write!(f, "op {} {} {} {}", mnemonic, dest, a, b),
            Instruction::Sensor {
                dest,
                object,
                property,
            } => write!(f, "sensor {} {} {}", dest, object, property),
            Instruction::Jump { target, condition } => {
                match target {
                    Some(line) => write!(f, "jump {}", line)?,
                    None => write!(f, "jump -")?,
                }
                match condition {
                    Condition::Always => write!(f, " always"),
                    Condition::Compare { mnemonic, a, b } => {
                        write!(f, " {} {} {}", mnemonic, a, b)
                    }
                }
            }
            Instruction::Print(value) => write!(f, "print {}", value),
            Instruction::PrintFlush(device) => write!(f, "printflush {}", device),
            Instruction::End => write!(f, "end"),
        }
    }
}
