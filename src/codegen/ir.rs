use crate::codegen::Instruction;
use serde::{Deserialize, Serialize};

/// A compiled target program.
///
/// Convention: the last instruction is always `end`, and every jump target is
/// resolved. Only the generator builds one from source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Program {
    pub instructions: Vec<Instruction>,
}

impl Program {
    pub fn len(&self) -> usize {
        self.instructions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.instructions.is_empty()
    }

    /// Compact binary image of the program.
    pub fn to_bytes(&self) -> Result<Vec<u8>, postcard::Error> {
        postcard::to_allocvec(self)
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self, postcard::Error> {
        postcard::from_bytes(bytes)
    }
}

/// One instruction per line, each line newline-terminated.
impl std::fmt::Display for Program {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for instruction in &self.instructions {
            writeln!(f, "{}", instruction)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codegen::Condition;

    fn sample() -> Program {
        Program {
            instructions: vec![
                Instruction::Jump {
                    target: Some(2),
                    condition: Condition::Compare {
                        mnemonic: "lessThan".into(),
                        a: "a".into(),
                        b: "b".into(),
                    },
                },
                Instruction::Jump {
                    target: Some(3),
                    condition: Condition::Always,
                },
                Instruction::Set {
                    dest: "c".into(),
                    value: "1".into(),
                },
                Instruction::End,
            ],
        }
    }

    #[test]
    fn test_text_rendering() {
        assert_eq!(
            sample().to_string(),
            "jump 2 lessThan a b\njump 3 always\nset c 1\nend\n"
        );
    }

    #[test]
    fn test_binary_image_reloads() {
        let program = sample();
        let bytes = program.to_bytes().unwrap();
        assert_eq!(Program::from_bytes(&bytes).unwrap(), program);
    }

    #[test]
    fn test_truncated_image_is_rejected() {
        let bytes = sample().to_bytes().unwrap();
        assert!(Program::from_bytes(&bytes[..bytes.len() / 2]).is_err());
    }
}
