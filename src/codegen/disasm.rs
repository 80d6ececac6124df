use std::fmt::Write;

use crate::codegen::Program;

/// Plain numbered listing: `<index>. <instruction>`, indices left-aligned to
/// the width of the last one.
pub fn numbered(program: &Program) -> String {
    let width = program.len().saturating_sub(1).to_string().len();
    let mut out = String::new();

    for (ip, instruction) in program.instructions.iter().enumerate() {
        let _ = writeln!(out, "{:<width$}. {}", ip, instruction, width = width);
    }
    out
}

/// Listing with jump targets marked, for reading control flow by eye.
pub fn disassemble(program: &Program) -> String {
    let jump_targets = collect_jump_targets(program);
    let mut out = String::new();

    for (ip, instruction) in program.instructions.iter().enumerate() {
        if jump_targets.contains(&ip) {
            let _ = writeln!(out, "      ┌──────────────────────────────────");
        }

        let marker = if jump_targets.contains(&ip) { "►" } else { " " };
        let _ = write!(out, "{:04} {} {}", ip, marker, instruction);

        if let Some(target) = instruction.jump_target() {
            if target >= program.len() {
                let _ = write!(out, "    ; past end");
            } else if target <= ip {
                let _ = write!(out, "    ; back");
            }
        }
        out.push('\n');
    }
    out
}

fn collect_jump_targets(program: &Program) -> Vec<usize> {
    let mut targets = Vec::new();

    for instruction in &program.instructions {
        if let Some(target) = instruction.jump_target() {
            if !targets.contains(&target) {
                targets.push(target);
            }
        }
    }

    targets
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codegen::{Condition, Instruction};

    fn set(dest: &str) -> Instruction {
        Instruction::Set {
            dest: dest.into(),
            value: "0".into(),
        }
    }

    #[test]
    fn test_numbered_pads_to_widest_index() {
        let mut instructions: Vec<Instruction> = (0..10).map(|_| set("x")).collect();
        instructions.push(Instruction::End);
        let listing = numbered(&Program { instructions });
        let lines: Vec<&str> = listing.lines().collect();

        assert_eq!(lines.len(), 11);
        assert_eq!(lines[0], "0 . set x 0");
        assert_eq!(lines[9], "9 . set x 0");
        assert_eq!(lines[10], "10. end");
    }

    #[test]
    fn test_numbered_single_digit() {
        let program = Program {
            instructions: vec![set("x"), Instruction::End],
        };
        assert_eq!(numbered(&program), "0. set x 0\n1. end\n");
    }

    #[test]
    fn test_disassemble_marks_targets() {
        let program = Program {
            instructions: vec![
                set("i"),
                Instruction::Jump {
                    target: Some(0),
                    condition: Condition::Always,
                },
                Instruction::End,
            ],
        };
        let out = disassemble(&program);
        let lines: Vec<&str> = out.lines().collect();

        assert!(lines[0].starts_with("      ┌"));
        assert_eq!(lines[1], "0000 ► set i 0");
        assert_eq!(lines[2], "0001   jump 0 always    ; back");
        assert_eq!(lines[3], "0002   end");
    }
}
