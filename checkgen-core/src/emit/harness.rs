//! The self-checking protocol of a generated program.
//!
//! Every test case ends with a verification block. For each checked register
//! `i` the block is in the `Checking(i)` state: it subtracts the expected value
//! from the live register and branches towards the shared failure path when the
//! difference is non-zero. The mirror slot is then zeroed, since the register
//! now holds zero on the target when the check passes, which makes a repeated
//! check of the same register trivially pass.
//!
//! Falling through every check of every case reaches the pass sequence. Any
//! taken branch reaches the fail sequence. Both sequences write a fixed string
//! to standard output and exit with the same status, so the outcome is only
//! visible in the printed text.

use std::fmt::Write;

use crate::{
    config::TargetConfig,
    error::GenResult,
    reg::{
        operand::{Render, View},
        registers::{RegisterId, Registers},
    },
};

/// Indentation of an instruction line.
pub const INDENT: &str = "        ";
/// Indentation of a label line.
pub const LABEL_INDENT: &str = "    ";
/// The label of the shared failure path.
pub const FAIL_LABEL: &str = ".Lfail";
/// The marker preceding the instructions under test.
pub const BEGIN_MARKER: &str = "#>>>>>>>";
/// The marker following the instructions under test.
pub const END_MARKER: &str = "#<<<<<<<";

/// The state of the verification of one test case.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum CheckState {
    /// The register with the given position in the check list is being compared.
    Checking(usize),
    /// Every register has been compared. The program moves on to the next case.
    Done,
}

/// Walks the registers of a check list and emits one comparison per register.
pub struct Verifier<'a> {
    ids: &'a [RegisterId],
    state: CheckState,
}

impl<'a> Verifier<'a> {
    pub fn new(ids: &'a [RegisterId]) -> Self {
        let state = if ids.is_empty() {
            CheckState::Done
        } else {
            CheckState::Checking(0)
        };

        Self { ids, state }
    }

    #[inline(always)]
    pub fn state(&self) -> CheckState {
        self.state
    }

    /// Emit the comparison for the current register and advance.
    ///
    /// # Arguments
    ///
    /// * `out` - The buffer receiving the emitted text.
    /// * `regs` - The mirror. The checked register is zeroed.
    pub fn step(&mut self, out: &mut String, regs: &mut Registers) -> GenResult<CheckState> {
        let CheckState::Checking(position) = self.state else {
            return Ok(self.state);
        };

        let id = self.ids[position];
        let reg = regs.get(id);
        let name = reg.render(View::Reg)?;
        let expected = reg.render(View::Val)?;

        let _ = writeln!(out, "{INDENT}{name} <- {name} + (-{expected})");
        let _ = writeln!(out, "{INDENT}if {name} != 0 $pc <- 1f");
        regs.write(id, 0);

        self.state = if position + 1 < self.ids.len() {
            CheckState::Checking(position + 1)
        } else {
            CheckState::Done
        };

        Ok(self.state)
    }

    /// Emit every remaining comparison, followed by the branch into the failure path.
    pub fn run(mut self, out: &mut String, regs: &mut Registers) -> GenResult<()> {
        while self.step(out, regs)? != CheckState::Done {}

        let _ = writeln!(out, "{INDENT}$pc <- 2f");
        let _ = writeln!(out, "{LABEL_INDENT}1:");
        let _ = writeln!(out, "{INDENT}$pc <- {FAIL_LABEL}");
        let _ = writeln!(out, "{LABEL_INDENT}2:");

        Ok(())
    }
}

/// Emit the program header, the read-only strings and the entry point.
pub fn prologue(out: &mut String, config: &TargetConfig) {
    let _ = writeln!(out, "# mach: {}", config.machine);
    let _ = writeln!(out, ".section .rodata");
    let _ = writeln!(out, "{LABEL_INDENT}.p2align 2");
    let _ = writeln!(out, "{LABEL_INDENT}.Lstr_pass:");
    let _ = writeln!(out, "{INDENT}.string \"{}\"", config.escaped_pass_message());
    let _ = writeln!(out, "{LABEL_INDENT}.Lstr_pass_end:");
    let _ = writeln!(out, "{LABEL_INDENT}.Lstr_fail:");
    let _ = writeln!(out, "{INDENT}.string \"{}\"", config.escaped_fail_message());
    let _ = writeln!(out, "{LABEL_INDENT}.Lstr_fail_end:");
    let _ = writeln!(out);
    let _ = writeln!(out, ".text");
    let _ = writeln!(out, "{LABEL_INDENT}.global _start");
    let _ = writeln!(out, "{LABEL_INDENT}_start:");
}

/// Write one of the fixed strings to standard output and exit.
fn report(out: &mut String, config: &TargetConfig, label: &str) {
    let _ = writeln!(out, "{INDENT}$r3 <- $r3 ^ $r3");
    let _ = writeln!(out, "{INDENT}$r4 <- {}", config.stdout_fd);
    let _ = writeln!(out, "{INDENT}$r5 <- {label}");
    let _ = writeln!(out, "{INDENT}$r6 <- ({label}_end - 1)");
    let _ = writeln!(out, "{INDENT}$r6 <- $r6 - $r5");
    let _ = writeln!(out, "{INDENT}syscall");
    let _ = writeln!(out, "{INDENT}.hword {}", config.sys_write);
    let _ = writeln!(out, "{INDENT}$r4 <- {}", config.exit_status);
    let _ = writeln!(out, "{INDENT}syscall");
    let _ = writeln!(out, "{INDENT}.hword {}", config.sys_exit);
}

/// Emit the pass sequence, reached by falling through every check.
pub fn pass_sequence(out: &mut String, config: &TargetConfig) {
    report(out, config, ".Lstr_pass");
}

/// Emit the shared fail sequence, reached only through a failed check.
pub fn fail_sequence(out: &mut String, config: &TargetConfig) {
    let _ = writeln!(out, "{LABEL_INDENT}{FAIL_LABEL}:");
    report(out, config, ".Lstr_fail");
}
