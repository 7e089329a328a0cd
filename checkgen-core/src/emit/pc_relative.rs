//! Instructions that read or write the program counter.
//!
//! Register 0 is used as scratch by every case in this family. When it holds a
//! program counter value it is excluded from the final check, since the mirror
//! cannot know where the case was placed.

use crate::{
    config::{NOT_TAKEN_SENTINEL, PC_CORRECTION, TAKEN_SENTINEL},
    error::{GenError, GenResult},
    program::{CaseHeader, Program},
    reg::registers::{InitPattern, RegisterId},
};

use super::load_store::Addressing;

const TARGET: &str = "3";

fn check_operand(id: RegisterId) -> GenResult<()> {
    if id == RegisterId::R0 {
        return Err(GenError::ReservedRegister(id.to_string()));
    }

    Ok(())
}

/// Emit a link capture, `rd <- $pc + offset`, measured against a plain `$pc` read.
///
/// # Arguments
///
/// * `program` - The [`Program`] receiving the case.
/// * `rd` - The destination register. Must not be register 0.
/// * `offset` - The offset added to the program counter.
pub fn link(program: &mut Program, rd: RegisterId, offset: i32) -> GenResult<()> {
    check_operand(rd)?;

    let header = CaseHeader::new("link").arg("rd", rd).arg("offset", offset);
    let mut case = program.begin_case(InitPattern::Integer, header);
    case.setup()?;

    case.begin_test();
    case.line("$r0 <- $pc");
    case.line(&format!("{rd} <- $pc + {offset}"));
    case.line(&format!("{rd} <- {rd} - $r0"));
    case.end_test();

    case.regs_mut().write(rd, PC_CORRECTION + offset as i64);
    case.verify_except(&[RegisterId::R0])
}

/// Emit a read of the task program counter, measured against a plain `$pc` read.
///
/// # Arguments
///
/// * `program` - The [`Program`] receiving the case.
/// * `rd` - The destination register. Must not be register 0.
pub fn tpc_get(program: &mut Program, rd: RegisterId) -> GenResult<()> {
    check_operand(rd)?;

    let header = CaseHeader::new("tpc_get").arg("rd", rd);
    let mut case = program.begin_case(InitPattern::Integer, header);
    case.setup()?;

    case.begin_test();
    case.line("$r0 <- $pc");
    case.line(&format!("{rd} <- $tpc"));
    case.line(&format!("{rd} <- {rd} - $r0"));
    case.end_test();

    case.regs_mut().write(rd, PC_CORRECTION);
    case.verify_except(&[RegisterId::R0])
}

/// Emit an indirect jump through `$pc` or `$tpc`.
///
/// # Arguments
///
/// * `program` - The [`Program`] receiving the case.
/// * `rd` - The register holding the jump target. Must not be register 0.
/// * `via_tpc` - Jump by writing `$tpc` rather than `$pc`?
pub fn indirect_jump(program: &mut Program, rd: RegisterId, via_tpc: bool) -> GenResult<()> {
    check_operand(rd)?;

    let header = CaseHeader::new("indirect_jump")
        .arg("rd", rd)
        .arg("via_tpc", via_tpc);
    let mut case = program.begin_case(InitPattern::Integer, header);
    case.setup()?;

    let counter = if via_tpc { "$tpc" } else { "$pc" };

    case.begin_test();
    case.line(&format!("$r0 <- {TAKEN_SENTINEL:#x}"));
    case.line(&format!("{rd} <- {TARGET}f"));
    case.line(&format!("{counter} <- {rd}"));
    case.line(&format!("$r0 <- {NOT_TAKEN_SENTINEL:#x}"));
    case.label(TARGET);
    case.line(&format!("{rd} <- $r0"));
    case.end_test();

    case.regs_mut().write(RegisterId::R0, TAKEN_SENTINEL as i64);
    case.regs_mut().write(rd, TAKEN_SENTINEL as i64);
    case.verify()
}

/// Emit a jump through a code address stored in memory, `$pc <- mem[...]`.
///
/// # Arguments
///
/// * `program` - The [`Program`] receiving the case.
/// * `addressing` - The [`Addressing`] mode of the memory operand. A base register
///   must not be register 0.
pub fn pc_load(program: &mut Program, addressing: Addressing) -> GenResult<()> {
    if let Some(base) = addressing.base() {
        check_operand(base)?;
    }

    let header = CaseHeader::new("pc_load").arg("addr", addressing);
    let mut case = program.begin_case(InitPattern::Integer, header);
    case.setup()?;

    let mem = addressing.reference(None, case.config());

    case.begin_test();
    case.line(&format!("$r0 <- {TARGET}f"));
    addressing.load_base(&mut case);
    case.line(&format!("{mem} <- $r0"));
    case.line(&format!("$r0 <- {TAKEN_SENTINEL:#x}"));
    case.line(&format!("$pc <- {mem}"));
    case.line(&format!("$r0 <- {NOT_TAKEN_SENTINEL:#x}"));
    case.label(TARGET);
    if let Some(base) = addressing.base() {
        case.line(&format!("{base} <- $r0"));
    }
    case.end_test();

    case.regs_mut().write(RegisterId::R0, TAKEN_SENTINEL as i64);
    if let Some(base) = addressing.base() {
        case.regs_mut().write(base, TAKEN_SENTINEL as i64);
    }

    case.verify()
}
