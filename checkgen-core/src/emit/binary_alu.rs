//! The wide ALU family.
//!
//! Shift distances are reduced to their low 5 bits before shifting, matching the
//! hardware shifter. The signed form is masked too, so every form of this family
//! shares one shift rule. The basic family keeps unmasked shifts. The unsigned and
//! signed forms can also request the upper 32 bits of the 64-bit result.

use crate::{
    error::GenResult,
    eval::{evaluator::ShiftRule, operator::Operator},
    program::Program,
    reg::operand::Operand,
};

use super::{BinaryCase, Signature};

const FAMILY: &str = "binary_alu";

fn case(
    signature: Signature,
    rd: Operand,
    lhs: Operand,
    rhs: Operand,
    op: Operator,
    upper: bool,
) -> BinaryCase {
    BinaryCase {
        family: FAMILY,
        signature,
        rd,
        lhs,
        rhs,
        op,
        domains: signature.domains(),
        rule: ShiftRule::Masked,
        upper,
    }
}

/// Emit an unsigned case, `rd <- [upper] a op b`.
///
/// # Arguments
///
/// * `program` - The [`Program`] receiving the case.
/// * `rd` - The destination. Must be a register.
/// * `lhs` - The left source.
/// * `rhs` - The right source.
/// * `op` - The [`Operator`] under test.
/// * `upper` - Should the destination receive the upper half of the 64-bit result?
pub fn uuu(
    program: &mut Program,
    rd: Operand,
    lhs: Operand,
    rhs: Operand,
    op: Operator,
    upper: bool,
) -> GenResult<()> {
    case(Signature::Uuu, rd, lhs, rhs, op, upper).emit(program)
}

/// Emit a signed case, `$srd <- [upper] $sa op $sb`.
///
/// The upper half of a signed result is taken with an arithmetic shift.
pub fn sss(
    program: &mut Program,
    rd: Operand,
    lhs: Operand,
    rhs: Operand,
    op: Operator,
    upper: bool,
) -> GenResult<()> {
    case(Signature::Sss, rd, lhs, rhs, op, upper).emit(program)
}

pub fn ssu(program: &mut Program, rd: Operand, lhs: Operand, rhs: Operand, op: Operator) -> GenResult<()> {
    case(Signature::Ssu, rd, lhs, rhs, op, false).emit(program)
}

pub fn fff(program: &mut Program, rd: Operand, lhs: Operand, rhs: Operand, op: Operator) -> GenResult<()> {
    case(Signature::Fff, rd, lhs, rhs, op, false).emit(program)
}
