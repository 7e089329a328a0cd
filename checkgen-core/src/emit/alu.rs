//! The basic ALU family.
//!
//! Shift distances are used as-is, without the 5 bit mask applied by the wide
//! family. In the unsigned form every source keeps its natural reading: short
//! immediates are signed, registers and full immediates are raw bit patterns.

use crate::{
    error::GenResult,
    eval::{domain::Domain, evaluator::ShiftRule, operator::Operator},
    program::Program,
    reg::operand::Operand,
};

use super::{BinaryCase, Signature};

const FAMILY: &str = "alu";

fn case(signature: Signature, rd: Operand, lhs: Operand, rhs: Operand, op: Operator) -> BinaryCase {
    let domains = match signature {
        Signature::Uuu => (Domain::natural(&lhs), Domain::natural(&rhs)),
        _ => signature.domains(),
    };

    BinaryCase {
        family: FAMILY,
        signature,
        rd,
        lhs,
        rhs,
        op,
        domains,
        rule: ShiftRule::Unmasked,
        upper: false,
    }
}

/// Emit an unsigned case, `rd <- a op b`.
///
/// # Arguments
///
/// * `program` - The [`Program`] receiving the case.
/// * `rd` - The destination. Must be a register.
/// * `lhs` - The left source.
/// * `rhs` - The right source.
/// * `op` - The [`Operator`] under test.
pub fn uuu(program: &mut Program, rd: Operand, lhs: Operand, rhs: Operand, op: Operator) -> GenResult<()> {
    case(Signature::Uuu, rd, lhs, rhs, op).emit(program)
}

/// Emit a signed case, `$srd <- $sa op $sb`.
pub fn sss(program: &mut Program, rd: Operand, lhs: Operand, rhs: Operand, op: Operator) -> GenResult<()> {
    case(Signature::Sss, rd, lhs, rhs, op).emit(program)
}

/// Emit a mixed case with a signed left and an unsigned right source.
pub fn ssu(program: &mut Program, rd: Operand, lhs: Operand, rhs: Operand, op: Operator) -> GenResult<()> {
    case(Signature::Ssu, rd, lhs, rhs, op).emit(program)
}

/// Emit a float case. The mirror is initialised with the float pattern.
pub fn fff(program: &mut Program, rd: Operand, lhs: Operand, rhs: Operand, op: Operator) -> GenResult<()> {
    case(Signature::Fff, rd, lhs, rhs, op).emit(program)
}
