use crate::{
    error::{GenError, GenResult},
    utils,
};

use super::{
    domain::{Domain, Scalar},
    operator::Operator,
};

/// How a shift distance is treated before the shift is applied.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ShiftRule {
    /// The distance is reduced to its low 5 bits, as the hardware shifter does.
    /// Used by the binary ALU family.
    Masked,
    /// The distance is used as-is. Used by the basic ALU family.
    Unmasked,
}

/// The result of applying an operator.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Outcome {
    /// A 32-bit result, already reduced modulo 2^32.
    Bits(u32),
    /// The result of a comparison.
    Flag(bool),
}

impl Outcome {
    /// The bit pattern of this outcome. Comparisons produce 1 or 0.
    pub fn bits(&self) -> u32 {
        match self {
            Outcome::Bits(bits) => *bits,
            Outcome::Flag(flag) => *flag as u32,
        }
    }

    /// The boolean value of this outcome. Values are true when non-zero.
    pub fn flag(&self) -> bool {
        match self {
            Outcome::Bits(bits) => *bits != 0,
            Outcome::Flag(flag) => *flag,
        }
    }
}

/// The width of a memory access.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum AccessSize {
    Byte = 8,
    Half = 16,
    Word = 32,
}

impl AccessSize {
    pub fn bits(&self) -> u32 {
        *self as u32
    }
}

#[inline(always)]
fn mask32(value: i128) -> u32 {
    (value & 0xffff_ffff) as u32
}

fn shift_distance(rhs: i128, rule: ShiftRule) -> GenResult<u32> {
    match rule {
        ShiftRule::Masked => Ok((rhs & 31) as u32),
        ShiftRule::Unmasked => {
            if rhs < 0 {
                return Err(GenError::NegativeShift(rhs as i64));
            }

            // Anything beyond the width of the intermediate behaves the same.
            Ok(rhs.min(127) as u32)
        }
    }
}

/// Apply an integer operator without reducing the result.
fn apply_int(op: Operator, lhs: i128, rhs: i128, rule: ShiftRule) -> GenResult<i128> {
    Ok(match op {
        Operator::Add => lhs + rhs,
        Operator::Sub => lhs - rhs,
        Operator::Mul => lhs * rhs,
        Operator::And => lhs & rhs,
        Operator::Or => lhs | rhs,
        Operator::Xor => lhs ^ rhs,
        Operator::Shl => {
            let distance = shift_distance(rhs, rule)?;
            // Every bit of a 32-bit result is zero past this point.
            if distance >= 64 { 0 } else { lhs << distance }
        }
        Operator::Shr => lhs >> shift_distance(rhs, rule)?,
        Operator::Eq => (lhs == rhs) as i128,
        Operator::Ne => (lhs != rhs) as i128,
        Operator::Lt => (lhs < rhs) as i128,
        Operator::Le => (lhs <= rhs) as i128,
        Operator::Gt => (lhs > rhs) as i128,
        Operator::Ge => (lhs >= rhs) as i128,
    })
}

fn apply_float(op: Operator, lhs: f32, rhs: f32) -> GenResult<Outcome> {
    Ok(match op {
        Operator::Add => Outcome::Bits(utils::bits_from_float(lhs + rhs)),
        Operator::Sub => Outcome::Bits(utils::bits_from_float(lhs - rhs)),
        Operator::Mul => Outcome::Bits(utils::bits_from_float(lhs * rhs)),
        Operator::Eq => Outcome::Flag(lhs == rhs),
        Operator::Ne => Outcome::Flag(lhs != rhs),
        Operator::Lt => Outcome::Flag(lhs < rhs),
        Operator::Le => Outcome::Flag(lhs <= rhs),
        Operator::Gt => Outcome::Flag(lhs > rhs),
        Operator::Ge => Outcome::Flag(lhs >= rhs),
        Operator::And | Operator::Or | Operator::Xor | Operator::Shl | Operator::Shr => {
            return Err(GenError::UnsupportedOperation {
                op,
                domain: Domain::Float.name(),
            });
        }
    })
}

/// Apply an operator to two interpreted operands.
///
/// Arithmetic and bitwise results are reduced modulo 2^32, so signed overflow wraps
/// silently exactly as it does on the target. If either side is a float the operation
/// is carried out in single precision.
///
/// # Arguments
///
/// * `op` - The [`Operator`] to be applied.
/// * `lhs` - The left hand operand.
/// * `rhs` - The right hand operand.
/// * `rule` - The [`ShiftRule`] used for shift distances.
pub fn apply(op: Operator, lhs: Scalar, rhs: Scalar, rule: ShiftRule) -> GenResult<Outcome> {
    match (lhs, rhs) {
        (Scalar::Int(a), Scalar::Int(b)) => {
            let raw = apply_int(op, a, b, rule)?;
            if op.is_comparison() {
                Ok(Outcome::Flag(raw != 0))
            } else {
                Ok(Outcome::Bits(mask32(raw)))
            }
        }
        _ => apply_float(op, lhs.as_float(), rhs.as_float()),
    }
}

/// Apply an operator and keep the upper 32 bits of the 64-bit result.
///
/// Unsigned results are reduced to 64 bits before the upper half is taken, signed results
/// are shifted arithmetically.
///
/// # Arguments
///
/// * `op` - The [`Operator`] to be applied, normally [`Operator::Mul`].
/// * `lhs` - The left hand operand.
/// * `rhs` - The right hand operand.
/// * `rule` - The [`ShiftRule`] used for shift distances.
/// * `signed` - Is the full-width result signed?
pub fn apply_upper(
    op: Operator,
    lhs: Scalar,
    rhs: Scalar,
    rule: ShiftRule,
    signed: bool,
) -> GenResult<u32> {
    let (Scalar::Int(a), Scalar::Int(b)) = (lhs, rhs) else {
        return Err(GenError::UnsupportedOperation {
            op,
            domain: Domain::Float.name(),
        });
    };

    let raw = apply_int(op, a, b, rule)?;
    let upper = if signed {
        raw >> 32
    } else {
        (raw & 0xffff_ffff_ffff_ffff) >> 32
    };

    Ok(mask32(upper))
}

/// The value a sub-word load produces from a stored register value.
///
/// # Arguments
///
/// * `value` - The stored 32-bit value.
/// * `size` - The [`AccessSize`] of the store and the load.
/// * `sign_extend` - Does the load sign extend?
pub fn load_extend(value: u32, size: AccessSize, sign_extend: bool) -> u32 {
    match (size, sign_extend) {
        (AccessSize::Byte, true) => utils::sign_extend_byte(value),
        (AccessSize::Byte, false) => value & 0xff,
        (AccessSize::Half, true) => utils::sign_extend_half(value),
        (AccessSize::Half, false) => value & 0xffff,
        (AccessSize::Word, _) => value,
    }
}
