use core::fmt;
use std::fmt::Display;

use strum_macros::EnumIter;

use crate::{
    error::{GenError, GenResult},
    reg::{operand::View, registers::InitPattern},
    utils,
};

/// 2^63, the first float magnitude whose floor no longer fits in an i64.
const I64_LIMIT: f32 = 9_223_372_036_854_775_808.0;

/// A single-operand operation exercised by the unary ALU family.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, EnumIter)]
pub enum UnaryOp {
    Increment,
    Decrement,
    /// Bitwise complement.
    Not,
    /// Two's complement negation of a signed value.
    Negate,
    /// Reverse the four byte lanes.
    ByteSwap,
    /// Swap the two 16-bit halves.
    WordSwap,
    /// Sign extend the lowest byte.
    SignExtendByte,
    /// Sign extend the lowest half-word.
    SignExtendHalf,
    /// Round a float down to a signed integer.
    Floor,
    /// Convert a signed integer to a float.
    IntToFloat,
    /// The float reciprocal, `1/x`.
    Reciprocal,
    /// The float reciprocal square root, `1/sqrt(x)`.
    ReciprocalSqrt,
}

impl UnaryOp {
    /// The view used to name the destination register.
    pub fn dest_view(&self) -> View {
        match self {
            UnaryOp::Negate | UnaryOp::SignExtendByte | UnaryOp::SignExtendHalf | UnaryOp::Floor => {
                View::RegSigned
            }
            UnaryOp::IntToFloat | UnaryOp::Reciprocal | UnaryOp::ReciprocalSqrt => View::RegFloat,
            _ => View::Reg,
        }
    }

    /// The view used to name the source register.
    pub fn source_view(&self) -> View {
        match self {
            UnaryOp::Negate | UnaryOp::IntToFloat => View::RegSigned,
            UnaryOp::Floor | UnaryOp::Reciprocal | UnaryOp::ReciprocalSqrt => View::RegFloat,
            _ => View::Reg,
        }
    }

    /// The mirror pattern the operation is normally exercised with.
    pub fn default_init(&self) -> InitPattern {
        match self {
            UnaryOp::Floor | UnaryOp::Reciprocal | UnaryOp::ReciprocalSqrt => InitPattern::Float,
            _ => InitPattern::Integer,
        }
    }

    /// Render the right hand side of the instruction.
    ///
    /// # Arguments
    ///
    /// * `source` - The already rendered source register.
    pub fn expression(&self, source: &str) -> String {
        match self {
            UnaryOp::Increment => format!("{source} + 1"),
            UnaryOp::Decrement => format!("{source} - 1"),
            UnaryOp::Not => format!("~{source}"),
            UnaryOp::Negate => format!("-{source}"),
            UnaryOp::ByteSwap => format!("bswap {source}"),
            UnaryOp::WordSwap => format!("wswap {source}"),
            UnaryOp::SignExtendByte => format!("bsi {source}"),
            UnaryOp::SignExtendHalf => format!("wsi {source}"),
            UnaryOp::Floor => format!("floor {source}"),
            UnaryOp::IntToFloat => source.to_string(),
            UnaryOp::Reciprocal => format!("1/{source}"),
            UnaryOp::ReciprocalSqrt => format!("rsqrt {source}"),
        }
    }

    /// Compute the expected result for a source register value.
    ///
    /// # Arguments
    ///
    /// * `input` - The bit pattern held by the source register.
    ///
    /// # Returns
    ///
    /// The bit pattern the destination register must hold.
    pub fn apply(&self, input: u32) -> GenResult<u32> {
        Ok(match self {
            UnaryOp::Increment => input.wrapping_add(1),
            UnaryOp::Decrement => input.wrapping_sub(1),
            UnaryOp::Not => !input,
            UnaryOp::Negate => utils::unsigned32(-(utils::signed32(input) as i64)),
            UnaryOp::ByteSwap => utils::byte_swap(input),
            UnaryOp::WordSwap => utils::word_swap(input),
            UnaryOp::SignExtendByte => utils::sign_extend_byte(input),
            UnaryOp::SignExtendHalf => utils::sign_extend_half(input),
            UnaryOp::Floor => {
                let value = utils::float_from_bits(input);
                if !value.is_finite() {
                    return Err(GenError::DomainError("floor of a non-finite value"));
                }

                // Floats this large are multiples of 2^32, so the low word is zero.
                if value.abs() >= I64_LIMIT {
                    0
                } else {
                    utils::unsigned32(value.floor() as i64)
                }
            }
            UnaryOp::IntToFloat => utils::bits_from_float(utils::signed32(input) as f32),
            UnaryOp::Reciprocal => utils::bits_from_float(1.0 / utils::float_from_bits(input)),
            UnaryOp::ReciprocalSqrt => {
                let value = utils::float_from_bits(input);
                if value < 0.0 {
                    return Err(GenError::DomainError("reciprocal square root of a negative"));
                }

                // The reference value, rounded once to single precision.
                utils::bits_from_float((1.0 / (value as f64).sqrt()) as f32)
            }
        })
    }
}

impl Display for UnaryOp {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let printable = match self {
            UnaryOp::Increment => "inc",
            UnaryOp::Decrement => "dec",
            UnaryOp::Not => "not",
            UnaryOp::Negate => "neg",
            UnaryOp::ByteSwap => "bswap",
            UnaryOp::WordSwap => "wswap",
            UnaryOp::SignExtendByte => "bsi",
            UnaryOp::SignExtendHalf => "wsi",
            UnaryOp::Floor => "floor",
            UnaryOp::IntToFloat => "itof",
            UnaryOp::Reciprocal => "rcp",
            UnaryOp::ReciprocalSqrt => "rsqrt",
        };
        write!(f, "{printable}")
    }
}
