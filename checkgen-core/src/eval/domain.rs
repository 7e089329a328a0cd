use core::fmt;
use std::fmt::Display;

use crate::{
    error::{GenError, GenResult},
    reg::{
        operand::{Operand, View},
        registers::Registers,
    },
    utils,
};

/// The numeric domain in which an operand's bit pattern is interpreted.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum Domain {
    /// Unsigned 32-bit integers.
    Unsigned,
    /// Two's complement signed 32-bit integers.
    Signed,
    /// IEEE-754 single precision floats.
    Float,
    /// Two's complement signed 16-bit integers, as used by short immediates.
    ShortSigned,
}

impl Domain {
    pub fn name(&self) -> &'static str {
        match self {
            Domain::Unsigned => "unsigned",
            Domain::Signed => "signed",
            Domain::Float => "float",
            Domain::ShortSigned => "short signed",
        }
    }

    /// The register view used when writing an operand of this domain in assembly.
    pub fn view(&self) -> View {
        match self {
            Domain::Unsigned => View::Reg,
            Domain::Signed | Domain::ShortSigned => View::RegSigned,
            Domain::Float => View::RegFloat,
        }
    }

    /// Interpret a canonical operand value in this domain.
    ///
    /// # Arguments
    ///
    /// * `canonical` - The canonical value, as returned by [`Operand::get`].
    pub fn interpret(&self, canonical: i64) -> Scalar {
        match self {
            Domain::Unsigned => Scalar::Int(utils::unsigned32(canonical) as i128),
            Domain::Signed => Scalar::Int(utils::signed32(utils::unsigned32(canonical)) as i128),
            Domain::Float => Scalar::Float(utils::float_from_bits(utils::unsigned32(canonical))),
            Domain::ShortSigned => {
                Scalar::Int(utils::signed16(utils::unsigned16(canonical)) as i128)
            }
        }
    }

    /// Interpret an operand in this domain.
    ///
    /// # Arguments
    ///
    /// * `operand` - The [`Operand`] to be interpreted.
    /// * `regs` - The mirror holding the current register values.
    ///
    /// # Returns
    ///
    /// The interpreted value, or an error when a short immediate is read as a float.
    pub fn interpret_operand(&self, operand: &Operand, regs: &Registers) -> GenResult<Scalar> {
        if *self == Domain::Float && operand.is_short() {
            return Err(GenError::UnsupportedView {
                view: View::ValFloat,
                operand: operand.to_string(),
            });
        }

        Ok(self.interpret(operand.get(regs)))
    }

    /// The natural domain of an operand in the basic ALU family: short immediates are
    /// read as signed 16-bit values, everything else as its raw unsigned pattern.
    pub fn natural(operand: &Operand) -> Domain {
        if operand.is_short() {
            Domain::ShortSigned
        } else {
            Domain::Unsigned
        }
    }
}

impl Display for Domain {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// A value interpreted in a numeric domain.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Scalar {
    /// An integer, wide enough to hold any intermediate result without loss.
    Int(i128),
    Float(f32),
}

impl Scalar {
    /// Read this value as a float, converting integers exactly as the target would.
    pub fn as_float(&self) -> f32 {
        match self {
            Scalar::Int(value) => *value as f32,
            Scalar::Float(value) => *value,
        }
    }
}
