use core::fmt;
use std::{fmt::Display, str::FromStr};

use strum_macros::EnumIter;

use crate::error::{GenError, GenResult};

use super::{
    immediate::Immediate,
    registers::{RegisterId, Registers},
};

/// A requested textual or numeric reading of an operand's bit pattern.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, EnumIter)]
pub enum View {
    /// The plain register name, `$rN`. Immediates render their unsigned literal.
    Reg,
    /// The signed register alias, `$srN`. Immediates render their signed literal.
    RegSigned,
    /// The float register alias, `$frN`. Immediates render their float literal.
    RegFloat,
    /// The unsigned decimal literal of the bit pattern.
    Val,
    /// The two's complement decimal literal of the bit pattern.
    ValSigned,
    /// The IEEE-754 single precision literal of the bit pattern.
    ValFloat,
    /// The width suffix, `short` for short immediates and empty otherwise.
    Size,
}

impl View {
    /// Is this a float view?
    pub fn is_float(&self) -> bool {
        matches!(self, View::RegFloat | View::ValFloat)
    }
}

impl Display for View {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let printable = match *self {
            View::Reg => "gas",
            View::RegSigned => "gas_s",
            View::RegFloat => "gas_f",
            View::Val => "val",
            View::ValSigned => "val_s",
            View::ValFloat => "val_f",
            View::Size => "size",
        };
        write!(f, "{printable}")
    }
}

impl FromStr for View {
    type Err = ();

    fn from_str(input: &str) -> Result<View, Self::Err> {
        match input {
            "" | "gas" | "gas_u" => Ok(View::Reg),
            "gas_s" => Ok(View::RegSigned),
            "gas_f" => Ok(View::RegFloat),
            "val" | "val_u" => Ok(View::Val),
            "val_s" => Ok(View::ValSigned),
            "val_f" => Ok(View::ValFloat),
            "size" => Ok(View::Size),
            _ => Err(()),
        }
    }
}

/// Anything that can be rendered as an assembly token under a [`View`].
pub trait Render {
    /// Render this value under the requested view.
    ///
    /// # Arguments
    ///
    /// * `view` - The [`View`] to be applied.
    ///
    /// # Returns
    ///
    /// The assembly token, or an error if the view is not supported for this value.
    fn render(&self, view: View) -> GenResult<String>;
}

/// Format a float literal so that it parses back to exactly the same single precision value.
///
/// Exponents carry an explicit sign and at least two digits (`1e+20`, `1e-05`), and the
/// special values are written `nan`, `inf` and `-inf`.
pub fn format_float(value: f32) -> String {
    if value.is_nan() {
        return String::from("nan");
    }
    if value.is_infinite() {
        return String::from(if value < 0.0 { "-inf" } else { "inf" });
    }

    let shortest = format!("{:?}", value as f64);
    let Some((mantissa, exponent)) = shortest.split_once('e') else {
        return shortest;
    };

    let (sign, digits) = match exponent.strip_prefix('-') {
        Some(digits) => ('-', digits),
        None => ('+', exponent),
    };

    format!("{mantissa}e{sign}{digits:0>2}")
}

/// An instruction operand: either a register reference or an immediate.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Operand {
    /// A register reference. Its value is whatever the mirror currently assigns to it.
    Reg(RegisterId),
    /// A constant.
    Imm(Immediate),
}

impl Operand {
    /// Build a register reference.
    ///
    /// # Arguments
    ///
    /// * `index` - The index of the register, in the range 0 to 14 (inclusive).
    pub fn reg(index: u8) -> GenResult<Self> {
        Ok(Operand::Reg(RegisterId::from_index(index)?))
    }

    /// Build a full-width immediate.
    pub fn imm(value: i64) -> Self {
        Operand::Imm(Immediate::new(value))
    }

    /// Build a short (16-bit) immediate.
    pub fn simm(value: i64) -> Self {
        Operand::Imm(Immediate::short(value))
    }

    /// Build a full-width immediate holding the bit pattern of a float.
    pub fn fimm(value: f32) -> Self {
        Operand::Imm(Immediate::float(value))
    }

    /// The register referenced by this operand, if any.
    pub fn register(&self) -> Option<RegisterId> {
        match self {
            Operand::Reg(id) => Some(*id),
            Operand::Imm(_) => None,
        }
    }

    /// The register referenced by this operand, or an error if it is an immediate.
    pub fn expect_register(&self) -> GenResult<RegisterId> {
        self.register()
            .ok_or_else(|| GenError::ImmediateDestination(self.to_string()))
    }

    #[inline(always)]
    pub fn is_short(&self) -> bool {
        matches!(self, Operand::Imm(imm) if imm.is_short())
    }

    /// Resolve this operand against the mirror.
    fn resolve<'a>(&'a self, regs: &'a Registers) -> &'a dyn Render {
        match self {
            Operand::Reg(id) => regs.get(*id),
            Operand::Imm(imm) => imm,
        }
    }

    /// Render this operand under the requested view.
    ///
    /// # Arguments
    ///
    /// * `view` - The [`View`] to be applied.
    /// * `regs` - The mirror holding the current register values.
    pub fn render(&self, view: View, regs: &Registers) -> GenResult<String> {
        self.resolve(regs).render(view)
    }

    /// The canonical value of this operand.
    ///
    /// Registers return their raw bit pattern, short immediates their signed value.
    pub fn get(&self, regs: &Registers) -> i64 {
        match self {
            Operand::Reg(id) => regs.get(*id).get(),
            Operand::Imm(imm) => imm.get(),
        }
    }

    /// Write a value to this operand, masking it to the operand's width.
    ///
    /// # Arguments
    ///
    /// * `raw` - The value to be written.
    /// * `regs` - The mirror, updated when this operand is a register reference.
    pub fn set(&mut self, raw: i64, regs: &mut Registers) {
        match self {
            Operand::Reg(id) => regs.write(*id, raw),
            Operand::Imm(imm) => imm.set(raw),
        }
    }
}

impl From<RegisterId> for Operand {
    fn from(id: RegisterId) -> Self {
        Operand::Reg(id)
    }
}

impl From<Immediate> for Operand {
    fn from(imm: Immediate) -> Self {
        Operand::Imm(imm)
    }
}

impl Display for Operand {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Operand::Reg(id) => write!(f, "{id}"),
            Operand::Imm(imm) => write!(f, "{imm}"),
        }
    }
}
