use std::fmt::{self, Display};

use crate::{error::GenResult, utils};

use super::{
    operand::{Render, View, format_float},
    registers::RegisterId,
};

/// A single slot of the register file mirror.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct Register {
    /// The [`RegisterId`] of this register.
    pub id: RegisterId,
    /// The bit pattern this register is expected to hold.
    value: u32,
}

impl Register {
    pub fn new(id: RegisterId, value: u32) -> Self {
        Self { id, value }
    }

    /// Write a value to this register, masking it to 32 bits.
    ///
    /// # Arguments
    ///
    /// * `raw` - The value to be written. Negative values wrap using two's complement.
    #[inline(always)]
    pub fn set(&mut self, raw: i64) {
        self.value = utils::unsigned32(raw);
    }

    /// The canonical value of this register. Registers always hold the raw bit pattern,
    /// interpretation is left to the evaluator.
    #[inline(always)]
    pub fn get(&self) -> i64 {
        self.value as i64
    }

    /// Read the bit pattern of this register.
    #[inline(always)]
    pub fn read(&self) -> u32 {
        self.value
    }
}

impl Render for Register {
    fn render(&self, view: View) -> GenResult<String> {
        let index = self.id as u8;

        Ok(match view {
            View::Reg => format!("$r{index}"),
            View::RegSigned => format!("$sr{index}"),
            View::RegFloat => format!("$fr{index}"),
            View::Val => format!("({})", self.value),
            View::ValSigned => format!("({})", utils::signed32(self.value)),
            View::ValFloat => format_float(utils::float_from_bits(self.value)),
            View::Size => String::new(),
        })
    }
}

impl Display for Register {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.id)
    }
}
