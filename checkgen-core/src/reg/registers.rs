use core::fmt;
use num_derive::FromPrimitive;
use num_traits::FromPrimitive;
use prettytable::{Table, row};
use std::{fmt::Display, str::FromStr};
use strum::IntoEnumIterator;
use strum_macros::EnumIter;

use crate::{
    error::{GenError, GenResult},
    utils,
};

use super::register::Register;

/// The number of general purpose registers mirrored by the generator.
pub const REGISTER_COUNT: usize = 15;

#[derive(
    Clone, Copy, Debug, Default, Eq, Hash, Ord, PartialEq, PartialOrd, EnumIter, FromPrimitive,
)]
#[repr(u8)]
pub enum RegisterId {
    /// General purpose register 0. Used as a scratch and sentinel register by several test families.
    #[default]
    R0 = 0,
    R1 = 1,
    R2 = 2,
    R3 = 3,
    R4 = 4,
    R5 = 5,
    R6 = 6,
    R7 = 7,
    R8 = 8,
    R9 = 9,
    R10 = 10,
    R11 = 11,
    R12 = 12,
    R13 = 13,
    /// General purpose register 14, the highest mirrored register.
    R14 = 14,
}

impl RegisterId {
    /// Build a [`RegisterId`] from a register index.
    ///
    /// # Arguments
    ///
    /// * `index` - The index of the register, in the range 0 to 14 (inclusive).
    pub fn from_index(index: u8) -> GenResult<Self> {
        RegisterId::from_u8(index).ok_or(GenError::InvalidRegister(index))
    }

    /// The index of this register within the register file.
    #[inline(always)]
    pub fn index(self) -> usize {
        self as usize
    }
}

impl TryFrom<u8> for RegisterId {
    type Error = GenError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        RegisterId::from_index(value)
    }
}

impl FromStr for RegisterId {
    type Err = GenError;

    fn from_str(input: &str) -> Result<RegisterId, Self::Err> {
        let digits = input
            .trim_start_matches('$')
            .trim_start_matches(['r', 'R']);

        match digits.parse::<u8>() {
            Ok(index) => RegisterId::from_index(index),
            Err(_) => Err(GenError::InvalidRegister(u8::MAX)),
        }
    }
}

impl Display for RegisterId {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "$r{}", *self as u8)
    }
}

impl From<RegisterId> for u8 {
    fn from(m: RegisterId) -> u8 {
        m as u8
    }
}

/// The initial state of the mirror for a test case.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum InitPattern {
    /// Register `i` holds `(-1)^i * 2^i`.
    Integer,
    /// Register `i` holds the bit pattern of the float `1.0 * i`.
    Float,
}

/// The generator's private copy of what the target's registers must contain.
#[derive(Debug, Clone)]
pub struct Registers {
    registers: [Register; REGISTER_COUNT],
}

impl Registers {
    pub fn new() -> Self {
        Self {
            registers: core::array::from_fn(|i| {
                Register::new(RegisterId::from_u8(i as u8).unwrap_or_default(), 0)
            }),
        }
    }

    /// Reset every register to the given initial pattern.
    ///
    /// # Arguments
    ///
    /// * `pattern` - The [`InitPattern`] to be applied.
    pub fn reset(&mut self, pattern: InitPattern) {
        match pattern {
            InitPattern::Integer => self.reset_integer(),
            InitPattern::Float => self.reset_float(),
        }
    }

    /// Assign register `i` the value `(-1)^i * 2^i`.
    ///
    /// Each register holds an independent bit position and the signs alternate,
    /// which makes aliasing and sign handling bugs visible.
    pub fn reset_integer(&mut self) {
        for (i, reg) in self.registers.iter_mut().enumerate() {
            let magnitude = 1i64 << i;
            let value = if i % 2 == 0 { magnitude } else { -magnitude };
            reg.set(value);
        }
    }

    /// Assign register `i` the bit pattern of the float `1.0 * i`.
    pub fn reset_float(&mut self) {
        for (i, reg) in self.registers.iter_mut().enumerate() {
            reg.set(utils::bits_from_float(i as f32) as i64);
        }
    }

    /// Get a reference to a specific register.
    ///
    /// # Arguments
    ///
    /// * `id` - The [`RegisterId`] for the register in question.
    #[inline(always)]
    pub fn get(&self, id: RegisterId) -> &Register {
        &self.registers[id.index()]
    }

    /// Get a mutable reference to a specific register.
    ///
    /// # Arguments
    ///
    /// * `id` - The [`RegisterId`] for the register in question.
    #[inline(always)]
    pub fn get_mut(&mut self, id: RegisterId) -> &mut Register {
        &mut self.registers[id.index()]
    }

    /// Get the bit pattern currently held by a register.
    #[inline(always)]
    pub fn read(&self, id: RegisterId) -> u32 {
        self.get(id).read()
    }

    /// Write a value into a register, masking it to 32 bits.
    #[inline(always)]
    pub fn write(&mut self, id: RegisterId, value: i64) {
        tracing::trace!("mirror {id} <- {:#010x}", utils::unsigned32(value));
        self.get_mut(id).set(value);
    }

    /// Iterate over every register, in index order.
    pub fn iter(&self) -> impl Iterator<Item = &Register> {
        self.registers.iter()
    }

    /// Build a table describing the value of each register in the mirror.
    pub fn to_table(&self) -> Table {
        let mut table = Table::new();
        table.add_row(row!["Register", "Value", "Signed", "Float"]);

        for id in RegisterId::iter() {
            let value = self.read(id);
            table.add_row(row![
                id,
                format!("{value:0>8X}"),
                utils::signed32(value),
                utils::float_from_bits(value)
            ]);
        }

        table
    }
}

impl Default for Registers {
    fn default() -> Self {
        Self::new()
    }
}
