use std::fmt::{self, Display};

use crate::{
    error::{GenError, GenResult},
    utils,
};

use super::operand::{Render, View, format_float};

/// The encoded width of an immediate value.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Width {
    /// A 16-bit immediate, always sign extended by the target.
    Short,
    /// A full 32-bit immediate.
    Full,
}

/// A constant operand, stored already masked to its width.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Immediate {
    bits: u32,
    width: Width,
}

impl Immediate {
    /// Build a full-width immediate.
    pub fn new(value: i64) -> Self {
        Self {
            bits: utils::unsigned32(value),
            width: Width::Full,
        }
    }

    /// Build a short (16-bit) immediate.
    pub fn short(value: i64) -> Self {
        Self {
            bits: utils::unsigned16(value) as u32,
            width: Width::Short,
        }
    }

    /// Build a full-width immediate holding the bit pattern of a float.
    pub fn float(value: f32) -> Self {
        Self {
            bits: utils::bits_from_float(value),
            width: Width::Full,
        }
    }

    #[inline(always)]
    pub fn width(&self) -> Width {
        self.width
    }

    #[inline(always)]
    pub fn is_short(&self) -> bool {
        self.width == Width::Short
    }

    /// The stored bit pattern, masked to the width of the immediate.
    #[inline(always)]
    pub fn bits(&self) -> u32 {
        self.bits
    }

    /// Replace the stored value, masking it to the width of the immediate.
    pub fn set(&mut self, raw: i64) {
        self.bits = match self.width {
            Width::Short => utils::unsigned16(raw) as u32,
            Width::Full => utils::unsigned32(raw),
        };
    }

    /// The canonical value of the immediate.
    ///
    /// Short immediates are always signed, full-width immediates return the raw pattern.
    pub fn get(&self) -> i64 {
        match self.width {
            Width::Short => utils::signed16(self.bits as u16) as i64,
            Width::Full => self.bits as i64,
        }
    }

    fn unsupported(&self, view: View) -> GenError {
        GenError::UnsupportedView {
            view,
            operand: self.to_string(),
        }
    }
}

impl Render for Immediate {
    fn render(&self, view: View) -> GenResult<String> {
        if self.is_short() {
            // Short immediates have no unsigned reading, every integer view is signed.
            return match view {
                View::Reg | View::Val | View::RegSigned | View::ValSigned => {
                    Ok(format!("({})", self.get()))
                }
                View::RegFloat | View::ValFloat => Err(self.unsupported(view)),
                View::Size => Ok(String::from("short")),
            };
        }

        Ok(match view {
            View::Reg | View::Val => format!("({})", self.bits),
            View::RegSigned | View::ValSigned => format!("({})", utils::signed32(self.bits)),
            View::RegFloat | View::ValFloat => format_float(utils::float_from_bits(self.bits)),
            View::Size => String::new(),
        })
    }
}

impl Display for Immediate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.width {
            Width::Short => write!(f, "simm({:#06x})", self.bits),
            Width::Full => write!(f, "imm({:#010x})", self.bits),
        }
    }
}

#[cfg(test)]
mod tests_immediate {
    use crate::{
        error::GenError,
        reg::operand::{Render, View},
    };

    use super::Immediate;

    #[test]
    fn test_short_views_are_signed() {
        let imm = Immediate::short(0xffff);

        let tests = [
            (View::Reg, "(-1)"),
            (View::Val, "(-1)"),
            (View::RegSigned, "(-1)"),
            (View::ValSigned, "(-1)"),
            (View::Size, "short"),
        ];

        for (i, (view, expected)) in tests.iter().enumerate() {
            assert_eq!(
                imm.render(*view).expect("view should be supported"),
                *expected,
                "Test {i} Failed - incorrect rendering for the {view} view"
            );
        }
    }

    #[test]
    fn test_short_float_view_fails() {
        let imm = Immediate::short(1);

        for view in [View::RegFloat, View::ValFloat] {
            assert!(matches!(
                imm.render(view),
                Err(GenError::UnsupportedView { .. })
            ));
        }
    }

    #[test]
    fn test_full_views() {
        let imm = Immediate::new(-2);
        assert_eq!(imm.render(View::Val).unwrap(), "(4294967294)");
        assert_eq!(imm.render(View::ValSigned).unwrap(), "(-2)");
        assert_eq!(imm.render(View::Size).unwrap(), "");

        let imm = Immediate::float(1.0);
        assert_eq!(imm.render(View::RegFloat).unwrap(), "1.0");
        assert_eq!(imm.render(View::Val).unwrap(), "(1065353216)");
    }

    #[test]
    fn test_set_masks_to_width() {
        let mut imm = Immediate::short(0);
        imm.set(0x1_8000);
        assert_eq!(imm.bits(), 0x8000);
        assert_eq!(imm.get(), -0x8000);

        let mut imm = Immediate::new(0);
        imm.set(-1);
        assert_eq!(imm.bits(), 0xffff_ffff);
        assert_eq!(imm.get(), 0xffff_ffff);
    }
}
