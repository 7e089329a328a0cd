use core::fmt;
use std::fmt::Display;

use crate::{
    config::{NOT_TAKEN_SENTINEL, TargetConfig},
    error::{GenError, GenResult},
    eval::evaluator::{self, AccessSize},
    program::{CaseContext, CaseHeader, Program},
    reg::{
        operand::{Operand, View},
        registers::{InitPattern, RegisterId},
    },
};

/// How a memory operand is addressed.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum Addressing {
    /// `mem[$rb]`
    Base(RegisterId),
    /// `mem[$rb,offset]`
    BaseOffset(RegisterId, i32),
    /// `mem[offset+.buffer+bias]`
    Offset(i32),
}

impl Addressing {
    /// Build an [`Addressing`] mode from an optional base register and offset.
    ///
    /// # Arguments
    ///
    /// * `base` - The base register, if any.
    /// * `offset` - The offset, if any.
    ///
    /// # Returns
    ///
    /// The addressing mode, or [`GenError::MissingAddress`] if neither was given.
    pub fn new(base: Option<RegisterId>, offset: Option<i32>) -> GenResult<Self> {
        match (base, offset) {
            (Some(base), None) => Ok(Addressing::Base(base)),
            (Some(base), Some(offset)) => Ok(Addressing::BaseOffset(base, offset)),
            (None, Some(offset)) => Ok(Addressing::Offset(offset)),
            (None, None) => Err(GenError::MissingAddress),
        }
    }

    /// The base register of this mode, if any.
    pub fn base(&self) -> Option<RegisterId> {
        match self {
            Addressing::Base(base) | Addressing::BaseOffset(base, _) => Some(*base),
            Addressing::Offset(_) => None,
        }
    }

    /// Render the memory reference.
    ///
    /// # Arguments
    ///
    /// * `size` - The [`AccessSize`] suffix, or `None` for an unsized reference.
    /// * `config` - The [`TargetConfig`] naming the scratch buffer.
    pub fn reference(&self, size: Option<AccessSize>, config: &TargetConfig) -> String {
        let size = size.map(|s| s.bits().to_string()).unwrap_or_default();

        match self {
            Addressing::Base(base) => format!("mem{size}[{base}]"),
            Addressing::BaseOffset(base, offset) => format!("mem{size}[{base},{offset}]"),
            Addressing::Offset(offset) => format!(
                "mem{size}[{offset}+{}+{}]",
                config.buffer_symbol, config.buffer_bias
            ),
        }
    }

    /// Point the base register, if any, at the biased middle of the scratch buffer.
    pub(crate) fn load_base(&self, case: &mut CaseContext) {
        if let Some(base) = self.base() {
            let symbol = case.config().buffer_symbol.clone();
            let bias = case.config().buffer_bias;
            case.line(&format!("{base} <- {symbol}"));
            case.line(&format!("{base} <- {base} + {bias}"));
        }
    }
}

impl Display for Addressing {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Addressing::Base(base) => write!(f, "[{base}]"),
            Addressing::BaseOffset(base, offset) => write!(f, "[{base},{offset}]"),
            Addressing::Offset(offset) => write!(f, "[{offset}]"),
        }
    }
}

/// Zero the scratch buffer, one word at a time.
fn clear_buffer(case: &mut CaseContext) {
    let start = case.config().buffer_symbol.clone();
    let end = case.config().buffer_end_symbol.clone();

    case.line(&format!("$r0 <- {start}"));
    case.line(&format!("$r1 <- {end}"));
    case.line("$r2 <- $r2 ^ $r2");
    case.label("1");
    case.line("mem[$r0] <- $r2");
    case.line("$r0 <- short $r0 + 4");
    case.line("if $r0 != $r1 $pc <- 1b");
}

/// Emit a store followed by a load of the same location.
///
/// The data register is stored, clobbered, then reloaded with the requested
/// width and extension. When a base register is used it receives the loaded
/// value too, so it is checked along with the data register.
///
/// # Arguments
///
/// * `program` - The [`Program`] receiving the case.
/// * `rd` - The data register.
/// * `addressing` - The [`Addressing`] mode of both accesses.
/// * `size` - The [`AccessSize`] of both accesses.
/// * `sign_extend` - Does the load sign extend?
pub fn load_store(
    program: &mut Program,
    rd: RegisterId,
    addressing: Addressing,
    size: AccessSize,
    sign_extend: bool,
) -> GenResult<()> {
    if addressing.base() == Some(rd) {
        return Err(GenError::AliasedOperands(rd.to_string()));
    }

    let header = CaseHeader::new("load_store")
        .arg("rd", rd)
        .arg("addr", addressing)
        .arg("size", size.bits())
        .arg("sign_extend", sign_extend);
    let mut case = program.begin_case(InitPattern::Integer, header);

    clear_buffer(&mut case);
    case.setup()?;

    let data = Operand::from(rd);
    let name = case.render(&data, View::Reg)?;
    let load_name = if sign_extend {
        case.render(&data, View::RegSigned)?
    } else {
        name.clone()
    };
    let mem = addressing.reference(Some(size), case.config());

    case.begin_test();
    addressing.load_base(&mut case);
    case.line(&format!("{mem} <- {name}"));
    case.line(&format!("{name} <- {NOT_TAKEN_SENTINEL:#x}"));
    case.line(&format!("{load_name} <- {mem}"));
    if let Some(base) = addressing.base() {
        case.line(&format!("{base} <- {name}"));
    }
    case.end_test();

    let loaded = evaluator::load_extend(case.regs().read(rd), size, sign_extend);
    case.regs_mut().write(rd, loaded as i64);
    if let Some(base) = addressing.base() {
        case.regs_mut().write(base, loaded as i64);
    }

    case.verify()
}

#[cfg(test)]
mod tests_load_store {
    use crate::{
        config::TargetConfig,
        emit::test_support::checked_value,
        error::GenError,
        eval::evaluator::AccessSize,
        program::Program,
        reg::registers::RegisterId,
    };

    use super::{Addressing, load_store};

    #[test]
    fn test_addressing_modes() {
        let config = TargetConfig::default();

        let tests = [
            (Some(RegisterId::R0), Some(4), Some(AccessSize::Half), "mem16[$r0,4]"),
            (Some(RegisterId::R10), None, Some(AccessSize::Word), "mem32[$r10]"),
            (None, Some(-4), Some(AccessSize::Byte), "mem8[-4+.buffer+128]"),
            (None, Some(4), None, "mem[4+.buffer+128]"),
        ];

        for (i, (base, offset, size, expected)) in tests.iter().enumerate() {
            let addressing = Addressing::new(*base, *offset).expect("valid addressing");
            assert_eq!(
                addressing.reference(*size, &config),
                *expected,
                "Test {i} Failed - incorrect memory reference"
            );
        }

        assert_eq!(Addressing::new(None, None), Err(GenError::MissingAddress));
    }

    #[test]
    fn test_loaded_values() {
        // Mirror values: r1 = 0xfffffffe, r7 = 0xffffff80, r8 = 0x100.
        let tests = [
            (RegisterId::R7, AccessSize::Byte, true, 0xffff_ff80u32),
            (RegisterId::R7, AccessSize::Byte, false, 0x80),
            (RegisterId::R1, AccessSize::Half, true, 0xffff_fffe),
            (RegisterId::R1, AccessSize::Half, false, 0xfffe),
            (RegisterId::R8, AccessSize::Byte, true, 0),
            (RegisterId::R1, AccessSize::Word, false, 0xffff_fffe),
        ];

        for (i, (rd, size, sign_extend, expected)) in tests.iter().enumerate() {
            let mut program = Program::default();
            let addressing = Addressing::new(Some(RegisterId::R0), Some(4)).unwrap();
            load_store(&mut program, *rd, addressing, *size, *sign_extend)
                .expect("generation should succeed");

            let text = program.text();
            assert_eq!(
                checked_value(text, *rd as u8),
                *expected,
                "Test {i} Failed - incorrect data register value"
            );
            assert_eq!(
                checked_value(text, 0),
                *expected,
                "Test {i} Failed - incorrect base register value"
            );
        }
    }

    #[test]
    fn test_case_layout() {
        let mut program = Program::default();
        let addressing = Addressing::new(Some(RegisterId::R0), Some(4)).unwrap();
        load_store(&mut program, RegisterId::R1, addressing, AccessSize::Half, true).unwrap();

        let expected = [
            "        $r0 <- .buffer",
            "        $r1 <- .buffer_end",
            "        $r2 <- $r2 ^ $r2",
            "    1:",
            "        mem[$r0] <- $r2",
            "        $r0 <- short $r0 + 4",
            "        if $r0 != $r1 $pc <- 1b",
        ]
        .join("\n");
        assert!(program.text().contains(&expected));

        let expected = [
            "        #>>>>>>>",
            "        $r0 <- .buffer",
            "        $r0 <- $r0 + 128",
            "        mem16[$r0,4] <- $r1",
            "        $r1 <- 0xdeadbeef",
            "        $sr1 <- mem16[$r0,4]",
            "        $r0 <- $r1",
            "        #<<<<<<<",
        ]
        .join("\n");
        assert!(program.text().contains(&expected));
    }

    #[test]
    fn test_offset_only_leaves_registers_alone() {
        let mut program = Program::default();
        let addressing = Addressing::new(None, Some(4)).unwrap();
        load_store(&mut program, RegisterId::R7, addressing, AccessSize::Byte, false).unwrap();

        let text = program.text();
        assert!(text.contains("        $r7 <- mem8[4+.buffer+128]\n"));
        assert_eq!(checked_value(text, 7), 0x80);
        assert_eq!(checked_value(text, 0), 1);
    }

    #[test]
    fn test_aliased_registers_are_rejected() {
        let mut program = Program::default();
        let addressing = Addressing::new(Some(RegisterId::R3), None).unwrap();
        let result = load_store(&mut program, RegisterId::R3, addressing, AccessSize::Word, false);

        assert!(matches!(result, Err(GenError::AliasedOperands(_))));
        assert_eq!(program.case_count(), 0);
    }
}
