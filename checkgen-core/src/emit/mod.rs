//! Test case emitters, one module per instruction category.

pub mod alu;
pub mod binary_alu;
pub mod branch;
pub mod harness;
pub mod load_store;
pub mod pc_relative;
pub mod unary_alu;

use core::fmt;
use std::fmt::Display;

use strum_macros::EnumIter;

use crate::{
    error::GenResult,
    eval::{
        domain::Domain,
        evaluator::{self, Outcome, ShiftRule},
        operator::Operator,
    },
    program::{CaseHeader, Program},
    reg::{
        operand::{Operand, View, format_float},
        registers::InitPattern,
    },
    utils,
};

/// The register views of a two operand instruction: destination, left and right.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, EnumIter)]
pub enum Signature {
    /// Unsigned destination and sources.
    Uuu,
    /// Signed destination and sources.
    Sss,
    /// Signed destination and left source, unsigned right source.
    Ssu,
    /// Float destination and sources.
    Fff,
}

impl Signature {
    pub fn views(&self) -> (View, View, View) {
        match self {
            Signature::Uuu => (View::Reg, View::Reg, View::Reg),
            Signature::Sss => (View::RegSigned, View::RegSigned, View::RegSigned),
            Signature::Ssu => (View::RegSigned, View::RegSigned, View::Reg),
            Signature::Fff => (View::RegFloat, View::RegFloat, View::RegFloat),
        }
    }

    /// The domains in which the left and right sources are interpreted.
    pub fn domains(&self) -> (Domain, Domain) {
        match self {
            Signature::Uuu => (Domain::Unsigned, Domain::Unsigned),
            Signature::Sss => (Domain::Signed, Domain::Signed),
            Signature::Ssu => (Domain::Signed, Domain::Unsigned),
            Signature::Fff => (Domain::Float, Domain::Float),
        }
    }

    pub fn init(&self) -> InitPattern {
        match self {
            Signature::Fff => InitPattern::Float,
            _ => InitPattern::Integer,
        }
    }
}

impl Display for Signature {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let printable = match self {
            Signature::Uuu => "uuu",
            Signature::Sss => "sss",
            Signature::Ssu => "ssu",
            Signature::Fff => "fff",
        };
        write!(f, "{printable}")
    }
}

/// A two operand ALU case, shared by the basic and the wide families.
pub(crate) struct BinaryCase {
    pub family: &'static str,
    pub signature: Signature,
    pub rd: Operand,
    pub lhs: Operand,
    pub rhs: Operand,
    pub op: Operator,
    pub domains: (Domain, Domain),
    pub rule: ShiftRule,
    pub upper: bool,
}

impl BinaryCase {
    fn header(&self) -> CaseHeader {
        let header = CaseHeader::new(&format!("{}_{}", self.family, self.signature))
            .arg("rd", self.rd)
            .arg("a", self.lhs)
            .arg("b", self.rhs)
            .arg("op", self.op);

        if self.upper {
            header.arg("upper", true)
        } else {
            header
        }
    }

    /// Emit the case into the program.
    ///
    /// Both sources are read from the mirror before the destination is written,
    /// so a destination aliasing a source is handled correctly.
    pub fn emit(self, program: &mut Program) -> GenResult<()> {
        let rd = self.rd.expect_register()?;
        let mut case = program.begin_case(self.signature.init(), self.header());

        case.setup()?;

        let (dest_view, lhs_view, rhs_view) = self.signature.views();
        let dest = case.render(&self.rd, dest_view)?;
        let lhs = case.render(&self.lhs, lhs_view)?;
        let rhs = case.render(&self.rhs, rhs_view)?;
        let size = if self.lhs.is_short() {
            case.render(&self.lhs, View::Size)?
        } else {
            case.render(&self.rhs, View::Size)?
        };
        let upper = if self.upper { "upper" } else { "" };

        case.begin_test();
        case.tokens(&[&dest, "<-", upper, &size, &lhs, self.op.symbol(), &rhs]);
        case.end_test();

        let (lhs_domain, rhs_domain) = self.domains;
        let a = lhs_domain.interpret_operand(&self.lhs, case.regs())?;
        let b = rhs_domain.interpret_operand(&self.rhs, case.regs())?;

        let result = if self.upper {
            evaluator::apply_upper(self.op, a, b, self.rule, lhs_domain == Domain::Signed)?
        } else {
            match evaluator::apply(self.op, a, b, self.rule)? {
                // A float comparison stores the float 1.0 or 0.0.
                Outcome::Flag(flag) if self.signature == Signature::Fff => {
                    utils::bits_from_float(flag as u8 as f32)
                }
                outcome => outcome.bits(),
            }
        };

        if self.signature == Signature::Fff {
            let value = utils::float_from_bits(result);
            case.comment(&format!("float: {} int: {result}", format_float(value)));
        }

        case.regs_mut().write(rd, result as i64);
        case.verify()
    }
}

#[cfg(test)]
mod tests_signature {
    use strum::IntoEnumIterator;

    use crate::{eval::domain::Domain, reg::operand::View, reg::registers::InitPattern};

    use super::Signature;

    #[test]
    fn test_views_match_domains() {
        for signature in Signature::iter() {
            let (dest, lhs, rhs) = signature.views();
            let (lhs_domain, rhs_domain) = signature.domains();

            assert_eq!(lhs, lhs_domain.view(), "{signature} left view");
            assert_eq!(rhs, rhs_domain.view(), "{signature} right view");
            assert_eq!(dest == View::RegFloat, signature.init() == InitPattern::Float);
        }

        assert_eq!(Signature::Ssu.domains(), (Domain::Signed, Domain::Unsigned));
        assert_eq!(Signature::Fff.to_string(), "fff");
    }
}
