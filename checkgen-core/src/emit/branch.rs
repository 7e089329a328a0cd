//! Conditional branches.
//!
//! Register 0 is the sentinel of every case: it is loaded with the taken value,
//! overwritten with the not taken value on the fall through path, and checked
//! along with the rest of the register file.

use crate::{
    config::{NOT_TAKEN_SENTINEL, TAKEN_SENTINEL},
    error::{GenError, GenResult},
    eval::{
        domain::{Domain, Scalar},
        evaluator::{self, ShiftRule},
        operator::Operator,
    },
    program::{CaseContext, CaseHeader, Program},
    reg::{
        operand::Operand,
        registers::{InitPattern, RegisterId},
    },
    utils,
};

/// The local label the branch under test jumps to.
const TARGET: &str = "3";

fn check_operand(id: RegisterId) -> GenResult<()> {
    if id == RegisterId::R0 {
        return Err(GenError::ReservedRegister(id.to_string()));
    }

    Ok(())
}

fn check_condition(op: Operator, domain: Domain) -> GenResult<()> {
    if !op.is_comparison() {
        return Err(GenError::UnsupportedOperation {
            op,
            domain: domain.name(),
        });
    }

    Ok(())
}

fn init_for(domain: Domain) -> InitPattern {
    if domain == Domain::Float {
        InitPattern::Float
    } else {
        InitPattern::Integer
    }
}

/// Emit the branch framed by the sentinel writes, record the outcome and verify.
fn emit_branch(mut case: CaseContext, condition: &str, taken: bool) -> GenResult<()> {
    case.begin_test();
    case.line(&format!("$r0 <- {TAKEN_SENTINEL:#x}"));
    case.line(&format!("if {condition} $pc <- {TARGET}f"));
    case.line(&format!("$r0 <- {NOT_TAKEN_SENTINEL:#x}"));
    case.label(TARGET);
    case.end_test();

    let sentinel = if taken {
        TAKEN_SENTINEL
    } else {
        NOT_TAKEN_SENTINEL
    };
    case.regs_mut().write(RegisterId::R0, sentinel as i64);

    case.verify()
}

/// Emit a register to register comparison, `if a cond b $pc <- 3f`.
///
/// # Arguments
///
/// * `program` - The [`Program`] receiving the case.
/// * `lhs` - The left register. Must not be register 0.
/// * `rhs` - The right register. Must not be register 0.
/// * `domain` - The [`Domain`] both registers are compared in.
/// * `cond` - The comparison [`Operator`].
pub fn register_register(
    program: &mut Program,
    lhs: RegisterId,
    rhs: RegisterId,
    domain: Domain,
    cond: Operator,
) -> GenResult<()> {
    check_operand(lhs)?;
    check_operand(rhs)?;
    check_condition(cond, domain)?;

    let header = CaseHeader::new("branch_rr")
        .arg("a", lhs)
        .arg("b", rhs)
        .arg("domain", domain)
        .arg("cond", cond);
    let mut case = program.begin_case(init_for(domain), header);
    case.setup()?;

    let (a, b) = (Operand::from(lhs), Operand::from(rhs));
    let condition = format!(
        "{} {cond} {}",
        case.render(&a, domain.view())?,
        case.render(&b, domain.view())?
    );

    let lhs_value = domain.interpret_operand(&a, case.regs())?;
    let rhs_value = domain.interpret_operand(&b, case.regs())?;
    let taken = evaluator::apply(cond, lhs_value, rhs_value, ShiftRule::Masked)?.flag();

    emit_branch(case, &condition, taken)
}

/// Emit a comparison against zero, `if a cond 0 $pc <- 3f`.
///
/// # Arguments
///
/// * `program` - The [`Program`] receiving the case.
/// * `lhs` - The register under test. Must not be register 0.
/// * `domain` - The [`Domain`] the register is compared in.
/// * `cond` - The comparison [`Operator`].
pub fn register_zero(
    program: &mut Program,
    lhs: RegisterId,
    domain: Domain,
    cond: Operator,
) -> GenResult<()> {
    check_operand(lhs)?;
    check_condition(cond, domain)?;

    let header = CaseHeader::new("branch_rz")
        .arg("a", lhs)
        .arg("domain", domain)
        .arg("cond", cond);
    let mut case = program.begin_case(init_for(domain), header);
    case.setup()?;

    let a = Operand::from(lhs);
    let condition = format!("{} {cond} 0", case.render(&a, domain.view())?);

    let value = domain.interpret_operand(&a, case.regs())?;
    let taken = evaluator::apply(cond, value, Scalar::Int(0), ShiftRule::Masked)?.flag();

    emit_branch(case, &condition, taken)
}

/// Emit a single bit test, `if $ra[bit] == value $pc <- 3f`.
///
/// # Arguments
///
/// * `program` - The [`Program`] receiving the case.
/// * `lhs` - The register under test. Must not be register 0.
/// * `bit` - The index of the bit, in the range 0 to 31 (inclusive).
/// * `value` - The bit value that takes the branch.
pub fn bit_test(program: &mut Program, lhs: RegisterId, bit: u8, value: bool) -> GenResult<()> {
    check_operand(lhs)?;
    if bit > 31 {
        return Err(GenError::InvalidBitIndex(bit));
    }

    let header = CaseHeader::new("branch_bit")
        .arg("a", lhs)
        .arg("bit", bit)
        .arg("value", value as u8);
    let mut case = program.begin_case(InitPattern::Integer, header);
    case.setup()?;

    let condition = format!("{lhs}[{bit}] == {}", value as u8);
    let taken = utils::is_bit_set(case.regs().read(lhs), bit) == value;

    emit_branch(case, &condition, taken)
}

#[cfg(test)]
mod tests_branch {
    use strum::IntoEnumIterator;

    use crate::{
        config::{NOT_TAKEN_SENTINEL, TAKEN_SENTINEL},
        emit::test_support::checked_value,
        error::GenError,
        eval::{domain::Domain, operator::Operator},
        program::Program,
        reg::registers::RegisterId,
    };

    use super::{bit_test, register_register, register_zero};

    fn sentinel(taken: bool) -> u32 {
        if taken {
            TAKEN_SENTINEL
        } else {
            NOT_TAKEN_SENTINEL
        }
    }

    #[test]
    fn test_register_register() {
        use Operator::*;

        // Integer mirror: r1 = -2, r2 = 4, r3 = -8. Float mirror: r1 = 1.0, r2 = 2.0.
        let tests = [
            (RegisterId::R3, RegisterId::R2, Domain::Signed, Lt, true),
            (RegisterId::R3, RegisterId::R2, Domain::Unsigned, Lt, false),
            (RegisterId::R1, RegisterId::R1, Domain::Unsigned, Eq, true),
            (RegisterId::R1, RegisterId::R2, Domain::Float, Lt, true),
            (RegisterId::R2, RegisterId::R1, Domain::Float, Ge, true),
            (RegisterId::R2, RegisterId::R1, Domain::Signed, Le, false),
        ];

        for (i, (lhs, rhs, domain, cond, taken)) in tests.iter().enumerate() {
            let mut program = Program::default();
            register_register(&mut program, *lhs, *rhs, *domain, *cond)
                .expect("generation should succeed");

            assert_eq!(
                checked_value(program.text(), 0),
                sentinel(*taken),
                "Test {i} Failed - incorrect sentinel for {lhs} {cond} {rhs} in the {domain} domain"
            );
        }
    }

    #[test]
    fn test_instruction_text() {
        let mut program = Program::default();
        register_register(&mut program, RegisterId::R3, RegisterId::R2, Domain::Signed, Operator::Lt)
            .unwrap();
        register_zero(&mut program, RegisterId::R1, Domain::Float, Operator::Ne).unwrap();
        bit_test(&mut program, RegisterId::R3, 3, true).unwrap();

        let text = program.text();
        assert!(text.contains("        $r0 <- 0xc001c001\n        if $sr3 < $sr2 $pc <- 3f\n"));
        assert!(text.contains("        if $fr1 != 0 $pc <- 3f\n"));
        assert!(text.contains("        if $r3[3] == 1 $pc <- 3f\n        $r0 <- 0xdeadbeef\n    3:\n"));
    }

    #[test]
    fn test_register_zero() {
        let tests = [
            (RegisterId::R1, Domain::Signed, Operator::Lt, true),
            (RegisterId::R1, Domain::Unsigned, Operator::Lt, false),
            (RegisterId::R2, Domain::Unsigned, Operator::Gt, true),
            (RegisterId::R2, Domain::Float, Operator::Eq, false),
        ];

        for (i, (lhs, domain, cond, taken)) in tests.iter().enumerate() {
            let mut program = Program::default();
            register_zero(&mut program, *lhs, *domain, *cond).unwrap();

            assert_eq!(
                checked_value(program.text(), 0),
                sentinel(*taken),
                "Test {i} Failed - incorrect sentinel for {lhs} {cond} 0"
            );
        }
    }

    #[test]
    fn test_bit_test() {
        // r3 = 0xfffffff8: bits 0 to 2 are clear, every other bit is set.
        for bit in 0..32u8 {
            for value in [false, true] {
                let mut program = Program::default();
                bit_test(&mut program, RegisterId::R3, bit, value).unwrap();

                let set = bit >= 3;
                assert_eq!(
                    checked_value(program.text(), 0),
                    sentinel(set == value),
                    "Test {bit} Failed - incorrect sentinel for value {value}"
                );
            }
        }
    }

    #[test]
    fn test_invalid_operands() {
        let mut program = Program::default();

        assert_eq!(
            bit_test(&mut program, RegisterId::R3, 32, true),
            Err(GenError::InvalidBitIndex(32))
        );
        assert!(matches!(
            register_zero(&mut program, RegisterId::R0, Domain::Signed, Operator::Eq),
            Err(GenError::ReservedRegister(_))
        ));
        assert!(matches!(
            register_register(&mut program, RegisterId::R1, RegisterId::R2, Domain::Signed, Operator::Add),
            Err(GenError::UnsupportedOperation { .. })
        ));
        assert_eq!(program.case_count(), 0);
    }

    #[test]
    fn test_every_register_is_checked() {
        let mut program = Program::default();
        register_zero(&mut program, RegisterId::R5, Domain::Signed, Operator::Lt).unwrap();

        for id in RegisterId::iter() {
            let check = format!("{id} <- {id} + (-");
            assert!(program.text().contains(&check), "{id} was not checked");
        }
    }
}
