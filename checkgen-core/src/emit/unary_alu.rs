use crate::{
    error::GenResult,
    eval::unary::UnaryOp,
    program::{CaseHeader, Program},
    reg::{operand::Operand, registers::InitPattern},
    utils,
};

/// Emit a single operand case, `rd <- op(source)`, using the mirror pattern the
/// operation is normally exercised with.
///
/// # Arguments
///
/// * `program` - The [`Program`] receiving the case.
/// * `rd` - The destination. Must be a register.
/// * `source` - The source operand.
/// * `op` - The [`UnaryOp`] under test.
pub fn unary(program: &mut Program, rd: Operand, source: Operand, op: UnaryOp) -> GenResult<()> {
    unary_with_init(program, rd, source, op, op.default_init())
}

/// Emit a single operand case with an explicit mirror pattern.
///
/// # Arguments
///
/// * `program` - The [`Program`] receiving the case.
/// * `rd` - The destination. Must be a register.
/// * `source` - The source operand.
/// * `op` - The [`UnaryOp`] under test.
/// * `init` - The [`InitPattern`] the mirror is reset to.
pub fn unary_with_init(
    program: &mut Program,
    rd: Operand,
    source: Operand,
    op: UnaryOp,
    init: InitPattern,
) -> GenResult<()> {
    let dest_id = rd.expect_register()?;
    let header = CaseHeader::new("unary_alu")
        .arg("rd", rd)
        .arg("src", source)
        .arg("op", op);
    let mut case = program.begin_case(init, header);

    case.setup()?;

    let dest = case.render(&rd, op.dest_view())?;
    let src = case.render(&source, op.source_view())?;

    case.begin_test();
    case.line(&format!("{dest} <- {}", op.expression(&src)));
    case.end_test();

    let input = utils::unsigned32(source.get(case.regs()));
    let result = op.apply(input)?;

    case.regs_mut().write(dest_id, result as i64);
    case.verify()
}

#[cfg(test)]
mod tests_unary_alu {
    use crate::{
        emit::test_support::checked_value,
        error::GenError,
        eval::unary::UnaryOp,
        program::Program,
        reg::{operand::Operand, registers::InitPattern},
    };

    fn reg(index: u8) -> Operand {
        Operand::reg(index).expect("valid register")
    }

    #[test]
    fn test_default_patterns() {
        // Integer mirror: r4 = 16, r7 = -128. Float mirror: r4 = 4.0, r2 = 2.0.
        let tests = [
            (UnaryOp::Increment, 4, 17u32, "        $r3 <- $r4 + 1\n"),
            (UnaryOp::Decrement, 4, 15, "        $r3 <- $r4 - 1\n"),
            (UnaryOp::Not, 4, 0xffff_ffef, "        $r3 <- ~$r4\n"),
            (UnaryOp::Negate, 7, 128, "        $sr3 <- -$sr7\n"),
            (UnaryOp::ByteSwap, 7, 0x80ff_ffff, "        $r3 <- bswap $r7\n"),
            (UnaryOp::WordSwap, 7, 0xff80_ffff, "        $r3 <- wswap $r7\n"),
            (UnaryOp::SignExtendByte, 7, 0xffff_ff80, "        $sr3 <- bsi $r7\n"),
            (UnaryOp::SignExtendHalf, 4, 16, "        $sr3 <- wsi $r4\n"),
            (UnaryOp::Floor, 4, 4, "        $sr3 <- floor $fr4\n"),
            (UnaryOp::IntToFloat, 7, 0xc300_0000, "        $fr3 <- $sr7\n"),
            (UnaryOp::Reciprocal, 4, 0x3e80_0000, "        $fr3 <- 1/$fr4\n"),
            (UnaryOp::ReciprocalSqrt, 4, 0x3f00_0000, "        $fr3 <- rsqrt $fr4\n"),
        ];

        for (i, (op, source, expected, instruction)) in tests.iter().enumerate() {
            let mut program = Program::default();
            super::unary(&mut program, reg(3), reg(*source), *op)
                .expect("generation should succeed");

            assert!(
                program.text().contains(instruction),
                "Test {i} Failed - missing instruction for {op}"
            );
            assert_eq!(
                checked_value(program.text(), 3),
                *expected,
                "Test {i} Failed - incorrect result for {op}"
            );
        }
    }

    #[test]
    fn test_in_place_update() {
        let mut program = Program::default();
        super::unary(&mut program, reg(2), reg(2), UnaryOp::Reciprocal).unwrap();
        assert_eq!(checked_value(program.text(), 2), 0.5f32.to_bits());
    }

    #[test]
    fn test_reciprocal_of_zero_is_infinite() {
        let mut program = Program::default();
        super::unary(&mut program, reg(3), reg(0), UnaryOp::Reciprocal).unwrap();
        assert_eq!(checked_value(program.text(), 3), f32::INFINITY.to_bits());
    }

    #[test]
    fn test_domain_errors_emit_nothing() {
        let mut program = Program::default();

        // Under the integer mirror r1 holds 0xfffffffe, a NaN.
        let result = super::unary_with_init(
            &mut program,
            reg(3),
            reg(1),
            UnaryOp::Floor,
            InitPattern::Integer,
        );
        assert!(matches!(result, Err(GenError::DomainError(_))));

        // r3 holds 0xfffffff8, another NaN. It is not negative, so it propagates.
        let result = super::unary_with_init(
            &mut program,
            reg(4),
            reg(3),
            UnaryOp::ReciprocalSqrt,
            InitPattern::Integer,
        );
        assert!(result.is_ok());
        assert_eq!(program.case_count(), 1);
    }
}
