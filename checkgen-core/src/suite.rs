use hashbrown::{HashMap, HashSet};
use itertools::iproduct;
use prettytable::{Table, row};
use rand::{Rng, SeedableRng};
use rand_xoshiro::Xoshiro256Plus;
use strum::IntoEnumIterator;
use strum_macros::{Display, EnumIter, EnumString};

use crate::{
    emit::{
        alu, binary_alu, branch,
        load_store::{self, Addressing},
        pc_relative, unary_alu,
    },
    error::GenResult,
    eval::{domain::Domain, evaluator::AccessSize, operator::Operator, unary::UnaryOp},
    program::Program,
    reg::{
        operand::Operand,
        registers::{REGISTER_COUNT, RegisterId},
    },
};

/// The number of cases emitted by the random immediate suite when no count is given.
pub const DEFAULT_RANDOM_COUNT: usize = 256;

/// The bits probed by the bit test branch cases.
const PROBED_BITS: [u8; 15] = [0, 1, 2, 3, 4, 5, 6, 7, 8, 9, 14, 15, 16, 30, 31];

/// A named group of test cases covering one instruction category.
#[derive(Clone, Copy, Debug, Display, EnumIter, EnumString, Eq, Hash, PartialEq)]
#[strum(serialize_all = "kebab-case")]
pub enum Suite {
    Alu,
    BinaryAlu,
    UnaryAlu,
    LoadStore,
    Branch,
    PcRelative,
    /// Wide ALU cases with randomly chosen registers and immediates.
    RandomImm,
}

/// Options shared by every suite.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct SuiteOptions {
    /// The register stride of the nested driver loops. Each suite has its own default.
    pub stride: Option<usize>,
    /// The seed of the random immediate suite. A fresh seed is drawn when absent.
    pub seed: Option<u64>,
    /// The number of cases emitted by the random immediate suite.
    pub count: usize,
}

impl Default for SuiteOptions {
    fn default() -> Self {
        Self {
            stride: None,
            seed: None,
            count: DEFAULT_RANDOM_COUNT,
        }
    }
}

/// Every register from `first` upwards, skipping `stride - 1` registers between each.
fn registers(first: u8, stride: usize) -> Vec<RegisterId> {
    (first..REGISTER_COUNT as u8)
        .step_by(stride.max(1))
        .filter_map(|i| RegisterId::from_index(i).ok())
        .collect()
}

impl Suite {
    /// The register stride used when none is requested.
    pub fn default_stride(&self) -> usize {
        match self {
            Suite::Alu | Suite::BinaryAlu => 3,
            _ => 1,
        }
    }

    /// Emit every case of this suite.
    ///
    /// # Arguments
    ///
    /// * `program` - The [`Program`] receiving the cases.
    /// * `options` - The [`SuiteOptions`] to be applied.
    ///
    /// # Returns
    ///
    /// The number of cases emitted.
    pub fn run(&self, program: &mut Program, options: &SuiteOptions) -> GenResult<usize> {
        let before = program.case_count();
        let stride = options.stride.unwrap_or(self.default_stride());

        match self {
            Suite::Alu => run_alu(program, stride)?,
            Suite::BinaryAlu => run_binary_alu(program, stride)?,
            Suite::UnaryAlu => run_unary_alu(program, stride)?,
            Suite::LoadStore => run_load_store(program, stride)?,
            Suite::Branch => run_branch(program, stride)?,
            Suite::PcRelative => run_pc_relative(program, stride)?,
            Suite::RandomImm => run_random_imm(program, options)?,
        }

        let emitted = program.case_count() - before;
        tracing::info!("suite {self} emitted {emitted} cases");

        Ok(emitted)
    }
}

/// Run a list of suites, in order, skipping repeats.
///
/// # Arguments
///
/// * `program` - The [`Program`] receiving the cases.
/// * `suites` - The suites to be run. Every suite is run if the list is empty.
/// * `options` - The [`SuiteOptions`] to be applied.
///
/// # Returns
///
/// The number of cases emitted by each suite.
pub fn run_suites(
    program: &mut Program,
    suites: &[Suite],
    options: &SuiteOptions,
) -> GenResult<HashMap<Suite, usize>> {
    let selected: Vec<Suite> = if suites.is_empty() {
        Suite::iter().collect()
    } else {
        suites.to_vec()
    };

    let mut seen = HashSet::new();
    let mut counts = HashMap::new();
    for suite in selected {
        if !seen.insert(suite) {
            continue;
        }

        counts.insert(suite, suite.run(program, options)?);
    }

    Ok(counts)
}

/// Build a table of the number of cases emitted by each suite.
pub fn summary_table(counts: &HashMap<Suite, usize>) -> Table {
    let mut table = Table::new();
    table.add_row(row!["Suite", "Cases"]);

    let mut total = 0;
    for suite in Suite::iter() {
        if let Some(count) = counts.get(&suite) {
            table.add_row(row![suite, count]);
            total += count;
        }
    }
    table.add_row(row!["total", total]);

    table
}

fn run_alu(program: &mut Program, stride: usize) -> GenResult<()> {
    use Operator::*;

    let regs = registers(0, stride);
    for (&rd, &a, &b) in iproduct!(&regs, &regs, &regs) {
        let (rd, a, b) = (Operand::from(rd), Operand::from(a), Operand::from(b));

        for op in [Xor, Or, And, Add, Sub, Mul] {
            alu::uuu(program, rd, a, b, op)?;
            alu::sss(program, rd, a, b, op)?;
        }
        for op in [Shl, Shr] {
            alu::uuu(program, rd, a, b, op)?;
        }
        alu::ssu(program, rd, a, b, Shr)?;
        for op in [Add, Sub, Mul] {
            alu::fff(program, rd, a, b, op)?;
        }
    }

    let reg = |index: u8| RegisterId::from_index(index).map(Operand::from);
    alu::uuu(program, reg(3)?, reg(2)?, Operand::simm(0xffff), Add)?;
    alu::sss(program, reg(3)?, reg(2)?, Operand::simm(0xffff), Add)?;
    alu::fff(program, reg(3)?, reg(2)?, Operand::fimm(1.0), Add)?;
    alu::fff(program, reg(3)?, Operand::fimm(1.0), reg(2)?, Sub)?;
    alu::fff(program, reg(3)?, Operand::fimm(-1.0), reg(2)?, Sub)?;
    alu::fff(program, reg(3)?, reg(2)?, reg(14)?, Mul)?;

    Ok(())
}

fn run_binary_alu(program: &mut Program, stride: usize) -> GenResult<()> {
    use Operator::*;

    let r3 = Operand::from(RegisterId::R3);
    binary_alu::sss(program, r3, r3, r3, Mul, true)?;

    let regs = registers(0, stride);
    for (&rd, &a, &b) in iproduct!(&regs, &regs, &regs) {
        let (rd, a, b) = (Operand::from(rd), Operand::from(a), Operand::from(b));

        for op in [Xor, Or, And, Add, Sub, Shl, Shr] {
            binary_alu::uuu(program, rd, a, b, op, false)?;
        }
        binary_alu::ssu(program, rd, a, b, Shr)?;
        binary_alu::uuu(program, rd, a, b, Mul, false)?;
        binary_alu::uuu(program, rd, a, b, Mul, true)?;
        binary_alu::sss(program, rd, a, b, Mul, true)?;
        for op in [Add, Sub, Mul] {
            binary_alu::fff(program, rd, a, b, op)?;
        }
    }

    Ok(())
}

fn run_unary_alu(program: &mut Program, stride: usize) -> GenResult<()> {
    let regs = registers(0, stride);
    for (&rd, &source) in iproduct!(&regs, &regs) {
        for op in UnaryOp::iter().filter(|op| *op != UnaryOp::ReciprocalSqrt) {
            unary_alu::unary(program, rd.into(), source.into(), op)?;
        }
    }

    // Every second register, so the float mirror only yields non-negative inputs.
    let sources = registers(0, stride.saturating_mul(2));
    for (&rd, &source) in iproduct!(&regs, &sources) {
        unary_alu::unary(program, rd.into(), source.into(), UnaryOp::ReciprocalSqrt)?;
    }

    Ok(())
}

fn run_load_store(program: &mut Program, stride: usize) -> GenResult<()> {
    let first = Addressing::new(Some(RegisterId::R0), Some(4))?;
    load_store::load_store(program, RegisterId::R1, first, AccessSize::Half, false)?;

    let regs = registers(0, stride);
    for (&rd, &rb) in iproduct!(&regs, &regs) {
        if rd == rb {
            continue;
        }

        let modes = [
            Addressing::BaseOffset(rb, 4),
            Addressing::Base(rb),
            Addressing::Offset(4),
        ];
        let sizes = [AccessSize::Word, AccessSize::Half, AccessSize::Byte];
        for (sign_extend, size, addressing) in iproduct!([false, true], sizes, modes) {
            load_store::load_store(program, rd, addressing, size, sign_extend)?;
        }
    }

    Ok(())
}

fn run_branch(program: &mut Program, stride: usize) -> GenResult<()> {
    let regs = registers(1, stride);
    let conditions: Vec<Operator> = Operator::iter().filter(|op| op.is_comparison()).collect();
    let domains = [Domain::Unsigned, Domain::Float, Domain::Signed];

    for (&reg, bit) in iproduct!(&regs, PROBED_BITS) {
        branch::bit_test(program, reg, bit, false)?;
        branch::bit_test(program, reg, bit, true)?;
    }

    for (&reg, domain, &cond) in iproduct!(&regs, domains, &conditions) {
        branch::register_zero(program, reg, domain, cond)?;
    }

    for (&lhs, &rhs, domain, &cond) in iproduct!(&regs, &regs, domains, &conditions) {
        branch::register_register(program, lhs, rhs, domain, cond)?;
    }

    Ok(())
}

fn run_pc_relative(program: &mut Program, stride: usize) -> GenResult<()> {
    let regs = registers(1, stride);

    for (&reg, offset) in iproduct!(&regs, [None, Some(0), Some(4), Some(8), Some(-12)]) {
        pc_relative::tpc_get(program, reg)?;
        pc_relative::indirect_jump(program, reg, false)?;
        pc_relative::indirect_jump(program, reg, true)?;
        pc_relative::pc_load(program, Addressing::new(Some(reg), offset)?)?;
        if offset.is_some() {
            pc_relative::pc_load(program, Addressing::new(None, offset)?)?;
        }
    }

    for (&reg, offset) in iproduct!(&regs, [0, 2, 4, 8, 16, 28]) {
        pc_relative::link(program, reg, offset)?;
    }

    Ok(())
}

fn run_random_imm(program: &mut Program, options: &SuiteOptions) -> GenResult<()> {
    use Operator::*;

    let seed = options.seed.unwrap_or_else(|| rand::rng().random());
    tracing::info!("random immediate seed: {seed}");

    let mut prng = Xoshiro256Plus::seed_from_u64(seed);
    let ops = [Add, Sub, Mul, And, Or, Xor, Shl, Shr];

    for _ in 0..options.count {
        let rd = RegisterId::from_index(prng.random_range(0..REGISTER_COUNT as u8))?;
        let lhs = RegisterId::from_index(prng.random_range(0..REGISTER_COUNT as u8))?;
        let imm = if prng.random_bool(0.5) {
            Operand::simm(prng.random::<u16>() as i64)
        } else {
            Operand::imm(prng.random::<u32>() as i64)
        };
        let op = ops[prng.random_range(0..ops.len())];
        let upper = op == Mul && prng.random_bool(0.25);

        let (rd, lhs) = (Operand::from(rd), Operand::from(lhs));
        match prng.random_range(0..3) {
            0 => binary_alu::uuu(program, rd, lhs, imm, op, upper)?,
            1 => binary_alu::sss(program, rd, lhs, imm, op, upper)?,
            _ => binary_alu::ssu(program, rd, lhs, imm, op)?,
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests_suite {
    use std::str::FromStr;

    use strum::IntoEnumIterator;

    use crate::{program::Program, reg::registers::RegisterId};

    use super::{Suite, SuiteOptions, registers, run_suites, summary_table};

    #[test]
    fn test_suite_names() {
        let tests = [
            ("alu", Suite::Alu),
            ("binary-alu", Suite::BinaryAlu),
            ("unary-alu", Suite::UnaryAlu),
            ("load-store", Suite::LoadStore),
            ("branch", Suite::Branch),
            ("pc-relative", Suite::PcRelative),
            ("random-imm", Suite::RandomImm),
        ];

        for (i, (name, suite)) in tests.iter().enumerate() {
            assert_eq!(Suite::from_str(name), Ok(*suite), "Test {i} Failed - {name}");
            assert_eq!(suite.to_string(), *name, "Test {i} Failed - {name}");
        }
        assert!(Suite::from_str("fpu").is_err());
    }

    #[test]
    fn test_register_strides() {
        assert_eq!(registers(0, 3).len(), 5);
        assert_eq!(registers(1, 1).len(), 14);
        assert_eq!(registers(1, 1)[0], RegisterId::R1);
        assert_eq!(registers(0, 0).len(), 15);
    }

    #[test]
    fn test_huge_stride_keeps_first_register() {
        let options = SuiteOptions {
            stride: Some(usize::MAX),
            seed: Some(7),
            count: 4,
        };

        // Only r0 (or r1 for the families reserving r0) survives the stride.
        let tests = [
            (Suite::Alu, 18 + 6),
            (Suite::UnaryAlu, 11 + 1),
            (Suite::Branch, 15 * 2 + 18 + 18),
        ];

        for (i, (suite, expected)) in tests.iter().enumerate() {
            let mut program = Program::default();
            let emitted = suite
                .run(&mut program, &options)
                .expect("suite should succeed");
            assert_eq!(emitted, *expected, "Test {i} Failed - {suite} case count");
        }

        assert_eq!(registers(0, usize::MAX), vec![RegisterId::R0]);
    }

    #[test]
    fn test_case_counts() {
        let options = SuiteOptions {
            stride: None,
            seed: Some(7),
            count: 20,
        };

        // 14 registers, each with 15 bits tested for both values, 18 zero
        // comparisons and 14 * 18 register comparisons.
        let branch = 14 * 15 * 2 + 14 * 18 + 14 * 14 * 18;
        // 14 registers with 5 offsets, of which 4 also give an offset only load.
        let pc_relative = 14 * (5 * 4 + 4) + 14 * 6;

        let tests = [
            (Suite::Alu, 125 * 18 + 6),
            (Suite::BinaryAlu, 1 + 125 * 14),
            (Suite::UnaryAlu, 225 * 11 + 15 * 8),
            (Suite::LoadStore, 1 + 210 * 18),
            (Suite::Branch, branch),
            (Suite::PcRelative, pc_relative),
            (Suite::RandomImm, 20),
        ];

        for (i, (suite, expected)) in tests.iter().enumerate() {
            let mut program = Program::default();
            let emitted = suite.run(&mut program, &options).expect("suite should succeed");

            assert_eq!(emitted, *expected, "Test {i} Failed - {suite} case count");
            assert_eq!(program.case_count(), *expected);
        }
    }

    #[test]
    fn test_random_suite_is_reproducible() {
        let options = SuiteOptions {
            stride: None,
            seed: Some(0xdead_beef),
            count: 50,
        };

        let mut first = Program::default();
        Suite::RandomImm.run(&mut first, &options).unwrap();
        let mut second = Program::default();
        Suite::RandomImm.run(&mut second, &options).unwrap();

        assert_eq!(first.finish(), second.finish());
    }

    #[test]
    fn test_run_suites_skips_repeats() {
        let options = SuiteOptions {
            stride: Some(7),
            seed: Some(1),
            count: 4,
        };

        let mut program = Program::default();
        let counts = run_suites(
            &mut program,
            &[Suite::RandomImm, Suite::PcRelative, Suite::RandomImm],
            &options,
        )
        .unwrap();

        assert_eq!(counts.len(), 2);
        assert_eq!(counts[&Suite::RandomImm], 4);
        assert_eq!(program.case_count(), counts.values().sum::<usize>());

        // Header, one row per suite that ran, and the total.
        assert_eq!(summary_table(&counts).len(), 4);
        assert!(Suite::iter().count() > counts.len());
    }
}
