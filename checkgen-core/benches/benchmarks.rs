use criterion::{Criterion, criterion_group, criterion_main};

use checkgen_core::{
    emit::{binary_alu, load_store},
    eval::{evaluator::AccessSize, operator::Operator},
    program::Program,
    reg::{operand::Operand, registers::RegisterId},
    suite::{Suite, SuiteOptions},
};

pub fn criterion_program_creation(c: &mut Criterion) {
    c.bench_function("program creation", |b| b.iter(|| Program::default().finish()));
}

pub fn criterion_single_cases(c: &mut Criterion) {
    let rd = Operand::from(RegisterId::R3);
    let a = Operand::from(RegisterId::R2);
    let b = Operand::from(RegisterId::R1);

    c.bench_function("binary alu case", |bench| {
        bench.iter(|| {
            let mut program = Program::default();
            binary_alu::uuu(&mut program, rd, a, b, Operator::Mul, true)
                .expect("generation should succeed");
        })
    });

    c.bench_function("load store case", |bench| {
        bench.iter(|| {
            let mut program = Program::default();
            load_store::load_store(
                &mut program,
                RegisterId::R1,
                load_store::Addressing::BaseOffset(RegisterId::R0, 4),
                AccessSize::Byte,
                true,
            )
            .expect("generation should succeed");
        })
    });
}

pub fn criterion_suites(c: &mut Criterion) {
    let options = SuiteOptions {
        stride: None,
        seed: Some(0xdead_beef),
        count: 256,
    };

    for suite in [Suite::BinaryAlu, Suite::Branch, Suite::RandomImm] {
        c.bench_function(&format!("suite - {suite}"), |b| {
            b.iter(|| {
                let mut program = Program::default();
                suite
                    .run(&mut program, &options)
                    .expect("suite should succeed");
                program.finish()
            })
        });
    }
}

criterion_group!(
    benches,
    criterion_program_creation,
    criterion_single_cases,
    criterion_suites
);
criterion_main!(benches);
