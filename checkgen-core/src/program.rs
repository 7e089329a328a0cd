use core::fmt;
use std::fmt::{Display, Write};

use itertools::Itertools;
use strum::IntoEnumIterator;

use crate::{
    config::TargetConfig,
    emit::harness::{self, BEGIN_MARKER, END_MARKER, INDENT, LABEL_INDENT, Verifier},
    error::GenResult,
    reg::{
        operand::{Operand, View},
        registers::{InitPattern, RegisterId, Registers},
    },
};

/// The identifying comment placed in front of each test case.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct CaseHeader {
    name: String,
    args: Vec<(String, String)>,
}

impl CaseHeader {
    /// Build a new [`CaseHeader`].
    ///
    /// # Arguments
    ///
    /// * `name` - The name of the emitter producing the case.
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            args: Vec::new(),
        }
    }

    /// Add a named argument to the header.
    pub fn arg(mut self, key: &str, value: impl Display) -> Self {
        self.args.push((key.to_string(), value.to_string()));
        self
    }

    #[inline(always)]
    pub fn name(&self) -> &str {
        &self.name
    }
}

impl Display for CaseHeader {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "## {}", self.name)?;
        for (key, value) in &self.args {
            write!(f, " {key}={value}")?;
        }
        Ok(())
    }
}

/// A generated test program under construction.
///
/// The program owns the register mirror. Mutable access to the mirror is only
/// handed out through [`Program::begin_case`], which resets it first, so no
/// case can observe the state left behind by the previous one.
pub struct Program {
    config: TargetConfig,
    registers: Registers,
    output: String,
    case_count: usize,
}

impl Program {
    /// Build a new [`Program`] and emit its prologue.
    ///
    /// # Arguments
    ///
    /// * `config` - The [`TargetConfig`] describing the target machine.
    pub fn new(config: TargetConfig) -> Self {
        let mut output = String::new();
        harness::prologue(&mut output, &config);

        Self {
            config,
            registers: Registers::new(),
            output,
            case_count: 0,
        }
    }

    #[inline(always)]
    pub fn config(&self) -> &TargetConfig {
        &self.config
    }

    /// The mirror, as left by the last case.
    #[inline(always)]
    pub fn registers(&self) -> &Registers {
        &self.registers
    }

    /// The number of cases that have been verified and appended to the program.
    #[inline(always)]
    pub fn case_count(&self) -> usize {
        self.case_count
    }

    /// The program text emitted so far.
    #[inline(always)]
    pub fn text(&self) -> &str {
        &self.output
    }

    /// Start a new test case.
    ///
    /// # Arguments
    ///
    /// * `pattern` - The [`InitPattern`] the mirror is reset to.
    /// * `header` - The [`CaseHeader`] identifying the case in the output.
    ///
    /// # Returns
    ///
    /// A [`CaseContext`] through which the case is emitted. Nothing reaches the
    /// program until [`CaseContext::verify`] succeeds.
    pub fn begin_case(&mut self, pattern: InitPattern, header: CaseHeader) -> CaseContext<'_> {
        self.registers.reset(pattern);

        let mut buffer = String::new();
        let _ = writeln!(buffer, "{INDENT}{header}");
        let _ = writeln!(
            buffer,
            "{INDENT}###################################################"
        );

        CaseContext {
            program: self,
            header,
            buffer,
        }
    }

    /// Emit the pass and fail sequences and return the finished program text.
    pub fn finish(mut self) -> String {
        harness::pass_sequence(&mut self.output, &self.config);
        harness::fail_sequence(&mut self.output, &self.config);

        tracing::debug!("finished program with {} cases", self.case_count);

        self.output
    }
}

impl Default for Program {
    fn default() -> Self {
        Self::new(TargetConfig::default())
    }
}

/// A single test case being emitted.
///
/// Text is collected in a scratch buffer. Dropping the context without
/// verifying it discards the case entirely.
pub struct CaseContext<'a> {
    program: &'a mut Program,
    header: CaseHeader,
    buffer: String,
}

impl CaseContext<'_> {
    #[inline(always)]
    pub fn config(&self) -> &TargetConfig {
        &self.program.config
    }

    #[inline(always)]
    pub fn regs(&self) -> &Registers {
        &self.program.registers
    }

    #[inline(always)]
    pub fn regs_mut(&mut self) -> &mut Registers {
        &mut self.program.registers
    }

    /// Emit an instruction line.
    pub fn line(&mut self, text: &str) {
        let _ = writeln!(self.buffer, "{INDENT}{text}");
    }

    /// Emit an instruction line built from tokens, skipping empty ones.
    ///
    /// Optional prefixes such as `short` or `upper` render as empty strings when
    /// absent, this keeps the tokens separated by exactly one space.
    pub fn tokens(&mut self, tokens: &[&str]) {
        let text = tokens.iter().filter(|t| !t.is_empty()).join(" ");
        self.line(&text);
    }

    /// Emit a label definition, such as a numeric local label.
    pub fn label(&mut self, name: &str) {
        let _ = writeln!(self.buffer, "{LABEL_INDENT}{name}:");
    }

    /// Emit a comment line.
    pub fn comment(&mut self, text: &str) {
        let _ = writeln!(self.buffer, "{INDENT}# {text}");
    }

    /// Render an operand against the current mirror.
    pub fn render(&self, operand: &Operand, view: View) -> GenResult<String> {
        operand.render(view, &self.program.registers)
    }

    /// Load every register of the target with its mirrored value.
    pub fn setup(&mut self) -> GenResult<()> {
        for id in RegisterId::iter() {
            let operand = Operand::from(id);
            let name = self.render(&operand, View::Reg)?;
            let value = self.render(&operand, View::Val)?;
            self.line(&format!("{name} <- {value}"));
        }

        Ok(())
    }

    /// Emit the marker preceding the instructions under test.
    pub fn begin_test(&mut self) {
        self.line(BEGIN_MARKER);
    }

    /// Emit the marker following the instructions under test.
    pub fn end_test(&mut self) {
        self.line(END_MARKER);
    }

    /// Check every register against the mirror and append the case to the program.
    pub fn verify(self) -> GenResult<()> {
        self.verify_except(&[])
    }

    /// Check every register not in `excluded` against the mirror and append the case
    /// to the program.
    ///
    /// # Arguments
    ///
    /// * `excluded` - Registers used as scratch by the case, whose final value is not
    ///   predictable by the mirror.
    pub fn verify_except(self, excluded: &[RegisterId]) -> GenResult<()> {
        let CaseContext {
            program,
            header,
            mut buffer,
        } = self;

        let checked: Vec<RegisterId> = RegisterId::iter()
            .filter(|id| !excluded.contains(id))
            .collect();

        Verifier::new(&checked).run(&mut buffer, &mut program.registers)?;
        buffer.push('\n');

        program.output.push_str(&buffer);
        program.case_count += 1;

        tracing::debug!(
            "emitted case {} ({}), checked {} registers",
            program.case_count,
            header,
            checked.len()
        );

        Ok(())
    }
}
