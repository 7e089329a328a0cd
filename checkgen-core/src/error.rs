use thiserror::Error;

use crate::{eval::operator::Operator, reg::operand::View};

/// Result with internal [`GenError`] type.
pub type GenResult<T> = std::result::Result<T, GenError>;

/// Errors raised while generating a test program.
///
/// Every variant is a precondition violation by the caller. None of them
/// describe a disagreement with the target, those can only be observed when
/// the generated program is executed.
#[derive(Clone, Debug, Error, PartialEq)]
pub enum GenError {
    #[error("register index {0} is out of range (expected 0 to 14)")]
    InvalidRegister(u8),

    #[error("the {view} view is not supported for {operand}")]
    UnsupportedView { view: View, operand: String },

    #[error("the {op} operator is not supported in the {domain} domain")]
    UnsupportedOperation { op: Operator, domain: &'static str },

    #[error("unknown operator symbol {0:?}")]
    UnknownOperator(String),

    #[error("negative shift distance {0}")]
    NegativeShift(i64),

    #[error("math domain error: {0}")]
    DomainError(&'static str),

    #[error("either a base register or an offset (or both) must be specified")]
    MissingAddress,

    #[error("{0} cannot be used as both the data and the base register")]
    AliasedOperands(String),

    #[error("{0} is reserved as a scratch register by this test family")]
    ReservedRegister(String),

    #[error("bit index {0} is out of range (expected 0 to 31)")]
    InvalidBitIndex(u8),

    #[error("the destination of a test must be a register, got {0}")]
    ImmediateDestination(String),
}
