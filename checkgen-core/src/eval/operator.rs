use core::fmt;
use std::{fmt::Display, str::FromStr};

use strum_macros::EnumIter;

use crate::error::GenError;

/// A binary operator understood by the expected-value evaluator.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, EnumIter)]
pub enum Operator {
    Add,
    Sub,
    Mul,
    And,
    Or,
    Xor,
    /// Left shift.
    Shl,
    /// Right shift. Logical for unsigned left hand sides, arithmetic for signed ones.
    Shr,
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
}

impl Operator {
    /// The assembly symbol of this operator.
    pub fn symbol(&self) -> &'static str {
        match self {
            Operator::Add => "+",
            Operator::Sub => "-",
            Operator::Mul => "*",
            Operator::And => "&",
            Operator::Or => "|",
            Operator::Xor => "^",
            Operator::Shl => "<<",
            Operator::Shr => ">>",
            Operator::Eq => "==",
            Operator::Ne => "!=",
            Operator::Lt => "<",
            Operator::Le => "<=",
            Operator::Gt => ">",
            Operator::Ge => ">=",
        }
    }

    /// Does this operator produce a boolean rather than a value?
    pub fn is_comparison(&self) -> bool {
        matches!(
            self,
            Operator::Eq | Operator::Ne | Operator::Lt | Operator::Le | Operator::Gt | Operator::Ge
        )
    }

    pub fn is_shift(&self) -> bool {
        matches!(self, Operator::Shl | Operator::Shr)
    }

    /// Is this operator defined on float operands?
    pub fn supports_float(&self) -> bool {
        self.is_comparison() || matches!(self, Operator::Add | Operator::Sub | Operator::Mul)
    }
}

impl FromStr for Operator {
    type Err = GenError;

    fn from_str(input: &str) -> Result<Operator, Self::Err> {
        match input.trim() {
            "+" => Ok(Operator::Add),
            "-" => Ok(Operator::Sub),
            "*" => Ok(Operator::Mul),
            "&" => Ok(Operator::And),
            "|" => Ok(Operator::Or),
            "^" => Ok(Operator::Xor),
            "<<" => Ok(Operator::Shl),
            ">>" => Ok(Operator::Shr),
            "==" => Ok(Operator::Eq),
            "!=" => Ok(Operator::Ne),
            "<" => Ok(Operator::Lt),
            "<=" => Ok(Operator::Le),
            ">" => Ok(Operator::Gt),
            ">=" => Ok(Operator::Ge),
            other => Err(GenError::UnknownOperator(other.to_string())),
        }
    }
}

impl Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.symbol())
    }
}

#[cfg(test)]
mod tests_operator {
    use strum::IntoEnumIterator;

    use super::Operator;

    #[test]
    fn test_symbols_round_trip() {
        for op in Operator::iter() {
            assert_eq!(op.symbol().parse::<Operator>(), Ok(op));
        }
        assert!("**".parse::<Operator>().is_err());
    }

    #[test]
    fn test_float_support() {
        let float_ops: Vec<Operator> = Operator::iter().filter(|op| op.supports_float()).collect();
        assert_eq!(float_ops.len(), 9);
        assert!(!Operator::Shl.supports_float());
        assert!(!Operator::Xor.supports_float());
    }
}
