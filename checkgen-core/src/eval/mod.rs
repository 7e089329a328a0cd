pub mod domain;
pub mod evaluator;
pub mod operator;
pub mod unary;
