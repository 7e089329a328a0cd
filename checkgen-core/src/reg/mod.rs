pub mod immediate;
pub mod operand;
pub mod register;
pub mod registers;
