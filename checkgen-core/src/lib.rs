#![crate_name = "checkgen_core"]
#![deny(unsafe_op_in_unsafe_fn)]

pub mod config;
pub mod emit;
pub mod error;
pub mod eval;
pub mod program;
pub mod reg;
pub mod suite;
pub mod utils;
