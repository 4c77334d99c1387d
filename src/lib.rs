// library crate for listen-filter
// the expression engine lives in `expr`; `listen` provides the record type it runs on

pub mod cli;
pub mod config;
pub mod expr;
pub mod listen;
