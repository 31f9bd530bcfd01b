//! Terminal client: argument parsing and printing. Not part of the library API.

pub mod args;
pub mod print;
