//! Decoding pipeline: line scanner, value formatter, node arena, parser.

pub mod arena;
pub mod format;
pub mod parser;
pub mod scanner;
