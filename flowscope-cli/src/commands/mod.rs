pub mod analyze;
pub mod common;
pub mod compile;
pub mod eval;
