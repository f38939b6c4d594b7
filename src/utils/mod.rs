//! Supporting data structures: graphs, bit sets and DOT output.

pub mod bitset;
pub mod dot;
pub mod graph;

pub use bitset::BitSet;
pub use dot::{escape_dot, DotWriter};
