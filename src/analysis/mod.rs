//! Static analysis of diagrams.
//!
//! - [`cfg`] - control-flow graph, dominators and natural loops

pub mod cfg;

pub use cfg::{Cfg, LoopForest, NaturalLoop};
