//! Command orchestration for the two binaries.

pub mod render;
pub mod tree;
