//! CLI command implementations.

pub mod call;
pub mod common;
pub mod serve;
pub mod sets;
pub mod tree;
