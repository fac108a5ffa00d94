//! Top-level commands

pub mod copy;
