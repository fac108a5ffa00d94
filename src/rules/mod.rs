//! Ignore rule resolution

mod resolver;

pub use resolver::{IgnoreResolver, ScopedMatcher};
