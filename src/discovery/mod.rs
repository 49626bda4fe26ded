//! File discovery: flatten a remote tree, then filter it by pattern.

mod matcher;
mod walker;

pub use matcher::{PatternMatcher, DEFAULT_MAX_RESULTS};
pub use walker::TreeWalker;
