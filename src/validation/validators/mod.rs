//! Individual rule evaluators. Each one returns a [`RuleResult`](super::types::RuleResult).

pub mod image;
pub mod text;
pub mod url;
