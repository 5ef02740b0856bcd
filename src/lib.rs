//! Multi-field input validation: a prompt and a list of remote images are checked
//! against a fixed battery of rules and summarised in a [`validation::Verdict`].

pub mod backend;
pub mod config;
pub mod consts;
pub mod utils;
pub mod validation;
