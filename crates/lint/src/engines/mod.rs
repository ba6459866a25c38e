//! Built-in engines.

pub mod dictionary;
pub mod rules;
mod tokens;
