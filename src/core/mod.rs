//! Core types: errors, configuration, and the bounded parameter model.

pub mod config;
pub mod errors;
pub mod parameter;
