//! Command-line definition

pub mod commands;
