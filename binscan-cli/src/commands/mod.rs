//! CLI subcommands.

pub mod admin;
pub mod bins;
pub mod common;
pub mod config;
pub mod scan;
