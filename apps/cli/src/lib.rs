//! Command-line runner for AQL queries over openEHR documents

pub mod commands;
pub mod config;
pub mod loader;
pub mod logging;
pub mod request;
