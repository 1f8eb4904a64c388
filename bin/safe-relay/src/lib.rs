//! Safe Relay CLI

pub mod cli;
pub mod utils;
