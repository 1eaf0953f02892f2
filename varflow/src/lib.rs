#[macro_use]
extern crate log;

pub mod classifier;
pub mod cli;
pub mod commands;
pub mod common;
pub mod config;
pub mod tools;

pub use common::error::VarflowError;
