mod cli_model;
pub mod process_cli;
pub mod utils;
