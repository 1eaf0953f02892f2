#[macro_use]
extern crate log;

use varflow::cli;

fn main() -> Result<(), String> {
    if let Err(e) = cli::process_cli::process_cli() {
        error!("{}", e);
        return Err(e);
    }
    Ok(())
}
