//! Project Bank console
//!
//! Menu-driven banking over the customer and account record files.
//!
//! # Usage
//!
//! ```bash
//! cargo run              # files in the current directory
//! cargo run -- data/     # files in data/
//! ```
//!
//! # Environment Variables
//!
//! - `RUST_LOG`: Set to `debug` or `warn` to control logging verbosity
//! - `BANK_CUSTOMER_FILE` / `BANK_ACCOUNT_FILE`: Override either file path

use project_bank::{Bank, Console, Result, StoreConfig};
use std::env;
use std::io;
use std::process;

fn main() {
    env_logger::init();

    if let Err(e) = run() {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

fn run() -> Result<()> {
    let config = match env::args().nth(1) {
        Some(dir) => StoreConfig::in_dir(dir).with_env_overrides(),
        None => StoreConfig::from_env(),
    };
    let bank = Bank::open(&config);

    let stdin = io::stdin();
    let stdout = io::stdout();
    Console::new(&bank, stdin.lock(), stdout.lock()).run()
}
