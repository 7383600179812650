//! Binary entry point for `permtx`.

use std::process;

fn main() {
    if let Err(e) = permtx::run() {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}
