//! Entry point for the fire command-line interface.
#![forbid(unsafe_code)]

fn main() {
    if let Err(err) = fire_cli::run() {
        eprintln!("fire: {err}");
        std::process::exit(1);
    }
}
