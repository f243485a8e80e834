use std::process;

fn main() {
    if let Err(e) = rsa_chat::cli::app::run_app() {
        eprintln!("Error: {:#}", e);
        process::exit(1);
    }
}
