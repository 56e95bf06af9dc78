fn main() {
    if let Err(e) = embark_cli::run() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
