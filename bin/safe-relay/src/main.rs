fn main() {
    if let Err(err) = safe_relay::cli::run() {
        eprintln!("Error: {err:?}");
        std::process::exit(1);
    }
}
