fn main() {
    if let Err(err) = bnet_roster::cli::main() {
        eprintln!("❌ {err}");
        std::process::exit(1);
    }
}
