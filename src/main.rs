fn main() {
    if let Err(e) = chatskin::cli::main() {
        eprintln!("❌ {e}");
        std::process::exit(1);
    }
}
