fn main() {
    if let Err(err) = modpub::cli::run() {
        eprintln!("error: {:#}", err);
        std::process::exit(1);
    }
}
