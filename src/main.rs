fn main() {
    if let Err(e) = bookingdesk::app::run_cli() {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
