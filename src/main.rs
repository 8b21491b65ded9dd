fn main() {
    if let Err(err) = pivot_layout::run() {
        eprintln!("error: {err:#}");
        std::process::exit(1);
    }
}
