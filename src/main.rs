fn main() {
    if let Err(err) = sketchlogic::run() {
        eprintln!("Error: {}", err);
        std::process::exit(1);
    }
}
