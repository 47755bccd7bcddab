use skyburst::Display;

fn main() {
    if let Err(err) = Display::new().run() {
        eprintln!("Error: {}", err);
        std::process::exit(1);
    }
}
