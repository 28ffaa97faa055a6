fn main() {
    if let Err(err) = radial_label_renderer::run() {
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}
