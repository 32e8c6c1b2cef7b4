fn main() {
    ronda_cli::ui::init_logging();
    let code = ronda_cli::run(
        std::env::args(),
        &mut std::io::stdout(),
        &mut std::io::stderr(),
    );
    std::process::exit(code);
}
