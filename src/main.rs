use promenade::cli::CliOverrides;

fn main() {
    let cli = match CliOverrides::parse_from_env() {
        Ok(parsed) => parsed,
        Err(err) => {
            eprintln!("[cli] {err}");
            std::process::exit(2);
        }
    };
    if let Err(err) = promenade::run(cli) {
        eprintln!("Application error: {err:?}");
    }
}
