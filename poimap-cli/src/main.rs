//! Entry point for the command-line interface.
#![forbid(unsafe_code)]

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    if let Err(err) = poimap_cli::run() {
        eprintln!("poimap: {err}");
        std::process::exit(1);
    }
}
