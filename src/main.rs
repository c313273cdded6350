use clap::Parser;
use gif2term::{app::App, cli::Cli, config};

fn main() {
    let cli = Cli::parse();

    env_logger::Builder::new()
        .filter_level(cli.log_level())
        .parse_default_env()
        .init();

    let config = match config::build_config(&cli) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(2);
        }
    };

    let mut app = App::new(config);
    if let Err(e) = app.run() {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}
