use clap::Parser;
use taskboard::cli::commands::Cli;
use taskboard::io::config_io::read_config;

fn run(cli: &Cli) -> Result<(), Box<dyn std::error::Error>> {
    let mut config = read_config(&cli.config)?;
    cli.apply_overrides(&mut config);
    taskboard::logging::init(config.log.file.as_deref())?;
    taskboard::tui::run(&config)
}

fn main() {
    let cli = Cli::parse();
    if let Err(e) = run(&cli) {
        eprintln!("error: {}", e);
        std::process::exit(1);
    }
}
