use blog_helpers::app::commands::{execute, load_config};
use blog_helpers::utils::logger;
use blog_helpers::{Cli, Result, SystemClock};
use clap::Parser;

fn main() {
    let cli = Cli::parse();

    // 初始化日誌
    logger::init_cli_logger(cli.verbose);
    tracing::debug!("CLI args: {:?}", cli);

    if let Err(e) = run(&cli) {
        tracing::error!(
            "❌ {} (Category: {:?}, Severity: {:?})",
            e,
            e.category(),
            e.severity()
        );
        tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());

        eprintln!("❌ {}", e.user_friendly_message());
        eprintln!("💡 {}", e.recovery_suggestion());
        std::process::exit(e.exit_code());
    }
}

fn run(cli: &Cli) -> Result<()> {
    let config = if cli.command.needs_config() {
        Some(load_config(&cli.config)?)
    } else {
        None
    };

    let output = execute(&cli.command, config.as_ref(), SystemClock)?;
    print!("{}", output);
    Ok(())
}
