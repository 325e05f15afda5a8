//! CLI entry point - the composition root.

use std::io::Write;

use clap::Parser;

use fanfetch_cli::interrupt::spawn_interrupt_handler;
use fanfetch_cli::logging::init_tracing;
use fanfetch_cli::{Cli, CliConfig, OutputFormat, bootstrap, fetch};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables before parsing so env-backed flags see them
    dotenvy::dotenv().ok();

    // Parse CLI arguments
    let cli = Cli::parse();

    // Initialize logging
    init_tracing(cli.verbose);

    // Bootstrap the CLI context (composition root)
    let ctx = match bootstrap(CliConfig::from_cli(&cli)) {
        Ok(ctx) => ctx,
        Err(err) => {
            eprintln!("fetchall: {err}");
            std::process::exit(err.exit_code());
        }
    };

    let cancel = spawn_interrupt_handler();
    let format = OutputFormat::from_json_flag(cli.json);

    match fetch::execute(ctx.fan_out(), &cli.urls, format, cancel).await {
        Ok(output) => {
            let mut stdout = std::io::stdout().lock();
            stdout.write_all(output.as_bytes())?;
            stdout.flush()?;
            Ok(())
        }
        Err(err) => {
            eprintln!("fetchall: {err}");
            std::process::exit(err.exit_code());
        }
    }
}
