use clap::Parser;
use std::process::ExitCode;
use tutor::{Application, Config, telemetry};

// One action at a time: a single-threaded runtime is all the client needs.
#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<ExitCode> {
    // Parse CLI args
    let args = tutor::config::Args::parse();

    // Load configuration
    let config = Config::load(&args)?;

    // If --validate flag is set, show the effective configuration and exit
    if args.validate {
        println!("Configuration is valid.");
        println!("{}", serde_json::to_string_pretty(&config)?);
        return Ok(ExitCode::SUCCESS);
    }

    telemetry::init_telemetry()?;

    tracing::debug!("{:?}", args);

    Ok(Application::new(config).run(args.command).await?)
}
