use anyhow::Context;
use clap::Parser;
use genie_wrap::utils::{logger, validation::Validate};
use genie_wrap::{CliConfig, GenieClient, GenieConfig, GenieError};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = CliConfig::parse();

    logger::init_cli_logger(cli.verbose, cli.log_format);
    tracing::debug!("CLI config: {:?}", cli);

    let mut config = match &cli.config {
        Some(path) => {
            tracing::info!("📁 Loading configuration from: {}", path.display());
            GenieConfig::from_file(path)
                .with_context(|| format!("Failed to load config file '{}'", path.display()))?
        }
        None => GenieConfig::default(),
    };
    cli.apply_overrides(&mut config);

    if let Err(e) = config.validate() {
        exit_with(&e);
    }

    let mode = config.mode().to_string();
    let client = GenieClient::new(config.settings);

    if cli.dry_run {
        tracing::info!("🔍 DRY RUN MODE - nothing will be executed");
        match cli.command.dry_run(&client, &mode) {
            Ok(json) => println!("{}", json),
            Err(e) => exit_with(&e),
        }
        return Ok(());
    }

    match cli.command.run(&client, &mode).await {
        Ok(output) => {
            tracing::info!("✅ Genie finished successfully");
            print!("{}", output);
            if !output.is_empty() && !output.ends_with('\n') {
                println!();
            }
        }
        Err(e) => exit_with(&e),
    }

    Ok(())
}

fn exit_with(e: &GenieError) -> ! {
    tracing::error!(
        "❌ {} (Category: {:?}, Severity: {:?})",
        e,
        e.category(),
        e.severity()
    );
    eprintln!("{}", e.report());
    std::process::exit(e.exit_code());
}
