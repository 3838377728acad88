use clap::{Parser, Subcommand};
use easy_adwords::utils::error::{AdsError, ErrorSeverity};
use easy_adwords::utils::{logger, validation::Validate};
use easy_adwords::{
    build_add_operation, export_report, AdsClient, KeywordManager, LocalStorage, ReportFetcher,
    TomlConfig,
};

#[derive(Parser)]
#[command(name = "easy-adwords")]
#[command(about = "Create keywords and download performance reports")]
struct Args {
    /// Path to TOML configuration file
    #[arg(short, long, default_value = "adwords.toml")]
    config: String,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Emit logs as JSON lines
    #[arg(long)]
    json_logs: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Download the configured report and write it to the output directory
    Report {
        /// Override output.path from the config
        #[arg(long)]
        output: Option<String>,

        /// Override output.format from the config (json or csv)
        #[arg(long)]
        format: Option<String>,
    },
    /// Create every [[keywords]] entry in a single mutate call
    Keywords {
        /// Print the operations instead of submitting them
        #[arg(long)]
        dry_run: bool,
    },
}

#[tokio::main]
async fn main() {
    let args = Args::parse();

    if args.json_logs {
        logger::init_json_logger(args.verbose);
    } else {
        logger::init_cli_logger(args.verbose);
    }

    tracing::info!("Loading configuration from: {}", args.config);

    if let Err(e) = run(args).await {
        tracing::error!(
            "❌ Command failed: {} (Category: {:?}, Severity: {:?})",
            e,
            e.category(),
            e.severity()
        );
        tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());

        eprintln!("❌ {}", e.user_friendly_message());
        eprintln!("💡 {}", e.recovery_suggestion());

        let exit_code = match e.severity() {
            ErrorSeverity::Low => 0,
            ErrorSeverity::Medium => 2,
            ErrorSeverity::High => 1,
            ErrorSeverity::Critical => 3,
        };

        if exit_code > 0 {
            std::process::exit(exit_code);
        }
    }
}

async fn run(args: Args) -> Result<(), AdsError> {
    let config = TomlConfig::from_file(&args.config)?;
    config.validate()?;
    tracing::info!("✅ Configuration loaded and validated successfully");

    match args.command {
        Command::Report { output, format } => {
            let section = config.report_section()?;
            let report_config = section.to_report_config()?;
            let output_path = output.unwrap_or_else(|| config.output_path().to_string());
            let format = format.unwrap_or_else(|| config.output_format().to_string());

            let client = AdsClient::new(&config.client)?;
            let mut fetcher = ReportFetcher::new(section.kind, report_config, client);
            fetcher.download().await?.format()?;
            let report = fetcher.into_formatted()?;

            let storage = LocalStorage::new(output_path.clone());
            let file_name = export_report(&storage, section.kind, &report, &format).await?;

            tracing::info!("📁 Wrote {} records to {}/{}", report.len(), output_path, file_name);
            println!("✅ Report saved to: {}/{}", output_path, file_name);
        }
        Command::Keywords { dry_run } => {
            if dry_run {
                let operations = config
                    .keywords
                    .iter()
                    .map(build_add_operation)
                    .collect::<Result<Vec<_>, _>>()?;
                println!("{}", serde_json::to_string_pretty(&operations)?);
                return Ok(());
            }

            let manager = KeywordManager::new(AdsClient::new(&config.client)?);
            let result = manager.create_batch(&config.keywords).await?;

            for error in &result.partial_failure_errors {
                tracing::warn!("Partial failure: {}", error);
            }
            println!(
                "✅ Created {} of {} keywords",
                result.value.len(),
                config.keywords.len()
            );
        }
    }

    Ok(())
}
