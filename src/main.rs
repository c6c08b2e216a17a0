use anyhow::Result;
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use scorefetch::{
    config::Config,
    error::Error,
    fetcher::{BigQueryFetcher, RestFetcher, ScorecardFetcher},
    input::read_purls_from_file,
    output::{write_results, OutputFormat},
    processor::Processor,
    resolver::PurlResolver,
};
use std::path::PathBuf;
use std::process::ExitCode;
use std::str::FromStr;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "scorefetch")]
#[command(
    author,
    version,
    about = "Resolve PURLs to GitHub repositories and download OpenSSF Scorecard data"
)]
struct Cli {
    /// PURLs of the packages to process (repeatable)
    #[arg(short, long = "purls", value_name = "PURL")]
    purls: Vec<String>,

    /// File containing PURLs, one per line
    #[arg(long, value_name = "PATH")]
    purls_file: Option<PathBuf>,

    /// Write output to file (stdout if omitted; required for zip)
    #[arg(short, long, value_name = "PATH")]
    output: Option<PathBuf>,

    /// Output format (json, zip)
    #[arg(short, long, default_value = "json")]
    format: String,

    /// Query BigQuery in bulk instead of the Scorecard REST API
    #[arg(long)]
    use_bigquery: bool,

    /// Path to the BigQuery service-account credentials file
    #[arg(long, value_name = "PATH")]
    credentials_file: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> ExitCode {
    match run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run() -> Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = Config::load().unwrap_or_default();
    let format = OutputFormat::from_str(&cli.format).map_err(|e| anyhow::anyhow!(e))?;

    let mut purls = cli.purls.clone();
    if let Some(path) = &cli.purls_file {
        purls.extend(read_purls_from_file(path)?);
    }
    if purls.is_empty() {
        return Err(Error::Configuration(
            "either --purls or --purls-file must be provided".to_string(),
        )
        .into());
    }
    tracing::info!(count = purls.len(), "input purls: {:?}", purls);

    let fetcher: Box<dyn ScorecardFetcher> = if cli.use_bigquery {
        let credentials = cli.credentials_file.clone().ok_or_else(|| {
            Error::Configuration("--credentials-file is required with --use-bigquery".to_string())
        })?;
        Box::new(BigQueryFetcher::new(config.bigquery.clone(), credentials))
    } else {
        Box::new(RestFetcher::new(config.scorecard_api.clone()))
    };

    let processor = Processor::new(PurlResolver::new(config.lookup_url.clone()), fetcher);

    // Spinner draws to stderr and hides itself when stderr is not a terminal.
    let progress = ProgressBar::new_spinner();
    progress.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} {msg}")
            .unwrap(),
    );
    progress.enable_steady_tick(Duration::from_millis(100));
    progress.set_message("Fetching scorecard data...");

    let outcomes = processor.run(&purls).await?;

    let succeeded = outcomes.iter().filter(|o| o.success).count();
    progress.finish_with_message(format!(
        "Processed {} purls ({} succeeded)",
        outcomes.len(),
        succeeded
    ));

    write_results(&outcomes, format, cli.output.as_deref())?;
    if let Some(path) = &cli.output {
        println!("Results saved to {}", path.display());
    }

    Ok(())
}
