use clap::Parser;
use std::process;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

use readmegen::api::GeminiClient;
use readmegen::cli::{Args, Command};
use readmegen::config::Config;
use readmegen::error::Result;
use readmegen::github::{parse_repo_url, GithubClient};
use readmegen::models::Credential;
use readmegen::orchestrator::{self, OrchestratorContext};
use readmegen::{prompt, server, ui};

#[tokio::main]
async fn main() {
    let args = Args::parse();

    // Load configuration
    let config = match Config::from_env_and_args(&args) {
        Ok(config) => config,
        Err(e) => {
            ui::display_error(&e.to_string());
            process::exit(1);
        }
    };
    init_logging(config.verbose);

    let outcome = match args.command {
        Command::Serve { .. } => server::serve(config).await,
        Command::Generate { url, token } => generate_once(config, &url, token).await,
    };

    if let Err(e) = outcome {
        ui::display_error(&e.to_string());
        process::exit(1);
    }
}

/// `RUST_LOG` wins over `--verbose`.
fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("readmegen={default_level}")));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

async fn generate_once(config: Config, url: &str, token: Option<String>) -> Result<()> {
    let repo = parse_repo_url(url)?;
    let model = Arc::new(GeminiClient::new(&config.model, config.request_timeout)?);
    let github = Arc::new(GithubClient::new(&config.github, config.request_timeout)?);
    let context = OrchestratorContext::new(model, github).with_settings(&config.orchestrator);
    let credential = token.map(Credential::new);

    if config.verbose {
        ui::display_status(&format!("Using model: {}", config.model.model));
    }
    ui::display_status(&format!("Generating README for {repo}"));

    let generated = orchestrator::run(&context, &repo, credential.as_ref()).await?;
    if prompt::is_fetch_error(&generated.markdown) {
        ui::display_status("Repository data could not be fetched");
    } else {
        let missing = prompt::missing_sections(&generated.markdown);
        if !missing.is_empty() {
            ui::display_status(&format!("README lacks: {}", missing.join(", ")));
        }
    }
    ui::display_readme(&generated.markdown);
    if config.verbose {
        ui::display_summary(&generated);
    }
    Ok(())
}
