use clap::{Parser, Subcommand};
use mediquery_core::constants::APOLOGY_TEXT;
use mediquery_core::{
    AnalysisResponse, Analyzer, ConfigResult, CoreConfig, ServiceResult, SymptomService,
};
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod remote;
mod shell;

use remote::RemoteAnalyzer;

#[derive(Parser)]
#[command(name = "mediquery")]
#[command(about = "MediQuery symptom checker CLI. General information only, not a diagnosis.")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start an interactive chat session
    Chat {
        /// Base URL of a running MediQuery server (analyses in-process if omitted)
        #[arg(long)]
        server: Option<String>,
    },
    /// Analyse one symptom description and exit
    Analyze {
        /// Free-text symptom description
        symptoms: String,
        /// Also export a doctor report PDF to this file or directory
        #[arg(long)]
        report: Option<PathBuf>,
        /// Print the raw JSON response instead of formatted text
        #[arg(long)]
        json: bool,
        /// Base URL of a running MediQuery server (analyses in-process if omitted)
        #[arg(long)]
        server: Option<String>,
    },
    /// Report whether the completion credential is configured
    Env {
        /// Ask a running MediQuery server instead of reading the local environment
        #[arg(long)]
        server: Option<String>,
    },
}

/// In-process service or remote server.
enum Backend {
    Local(SymptomService),
    Remote(RemoteAnalyzer),
}

impl Backend {
    fn resolve(server: Option<String>) -> anyhow::Result<Self> {
        match server {
            Some(url) => Ok(Backend::Remote(RemoteAnalyzer::new(&url)?)),
            None => {
                let cfg = Arc::new(config_from_env()?);
                if !cfg.has_api_key() {
                    tracing::warn!("GROQ_API_KEY is not set; upstream calls will be unauthenticated");
                }
                Ok(Backend::Local(SymptomService::from_config(cfg)?))
            }
        }
    }
}

#[async_trait::async_trait]
impl Analyzer for Backend {
    async fn analyze(&self, symptoms: &str) -> ServiceResult<AnalysisResponse> {
        match self {
            Backend::Local(service) => service.analyze(symptoms).await,
            Backend::Remote(remote) => remote.analyze(symptoms).await,
        }
    }
}

fn config_from_env() -> ConfigResult<CoreConfig> {
    CoreConfig::from_env_values(
        std::env::var("GROQ_API_KEY").ok(),
        std::env::var("MEDIQUERY_UPSTREAM_URL").ok(),
        std::env::var("MEDIQUERY_MODEL").ok(),
        std::env::var("MEDIQUERY_TEMPERATURE").ok(),
        std::env::var("MEDIQUERY_UPSTREAM_TIMEOUT_SECS").ok(),
    )
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    // Logs go to stderr so they never interleave with --json output.
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("mediquery=warn".parse()?),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    match cli.command {
        Some(Commands::Chat { server }) => {
            shell::run(Backend::resolve(server)?).await?;
        }
        Some(Commands::Analyze {
            symptoms,
            report,
            json,
            server,
        }) => {
            let backend = Backend::resolve(server)?;
            let response = match backend.analyze(&symptoms).await {
                Ok(response) => response,
                Err(e) if e.is_client_error() => anyhow::bail!("No symptoms provided"),
                Err(e) => {
                    eprintln!("{APOLOGY_TEXT}");
                    return Err(e.into());
                }
            };

            if json {
                println!("{}", serde_json::to_string_pretty(&response)?);
            } else {
                println!("{}", shell::format_analysis(&response.analysis));
            }

            if let Some(path) = report {
                let written =
                    mediquery_report::export_report(&response.analysis, symptoms.trim(), &path)?;
                eprintln!("Report saved to {}", written.display());
            }
        }
        Some(Commands::Env { server }) => {
            let configured = match server {
                Some(url) => RemoteAnalyzer::new(&url)?.credential_configured().await?,
                None => config_from_env()?.has_api_key(),
            };
            println!(
                "{}",
                serde_json::json!({ "groqApiKeyConfigured": configured })
            );
        }
        None => {
            println!("Use 'mediquery --help' for commands");
        }
    }

    Ok(())
}
