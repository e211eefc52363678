use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;
use clap::{Parser, ValueEnum};
use tracing::info;
use tracing_subscriber::EnvFilter;

use places_client::PlacesClient;
use wayfarer_collector::{profiles, Collector};
use wayfarer_common::{AppConfig, Domain};
use wayfarer_store::PlaceStore;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum DomainArg {
    Dining,
    Attraction,
}

impl std::fmt::Display for DomainArg {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DomainArg::Dining => f.write_str("dining"),
            DomainArg::Attraction => f.write_str("attraction"),
        }
    }
}

impl From<DomainArg> for Domain {
    fn from(arg: DomainArg) -> Self {
        match arg {
            DomainArg::Dining => Domain::Dining,
            DomainArg::Attraction => Domain::Attraction,
        }
    }
}

#[derive(Debug, Parser)]
#[command(
    name = "wayfarer-collector",
    about = "Collects Seoul dining and attraction places into Postgres"
)]
struct Args {
    /// Collection domain to run.
    #[arg(long, value_enum, default_value_t = DomainArg::Dining)]
    domain: DomainArg,

    /// Restrict the run to a single district (e.g. 강남).
    #[arg(long)]
    area: Option<String>,

    /// Override the artifact output path.
    #[arg(long)]
    artifact: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("wayfarer=info".parse()?))
        .init();

    info!("Wayfarer collector starting...");

    let args = Args::parse();
    let config = AppConfig::from_env()?;

    let store = PlaceStore::connect(&config.database_url, config.conflict_policy).await?;
    store.migrate().await?;

    let client = PlacesClient::new(config.places_api_key.clone(), config.language.clone())?;

    let mut profile = profiles::profile(args.domain.into());
    if let Some(area) = &args.area {
        profile.areas.retain(|a| *a == area.as_str());
        if profile.areas.is_empty() {
            anyhow::bail!("Unknown district: {area}");
        }
    }

    let artifact_path = args
        .artifact
        .unwrap_or_else(|| config.artifact_dir.join(profile.artifact_name));

    let collector = Collector::new(Arc::new(client), Arc::new(store), profile);
    let report = collector.run().await?;

    let json = serde_json::to_string_pretty(&report.records)?;
    std::fs::write(&artifact_path, json)?;
    info!(
        path = %artifact_path.display(),
        records = report.records.len(),
        "Artifact written"
    );

    Ok(())
}
