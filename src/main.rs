use clap::Parser;
use log::{error, warn};
use mapharvest::renderer::{RendererOptions, WebDriverRenderer};
use mapharvest::storage::StorageItem;
use mapharvest::{create_storage, HarvestConfig, ListHarvester, StorageBackend, StorageType};

const OUTPUT_PATH: &str = "scraped_results.csv";

/// Harvest business listings from a map search into a CSV file.
#[derive(Parser, Debug)]
#[command(version, about)]
struct Cli {
    /// Free-text search, e.g. "restaurants in Istanbul"
    query: String,

    /// Number of listings to collect
    #[arg(value_parser = clap::value_parser!(u32).range(1..))]
    target: u32,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    env_logger::builder()
        .filter_level(log::LevelFilter::Info)
        .filter_module("fantoccini", log::LevelFilter::Warn)
        .filter_module("hyper", log::LevelFilter::Warn)
        .parse_default_env()
        .init();

    let cli = Cli::parse();
    let storage = create_storage(StorageType::from_path(OUTPUT_PATH));

    let renderer = WebDriverRenderer::connect(RendererOptions::from_env()).await?;
    let harvester = ListHarvester::new(renderer, HarvestConfig::default());

    let harvest = match harvester.harvest(&cli.query, cli.target as usize).await {
        Ok(harvest) => harvest,
        Err(e) => {
            error!("Harvest failed: {}", e);
            storage
                .store(&StorageItem::new(cli.query.as_str(), Vec::new()))
                .await?;
            return Err(e.into());
        }
    };

    if !harvest.is_complete() {
        warn!(
            "Fewer results than requested: {} / {} ({:?})",
            harvest.len(),
            harvest.target,
            harvest.status
        );
    }

    let path = storage.store(&StorageItem::from(&harvest)).await?;
    println!(
        "Scraped {} results and saved to {}",
        harvest.len(),
        path.display()
    );

    Ok(())
}
