//! Lineage chart data pipeline
//!
//! Loads a person database per config, derives the genealogy graph and
//! logs the statistics record. Rendering collaborators consume the same
//! library API.

use std::path::Path;

use lineage::loader::{self, ChartConfig};
use lineage::{BuildOptions, GenealogyGraph};
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

fn main() -> anyhow::Result<()> {
    // Initialize tracing
    let subscriber = FmtSubscriber::builder()
        .with_max_level(Level::INFO)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let config_path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "config/app.json".to_string());
    info!("Loading chart config from {}...", config_path);
    let config = ChartConfig::from_file(Path::new(&config_path))?;

    let persons = loader::load_persons(&config)?;
    info!(
        "Loaded {} person records from {} files",
        persons.len(),
        config.files.len()
    );

    let options = BuildOptions {
        filter_anchor: if config.filter_identifier.is_empty() {
            None
        } else {
            Some(config.filter_identifier.clone())
        },
        ego_male: config.ego_male,
    };
    let graph = GenealogyGraph::build(persons, &options)?;

    let stats = graph.statistics();
    info!(
        "Graph ready: {} persons over {} generations (oldest {}), {} male / {} female, ego `{}`",
        stats.persons_total,
        stats.generation_count,
        stats.oldest_generation,
        stats.persons_male,
        stats.persons_female,
        graph.person(graph.ego()).display_id(),
    );

    for (generation, keys) in graph.generations() {
        let ids: Vec<&str> = keys
            .iter()
            .map(|&key| graph.person(key).display_id())
            .collect();
        info!("generation {}: {}", generation, ids.join(", "));
    }

    Ok(())
}
