//! Generation index builder
//!
//! One bucket per generation id `1..=generation_count`, each holding the
//! normalized species of that generation sorted ascending by id. All
//! generations are fetched concurrently and every bucket fans out one detail
//! fetch per species.
//!
//! Under the strict policy a single failed generation fails the whole index.
//! Under the partial policy the failed generation is left out and its number
//! recorded in [`GenerationIndex::failed`].

use serde::{Deserialize, Serialize};
use tracing::{debug, error, info, warn};

use crate::config::{CatalogConfig, FanOutPolicy};
use crate::error::Result;
use crate::fanout::fan_out;
use crate::gateway::{fetch, CatalogGateway, Endpoints};
use crate::model::Entry;
use crate::normalize::normalize_species;
use crate::wire::GenerationRecord;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerationBucket {
    pub generation: u8,
    pub entries: Vec<Entry>,
}

impl GenerationBucket {
    /// Selector label, e.g. "Generation 1"
    pub fn label(&self) -> String {
        format!("Generation {}", self.generation)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerationIndex {
    pub buckets: Vec<GenerationBucket>,
    /// Generations left out under the partial policy
    pub failed: Vec<u8>,
}

impl GenerationIndex {
    pub fn bucket(&self, generation: u8) -> Option<&GenerationBucket> {
        self.buckets.iter().find(|b| b.generation == generation)
    }

    pub fn is_complete(&self) -> bool {
        self.failed.is_empty()
    }

    pub fn entry_count(&self) -> usize {
        self.buckets.iter().map(|b| b.entries.len()).sum()
    }
}

async fn build_bucket(
    gateway: &dyn CatalogGateway,
    config: &CatalogConfig,
    endpoints: &Endpoints,
    generation: u8,
) -> Result<GenerationBucket> {
    let record: GenerationRecord = fetch(gateway, &endpoints.generation(generation)).await?;
    debug!(
        "Generation {} lists {} species",
        generation,
        record.pokemon_species.len()
    );

    let mut entries = fan_out(
        "generation bucket",
        record.pokemon_species,
        config.max_concurrency,
        config.fan_out,
        |species| async move { normalize_species(gateway, endpoints, &species).await },
    )
    .await?;
    entries.sort_by_key(|entry| entry.id);

    Ok(GenerationBucket {
        generation,
        entries,
    })
}

/// Fetch every generation and build the sorted buckets
pub async fn build_generation_index(
    gateway: &dyn CatalogGateway,
    config: &CatalogConfig,
) -> Result<GenerationIndex> {
    let endpoints = Endpoints::new(gateway.base_url());
    let generations: Vec<u8> = (1..=config.generation_count).collect();

    // each generation reports its own outcome so the policy is applied per bucket
    let outcomes = fan_out(
        "generation index",
        generations,
        usize::from(config.generation_count),
        FanOutPolicy::Strict,
        |generation| {
            let endpoints = &endpoints;
            async move {
                Ok((
                    generation,
                    build_bucket(gateway, config, endpoints, generation).await,
                ))
            }
        },
    )
    .await?;

    let mut index = GenerationIndex::default();
    for (generation, outcome) in outcomes {
        match outcome {
            Ok(bucket) => index.buckets.push(bucket),
            Err(e) if config.allows_partial() => {
                warn!("Skipping generation {}: {}", generation, e);
                index.failed.push(generation);
            }
            Err(e) => {
                error!("Failed to build generation index: generation {}: {}", generation, e);
                return Err(e);
            }
        }
    }

    info!(
        "Built generation index: {} buckets, {} entries",
        index.buckets.len(),
        index.entry_count()
    );
    Ok(index)
}
