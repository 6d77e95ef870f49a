//! Evolution resolver
//!
//! Flattens an evolution tree into entries in pre-order: a node comes before
//! its children, children in the order the API lists them, and a whole
//! subtree before the next sibling. `eevee -> [vaporeon, jolteon, ...]`
//! therefore lists eevee first, then each branch left to right.
//!
//! The traversal runs over an owned snapshot of the tree; the per-node detail
//! fetches are issued afterwards as one ordered fan-out.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::CatalogConfig;
use crate::error::Result;
use crate::fanout::fan_out;
use crate::gateway::{fetch, CatalogGateway, Endpoints};
use crate::model::Entry;
use crate::normalize::evolution_entry;
use crate::wire::{id_from_url, ChainLink, PokemonRecord};

/// Species reference of an evolution node
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpeciesRef {
    pub name: String,
    pub url: String,
    /// Parsed from the species url
    pub id: Option<u32>,
}

/// Owned evolution tree
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EvolutionNode {
    pub species: SpeciesRef,
    pub evolves_to: Vec<EvolutionNode>,
}

impl From<ChainLink> for EvolutionNode {
    fn from(link: ChainLink) -> Self {
        let id = id_from_url(&link.species.url);
        EvolutionNode {
            species: SpeciesRef {
                name: link.species.name,
                url: link.species.url,
                id,
            },
            evolves_to: link.evolves_to.into_iter().map(EvolutionNode::from).collect(),
        }
    }
}

impl EvolutionNode {
    /// Nodes in pre-order
    pub fn preorder(&self) -> Vec<&EvolutionNode> {
        let mut order = Vec::new();
        let mut stack = vec![self];
        while let Some(node) = stack.pop() {
            order.push(node);
            // reversed so the first child is popped next
            stack.extend(node.evolves_to.iter().rev());
        }
        order
    }

    pub fn node_count(&self) -> usize {
        1 + self
            .evolves_to
            .iter()
            .map(EvolutionNode::node_count)
            .sum::<usize>()
    }
}

/// Resolve every node of the chain into an entry, in pre-order
///
/// Any failed node detail fetch aborts the resolution unless the config
/// allows partial fan-outs, in which case the failed node is skipped.
pub async fn resolve_evolutions(
    gateway: &dyn CatalogGateway,
    config: &CatalogConfig,
    root: &EvolutionNode,
) -> Result<Vec<Entry>> {
    let endpoints = Endpoints::new(gateway.base_url());
    let species: Vec<&SpeciesRef> = root.preorder().into_iter().map(|n| &n.species).collect();
    debug!("Resolving evolution chain of {} nodes from '{}'", species.len(), root.species.name);

    fan_out(
        "evolution chain",
        species,
        config.max_concurrency,
        config.fan_out,
        |species| {
            let endpoints = &endpoints;
            async move {
                let record: PokemonRecord = fetch(gateway, &endpoints.pokemon(&species.name)).await?;
                evolution_entry(species, &record, endpoints)
            }
        },
    )
    .await
}
