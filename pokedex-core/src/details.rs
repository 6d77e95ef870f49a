//! Detail view loading: one record plus its resolved evolution chain

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::CatalogConfig;
use crate::error::{CatalogError, Result};
use crate::evolution::{resolve_evolutions, EvolutionNode};
use crate::gateway::{fetch, CatalogGateway};
use crate::model::{Entry, EntryDetails};
use crate::normalize::details_from_record;
use crate::wire::{EvolutionChainRecord, PokemonRecord, SpeciesRecord};

/// Everything the detail view shows for one entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntryOverview {
    pub details: EntryDetails,
    pub evolutions: Vec<Entry>,
}

/// Fetch and normalize the detail record at `url`
pub async fn fetch_details(gateway: &dyn CatalogGateway, url: &str) -> Result<EntryDetails> {
    let record: PokemonRecord = fetch(gateway, url).await?;
    Ok(details_from_record(&record))
}

/// Fetch the evolution tree a species belongs to
pub async fn fetch_evolution_tree(
    gateway: &dyn CatalogGateway,
    species_url: &str,
) -> Result<EvolutionNode> {
    let species: SpeciesRecord = fetch(gateway, species_url).await?;
    let chain_url = species
        .evolution_chain
        .map(|c| c.url)
        .ok_or_else(|| CatalogError::missing(species_url, "evolution_chain.url"))?;

    let chain: EvolutionChainRecord = fetch(gateway, &chain_url).await?;
    Ok(EvolutionNode::from(chain.chain))
}

/// Detail record, species, evolution chain and resolved evolutions for `url`
///
/// Nothing is returned unless every step succeeds.
pub async fn fetch_overview(
    gateway: &dyn CatalogGateway,
    config: &CatalogConfig,
    url: &str,
) -> Result<EntryOverview> {
    let details = fetch_details(gateway, url).await?;
    let species_url = details
        .species_url
        .clone()
        .ok_or_else(|| CatalogError::missing(url, "species.url"))?;

    let tree = fetch_evolution_tree(gateway, &species_url).await?;
    let evolutions = resolve_evolutions(gateway, config, &tree).await?;

    debug!(
        "Loaded overview for '{}' with {} evolutions",
        details.name,
        evolutions.len()
    );
    Ok(EntryOverview {
        details,
        evolutions,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use crate::gateway::MemoryGateway;
    use serde_json::json;

    const BASE: &str = "https://pokeapi.co/api/v2";

    fn gateway() -> MemoryGateway {
        let mon = |id: u32, name: &str| {
            json!({
                "id": id,
                "name": name,
                "height": 4,
                "weight": 60,
                "species": {"name": name, "url": format!("{BASE}/pokemon-species/{id}/")},
                "sprites": {
                    "front_default": format!("{name}.png"),
                    "other": {"official-artwork": {"front_default": format!("{name}-art.png")}}
                }
            })
        };
        MemoryGateway::new(BASE)
            .with_response("pokemon/25", mon(25, "pikachu"))
            .with_response("pokemon/pichu", mon(172, "pichu"))
            .with_response("pokemon/pikachu", mon(25, "pikachu"))
            .with_response("pokemon/raichu", mon(26, "raichu"))
            .with_response(
                "pokemon-species/25",
                json!({"evolution_chain": {"url": format!("{BASE}/evolution-chain/10/")}}),
            )
            .with_response(
                "evolution-chain/10",
                json!({"chain": {
                    "species": {"name": "pichu", "url": format!("{BASE}/pokemon-species/172/")},
                    "evolves_to": [{
                        "species": {"name": "pikachu", "url": format!("{BASE}/pokemon-species/25/")},
                        "evolves_to": [{
                            "species": {"name": "raichu", "url": format!("{BASE}/pokemon-species/26/")},
                            "evolves_to": []
                        }]
                    }]
                }}),
            )
    }

    #[tokio::test]
    async fn test_fetch_overview() {
        let gateway = gateway();
        let overview = fetch_overview(&gateway, &CatalogConfig::default(), &format!("{BASE}/pokemon/25/"))
            .await
            .unwrap();

        assert_eq!(overview.details.name, "pikachu");
        let names: Vec<&str> = overview.evolutions.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, vec!["pichu", "pikachu", "raichu"]);
        assert_eq!(overview.evolutions[0].id, 172);
        assert_eq!(overview.evolutions[0].image_url, "pichu.png");
    }

    #[tokio::test]
    async fn test_missing_chain_is_shape_error() {
        let gateway = gateway().with_response("pokemon-species/25", json!({}));
        let err = fetch_overview(&gateway, &CatalogConfig::default(), "pokemon/25")
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Shape);
    }

    #[tokio::test]
    async fn test_failed_evolution_node_fails_overview() {
        let gateway = gateway().with_failure("pokemon/raichu");
        let result = fetch_overview(&gateway, &CatalogConfig::default(), "pokemon/25").await;
        assert!(result.is_err());
    }
}
