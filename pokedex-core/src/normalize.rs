//! Entry normalizer - raw records into catalog entries
//!
//! Official artwork is mandatory for every list entry: a detail record
//! without `sprites.other.official-artwork.front_default` is a shape error,
//! never a placeholder image.

use crate::error::{CatalogError, Result};
use crate::evolution::SpeciesRef;
use crate::gateway::{fetch, CatalogGateway, Endpoints};
use crate::model::{Entry, EntryDetails, Sprites};
use crate::wire::{NamedResource, PokemonRecord};

const ARTWORK_PATH: &str = "sprites.other.official-artwork.front_default";

/// Official-artwork default sprite of a detail record
pub fn official_artwork(record: &PokemonRecord, source: &str) -> Result<String> {
    record
        .sprites
        .as_ref()
        .and_then(|s| s.official_artwork())
        .and_then(|art| art.front_default.clone())
        .ok_or_else(|| CatalogError::missing(source, ARTWORK_PATH))
}

/// List page member plus its detail record
pub fn entry_from_listing(resource: &NamedResource, record: &PokemonRecord) -> Result<Entry> {
    Ok(Entry {
        id: record.id,
        name: resource.name.clone(),
        url: resource.url.clone(),
        image_url: official_artwork(record, &resource.url)?,
    })
}

/// Generation species plus its detail record; url from the detail template
pub fn entry_from_species(
    species: &NamedResource,
    record: &PokemonRecord,
    endpoints: &Endpoints,
) -> Result<Entry> {
    Ok(Entry {
        id: record.id,
        name: species.name.clone(),
        url: endpoints.pokemon(&species.name),
        image_url: official_artwork(record, &species.url)?,
    })
}

/// Detail record fetched from an explicit url (search fallback, selectors)
pub fn entry_from_record(url: &str, record: &PokemonRecord) -> Result<Entry> {
    Ok(Entry {
        id: record.id,
        name: record.name.clone(),
        url: url.to_string(),
        image_url: official_artwork(record, url)?,
    })
}

/// Evolution node; prefers the "home" sprite, falls back to the default sprite
pub fn evolution_entry(
    species: &SpeciesRef,
    record: &PokemonRecord,
    endpoints: &Endpoints,
) -> Result<Entry> {
    let url = endpoints.pokemon(&species.name);
    let sprites = record
        .sprites
        .as_ref()
        .ok_or_else(|| CatalogError::missing(&url, "sprites"))?;
    let image_url = sprites
        .home_default()
        .or(sprites.front_default.as_deref())
        .ok_or_else(|| CatalogError::missing(&url, "sprites.front_default"))?
        .to_string();

    Ok(Entry {
        id: species.id.unwrap_or(record.id),
        name: species.name.clone(),
        url,
        image_url,
    })
}

/// Full detail view of a record
pub fn details_from_record(record: &PokemonRecord) -> EntryDetails {
    let sprites = record
        .sprites
        .as_ref()
        .map(|s| {
            let artwork = s.official_artwork();
            Sprites {
                default: s.front_default.clone(),
                shiny: s.front_shiny.clone(),
                artwork_default: artwork.and_then(|a| a.front_default.clone()),
                artwork_shiny: artwork.and_then(|a| a.front_shiny.clone()),
                home_default: s.home_default().map(str::to_string),
            }
        })
        .unwrap_or_default();

    EntryDetails {
        id: record.id,
        name: record.name.clone(),
        height: record.height,
        weight: record.weight,
        types: record.types.iter().map(|t| t.kind.name.clone()).collect(),
        abilities: record
            .abilities
            .iter()
            .map(|a| a.ability.name.clone())
            .collect(),
        sprites,
        species_url: record.species.as_ref().map(|s| s.url.clone()),
    }
}

/// Fetch the detail record behind a list page member and normalize it
pub async fn normalize_listing(
    gateway: &dyn CatalogGateway,
    resource: &NamedResource,
) -> Result<Entry> {
    let record: PokemonRecord = fetch(gateway, &resource.url).await?;
    entry_from_listing(resource, &record)
}

/// Fetch the detail record behind a generation species and normalize it
pub async fn normalize_species(
    gateway: &dyn CatalogGateway,
    endpoints: &Endpoints,
    species: &NamedResource,
) -> Result<Entry> {
    let detail_url = Endpoints::species_to_pokemon(&species.url);
    let record: PokemonRecord = fetch(gateway, &detail_url).await?;
    entry_from_species(species, &record, endpoints)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn record(value: serde_json::Value) -> PokemonRecord {
        serde_json::from_value(value).unwrap()
    }

    fn pikachu() -> PokemonRecord {
        record(json!({
            "id": 25,
            "name": "pikachu",
            "height": 4,
            "weight": 60,
            "types": [{"slot": 1, "type": {"name": "electric", "url": "t/13/"}}],
            "abilities": [
                {"ability": {"name": "static", "url": "a/9/"}},
                {"ability": {"name": "lightning-rod", "url": "a/31/"}}
            ],
            "species": {"name": "pikachu", "url": "https://pokeapi.co/api/v2/pokemon-species/25/"},
            "sprites": {
                "front_default": "front.png",
                "front_shiny": "front-shiny.png",
                "other": {
                    "official-artwork": {"front_default": "art.png", "front_shiny": "art-shiny.png"},
                    "home": {"front_default": "home.png"}
                }
            }
        }))
    }

    #[test]
    fn test_listing_entry_uses_official_artwork() {
        let resource = NamedResource {
            name: "pikachu".into(),
            url: "https://pokeapi.co/api/v2/pokemon/25/".into(),
        };
        let entry = entry_from_listing(&resource, &pikachu()).unwrap();
        assert_eq!(
            entry,
            Entry {
                id: 25,
                name: "pikachu".into(),
                url: "https://pokeapi.co/api/v2/pokemon/25/".into(),
                image_url: "art.png".into(),
            }
        );
    }

    #[test]
    fn test_missing_artwork_is_shape_error() {
        let resource = NamedResource {
            name: "missingno".into(),
            url: "u/0/".into(),
        };
        let bare = record(json!({"id": 0, "name": "missingno", "sprites": {"front_default": "x.png"}}));
        let err = entry_from_listing(&resource, &bare).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Shape);
    }

    #[test]
    fn test_species_entry_uses_detail_template() {
        let species = NamedResource {
            name: "pikachu".into(),
            url: "https://pokeapi.co/api/v2/pokemon-species/25/".into(),
        };
        let endpoints = Endpoints::new("https://pokeapi.co/api/v2");
        let entry = entry_from_species(&species, &pikachu(), &endpoints).unwrap();
        assert_eq!(entry.url, "https://pokeapi.co/api/v2/pokemon/pikachu");
        assert_eq!(entry.id, 25);
    }

    #[test]
    fn test_evolution_entry_prefers_home_then_default() {
        let endpoints = Endpoints::new("https://pokeapi.co/api/v2");
        let species = SpeciesRef {
            name: "pikachu".into(),
            url: "https://pokeapi.co/api/v2/pokemon-species/25/".into(),
            id: Some(25),
        };
        let entry = evolution_entry(&species, &pikachu(), &endpoints).unwrap();
        assert_eq!(entry.image_url, "home.png");

        let no_home = record(json!({
            "id": 25, "name": "pikachu",
            "sprites": {"front_default": "front.png", "other": {}}
        }));
        let entry = evolution_entry(&species, &no_home, &endpoints).unwrap();
        assert_eq!(entry.image_url, "front.png");
    }

    #[test]
    fn test_details_from_record() {
        let details = details_from_record(&pikachu());
        assert_eq!(details.types, vec!["electric"]);
        assert_eq!(details.abilities, vec!["static", "lightning-rod"]);
        assert_eq!(details.sprites.artwork_shiny.as_deref(), Some("art-shiny.png"));
        assert_eq!(
            details.species_url.as_deref(),
            Some("https://pokeapi.co/api/v2/pokemon-species/25/")
        );
    }
}
