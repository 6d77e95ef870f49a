//! Raw PokeAPI response records
//!
//! Only the fields the catalog reads are modelled. Fields the normalizer
//! requires are still `Option` here so a missing one surfaces as a
//! `CatalogError::Shape` naming the path instead of an opaque decode error.

use serde::{Deserialize, Serialize};

/// `{name, url}` pair used throughout the API
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NamedResource {
    pub name: String,
    pub url: String,
}

/// `{url}` reference without a name
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiResource {
    pub url: String,
}

/// `GET /pokemon?limit=&offset=`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PageRecord {
    #[serde(default)]
    pub count: Option<u32>,
    #[serde(default)]
    pub next: Option<String>,
    #[serde(default)]
    pub previous: Option<String>,
    pub results: Vec<NamedResource>,
}

/// `GET /pokemon/{nameOrId}`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PokemonRecord {
    pub id: u32,
    pub name: String,
    #[serde(default)]
    pub height: u32,
    #[serde(default)]
    pub weight: u32,
    #[serde(default)]
    pub types: Vec<TypeSlot>,
    #[serde(default)]
    pub abilities: Vec<AbilitySlot>,
    #[serde(default)]
    pub species: Option<NamedResource>,
    #[serde(default)]
    pub sprites: Option<SpritesRecord>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TypeSlot {
    #[serde(rename = "type")]
    pub kind: NamedResource,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AbilitySlot {
    pub ability: NamedResource,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SpritesRecord {
    #[serde(default)]
    pub front_default: Option<String>,
    #[serde(default)]
    pub front_shiny: Option<String>,
    #[serde(default)]
    pub other: Option<OtherSprites>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OtherSprites {
    #[serde(rename = "official-artwork", default)]
    pub official_artwork: Option<SpritePair>,
    #[serde(default)]
    pub home: Option<SpritePair>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SpritePair {
    #[serde(default)]
    pub front_default: Option<String>,
    #[serde(default)]
    pub front_shiny: Option<String>,
}

/// `GET {species.url}`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpeciesRecord {
    #[serde(default)]
    pub evolution_chain: Option<ApiResource>,
}

/// `GET {evolution_chain.url}`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EvolutionChainRecord {
    pub chain: ChainLink,
}

/// One node of the remote evolution tree
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChainLink {
    pub species: NamedResource,
    #[serde(default)]
    pub evolves_to: Vec<ChainLink>,
}

/// `GET /generation/{id}`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationRecord {
    pub pokemon_species: Vec<NamedResource>,
}

impl SpritesRecord {
    pub fn official_artwork(&self) -> Option<&SpritePair> {
        self.other.as_ref()?.official_artwork.as_ref()
    }

    pub fn home_default(&self) -> Option<&str> {
        self.other.as_ref()?.home.as_ref()?.front_default.as_deref()
    }
}

/// Trailing numeric segment of a resource url (`.../pokemon-species/25/` → 25)
pub fn id_from_url(url: &str) -> Option<u32> {
    url.trim_end_matches('/').rsplit('/').next()?.parse().ok()
}
