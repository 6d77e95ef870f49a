//! Shared fixtures for the core integration tests

#![allow(dead_code)]

use pokedex_core::MemoryGateway;
use serde_json::{json, Value};
use std::sync::Once;

pub const BASE: &str = "https://pokeapi.co/api/v2";

/// The first 25 national dex entries
pub const NAMES: [&str; 25] = [
    "bulbasaur",
    "ivysaur",
    "venusaur",
    "charmander",
    "charmeleon",
    "charizard",
    "squirtle",
    "wartortle",
    "blastoise",
    "caterpie",
    "metapod",
    "butterfree",
    "weedle",
    "kakuna",
    "beedrill",
    "pidgey",
    "pidgeotto",
    "pidgeot",
    "rattata",
    "raticate",
    "spearow",
    "fearow",
    "ekans",
    "arbok",
    "pikachu",
];

static INIT: Once = Once::new();

/// Initialize logging for tests (only once per test run)
pub fn init_test_logging() {
    INIT.call_once(|| {
        use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

        let _ = tracing_subscriber::registry()
            .with(
                tracing_subscriber::fmt::layer()
                    .with_test_writer()
                    .with_target(true),
            )
            .with(tracing_subscriber::filter::EnvFilter::from_default_env())
            .try_init();
    });
}

pub fn pokemon_url(id: u32) -> String {
    format!("{BASE}/pokemon/{id}/")
}

pub fn artwork(name: &str) -> String {
    format!("https://img.example/artwork/{name}.png")
}

/// Detail record with every sprite the core reads
pub fn detail(id: u32, name: &str) -> Value {
    json!({
        "id": id,
        "name": name,
        "height": 7,
        "weight": 69,
        "types": [{"slot": 1, "type": {"name": "normal", "url": format!("{BASE}/type/1/")}}],
        "abilities": [{"ability": {"name": "run-away", "url": format!("{BASE}/ability/50/")}}],
        "species": {"name": name, "url": format!("{BASE}/pokemon-species/{id}/")},
        "sprites": {
            "front_default": format!("https://img.example/front/{name}.png"),
            "front_shiny": format!("https://img.example/shiny/{name}.png"),
            "other": {
                "official-artwork": {
                    "front_default": artwork(name),
                    "front_shiny": format!("https://img.example/artwork-shiny/{name}.png")
                },
                "home": {"front_default": format!("https://img.example/home/{name}.png")}
            }
        }
    })
}

fn page(offset: u32, limit: u32) -> Value {
    let total = NAMES.len() as u32;
    let results: Vec<Value> = (offset..(offset + limit).min(total))
        .map(|i| json!({"name": NAMES[i as usize], "url": pokemon_url(i + 1)}))
        .collect();
    json!({
        "count": total,
        "next": null,
        "previous": null,
        "results": results
    })
}

/// Two list pages of 20 plus a detail record per entry, reachable by id and
/// by name
pub fn catalog_gateway() -> MemoryGateway {
    let mut gateway = MemoryGateway::new(BASE)
        .with_response("pokemon?limit=20&offset=0", page(0, 20))
        .with_response("pokemon?limit=20&offset=20", page(20, 20));

    for (index, name) in NAMES.iter().enumerate() {
        let id = index as u32 + 1;
        gateway = gateway
            .with_response(&format!("pokemon/{id}"), detail(id, name))
            .with_response(&format!("pokemon/{name}"), detail(id, name));
    }
    gateway
}

/// Species, chain and generation records for the pikachu line
pub fn with_pikachu_line(gateway: MemoryGateway) -> MemoryGateway {
    gateway
        .with_response("pokemon/pichu", detail(172, "pichu"))
        .with_response("pokemon/raichu", detail(26, "raichu"))
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

/// One generation listing the given ids, in the given order
pub fn with_generation(gateway: MemoryGateway, generation: u8, ids: &[u32]) -> MemoryGateway {
    let species: Vec<Value> = ids
        .iter()
        .map(|id| {
            json!({
                "name": NAMES[*id as usize - 1],
                "url": format!("{BASE}/pokemon-species/{id}/")
            })
        })
        .collect();
    gateway.with_response(
        &format!("generation/{generation}"),
        json!({"pokemon_species": species}),
    )
}
