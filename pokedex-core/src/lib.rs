//! Pokedex core - catalog aggregation over the PokeAPI
//!
//! This crate owns everything between the remote API and the presentation
//! shell: fetching list pages, normalizing records into entries, merging and
//! deduplicating the growing catalog, searching it, resolving evolution
//! chains and building the per-generation index.
//!
//! # Architecture
//!
//! ```text
//! PokeAPI (REST)
//!     │
//!     ▼
//! CatalogGateway          ← HttpGateway / MemoryGateway
//!     │
//!     ├── normalize       ← raw record → Entry
//!     ├── evolution       ← chain tree → ordered Entry list
//!     ├── generations     ← 9 sorted buckets
//!     └── aggregator      ← pages, dedup, search, scroll tickets
//!            │
//!            ▼
//!     Presentation shell (pokedex-cli)
//! ```

pub mod aggregator;
pub mod config;
pub mod details;
pub mod error;
pub mod evolution;
pub mod fanout;
pub mod gateway;
pub mod generations;
pub mod model;
pub mod normalize;
pub mod scroll;
pub mod wire;

pub use aggregator::{fetch_page, CatalogAggregator, PageTicket, ViewMode};
pub use config::{CatalogConfig, FanOutPolicy, DEFAULT_BASE_URL};
pub use details::{fetch_details, fetch_overview, EntryOverview};
pub use error::{CatalogError, ErrorKind, Result};
pub use evolution::{resolve_evolutions, EvolutionNode, SpeciesRef};
pub use gateway::{CatalogGateway, Endpoints, HttpGateway, MemoryGateway};
pub use generations::{build_generation_index, GenerationBucket, GenerationIndex};
pub use model::{Entry, EntryDetails, Sprites};
pub use scroll::{ScrollDriver, ScrollMetrics};
