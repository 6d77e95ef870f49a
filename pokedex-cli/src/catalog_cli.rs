//! Catalog commands
//!
//! Each command opens a gateway, drives the core and renders the result as a
//! table or as JSON.

use anyhow::{Context, Result};
use std::path::Path;
use std::sync::Arc;
use tabled::{
    settings::{object::Rows, Alignment, Modify, Style},
    Table, Tabled,
};
use tracing::{debug, info};

use pokedex_core::{
    build_generation_index, fetch_overview, CatalogAggregator, CatalogConfig, CatalogGateway,
    Endpoints, Entry, GenerationIndex, HttpGateway, MemoryGateway, ScrollDriver, ScrollMetrics,
};

use crate::state::{DetailView, ErrorBanner};

/// Terminal rows are treated as fixed-height list rows
const ROW_HEIGHT: f64 = 24.0;
const VIEWPORT_ROWS: f64 = 20.0;

/// Live HTTP gateway, or a fixture gateway when `fixtures` is given
pub fn open_gateway(
    config: &CatalogConfig,
    fixtures: Option<&Path>,
) -> Result<Arc<dyn CatalogGateway>> {
    match fixtures {
        Some(path) => {
            let gateway = MemoryGateway::from_fixture_file(path)
                .with_context(|| format!("Failed to load fixtures from {}", path.display()))?;
            info!("Using fixture gateway from {}", path.display());
            Ok(Arc::new(gateway))
        }
        None => {
            let gateway = HttpGateway::new(config).context("Failed to create HTTP client")?;
            Ok(Arc::new(gateway))
        }
    }
}

/// Detail url for a name, a numeric id or an explicit url
pub fn resolve_target(endpoints: &Endpoints, target: &str) -> String {
    let target = target.trim();
    if target.starts_with("http://") || target.starts_with("https://") {
        target.to_string()
    } else {
        endpoints.pokemon(&target.to_lowercase())
    }
}

/// Viewport scrolled all the way down a list of `rows` entries
pub fn bottom_of(rows: usize) -> ScrollMetrics {
    let content_height = rows as f64 * ROW_HEIGHT;
    let viewport_height = VIEWPORT_ROWS * ROW_HEIGHT;
    ScrollMetrics {
        viewport_height,
        scroll_y: (content_height - viewport_height).max(0.0),
        content_height,
    }
}

/// Load the first page, then scroll to the bottom until `pages` are loaded
///
/// A failed follow-up page stops paging and keeps what was loaded.
pub async fn load_pages(
    aggregator: &mut CatalogAggregator,
    driver: &ScrollDriver,
    pages: u32,
) -> Result<()> {
    aggregator
        .load_initial()
        .await
        .context("Failed to load the catalog")?;

    for _ in 1..pages {
        let metrics = bottom_of(aggregator.filtered().len());
        let Some(ticket) = driver.on_scroll(aggregator, metrics) else {
            break;
        };
        let page = aggregator.load_page(ticket.offset).await;
        if aggregator.complete_page(ticket, page).is_err() {
            break;
        }
    }
    debug!("Loaded {} entries", aggregator.entries().len());
    Ok(())
}

/// Table row for list views
#[derive(Tabled)]
struct EntryRow {
    #[tabled(rename = "No.")]
    number: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Image")]
    image: String,
}

impl From<&Entry> for EntryRow {
    fn from(entry: &Entry) -> Self {
        EntryRow {
            number: entry.number_label(),
            name: entry.display_name(),
            image: entry.image_url.clone(),
        }
    }
}

fn entry_table(entries: &[Entry]) -> String {
    let rows: Vec<EntryRow> = entries.iter().map(EntryRow::from).collect();
    Table::new(&rows)
        .with(Style::rounded())
        .with(Modify::new(Rows::first()).with(Alignment::center()))
        .to_string()
}

pub fn print_entries(entries: &[Entry], json_output: bool) -> Result<()> {
    if json_output {
        println!("{}", serde_json::to_string_pretty(entries)?);
        return Ok(());
    }
    if entries.is_empty() {
        println!("No entries found.");
        return Ok(());
    }
    println!("{}", entry_table(entries));
    Ok(())
}

/// Render the open detail panel
pub fn print_detail(view: &DetailView, json_output: bool) -> Result<()> {
    let Some(details) = view.selected() else {
        return Ok(());
    };

    if json_output {
        let output = serde_json::json!({
            "details": details,
            "evolutions": view.evolutions(),
            "shiny": view.is_shiny(),
            "artwork": view.artwork(),
        });
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(());
    }

    let star = if view.is_shiny() { " ★" } else { "" };
    println!();
    println!("{}{}", details.display_name(), star);
    println!("{}", details.number_label());
    println!(
        "Weight {}kg   Height {}m",
        details.weight_kg(),
        details.height_m()
    );
    println!("Type/s: {}", details.types.join(", "));
    println!("Abilities: {}", details.abilities.join(", "));
    if let Some(artwork) = view.artwork() {
        println!("Artwork: {artwork}");
    }

    if !view.evolutions().is_empty() {
        println!();
        println!("Evolutions:");
        println!("{}", entry_table(view.evolutions()));
    }
    Ok(())
}

pub fn print_banner(banner: &ErrorBanner) {
    if let Some(message) = banner.message() {
        println!("! {message}");
    }
}

pub async fn execute_list(aggregator: &mut CatalogAggregator, pages: u32, json_output: bool) -> Result<()> {
    load_pages(aggregator, &ScrollDriver::default(), pages).await?;
    print_entries(aggregator.filtered(), json_output)
}

pub async fn execute_search(
    aggregator: &mut CatalogAggregator,
    query: &str,
    pages: u32,
    json_output: bool,
) -> Result<()> {
    load_pages(aggregator, &ScrollDriver::default(), pages).await?;
    let results = aggregator.search(query).await;
    print_entries(&results, json_output)
}

/// Open the detail panel for `target`
///
/// A failure is reported through the banner; the panel stays closed.
pub async fn open_detail(
    gateway: &dyn CatalogGateway,
    config: &CatalogConfig,
    target: &str,
    view: &mut DetailView,
    banner: &mut ErrorBanner,
) -> bool {
    let url = resolve_target(&Endpoints::new(gateway.base_url()), target);
    match fetch_overview(gateway, config, &url).await {
        Ok(overview) => {
            banner.clear();
            view.open(overview.details, overview.evolutions);
            true
        }
        Err(e) => {
            banner.report(&e, &format!("Failed to fetch details for '{target}'"));
            false
        }
    }
}

pub async fn execute_show(
    gateway: &dyn CatalogGateway,
    config: &CatalogConfig,
    target: &str,
    shiny: bool,
    json_output: bool,
) -> Result<()> {
    let mut view = DetailView::default();
    let mut banner = ErrorBanner::default();
    if shiny {
        view.toggle_shiny();
    }

    if !open_detail(gateway, config, target, &mut view, &mut banner).await {
        let message = banner.message().unwrap_or("Failed to fetch details");
        anyhow::bail!("{message}");
    }
    print_detail(&view, json_output)
}

fn print_generations(index: &GenerationIndex, only: Option<u8>, json_output: bool) -> Result<()> {
    let buckets: Vec<_> = index
        .buckets
        .iter()
        .filter(|b| only.map_or(true, |g| b.generation == g))
        .collect();

    if json_output {
        println!("{}", serde_json::to_string_pretty(&buckets)?);
        return Ok(());
    }

    for bucket in buckets {
        println!("{} ({} entries)", bucket.label(), bucket.entries.len());
        for entry in &bucket.entries {
            println!("  {}", entry.option_label());
        }
    }
    if !index.is_complete() {
        let failed: Vec<String> = index.failed.iter().map(u8::to_string).collect();
        println!("Unavailable generations: {}", failed.join(", "));
    }
    Ok(())
}

pub async fn execute_generations(
    gateway: &dyn CatalogGateway,
    config: &CatalogConfig,
    generation: Option<u8>,
    json_output: bool,
) -> Result<()> {
    if let Some(g) = generation {
        if g == 0 || g > config.generation_count {
            anyhow::bail!(
                "Generation must be between 1 and {} (got {g})",
                config.generation_count
            );
        }
    }

    let index = build_generation_index(gateway, config)
        .await
        .context("Failed to build the generation index")?;
    print_generations(&index, generation, json_output)
}

pub async fn execute_select(aggregator: &mut CatalogAggregator, url: &str, json_output: bool) -> Result<()> {
    let view = aggregator.select(url).await;
    print_entries(&view, json_output)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_resolve_target() {
        let endpoints = Endpoints::new("https://pokeapi.co/api/v2");
        assert_eq!(
            resolve_target(&endpoints, "Pikachu"),
            "https://pokeapi.co/api/v2/pokemon/pikachu"
        );
        assert_eq!(
            resolve_target(&endpoints, "25"),
            "https://pokeapi.co/api/v2/pokemon/25"
        );
        assert_eq!(
            resolve_target(&endpoints, "https://example.test/pokemon/1/"),
            "https://example.test/pokemon/1/"
        );
    }

    #[test]
    fn test_bottom_of_crosses_threshold() {
        let driver = ScrollDriver::default();
        assert!(driver.crosses_threshold(&bottom_of(20)));
        assert!(driver.crosses_threshold(&bottom_of(3)));
    }

    #[test]
    fn test_entry_row() {
        let entry = Entry {
            id: 0,
            name: "mew".into(),
            url: "https://pokeapi.co/api/v2/pokemon/mew".into(),
            image_url: "mew.png".into(),
        };
        let row = EntryRow::from(&entry);
        assert_eq!(row.number, "#mew");
        assert_eq!(row.name, "Mew");
    }
}
