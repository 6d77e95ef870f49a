//! Catalog aggregator
//!
//! Owns the growing list of entries and the currently displayed view.
//!
//! - Pages are merged by `url`; the first occurrence of an entry wins.
//! - The view follows the full list unless a search or a selection pins it.
//! - Page loads are ticketed: only one may be in flight, and a ticket issued
//!   before [`CatalogAggregator::reset`] completes as a no-op.

use std::collections::HashSet;
use std::sync::Arc;
use tracing::{debug, error, info, warn};

use crate::config::CatalogConfig;
use crate::error::{CatalogError, Result};
use crate::fanout::fan_out;
use crate::gateway::{fetch, CatalogGateway, Endpoints};
use crate::model::Entry;
use crate::normalize::{entry_from_record, normalize_listing};
use crate::wire::{PageRecord, PokemonRecord};

/// What the displayed list currently reflects
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ViewMode {
    /// Every loaded entry
    #[default]
    All,
    /// Result of `search` for the lowercased query
    Search(String),
    /// Single entry chosen from a generation selector
    Selection(String),
}

/// Permission to load one page, issued by [`CatalogAggregator::begin_next_page`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageTicket {
    pub offset: u32,
    epoch: u64,
}

/// Fetch the list page at `offset` and normalize every member
///
/// Member detail fetches run concurrently; the page keeps the order of the
/// remote index.
pub async fn fetch_page(
    gateway: &dyn CatalogGateway,
    config: &CatalogConfig,
    offset: u32,
) -> Result<Vec<Entry>> {
    let endpoints = Endpoints::new(gateway.base_url());
    let page: PageRecord = fetch(gateway, &endpoints.page(config.page_size, offset)).await?;
    debug!(
        "Page at offset {} lists {} entries",
        offset,
        page.results.len()
    );

    let entries = fan_out(
        "list page",
        page.results,
        config.max_concurrency,
        config.fan_out,
        |resource| async move { normalize_listing(gateway, &resource).await },
    )
    .await?;

    info!("Loaded page at offset {} ({} entries)", offset, entries.len());
    Ok(entries)
}

/// Append `page` to `list`, skipping urls already present
///
/// Returns the number of entries added.
pub fn merge_unique(list: &mut Vec<Entry>, page: Vec<Entry>) -> usize {
    let mut seen: HashSet<String> = list.iter().map(|e| e.url.clone()).collect();
    let before = list.len();
    for entry in page {
        if seen.insert(entry.url.clone()) {
            list.push(entry);
        }
    }
    list.len() - before
}

/// The catalog state behind the list view
pub struct CatalogAggregator {
    gateway: Arc<dyn CatalogGateway>,
    config: CatalogConfig,
    endpoints: Endpoints,
    entries: Vec<Entry>,
    filtered: Vec<Entry>,
    last_offset: Option<u32>,
    is_fetching: bool,
    view: ViewMode,
    epoch: u64,
}

impl std::fmt::Debug for CatalogAggregator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CatalogAggregator")
            .field("gateway", &self.gateway.name())
            .field("entries", &self.entries.len())
            .field("filtered", &self.filtered.len())
            .field("last_offset", &self.last_offset)
            .field("is_fetching", &self.is_fetching)
            .field("view", &self.view)
            .finish()
    }
}

impl CatalogAggregator {
    pub fn new(gateway: Arc<dyn CatalogGateway>, config: CatalogConfig) -> Self {
        let endpoints = Endpoints::new(gateway.base_url());
        Self {
            gateway,
            config,
            endpoints,
            entries: Vec::new(),
            filtered: Vec::new(),
            last_offset: None,
            is_fetching: false,
            view: ViewMode::All,
            epoch: 0,
        }
    }

    pub fn entries(&self) -> &[Entry] {
        &self.entries
    }

    /// The displayed list
    pub fn filtered(&self) -> &[Entry] {
        &self.filtered
    }

    /// Offset of the last page merged (0 before any load)
    pub fn page_offset(&self) -> u32 {
        self.last_offset.unwrap_or(0)
    }

    pub fn is_fetching(&self) -> bool {
        self.is_fetching
    }

    pub fn view(&self) -> &ViewMode {
        &self.view
    }

    pub fn is_search_active(&self) -> bool {
        !matches!(self.view, ViewMode::All)
    }

    pub fn gateway(&self) -> Arc<dyn CatalogGateway> {
        Arc::clone(&self.gateway)
    }

    pub fn config(&self) -> &CatalogConfig {
        &self.config
    }

    /// Fetch a normalized page without touching the aggregate
    pub async fn load_page(&self, offset: u32) -> Result<Vec<Entry>> {
        fetch_page(self.gateway.as_ref(), &self.config, offset).await
    }

    /// Load the first page; it replaces both the list and the view
    pub async fn load_initial(&mut self) -> Result<()> {
        self.is_fetching = true;
        let result = self.load_page(0).await;
        self.is_fetching = false;

        match result {
            Ok(page) => {
                self.entries.clear();
                merge_unique(&mut self.entries, page);
                self.last_offset = Some(0);
                if !self.is_search_active() {
                    self.filtered = self.entries.clone();
                }
                Ok(())
            }
            Err(e) => {
                error!("Failed to load initial page: {}", e);
                Err(e)
            }
        }
    }

    /// Merge a page into the list, first occurrence of a url wins
    ///
    /// The view is recomputed unless a search or selection is active.
    /// Returns the number of new entries.
    pub fn append_page(&mut self, page: Vec<Entry>) -> usize {
        let added = merge_unique(&mut self.entries, page);
        if !self.is_search_active() {
            self.filtered = self.entries.clone();
        }
        debug!("Merged {} new entries ({} total)", added, self.entries.len());
        added
    }

    /// Offset the next scroll-triggered load should request
    pub fn next_offset(&self) -> u32 {
        self.last_offset
            .map_or(0, |offset| offset + self.config.page_size)
    }

    /// Claim the single in-flight page load
    ///
    /// Returns `None` while another load is running.
    pub fn begin_next_page(&mut self) -> Option<PageTicket> {
        if self.is_fetching {
            debug!("Page load already in flight, ignoring trigger");
            return None;
        }
        self.is_fetching = true;
        Some(PageTicket {
            offset: self.next_offset(),
            epoch: self.epoch,
        })
    }

    /// Hand back the result of a ticketed load
    ///
    /// Stale tickets are ignored. On failure the list and view stay as they
    /// were and only the fetching flag is cleared.
    pub fn complete_page(&mut self, ticket: PageTicket, result: Result<Vec<Entry>>) -> Result<usize> {
        if ticket.epoch != self.epoch {
            debug!(
                "Discarding page at offset {} from a previous session",
                ticket.offset
            );
            return Ok(0);
        }
        self.is_fetching = false;

        match result {
            Ok(page) => {
                self.last_offset = Some(ticket.offset);
                Ok(self.append_page(page))
            }
            Err(e) => {
                error!("Failed to load page at offset {}: {}", ticket.offset, e);
                Err(e)
            }
        }
    }

    /// Load and merge the next page inline
    pub async fn load_next_page(&mut self) -> Result<usize> {
        let Some(ticket) = self.begin_next_page() else {
            return Ok(0);
        };
        let result = self.load_page(ticket.offset).await;
        self.complete_page(ticket, result)
    }

    /// Search loaded entries by name, falling back to a remote lookup
    ///
    /// The returned list replaces the view. A failed remote lookup leaves the
    /// view empty.
    pub async fn search(&mut self, query: &str) -> Vec<Entry> {
        let query = query.to_lowercase();
        if query.trim().is_empty() {
            self.clear_search();
            return self.filtered.clone();
        }
        self.view = ViewMode::Search(query.clone());

        let local: Vec<Entry> = self
            .entries
            .iter()
            .filter(|entry| entry.name.to_lowercase().contains(&query))
            .cloned()
            .collect();

        if !local.is_empty() {
            debug!("Search '{}' matched {} loaded entries", query, local.len());
            self.filtered = local;
            return self.filtered.clone();
        }

        self.filtered = match self.lookup(&query).await {
            Ok(entry) => {
                debug!("Search '{}' resolved remotely to '{}'", query, entry.name);
                vec![entry]
            }
            Err(e) => {
                debug!("Search '{}' found nothing remotely: {}", query, e);
                Vec::new()
            }
        };
        self.filtered.clone()
    }

    /// Reset the view to every loaded entry
    pub fn clear_search(&mut self) {
        self.view = ViewMode::All;
        self.filtered = self.entries.clone();
    }

    /// Replace the view with the single entry at `url`
    ///
    /// On failure the view is left empty.
    pub async fn select(&mut self, url: &str) -> Vec<Entry> {
        self.view = ViewMode::Selection(url.to_string());

        let result = async {
            let record: PokemonRecord = fetch(self.gateway.as_ref(), url).await?;
            entry_from_record(url, &record)
        }
        .await;

        self.filtered = match result {
            Ok(entry) => vec![entry],
            Err(e) => {
                error!("Failed to fetch entry details for {}: {}", url, e);
                Vec::new()
            }
        };
        self.filtered.clone()
    }

    /// Drop all state; in-flight page tickets become stale
    pub fn reset(&mut self) {
        self.epoch = self.epoch.wrapping_add(1);
        self.entries.clear();
        self.filtered.clear();
        self.last_offset = None;
        self.is_fetching = false;
        self.view = ViewMode::All;
    }

    async fn lookup(&self, query: &str) -> Result<Entry> {
        // the query is a single path segment
        if query.contains(['/', '?', '#']) {
            warn!("Rejecting search query '{}' as a lookup path", query);
            return Err(CatalogError::NotFound(query.to_string()));
        }
        let url = self.endpoints.pokemon(query);
        let record: PokemonRecord = fetch(self.gateway.as_ref(), &url).await?;
        entry_from_record(&url, &record)
    }
}
