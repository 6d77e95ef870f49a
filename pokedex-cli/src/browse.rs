//! Interactive browse session
//!
//! Reads one command per line. `more` starts a page load in the background;
//! the page is merged before the next command runs, and a second `more` while
//! it is in flight is ignored. `quit` drops a page still in flight.

use anyhow::Result;
use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tokio::task::JoinHandle;
use tracing::debug;

use pokedex_core::{fetch_page, CatalogAggregator, CatalogError, Entry, PageTicket, ScrollDriver};

use crate::catalog_cli::{bottom_of, open_detail, print_banner, print_detail, print_entries};
use crate::state::{DetailView, ErrorBanner, LoadingIndicator};

const HELP: &str = "\
Commands:
  more            load the next page
  list            show the current view
  search <query>  search by name
  clear           clear the search
  show <name>     open the detail view
  shiny           toggle shiny artwork
  close           close the detail view
  select <url>    show a single entry
  quit            exit";

struct PendingPage {
    ticket: PageTicket,
    handle: JoinHandle<pokedex_core::Result<Vec<Entry>>>,
}

pub struct BrowseSession {
    aggregator: CatalogAggregator,
    driver: ScrollDriver,
    view: DetailView,
    banner: ErrorBanner,
    pending: Option<PendingPage>,
}

impl BrowseSession {
    pub fn new(aggregator: CatalogAggregator) -> Self {
        Self {
            aggregator,
            driver: ScrollDriver::default(),
            view: DetailView::default(),
            banner: ErrorBanner::default(),
            pending: None,
        }
    }

    /// Read commands until `quit` or end of input
    pub async fn run<R: AsyncBufRead + Unpin>(mut self, input: R) -> Result<()> {
        if let Err(e) = self.aggregator.load_initial().await {
            self.banner.report(&e, "Failed to load the catalog");
            print_banner(&self.banner);
        } else {
            print_entries(self.aggregator.filtered(), false)?;
        }
        println!("{HELP}");

        let mut lines = input.lines();
        while let Some(line) = lines.next_line().await? {
            if !self.handle(&line).await? {
                break;
            }
        }
        Ok(())
    }

    /// Run one command; returns `false` once the session should end
    pub async fn handle(&mut self, line: &str) -> Result<bool> {
        let line = line.trim();
        if line.is_empty() {
            return Ok(true);
        }
        let (command, arg) = match line.split_once(' ') {
            Some((command, arg)) => (command, arg.trim()),
            None => (line, ""),
        };

        match command {
            "quit" | "exit" => return Ok(false),
            "more" => {}
            _ => self.finish_pending().await,
        }

        match command {
            "more" => self.more(),
            "list" => print_entries(self.aggregator.filtered(), false)?,
            "search" => {
                let results = self.aggregator.search(arg).await;
                print_entries(&results, false)?;
            }
            "clear" => {
                self.aggregator.clear_search();
                print_entries(self.aggregator.filtered(), false)?;
            }
            "show" => {
                let gateway = self.aggregator.gateway();
                let config = self.aggregator.config().clone();
                if open_detail(gateway.as_ref(), &config, arg, &mut self.view, &mut self.banner).await {
                    print_detail(&self.view, false)?;
                } else {
                    print_banner(&self.banner);
                }
            }
            "shiny" => {
                self.view.toggle_shiny();
                if self.view.is_open() {
                    print_detail(&self.view, false)?;
                } else {
                    let state = if self.view.is_shiny() { "on" } else { "off" };
                    println!("Shiny artwork {state}");
                }
            }
            "close" => {
                self.view.close();
                self.banner.clear();
            }
            "select" => {
                let results = self.aggregator.select(arg).await;
                print_entries(&results, false)?;
            }
            "help" => println!("{HELP}"),
            other => println!("Unknown command '{other}'. Type 'help' for commands."),
        }
        Ok(true)
    }

    fn more(&mut self) {
        let metrics = bottom_of(self.aggregator.filtered().len());
        let Some(ticket) = self.driver.on_scroll(&mut self.aggregator, metrics) else {
            debug!("Ignoring 'more' while a page is loading");
            return;
        };

        let gateway = self.aggregator.gateway();
        let config = self.aggregator.config().clone();
        let handle = tokio::spawn(async move { fetch_page(gateway.as_ref(), &config, ticket.offset).await });
        self.pending = Some(PendingPage { ticket, handle });

        if let Some(text) = LoadingIndicator::render(self.aggregator.is_fetching()) {
            println!("{text}");
        }
    }

    /// Merge the in-flight page, if any
    async fn finish_pending(&mut self) {
        let Some(pending) = self.pending.take() else {
            return;
        };
        let result = pending
            .handle
            .await
            .unwrap_or_else(|e| Err(CatalogError::Network(format!("page task failed: {e}"))));

        // failures are logged by the aggregator and leave the view unchanged
        if let Ok(added) = self.aggregator.complete_page(pending.ticket, result) {
            println!(
                "Loaded {} more entries ({} total)",
                added,
                self.aggregator.entries().len()
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pokedex_core::{CatalogConfig, MemoryGateway};
    use pretty_assertions::assert_eq;
    use serde_json::{json, Value};
    use std::sync::Arc;

    const BASE: &str = "https://pokeapi.co/api/v2";

    fn detail(id: u32, name: &str) -> Value {
        json!({
            "id": id,
            "name": name,
            "height": 4,
            "weight": 60,
            "species": {"name": name, "url": format!("{BASE}/pokemon-species/{id}/")},
            "sprites": {
                "front_default": format!("{name}.png"),
                "other": {"official-artwork": {
                    "front_default": format!("{name}-art.png"),
                    "front_shiny": format!("{name}-shiny.png")
                }}
            }
        })
    }

    fn session() -> BrowseSession {
        let gateway = MemoryGateway::new(BASE)
            .with_response(
                "pokemon?limit=1&offset=0",
                json!({"count": 2, "results": [{"name": "pichu", "url": format!("{BASE}/pokemon/172/")}]}),
            )
            .with_response(
                "pokemon?limit=1&offset=1",
                json!({"count": 2, "results": [{"name": "pikachu", "url": format!("{BASE}/pokemon/25/")}]}),
            )
            .with_response("pokemon/172", detail(172, "pichu"))
            .with_response("pokemon/25", detail(25, "pikachu"))
            .with_response("pokemon/pikachu", detail(25, "pikachu"))
            .with_response(
                "pokemon-species/25",
                json!({"evolution_chain": {"url": format!("{BASE}/evolution-chain/10/")}}),
            )
            .with_response(
                "evolution-chain/10",
                json!({"chain": {
                    "species": {"name": "pikachu", "url": format!("{BASE}/pokemon-species/25/")},
                    "evolves_to": []
                }}),
            );
        let config = CatalogConfig {
            page_size: 1,
            ..Default::default()
        };
        BrowseSession::new(CatalogAggregator::new(Arc::new(gateway), config))
    }

    #[tokio::test]
    async fn test_more_is_not_reentrant() {
        let mut session = session();
        session.aggregator.load_initial().await.unwrap();

        session.handle("more").await.unwrap();
        session.handle("more").await.unwrap();
        assert!(session.aggregator.is_fetching());

        session.handle("list").await.unwrap();
        assert!(!session.aggregator.is_fetching());
        let names: Vec<&str> = session
            .aggregator
            .entries()
            .iter()
            .map(|e| e.name.as_str())
            .collect();
        assert_eq!(names, vec!["pichu", "pikachu"]);
    }

    #[tokio::test]
    async fn test_show_shiny_close() {
        let mut session = session();
        session.handle("show Pikachu").await.unwrap();
        assert!(session.view.is_open());
        assert_eq!(session.view.artwork(), Some("pikachu-art.png"));

        session.handle("shiny").await.unwrap();
        assert_eq!(session.view.artwork(), Some("pikachu-shiny.png"));

        session.handle("close").await.unwrap();
        assert!(!session.view.is_open());
    }

    #[tokio::test]
    async fn test_failed_show_sets_banner() {
        let mut session = session();
        session.handle("show missingno").await.unwrap();
        assert!(!session.view.is_open());
        assert_eq!(
            session.banner.message(),
            Some("Failed to fetch details for 'missingno'")
        );
    }

    #[tokio::test]
    async fn test_quit_drops_pending_page() {
        let mut session = session();
        session.aggregator.load_initial().await.unwrap();

        session.handle("more").await.unwrap();
        assert!(!session.handle("quit").await.unwrap());
        assert_eq!(session.aggregator.entries().len(), 1);
        assert!(session.pending.is_some());
    }

    #[tokio::test]
    async fn test_quit_ends_session() {
        let mut session = session();
        assert!(!session.handle("quit").await.unwrap());
        assert!(session.handle("bogus").await.unwrap());
    }
}
