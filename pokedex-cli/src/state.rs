//! Shell-side view state: the detail panel, the error banner and the loading
//! indicator

use pokedex_core::{Entry, EntryDetails};
use std::fmt::Display;
use tracing::error;

/// The open detail panel and its shiny toggle
///
/// The shiny toggle survives closing and reopening the panel.
#[derive(Debug, Default)]
pub struct DetailView {
    selected: Option<EntryDetails>,
    evolutions: Vec<Entry>,
    shiny: bool,
}

impl DetailView {
    pub fn open(&mut self, details: EntryDetails, evolutions: Vec<Entry>) {
        self.selected = Some(details);
        self.evolutions = evolutions;
    }

    pub fn close(&mut self) {
        self.selected = None;
        self.evolutions.clear();
    }

    pub fn toggle_shiny(&mut self) {
        self.shiny = !self.shiny;
    }

    pub fn is_open(&self) -> bool {
        self.selected.is_some()
    }

    pub fn is_shiny(&self) -> bool {
        self.shiny
    }

    pub fn selected(&self) -> Option<&EntryDetails> {
        self.selected.as_ref()
    }

    pub fn evolutions(&self) -> &[Entry] {
        &self.evolutions
    }

    /// Image shown for the selected entry
    pub fn artwork(&self) -> Option<&str> {
        self.selected.as_ref().and_then(|d| d.artwork(self.shiny))
    }
}

/// Single user-facing error message
#[derive(Debug, Default)]
pub struct ErrorBanner {
    message: Option<String>,
}

impl ErrorBanner {
    /// Log `err` and replace the current message
    pub fn report(&mut self, err: &dyn Display, message: &str) {
        error!("{}: {}", message, err);
        self.message = Some(message.to_string());
    }

    pub fn clear(&mut self) {
        self.message = None;
    }

    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }
}

/// Footer line shown while a page load is in flight
pub struct LoadingIndicator;

impl LoadingIndicator {
    pub const TEXT: &'static str = "Loading more Pokémon...";

    pub fn render(is_fetching: bool) -> Option<&'static str> {
        is_fetching.then_some(Self::TEXT)
    }
}
