//! Scroll-triggered pagination

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::aggregator::{CatalogAggregator, PageTicket};

/// Distance from the bottom, in pixels, at which the next page is requested
pub const DEFAULT_THRESHOLD: f64 = 100.0;

/// Viewport position reported by the shell
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScrollMetrics {
    pub viewport_height: f64,
    pub scroll_y: f64,
    pub content_height: f64,
}

impl ScrollMetrics {
    pub fn distance_to_bottom(&self) -> f64 {
        self.content_height - (self.viewport_height + self.scroll_y)
    }
}

/// Turns scroll events into page tickets
#[derive(Debug, Clone, Copy)]
pub struct ScrollDriver {
    threshold: f64,
}

impl Default for ScrollDriver {
    fn default() -> Self {
        Self {
            threshold: DEFAULT_THRESHOLD,
        }
    }
}

impl ScrollDriver {
    pub fn with_threshold(threshold: f64) -> Self {
        Self { threshold }
    }

    pub fn crosses_threshold(&self, metrics: &ScrollMetrics) -> bool {
        metrics.viewport_height + metrics.scroll_y >= metrics.content_height - self.threshold
    }

    /// Claim the next page if the viewport is near the bottom
    ///
    /// Nothing is issued while another page load is in flight. A page merged
    /// during a search grows the list without changing the view.
    pub fn on_scroll(
        &self,
        aggregator: &mut CatalogAggregator,
        metrics: ScrollMetrics,
    ) -> Option<PageTicket> {
        if !self.crosses_threshold(&metrics) {
            return None;
        }
        debug!(
            "Scroll reached {:.0}px from the bottom",
            metrics.distance_to_bottom()
        );
        aggregator.begin_next_page()
    }
}
