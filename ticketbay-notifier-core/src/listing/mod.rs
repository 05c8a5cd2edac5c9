//! Upstream resale listing access
//!
//! The listing site renders its resale list server-side and embeds the data
//! as JSON inside a `<script id="__NEXT_DATA__">` element. [`ListingFetcher`]
//! retrieves and unwraps that payload page by page; [`ListingParser`] turns
//! each raw record into a [`TicketItem`](crate::types::TicketItem).

mod fetcher;
mod parser;

pub use fetcher::{extract_listings, ListingFetcher};
pub use parser::ListingParser;

use crate::error::Error;
use crate::types::RawListing;

/// Outcome of fetching one listing page.
///
/// The monitor stops paging on both `Empty` and `Failed`; keeping them apart
/// lets logs and stats tell "no more tickets" from "the site is unreachable".
#[derive(Debug)]
pub enum PageFetch {
    /// Page returned at least one listing
    Listings(Vec<RawListing>),
    /// Page was fetched and decoded but holds no listings
    Empty,
    /// Transport or payload failure (already logged by the fetcher)
    Failed(Error),
}

impl PageFetch {
    pub fn is_failure(&self) -> bool {
        matches!(self, PageFetch::Failed(_))
    }

    /// Listings on the page; empty for both `Empty` and `Failed`
    pub fn into_listings(self) -> Vec<RawListing> {
        match self {
            PageFetch::Listings(listings) => listings,
            PageFetch::Empty | PageFetch::Failed(_) => Vec::new(),
        }
    }
}

/// Source of listing pages for the monitor.
///
/// Implementations must never error: failures are reported as
/// [`PageFetch::Failed`].
#[allow(async_fn_in_trait)]
pub trait ListingSource {
    /// Fetch the listings on `page` (0-based) for today onward
    async fn fetch_page(&self, page: u32) -> PageFetch;
}

impl ListingSource for ListingFetcher {
    async fn fetch_page(&self, page: u32) -> PageFetch {
        self.fetch(page).await
    }
}

impl<T: ListingSource> ListingSource for &T {
    async fn fetch_page(&self, page: u32) -> PageFetch {
        (**self).fetch_page(page).await
    }
}
