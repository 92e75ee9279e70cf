//! Paginated, searchable listing state
//!
//! The list never performs I/O itself. Every change to the query key hands
//! back a [`FetchTicket`] that the caller executes; the result is fed back
//! through [`PagedSearchList::complete`]. Only the most recently issued
//! ticket is applied, so a slow response for an old page or search term can
//! never overwrite the results the operator is looking at.

use std::collections::HashMap;

use sensei_admin_core::{AdminResult, ListNodesQuery, NodePage};
use tracing::{debug, warn};

use crate::tui::transform::{transform_page, ResultPage};
use crate::tui::types::row::DisplayRow;

pub const EMPTY_HEADLINE: &str = "No nodes found";
pub const EMPTY_SUBTEXT: &str = "Try changing the search term";
pub const SEARCH_PLACEHOLDER: &str = "Search";

/// Entity listed by a query key
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityKind {
    Nodes,
}

/// Identity of a result set: entity, page, search term and page size
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct QueryKey {
    pub kind: EntityKind,
    pub page: usize,
    pub search_term: String,
    pub take: usize,
}

impl QueryKey {
    pub fn nodes(page: usize, search_term: impl Into<String>, take: usize) -> Self {
        Self {
            kind: EntityKind::Nodes,
            page,
            search_term: search_term.into(),
            take,
        }
    }

    pub fn to_query(&self) -> ListNodesQuery {
        ListNodesQuery::new(self.page, self.search_term.clone(), self.take)
    }
}

/// A fetch the caller must run for a specific key
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchTicket {
    pub key: QueryKey,
    pub seq: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchDisposition {
    Applied,
    Superseded,
}

#[derive(Debug, Clone)]
enum CacheEntry {
    Ready(ResultPage),
    Failed(String),
}

/// What the list should render for the current key
#[derive(Debug, Clone, PartialEq)]
pub enum ListView<'a> {
    Loading,
    Failed {
        message: &'a str,
    },
    Empty {
        headline: &'static str,
        subtext: &'static str,
    },
    Rows {
        rows: &'a [DisplayRow],
        has_more: bool,
        total: u64,
        /// A newer fetch for the same key is in flight
        refreshing: bool,
    },
}

#[derive(Debug)]
pub struct PagedSearchList {
    key: QueryKey,
    cache: HashMap<QueryKey, CacheEntry>,
    in_flight: Option<FetchTicket>,
    next_seq: u64,
    fetches_issued: u64,
}

impl PagedSearchList {
    pub fn new(take: usize) -> Self {
        Self {
            key: QueryKey::nodes(0, "", take.max(1)),
            cache: HashMap::new(),
            in_flight: None,
            next_seq: 0,
            fetches_issued: 0,
        }
    }

    pub fn key(&self) -> &QueryKey {
        &self.key
    }

    pub fn page(&self) -> usize {
        self.key.page
    }

    pub fn search_term(&self) -> &str {
        &self.key.search_term
    }

    /// Number of fetches handed out so far.
    pub fn fetches_issued(&self) -> u64 {
        self.fetches_issued
    }

    pub fn is_loading(&self) -> bool {
        self.in_flight.is_some()
    }

    /// Initial fetch for the starting key.
    pub fn mount(&mut self) -> FetchTicket {
        self.issue()
    }

    /// Change the search term; the page resets to 0.
    pub fn set_search_term(&mut self, term: impl Into<String>) -> Option<FetchTicket> {
        let term = term.into();
        if term == self.key.search_term {
            return None;
        }
        self.change_key(QueryKey::nodes(0, term, self.key.take))
    }

    pub fn set_page(&mut self, page: usize) -> Option<FetchTicket> {
        self.change_key(QueryKey::nodes(page, self.key.search_term.clone(), self.key.take))
    }

    pub fn set_take(&mut self, take: usize) -> Option<FetchTicket> {
        if take == 0 {
            return None;
        }
        self.change_key(QueryKey::nodes(self.key.page, self.key.search_term.clone(), take))
    }

    /// Advance one page when the last result for the current key had more.
    pub fn next_page(&mut self) -> Option<FetchTicket> {
        if self.has_more() {
            self.set_page(self.key.page + 1)
        } else {
            None
        }
    }

    pub fn prev_page(&mut self) -> Option<FetchTicket> {
        if self.key.page == 0 {
            return None;
        }
        self.set_page(self.key.page - 1)
    }

    /// Re-issue the fetch for the current key.
    pub fn retry(&mut self) -> FetchTicket {
        self.issue()
    }

    /// Drop every cached result and refetch the current key.
    ///
    /// The current key's rows stay visible, marked refreshing, until the new
    /// response arrives. Any fetch that was in flight is superseded.
    pub fn invalidate(&mut self) -> FetchTicket {
        let current = self.cache.remove(&self.key);
        self.cache.clear();
        if let Some(CacheEntry::Ready(page)) = current {
            self.cache.insert(self.key.clone(), CacheEntry::Ready(page));
        }
        debug!(page = self.key.page, "Listing invalidated");
        self.issue()
    }

    /// Feed back the outcome of a fetch.
    pub fn complete(
        &mut self,
        ticket: FetchTicket,
        result: AdminResult<NodePage>,
    ) -> FetchDisposition {
        if self.in_flight.as_ref() != Some(&ticket) {
            debug!(
                seq = ticket.seq,
                page = ticket.key.page,
                "Discarding superseded listing response"
            );
            return FetchDisposition::Superseded;
        }

        self.in_flight = None;
        let entry = match result {
            Ok(page) => CacheEntry::Ready(transform_page(&page)),
            Err(e) => {
                warn!("Failed to load nodes: {}", e);
                CacheEntry::Failed(e.to_string())
            }
        };
        self.cache.insert(ticket.key, entry);
        FetchDisposition::Applied
    }

    /// Rows of the current key, or nothing while loading or failed.
    pub fn rows(&self) -> &[DisplayRow] {
        match self.cache.get(&self.key) {
            Some(CacheEntry::Ready(page)) => &page.rows,
            _ => &[],
        }
    }

    pub fn has_more(&self) -> bool {
        matches!(self.cache.get(&self.key), Some(CacheEntry::Ready(page)) if page.has_more)
    }

    pub fn view(&self) -> ListView<'_> {
        match (self.cache.get(&self.key), self.in_flight.is_some()) {
            (Some(CacheEntry::Ready(page)), refreshing) => {
                if page.rows.is_empty() {
                    if refreshing {
                        ListView::Loading
                    } else {
                        ListView::Empty {
                            headline: EMPTY_HEADLINE,
                            subtext: EMPTY_SUBTEXT,
                        }
                    }
                } else {
                    ListView::Rows {
                        rows: page.rows.as_slice(),
                        has_more: page.has_more,
                        total: page.total,
                        refreshing,
                    }
                }
            }
            (Some(CacheEntry::Failed(message)), false) => ListView::Failed {
                message: message.as_str(),
            },
            _ => ListView::Loading,
        }
    }

    fn change_key(&mut self, key: QueryKey) -> Option<FetchTicket> {
        if key == self.key {
            return None;
        }
        self.key = key;
        Some(self.issue())
    }

    fn issue(&mut self) -> FetchTicket {
        self.next_seq += 1;
        self.fetches_issued += 1;
        let ticket = FetchTicket {
            key: self.key.clone(),
            seq: self.next_seq,
        };
        self.in_flight = Some(ticket.clone());
        ticket
    }
}
