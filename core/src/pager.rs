//! Cursor-following pager over a list operation.
//!
//! # Design
//! A `Pager` owns a fetch closure that performs one page request for a given
//! cursor; page size and every other argument are captured by the closure
//! when the pager is created and never change. The pager only remembers the
//! opaque `start` token the service handed back and whether another page
//! exists.
//!
//! A service that keeps returning the cursor it was just given will keep the
//! pager `Ready` forever. That is a server-side contract violation and is not
//! detected here.

use std::marker::PhantomData;

use serde::de::DeserializeOwned;
use serde::Deserialize;
use tracing::trace;

use crate::error::ApiError;
use crate::http::HttpResponse;

/// One page of a list response.
#[derive(Debug, Clone, PartialEq)]
pub struct Page<T> {
    pub items: Vec<T>,
    /// Cursor for the following page; `None` on the last page.
    pub next: Option<String>,
    pub total_count: Option<u64>,
    pub limit: Option<u64>,
}

#[derive(Debug, Default, Deserialize)]
struct PageLinkEnvelope {
    #[serde(default)]
    start: Option<String>,
    #[serde(default)]
    href: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct Envelope {
    #[serde(default)]
    next: Option<PageLinkEnvelope>,
    #[serde(default)]
    total_count: Option<u64>,
    #[serde(default)]
    limit: Option<u64>,
}

impl<T: DeserializeOwned> Page<T> {
    /// Parse a list response whose items live under `items_key`.
    pub fn from_response(response: &HttpResponse, items_key: &str) -> Result<Self, ApiError> {
        let mut body: serde_json::Value =
            serde_json::from_str(&response.body).map_err(ApiError::Deserialization)?;

        let items = match body.get_mut(items_key).map(serde_json::Value::take) {
            None | Some(serde_json::Value::Null) => Vec::new(),
            Some(items) => serde_json::from_value(items).map_err(ApiError::Deserialization)?,
        };
        let envelope: Envelope = serde_json::from_value(body).map_err(ApiError::Deserialization)?;
        let next = envelope.next.and_then(|link| {
            link.start
                .or_else(|| link.href.as_deref().and_then(start_from_href))
        });

        Ok(Page {
            items,
            next,
            total_count: envelope.total_count,
            limit: envelope.limit,
        })
    }
}

/// Pull the `start` query parameter out of a `next.href` link.
fn start_from_href(href: &str) -> Option<String> {
    let base = url::Url::parse("http://localhost/").ok()?;
    let url = base.join(href).ok()?;
    url.query_pairs()
        .find(|(key, _)| key == "start")
        .map(|(_, value)| value.into_owned())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PagerState {
    /// Another page may be fetched.
    Ready,
    /// The last page has been returned.
    Exhausted,
}

/// Sequential walker over the pages of a list operation.
///
/// Not meant for concurrent use: `get_next` takes `&mut self`.
pub struct Pager<T, F> {
    fetch: F,
    cursor: Option<String>,
    state: PagerState,
    total_count: Option<u64>,
    pages_fetched: usize,
    _item: PhantomData<fn() -> T>,
}

impl<T, F> Pager<T, F>
where
    F: FnMut(Option<&str>) -> Result<Page<T>, ApiError>,
{
    pub fn new(fetch: F) -> Self {
        Self {
            fetch,
            cursor: None,
            state: PagerState::Ready,
            total_count: None,
            pages_fetched: 0,
            _item: PhantomData,
        }
    }

    pub fn has_next(&self) -> bool {
        self.state == PagerState::Ready
    }

    pub fn state(&self) -> PagerState {
        self.state
    }

    /// Latest total-count hint reported by the service, if any.
    pub fn total_count(&self) -> Option<u64> {
        self.total_count
    }

    pub fn pages_fetched(&self) -> usize {
        self.pages_fetched
    }

    /// Fetch the next page and return its items, which may be empty.
    ///
    /// On error the pager is left as it was, so the same page can be retried.
    pub fn get_next(&mut self) -> Result<Vec<T>, ApiError> {
        if self.state == PagerState::Exhausted {
            return Err(ApiError::IllegalState("pager has no more pages"));
        }

        let page = (self.fetch)(self.cursor.as_deref())?;
        self.pages_fetched += 1;
        if page.total_count.is_some() {
            self.total_count = page.total_count;
        }
        match page.next {
            Some(next) => {
                trace!(page = self.pages_fetched, items = page.items.len(), "pager advanced");
                self.cursor = Some(next);
            }
            None => {
                trace!(page = self.pages_fetched, items = page.items.len(), "pager exhausted");
                self.cursor = None;
                self.state = PagerState::Exhausted;
            }
        }
        Ok(page.items)
    }

    /// Fetch every remaining page and concatenate the items.
    pub fn get_all(&mut self) -> Result<Vec<T>, ApiError> {
        let mut all = Vec::new();
        while self.has_next() {
            all.extend(self.get_next()?);
        }
        Ok(all)
    }

    /// Iterate over the remaining pages. Iteration ends after the last page
    /// or after the first error.
    pub fn pages(&mut self) -> Pages<'_, T, F> {
        Pages {
            pager: self,
            failed: false,
        }
    }
}

impl<T, F> std::fmt::Debug for Pager<T, F> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Pager")
            .field("state", &self.state)
            .field("has_cursor", &self.cursor.is_some())
            .field("total_count", &self.total_count)
            .field("pages_fetched", &self.pages_fetched)
            .finish()
    }
}

pub struct Pages<'p, T, F> {
    pager: &'p mut Pager<T, F>,
    failed: bool,
}

impl<T, F> Iterator for Pages<'_, T, F>
where
    F: FnMut(Option<&str>) -> Result<Page<T>, ApiError>,
{
    type Item = Result<Vec<T>, ApiError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed || !self.pager.has_next() {
            return None;
        }
        let page = self.pager.get_next();
        self.failed = page.is_err();
        Some(page)
    }
}
