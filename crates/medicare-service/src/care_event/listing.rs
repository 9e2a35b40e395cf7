//! ## Summary
//! Lazy, restartable listing of a patient's events.
//!
//! Rows are fetched in keyset-paginated pages on demand. A page borrows a
//! pooled connection only while it loads, so a slow consumer never pins a
//! connection.

use chrono::{DateTime, Utc};
use futures::stream::{self, Stream, StreamExt, TryStreamExt};
use medicare_core::event::CareEvent;
use medicare_core::types::EventOrder;
use medicare_db::db::DbProvider;
use medicare_db::db::query::care_event::{self, Cursor, EventFilter};
use medicare_db::model::care_event::CareEventRow;

use crate::error::{ServiceError, ServiceResult};

pub const DEFAULT_PAGE_SIZE: u16 = 100;

/// Parameters of a patient listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventQuery {
    pub patient_id: uuid::Uuid,
    pub order: EventOrder,
    pub kind: Option<String>,
    pub occurred_after: Option<DateTime<Utc>>,
    pub occurred_before: Option<DateTime<Utc>>,
    /// Never zero; set through `with_page_size`.
    page_size: u16,
}

impl EventQuery {
    #[must_use]
    pub fn new(patient_id: uuid::Uuid, order: EventOrder) -> Self {
        Self {
            patient_id,
            order,
            kind: None,
            occurred_after: None,
            occurred_before: None,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }

    #[must_use]
    pub fn with_kind(mut self, kind: impl Into<String>) -> Self {
        self.kind = Some(kind.into());
        self
    }

    #[must_use]
    pub const fn with_page_size(mut self, page_size: u16) -> Self {
        self.page_size = if page_size == 0 { 1 } else { page_size };
        self
    }

    #[must_use]
    pub const fn occurred_between(
        mut self,
        after: Option<DateTime<Utc>>,
        before: Option<DateTime<Utc>>,
    ) -> Self {
        self.occurred_after = after;
        self.occurred_before = before;
        self
    }

    fn filter(&self) -> EventFilter {
        EventFilter {
            patient_id: self.patient_id,
            kind: self.kind.clone(),
            occurred_after: self.occurred_after,
            occurred_before: self.occurred_before,
        }
    }
}

#[derive(Debug, Clone, Copy)]
enum Page {
    First,
    After(Cursor),
    Done,
}

/// A finite, ordered sequence of a patient's events.
///
/// Nothing is fetched until [`stream`](Self::stream) is polled, and each call
/// to `stream` starts over from the first row.
pub struct EventListing<'a> {
    provider: &'a dyn DbProvider,
    filter: EventFilter,
    order: EventOrder,
    page_size: u16,
}

impl<'a> EventListing<'a> {
    #[must_use]
    pub fn new(provider: &'a dyn DbProvider, query: &EventQuery) -> Self {
        Self {
            provider,
            filter: query.filter(),
            order: query.order,
            page_size: query.page_size,
        }
    }

    #[must_use]
    pub const fn order(&self) -> EventOrder {
        self.order
    }

    /// ## Summary
    /// Streams whole pages in listing order.
    pub fn pages(&self) -> impl Stream<Item = ServiceResult<Vec<CareEvent>>> + Send + '_ {
        stream::try_unfold(Page::First, move |page| async move {
            let after = match page {
                Page::First => None,
                Page::After(cursor) => Some(cursor),
                Page::Done => return Ok(None),
            };

            let mut conn = self.provider.get_connection().await?;
            let rows = care_event::list_page(
                &mut conn,
                &self.filter,
                self.order,
                after,
                i64::from(self.page_size),
            )
            .await?;
            drop(conn);

            if rows.is_empty() {
                return Ok(None);
            }

            let next = match rows.last() {
                Some(last) if rows.len() == usize::from(self.page_size) => {
                    Page::After(Cursor::after(last, self.order.by))
                }
                _ => Page::Done,
            };
            tracing::trace!(rows = rows.len(), "Fetched event page");

            let events = rows
                .into_iter()
                .map(CareEventRow::into_event)
                .collect::<Result<Vec<_>, _>>()?;
            Ok::<_, ServiceError>(Some((events, next)))
        })
    }

    /// ## Summary
    /// Streams events one by one in listing order.
    pub fn stream(&self) -> impl Stream<Item = ServiceResult<CareEvent>> + Send + '_ {
        self.pages()
            .map_ok(|page| stream::iter(page.into_iter().map(Ok)))
            .try_flatten()
    }

    /// ## Summary
    /// Collects the whole listing.
    ///
    /// ## Errors
    /// Returns the first error raised while fetching or decoding a page.
    pub async fn collect_all(&self) -> ServiceResult<Vec<CareEvent>> {
        self.stream().try_collect().await
    }

    /// ## Summary
    /// Collects at most `limit` events, fetching only the pages needed.
    ///
    /// ## Errors
    /// Returns the first error raised while fetching or decoding a page.
    pub async fn take(&self, limit: usize) -> ServiceResult<Vec<CareEvent>> {
        self.stream().take(limit).try_collect().await
    }
}
