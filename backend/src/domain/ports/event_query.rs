//! Driving port for event reads.

use async_trait::async_trait;

use crate::domain::{Error, Event, EventId, EventPage, EventPageQuery};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait EventQuery: Send + Sync {
    /// Fetch one event; `not_found` when absent.
    async fn get_event(&self, id: EventId) -> Result<Event, Error>;

    /// Read one page of events.
    async fn list_events(&self, query: EventPageQuery) -> Result<EventPage, Error>;
}
