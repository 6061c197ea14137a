//! Port for event persistence.

use async_trait::async_trait;

use crate::domain::{Event, EventId, EventPage, EventPageQuery, NewEvent};

use super::define_port_error;

define_port_error! {
    /// Errors raised by event repository adapters.
    pub enum EventRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } => "event repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "event repository query failed: {message}",
    }
}

/// Storage for events.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait EventRepository: Send + Sync {
    /// Insert a new event and return it with its assigned identifier.
    async fn insert(&self, event: &NewEvent) -> Result<Event, EventRepositoryError>;

    /// Fetch an event by identifier.
    async fn find_by_id(&self, id: EventId) -> Result<Option<Event>, EventRepositoryError>;

    /// Overwrite a stored event. Returns `false` when the row no longer exists.
    async fn update(&self, event: &Event) -> Result<bool, EventRepositoryError>;

    /// Read one page of events in the requested order.
    async fn list(&self, query: &EventPageQuery) -> Result<EventPage, EventRepositoryError>;
}
