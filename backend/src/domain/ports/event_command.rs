//! Driving port for event mutations.
//!
//! Inbound adapters validate payloads into [`EventDetails`] first, so the
//! command side only deals with ownership and persistence.

use async_trait::async_trait;

use crate::domain::{AccountId, Error, Event, EventDetails, EventId};

/// Request to create an event managed by `manager`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateEventRequest {
    pub details: EventDetails,
    pub manager: AccountId,
}

/// Request to replace every editable field of event `id`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdateEventRequest {
    pub id: EventId,
    pub details: EventDetails,
    /// Account performing the update.
    pub caller: AccountId,
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait EventCommand: Send + Sync {
    /// Create a draft event.
    async fn create_event(&self, request: CreateEventRequest) -> Result<Event, Error>;

    /// Update an existing event.
    ///
    /// Fails with `not_found` for unknown ids and `forbidden` when the caller
    /// does not manage the event.
    async fn update_event(&self, request: UpdateEventRequest) -> Result<Event, Error>;
}
