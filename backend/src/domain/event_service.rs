//! Event domain services.
//!
//! These services implement the event driving ports on top of an
//! [`EventRepository`], enforcing existence and manager ownership.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, info};

use crate::domain::ports::{
    CreateEventRequest, EventCommand, EventQuery, EventRepository, EventRepositoryError,
    UpdateEventRequest,
};
use crate::domain::{Error, Event, EventId, EventPage, EventPageQuery, NewEvent};

fn map_repository_error(error: EventRepositoryError) -> Error {
    match error {
        EventRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("event repository unavailable: {message}"))
        }
        EventRepositoryError::Query { message } => {
            Error::internal(format!("event repository error: {message}"))
        }
    }
}

fn event_not_found(id: EventId) -> Error {
    Error::not_found(format!("event {id} not found"))
}

/// Event service implementing the command driving port.
#[derive(Clone)]
pub struct EventCommandService<R> {
    event_repo: Arc<R>,
}

impl<R> EventCommandService<R> {
    pub fn new(event_repo: Arc<R>) -> Self {
        Self { event_repo }
    }
}

#[async_trait]
impl<R> EventCommand for EventCommandService<R>
where
    R: EventRepository,
{
    async fn create_event(&self, request: CreateEventRequest) -> Result<Event, Error> {
        let CreateEventRequest { details, manager } = request;
        let event = self
            .event_repo
            .insert(&NewEvent::new(details, Some(manager)))
            .await
            .map_err(map_repository_error)?;

        info!(event_id = %event.id(), manager = %manager, "event created");
        Ok(event)
    }

    async fn update_event(&self, request: UpdateEventRequest) -> Result<Event, Error> {
        let UpdateEventRequest {
            id,
            details,
            caller,
        } = request;

        let existing = self
            .event_repo
            .find_by_id(id)
            .await
            .map_err(map_repository_error)?
            .ok_or_else(|| event_not_found(id))?;

        if !existing.is_managed_by(caller) {
            debug!(event_id = %id, caller = %caller, "update rejected for non-manager");
            return Err(Error::forbidden(format!(
                "account {caller} does not manage event {id}"
            )));
        }

        let updated = existing.with_details(details);
        let stored = self
            .event_repo
            .update(&updated)
            .await
            .map_err(map_repository_error)?;
        if !stored {
            return Err(event_not_found(id));
        }

        info!(event_id = %id, "event updated");
        Ok(updated)
    }
}

/// Event service implementing the query driving port.
#[derive(Clone)]
pub struct EventQueryService<R> {
    event_repo: Arc<R>,
}

impl<R> EventQueryService<R> {
    pub fn new(event_repo: Arc<R>) -> Self {
        Self { event_repo }
    }
}

#[async_trait]
impl<R> EventQuery for EventQueryService<R>
where
    R: EventRepository,
{
    async fn get_event(&self, id: EventId) -> Result<Event, Error> {
        self.event_repo
            .find_by_id(id)
            .await
            .map_err(map_repository_error)?
            .ok_or_else(|| event_not_found(id))
    }

    async fn list_events(&self, query: EventPageQuery) -> Result<EventPage, Error> {
        self.event_repo
            .list(&query)
            .await
            .map_err(map_repository_error)
    }
}

#[cfg(test)]
#[path = "event_service_tests.rs"]
mod tests;
