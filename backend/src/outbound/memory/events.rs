use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::sync::Mutex;

use async_trait::async_trait;
use pagination::Direction;

use super::lock;
use crate::domain::ports::{EventRepository, EventRepositoryError};
use crate::domain::{
    Event, EventId, EventPage, EventPageQuery, EventSort, EventSortField, NewEvent,
};

#[derive(Debug, Default)]
struct EventTable {
    last_id: i64,
    rows: BTreeMap<EventId, Event>,
}

/// Event repository holding rows in memory.
#[derive(Debug, Default)]
pub struct InMemoryEventRepository {
    table: Mutex<EventTable>,
}

impl InMemoryEventRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

fn compare_field(left: &Event, right: &Event, field: EventSortField) -> Ordering {
    let (l, r) = (left.details(), right.details());
    match field {
        EventSortField::Id => left.id().cmp(&right.id()),
        EventSortField::Name => l.name.cmp(&r.name),
        EventSortField::BeginEnrollmentDateTime => {
            l.begin_enrollment_date_time.cmp(&r.begin_enrollment_date_time)
        }
        EventSortField::CloseEnrollmentDateTime => {
            l.close_enrollment_date_time.cmp(&r.close_enrollment_date_time)
        }
        EventSortField::BeginEventDateTime => {
            l.begin_event_date_time.cmp(&r.begin_event_date_time)
        }
        EventSortField::EndEventDateTime => l.end_event_date_time.cmp(&r.end_event_date_time),
        EventSortField::BasePrice => l.base_price.cmp(&r.base_price),
        EventSortField::MaxPrice => l.max_price.cmp(&r.max_price),
        EventSortField::LimitOfEnrollment => l.limit_of_enrollment.cmp(&r.limit_of_enrollment),
        EventSortField::EventStatus => left.status().as_str().cmp(right.status().as_str()),
    }
}

fn compare(left: &Event, right: &Event, sort: &[EventSort]) -> Ordering {
    sort.iter()
        .map(|order| {
            let ordering = compare_field(left, right, order.field);
            match order.direction {
                Direction::Asc => ordering,
                Direction::Desc => ordering.reverse(),
            }
        })
        .find(|ordering| ordering.is_ne())
        .unwrap_or(Ordering::Equal)
}

#[async_trait]
impl EventRepository for InMemoryEventRepository {
    async fn insert(&self, event: &NewEvent) -> Result<Event, EventRepositoryError> {
        let mut table = lock(&self.table, EventRepositoryError::query)?;
        table.last_id += 1;
        let stored = Event::from_new(EventId::new(table.last_id), event.clone());
        table.rows.insert(stored.id(), stored.clone());
        Ok(stored)
    }

    async fn find_by_id(&self, id: EventId) -> Result<Option<Event>, EventRepositoryError> {
        let table = lock(&self.table, EventRepositoryError::query)?;
        Ok(table.rows.get(&id).cloned())
    }

    async fn update(&self, event: &Event) -> Result<bool, EventRepositoryError> {
        let mut table = lock(&self.table, EventRepositoryError::query)?;
        match table.rows.get_mut(&event.id()) {
            Some(row) => {
                *row = event.clone();
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn list(&self, query: &EventPageQuery) -> Result<EventPage, EventRepositoryError> {
        let table = lock(&self.table, EventRepositoryError::query)?;
        let mut events: Vec<Event> = table.rows.values().cloned().collect();
        drop(table);

        events.sort_by(|left, right| compare(left, right, &query.sort));
        let total = events.len() as u64;
        let offset = usize::try_from(query.offset).unwrap_or(usize::MAX);
        let events = events
            .into_iter()
            .skip(offset)
            .take(query.limit as usize)
            .collect();
        Ok(EventPage { events, total })
    }
}
