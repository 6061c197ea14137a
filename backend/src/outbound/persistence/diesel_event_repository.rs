//! PostgreSQL-backed `EventRepository` implementation using Diesel ORM.

use async_trait::async_trait;
use chrono::Utc;
use diesel::pg::Pg;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use pagination::Direction;

use crate::domain::ports::{EventRepository, EventRepositoryError};
use crate::domain::{
    AccountId, Event, EventDetails, EventId, EventPage, EventPageQuery, EventSort,
    EventSortField, EventStatus, NewEvent,
};

use super::diesel_basic_error_mapping::{map_basic_diesel_error, map_basic_pool_error};
use super::models::{EventRow, EventUpdate, NewEventRow};
use super::pool::{DbPool, PoolError};
use super::schema::events;

/// Diesel-backed implementation of the event repository port.
#[derive(Clone)]
pub struct DieselEventRepository {
    pool: DbPool,
}

impl DieselEventRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> EventRepositoryError {
    map_basic_pool_error(error, EventRepositoryError::connection)
}

fn map_diesel_error(error: diesel::result::Error) -> EventRepositoryError {
    map_basic_diesel_error(
        error,
        EventRepositoryError::query,
        EventRepositoryError::connection,
    )
}

fn row_to_event(row: EventRow) -> Result<Event, EventRepositoryError> {
    let EventRow {
        id,
        name,
        description,
        begin_enrollment_date_time,
        close_enrollment_date_time,
        begin_event_date_time,
        end_event_date_time,
        location,
        base_price,
        max_price,
        limit_of_enrollment,
        event_status,
        manager_id,
    } = row;

    let status = event_status
        .parse::<EventStatus>()
        .map_err(|err| EventRepositoryError::query(err.to_string()))?;

    let details = EventDetails {
        name,
        description,
        begin_enrollment_date_time,
        close_enrollment_date_time,
        begin_event_date_time,
        end_event_date_time,
        location,
        base_price,
        max_price,
        limit_of_enrollment,
    };
    Ok(Event::new(
        EventId::new(id),
        details,
        status,
        manager_id.map(AccountId::new),
    ))
}

macro_rules! order_by {
    ($query:expr, $column:expr, $direction:expr) => {
        match $direction {
            Direction::Asc => $query.then_order_by($column.asc()),
            Direction::Desc => $query.then_order_by($column.desc()),
        }
    };
}

fn apply_sort(
    query: events::BoxedQuery<'static, Pg>,
    sort: EventSort,
) -> events::BoxedQuery<'static, Pg> {
    let direction = sort.direction;
    match sort.field {
        EventSortField::Id => order_by!(query, events::id, direction),
        EventSortField::Name => order_by!(query, events::name, direction),
        EventSortField::BeginEnrollmentDateTime => {
            order_by!(query, events::begin_enrollment_date_time, direction)
        }
        EventSortField::CloseEnrollmentDateTime => {
            order_by!(query, events::close_enrollment_date_time, direction)
        }
        EventSortField::BeginEventDateTime => {
            order_by!(query, events::begin_event_date_time, direction)
        }
        EventSortField::EndEventDateTime => {
            order_by!(query, events::end_event_date_time, direction)
        }
        EventSortField::BasePrice => order_by!(query, events::base_price, direction),
        EventSortField::MaxPrice => order_by!(query, events::max_price, direction),
        EventSortField::LimitOfEnrollment => {
            order_by!(query, events::limit_of_enrollment, direction)
        }
        EventSortField::EventStatus => order_by!(query, events::event_status, direction),
    }
}

#[async_trait]
impl EventRepository for DieselEventRepository {
    async fn insert(&self, event: &NewEvent) -> Result<Event, EventRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let details = event.details();

        let new_row = NewEventRow {
            name: details.name.as_str(),
            description: details.description.as_str(),
            begin_enrollment_date_time: details.begin_enrollment_date_time,
            close_enrollment_date_time: details.close_enrollment_date_time,
            begin_event_date_time: details.begin_event_date_time,
            end_event_date_time: details.end_event_date_time,
            location: details.location.as_deref(),
            base_price: details.base_price,
            max_price: details.max_price,
            limit_of_enrollment: details.limit_of_enrollment,
            event_status: event.status().as_str(),
            manager_id: event.manager().map(AccountId::get),
        };

        let row = diesel::insert_into(events::table)
            .values(&new_row)
            .returning(EventRow::as_returning())
            .get_result::<EventRow>(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        row_to_event(row)
    }

    async fn find_by_id(&self, id: EventId) -> Result<Option<Event>, EventRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let row = events::table
            .find(id.get())
            .select(EventRow::as_select())
            .first::<EventRow>(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;

        row.map(row_to_event).transpose()
    }

    async fn update(&self, event: &Event) -> Result<bool, EventRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let details = event.details();

        let changes = EventUpdate {
            name: details.name.as_str(),
            description: details.description.as_str(),
            begin_enrollment_date_time: details.begin_enrollment_date_time,
            close_enrollment_date_time: details.close_enrollment_date_time,
            begin_event_date_time: details.begin_event_date_time,
            end_event_date_time: details.end_event_date_time,
            location: details.location.as_deref(),
            base_price: details.base_price,
            max_price: details.max_price,
            limit_of_enrollment: details.limit_of_enrollment,
            updated_at: Utc::now(),
        };

        let affected = diesel::update(events::table.find(event.id().get()))
            .set(&changes)
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        Ok(affected > 0)
    }

    async fn list(&self, query: &EventPageQuery) -> Result<EventPage, EventRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let total: i64 = events::table
            .count()
            .get_result(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        let ordered = query
            .sort
            .iter()
            .copied()
            .fold(events::table.into_boxed(), apply_sort);

        let rows: Vec<EventRow> = ordered
            .offset(i64::try_from(query.offset).unwrap_or(i64::MAX))
            .limit(i64::from(query.limit))
            .select(EventRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        let events = rows
            .into_iter()
            .map(row_to_event)
            .collect::<Result<Vec<_>, _>>()?;

        Ok(EventPage {
            events,
            total: u64::try_from(total).unwrap_or_default(),
        })
    }
}
