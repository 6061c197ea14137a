//! Event aggregate, derived flags and listing queries.
//!
//! Incoming payloads arrive as an [`EventDraft`] whose fields are all
//! optional. [`EventDetails::try_from_draft`] runs [`validate_event`] and only
//! yields details once every required value is present and consistent.
//! `free` and `offline` are never accepted from clients; they are recomputed
//! from the details every time an event is created or updated.

mod sort;
mod validation;

use std::fmt;
use std::str::FromStr;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use super::AccountId;

pub use sort::{EventPage, EventPageQuery, EventSort, EventSortField};
pub use validation::{EVENT_OBJECT_NAME, Violation, validate_event};

/// Store-assigned event identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EventId(i64);

impl EventId {
    #[must_use]
    pub const fn new(value: i64) -> Self {
        Self(value)
    }

    #[must_use]
    pub const fn get(self) -> i64 {
        self.0
    }
}

impl fmt::Display for EventId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Publication state. Events are created as drafts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EventStatus {
    #[default]
    Draft,
    Published,
}

impl EventStatus {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Draft => "DRAFT",
            Self::Published => "PUBLISHED",
        }
    }
}

impl fmt::Display for EventStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Raised when a stored status string is not recognised.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown event status `{0}`")]
pub struct UnknownEventStatus(pub String);

impl FromStr for EventStatus {
    type Err = UnknownEventStatus;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "DRAFT" => Ok(Self::Draft),
            "PUBLISHED" => Ok(Self::Published),
            other => Err(UnknownEventStatus(other.to_owned())),
        }
    }
}

/// Unvalidated event payload.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EventDraft {
    pub name: Option<String>,
    pub description: Option<String>,
    pub begin_enrollment_date_time: Option<NaiveDateTime>,
    pub close_enrollment_date_time: Option<NaiveDateTime>,
    pub begin_event_date_time: Option<NaiveDateTime>,
    pub end_event_date_time: Option<NaiveDateTime>,
    pub location: Option<String>,
    pub base_price: Option<i32>,
    pub max_price: Option<i32>,
    pub limit_of_enrollment: Option<i32>,
}

/// Validated, client-editable event fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventDetails {
    pub name: String,
    pub description: String,
    pub begin_enrollment_date_time: NaiveDateTime,
    pub close_enrollment_date_time: NaiveDateTime,
    pub begin_event_date_time: NaiveDateTime,
    pub end_event_date_time: NaiveDateTime,
    pub location: Option<String>,
    pub base_price: i32,
    pub max_price: i32,
    pub limit_of_enrollment: i32,
}

impl EventDetails {
    /// Validate a draft.
    ///
    /// # Errors
    /// Returns every [`Violation`] found when the draft is not acceptable.
    pub fn try_from_draft(draft: EventDraft) -> Result<Self, Vec<Violation>> {
        let violations = validate_event(&draft);
        if !violations.is_empty() {
            return Err(violations);
        }

        let EventDraft {
            name: Some(name),
            description: Some(description),
            begin_enrollment_date_time: Some(begin_enrollment_date_time),
            close_enrollment_date_time: Some(close_enrollment_date_time),
            begin_event_date_time: Some(begin_event_date_time),
            end_event_date_time: Some(end_event_date_time),
            location,
            base_price: Some(base_price),
            max_price: Some(max_price),
            limit_of_enrollment: Some(limit_of_enrollment),
        } = draft
        else {
            return Err(validate_event(&EventDraft::default()));
        };

        Ok(Self {
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
        })
    }

    /// Both prices are zero.
    #[must_use]
    pub fn is_free(&self) -> bool {
        self.base_price == 0 && self.max_price == 0
    }

    /// A non-blank location is set.
    #[must_use]
    pub fn is_offline(&self) -> bool {
        self.location
            .as_deref()
            .is_some_and(|location| !location.trim().is_empty())
    }
}

/// Event awaiting insertion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewEvent {
    details: EventDetails,
    status: EventStatus,
    manager: Option<AccountId>,
}

impl NewEvent {
    /// New draft event managed by `manager`.
    pub fn new(details: EventDetails, manager: Option<AccountId>) -> Self {
        Self {
            details,
            status: EventStatus::Draft,
            manager,
        }
    }

    pub fn details(&self) -> &EventDetails {
        &self.details
    }

    pub fn status(&self) -> EventStatus {
        self.status
    }

    pub fn manager(&self) -> Option<AccountId> {
        self.manager
    }

    pub fn is_free(&self) -> bool {
        self.details.is_free()
    }

    pub fn is_offline(&self) -> bool {
        self.details.is_offline()
    }
}

/// Persisted event.
///
/// # Examples
/// ```
/// use chrono::NaiveDate;
/// use events_api::domain::{Event, EventDetails, EventId, NewEvent};
///
/// let at = NaiveDate::from_ymd_opt(2024, 11, 23)
///     .and_then(|d| d.and_hms_opt(14, 21, 0))
///     .expect("valid timestamp");
/// let details = EventDetails {
///     name: "Spring".into(),
///     description: "REST API development with Spring".into(),
///     begin_enrollment_date_time: at,
///     close_enrollment_date_time: at,
///     begin_event_date_time: at,
///     end_event_date_time: at,
///     location: None,
///     base_price: 0,
///     max_price: 0,
///     limit_of_enrollment: 100,
/// };
/// let event = Event::from_new(EventId::new(1), NewEvent::new(details, None));
/// assert!(event.is_free());
/// assert!(!event.is_offline());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Event {
    id: EventId,
    details: EventDetails,
    status: EventStatus,
    manager: Option<AccountId>,
}

impl Event {
    /// Reassemble a stored event.
    pub fn new(
        id: EventId,
        details: EventDetails,
        status: EventStatus,
        manager: Option<AccountId>,
    ) -> Self {
        Self {
            id,
            details,
            status,
            manager,
        }
    }

    /// Attach the store-assigned identifier to a new event.
    pub fn from_new(id: EventId, event: NewEvent) -> Self {
        let NewEvent {
            details,
            status,
            manager,
        } = event;
        Self::new(id, details, status, manager)
    }

    pub fn id(&self) -> EventId {
        self.id
    }

    pub fn details(&self) -> &EventDetails {
        &self.details
    }

    pub fn status(&self) -> EventStatus {
        self.status
    }

    pub fn manager(&self) -> Option<AccountId> {
        self.manager
    }

    pub fn is_free(&self) -> bool {
        self.details.is_free()
    }

    pub fn is_offline(&self) -> bool {
        self.details.is_offline()
    }

    /// Whether `account` may modify this event. Events without a manager are
    /// open to every account.
    pub fn is_managed_by(&self, account: AccountId) -> bool {
        self.manager.is_none_or(|manager| manager == account)
    }

    /// Replace every client-editable field. Status and manager are kept.
    #[must_use]
    pub fn with_details(self, details: EventDetails) -> Self {
        Self { details, ..self }
    }
}
