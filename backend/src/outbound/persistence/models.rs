//! Internal Diesel row structs for database operations.
//!
//! These types never leave the persistence layer. Conversions into domain
//! types live next to the repositories that load them.

use chrono::{DateTime, NaiveDateTime, Utc};
use diesel::prelude::*;

use super::schema::{accounts, events, oauth_tokens};

// ---------------------------------------------------------------------------
// Account models
// ---------------------------------------------------------------------------

/// Row struct for reading from the accounts table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = accounts)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct AccountRow {
    pub id: i64,
    pub email: String,
    pub password_hash: String,
    pub roles: Vec<String>,
}

/// Insertable struct for creating account records.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = accounts)]
pub(crate) struct NewAccountRow<'a> {
    pub email: &'a str,
    pub password_hash: &'a str,
    pub roles: Vec<String>,
}

// ---------------------------------------------------------------------------
// Event models
// ---------------------------------------------------------------------------

/// Row struct for reading from the events table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = events)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct EventRow {
    pub id: i64,
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
    pub event_status: String,
    pub manager_id: Option<i64>,
}

/// Insertable struct for creating event records.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = events)]
pub(crate) struct NewEventRow<'a> {
    pub name: &'a str,
    pub description: &'a str,
    pub begin_enrollment_date_time: NaiveDateTime,
    pub close_enrollment_date_time: NaiveDateTime,
    pub begin_event_date_time: NaiveDateTime,
    pub end_event_date_time: NaiveDateTime,
    pub location: Option<&'a str>,
    pub base_price: i32,
    pub max_price: i32,
    pub limit_of_enrollment: i32,
    pub event_status: &'a str,
    pub manager_id: Option<i64>,
}

/// Changeset for a full event update. Status and manager are left alone.
#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = events)]
#[diesel(treat_none_as_null = true)]
pub(crate) struct EventUpdate<'a> {
    pub name: &'a str,
    pub description: &'a str,
    pub begin_enrollment_date_time: NaiveDateTime,
    pub close_enrollment_date_time: NaiveDateTime,
    pub begin_event_date_time: NaiveDateTime,
    pub end_event_date_time: NaiveDateTime,
    pub location: Option<&'a str>,
    pub base_price: i32,
    pub max_price: i32,
    pub limit_of_enrollment: i32,
    pub updated_at: DateTime<Utc>,
}

// ---------------------------------------------------------------------------
// OAuth token models
// ---------------------------------------------------------------------------

/// Row struct for reading from the oauth_tokens table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = oauth_tokens)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct OAuthTokenRow {
    pub digest: String,
    pub kind: String,
    pub account_id: i64,
    pub expires_at: DateTime<Utc>,
}

/// Insertable struct for recording an issued token.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = oauth_tokens)]
pub(crate) struct NewOAuthTokenRow<'a> {
    pub digest: &'a str,
    pub kind: &'a str,
    pub account_id: i64,
    pub expires_at: DateTime<Utc>,
}
