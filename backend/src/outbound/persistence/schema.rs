//! Diesel table definitions for the PostgreSQL schema.
//!
//! These definitions must match `backend/migrations` exactly. Regenerate with
//! `diesel print-schema` after changing a migration.

diesel::table! {
    /// Registered accounts. `email` is stored lower-cased and is unique.
    accounts (id) {
        id -> Int8,
        email -> Varchar,
        password_hash -> Text,
        /// Role names (`ADMIN`, `USER`); never empty.
        roles -> Array<Text>,
        created_at -> Timestamptz,
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    /// Event records. Date-time columns carry no offset.
    events (id) {
        id -> Int8,
        name -> Text,
        description -> Text,
        begin_enrollment_date_time -> Timestamp,
        close_enrollment_date_time -> Timestamp,
        begin_event_date_time -> Timestamp,
        end_event_date_time -> Timestamp,
        location -> Nullable<Text>,
        base_price -> Int4,
        max_price -> Int4,
        limit_of_enrollment -> Int4,
        event_status -> Varchar,
        manager_id -> Nullable<Int8>,
        created_at -> Timestamptz,
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    /// Issued bearer and refresh tokens, keyed by SHA-256 digest.
    oauth_tokens (digest, kind) {
        digest -> Varchar,
        kind -> Varchar,
        account_id -> Int8,
        expires_at -> Timestamptz,
        created_at -> Timestamptz,
    }
}

diesel::joinable!(events -> accounts (manager_id));
diesel::joinable!(oauth_tokens -> accounts (account_id));

diesel::allow_tables_to_appear_in_same_query!(accounts, events, oauth_tokens);
