//! PostgreSQL persistence adapters using Diesel ORM.
//!
//! Repositories translate between Diesel rows and domain types and nothing
//! else. Row structs (`models`) and table definitions (`schema`) stay private
//! to this module. Connections come from a `bb8` pool driven by
//! `diesel-async`. Every database failure is mapped onto the owning port's
//! error type before it leaves the adapter.
//!
//! ```ignore
//! use events_api::outbound::persistence::{DbPool, DieselEventRepository, PoolConfig};
//!
//! let pool = DbPool::new(PoolConfig::new("postgres://localhost/events")).await?;
//! let events = DieselEventRepository::new(pool);
//! ```

mod diesel_account_repository;
mod diesel_basic_error_mapping;
mod diesel_event_repository;
mod diesel_token_store;
mod migrations;
mod models;
mod pool;
mod schema;

pub use diesel_account_repository::DieselAccountRepository;
pub use diesel_event_repository::DieselEventRepository;
pub use diesel_token_store::DieselTokenStore;
pub use migrations::{MIGRATIONS, MigrationError, migrate, run_pending_migrations};
pub use pool::{DbPool, PoolConfig, PoolError};
