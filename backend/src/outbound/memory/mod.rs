//! In-process adapters used when no database URL is configured.
//!
//! Each adapter keeps its rows behind a `std::sync::Mutex`. Locks are never
//! held across an `.await`. A poisoned lock surfaces as a `Query` error.

mod accounts;
mod events;
mod tokens;

pub use accounts::InMemoryAccountRepository;
pub use events::InMemoryEventRepository;
pub use tokens::InMemoryTokenStore;

use std::sync::{Mutex, MutexGuard};

fn lock<'a, T, E>(
    mutex: &'a Mutex<T>,
    on_poison: impl FnOnce(String) -> E,
) -> Result<MutexGuard<'a, T>, E> {
    mutex
        .lock()
        .map_err(|err| on_poison(format!("in-memory store lock poisoned: {err}")))
}
