//! Builders wiring domain services over the configured adapters.
//!
//! With a database pool the Diesel adapters back every port; without one the
//! in-memory stores are used. Either way the seed accounts are ensured before
//! the state is handed to the HTTP layer.

use std::sync::Arc;

use mockable::DefaultClock;
use tracing::info;

use events_api::domain::ports::{
    AccountDirectory, AccountRepository, EventRepository, PasswordHasher, RegisterAccountRequest,
    TokenStore,
};
use events_api::domain::{
    AccountService, Email, Error, EventCommandService, EventQueryService, TokenService,
    TokenSettings,
};
use events_api::inbound::http::state::{HttpState, HttpStatePorts};
use events_api::outbound::memory::{
    InMemoryAccountRepository, InMemoryEventRepository, InMemoryTokenStore,
};
use events_api::outbound::persistence::{
    DieselAccountRepository, DieselEventRepository, DieselTokenStore,
};
use events_api::outbound::security::Argon2PasswordHasher;

use super::ServerConfig;
use super::settings::SeedAccount;

/// Adapters backing the driven ports.
struct Adapters<A, E, T> {
    accounts: Arc<A>,
    events: Arc<E>,
    tokens: Arc<T>,
}

/// Build [`HttpState`] for `config`, seeding the configured accounts.
///
/// # Errors
/// Returns the domain [`Error`] raised while seeding an account.
pub(crate) async fn build_http_state(config: &ServerConfig) -> Result<HttpState, Error> {
    let hasher = Arc::new(Argon2PasswordHasher::new());
    let state = match &config.db_pool {
        Some(pool) => {
            info!(backend = "postgres", "wiring persistence adapters");
            wire(
                Adapters {
                    accounts: Arc::new(DieselAccountRepository::new(pool.clone())),
                    events: Arc::new(DieselEventRepository::new(pool.clone())),
                    tokens: Arc::new(DieselTokenStore::new(pool.clone())),
                },
                hasher,
                config.tokens.clone(),
                &config.seed_accounts,
            )
            .await?
        }
        None => {
            info!(backend = "memory", "wiring persistence adapters");
            wire(
                Adapters {
                    accounts: Arc::new(InMemoryAccountRepository::new()),
                    events: Arc::new(InMemoryEventRepository::new()),
                    tokens: Arc::new(InMemoryTokenStore::new()),
                },
                hasher,
                config.tokens.clone(),
                &config.seed_accounts,
            )
            .await?
        }
    };
    Ok(state.with_public_base_url(config.public_base_url.clone()))
}

async fn wire<A, E, T, H>(
    adapters: Adapters<A, E, T>,
    hasher: Arc<H>,
    settings: TokenSettings,
    seeds: &[SeedAccount],
) -> Result<HttpState, Error>
where
    A: AccountRepository + 'static,
    E: EventRepository + 'static,
    T: TokenStore + 'static,
    H: PasswordHasher + 'static,
{
    let Adapters {
        accounts,
        events,
        tokens,
    } = adapters;
    let directory = Arc::new(AccountService::new(accounts, hasher));
    seed_accounts(directory.as_ref(), seeds).await?;

    let token_service = Arc::new(TokenService::new(
        directory,
        tokens,
        Arc::new(DefaultClock),
        settings,
    ));
    Ok(HttpState::new(HttpStatePorts {
        events: Arc::new(EventCommandService::new(events.clone())),
        events_query: Arc::new(EventQueryService::new(events)),
        tokens: token_service.clone(),
        principals: token_service,
    }))
}

/// Create each seed account unless one with the same username exists.
async fn seed_accounts<D>(directory: &D, seeds: &[SeedAccount]) -> Result<(), Error>
where
    D: AccountDirectory + ?Sized,
{
    for seed in seeds {
        let email = Email::new(&seed.username).map_err(|err| {
            Error::invalid_request(format!("seed account {:?}: {err}", seed.username))
        })?;
        let account = directory
            .ensure_account(RegisterAccountRequest::new(
                email,
                seed.password.as_str(),
                seed.roles.iter().copied(),
            ))
            .await?;
        info!(account_id = %account.id(), email = %account.email(), "seed account ready");
    }
    Ok(())
}
