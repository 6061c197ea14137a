//! Test helpers for inbound HTTP components.
//!
//! [`memory_state`] wires the real services over in-memory adapters and seeds
//! two accounts, so handler tests exercise the same code paths as the
//! server without a database.

use std::sync::Arc;

use argon2::Params;
use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use chrono::{TimeDelta, TimeZone, Utc};
use serde_json::{Value, json};

use crate::domain::ports::{AccountDirectory, RegisterAccountRequest};
use crate::domain::{
    Account, AccountRole, AccountService, ClientCredentials, Email, EventCommandService,
    EventQueryService, LoginCredentials, TokenGrant, TokenRequest, TokenService, TokenSettings,
};
use crate::outbound::memory::{
    InMemoryAccountRepository, InMemoryEventRepository, InMemoryTokenStore,
};
use crate::outbound::security::Argon2PasswordHasher;
use crate::test_support::MutableClock;

use super::state::{HttpState, HttpStatePorts};

pub const TEST_CLIENT_ID: &str = "myApp";
pub const TEST_CLIENT_SECRET: &str = "pass";
pub const MANAGER_USERNAME: &str = "admin@email.com";
pub const MANAGER_PASSWORD: &str = "admin";
pub const USER_USERNAME: &str = "user@email.com";
pub const USER_PASSWORD: &str = "user";
pub const ACCESS_TTL_SECS: i64 = 600;
pub const REFRESH_TTL_SECS: i64 = 3600;

/// Handler state over in-memory adapters plus the seeded accounts.
pub struct MemoryApi {
    pub state: HttpState,
    /// Backing event store, for seeding rows the HTTP surface cannot create.
    pub events: Arc<InMemoryEventRepository>,
    pub clock: Arc<MutableClock>,
    pub manager: Account,
    pub user: Account,
}

impl MemoryApi {
    /// Access token for `username` obtained through the password grant.
    pub async fn access_token(&self, username: &str, password: &str) -> String {
        let credentials =
            LoginCredentials::try_from_parts(username, password).expect("credentials are valid");
        self.state
            .tokens
            .issue(TokenRequest {
                client: test_client(),
                grant: TokenGrant::Password(credentials),
            })
            .await
            .expect("password grant succeeds")
            .access_token
    }

    pub async fn manager_token(&self) -> String {
        self.access_token(MANAGER_USERNAME, MANAGER_PASSWORD).await
    }

    pub async fn user_token(&self) -> String {
        self.access_token(USER_USERNAME, USER_PASSWORD).await
    }
}

pub fn test_client() -> ClientCredentials {
    ClientCredentials::try_from_parts(TEST_CLIENT_ID, TEST_CLIENT_SECRET)
        .expect("client credentials are valid")
}

/// Argon2 with minimum costs; production parameters make tests crawl.
pub fn cheap_hasher() -> Argon2PasswordHasher {
    Argon2PasswordHasher::with_cost(Params::MIN_M_COST, 1).expect("minimum costs are valid")
}

/// Build [`HttpState`] over fresh in-memory stores.
pub async fn memory_state() -> MemoryApi {
    let clock = Arc::new(MutableClock::new(
        Utc.with_ymd_and_hms(2018, 11, 20, 9, 0, 0)
            .single()
            .expect("valid instant"),
    ));
    let accounts = Arc::new(AccountService::new(
        Arc::new(InMemoryAccountRepository::new()),
        Arc::new(cheap_hasher()),
    ));
    let manager = seed(accounts.as_ref(), MANAGER_USERNAME, MANAGER_PASSWORD, &[
        AccountRole::Admin,
        AccountRole::User,
    ])
    .await;
    let user = seed(accounts.as_ref(), USER_USERNAME, USER_PASSWORD, &[AccountRole::User]).await;

    let tokens = Arc::new(TokenService::new(
        accounts,
        Arc::new(InMemoryTokenStore::new()),
        clock.clone(),
        TokenSettings {
            client: test_client(),
            access_ttl: TimeDelta::seconds(ACCESS_TTL_SECS),
            refresh_ttl: TimeDelta::seconds(REFRESH_TTL_SECS),
        },
    ));
    let events = Arc::new(InMemoryEventRepository::new());
    let state = HttpState::new(HttpStatePorts {
        events: Arc::new(EventCommandService::new(events.clone())),
        events_query: Arc::new(EventQueryService::new(events.clone())),
        tokens: tokens.clone(),
        principals: tokens,
    });

    MemoryApi {
        state,
        events,
        clock,
        manager,
        user,
    }
}

async fn seed<D: AccountDirectory>(
    accounts: &D,
    username: &str,
    password: &str,
    roles: &[AccountRole],
) -> Account {
    let email = Email::new(username).expect("seed e-mail is valid");
    accounts
        .ensure_account(RegisterAccountRequest::new(
            email,
            password,
            roles.iter().copied(),
        ))
        .await
        .expect("seed account is stored")
}

/// `Authorization` value for HTTP Basic client authentication.
pub fn basic_auth(client_id: &str, secret: &str) -> String {
    format!("Basic {}", STANDARD.encode(format!("{client_id}:{secret}")))
}

pub fn bearer(token: &str) -> String {
    format!("Bearer {token}")
}

/// A payload that passes validation: paid, offline, consistent dates.
pub fn valid_event_payload() -> Value {
    json!({
        "name": "Spring",
        "description": "REST API Development with Spring",
        "beginEnrollmentDateTime": "2018-11-23T14:21",
        "closeEnrollmentDateTime": "2018-11-24T14:21",
        "beginEventDateTime": "2018-11-25T14:21",
        "endEventDateTime": "2018-11-26T14:21",
        "location": "D2 startup factory",
        "basePrice": 100,
        "maxPrice": 200,
        "limitOfEnrollment": 100
    })
}
