//! HTTP server configuration object and helpers.

use std::net::SocketAddr;

use events_api::domain::TokenSettings;
use events_api::outbound::persistence::DbPool;
use url::Url;

#[cfg(feature = "metrics")]
use actix_web_prom::PrometheusMetrics;

use super::settings::SeedAccount;

/// Builder-style configuration for creating the HTTP server.
pub struct ServerConfig {
    pub(crate) bind_addr: SocketAddr,
    pub(crate) tokens: TokenSettings,
    pub(crate) db_pool: Option<DbPool>,
    pub(crate) public_base_url: Option<Url>,
    pub(crate) seed_accounts: Vec<SeedAccount>,
    #[cfg(feature = "metrics")]
    pub(crate) prometheus: Option<PrometheusMetrics>,
}

impl ServerConfig {
    /// Construct a configuration backed by the in-memory adapters.
    #[must_use]
    pub fn new(bind_addr: SocketAddr, tokens: TokenSettings) -> Self {
        Self {
            bind_addr,
            tokens,
            db_pool: None,
            public_base_url: None,
            seed_accounts: Vec::new(),
            #[cfg(feature = "metrics")]
            prometheus: None,
        }
    }

    /// Attach a database connection pool.
    ///
    /// When provided, accounts, events and tokens are stored in PostgreSQL
    /// instead of process memory.
    #[must_use]
    pub fn with_db_pool(mut self, pool: DbPool) -> Self {
        self.db_pool = Some(pool);
        self
    }

    /// Origin used for hypermedia links.
    #[must_use]
    pub fn with_public_base_url(mut self, base: Option<Url>) -> Self {
        self.public_base_url = base;
        self
    }

    /// Accounts ensured at startup.
    #[must_use]
    pub fn with_seed_accounts(mut self, accounts: impl IntoIterator<Item = SeedAccount>) -> Self {
        self.seed_accounts = accounts.into_iter().collect();
        self
    }

    #[cfg(feature = "metrics")]
    /// Attach Prometheus middleware to the configuration.
    #[must_use]
    pub fn with_metrics(mut self, prometheus: Option<PrometheusMetrics>) -> Self {
        self.prometheus = prometheus;
        self
    }
}
