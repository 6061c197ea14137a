//! Embedded PostgreSQL provisioning for the Diesel adapter suites.
//!
//! One shared cluster serves the whole test binary. A template database is
//! migrated once per migration-set hash; each test clones it into a fresh
//! temporary database.

use std::path::PathBuf;
use std::sync::{Mutex, OnceLock};
use std::time::Duration;

use events_api::outbound::persistence::run_pending_migrations;
use pg_embedded_setup_unpriv::test_support::{hash_directory, shared_cluster_handle};
use pg_embedded_setup_unpriv::{ClusterHandle, TemporaryDatabase};
use postgres::{Client, NoTls};
use uuid::Uuid;

use super::format_postgres_error;

static TEMPLATE_LOCK: OnceLock<Mutex<()>> = OnceLock::new();

const TEMPLATE_NAME_PREFIX: &str = "events_template";
const RETRIES: usize = 5;
const RETRY_DELAY: Duration = Duration::from_millis(500);

fn migrations_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("migrations")
}

fn template_database_name() -> Result<String, String> {
    let hash = hash_directory(migrations_dir()).map_err(|err| format!("hash migrations: {err}"))?;
    let short_hash = hash.get(..8).unwrap_or(&hash);
    Ok(format!("{TEMPLATE_NAME_PREFIX}_{short_hash}"))
}

fn retry<T>(mut attempt: impl FnMut() -> Result<T, String>) -> Result<T, String> {
    let mut last_error = String::new();
    for round in 1..=RETRIES {
        match attempt() {
            Ok(value) => return Ok(value),
            Err(error) => last_error = format!("attempt {round}/{RETRIES}: {error}"),
        }
        if round < RETRIES {
            std::thread::sleep(RETRY_DELAY);
        }
    }
    Err(last_error)
}

/// The process-wide cluster, started on first use.
fn shared_cluster() -> Result<&'static ClusterHandle, String> {
    retry(|| shared_cluster_handle().map_err(|err| format!("{err:?}")))
}

/// Create the migrated template database unless it already exists.
fn ensure_template_database(cluster: &ClusterHandle) -> Result<String, String> {
    let template_name = template_database_name()?;
    let _lock = TEMPLATE_LOCK
        .get_or_init(|| Mutex::new(()))
        .lock()
        .unwrap_or_else(|err| err.into_inner());

    let exists = cluster
        .database_exists(template_name.as_str())
        .map_err(|err| format!("template check: {err:?}"))?;
    if !exists {
        cluster
            .create_database(template_name.as_str())
            .map_err(|err| format!("create template: {err:?}"))?;
        let url = cluster.connection().database_url(&template_name);
        run_pending_migrations(&url).map_err(|err| err.to_string())?;
    }
    Ok(template_name)
}

/// A fresh database with every migration applied.
pub fn provision_database() -> Result<TemporaryDatabase, String> {
    let cluster = shared_cluster()?;
    retry(|| {
        let template_name = ensure_template_database(cluster)?;
        cluster
            .temporary_database_from_template(
                format!("test_{}", Uuid::new_v4().simple()).as_str(),
                template_name.as_str(),
            )
            .map_err(|err| format!("create database from template: {err:?}"))
    })
}

/// Drop `table` to simulate schema loss.
pub fn drop_table(url: &str, table: &str) -> Result<(), String> {
    let mut client = Client::connect(url, NoTls).map_err(|err| format_postgres_error(&err))?;
    client
        .batch_execute(&format!("DROP TABLE IF EXISTS {table} CASCADE;"))
        .map_err(|err| format_postgres_error(&err))
}
