//! Whether a missing embedded PostgreSQL cluster fails the suite or skips it.

const SKIP_VAR: &str = "SKIP_TEST_CLUSTER";

fn is_truthy(value: &str) -> bool {
    ["1", "true", "yes"]
        .iter()
        .any(|accepted| value.trim().eq_ignore_ascii_case(accepted))
}

/// Skip (returning `None`) when `SKIP_TEST_CLUSTER` is truthy. Otherwise
/// panic, so an unavailable cluster never passes silently in CI.
pub fn handle_cluster_setup_failure<T>(reason: impl std::fmt::Display) -> Option<T> {
    let skip = std::env::var(SKIP_VAR).is_ok_and(|value| is_truthy(&value));
    assert!(
        skip,
        "embedded PostgreSQL unavailable: {reason}; set {SKIP_VAR}=1 to skip these tests"
    );
    eprintln!("{SKIP_VAR}: skipping database-backed test ({reason})");
    None
}
