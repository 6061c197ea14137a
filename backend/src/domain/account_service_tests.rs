//! Tests for the account service.

use std::sync::Arc;

use rstest::{fixture, rstest};

use super::*;
use crate::domain::ports::{MockAccountRepository, MockPasswordHasher};
use crate::domain::{AccountRole, ErrorCode, PasswordHash};

fn email(raw: &str) -> Email {
    Email::new(raw).expect("valid email")
}

fn stored(id: i64, address: &str) -> Account {
    Account::new(
        AccountId::new(id),
        email(address),
        PasswordHash::new("hashed:user"),
        [AccountRole::User],
    )
}

#[fixture]
fn hasher() -> MockPasswordHasher {
    let mut hasher = MockPasswordHasher::new();
    hasher
        .expect_hash()
        .returning(|password| Ok(PasswordHash::new(format!("hashed:{password}"))));
    hasher
        .expect_verify()
        .returning(|password, hash| Ok(hash.as_str() == format!("hashed:{password}")));
    hasher
}

#[rstest]
#[tokio::test]
async fn save_account_stores_the_hash_not_the_password(hasher: MockPasswordHasher) {
    let mut repo = MockAccountRepository::new();
    repo.expect_insert()
        .withf(|account| {
            account.password_hash().as_str() == "hashed:pass"
                && account.email().as_ref() == "keesun@email.com"
        })
        .times(1)
        .returning(|account| Ok(Account::from_new(AccountId::new(1), account.clone())));

    let service = AccountService::new(Arc::new(repo), Arc::new(hasher));
    let account = service
        .save_account(RegisterAccountRequest::new(
            email("keesun@email.com"),
            "pass",
            [AccountRole::Admin, AccountRole::User],
        ))
        .await
        .expect("save succeeds");

    assert_ne!(account.password_hash().as_str(), "pass");
    assert!(account.has_role(AccountRole::Admin));
}

#[rstest]
#[tokio::test]
async fn save_account_reports_duplicates_as_invalid_requests(hasher: MockPasswordHasher) {
    let mut repo = MockAccountRepository::new();
    repo.expect_insert()
        .times(1)
        .return_once(|_| Err(AccountRepositoryError::duplicate_email("user@email.com")));

    let service = AccountService::new(Arc::new(repo), Arc::new(hasher));
    let error = service
        .save_account(RegisterAccountRequest::new(email("user@email.com"), "user", []))
        .await
        .expect_err("duplicate");

    assert_eq!(error.code(), ErrorCode::InvalidRequest);
}

#[rstest]
#[tokio::test]
async fn ensure_account_returns_existing_accounts_untouched() {
    let mut repo = MockAccountRepository::new();
    repo.expect_find_by_email()
        .times(1)
        .return_once(|_| Ok(Some(stored(3, "admin@email.com"))));
    repo.expect_insert().times(0);
    let mut hasher = MockPasswordHasher::new();
    hasher.expect_hash().times(0);

    let service = AccountService::new(Arc::new(repo), Arc::new(hasher));
    let account = service
        .ensure_account(RegisterAccountRequest::new(email("admin@email.com"), "admin", []))
        .await
        .expect("existing account");

    assert_eq!(account.id(), AccountId::new(3));
}

#[rstest]
#[tokio::test]
async fn ensure_account_recovers_from_a_concurrent_insert(hasher: MockPasswordHasher) {
    let mut repo = MockAccountRepository::new();
    let mut lookups = 0;
    repo.expect_find_by_email().times(2).returning(move |_| {
        lookups += 1;
        Ok((lookups == 2).then(|| stored(8, "user@email.com")))
    });
    repo.expect_insert()
        .times(1)
        .return_once(|_| Err(AccountRepositoryError::duplicate_email("user@email.com")));

    let service = AccountService::new(Arc::new(repo), Arc::new(hasher));
    let account = service
        .ensure_account(RegisterAccountRequest::new(email("user@email.com"), "user", []))
        .await
        .expect("existing account after race");

    assert_eq!(account.id(), AccountId::new(8));
}

#[rstest]
#[case("nobody@email.com")]
#[case("not-an-email")]
#[tokio::test]
async fn load_by_username_reports_unknown_users_as_not_found(#[case] username: &str) {
    let mut repo = MockAccountRepository::new();
    repo.expect_find_by_email().returning(|_| Ok(None));

    let service = AccountService::new(Arc::new(repo), Arc::new(MockPasswordHasher::new()));
    let error = service
        .load_by_username(username)
        .await
        .expect_err("unknown user");

    assert_eq!(error.code(), ErrorCode::NotFound);
}

#[rstest]
#[tokio::test]
async fn load_by_username_ignores_case() {
    let mut repo = MockAccountRepository::new();
    repo.expect_find_by_email()
        .withf(|email| email.as_ref() == "user@email.com")
        .times(1)
        .return_once(|_| Ok(Some(stored(2, "user@email.com"))));

    let service = AccountService::new(Arc::new(repo), Arc::new(MockPasswordHasher::new()));
    let account = service
        .load_by_username("User@Email.com")
        .await
        .expect("account found");

    assert_eq!(account.id(), AccountId::new(2));
}

#[rstest]
#[case("user", true)]
#[case("wrong", false)]
#[tokio::test]
async fn authenticate_checks_the_password_against_the_hash(
    hasher: MockPasswordHasher,
    #[case] password: &str,
    #[case] accepted: bool,
) {
    let mut repo = MockAccountRepository::new();
    repo.expect_find_by_email()
        .times(1)
        .return_once(|_| Ok(Some(stored(2, "user@email.com"))));
    let service = AccountService::new(Arc::new(repo), Arc::new(hasher));
    let credentials =
        LoginCredentials::try_from_parts("user@email.com", password).expect("valid credentials");
    let outcome = service
        .authenticate(&credentials)
        .await
        .expect("lookup succeeds");

    assert_eq!(outcome.is_some(), accepted);
}

#[rstest]
#[tokio::test]
async fn authenticate_maps_connection_errors_to_service_unavailable() {
    let mut repo = MockAccountRepository::new();
    repo.expect_find_by_email()
        .times(1)
        .return_once(|_| Err(AccountRepositoryError::connection("refused")));

    let service = AccountService::new(Arc::new(repo), Arc::new(MockPasswordHasher::new()));
    let credentials =
        LoginCredentials::try_from_parts("user@email.com", "user").expect("valid credentials");
    let error = service
        .authenticate(&credentials)
        .await
        .expect_err("repository down");

    assert_eq!(error.code(), ErrorCode::ServiceUnavailable);
}
