//! Account identity, credentials and roles.
//!
//! Accounts are keyed by their e-mail address, which doubles as the login
//! username. Password material only ever appears here as a PHC-format hash.

use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Store-assigned account identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AccountId(i64);

impl AccountId {
    /// Wrap a raw identifier.
    #[must_use]
    pub const fn new(value: i64) -> Self {
        Self(value)
    }

    /// Raw identifier value.
    #[must_use]
    pub const fn get(self) -> i64 {
        self.0
    }
}

impl fmt::Display for AccountId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Validation errors returned by account constructors.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AccountValidationError {
    #[error("email must not be empty")]
    EmptyEmail,
    #[error("email `{value}` is not a valid address")]
    InvalidEmail { value: String },
    #[error("unknown account role `{value}`")]
    UnknownRole { value: String },
    #[error("password must not be empty")]
    EmptyPassword,
}

/// Normalised e-mail address used as the login username.
///
/// ## Invariants
/// - Trimmed and lower-cased.
/// - Exactly one `@` with non-empty local and domain parts.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct Email(String);

impl Email {
    /// Validate and normalise an address.
    ///
    /// # Examples
    /// ```
    /// use events_api::domain::Email;
    ///
    /// let email = Email::new("  Admin@Email.com ").expect("valid address");
    /// assert_eq!(email.as_ref(), "admin@email.com");
    /// ```
    pub fn new(value: impl AsRef<str>) -> Result<Self, AccountValidationError> {
        let trimmed = value.as_ref().trim();
        if trimmed.is_empty() {
            return Err(AccountValidationError::EmptyEmail);
        }
        let valid = match trimmed.split_once('@') {
            Some((local, domain)) => {
                !local.is_empty()
                    && !domain.is_empty()
                    && !domain.contains('@')
                    && !trimmed.chars().any(char::is_whitespace)
            }
            None => false,
        };
        if !valid {
            return Err(AccountValidationError::InvalidEmail {
                value: trimmed.to_owned(),
            });
        }
        Ok(Self(trimmed.to_lowercase()))
    }
}

impl AsRef<str> for Email {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for Email {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for Email {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        Self::new(raw).map_err(serde::de::Error::custom)
    }
}

/// Authorisation role granted to an account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AccountRole {
    Admin,
    User,
}

impl AccountRole {
    /// Upper-case name as stored and rendered.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Admin => "ADMIN",
            Self::User => "USER",
        }
    }
}

impl fmt::Display for AccountRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AccountRole {
    type Err = AccountValidationError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_uppercase().as_str() {
            "ADMIN" => Ok(Self::Admin),
            "USER" => Ok(Self::User),
            _ => Err(AccountValidationError::UnknownRole {
                value: value.to_owned(),
            }),
        }
    }
}

/// PHC-format password hash.
#[derive(Clone, PartialEq, Eq)]
pub struct PasswordHash(String);

impl PasswordHash {
    /// Wrap an encoded hash produced by a [`crate::domain::ports::PasswordHasher`].
    pub fn new(encoded: impl Into<String>) -> Self {
        Self(encoded.into())
    }

    /// Encoded hash string.
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Debug for PasswordHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("PasswordHash(<redacted>)")
    }
}

fn normalise_roles(roles: impl IntoIterator<Item = AccountRole>) -> BTreeSet<AccountRole> {
    let mut roles: BTreeSet<_> = roles.into_iter().collect();
    if roles.is_empty() {
        roles.insert(AccountRole::User);
    }
    roles
}

/// Account awaiting insertion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewAccount {
    email: Email,
    password_hash: PasswordHash,
    roles: BTreeSet<AccountRole>,
}

impl NewAccount {
    /// Build an account record. An empty role set becomes `{USER}`.
    pub fn new(
        email: Email,
        password_hash: PasswordHash,
        roles: impl IntoIterator<Item = AccountRole>,
    ) -> Self {
        Self {
            email,
            password_hash,
            roles: normalise_roles(roles),
        }
    }

    pub fn email(&self) -> &Email {
        &self.email
    }

    pub fn password_hash(&self) -> &PasswordHash {
        &self.password_hash
    }

    pub fn roles(&self) -> &BTreeSet<AccountRole> {
        &self.roles
    }
}

/// Persisted account.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Account {
    id: AccountId,
    email: Email,
    password_hash: PasswordHash,
    roles: BTreeSet<AccountRole>,
}

impl Account {
    /// Reassemble a stored account.
    pub fn new(
        id: AccountId,
        email: Email,
        password_hash: PasswordHash,
        roles: impl IntoIterator<Item = AccountRole>,
    ) -> Self {
        Self {
            id,
            email,
            password_hash,
            roles: normalise_roles(roles),
        }
    }

    /// Attach the store-assigned identifier to a new account.
    pub fn from_new(id: AccountId, account: NewAccount) -> Self {
        let NewAccount {
            email,
            password_hash,
            roles,
        } = account;
        Self {
            id,
            email,
            password_hash,
            roles,
        }
    }

    pub fn id(&self) -> AccountId {
        self.id
    }

    pub fn email(&self) -> &Email {
        &self.email
    }

    pub fn password_hash(&self) -> &PasswordHash {
        &self.password_hash
    }

    pub fn roles(&self) -> &BTreeSet<AccountRole> {
        &self.roles
    }

    pub fn has_role(&self, role: AccountRole) -> bool {
        self.roles.contains(&role)
    }
}
