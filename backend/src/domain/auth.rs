//! OAuth2 password-grant primitives.
//!
//! Inbound adapters turn form fields into these types before calling the
//! token service, so the service never sees raw, unvalidated strings.

use std::collections::BTreeSet;

use zeroize::Zeroizing;

use super::{AccountId, AccountRole, Email, Error};

/// Scope granted to every issued token.
pub const TOKEN_SCOPE: &str = "read write";

/// Token type reported to clients.
pub const TOKEN_TYPE: &str = "bearer";

/// Validation failures for credential inputs.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CredentialsValidationError {
    #[error("username must not be empty")]
    EmptyUsername,
    #[error("password must not be empty")]
    EmptyPassword,
    #[error("client id must not be empty")]
    EmptyClientId,
}

/// Resource-owner credentials submitted with the password grant.
///
/// The username is trimmed. The password keeps caller whitespace and is
/// zeroised on drop.
///
/// # Examples
/// ```
/// use events_api::domain::LoginCredentials;
///
/// let creds = LoginCredentials::try_from_parts(" admin@email.com ", "admin")
///     .expect("valid credentials");
/// assert_eq!(creds.username(), "admin@email.com");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoginCredentials {
    username: String,
    password: Zeroizing<String>,
}

impl LoginCredentials {
    pub fn try_from_parts(
        username: &str,
        password: &str,
    ) -> Result<Self, CredentialsValidationError> {
        let username = username.trim();
        if username.is_empty() {
            return Err(CredentialsValidationError::EmptyUsername);
        }
        if password.is_empty() {
            return Err(CredentialsValidationError::EmptyPassword);
        }
        Ok(Self {
            username: username.to_owned(),
            password: Zeroizing::new(password.to_owned()),
        })
    }

    pub fn username(&self) -> &str {
        self.username.as_str()
    }

    pub fn password(&self) -> &str {
        self.password.as_str()
    }
}

/// OAuth client identity presented alongside a grant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientCredentials {
    client_id: String,
    client_secret: Zeroizing<String>,
}

impl ClientCredentials {
    /// Build client credentials. The secret may be empty for public clients.
    pub fn try_from_parts(
        client_id: &str,
        client_secret: &str,
    ) -> Result<Self, CredentialsValidationError> {
        if client_id.trim().is_empty() {
            return Err(CredentialsValidationError::EmptyClientId);
        }
        Ok(Self {
            client_id: client_id.to_owned(),
            client_secret: Zeroizing::new(client_secret.to_owned()),
        })
    }

    pub fn client_id(&self) -> &str {
        self.client_id.as_str()
    }

    /// Compare against the registered client.
    pub fn matches(&self, registered: &ClientCredentials) -> bool {
        self.client_id == registered.client_id
            && self.client_secret.as_str() == registered.client_secret.as_str()
    }
}

/// Grant presented to the token endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TokenGrant {
    Password(LoginCredentials),
    RefreshToken(Zeroizing<String>),
}

/// Complete token request after form parsing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenRequest {
    pub client: ClientCredentials,
    pub grant: TokenGrant,
}

/// Tokens handed back to the client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IssuedTokens {
    pub access_token: String,
    pub refresh_token: String,
    /// Whole seconds until the access token expires.
    pub expires_in: i64,
    pub scope: &'static str,
}

/// OAuth2 failure categories, mirrored onto the `error` field of the
/// RFC 6749 error response.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum OAuthError {
    #[error("bad client credentials")]
    InvalidClient,
    #[error("{0}")]
    InvalidRequest(String),
    #[error("unsupported grant type: {0}")]
    UnsupportedGrantType(String),
    #[error("{0}")]
    InvalidGrant(String),
    #[error(transparent)]
    Server(#[from] Error),
}

impl OAuthError {
    /// Registered OAuth2 error code.
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::InvalidClient => "invalid_client",
            Self::InvalidRequest(_) => "invalid_request",
            Self::UnsupportedGrantType(_) => "unsupported_grant_type",
            Self::InvalidGrant(_) => "invalid_grant",
            Self::Server(_) => "server_error",
        }
    }
}

/// Authenticated caller resolved from a bearer token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Principal {
    account_id: AccountId,
    email: Email,
    roles: BTreeSet<AccountRole>,
}

impl Principal {
    pub fn new(
        account_id: AccountId,
        email: Email,
        roles: impl IntoIterator<Item = AccountRole>,
    ) -> Self {
        Self {
            account_id,
            email,
            roles: roles.into_iter().collect(),
        }
    }

    pub fn account_id(&self) -> AccountId {
        self.account_id
    }

    pub fn email(&self) -> &Email {
        &self.email
    }

    pub fn has_role(&self, role: AccountRole) -> bool {
        self.roles.contains(&role)
    }
}
