//! OAuth2 token endpoint.
//!
//! ```text
//! POST /oauth/token
//! Authorization: Basic base64(client_id:client_secret)
//! Content-Type: application/x-www-form-urlencoded
//!
//! grant_type=password&username=user@email.com&password=user
//! grant_type=refresh_token&refresh_token=...
//! ```
//!
//! Failures use the RFC 6749 envelope `{"error":..,"error_description":..}`
//! rather than the API's own error format.

use actix_web::http::StatusCode;
use actix_web::http::header::{
    AUTHORIZATION, CACHE_CONTROL, HeaderMap, HeaderValue, PRAGMA, WWW_AUTHENTICATE,
};
use actix_web::{HttpRequest, HttpResponse, ResponseError, post, web};
use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use serde::{Deserialize, Serialize};
use tracing::{error, warn};
use zeroize::Zeroizing;

use crate::domain::{
    ClientCredentials, ErrorCode, IssuedTokens, LoginCredentials, OAuthError, TOKEN_TYPE,
    TokenGrant, TokenRequest,
};

use super::error::{TRACE_ID_HEADER, redact_if_internal, status_for};
use super::state::HttpState;

const BASIC_CHALLENGE: &str = "Basic realm=\"oauth\"";
const GRANT_PASSWORD: &str = "password";
const GRANT_REFRESH_TOKEN: &str = "refresh_token";

/// Successful token response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, utoipa::ToSchema)]
pub struct TokenResponse {
    #[schema(example = "2YotnFZFEjr1zCsicMWpAA")]
    pub access_token: String,
    #[schema(example = "bearer")]
    pub token_type: String,
    #[schema(example = "tGzv3JOkF0XG5Qx2TlKWIA")]
    pub refresh_token: String,
    /// Seconds until the access token expires.
    #[schema(example = 600)]
    pub expires_in: i64,
    #[schema(example = "read write")]
    pub scope: String,
}

impl From<IssuedTokens> for TokenResponse {
    fn from(tokens: IssuedTokens) -> Self {
        Self {
            access_token: tokens.access_token,
            token_type: TOKEN_TYPE.to_owned(),
            refresh_token: tokens.refresh_token,
            expires_in: tokens.expires_in,
            scope: tokens.scope.to_owned(),
        }
    }
}

/// RFC 6749 section 5.2 error body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, utoipa::ToSchema)]
pub struct OAuthErrorResponse {
    #[schema(example = "invalid_grant")]
    pub error: String,
    #[schema(example = "Bad credentials")]
    pub error_description: String,
}

/// Form fields accepted by the token endpoint. Documentation only; the body
/// is parsed by [`parse_form`].
#[derive(Debug, Default, Deserialize, utoipa::ToSchema)]
pub struct TokenForm {
    #[schema(example = "password")]
    pub grant_type: Option<String>,
    #[schema(example = "user@email.com")]
    pub username: Option<String>,
    pub password: Option<String>,
    pub refresh_token: Option<String>,
}

fn parse_form(body: &[u8]) -> TokenForm {
    let mut form = TokenForm::default();
    for (key, value) in url::form_urlencoded::parse(body) {
        let slot = match key.as_ref() {
            "grant_type" => &mut form.grant_type,
            "username" => &mut form.username,
            "password" => &mut form.password,
            "refresh_token" => &mut form.refresh_token,
            _ => continue,
        };
        slot.get_or_insert_with(|| value.into_owned());
    }
    form
}

/// Decode `Authorization: Basic` client credentials.
pub(crate) fn client_credentials(headers: &HeaderMap) -> Result<ClientCredentials, OAuthError> {
    let header = headers
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .ok_or(OAuthError::InvalidClient)?;
    let (scheme, encoded) = header
        .trim()
        .split_once(' ')
        .ok_or(OAuthError::InvalidClient)?;
    if !scheme.eq_ignore_ascii_case("basic") {
        return Err(OAuthError::InvalidClient);
    }
    let decoded = STANDARD
        .decode(encoded.trim())
        .map_err(|_| OAuthError::InvalidClient)?;
    let decoded = Zeroizing::new(String::from_utf8(decoded).map_err(|_| OAuthError::InvalidClient)?);
    let (id, secret) = decoded.split_once(':').ok_or(OAuthError::InvalidClient)?;
    ClientCredentials::try_from_parts(id, secret).map_err(|_| OAuthError::InvalidClient)
}

fn required(value: Option<String>, name: &str) -> Result<String, OAuthError> {
    value
        .filter(|value| !value.is_empty())
        .ok_or_else(|| OAuthError::InvalidRequest(format!("Missing {name}")))
}

/// Turn the form into a domain grant.
pub(crate) fn token_grant(form: TokenForm) -> Result<TokenGrant, OAuthError> {
    let TokenForm {
        grant_type,
        username,
        password,
        refresh_token,
    } = form;
    let grant_type = required(grant_type, "grant type")?;
    match grant_type.as_str() {
        GRANT_PASSWORD => {
            let username = required(username, "username")?;
            let password = Zeroizing::new(required(password, "password")?);
            LoginCredentials::try_from_parts(&username, &password)
                .map(TokenGrant::Password)
                .map_err(|err| OAuthError::InvalidRequest(err.to_string()))
        }
        GRANT_REFRESH_TOKEN => {
            let token = required(refresh_token, "refresh token")?;
            Ok(TokenGrant::RefreshToken(Zeroizing::new(token)))
        }
        other => Err(OAuthError::UnsupportedGrantType(other.to_owned())),
    }
}

impl ResponseError for OAuthError {
    fn status_code(&self) -> StatusCode {
        match self {
            Self::InvalidClient => StatusCode::UNAUTHORIZED,
            Self::InvalidRequest(_) | Self::UnsupportedGrantType(_) | Self::InvalidGrant(_) => {
                StatusCode::BAD_REQUEST
            }
            Self::Server(err) => status_for(err.code()),
        }
    }

    fn error_response(&self) -> HttpResponse {
        let description = match self {
            Self::Server(err) => {
                error!(code = ?err.code(), message = err.message(), "token endpoint failed");
                redact_if_internal(err).message().to_owned()
            }
            other => {
                warn!(error = other.error_code(), message = %other, "token request rejected");
                other.to_string()
            }
        };

        let mut builder = HttpResponse::build(self.status_code());
        builder
            .insert_header((CACHE_CONTROL, HeaderValue::from_static("no-store")))
            .insert_header((PRAGMA, HeaderValue::from_static("no-cache")));
        if let Self::InvalidClient = self {
            builder.insert_header((WWW_AUTHENTICATE, HeaderValue::from_static(BASIC_CHALLENGE)));
        }
        if let Self::Server(err) = self {
            if let Some(id) = err.trace_id() {
                builder.insert_header((TRACE_ID_HEADER, id.to_owned()));
            }
        }
        let error = match self {
            Self::Server(err) if err.code() == ErrorCode::ServiceUnavailable => {
                "temporarily_unavailable"
            }
            other => other.error_code(),
        };
        builder.json(OAuthErrorResponse {
            error: error.to_owned(),
            error_description: description,
        })
    }
}

/// Issue tokens for the password or refresh-token grant.
#[utoipa::path(
    post,
    path = "/oauth/token",
    request_body(content = TokenForm, content_type = "application/x-www-form-urlencoded"),
    responses(
        (status = 200, description = "Tokens issued", body = TokenResponse),
        (status = 400, description = "Invalid request or grant", body = OAuthErrorResponse),
        (status = 401, description = "Bad client credentials", body = OAuthErrorResponse,
            headers(("WWW-Authenticate" = String, description = "Basic challenge"))),
        (status = 503, description = "Token store unavailable", body = OAuthErrorResponse)
    ),
    tags = ["oauth"],
    operation_id = "issueToken",
    security(("ClientBasic" = []))
)]
#[post("/oauth/token")]
pub async fn issue_token(
    req: HttpRequest,
    state: web::Data<HttpState>,
    body: web::Bytes,
) -> Result<HttpResponse, OAuthError> {
    let client = client_credentials(req.headers())?;
    let grant = token_grant(parse_form(&body))?;
    let tokens = state.tokens.issue(TokenRequest { client, grant }).await?;

    Ok(HttpResponse::Ok()
        .insert_header((CACHE_CONTROL, HeaderValue::from_static("no-store")))
        .insert_header((PRAGMA, HeaderValue::from_static("no-cache")))
        .json(TokenResponse::from(tokens)))
}

#[cfg(test)]
#[path = "oauth_tests.rs"]
mod tests;
