//! Tests for the OAuth2 token endpoint.

use super::*;
use crate::domain::Error;
use crate::inbound::http::test_utils::{
    MANAGER_PASSWORD, MANAGER_USERNAME, MemoryApi, REFRESH_TTL_SECS, TEST_CLIENT_ID,
    TEST_CLIENT_SECRET, basic_auth, memory_state,
};
use actix_web::http::header::CONTENT_TYPE;
use actix_web::{App, test as actix_test};
use rstest::rstest;
use serde_json::Value;

fn test_app(
    api: &MemoryApi,
) -> App<
    impl actix_web::dev::ServiceFactory<
        actix_web::dev::ServiceRequest,
        Config = (),
        Response = actix_web::dev::ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    > + use<>,
> {
    App::new()
        .app_data(web::Data::new(api.state.clone()))
        .service(issue_token)
}

fn token_request(authorization: Option<&str>, body: &str) -> actix_http::Request {
    let mut request = actix_test::TestRequest::post()
        .uri("/oauth/token")
        .insert_header((CONTENT_TYPE, "application/x-www-form-urlencoded"))
        .set_payload(body.to_owned());
    if let Some(value) = authorization {
        request = request.insert_header((AUTHORIZATION, value.to_owned()));
    }
    request.to_request()
}

fn password_form(username: &str, password: &str) -> String {
    url::form_urlencoded::Serializer::new(String::new())
        .append_pair("grant_type", "password")
        .append_pair("username", username)
        .append_pair("password", password)
        .finish()
}

fn client() -> String {
    basic_auth(TEST_CLIENT_ID, TEST_CLIENT_SECRET)
}

#[actix_web::test]
async fn password_grant_issues_bearer_tokens() {
    let api = memory_state().await;
    let app = actix_test::init_service(test_app(&api)).await;

    let response = actix_test::call_service(
        &app,
        token_request(
            Some(&client()),
            &password_form(MANAGER_USERNAME, MANAGER_PASSWORD),
        ),
    )
    .await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers().get(CACHE_CONTROL),
        Some(&HeaderValue::from_static("no-store"))
    );
    let body: TokenResponse = actix_test::read_body_json(response).await;
    assert_eq!(body.token_type, "bearer");
    assert_eq!(body.expires_in, 600);
    assert_eq!(body.scope, "read write");
    assert!(!body.access_token.is_empty());
    assert_ne!(body.access_token, body.refresh_token);
}

#[rstest]
#[case::no_header(None)]
#[case::wrong_secret(Some(basic_auth(TEST_CLIENT_ID, "wrong")))]
#[case::unknown_client(Some(basic_auth("other", TEST_CLIENT_SECRET)))]
#[case::not_base64(Some("Basic !!!".to_owned()))]
#[case::bearer_scheme(Some("Bearer abc".to_owned()))]
#[actix_web::test]
async fn bad_client_credentials_are_unauthorised(#[case] authorization: Option<String>) {
    let api = memory_state().await;
    let app = actix_test::init_service(test_app(&api)).await;

    let response = actix_test::call_service(
        &app,
        token_request(
            authorization.as_deref(),
            &password_form(MANAGER_USERNAME, MANAGER_PASSWORD),
        ),
    )
    .await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(
        response
            .headers()
            .get(WWW_AUTHENTICATE)
            .and_then(|value| value.to_str().ok()),
        Some("Basic realm=\"oauth\"")
    );
    let body: OAuthErrorResponse = actix_test::read_body_json(response).await;
    assert_eq!(body.error, "invalid_client");
}

#[rstest]
#[case::wrong_password(password_form(MANAGER_USERNAME, "nope"), "invalid_grant")]
#[case::unknown_user(password_form("ghost@email.com", "nope"), "invalid_grant")]
#[case::missing_grant("username=a&password=b".to_owned(), "invalid_request")]
#[case::missing_password("grant_type=password&username=a".to_owned(), "invalid_request")]
#[case::unknown_grant("grant_type=client_credentials".to_owned(), "unsupported_grant_type")]
#[case::missing_refresh("grant_type=refresh_token".to_owned(), "invalid_request")]
#[case::unknown_refresh("grant_type=refresh_token&refresh_token=xyz".to_owned(), "invalid_grant")]
#[actix_web::test]
async fn rejected_grants_use_the_oauth_envelope(#[case] form: String, #[case] error: &str) {
    let api = memory_state().await;
    let app = actix_test::init_service(test_app(&api)).await;

    let response = actix_test::call_service(&app, token_request(Some(&client()), &form)).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body: Value = actix_test::read_body_json(response).await;
    assert_eq!(body["error"], error);
    assert!(body["error_description"].as_str().is_some_and(|text| !text.is_empty()));
}

#[rstest]
fn server_failures_keep_their_status_and_hide_internals() {
    let unavailable = OAuthError::Server(Error::service_unavailable("token store unavailable"));
    assert_eq!(unavailable.status_code(), StatusCode::SERVICE_UNAVAILABLE);

    let internal = OAuthError::Server(Error::internal("connection string leaked"));
    assert_eq!(internal.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
}

#[rstest]
fn form_parsing_keeps_the_first_value() {
    let form = parse_form(b"grant_type=password&grant_type=refresh_token&username=a%40b.com");
    assert_eq!(form.grant_type.as_deref(), Some("password"));
    assert_eq!(form.username.as_deref(), Some("a@b.com"));
}

struct RefreshWorld {
    api: MemoryApi,
    refresh_token: String,
    responses: Vec<(StatusCode, Value)>,
}

async fn tokens_issued() -> RefreshWorld {
    let api = memory_state().await;
    let app = actix_test::init_service(test_app(&api)).await;
    let response = actix_test::call_service(
        &app,
        token_request(
            Some(&client()),
            &password_form(MANAGER_USERNAME, MANAGER_PASSWORD),
        ),
    )
    .await;
    let body: TokenResponse = actix_test::read_body_json(response).await;
    RefreshWorld {
        api,
        refresh_token: body.refresh_token,
        responses: Vec::new(),
    }
}

async fn redeem_twice(world: &mut RefreshWorld) {
    let app = actix_test::init_service(test_app(&world.api)).await;
    let form = format!("grant_type=refresh_token&refresh_token={}", world.refresh_token);
    for _ in 0..2 {
        let response = actix_test::call_service(&app, token_request(Some(&client()), &form)).await;
        let status = response.status();
        let body: Value = actix_test::read_body_json(response).await;
        world.responses.push((status, body));
    }
}

fn only_first_succeeds(world: &RefreshWorld) {
    let [(first_status, first), (second_status, second)] = world.responses.as_slice() else {
        panic!("expected two responses, got {}", world.responses.len());
    };
    assert_eq!(*first_status, StatusCode::OK);
    assert!(first["access_token"].as_str().is_some());
    assert_eq!(*second_status, StatusCode::BAD_REQUEST);
    assert_eq!(second["error"], "invalid_grant");
}

#[actix_web::test]
async fn refresh_tokens_are_single_use() {
    let mut world = tokens_issued().await;
    redeem_twice(&mut world).await;
    only_first_succeeds(&world);
}

#[actix_web::test]
async fn refresh_tokens_expire() {
    let mut world = tokens_issued().await;
    world.api.clock.advance_seconds(REFRESH_TTL_SECS + 1);
    redeem_twice(&mut world).await;

    assert!(
        world
            .responses
            .iter()
            .all(|(status, body)| *status == StatusCode::BAD_REQUEST
                && body["error"] == "invalid_grant")
    );
}
