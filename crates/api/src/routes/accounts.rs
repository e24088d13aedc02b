//! Account management routes.

use std::sync::Arc;

use axum::{
    Json, Router,
    extract::State,
    http::header::ALLOW,
    middleware,
    response::IntoResponse,
    routing::get,
};
use bankline_core::account::{Account, open_account};
use bankline_shared::AppError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use tracing::{info, warn};

use crate::{
    AppState,
    error::ApiError,
    extractors::ApiJson,
    middleware::{AuthorizedAccount, require_account_owner},
};

/// Creates the account routes.
///
/// `/account/{id}` sits behind the ownership gate; `/account` is public.
pub fn routes(state: AppState) -> Router<AppState> {
    let owned = Router::new()
        .route("/account/{id}", get(get_account).delete(delete_account))
        .route_layer(middleware::from_fn_with_state(state, require_account_owner));

    Router::new()
        .route(
            "/account",
            get(list_accounts)
                .post(create_account)
                .delete(reject_collection_delete),
        )
        .merge(owned)
}

/// Request body for creating an account.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateAccountRequest {
    /// First name.
    pub first_name: String,
    /// Last name.
    pub last_name: String,
    /// Plaintext password, hashed before storage.
    pub password: String,
}

/// Response for an account. Never carries the password hash.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountResponse {
    /// Account ID.
    pub id: i32,
    /// First name.
    pub first_name: String,
    /// Last name.
    pub last_name: String,
    /// Account number.
    pub number: i64,
    /// Current balance.
    pub balance: f64,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
}

impl From<&Account> for AccountResponse {
    fn from(account: &Account) -> Self {
        Self {
            id: account.id,
            first_name: account.first_name.clone(),
            last_name: account.last_name.clone(),
            number: account.number,
            balance: account.balance,
            created_at: account.created_at,
        }
    }
}

/// GET /account - List all accounts.
async fn list_accounts(
    State(state): State<AppState>,
) -> Result<Json<Vec<AccountResponse>>, ApiError> {
    let accounts = state.accounts.list().await?;
    Ok(Json(accounts.iter().map(AccountResponse::from).collect()))
}

/// POST /account - Open an account and return a token for it.
async fn create_account(
    State(state): State<AppState>,
    ApiJson(payload): ApiJson<CreateAccountRequest>,
) -> Result<Json<String>, ApiError> {
    let account = open_account(
        state.accounts.as_ref(),
        Arc::clone(&state.password_service),
        &payload.first_name,
        &payload.last_name,
        payload.password,
    )
    .await?;
    let token = state.jwt_service.issue_token(account.number)?;

    info!(account_id = account.id, number = account.number, "Account created");
    Ok(Json(token))
}

/// DELETE /account - Rejected; deletion needs an id.
async fn reject_collection_delete() -> impl IntoResponse {
    (
        [(ALLOW, "GET, POST")],
        ApiError::from(AppError::MethodNotAllowed(
            "method not allowed DELETE".to_string(),
        )),
    )
}

/// GET /account/{id} - Return the account the gate authorized.
async fn get_account(authorized: AuthorizedAccount) -> Json<AccountResponse> {
    Json(AccountResponse::from(&authorized.account))
}

/// DELETE /account/{id} - Delete the account the gate authorized.
async fn delete_account(
    State(state): State<AppState>,
    authorized: AuthorizedAccount,
) -> Result<Json<Value>, ApiError> {
    let id = authorized.account.id;

    if !state.accounts.delete(id).await? {
        warn!(account_id = id, "Account vanished before delete");
        return Err(ApiError::not_found("Account not found"));
    }

    info!(account_id = id, number = authorized.account_number, "Account deleted");
    Ok(Json(json!({ "deleted": id })))
}

#[cfg(test)]
mod integration_tests {
    use axum::{
        body::Body,
        http::{HeaderValue, Request, StatusCode, header::ALLOW, header::AUTHORIZATION},
    };
    use chrono::{Duration, Utc};
    use jsonwebtoken::{EncodingKey, Header, encode};
    use serde_json::{Value, json};
    use tower::ServiceExt;

    use crate::{
        create_router,
        test_support::{
            TEST_SECRET, authed_request, bare_request, create_account, json_request, send,
            state_with_store, test_app,
        },
    };
    use bankline_shared::JwtService;

    fn token_with_claim(account_number: &Value) -> String {
        let exp = (Utc::now() + Duration::hours(1)).timestamp();
        encode(
            &Header::default(),
            &json!({ "accountNumber": account_number, "exp": exp }),
            &EncodingKey::from_secret(TEST_SECRET.as_bytes()),
        )
        .unwrap()
    }

    #[tokio::test]
    async fn test_create_then_fetch_own_account() {
        let (app, state) = test_app();
        let token = create_account(&app, "John", "Doe", "secret").await;
        let claimed = state
            .jwt_service
            .validate_token(&token)
            .unwrap()
            .account_number()
            .unwrap();

        let (status, body) = send(&app, authed_request("GET", "/account/1", &token)).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["firstName"], "John");
        assert_eq!(body["lastName"], "Doe");
        assert_eq!(body["number"], claimed);
        assert_eq!(body["id"], 1);
        assert!(body.get("encryptedPassword").is_none());
    }

    #[tokio::test]
    async fn test_bearer_prefix_accepted() {
        let (app, _) = test_app();
        let token = create_account(&app, "John", "Doe", "secret").await;

        let (status, _) = send(
            &app,
            authed_request("GET", "/account/1", &format!("Bearer {token}")),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
    }

    #[tokio::test]
    async fn test_missing_token() {
        let (app, _) = test_app();
        create_account(&app, "John", "Doe", "secret").await;

        let (status, body) = send(&app, bare_request("GET", "/account/1")).await;

        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body, json!({ "error": "Missing token" }));
    }

    #[tokio::test]
    async fn test_token_for_other_account_forbidden() {
        let (app, _) = test_app();
        let _john = create_account(&app, "John", "Doe", "secret").await;
        let jane = create_account(&app, "Jane", "Doe", "secret").await;

        let (status, body) = send(&app, authed_request("GET", "/account/1", &jane)).await;
        assert_eq!(status, StatusCode::FORBIDDEN);
        assert_eq!(body, json!({ "error": "Forbidden" }));

        let (status, _) = send(&app, authed_request("DELETE", "/account/1", &jane)).await;
        assert_eq!(status, StatusCode::FORBIDDEN);

        let (status, _) = send(&app, authed_request("GET", "/account/2", &jane)).await;
        assert_eq!(status, StatusCode::OK);
    }

    #[tokio::test]
    async fn test_token_signed_with_other_secret() {
        let (app, _) = test_app();
        create_account(&app, "John", "Doe", "secret").await;
        let forged = JwtService::new("not-the-server-secret")
            .issue_token(11_111_111)
            .unwrap();

        let (status, body) = send(&app, authed_request("GET", "/account/1", &forged)).await;

        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body, json!({ "error": "Unauthorized" }));
    }

    #[tokio::test]
    async fn test_garbage_token() {
        let (app, _) = test_app();
        create_account(&app, "John", "Doe", "secret").await;

        let (status, _) = send(&app, authed_request("GET", "/account/1", "not-a-jwt")).await;

        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_unknown_account_not_found() {
        let (app, _) = test_app();
        let token = create_account(&app, "John", "Doe", "secret").await;

        let (status, body) = send(&app, authed_request("GET", "/account/42", &token)).await;

        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body, json!({ "error": "Account not found" }));
    }

    #[tokio::test]
    async fn test_invalid_id() {
        let (app, _) = test_app();
        let token = create_account(&app, "John", "Doe", "secret").await;

        let (status, body) = send(&app, authed_request("GET", "/account/abc", &token)).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body, json!({ "error": "Invalid account id" }));
    }

    #[tokio::test]
    async fn test_float_encoded_claim_accepted() {
        let (app, _) = test_app();
        create_account(&app, "John", "Doe", "secret").await;
        let token = token_with_claim(&json!(11_111_111.0));

        let (status, body) = send(&app, authed_request("GET", "/account/1", &token)).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["number"], 11_111_111);
    }

    #[tokio::test]
    async fn test_unusable_claim_forbidden() {
        let (app, _) = test_app();
        create_account(&app, "John", "Doe", "secret").await;

        for claim in [json!(11_111_111.5), json!("11111111"), Value::Null] {
            let token = token_with_claim(&claim);
            let (status, body) = send(&app, authed_request("GET", "/account/1", &token)).await;
            assert_eq!(status, StatusCode::FORBIDDEN, "claim {claim}");
            assert_eq!(body, json!({ "error": "Forbidden" }));
        }
    }

    #[tokio::test]
    async fn test_delete_then_fetch_not_found() {
        let (app, _) = test_app();
        let token = create_account(&app, "John", "Doe", "secret").await;

        let (status, body) = send(&app, authed_request("DELETE", "/account/1", &token)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({ "deleted": 1 }));

        let (status, _) = send(&app, authed_request("GET", "/account/1", &token)).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_list_accounts() {
        let (app, _) = test_app();
        create_account(&app, "John", "Doe", "password").await;
        create_account(&app, "Jane", "Doe", "password").await;

        let (status, body) = send(&app, bare_request("GET", "/account")).await;

        assert_eq!(status, StatusCode::OK);
        let accounts = body.as_array().unwrap();
        assert_eq!(accounts.len(), 2);
        assert_eq!(accounts[0]["number"], 11_111_111);
        assert_eq!(accounts[1]["number"], 11_111_112);
        assert_eq!(accounts[0]["balance"], 0.0);
        assert!(accounts[0].get("encryptedPassword").is_none());
    }

    #[tokio::test]
    async fn test_collection_delete_rejected() {
        let (app, _) = test_app();

        let (status, body) = send(&app, bare_request("DELETE", "/account")).await;

        assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);
        assert_eq!(body, json!({ "error": "method not allowed DELETE" }));
    }

    #[tokio::test]
    async fn test_collection_delete_advertises_allowed_methods() {
        let (app, _) = test_app();

        let response = app.oneshot(bare_request("DELETE", "/account")).await.unwrap();

        assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
        assert_eq!(response.headers().get(ALLOW).unwrap(), "GET, POST");
    }

    #[tokio::test]
    async fn test_unreadable_authorization_header_unauthorized() {
        let (app, _) = test_app();
        create_account(&app, "John", "Doe", "secret").await;
        let request = Request::builder()
            .method("GET")
            .uri("/account/1")
            .header(AUTHORIZATION, HeaderValue::from_bytes(b"Bearer \xff\xfe").unwrap())
            .body(Body::empty())
            .unwrap();

        let (status, body) = send(&app, request).await;

        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body, json!({ "error": "Unauthorized" }));
    }

    #[tokio::test]
    async fn test_deleted_owner_token_refused_after_restart() {
        let (app, state) = test_app();
        create_account(&app, "John", "Doe", "secret").await;
        let jane = create_account(&app, "Jane", "Doe", "secret").await;
        let jane_number = state
            .jwt_service
            .validate_token(&jane)
            .unwrap()
            .account_number()
            .unwrap();

        let (status, _) = send(&app, authed_request("DELETE", "/account/2", &jane)).await;
        assert_eq!(status, StatusCode::OK);

        // Same storage, freshly built state and router
        let restarted = create_router(state_with_store(state.accounts.clone()));
        create_account(&restarted, "Mallory", "Doe", "secret").await;

        let (status, body) = send(&restarted, authed_request("GET", "/account/3", &jane)).await;
        assert_eq!(status, StatusCode::FORBIDDEN);
        assert_eq!(body, json!({ "error": "Forbidden" }));

        let mallory = state.accounts.get(3).await.unwrap().unwrap();
        assert!(mallory.number > jane_number);
    }

    #[tokio::test]
    async fn test_malformed_create_body() {
        let (app, _) = test_app();

        let (status, body) = send(
            &app,
            json_request("POST", "/account", &json!({ "firstName": 12 })),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"].is_string());
    }

    #[tokio::test]
    async fn test_concurrent_creates_get_unique_numbers() {
        let (app, state) = test_app();

        let handles: Vec<_> = (0..12)
            .map(|i| {
                let app = app.clone();
                tokio::spawn(async move {
                    create_account(&app, &format!("User{i}"), "Doe", "pw").await
                })
            })
            .collect();

        let mut numbers = Vec::new();
        for handle in handles {
            let token = handle.await.unwrap();
            let claims = state.jwt_service.validate_token(&token).unwrap();
            numbers.push(claims.account_number().unwrap());
        }
        numbers.sort_unstable();
        numbers.dedup();

        assert_eq!(numbers.len(), 12);
        assert_eq!(state.accounts.list().await.unwrap().len(), 12);
    }
}
