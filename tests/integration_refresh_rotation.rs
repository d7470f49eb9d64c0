use axum::http::StatusCode;
use chrono::NaiveDate;
use sqlx::PgPool;
use uuid::Uuid;

use caredesk::modules::auth::model::{LoginRequest, RegisterUserDto};
use caredesk::modules::auth::service::AuthService;
use caredesk::modules::users::model::Gender;
use caredesk::modules::users::service::UserService;
use caredesk_auth::create_refresh_token;
use caredesk_config::JwtConfig;

fn test_jwt_config() -> JwtConfig {
    JwtConfig {
        access_secret: "integration-access-secret-32-characters-long".to_string(),
        refresh_secret: "integration-refresh-secret-32-characters-long".to_string(),
        access_expiration_minutes: 15,
        refresh_expiration_days: 7,
    }
}

/// Registers a patient and opens a session, returning the user id and the
/// refresh token the server just stored a hash of.
async fn register_and_login(pool: &PgPool, config: &JwtConfig) -> (Uuid, String) {
    let dto = RegisterUserDto {
        username: "pat".to_string(),
        email: "pat@example.com".to_string(),
        password: "Secret1!".to_string(),
        first_name: "Pat".to_string(),
        last_name: "Jones".to_string(),
        dob: NaiveDate::from_ymd_opt(1990, 1, 15).unwrap(),
        gender: Gender::Female,
    };
    let user = UserService::create_new_user(pool, dto).await.unwrap();

    let login = AuthService::login(
        pool,
        LoginRequest {
            login_id: "pat".to_string(),
            password: "Secret1!".to_string(),
        },
        config,
    )
    .await
    .unwrap();

    (user.id, login.refresh_token)
}

#[sqlx::test(migrations = "./migrations")]
async fn concurrent_rotations_with_the_same_token_let_exactly_one_win(pool: PgPool) {
    let config = test_jwt_config();
    let (user_id, refresh_token) = register_and_login(&pool, &config).await;

    let (first, second) = tokio::join!(
        AuthService::refresh_tokens(&pool, user_id, &refresh_token, &config),
        AuthService::refresh_tokens(&pool, user_id, &refresh_token, &config),
    );

    let successes = [first.is_ok(), second.is_ok()]
        .iter()
        .filter(|ok| **ok)
        .count();
    assert_eq!(successes, 1);

    let loser = if first.is_ok() {
        second.unwrap_err()
    } else {
        first.unwrap_err()
    };
    assert_eq!(loser.status, StatusCode::FORBIDDEN);
}

#[sqlx::test(migrations = "./migrations")]
async fn rotated_refresh_token_cannot_be_replayed(pool: PgPool) {
    let config = test_jwt_config();
    let (user_id, first_token) = register_and_login(&pool, &config).await;

    let rotated = AuthService::refresh_tokens(&pool, user_id, &first_token, &config)
        .await
        .unwrap();

    // The consumed token is dead; the freshly issued one is live.
    let replay = AuthService::refresh_tokens(&pool, user_id, &first_token, &config).await;
    assert_eq!(replay.unwrap_err().status, StatusCode::FORBIDDEN);

    AuthService::refresh_tokens(&pool, user_id, &rotated.refresh_token, &config)
        .await
        .unwrap();
}

#[sqlx::test(migrations = "./migrations")]
async fn logout_revokes_the_session(pool: PgPool) {
    let config = test_jwt_config();
    let (user_id, refresh_token) = register_and_login(&pool, &config).await;

    AuthService::logout(&pool, user_id).await.unwrap();

    let result = AuthService::refresh_tokens(&pool, user_id, &refresh_token, &config).await;
    assert_eq!(result.unwrap_err().status, StatusCode::FORBIDDEN);

    // Logging out again is fine.
    AuthService::logout(&pool, user_id).await.unwrap();
}

#[sqlx::test(migrations = "./migrations")]
async fn valid_token_without_a_stored_session_is_rejected(pool: PgPool) {
    let config = test_jwt_config();

    let dto = RegisterUserDto {
        username: "pat".to_string(),
        email: "pat@example.com".to_string(),
        password: "Secret1!".to_string(),
        first_name: "Pat".to_string(),
        last_name: "Jones".to_string(),
        dob: NaiveDate::from_ymd_opt(1990, 1, 15).unwrap(),
        gender: Gender::Female,
    };
    let user = UserService::create_new_user(&pool, dto).await.unwrap();

    // Registered but never logged in: the token verifies, the session does
    // not exist.
    let token = create_refresh_token(user.id, &user.email, &config).unwrap();
    let result = AuthService::refresh_tokens(&pool, user.id, &token, &config).await;
    assert_eq!(result.unwrap_err().status, StatusCode::FORBIDDEN);
}
