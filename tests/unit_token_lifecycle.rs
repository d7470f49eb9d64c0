use uuid::Uuid;

use caredesk_auth::{issue_token_pair, verify_access_token, verify_refresh_token};
use caredesk_config::JwtConfig;
use caredesk_core::password::{hash_refresh_token, verify_refresh_token_hash};

fn test_jwt_config() -> JwtConfig {
    JwtConfig {
        access_secret: "integration-access-secret-32-characters-long".to_string(),
        refresh_secret: "integration-refresh-secret-32-characters-long".to_string(),
        access_expiration_minutes: 15,
        refresh_expiration_days: 7,
    }
}

#[test]
fn issued_pair_verifies_with_the_matching_secret_only() {
    let config = test_jwt_config();
    let user_id = Uuid::new_v4();

    let pair = issue_token_pair(user_id, "pat@example.com", &config).unwrap();

    let access = verify_access_token(&pair.access_token, &config).unwrap();
    assert_eq!(access.sub, user_id.to_string());
    assert_eq!(access.email, "pat@example.com");

    let refresh = verify_refresh_token(&pair.refresh_token, &config).unwrap();
    assert_eq!(refresh.sub, access.sub);

    // Tokens must not be usable in each other's role.
    assert!(verify_access_token(&pair.refresh_token, &config).is_err());
    assert!(verify_refresh_token(&pair.access_token, &config).is_err());
}

#[test]
fn rotation_invalidates_the_previous_refresh_token() {
    let config = test_jwt_config();
    let user_id = Uuid::new_v4();

    // Login: the hash of the first refresh token is what gets stored.
    let first = issue_token_pair(user_id, "pat@example.com", &config).unwrap();
    let stored_hash = hash_refresh_token(&first.refresh_token).unwrap();
    assert!(verify_refresh_token_hash(&first.refresh_token, &stored_hash).unwrap());

    // Refresh: a new pair is minted and the stored hash is replaced.
    let second = issue_token_pair(user_id, "pat@example.com", &config).unwrap();
    let rotated_hash = hash_refresh_token(&second.refresh_token).unwrap();

    // Replaying the consumed token against the rotated session fails.
    assert!(!verify_refresh_token_hash(&first.refresh_token, &rotated_hash).unwrap());
    assert!(verify_refresh_token_hash(&second.refresh_token, &rotated_hash).unwrap());
}

#[test]
fn stored_hash_never_contains_the_token() {
    let config = test_jwt_config();
    let pair = issue_token_pair(Uuid::new_v4(), "pat@example.com", &config).unwrap();

    let stored_hash = hash_refresh_token(&pair.refresh_token).unwrap();
    assert!(!stored_hash.contains(&pair.refresh_token));
    assert!(stored_hash.starts_with("$2"));
}

#[test]
fn tokens_for_different_users_are_not_interchangeable() {
    let config = test_jwt_config();

    let alice = issue_token_pair(Uuid::new_v4(), "alice@example.com", &config).unwrap();
    let bob = issue_token_pair(Uuid::new_v4(), "bob@example.com", &config).unwrap();

    let alice_hash = hash_refresh_token(&alice.refresh_token).unwrap();
    assert!(!verify_refresh_token_hash(&bob.refresh_token, &alice_hash).unwrap());
}
