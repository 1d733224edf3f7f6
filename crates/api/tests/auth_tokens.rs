//! Tests for JWT access-token generation and validation.

use storyloom_api::auth::jwt::{generate_access_token, validate_token, JwtConfig};
use uuid::Uuid;

fn test_config() -> JwtConfig {
    JwtConfig {
        secret: "test-secret-not-for-production".to_string(),
        access_token_expiry_mins: 60,
    }
}

#[test]
fn generated_token_validates_with_same_secret() {
    let config = test_config();
    let user_id = Uuid::new_v4();

    let token = generate_access_token(user_id, &config).unwrap();
    let claims = validate_token(&token, &config).unwrap();

    assert_eq!(claims.sub, user_id);
    assert!(claims.exp > claims.iat);
}

#[test]
fn token_fails_with_different_secret() {
    let config = test_config();
    let other = JwtConfig {
        secret: "a-completely-different-secret".to_string(),
        access_token_expiry_mins: 60,
    };

    let token = generate_access_token(Uuid::new_v4(), &config).unwrap();
    assert!(validate_token(&token, &other).is_err());
}

#[test]
fn expired_token_is_rejected() {
    // Negative expiry puts `exp` in the past.
    let config = JwtConfig {
        secret: "test-secret-not-for-production".to_string(),
        access_token_expiry_mins: -5,
    };

    let token = generate_access_token(Uuid::new_v4(), &config).unwrap();
    assert!(validate_token(&token, &config).is_err());
}

#[test]
fn garbage_token_is_rejected() {
    let config = test_config();
    assert!(validate_token("not.a.jwt", &config).is_err());
}

#[test]
fn each_token_gets_a_unique_jti() {
    let config = test_config();
    let user_id = Uuid::new_v4();

    let a = generate_access_token(user_id, &config).unwrap();
    let b = generate_access_token(user_id, &config).unwrap();

    let claims_a = validate_token(&a, &config).unwrap();
    let claims_b = validate_token(&b, &config).unwrap();
    assert_ne!(claims_a.jti, claims_b.jti);
}
