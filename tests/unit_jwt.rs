use axum::http::StatusCode;
use bookden::config::jwt::JwtConfig;
use bookden::modules::auth::model::Claims;
use bookden::utils::jwt::{create_access_token, verify_token};
use uuid::Uuid;

fn get_test_jwt_config() -> JwtConfig {
    JwtConfig {
        secret: "test_secret_key_for_testing_purposes".to_string(),
        access_token_expiry: 3600,
    }
}

fn encode_claims(claims: &Claims, config: &JwtConfig) -> String {
    jsonwebtoken::encode(
        &jsonwebtoken::Header::default(),
        claims,
        &jsonwebtoken::EncodingKey::from_secret(config.secret.as_bytes()),
    )
    .unwrap()
}

#[test]
fn test_create_access_token_success() {
    let jwt_config = get_test_jwt_config();
    let user_id = Uuid::new_v4();

    let result = create_access_token(user_id, &jwt_config);

    assert!(result.is_ok());
    let token = result.unwrap();
    assert!(!token.is_empty());
}

#[test]
fn test_verify_token_success() {
    let jwt_config = get_test_jwt_config();
    let user_id = Uuid::new_v4();

    let token = create_access_token(user_id, &jwt_config).unwrap();
    let result = verify_token(&token, &jwt_config);

    assert!(result.is_ok());
    let claims = result.unwrap();
    assert_eq!(claims.sub, user_id.to_string());
}

#[test]
fn test_token_expiry_is_set() {
    let jwt_config = get_test_jwt_config();
    let user_id = Uuid::new_v4();

    let token = create_access_token(user_id, &jwt_config).unwrap();
    let claims = verify_token(&token, &jwt_config).unwrap();

    assert!(claims.exp > claims.iat);
    assert_eq!(
        claims.exp - claims.iat,
        jwt_config.access_token_expiry as usize
    );
}

#[test]
fn test_verify_token_wrong_secret() {
    let jwt_config = get_test_jwt_config();
    let user_id = Uuid::new_v4();

    let token = create_access_token(user_id, &jwt_config).unwrap();

    let wrong_jwt_config = JwtConfig {
        secret: "different_secret_key".to_string(),
        access_token_expiry: 3600,
    };

    let result = verify_token(&token, &wrong_jwt_config);

    assert!(result.is_err());
}

#[test]
fn test_verify_token_invalid() {
    let jwt_config = get_test_jwt_config();
    let invalid_token = "invalid.token.here";

    let result = verify_token(invalid_token, &jwt_config);

    assert!(result.is_err());
    let err = result.unwrap_err();
    assert_eq!(err.status, StatusCode::UNAUTHORIZED);
    assert_eq!(err.error.to_string(), "Invalid Token");
}

#[test]
fn test_verify_token_empty() {
    let jwt_config = get_test_jwt_config();

    let result = verify_token("", &jwt_config);

    assert!(result.is_err());
}

#[test]
fn test_verify_token_malformed() {
    let jwt_config = get_test_jwt_config();
    let malformed_tokens = vec![
        "not.enough.parts",
        "too.many.parts.here.extra",
        "!!!.invalid.chars",
        "header.payload.",
        ".payload.signature",
    ];

    for token in malformed_tokens {
        let result = verify_token(token, &jwt_config);
        assert!(result.is_err());
    }
}

#[test]
fn test_expired_token_reports_expiry() {
    let jwt_config = get_test_jwt_config();
    let now = chrono::Utc::now().timestamp() as usize;

    let claims = Claims {
        sub: Uuid::new_v4().to_string(),
        exp: now - 60,
        iat: now - 3660,
    };
    let token = encode_claims(&claims, &jwt_config);

    let result = verify_token(&token, &jwt_config);

    assert!(result.is_err());
    let err = result.unwrap_err();
    assert_eq!(err.status, StatusCode::UNAUTHORIZED);
    assert_eq!(err.error.to_string(), "Token Expired");
}

#[test]
fn test_token_accepted_just_before_expiry() {
    let jwt_config = get_test_jwt_config();
    let now = chrono::Utc::now().timestamp() as usize;

    // Issued 59 minutes ago, valid for one hour.
    let iat = now - 3540;
    let claims = Claims {
        sub: Uuid::new_v4().to_string(),
        exp: iat + 3600,
        iat,
    };
    let token = encode_claims(&claims, &jwt_config);

    assert!(verify_token(&token, &jwt_config).is_ok());
}

#[test]
fn test_token_rejected_just_after_expiry() {
    let jwt_config = get_test_jwt_config();
    let now = chrono::Utc::now().timestamp() as usize;

    // Issued 61 minutes ago; there is no leeway past the hour.
    let iat = now - 3660;
    let claims = Claims {
        sub: Uuid::new_v4().to_string(),
        exp: iat + 3600,
        iat,
    };
    let token = encode_claims(&claims, &jwt_config);

    let result = verify_token(&token, &jwt_config);

    assert!(result.is_err());
    assert_eq!(result.unwrap_err().error.to_string(), "Token Expired");
}

#[test]
fn test_create_token_different_users_different_tokens() {
    let jwt_config = get_test_jwt_config();
    let user_id1 = Uuid::new_v4();
    let user_id2 = Uuid::new_v4();

    let token1 = create_access_token(user_id1, &jwt_config).unwrap();
    let token2 = create_access_token(user_id2, &jwt_config).unwrap();

    assert_ne!(token1, token2);

    let claims1 = verify_token(&token1, &jwt_config).unwrap();
    let claims2 = verify_token(&token2, &jwt_config).unwrap();

    assert_eq!(claims1.sub, user_id1.to_string());
    assert_eq!(claims2.sub, user_id2.to_string());
}
