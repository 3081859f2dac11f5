//! Unit tests for JWT functionality.

use chrono::{Duration, Utc};
use jsonwebtoken::{EncodingKey, Header, encode};
use uuid::Uuid;

use crate::auth::Claims;
use crate::jwt::{JwtConfig, JwtError, JwtService};

fn create_test_service() -> JwtService {
    JwtService::new(JwtConfig {
        secret: "test-secret-key-for-testing".to_string(),
        access_token_expires_minutes: 15,
    })
}

#[test]
fn test_issue_and_validate_token() {
    let service = create_test_service();
    let user_id = Uuid::new_v4();
    let tenant_id = Uuid::new_v4();
    let workspace_id = Uuid::new_v4();

    let token = service
        .issue_token(user_id, tenant_id, workspace_id, "admin")
        .unwrap();
    let claims = service.validate_token(&token).unwrap();

    assert_eq!(claims.user_id(), user_id);
    assert_eq!(claims.tenant, tenant_id);
    assert_eq!(claims.workspace, workspace_id);
    assert_eq!(claims.role, "admin");
}

#[test]
fn test_invalid_token() {
    let service = create_test_service();
    let result = service.validate_token("invalid.token.here");
    assert!(matches!(result, Err(JwtError::DecodingError(_))));
}

#[test]
fn test_token_signed_with_other_secret_is_rejected() {
    let other = JwtService::new(JwtConfig {
        secret: "another-secret".to_string(),
        access_token_expires_minutes: 15,
    });
    let token = other
        .issue_token(Uuid::new_v4(), Uuid::new_v4(), Uuid::new_v4(), "viewer")
        .unwrap();

    assert!(create_test_service().validate_token(&token).is_err());
}

#[test]
fn test_expired_token() {
    let service = create_test_service();
    let claims = Claims::new(
        Uuid::new_v4(),
        Uuid::new_v4(),
        Uuid::new_v4(),
        "viewer",
        Utc::now() - Duration::hours(2),
    );
    let token = encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(b"test-secret-key-for-testing"),
    )
    .unwrap();

    assert!(matches!(
        service.validate_token(&token),
        Err(JwtError::Expired)
    ));
}

#[test]
fn test_expires_in_seconds() {
    assert_eq!(create_test_service().access_token_expires_in(), 900);
}
