//! Unit tests for JWT functionality.

#[cfg(test)]
mod tests {
    use crate::auth::SessionClaims;
    use crate::jwt::{JwtError, JwtService, TOKEN_VALIDITY_HOURS};
    use chrono::{Duration, Utc};
    use jsonwebtoken::{Algorithm, EncodingKey, Header, encode};
    use serde_json::json;

    const SECRET: &str = "test-secret-key-for-testing";

    fn sign(claims: &serde_json::Value, algorithm: Algorithm, secret: &str) -> String {
        encode(
            &Header::new(algorithm),
            claims,
            &EncodingKey::from_secret(secret.as_bytes()),
        )
        .unwrap()
    }

    #[test]
    fn test_issue_and_validate_round_trip() {
        let service = JwtService::new(SECRET);

        let token = service.issue_token(11_111_111).unwrap();
        let claims = service.validate_token(&token).unwrap();

        assert_eq!(claims.account_number(), Some(11_111_111));
    }

    #[test]
    fn test_token_expires_after_24_hours() {
        let service = JwtService::new(SECRET);
        let before = Utc::now();

        let token = service.issue_token(42).unwrap();
        let claims = service.validate_token(&token).unwrap();

        let expected = (before + Duration::hours(TOKEN_VALIDITY_HOURS)).timestamp();
        assert!((claims.exp - expected).abs() <= 2);
        assert_eq!(claims.expires_at, claims.exp);
        assert!(claims.iat >= before.timestamp());
    }

    #[test]
    fn test_missing_secret_cannot_sign() {
        let service = JwtService::new("");
        assert!(matches!(
            service.issue_token(11_111_111),
            Err(JwtError::MissingSecret)
        ));
    }

    #[test]
    fn test_missing_secret_cannot_validate() {
        let token = JwtService::new(SECRET).issue_token(1).unwrap();
        assert!(matches!(
            JwtService::new("").validate_token(&token),
            Err(JwtError::MissingSecret)
        ));
    }

    #[test]
    fn test_token_from_other_secret_rejected() {
        let token = JwtService::new("some-other-secret").issue_token(11_111_111).unwrap();
        let result = JwtService::new(SECRET).validate_token(&token);
        assert!(matches!(result, Err(JwtError::Invalid)));
    }

    #[test]
    fn test_token_with_other_algorithm_rejected() {
        let exp = (Utc::now() + Duration::hours(1)).timestamp();
        let token = sign(
            &json!({ "accountNumber": 11_111_111, "exp": exp }),
            Algorithm::HS512,
            SECRET,
        );

        let result = JwtService::new(SECRET).validate_token(&token);
        assert!(matches!(result, Err(JwtError::Invalid)));
    }

    #[test]
    fn test_expired_token_rejected() {
        let exp = (Utc::now() - Duration::hours(2)).timestamp();
        let token = sign(
            &json!({ "accountNumber": 11_111_111, "exp": exp }),
            Algorithm::HS256,
            SECRET,
        );

        let result = JwtService::new(SECRET).validate_token(&token);
        assert!(matches!(result, Err(JwtError::Expired)));
    }

    #[test]
    fn test_token_without_exp_rejected() {
        let token = sign(
            &json!({ "accountNumber": 11_111_111 }),
            Algorithm::HS256,
            SECRET,
        );

        assert!(JwtService::new(SECRET).validate_token(&token).is_err());
    }

    #[test]
    fn test_malformed_token_rejected() {
        let result = JwtService::new(SECRET).validate_token("invalid.token.here");
        assert!(matches!(result, Err(JwtError::DecodingError(_))));
    }

    #[test]
    fn test_float_encoded_claim_still_verifies() {
        let exp = (Utc::now() + Duration::hours(1)).timestamp();
        let token = sign(
            &json!({ "accountNumber": 11_111_112.0, "expiresAt": exp, "exp": exp }),
            Algorithm::HS256,
            SECRET,
        );

        let claims: SessionClaims = JwtService::new(SECRET).validate_token(&token).unwrap();
        assert_eq!(claims.account_number(), Some(11_111_112));
    }

    #[test]
    fn test_debug_hides_keys() {
        let rendered = format!("{:?}", JwtService::new(SECRET));
        assert!(!rendered.contains(SECRET));
    }
}
