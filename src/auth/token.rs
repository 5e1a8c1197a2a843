use crate::error::AppError;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

/// How long an issued token stays valid.
const TOKEN_TTL_MINUTES: i64 = 30;

/// Signing and verification keys, built once from the configured secret at
/// startup and shared with handlers and middleware via `web::Data`.
#[derive(Clone)]
pub struct TokenKeys {
    encoding: EncodingKey,
    decoding: DecodingKey,
}

impl TokenKeys {
    pub fn from_secret(secret: &str) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
        }
    }
}

/// Claims encoded within an issued JWT. The token is the only credential the
/// server recognizes; no session state is kept server-side.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    /// Subject: the user's unique identifier.
    pub sub: i32,
    /// Username the token was issued for.
    pub user_name: String,
    /// Issued-at timestamp (seconds since epoch).
    pub iat: usize,
    /// Expiration timestamp (seconds since epoch).
    pub exp: usize,
}

/// Generates a signed HS256 token for a user.
///
/// The token expires after [`TOKEN_TTL_MINUTES`].
pub fn generate_token(keys: &TokenKeys, user_id: i32, user_name: &str) -> Result<String, AppError> {
    let now = chrono::Utc::now();
    let expiration = now
        .checked_add_signed(chrono::Duration::minutes(TOKEN_TTL_MINUTES))
        .ok_or_else(|| AppError::InternalServerError("Token expiry out of range".into()))?
        .timestamp() as usize;

    let claims = Claims {
        sub: user_id,
        user_name: user_name.to_string(),
        iat: now.timestamp() as usize,
        exp: expiration,
    };

    encode(&Header::new(Algorithm::HS256), &claims, &keys.encoding)
        .map_err(|e| AppError::InternalServerError(format!("Failed to generate token: {}", e)))
}

/// Verifies a JWT string and decodes its claims.
///
/// The accepted algorithm is pinned to HS256: a token whose header asserts any
/// other algorithm is rejected regardless of its signature. Expired or
/// malformed tokens fail the same way. All failures map to `Forbidden`, since
/// the caller presented a credential that does not check out.
pub fn verify_token(keys: &TokenKeys, token: &str) -> Result<Claims, AppError> {
    decode::<Claims>(token, &keys.decoding, &Validation::new(Algorithm::HS256))
        .map(|data| data.claims)
        .map_err(|e| AppError::Forbidden(format!("Token not valid: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_generation_and_verification() {
        let keys = TokenKeys::from_secret("test_secret_for_gen_verify");
        let token = generate_token(&keys, 1, "alice").unwrap();
        let claims = verify_token(&keys, &token).unwrap();
        assert_eq!(claims.sub, 1);
        assert_eq!(claims.user_name, "alice");
        assert!(claims.exp > claims.iat);
    }

    #[test]
    fn test_token_expiration() {
        let keys = TokenKeys::from_secret("test_secret_for_expiration");
        let now = chrono::Utc::now().timestamp() as usize;

        let claims_expired = Claims {
            sub: 2,
            user_name: "bob".to_string(),
            iat: now - 7200,
            exp: now - 3600,
        };
        let expired_token = encode(
            &Header::new(Algorithm::HS256),
            &claims_expired,
            &EncodingKey::from_secret("test_secret_for_expiration".as_bytes()),
        )
        .unwrap();

        match verify_token(&keys, &expired_token) {
            Err(AppError::Forbidden(msg)) => {
                assert!(
                    msg.contains("ExpiredSignature"),
                    "Unexpected error message for expired token: {}",
                    msg
                );
            }
            Ok(_) => panic!("Token should have been invalid due to expiration"),
            Err(e) => panic!("Unexpected error type for expired token: {:?}", e),
        }
    }

    #[test]
    fn test_invalid_token_signature() {
        let keys = TokenKeys::from_secret("a_completely_different_secret");
        let other_keys = TokenKeys::from_secret("the_secret_the_token_was_signed_with");
        let token = generate_token(&other_keys, 3, "mallory").unwrap();

        match verify_token(&keys, &token) {
            Err(AppError::Forbidden(msg)) => {
                assert!(
                    msg.contains("InvalidSignature") || msg.contains("InvalidToken"),
                    "Unexpected error message for invalid signature: {}",
                    msg
                );
            }
            Ok(_) => panic!("Token should have been invalid due to signature mismatch"),
            Err(e) => panic!("Unexpected error type for invalid signature: {:?}", e),
        }
    }

    #[test]
    fn test_wrong_algorithm_is_rejected() {
        // A token signed with the right secret but a different HMAC variant
        // must not verify; the accepted algorithm is pinned.
        let secret = "pinned_algorithm_secret";
        let keys = TokenKeys::from_secret(secret);
        let now = chrono::Utc::now().timestamp() as usize;
        let claims = Claims {
            sub: 4,
            user_name: "eve".to_string(),
            iat: now,
            exp: now + 600,
        };
        let hs384_token = encode(
            &Header::new(Algorithm::HS384),
            &claims,
            &EncodingKey::from_secret(secret.as_bytes()),
        )
        .unwrap();

        assert!(verify_token(&keys, &hs384_token).is_err());
    }
}
