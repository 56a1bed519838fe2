//! Bearer token verification: decode → resolve key → verify.
//!
//! Each stage returns a typed `AuthError`; nothing is trusted until the last
//! stage succeeds.

use std::fmt;
use std::sync::Arc;

use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{Algorithm, DecodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use super::AuthError;
use super::jwks::{KeySource, SigningKey};

/// The only accepted signing algorithm.
pub const ACCEPTED_ALGORITHM: Algorithm = Algorithm::RS256;

/// Claims of a verified token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenClaims {
    pub sub: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub iss: Option<String>,
    pub exp: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub iat: Option<u64>,
}

/// Claim checks on top of the signature.
#[derive(Debug, Clone, Default)]
pub struct VerifierPolicy {
    pub leeway_seconds: u64,
    pub issuer: Option<String>,
    pub audience: Option<String>,
}

/// Header fields needed to pick a key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnverifiedHeader {
    pub alg: Algorithm,
    pub kid: String,
}

pub struct TokenVerifier {
    keys: Arc<dyn KeySource>,
    validation: Validation,
}

impl fmt::Debug for TokenVerifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenVerifier")
            .field("validation", &self.validation)
            .finish_non_exhaustive()
    }
}

impl TokenVerifier {
    pub fn new(keys: Arc<dyn KeySource>, policy: VerifierPolicy) -> Self {
        let mut validation = Validation::new(ACCEPTED_ALGORITHM);
        validation.leeway = policy.leeway_seconds;
        validation.set_required_spec_claims(&["exp", "sub"]);

        if let Some(issuer) = &policy.issuer {
            validation.set_issuer(&[issuer]);
        }
        match &policy.audience {
            Some(audience) => validation.set_audience(&[audience]),
            None => validation.validate_aud = false,
        }

        Self { keys, validation }
    }

    pub async fn verify(&self, token: &str) -> Result<TokenClaims, AuthError> {
        let header = decode_unverified(token)?;
        let key = self.keys.resolve(&header.kid).await?;
        self.verify_with_key(token, &header, &key)
    }

    fn verify_with_key(
        &self,
        token: &str,
        header: &UnverifiedHeader,
        key: &SigningKey,
    ) -> Result<TokenClaims, AuthError> {
        if header.alg != ACCEPTED_ALGORITHM {
            return Err(AuthError::UnsupportedAlgorithm);
        }

        let decoding_key = DecodingKey::from_rsa_pem(key.public_key_pem.as_bytes())
            .map_err(|e| AuthError::InvalidKey(e.to_string()))?;

        let data = jsonwebtoken::decode::<TokenClaims>(token, &decoding_key, &self.validation)
            .map_err(map_jwt_error)?;

        if data.claims.sub.trim().is_empty() {
            return Err(AuthError::TokenInvalid("empty 'sub' claim".to_string()));
        }

        Ok(data.claims)
    }
}

/// Read algorithm and key id from the header without checking anything else.
pub fn decode_unverified(token: &str) -> Result<UnverifiedHeader, AuthError> {
    if token.split('.').count() != 3 {
        return Err(AuthError::InvalidTokenFormat(
            "expected three dot-separated segments".to_string(),
        ));
    }

    let Header { alg, kid, .. } = jsonwebtoken::decode_header(token)
        .map_err(|e| AuthError::InvalidTokenFormat(e.to_string()))?;

    let kid = kid
        .filter(|kid| !kid.is_empty())
        .ok_or_else(|| AuthError::InvalidTokenFormat("header has no 'kid'".to_string()))?;

    Ok(UnverifiedHeader { alg, kid })
}

fn map_jwt_error(e: jsonwebtoken::errors::Error) -> AuthError {
    match e.kind() {
        ErrorKind::ExpiredSignature => AuthError::TokenExpired,
        ErrorKind::InvalidSignature => AuthError::InvalidSignature,
        ErrorKind::InvalidAlgorithm => AuthError::UnsupportedAlgorithm,
        ErrorKind::InvalidToken | ErrorKind::Base64(_) | ErrorKind::Utf8(_) => {
            AuthError::InvalidTokenFormat(e.to_string())
        }
        _ => AuthError::TokenInvalid(e.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use jsonwebtoken::{EncodingKey, Header};
    use pretty_assertions::assert_eq;
    use rstest::rstest;
    use serde_json::json;

    use super::*;
    use crate::services::auth::testutil::{
        PRIMARY_CERT_PEM, PRIMARY_KEY_PEM, PRIMARY_KID, ROTATED_KEY_PEM, ROTATED_KID,
        StaticKeySource, claims_for, now, sign_rs256, static_keys, unsigned_token,
    };

    fn verifier() -> TokenVerifier {
        TokenVerifier::new(static_keys(), VerifierPolicy::default())
    }

    #[tokio::test]
    async fn valid_token_yields_subject() {
        let token = sign_rs256(PRIMARY_KEY_PEM, PRIMARY_KID, &claims_for("auth0|alice", 3600));

        let claims = verifier().verify(&token).await.unwrap();

        assert_eq!(claims.sub, "auth0|alice");
        assert_eq!(claims.iss.as_deref(), Some("https://idp.example.com/"));
    }

    #[tokio::test]
    async fn rotated_key_is_selected_by_kid() {
        let token = sign_rs256(ROTATED_KEY_PEM, ROTATED_KID, &claims_for("auth0|bob", 3600));

        let claims = verifier().verify(&token).await.unwrap();

        assert_eq!(claims.sub, "auth0|bob");
    }

    #[rstest]
    #[case("abc.def.ghi")]
    #[case("not-a-token")]
    #[case("only.two")]
    #[case("a.b.c.d")]
    #[case("")]
    #[tokio::test]
    async fn undecodable_tokens_are_invalid_format(#[case] token: &str) {
        let err = verifier().verify(token).await.unwrap_err();

        assert!(matches!(err, AuthError::InvalidTokenFormat(_)), "{err:?}");
    }

    #[tokio::test]
    async fn header_without_kid_is_invalid_format() {
        let mut header = Header::new(Algorithm::RS256);
        header.kid = None;
        let key = EncodingKey::from_rsa_pem(PRIMARY_KEY_PEM.as_bytes()).unwrap();
        let token = jsonwebtoken::encode(&header, &claims_for("auth0|alice", 3600), &key).unwrap();

        let err = verifier().verify(&token).await.unwrap_err();

        assert!(matches!(err, AuthError::InvalidTokenFormat(_)), "{err:?}");
    }

    #[tokio::test]
    async fn unknown_kid_has_no_matching_key() {
        let token = sign_rs256(PRIMARY_KEY_PEM, "unpublished", &claims_for("auth0|alice", 3600));

        let err = verifier().verify(&token).await.unwrap_err();

        assert_eq!(err, AuthError::NoMatchingKey);
        assert!(err.is_verification_failure());
    }

    #[tokio::test]
    async fn signature_from_another_key_is_rejected() {
        // Signed with the rotated key but claims to be the primary one.
        let token = sign_rs256(ROTATED_KEY_PEM, PRIMARY_KID, &claims_for("auth0|mallory", 3600));

        let err = verifier().verify(&token).await.unwrap_err();

        assert_eq!(err, AuthError::InvalidSignature);
    }

    #[rstest]
    #[case(Algorithm::HS256)]
    #[case(Algorithm::HS512)]
    #[tokio::test]
    async fn hmac_token_with_known_kid_is_rejected(#[case] alg: Algorithm) {
        let mut header = Header::new(alg);
        header.kid = Some(PRIMARY_KID.to_string());
        // Classic substitution: use the public certificate as the HMAC secret.
        let secret = EncodingKey::from_secret(PRIMARY_CERT_PEM.as_bytes());
        let token = jsonwebtoken::encode(&header, &claims_for("auth0|mallory", 3600), &secret).unwrap();

        let err = verifier().verify(&token).await.unwrap_err();

        assert_eq!(err, AuthError::UnsupportedAlgorithm);
    }

    #[tokio::test]
    async fn unsigned_token_is_rejected() {
        let token = unsigned_token(PRIMARY_KID, &claims_for("auth0|mallory", 3600));

        let err = verifier().verify(&token).await.unwrap_err();

        assert!(matches!(err, AuthError::InvalidTokenFormat(_)), "{err:?}");
    }

    #[tokio::test]
    async fn expired_token_is_rejected() {
        let token = sign_rs256(PRIMARY_KEY_PEM, PRIMARY_KID, &claims_for("auth0|alice", -600));

        let err = verifier().verify(&token).await.unwrap_err();

        assert_eq!(err, AuthError::TokenExpired);
    }

    #[tokio::test]
    async fn leeway_tolerates_small_clock_skew() {
        let verifier = TokenVerifier::new(
            static_keys(),
            VerifierPolicy {
                leeway_seconds: 120,
                ..VerifierPolicy::default()
            },
        );
        let token = sign_rs256(PRIMARY_KEY_PEM, PRIMARY_KID, &claims_for("auth0|alice", -30));

        assert!(verifier.verify(&token).await.is_ok());
    }

    #[tokio::test]
    async fn missing_exp_is_rejected() {
        let token = sign_rs256(PRIMARY_KEY_PEM, PRIMARY_KID, &json!({ "sub": "auth0|alice" }));

        let err = verifier().verify(&token).await.unwrap_err();

        assert!(matches!(err, AuthError::TokenInvalid(_)), "{err:?}");
    }

    #[tokio::test]
    async fn empty_subject_is_rejected() {
        let token = sign_rs256(PRIMARY_KEY_PEM, PRIMARY_KID, &claims_for("  ", 3600));

        let err = verifier().verify(&token).await.unwrap_err();

        assert!(matches!(err, AuthError::TokenInvalid(_)), "{err:?}");
    }

    #[tokio::test]
    async fn issuer_is_enforced_when_configured() {
        let verifier = TokenVerifier::new(
            static_keys(),
            VerifierPolicy {
                issuer: Some("https://other-idp.example.com/".to_string()),
                ..VerifierPolicy::default()
            },
        );
        let token = sign_rs256(PRIMARY_KEY_PEM, PRIMARY_KID, &claims_for("auth0|alice", 3600));

        let err = verifier.verify(&token).await.unwrap_err();

        assert!(matches!(err, AuthError::TokenInvalid(_)), "{err:?}");
    }

    #[tokio::test]
    async fn audience_is_ignored_unless_configured() {
        let claims = json!({
            "sub": "auth0|alice",
            "aud": "https://todo-api.example.com",
            "exp": now() + 3600,
        });
        let token = sign_rs256(PRIMARY_KEY_PEM, PRIMARY_KID, &claims);

        assert!(verifier().verify(&token).await.is_ok());

        let strict = TokenVerifier::new(
            static_keys(),
            VerifierPolicy {
                audience: Some("https://elsewhere.example.com".to_string()),
                ..VerifierPolicy::default()
            },
        );
        let err = strict.verify(&token).await.unwrap_err();
        assert!(matches!(err, AuthError::TokenInvalid(_)), "{err:?}");
    }

    #[tokio::test]
    async fn key_source_failure_is_propagated() {
        let verifier = TokenVerifier::new(
            Arc::new(StaticKeySource::failing("connection refused")),
            VerifierPolicy::default(),
        );
        let token = sign_rs256(PRIMARY_KEY_PEM, PRIMARY_KID, &claims_for("auth0|alice", 3600));

        let err = verifier.verify(&token).await.unwrap_err();

        assert_eq!(err, AuthError::KeyFetch("connection refused".to_string()));
    }

    #[test]
    fn decode_reads_alg_and_kid() {
        let token = sign_rs256(PRIMARY_KEY_PEM, PRIMARY_KID, &claims_for("auth0|alice", 3600));

        assert_eq!(
            decode_unverified(&token),
            Ok(UnverifiedHeader {
                alg: Algorithm::RS256,
                kid: PRIMARY_KID.to_string(),
            })
        );
    }
}
