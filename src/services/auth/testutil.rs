//! Test fixtures: RSA key pairs with self-signed certificates (see `testdata/`)
//! and helpers to mint tokens against them.

use std::sync::Arc;

use async_trait::async_trait;
use base64::Engine as _;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use jsonwebtoken::{Algorithm, EncodingKey, Header};
use serde::Serialize;
use serde_json::{Value, json};

use super::jwks::{JwkSet, KeySource, SigningKey, select_signing_key};
use super::verifier::{TokenVerifier, VerifierPolicy};
use super::{AuthError, Authorizer};

pub const PRIMARY_KID: &str = "primary-2024";
pub const ROTATED_KID: &str = "rotated-2025";

pub const PRIMARY_KEY_PEM: &str = include_str!("../../../testdata/primary_key.pem");
pub const PRIMARY_CERT_PEM: &str = include_str!("../../../testdata/primary_cert.pem");
pub const ROTATED_KEY_PEM: &str = include_str!("../../../testdata/rotated_key.pem");
pub const ROTATED_CERT_PEM: &str = include_str!("../../../testdata/rotated_cert.pem");

const PRIMARY_X5C: &str = include_str!("../../../testdata/primary_x5c.txt");
const ROTATED_X5C: &str = include_str!("../../../testdata/rotated_x5c.txt");

pub fn primary_x5c() -> String {
    PRIMARY_X5C.trim().to_string()
}

pub fn rotated_x5c() -> String {
    ROTATED_X5C.trim().to_string()
}

/// A provider document publishing the given `(kid, x5c)` pairs as RSA
/// signing keys, plus an encryption key that must never be picked.
pub fn jwk_set_json(keys: &[(&str, String)]) -> Value {
    let mut records: Vec<Value> = keys
        .iter()
        .map(|(kid, x5c)| {
            json!({
                "alg": "RS256",
                "kty": "RSA",
                "use": "sig",
                "kid": kid,
                "x5c": [x5c],
            })
        })
        .collect();
    records.push(json!({
        "kty": "RSA",
        "use": "enc",
        "kid": "encryption-only",
        "x5c": [primary_x5c()],
    }));

    json!({ "keys": records })
}

/// In-process `KeySource` over a fixed key set.
pub struct StaticKeySource {
    set: Result<JwkSet, String>,
}

impl StaticKeySource {
    pub fn new(set: JwkSet) -> Self {
        Self { set: Ok(set) }
    }

    pub fn failing(reason: &str) -> Self {
        Self {
            set: Err(reason.to_string()),
        }
    }
}

#[async_trait]
impl KeySource for StaticKeySource {
    async fn resolve(&self, kid: &str) -> Result<SigningKey, AuthError> {
        match &self.set {
            Ok(set) => select_signing_key(set, kid),
            Err(reason) => Err(AuthError::KeyFetch(reason.clone())),
        }
    }
}

/// Both fixture keys published under their kids.
pub fn static_keys() -> Arc<dyn KeySource> {
    let set = serde_json::from_value(jwk_set_json(&[
        (PRIMARY_KID, primary_x5c()),
        (ROTATED_KID, rotated_x5c()),
    ]))
    .expect("fixture key set");

    Arc::new(StaticKeySource::new(set))
}

pub fn test_authorizer() -> Authorizer {
    Authorizer::new(TokenVerifier::new(static_keys(), VerifierPolicy::default()))
}

pub fn now() -> u64 {
    chrono::Utc::now().timestamp() as u64
}

/// Standard claims for `sub`, expiring `exp_offset` seconds from now.
pub fn claims_for(sub: &str, exp_offset: i64) -> Value {
    json!({
        "iss": "https://idp.example.com/",
        "sub": sub,
        "iat": now(),
        "exp": now().saturating_add_signed(exp_offset),
    })
}

pub fn sign_rs256<T: Serialize>(private_key_pem: &str, kid: &str, claims: &T) -> String {
    let mut header = Header::new(Algorithm::RS256);
    header.kid = Some(kid.to_string());
    let key = EncodingKey::from_rsa_pem(private_key_pem.as_bytes()).expect("fixture private key");
    jsonwebtoken::encode(&header, claims, &key).expect("sign fixture token")
}

/// `alg: none` token with an empty signature segment.
pub fn unsigned_token<T: Serialize>(kid: &str, claims: &T) -> String {
    let header = json!({ "alg": "none", "typ": "JWT", "kid": kid });
    let encode = |value: Value| URL_SAFE_NO_PAD.encode(value.to_string());

    format!(
        "{}.{}.",
        encode(header),
        encode(serde_json::to_value(claims).expect("claims"))
    )
}

pub fn bearer(token: &str) -> String {
    format!("Bearer {token}")
}
