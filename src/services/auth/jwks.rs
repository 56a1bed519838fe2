//! Signing-key resolution against the identity provider's JSON Web Key Set.
//!
//! Keys are fetched on every resolution. A provider that is slow or down
//! surfaces as `AuthError::KeyFetch`, bounded by the client timeout.

use std::fmt;
use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;
use url::Url;

use super::AuthError;

/// Key set document as published at the provider's `jwks.json` endpoint.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct JwkSet {
    #[serde(default)]
    pub keys: Vec<JwkRecord>,
}

/// One published key. Only the fields used for selection are modelled; the
/// RSA modulus/exponent are ignored in favour of the certificate chain.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct JwkRecord {
    #[serde(default)]
    pub kid: Option<String>,
    #[serde(default, rename = "use")]
    pub key_use: Option<String>,
    #[serde(default)]
    pub kty: Option<String>,
    // `null` and absent both mean "no chain"
    #[serde(default)]
    pub x5c: Option<Vec<String>>,
    #[serde(default)]
    pub nbf: Option<i64>,
}

/// A usable verification key: the first certificate of a candidate's chain in
/// PEM form.
#[derive(Clone, PartialEq, Eq)]
pub struct SigningKey {
    pub kid: String,
    pub nbf: Option<i64>,
    pub public_key_pem: String,
}

impl fmt::Debug for SigningKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SigningKey")
            .field("kid", &self.kid)
            .field("nbf", &self.nbf)
            .finish_non_exhaustive()
    }
}

/// Where verification keys come from.
///
/// Implementations must be cheap to share (`Arc<dyn KeySource>`).
#[async_trait]
pub trait KeySource: Send + Sync {
    async fn resolve(&self, kid: &str) -> Result<SigningKey, AuthError>;
}

/// Wrap a base64 DER certificate (an `x5c` entry) into PEM.
pub fn certificate_to_pem(cert: &str) -> String {
    let chars: Vec<char> = cert.chars().collect();
    let body = chars
        .chunks(64)
        .map(|line| line.iter().collect::<String>())
        .collect::<Vec<_>>()
        .join("\n");

    format!("-----BEGIN CERTIFICATE-----\n{body}\n-----END CERTIFICATE-----\n")
}

fn is_candidate(record: &JwkRecord) -> bool {
    record.key_use.as_deref() == Some("sig")
        && record.kty.as_deref() == Some("RSA")
        && record.kid.as_deref().is_some_and(|kid| !kid.is_empty())
        && record.x5c.as_ref().is_some_and(|chain| !chain.is_empty())
}

/// Keys from the set that can verify RS256 signatures.
pub fn signing_keys(set: &JwkSet) -> Vec<SigningKey> {
    set.keys
        .iter()
        .filter(|record| is_candidate(record))
        .filter_map(|record| {
            Some(SigningKey {
                kid: record.kid.clone()?,
                nbf: record.nbf,
                public_key_pem: certificate_to_pem(record.x5c.as_ref()?.first()?),
            })
        })
        .collect()
}

/// Pick the signing key whose `kid` matches exactly.
pub fn select_signing_key(set: &JwkSet, kid: &str) -> Result<SigningKey, AuthError> {
    let candidates = signing_keys(set);
    if candidates.is_empty() {
        tracing::warn!("key set contains no usable signing keys");
        return Err(AuthError::NoMatchingKey);
    }

    candidates
        .into_iter()
        .find(|key| key.kid == kid)
        .ok_or(AuthError::NoMatchingKey)
}

/// HTTP-backed `KeySource` hitting the provider on every call.
#[derive(Clone)]
pub struct JwksClient {
    http: reqwest::Client,
    url: Url,
}

impl fmt::Debug for JwksClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("JwksClient")
            .field("url", &self.url.as_str())
            .finish()
    }
}

impl JwksClient {
    pub fn new(url: Url, timeout: Duration) -> Result<Self, AuthError> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| AuthError::KeyFetch(e.to_string()))?;

        Ok(Self { http, url })
    }

    pub async fn fetch(&self) -> Result<JwkSet, AuthError> {
        let response = self
            .http
            .get(self.url.clone())
            .header(reqwest::header::ACCEPT, "application/json")
            .send()
            .await
            .map_err(|e| fetch_error(&e))?
            .error_for_status()
            .map_err(|e| fetch_error(&e))?;

        response.json::<JwkSet>().await.map_err(|e| fetch_error(&e))
    }
}

fn fetch_error(e: &reqwest::Error) -> AuthError {
    if e.is_timeout() {
        AuthError::KeyFetch("timed out".to_string())
    } else if let Some(status) = e.status() {
        AuthError::KeyFetch(format!("provider responded with {status}"))
    } else if e.is_decode() {
        AuthError::KeyFetch("undecodable key set".to_string())
    } else {
        AuthError::KeyFetch(e.to_string())
    }
}

#[async_trait]
impl KeySource for JwksClient {
    async fn resolve(&self, kid: &str) -> Result<SigningKey, AuthError> {
        let set = self.fetch().await?;
        let key = select_signing_key(&set, kid)?;
        tracing::debug!(kid = %key.kid, "signing key resolved");
        Ok(key)
    }
}
