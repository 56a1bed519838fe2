//! Factory: build the `Authorizer` from application `Config`.
use std::sync::Arc;
use std::time::Duration;

use crate::config::Config;
use crate::services::auth::{
    AuthError, Authorizer, JwksClient, TokenVerifier, VerifierPolicy,
};

pub fn build_authorizer(config: &Config) -> Result<Arc<Authorizer>, AuthError> {
    let keys = JwksClient::new(
        config.jwks_url.clone(),
        Duration::from_secs(config.jwks_timeout_seconds),
    )?;

    let verifier = TokenVerifier::new(
        Arc::new(keys),
        VerifierPolicy {
            leeway_seconds: config.token_leeway_seconds,
            issuer: config.auth_issuer.clone(),
            audience: config.auth_audience.clone(),
        },
    );

    Ok(Arc::new(Authorizer::new(verifier)))
}
