//! Allow/deny decision for an incoming `Authorization` header.
//!
//! The decision document follows the API-gateway custom authorizer shape so
//! the same value can be returned from `/authorize` or consumed by the access
//! middleware.

use serde::Serialize;

use super::bearer::extract_bearer_token;
use super::verifier::{TokenClaims, TokenVerifier};
use super::AuthError;

const POLICY_VERSION: &str = "2012-10-17";
const INVOKE_ACTION: &str = "execute-api:Invoke";
const DENIED_PRINCIPAL: &str = "user";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Effect {
    Allow,
    Deny,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct PolicyStatement {
    pub action: String,
    pub effect: Effect,
    pub resource: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct PolicyDocument {
    pub version: String,
    pub statement: Vec<PolicyStatement>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthorizationDecision {
    pub principal_id: String,
    pub policy_document: PolicyDocument,
}

impl AuthorizationDecision {
    fn with_effect(principal_id: String, effect: Effect) -> Self {
        Self {
            principal_id,
            policy_document: PolicyDocument {
                version: POLICY_VERSION.to_string(),
                statement: vec![PolicyStatement {
                    action: INVOKE_ACTION.to_string(),
                    effect,
                    resource: "*".to_string(),
                }],
            },
        }
    }

    pub fn allow(principal_id: impl Into<String>) -> Self {
        Self::with_effect(principal_id.into(), Effect::Allow)
    }

    /// Deny carries a placeholder principal, never claim data.
    pub fn deny() -> Self {
        Self::with_effect(DENIED_PRINCIPAL.to_string(), Effect::Deny)
    }

    pub fn effect(&self) -> Effect {
        self.policy_document
            .statement
            .first()
            .map(|s| s.effect)
            .unwrap_or(Effect::Deny)
    }

    /// The verified user id, only when the decision allows the call.
    pub fn allowed_principal(&self) -> Option<&str> {
        match self.effect() {
            Effect::Allow => Some(self.principal_id.as_str()),
            Effect::Deny => None,
        }
    }
}

#[derive(Debug)]
pub struct Authorizer {
    verifier: TokenVerifier,
}

impl Authorizer {
    pub fn new(verifier: TokenVerifier) -> Self {
        Self { verifier }
    }

    /// Extract + verify, keeping the reason on failure.
    pub async fn authenticate(&self, header: Option<&str>) -> Result<TokenClaims, AuthError> {
        let token = extract_bearer_token(header)?;
        self.verifier.verify(token).await
    }

    /// Never fails: every error path becomes a well-formed Deny.
    pub async fn authorize(&self, header: Option<&str>) -> AuthorizationDecision {
        match self.authenticate(header).await {
            Ok(claims) => {
                tracing::info!(user_id = %claims.sub, "user was authorized");
                AuthorizationDecision::allow(claims.sub)
            }
            Err(err) => {
                tracing::warn!(
                    reason = err.kind(),
                    verification_failure = err.is_verification_failure(),
                    error = %err,
                    "user not authorized"
                );
                AuthorizationDecision::deny()
            }
        }
    }
}
