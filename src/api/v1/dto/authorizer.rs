/*
 * Responsibility
 * - Custom authorizer event as sent by the gateway
 * - The response is services::auth::AuthorizationDecision serialized as-is
 */
use serde::Deserialize;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthorizerRequest {
    #[serde(default, rename = "type")]
    pub event_type: Option<String>,
    #[serde(default)]
    pub authorization_token: Option<String>,
    #[serde(default)]
    pub method_arn: Option<String>,
}
