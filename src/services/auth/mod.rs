pub mod authorizer;
pub mod bearer;
pub mod error;
pub mod factory;
pub mod jwks;
pub mod verifier;

#[cfg(test)]
pub mod testutil;

pub use authorizer::{AuthorizationDecision, Authorizer};
pub use error::AuthError;
pub use factory::build_authorizer;
pub use jwks::JwksClient;
pub use verifier::{TokenVerifier, VerifierPolicy};
