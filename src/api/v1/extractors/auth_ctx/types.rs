/*
 * Responsibility
 * - The "verified caller" type handlers see
 * - The access middleware verifies the bearer token and stores this in request extensions
 */

/// Context attached to an authenticated request.
///
/// - `user_id` is the token `sub`; every store call is scoped by it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthCtx {
    pub user_id: String,
}

impl AuthCtx {
    pub fn new(user_id: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
        }
    }
}
