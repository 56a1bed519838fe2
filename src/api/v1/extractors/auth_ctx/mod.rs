/*!
 * Authentication context extractor
 *
 * Responsibility:
 * - Hand the verified caller (AuthCtx) to handlers
 * - axum plumbing lives in core, the type itself in types
 */

mod core;
mod types;

pub use self::core::AuthCtxExtractor;
pub use self::types::AuthCtx;
