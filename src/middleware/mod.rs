/*
 * Responsibility
 * - Router-level middleware (auth, CORS, HTTP plumbing, security headers)
 */
pub mod auth;
pub mod cors;
pub mod http;
pub mod security_headers;
