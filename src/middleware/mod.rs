/*
 * Responsibility
 * - Router-level layers (http plumbing, CORS, security headers)
 * - The per-route permission guard
 */
pub mod auth;
pub mod cors;
pub mod http;
pub mod security_headers;
