/*
 * Responsibility
 * - middlware の公開インターフェース (re-export)
 * - auth::access::apply(...), http::apply(...)
 */
pub mod auth;
pub mod http;
