//! Request guards and cross-cutting response middleware.
//!
//! - [`auth::AuthAdmin`] -- Extracts the authenticated admin from a JWT Bearer token.
//! - [`security`] -- Security response headers applied to every route.
//! - [`errors`] -- Development-mode error detail and panic recovery.

pub mod auth;
pub mod errors;
pub mod security;
