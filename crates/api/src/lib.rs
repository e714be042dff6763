//! HaoSenYi content API server library.
//!
//! Exposes the building blocks (config, state, error handling, routes,
//! upload storage) so integration tests, the server binary, and the seed
//! binary can all reach them.

pub mod auth;
pub mod config;
pub mod error;
pub mod extract;
pub mod handlers;
pub mod middleware;
pub mod response;
pub mod router;
pub mod routes;
pub mod seed;
pub mod state;
pub mod telemetry;
pub mod upload;
pub mod validation;
