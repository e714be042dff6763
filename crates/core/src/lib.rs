//! Domain building blocks shared by the database and HTTP layers.
//!
//! Nothing in here talks to the network or the database, so every module
//! can be unit tested in isolation.

pub mod error;
pub mod pagination;
pub mod slug;
pub mod types;
pub mod upload;
