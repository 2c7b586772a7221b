//! Credential store: registers identities and authenticates them, issuing
//! signed session tokens on success.

pub mod config;
pub mod domain;
pub mod outbound;
pub mod telemetry;

pub use domain::identity;
pub use outbound::repositories;
