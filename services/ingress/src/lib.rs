//! HTTP Ingress
//!
//! Adapter that turns `POST /messages/{type}` requests into mailbox runtime
//! messages. It stamps id, source, target and timestamp, calls `deliver()`,
//! and answers `202 Accepted` without waiting for any actor.

pub mod actors;
pub mod config;
pub mod constants;
pub mod error;
pub mod factory;
pub mod routes;
pub mod server;

pub use actors::LoggingActor;
pub use config::{ActorsConfig, IngressConfig, MessageDefaults, ServerConfig};
pub use error::{IngressError, Result};
pub use factory::MessageFactory;
pub use server::IngressServer;
