//! Ingress defaults and well-known values

/// `source` stamped on messages when none is configured
pub const DEFAULT_SOURCE_NAME: &str = "http";

/// `target` stamped on every ingress message
pub const TARGET_NAME: &str = "runtime";

pub const DEFAULT_BIND_ADDRESS: &str = "127.0.0.1";
pub const DEFAULT_PORT: u16 = 8080;

/// Path prefix of the delivery route: `POST /messages/{type}`
pub const MESSAGES_PATH: &str = "messages";

/// Error bodies returned to HTTP callers
pub mod errors {
    pub const MISSING_TYPE: &str = "Missing message type";
    pub const INVALID_TYPE: &str = "Invalid message type";
    pub const INVALID_BODY: &str = "Invalid JSON body";
    pub const DELIVERY_FAILED: &str = "Failed to deliver message";
}
