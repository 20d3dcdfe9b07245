//! Client Module
//!
//! Blocking TCP client for RCON servers.
//!
//! ## Model
//! - One connection per session, owned exclusively
//! - One request in flight at a time (strict request/response)
//! - No automatic retries; callers reconnect explicitly

mod connection;
mod session;

pub use connection::Connection;
pub use session::Session;
