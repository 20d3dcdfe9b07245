//! # rconkit
//!
//! A blocking client for the Source/Minecraft RCON protocol:
//! - Little-endian binary packet codec with the 1460-byte size ceiling
//! - Password handshake with bad-auth (-1) detection
//! - Synchronous command/response exchange
//! - Explicit reconnect that reuses the stored credential
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                         Session                              │
//! │         (connect / authenticate / command / reconnect)       │
//! └─────────────────────┬───────────────────────────────────────┘
//!                       │
//! ┌─────────────────────▼───────────────────────────────────────┐
//! │                       Connection                             │
//! │              (TcpStream, buffered read/write)                │
//! └─────────────────────┬───────────────────────────────────────┘
//!                       │
//! ┌─────────────────────▼───────────────────────────────────────┐
//! │                     Packet Codec                             │
//! │            (size | id | type | body | 0x00 0x00)             │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Example
//!
//! ```no_run
//! use rconkit::Session;
//!
//! let mut session = Session::connect("127.0.0.1", 25575, "secret")?;
//! let players = session.send_command("list")?;
//! println!("{}", players);
//! # Ok::<(), rconkit::RconError>(())
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod config;

pub mod protocol;
pub mod client;

// =============================================================================
// Public API Re-exports
// =============================================================================

pub use error::{RconError, Result};
pub use config::ClientConfig;
pub use client::Session;

// =============================================================================
// Version Info
// =============================================================================

/// Current version of rconkit
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
