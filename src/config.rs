//! Configuration for rconkit
//!
//! Connection settings with sensible defaults.

use std::time::Duration;

use crate::error::{RconError, Result};

/// Default RCON port used by Minecraft servers
pub const DEFAULT_PORT: u16 = 25575;

/// Default TCP connect timeout
pub const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// Client configuration for a single RCON session
#[derive(Debug, Clone)]
pub struct ClientConfig {
    // -------------------------------------------------------------------------
    // Remote Endpoint
    // -------------------------------------------------------------------------
    /// Server hostname or IP address
    pub host: String,

    /// RCON port
    pub port: u16,

    /// Shared secret sent in the auth handshake
    pub password: String,

    // -------------------------------------------------------------------------
    // Timeouts
    // -------------------------------------------------------------------------
    /// Bound on establishing the TCP connection
    pub connect_timeout: Duration,

    /// Read deadline for responses. `None` blocks until the server answers.
    pub read_timeout: Option<Duration>,

    /// Write deadline for requests. `None` blocks until the write completes.
    pub write_timeout: Option<Duration>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: DEFAULT_PORT,
            password: String::new(),
            connect_timeout: DEFAULT_CONNECT_TIMEOUT,
            read_timeout: None,
            write_timeout: None,
        }
    }
}

impl ClientConfig {
    /// Create a config for the given endpoint and password with default timeouts
    pub fn new(host: impl Into<String>, port: u16, password: impl Into<String>) -> Self {
        Self {
            host: host.into(),
            port,
            password: password.into(),
            ..Self::default()
        }
    }

    /// Create a new config builder
    pub fn builder() -> ClientConfigBuilder {
        ClientConfigBuilder::default()
    }

    /// `host:port` form of the remote endpoint
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Check the config for values that can never produce a connection
    pub fn validate(&self) -> Result<()> {
        if self.host.trim().is_empty() {
            return Err(RconError::Config("host must not be empty".to_string()));
        }
        if self.port == 0 {
            return Err(RconError::Config("port must not be 0".to_string()));
        }
        if self.connect_timeout.is_zero() {
            return Err(RconError::Config(
                "connect timeout must be greater than zero".to_string(),
            ));
        }
        // std rejects a zero socket timeout, so catch it here with a clearer message
        if matches!(self.read_timeout, Some(t) if t.is_zero())
            || matches!(self.write_timeout, Some(t) if t.is_zero())
        {
            return Err(RconError::Config(
                "read/write timeouts must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }
}

/// Builder for ClientConfig
#[derive(Default)]
pub struct ClientConfigBuilder {
    config: ClientConfig,
}

impl ClientConfigBuilder {
    /// Set the server host
    pub fn host(mut self, host: impl Into<String>) -> Self {
        self.config.host = host.into();
        self
    }

    /// Set the RCON port
    pub fn port(mut self, port: u16) -> Self {
        self.config.port = port;
        self
    }

    /// Set the RCON password
    pub fn password(mut self, password: impl Into<String>) -> Self {
        self.config.password = password.into();
        self
    }

    /// Set the TCP connect timeout
    pub fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.config.connect_timeout = timeout;
        self
    }

    /// Set a read deadline for responses
    pub fn read_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.config.read_timeout = timeout;
        self
    }

    /// Set a write deadline for requests
    pub fn write_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.config.write_timeout = timeout;
        self
    }

    pub fn build(self) -> ClientConfig {
        self.config
    }
}
