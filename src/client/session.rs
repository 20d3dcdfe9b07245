//! RCON Session
//!
//! An authenticated connection that runs console commands.

use std::net::SocketAddr;

use crate::config::ClientConfig;
use crate::error::{RconError, Result};
use crate::protocol::{IdSource, Packet, PacketType, RandomIds};
use super::Connection;

/// An authenticated RCON session
///
/// Holds one connection and the password it authenticated with, so a
/// dropped connection can be restored with [`Session::reconnect`].
pub struct Session {
    /// Current connection. `None` once a read or write on it has failed;
    /// a late reply could otherwise be taken for the next command's output.
    conn: Option<Connection>,

    /// Remote address the session was dialed to
    peer_addr: SocketAddr,

    /// Endpoint, password and timeouts
    config: ClientConfig,

    /// Source of request ids
    ids: Box<dyn IdSource>,
}

impl Session {
    /// Connect and authenticate with default timeouts
    pub fn connect(host: &str, port: u16, password: &str) -> Result<Self> {
        Self::connect_with(ClientConfig::new(host, port, password))
    }

    /// Connect and authenticate using the given config
    pub fn connect_with(config: ClientConfig) -> Result<Self> {
        Self::connect_with_ids(config, Box::new(RandomIds))
    }

    /// Connect and authenticate, drawing request ids from `ids`
    pub fn connect_with_ids(config: ClientConfig, mut ids: Box<dyn IdSource>) -> Result<Self> {
        config.validate()?;

        let mut conn = Connection::dial(&config)?;
        handshake(&mut conn, ids.as_mut(), &config.password)?;

        let peer_addr = conn.peer_addr();
        tracing::debug!("Authenticated with {}", peer_addr);

        Ok(Self {
            conn: Some(conn),
            peer_addr,
            config,
            ids,
        })
    }

    /// Run a console command and return its output
    ///
    /// NUL padding and surrounding whitespace are stripped. An empty string
    /// is a valid result.
    pub fn send_command(&mut self, command: &str) -> Result<String> {
        let request =
            Packet::request(self.ids.as_mut(), PacketType::ExecCommand, command.as_bytes());
        let response = self.exchange(&request)?;

        if response.is_bad_auth() {
            tracing::warn!("Server {} rejected command: not authenticated", self.peer_addr);
            return Err(RconError::AuthFailed);
        }

        Ok(response_text(&response.body))
    }

    /// Re-run the auth handshake on the current connection
    ///
    /// On success `password` replaces the stored one and is used by later
    /// reconnects.
    pub fn authenticate(&mut self, password: &str) -> Result<()> {
        let request = Packet::request(self.ids.as_mut(), PacketType::Auth, password.as_bytes());
        let response = self.exchange(&request)?;
        check_auth(&response, self.peer_addr)?;

        self.config.password = password.to_string();
        Ok(())
    }

    /// Dial the same server again and re-authenticate with the stored password
    ///
    /// The current connection is only replaced once the new one has
    /// authenticated, so a failed attempt can simply be retried.
    pub fn reconnect(&mut self) -> Result<()> {
        let addr = self.peer_addr;
        tracing::debug!("Reconnecting to {}", addr);

        let mut conn = Connection::open(addr, &self.config)?;
        handshake(&mut conn, self.ids.as_mut(), &self.config.password)?;

        self.conn = Some(conn);
        tracing::debug!("Reconnected to {}", addr);
        Ok(())
    }

    /// Whether the session still has a usable connection
    ///
    /// Turns false after a read or write failure, until `reconnect` succeeds.
    pub fn is_connected(&self) -> bool {
        self.conn.is_some()
    }

    /// Get the remote address the session is dialed to
    pub fn peer_addr(&self) -> SocketAddr {
        self.peer_addr
    }

    /// Get the config this session was created with
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Round trip on the current connection, dropping it if the stream fails
    fn exchange(&mut self, request: &Packet) -> Result<Packet> {
        let conn = self.conn.as_mut().ok_or_else(|| {
            RconError::Io(std::io::Error::new(
                std::io::ErrorKind::NotConnected,
                "connection lost, reconnect required",
            ))
        })?;

        match conn.round_trip(request) {
            Err(e) if e.is_connection_lost() => {
                tracing::debug!("Dropping connection to {}: {}", self.peer_addr, e);
                self.conn = None;
                Err(e)
            }
            result => result,
        }
    }
}

/// Send an AUTH packet and check the reply for the bad-auth sentinel
fn handshake(conn: &mut Connection, ids: &mut dyn IdSource, password: &str) -> Result<()> {
    let request = Packet::request(ids, PacketType::Auth, password.as_bytes());
    let response = conn.round_trip(&request)?;
    check_auth(&response, conn.peer_addr())
}

/// Map the bad-auth sentinel to `AuthFailed`
fn check_auth(response: &Packet, peer_addr: SocketAddr) -> Result<()> {
    if response.is_bad_auth() {
        tracing::warn!("Authentication rejected by {}", peer_addr);
        return Err(RconError::AuthFailed);
    }
    Ok(())
}

/// Strip NUL padding from both ends, then surrounding whitespace
fn response_text(body: &[u8]) -> String {
    let start = body.iter().position(|&b| b != 0).unwrap_or(body.len());
    let end = body.iter().rposition(|&b| b != 0).map_or(start, |i| i + 1);
    String::from_utf8_lossy(&body[start..end]).trim().to_string()
}
