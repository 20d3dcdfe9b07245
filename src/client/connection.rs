//! Connection Handle
//!
//! A single TCP connection to an RCON server with buffered I/O.

use std::io::{BufReader, BufWriter};
use std::net::{SocketAddr, TcpStream, ToSocketAddrs};

use crate::config::ClientConfig;
use crate::error::{RconError, Result};
use crate::protocol::{decode_packet, write_packet, Packet};

/// One open connection to an RCON server
pub struct Connection {
    /// TCP stream reader (buffered for efficiency)
    reader: BufReader<TcpStream>,

    /// TCP stream writer (buffered for efficiency)
    writer: BufWriter<TcpStream>,

    /// Remote address this connection was dialed to
    peer_addr: SocketAddr,
}

impl Connection {
    /// Resolve the configured endpoint and dial the first address that answers
    pub fn dial(config: &ClientConfig) -> Result<Self> {
        let address = config.address();
        let addrs = (config.host.as_str(), config.port)
            .to_socket_addrs()
            .map_err(|source| RconError::Dial {
                addr: address.clone(),
                source,
            })?;

        let mut last_err = None;
        for addr in addrs {
            match Self::open(addr, config) {
                Ok(conn) => return Ok(conn),
                Err(e) => {
                    tracing::debug!("Dial to {} failed: {}", addr, e);
                    last_err = Some(e);
                }
            }
        }

        Err(last_err.unwrap_or_else(|| RconError::Dial {
            addr: address,
            source: std::io::Error::new(
                std::io::ErrorKind::AddrNotAvailable,
                "no addresses resolved",
            ),
        }))
    }

    /// Dial a specific address
    ///
    /// Applies the connect timeout and any configured read/write timeouts.
    pub fn open(addr: SocketAddr, config: &ClientConfig) -> Result<Self> {
        let stream = TcpStream::connect_timeout(&addr, config.connect_timeout)
            .map_err(|source| RconError::Dial {
                addr: addr.to_string(),
                source,
            })?;

        // Requests and responses are small, don't let Nagle hold them back
        stream.set_nodelay(true)?;
        stream.set_read_timeout(config.read_timeout)?;
        stream.set_write_timeout(config.write_timeout)?;

        // Clone stream for separate read/write handles
        let read_stream = stream.try_clone()?;
        let write_stream = stream;

        tracing::debug!("Connected to {}", addr);

        Ok(Self {
            reader: BufReader::new(read_stream),
            writer: BufWriter::new(write_stream),
            peer_addr: addr,
        })
    }

    /// Send one packet and block until the single response arrives
    pub fn round_trip(&mut self, request: &Packet) -> Result<Packet> {
        write_packet(&mut self.writer, request)?;
        decode_packet(&mut self.reader)
    }

    /// Get the remote address
    pub fn peer_addr(&self) -> SocketAddr {
        self.peer_addr
    }
}
