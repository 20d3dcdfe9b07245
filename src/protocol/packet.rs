//! Packet definitions
//!
//! The logical view of one RCON packet, independent of its wire encoding.

use super::IdSource;

/// Reserved response id signalling that the server rejected authentication
pub const BAD_AUTH_ID: i32 = -1;

/// Packet types
///
/// `ExecCommand` and `AuthResponse` share the value 2 on the wire; which one
/// is meant depends on the direction of travel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum PacketType {
    /// Response to an `ExecCommand` request
    ResponseValue = 0,
    /// Run a console command
    ExecCommand = 2,
    /// Log in with the RCON password
    Auth = 3,
}

impl PacketType {
    /// Response to an `Auth` request
    pub const AUTH_RESPONSE: i32 = 2;

    /// Wire value of this type
    pub fn as_i32(self) -> i32 {
        self as i32
    }
}

/// A single RCON packet
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Packet {
    /// Request id, echoed back by the server (or `BAD_AUTH_ID`)
    pub id: i32,

    /// Raw packet type. Kept as an integer because servers are free to send
    /// values outside the request set.
    pub packet_type: i32,

    /// Body bytes. Decoded packets still carry the trailing terminator.
    pub body: Vec<u8>,
}

impl Packet {
    /// Create a packet with an explicit id
    pub fn new(id: i32, packet_type: PacketType, body: impl Into<Vec<u8>>) -> Self {
        Self {
            id,
            packet_type: packet_type.as_i32(),
            body: body.into(),
        }
    }

    /// Create an outgoing request with a fresh id from `ids`
    pub fn request(
        ids: &mut dyn IdSource,
        packet_type: PacketType,
        body: impl Into<Vec<u8>>,
    ) -> Self {
        Self::new(ids.next_id(), packet_type, body)
    }

    /// Value of the wire `size` field for this packet
    pub fn wire_size(&self) -> usize {
        self.body.len() + 10
    }

    /// Whether this is the server's "authentication failed" reply
    pub fn is_bad_auth(&self) -> bool {
        self.id == BAD_AUTH_ID
    }

    /// Body with the protocol terminator removed
    pub fn payload(&self) -> &[u8] {
        let mut end = self.body.len();
        for _ in 0..2 {
            if end > 0 && self.body[end - 1] == 0 {
                end -= 1;
            }
        }
        &self.body[..end]
    }
}
