//! Protocol codec
//!
//! Encoding and decoding functions for the wire protocol.
//!
//! ## Wire Format
//! ```text
//! ┌──────────┬──────────┬──────────┬──────────────────┬──────────┐
//! │ Size (4) │  Id (4)  │ Type (4) │       Body       │ 0x00 0x00│
//! └──────────┴──────────┴──────────┴──────────────────┴──────────┘
//! ```
//!
//! All integers are little-endian `i32`. `Size` counts everything after
//! itself: `len(body) + 10`.

use std::io::{Read, Write};

use bytes::{Buf, BufMut, Bytes, BytesMut};

use crate::error::{RconError, Result};
use super::Packet;

/// Header size: size (4) + id (4) + type (4)
pub const HEADER_SIZE: usize = 12;

/// Exclusive upper bound on an encoded packet, including the size field
pub const MAX_PACKET_SIZE: usize = 1460;

/// Largest body we are willing to allocate for an inbound packet (64 KB)
pub const MAX_INBOUND_BODY_SIZE: usize = 64 * 1024;

/// Bytes counted by `size` that are not part of the body: id, type, terminator
const SIZE_OVERHEAD: usize = 10;

/// Bytes counted by `size` that are read as part of the header: id, type
const HEADER_FIELDS_AFTER_SIZE: i32 = 8;

// =============================================================================
// Encoding
// =============================================================================

/// Encode a packet to bytes
///
/// Fails with `PayloadTooLarge` if the encoded packet would reach
/// `MAX_PACKET_SIZE` bytes.
pub fn encode_packet(packet: &Packet) -> Result<Bytes> {
    let total_len = 4 + SIZE_OVERHEAD + packet.body.len();
    if total_len >= MAX_PACKET_SIZE {
        return Err(RconError::PayloadTooLarge {
            size: total_len,
            max: MAX_PACKET_SIZE,
        });
    }

    let mut buf = BytesMut::with_capacity(total_len);
    buf.put_i32_le((packet.body.len() + SIZE_OVERHEAD) as i32);
    buf.put_i32_le(packet.id);
    buf.put_i32_le(packet.packet_type);
    buf.put_slice(&packet.body);
    buf.put_bytes(0, 2);

    tracing::trace!(
        id = packet.id,
        packet_type = packet.packet_type,
        len = total_len,
        "encoded packet"
    );

    Ok(buf.freeze())
}

/// Encode a packet and write it to a stream
///
/// Nothing is written if encoding fails.
pub fn write_packet<W: Write>(writer: &mut W, packet: &Packet) -> Result<()> {
    let bytes = encode_packet(packet)?;
    writer.write_all(&bytes)?;
    writer.flush()?;
    Ok(())
}

// =============================================================================
// Decoding
// =============================================================================

/// Read a complete packet from a stream
///
/// Blocks until the packet is received or an error occurs. The header is
/// read as one unit and any failure there is reported as `ReadFailure`.
pub fn decode_packet<R: Read>(reader: &mut R) -> Result<Packet> {
    let mut header = [0u8; HEADER_SIZE];
    reader.read_exact(&mut header).map_err(RconError::ReadFailure)?;

    let mut fields = &header[..];
    let size = fields.get_i32_le();
    let id = fields.get_i32_le();
    let packet_type = fields.get_i32_le();

    // The body length counts everything after id and type, terminator included
    if size < HEADER_FIELDS_AFTER_SIZE {
        return Err(RconError::Protocol(format!(
            "Invalid packet size: {} (minimum {})",
            size, HEADER_FIELDS_AFTER_SIZE
        )));
    }
    let body_len = (size - HEADER_FIELDS_AFTER_SIZE) as usize;
    if body_len > MAX_INBOUND_BODY_SIZE {
        return Err(RconError::Protocol(format!(
            "Response body too large: {} bytes (max {})",
            body_len, MAX_INBOUND_BODY_SIZE
        )));
    }

    let mut body = vec![0u8; body_len];
    if body_len > 0 {
        reader.read_exact(&mut body)?;
    }

    tracing::trace!(id, packet_type, body_len, "decoded packet");

    Ok(Packet {
        id,
        packet_type,
        body,
    })
}
