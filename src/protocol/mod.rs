//! Protocol Module
//!
//! Defines the RCON wire protocol spoken between client and game server.
//!
//! ## Packet Format
//! ```text
//! ┌──────────┬──────────┬──────────┬──────────────────┬──────────┐
//! │ Size (4) │  Id (4)  │ Type (4) │       Body       │ 0x00 0x00│
//! └──────────┴──────────┴──────────┴──────────────────┴──────────┘
//! ```
//!
//! ### Packet Types
//! - 3: AUTH          - Body: password
//! - 2: EXECCOMMAND   - Body: command text
//! - 2: AUTH_RESPONSE - Sent by the server after AUTH
//! - 0: RESPONSE_VALUE - Body: command output
//!
//! ### Failed Authentication
//! The server answers a rejected AUTH (or a command on an unauthenticated
//! connection) with id -1.

mod packet;
mod id;
mod codec;

pub use packet::{Packet, PacketType, BAD_AUTH_ID};
pub use id::{IdSource, RandomIds, SequentialIds};
pub use codec::{
    encode_packet, decode_packet, write_packet,
    HEADER_SIZE, MAX_PACKET_SIZE, MAX_INBOUND_BODY_SIZE,
};
