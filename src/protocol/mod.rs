//! WebSocket opening handshake core (RFC 6455 Section 4).

pub mod handshake;
pub mod line;
pub mod nonce;

pub use handshake::{
    AcceptKey, HandshakeFlags, Progress, ResponseParser, WS_GUID, compute_accept_key,
    read_response, validate, wait_for_response, write_request,
};
pub use line::{LINE_CAPACITY, LineBuffer};
pub use nonce::{Nonce, NonceGenerator};
