//! # rsws-client - WebSocket opening handshake for constrained clients
//!
//! `rsws-client` implements the client side of the RFC 6455 opening
//! handshake and the connection readiness state machine built on it. It is
//! meant for small network clients with a single outstanding connection:
//! request and response lines live in fixed stack buffers and the only heap
//! value is the negotiated subprotocol.
//!
//! ## Features
//!
//! - **Byte-wise response parsing** into a bounded line buffer
//! - **Strict RFC 6455 validation** of status line, `Upgrade`, `Connection`
//!   and `Sec-WebSocket-Accept` before a connection is trusted
//! - **Cooperative polling**: bounded blocking in `open()`, non-blocking `listen()`
//! - **Pluggable transport and frame reader** via traits
//!
//! Frame encoding and decoding, masking, control frames and TLS are left to
//! the [`FrameReader`] and [`Transport`] collaborators.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use rsws_client::{Config, TcpTransport, WebSocketClient};
//!
//! let mut client = WebSocketClient::with_config(TcpTransport::new(), Config::embedded());
//! client.on_error(|err| eprintln!("handshake failed: {err}"));
//! client.open("example.com", 80, "/chat", None)?;
//! # Ok::<(), rsws_client::Error>(())
//! ```

pub mod close;
pub mod config;
pub mod connection;
pub mod error;
pub mod protocol;
pub mod transport;

pub use close::CloseCode;
pub use config::{Config, ResponsePolling};
pub use connection::{ConnectionState, FrameReader, WebSocketClient};
pub use error::{Error, Result};
pub use protocol::{HandshakeFlags, Nonce, NonceGenerator, WS_GUID, compute_accept_key};
pub use transport::{TcpTransport, Transport};

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_send<T: Send>() {}
    fn assert_sync<T: Sync>() {}

    #[test]
    fn test_public_types_are_send() {
        assert_send::<Error>();
        assert_send::<Config>();
        assert_send::<CloseCode>();
        assert_send::<ConnectionState>();
        assert_send::<HandshakeFlags>();
        assert_send::<Nonce>();
        assert_send::<NonceGenerator>();
        assert_send::<TcpTransport>();
    }

    #[test]
    fn test_public_types_are_sync() {
        assert_sync::<Error>();
        assert_sync::<Config>();
        assert_sync::<CloseCode>();
        assert_sync::<ConnectionState>();
        assert_sync::<HandshakeFlags>();
        assert_sync::<Nonce>();
        assert_sync::<NonceGenerator>();
        assert_sync::<TcpTransport>();
    }
}
