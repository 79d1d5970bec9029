//! Error types for the WebSocket client handshake.
//!
//! Every failure of an opening handshake maps onto one of four codes. The
//! same value is handed to the error handler and returned from
//! [`WebSocketClient::open`](crate::WebSocketClient::open).

use thiserror::Error;

/// Result type alias for handshake operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while opening a WebSocket connection.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Error {
    /// The transport could not connect to the remote host.
    #[error("Connection refused")]
    ConnectionRefused,

    /// The server sent nothing within the response polling budget.
    #[error("Request timed out waiting for handshake response")]
    RequestTimeout,

    /// Malformed status line, or a missing or mismatched `Sec-WebSocket-Accept`.
    #[error("Bad handshake response")]
    BadResponse,

    /// Missing or incorrect `Upgrade` / `Connection` header.
    #[error("Upgrade required")]
    UpgradeRequired,
}

impl Error {
    /// HTTP status code this failure corresponds to, if any.
    ///
    /// A refused connection never reached HTTP and has no status code.
    #[must_use]
    pub const fn status_code(&self) -> Option<u16> {
        match self {
            Error::ConnectionRefused => None,
            Error::RequestTimeout => Some(408),
            Error::BadResponse => Some(400),
            Error::UpgradeRequired => Some(426),
        }
    }
}
