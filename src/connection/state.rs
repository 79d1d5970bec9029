//! Client readiness state.

/// Readiness state of a [`WebSocketClient`](crate::WebSocketClient).
///
/// A client starts `Closed`, moves to `Connecting` once the transport is up
/// and the upgrade request is on its way, and to `Open` only after the
/// server's response passed every handshake check. Any failure or
/// termination returns it to `Closed`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ConnectionState {
    /// No connection. Initial state, and the state after any failure.
    #[default]
    Closed,
    /// Transport connected, handshake in progress.
    Connecting,
    /// Handshake completed; frames may flow.
    Open,
}

impl ConnectionState {
    /// Check if a connection attempt or connection is in progress.
    #[must_use]
    #[inline]
    pub const fn is_active(&self) -> bool {
        !matches!(self, ConnectionState::Closed)
    }

    /// Check if the connection is open.
    #[must_use]
    #[inline]
    pub const fn is_open(&self) -> bool {
        matches!(self, ConnectionState::Open)
    }
}

impl std::fmt::Display for ConnectionState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConnectionState::Closed => write!(f, "Closed"),
            ConnectionState::Connecting => write!(f, "Connecting"),
            ConnectionState::Open => write!(f, "Open"),
        }
    }
}
