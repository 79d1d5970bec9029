//! WebSocket client connection state machine.
//!
//! ## Connection Lifecycle
//!
//! 1. **Closed** - Initial state, and the state after any failure
//! 2. **Connecting** - Transport up, upgrade request sent, awaiting response
//! 3. **Open** - Handshake validated; bytes flow to the frame reader
//!
//! [`WebSocketClient::terminate`] returns to `Closed` from any state.
//!
//! ## Example
//!
//! ```rust,no_run
//! use rsws_client::{TcpTransport, WebSocketClient};
//!
//! let mut client = WebSocketClient::new(TcpTransport::new());
//! client.set_frame_reader(|transport: &mut TcpTransport| {
//!     // decode frames from `transport`
//!     let _ = transport;
//! });
//! client.open("localhost", 8080, "/", None)?;
//! client.listen();
//! # Ok::<(), rsws_client::Error>(())
//! ```

mod client;
mod state;

pub use client::{FrameReader, WebSocketClient};
pub use state::ConnectionState;
