//! Byte transport consumed by the WebSocket client.
//!
//! The client never touches sockets directly. It drives a [`Transport`],
//! which on a microcontroller wraps the network stack's client socket and
//! on a host can be the [`TcpTransport`] adapter below.

use std::io::{self, Read, Write};
use std::net::{Shutdown, TcpStream};
use std::time::Duration;

/// A connection-oriented, polled byte stream.
///
/// All methods are non-blocking except [`connect`](Transport::connect),
/// [`write_all`](Transport::write_all) and [`pause`](Transport::pause).
pub trait Transport {
    /// Establish a connection to `host:port`.
    ///
    /// # Errors
    ///
    /// Returns the underlying I/O error when the connection cannot be made.
    fn connect(&mut self, host: &str, port: u16) -> io::Result<()>;

    /// Whether the peer is still connected.
    fn connected(&mut self) -> bool;

    /// Whether at least one byte can be read without blocking.
    fn available(&mut self) -> bool;

    /// Read one byte, or `None` when nothing is buffered.
    fn read_byte(&mut self) -> Option<u8>;

    /// Write the whole buffer.
    ///
    /// # Errors
    ///
    /// Returns the underlying I/O error on write failure.
    fn write_all(&mut self, buf: &[u8]) -> io::Result<()>;

    /// Flush buffered output.
    ///
    /// # Errors
    ///
    /// Returns the underlying I/O error on flush failure.
    fn flush(&mut self) -> io::Result<()>;

    /// Close the connection. Must be safe to call when already closed.
    fn close(&mut self);

    /// Block the calling thread between two response polls.
    fn pause(&mut self, duration: Duration) {
        std::thread::sleep(duration);
    }
}

/// [`Transport`] over a `std::net::TcpStream`.
///
/// The stream is switched to non-blocking mode for reads so that
/// `available()` and `read_byte()` never stall the polling loop.
#[derive(Debug, Default)]
pub struct TcpTransport {
    stream: Option<TcpStream>,
}

impl TcpTransport {
    /// Create a disconnected transport.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Wrap an already connected stream.
    ///
    /// # Errors
    ///
    /// Returns an I/O error if the stream cannot be made non-blocking.
    pub fn from_stream(stream: TcpStream) -> io::Result<Self> {
        stream.set_nonblocking(true)?;
        stream.set_nodelay(true)?;
        Ok(Self {
            stream: Some(stream),
        })
    }

    fn peek(&mut self) -> io::Result<usize> {
        let Some(stream) = self.stream.as_ref() else {
            return Err(io::ErrorKind::NotConnected.into());
        };
        let mut probe = [0u8; 1];
        stream.peek(&mut probe)
    }

    fn not_connected() -> io::Error {
        io::ErrorKind::NotConnected.into()
    }
}

impl Transport for TcpTransport {
    fn connect(&mut self, host: &str, port: u16) -> io::Result<()> {
        let stream = TcpStream::connect((host, port))?;
        *self = Self::from_stream(stream)?;
        Ok(())
    }

    fn connected(&mut self) -> bool {
        match self.peek() {
            // Orderly shutdown from the peer.
            Ok(0) => false,
            Ok(_) => true,
            Err(e) => e.kind() == io::ErrorKind::WouldBlock,
        }
    }

    fn available(&mut self) -> bool {
        matches!(self.peek(), Ok(n) if n > 0)
    }

    fn read_byte(&mut self) -> Option<u8> {
        let stream = self.stream.as_mut()?;
        let mut byte = [0u8; 1];
        match stream.read(&mut byte) {
            Ok(1) => Some(byte[0]),
            _ => None,
        }
    }

    fn write_all(&mut self, mut buf: &[u8]) -> io::Result<()> {
        let stream = self.stream.as_mut().ok_or_else(Self::not_connected)?;
        // Non-blocking socket: spin on WouldBlock until the kernel takes the bytes.
        while !buf.is_empty() {
            match stream.write(buf) {
                Ok(0) => return Err(io::ErrorKind::WriteZero.into()),
                Ok(n) => buf = &buf[n..],
                Err(e) if e.kind() == io::ErrorKind::WouldBlock => std::thread::yield_now(),
                Err(e) if e.kind() == io::ErrorKind::Interrupted => {}
                Err(e) => return Err(e),
            }
        }
        Ok(())
    }

    fn flush(&mut self) -> io::Result<()> {
        match self.stream.as_mut() {
            Some(stream) => stream.flush(),
            None => Err(Self::not_connected()),
        }
    }

    fn close(&mut self) {
        if let Some(stream) = self.stream.take() {
            let _ = stream.shutdown(Shutdown::Both);
        }
    }
}
