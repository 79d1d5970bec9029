//! Client side of the WebSocket opening handshake (RFC 6455 Section 4.1).
//!
//! The request is formatted line by line through a fixed [`LineBuffer`] and
//! the response is consumed one byte at a time into another, so the whole
//! exchange runs without heap allocation. The only owned value produced is
//! the negotiated subprotocol, when the server selects one.

use crate::config::ResponsePolling;
use crate::error::{Error, Result};
use crate::protocol::line::LineBuffer;
use crate::protocol::nonce::Nonce;
use crate::transport::Transport;
use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use sha1::{Digest, Sha1};
use std::fmt::Write as _;
use std::io;

/// The WebSocket GUID used in the Sec-WebSocket-Accept calculation (RFC 6455).
pub const WS_GUID: &str = "258EAFA5-E914-47DA-95CA-C5AB0DC85B11";

/// Length of a base64-encoded SHA-1 digest.
pub const ACCEPT_KEY_LEN: usize = 28;

/// Status line prefix every successful upgrade response starts with.
const SWITCHING_PROTOCOLS: &[u8] = b"HTTP/1.1 101";

/// A computed `Sec-WebSocket-Accept` value.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct AcceptKey {
    encoded: [u8; ACCEPT_KEY_LEN],
}

impl AcceptKey {
    /// Raw ASCII bytes of the key.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.encoded
    }

    /// The key as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        std::str::from_utf8(&self.encoded).unwrap_or_default()
    }
}

impl std::fmt::Debug for AcceptKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("AcceptKey").field(&self.as_str()).finish()
    }
}

impl std::fmt::Display for AcceptKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Computes the Sec-WebSocket-Accept value from the client's Sec-WebSocket-Key.
///
/// The accept key is calculated as: Base64(SHA-1(key + GUID))
///
/// # Example
///
/// ```
/// use rsws_client::protocol::handshake::compute_accept_key;
///
/// let accept = compute_accept_key("dGhlIHNhbXBsZSBub25jZQ==");
/// assert_eq!(accept.as_str(), "s3pPLMBiTxaQ9kYGzzhZRbK+xOo=");
/// ```
#[must_use]
pub fn compute_accept_key(key: &str) -> AcceptKey {
    let mut hasher = Sha1::new();
    hasher.update(key.as_bytes());
    hasher.update(WS_GUID.as_bytes());
    let hash = hasher.finalize();

    let mut encoded = [0u8; ACCEPT_KEY_LEN];
    // A 20-byte digest always encodes to exactly 28 characters.
    let written = BASE64.encode_slice(hash, &mut encoded).unwrap_or_default();
    debug_assert_eq!(written, ACCEPT_KEY_LEN);
    AcceptKey { encoded }
}

fn send_line<T: Transport + ?Sized>(transport: &mut T, line: &LineBuffer) -> io::Result<()> {
    if line.is_truncated() {
        log::debug!(
            "Handshake request line truncated to {} bytes: {}",
            line.len(),
            line.as_bytes().escape_ascii()
        );
    }
    transport.write_all(line.as_bytes())?;
    transport.write_all(b"\r\n")
}

/// Send the client upgrade request.
///
/// ```text
/// GET /chat HTTP/1.1
/// Host: example.com:8000
/// Upgrade: websocket
/// Connection: Upgrade
/// Sec-WebSocket-Key: dGhlIHNhbXBsZSBub25jZQ==
/// Sec-WebSocket-Protocol: chat, superchat      (only when `protocols` is set)
/// Sec-WebSocket-Version: 13
///
/// ```
///
/// Each line is formatted into a [`LineBuffer`] of
/// [`LINE_CAPACITY`](crate::protocol::line::LINE_CAPACITY) bytes. Longer
/// lines are silently truncated, so callers must keep `path`, `host` and
/// `protocols` short enough to fit.
///
/// # Errors
///
/// Returns the transport's I/O error. The client does not act on it: a
/// failed write shows up as a response timeout or a lost connection.
pub fn write_request<T: Transport + ?Sized>(
    transport: &mut T,
    host: &str,
    port: u16,
    path: &str,
    nonce: &Nonce,
    protocols: Option<&str>,
) -> io::Result<()> {
    let mut line = LineBuffer::new();

    let _ = write!(line, "GET {path} HTTP/1.1");
    send_line(transport, &line)?;

    line.clear();
    let _ = write!(line, "Host: {host}:{port}");
    send_line(transport, &line)?;

    transport.write_all(b"Upgrade: websocket\r\n")?;
    transport.write_all(b"Connection: Upgrade\r\n")?;

    line.clear();
    let _ = write!(line, "Sec-WebSocket-Key: {nonce}");
    send_line(transport, &line)?;

    if let Some(protocols) = protocols {
        line.clear();
        let _ = write!(line, "Sec-WebSocket-Protocol: {protocols}");
        send_line(transport, &line)?;
    }

    transport.write_all(b"Sec-WebSocket-Version: 13\r\n\r\n")?;
    transport.flush()
}

/// Poll the transport until the first response byte arrives.
///
/// Checks availability up to `polling.max_attempts` times, pausing
/// `polling.delay` after every unsuccessful check. Returns `false` when the
/// budget runs out; the caller reports that as a timeout.
pub fn wait_for_response<T: Transport + ?Sized>(
    transport: &mut T,
    polling: &ResponsePolling,
) -> bool {
    for _ in 0..polling.max_attempts {
        if transport.available() {
            return true;
        }
        transport.pause(polling.delay);
    }
    false
}

/// Headers of the response that passed their individual checks.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct HandshakeFlags {
    /// `Upgrade: websocket` was present.
    pub upgrade: bool,
    /// `Connection: Upgrade` was present.
    pub connection: bool,
    /// `Sec-WebSocket-Accept` matched the nonce.
    pub accept_key: bool,
}

impl HandshakeFlags {
    /// All three required headers were seen and valid.
    #[must_use]
    pub const fn is_complete(&self) -> bool {
        self.upgrade && self.connection && self.accept_key
    }
}

/// Check that every required header was validated.
///
/// When several are missing, the first in the order Upgrade, Connection,
/// Accept determines the error.
///
/// # Errors
///
/// - [`Error::UpgradeRequired`] if `Upgrade` or `Connection` is missing.
/// - [`Error::BadResponse`] if `Sec-WebSocket-Accept` is missing.
pub fn validate(flags: HandshakeFlags) -> Result<()> {
    if !flags.upgrade {
        log::debug!("Error during WebSocket handshake: 'Upgrade' header is missing");
        return Err(Error::UpgradeRequired);
    }
    if !flags.connection {
        log::debug!("Error during WebSocket handshake: 'Connection' header is missing");
        return Err(Error::UpgradeRequired);
    }
    if !flags.accept_key {
        log::debug!("Error during WebSocket handshake: 'Sec-WebSocket-Accept' header is missing");
        return Err(Error::BadResponse);
    }
    Ok(())
}

/// Progress of a [`ResponseParser`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Progress {
    /// More bytes are needed.
    Pending,
    /// The blank line ending the header block was seen.
    Complete,
}

/// Incremental parser for the server's upgrade response.
///
/// Bytes are pushed one at a time. Each completed line is checked as soon as
/// its `\n` arrives: the status line first, then the headers. A failing
/// check ends the parse immediately.
#[derive(Debug)]
pub struct ResponseParser {
    expected_accept: AcceptKey,
    line: LineBuffer,
    line_number: usize,
    flags: HandshakeFlags,
    protocol: Option<String>,
}

impl ResponseParser {
    /// Create a parser expecting the accept key derived from `nonce`.
    #[must_use]
    pub fn new(nonce: &Nonce) -> Self {
        Self {
            expected_accept: compute_accept_key(nonce.as_str()),
            line: LineBuffer::new(),
            line_number: 0,
            flags: HandshakeFlags::default(),
            protocol: None,
        }
    }

    /// Headers validated so far.
    #[must_use]
    pub const fn flags(&self) -> HandshakeFlags {
        self.flags
    }

    /// Subprotocol selected by the server, if any.
    #[must_use]
    pub fn protocol(&self) -> Option<&str> {
        self.protocol.as_deref()
    }

    /// Take ownership of the selected subprotocol.
    #[must_use]
    pub fn into_protocol(self) -> Option<String> {
        self.protocol
    }

    /// Feed one response byte.
    ///
    /// # Errors
    ///
    /// - [`Error::BadResponse`] for a status line other than `HTTP/1.1 101`
    ///   or a mismatched `Sec-WebSocket-Accept`.
    /// - [`Error::UpgradeRequired`] for a wrong `Upgrade` or `Connection` value.
    pub fn push(&mut self, byte: u8) -> Result<Progress> {
        self.line.push(byte);
        if byte != b'\n' {
            return Ok(Progress::Pending);
        }

        self.line.strip_line_ending();
        log::trace!(
            "[Line #{}] {}",
            self.line_number,
            self.line.as_bytes().escape_ascii()
        );

        if self.line_number == 0 {
            self.check_status_line()?;
        } else if self.line.is_empty() {
            return Ok(Progress::Complete);
        } else {
            self.check_header()?;
        }

        self.line.clear();
        self.line_number += 1;
        Ok(Progress::Pending)
    }

    /// Feed a slice of bytes, stopping at the end of the header block.
    ///
    /// Returns the progress and the number of bytes consumed.
    ///
    /// # Errors
    ///
    /// Same as [`push`](Self::push).
    pub fn push_slice(&mut self, bytes: &[u8]) -> Result<(Progress, usize)> {
        for (i, &byte) in bytes.iter().enumerate() {
            if self.push(byte)? == Progress::Complete {
                return Ok((Progress::Complete, i + 1));
            }
        }
        Ok((Progress::Pending, bytes.len()))
    }

    fn check_status_line(&self) -> Result<()> {
        if !self.line.as_bytes().starts_with(SWITCHING_PROTOCOLS) {
            log::debug!(
                "Error during WebSocket handshake: invalid HTTP response: {}",
                self.line.as_bytes().escape_ascii()
            );
            return Err(Error::BadResponse);
        }
        Ok(())
    }

    fn check_header(&mut self) -> Result<()> {
        let (name, value) = self.line.header();

        if name.eq_ignore_ascii_case(b"Upgrade") {
            if !value.eq_ignore_ascii_case(b"websocket") {
                log::debug!(
                    "Error during WebSocket handshake: 'Upgrade' header value is not 'websocket': {}",
                    value.escape_ascii()
                );
                return Err(Error::UpgradeRequired);
            }
            self.flags.upgrade = true;
        } else if name.eq_ignore_ascii_case(b"Connection") {
            if !value.eq_ignore_ascii_case(b"Upgrade") {
                log::debug!(
                    "Error during WebSocket handshake: 'Connection' header value is not 'Upgrade': {}",
                    value.escape_ascii()
                );
                return Err(Error::UpgradeRequired);
            }
            self.flags.connection = true;
        } else if name.eq_ignore_ascii_case(b"Sec-WebSocket-Accept") {
            if value != self.expected_accept.as_bytes() {
                log::debug!(
                    "Error during WebSocket handshake: Incorrect 'Sec-WebSocket-Accept' header value"
                );
                return Err(Error::BadResponse);
            }
            self.flags.accept_key = true;
        } else if name.eq_ignore_ascii_case(b"Sec-WebSocket-Protocol") {
            if !value.is_empty() {
                self.protocol = Some(String::from_utf8_lossy(value).into_owned());
            }
        }
        Ok(())
    }
}

/// Read the server response from the transport and check each line.
///
/// Reading stops at the blank line ending the header block, leaving any
/// frame bytes that follow in the transport. If the transport runs dry
/// first, the headers seen so far are returned and left to [`validate`].
///
/// # Errors
///
/// See [`ResponseParser::push`].
pub fn read_response<T: Transport + ?Sized>(
    transport: &mut T,
    nonce: &Nonce,
) -> Result<ResponseParser> {
    let mut parser = ResponseParser::new(nonce);
    while let Some(byte) = transport.read_byte() {
        if parser.push(byte)? == Progress::Complete {
            break;
        }
    }
    Ok(parser)
}
