//! Scripted transport for handshake and state machine tests.
//!
//! The test keeps a [`Shared`] handle to inspect what the client wrote and to
//! play the server while the client owns the transport.

use rsws_client::Transport;
use std::cell::RefCell;
use std::collections::VecDeque;
use std::io;
use std::rc::Rc;
use std::time::Duration;

#[derive(Debug, Default)]
pub struct State {
    /// Fail every `connect()` call.
    pub refuse: bool,
    pub connected: bool,
    /// Bytes the server sends once the request has been flushed.
    pub response: Vec<u8>,
    pub inbound: VecDeque<u8>,
    pub written: Vec<u8>,
    pub connects: usize,
    pub closes: usize,
    pub pauses: Vec<Duration>,
}

impl State {
    /// Simulate the peer dropping the connection.
    pub fn drop_peer(&mut self) {
        self.connected = false;
    }

    /// Simulate the peer sending bytes after the handshake.
    pub fn deliver(&mut self, bytes: &[u8]) {
        self.inbound.extend(bytes.iter().copied());
    }

    pub fn written_text(&self) -> String {
        String::from_utf8_lossy(&self.written).into_owned()
    }
}

pub type Shared = Rc<RefCell<State>>;

#[derive(Debug, Clone, Default)]
pub struct MockTransport {
    state: Shared,
}

impl MockTransport {
    pub fn new() -> (Self, Shared) {
        let transport = Self::default();
        let shared = transport.state.clone();
        (transport, shared)
    }

    /// A transport whose server answers every handshake with `response`.
    pub fn responding(response: Vec<u8>) -> (Self, Shared) {
        let (transport, shared) = Self::new();
        shared.borrow_mut().response = response;
        (transport, shared)
    }

    /// A transport whose connection attempts always fail.
    pub fn refusing() -> (Self, Shared) {
        let (transport, shared) = Self::new();
        shared.borrow_mut().refuse = true;
        (transport, shared)
    }
}

impl Transport for MockTransport {
    fn connect(&mut self, _host: &str, _port: u16) -> io::Result<()> {
        let mut state = self.state.borrow_mut();
        state.connects += 1;
        if state.refuse {
            return Err(io::ErrorKind::ConnectionRefused.into());
        }
        state.connected = true;
        state.inbound.clear();
        state.written.clear();
        Ok(())
    }

    fn connected(&mut self) -> bool {
        self.state.borrow().connected
    }

    fn available(&mut self) -> bool {
        !self.state.borrow().inbound.is_empty()
    }

    fn read_byte(&mut self) -> Option<u8> {
        self.state.borrow_mut().inbound.pop_front()
    }

    fn write_all(&mut self, buf: &[u8]) -> io::Result<()> {
        let mut state = self.state.borrow_mut();
        if !state.connected {
            return Err(io::ErrorKind::NotConnected.into());
        }
        state.written.extend_from_slice(buf);
        Ok(())
    }

    fn flush(&mut self) -> io::Result<()> {
        let mut state = self.state.borrow_mut();
        let response = state.response.clone();
        state.inbound.extend(response);
        Ok(())
    }

    fn close(&mut self) {
        let mut state = self.state.borrow_mut();
        state.closes += 1;
        state.connected = false;
        state.inbound.clear();
    }

    fn pause(&mut self, duration: Duration) {
        self.state.borrow_mut().pauses.push(duration);
    }
}
