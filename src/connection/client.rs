use crate::close::CloseCode;
use crate::config::Config;
use crate::connection::ConnectionState;
use crate::error::{Error, Result};
use crate::protocol::handshake::{read_response, validate, wait_for_response, write_request};
use crate::protocol::nonce::NonceGenerator;
use crate::transport::Transport;

/// Consumer of frame bytes once the connection is open.
///
/// The client does not decode frames. While open, every
/// [`listen`](WebSocketClient::listen) tick that finds buffered bytes hands
/// the transport to the registered reader, which owns framing, masking and
/// control-frame handling.
pub trait FrameReader<T: ?Sized> {
    /// Called when the transport has at least one byte available.
    fn on_bytes_available(&mut self, transport: &mut T);
}

impl<T: ?Sized, F> FrameReader<T> for F
where
    F: FnMut(&mut T),
{
    fn on_bytes_available(&mut self, transport: &mut T) {
        self(transport)
    }
}

type OpenHandler<T> = Box<dyn FnMut(&mut WebSocketClient<T>)>;
type ErrorHandler = Box<dyn FnMut(Error)>;
type CloseHandler<T> = Box<dyn FnMut(&mut WebSocketClient<T>, CloseCode, &[u8])>;

/// A WebSocket client connection over a polled [`Transport`].
///
/// The client performs the opening handshake and tracks the connection's
/// readiness. Everything runs on the caller's thread: [`open`](Self::open)
/// blocks for at most the configured polling budget, and
/// [`listen`](Self::listen) must be called regularly afterwards to detect
/// disconnection and feed incoming bytes to the [`FrameReader`].
///
/// Handlers are invoked synchronously from `open` and `listen`. They should
/// return quickly since nothing isolates them from the handshake timing.
///
/// ## Example
///
/// ```rust,no_run
/// use rsws_client::{TcpTransport, WebSocketClient};
///
/// let mut client = WebSocketClient::new(TcpTransport::new());
/// client.on_open(|client| println!("open, protocol {:?}", client.protocol()));
/// client.on_error(|err| eprintln!("handshake failed: {err}"));
/// client.on_close(|_, code, _| println!("closed: {code}"));
///
/// if client.open("example.com", 80, "/chat", Some("chat")).is_ok() {
///     loop {
///         client.listen();
///         # break;
///     }
/// }
/// ```
pub struct WebSocketClient<T> {
    transport: T,
    config: Config,
    state: ConnectionState,
    protocol: Option<String>,
    nonces: NonceGenerator,
    on_open: Option<OpenHandler<T>>,
    on_error: Option<ErrorHandler>,
    on_close: Option<CloseHandler<T>>,
    frame_reader: Option<Box<dyn FrameReader<T>>>,
}

impl<T> WebSocketClient<T> {
    /// Create a closed client with default configuration.
    pub fn new(transport: T) -> Self {
        Self::with_config(transport, Config::default())
    }

    /// Create a closed client with a custom configuration.
    pub fn with_config(transport: T, config: Config) -> Self {
        Self {
            transport,
            config,
            state: ConnectionState::Closed,
            protocol: None,
            nonces: NonceGenerator::new(),
            on_open: None,
            on_error: None,
            on_close: None,
            frame_reader: None,
        }
    }

    /// Replace the handshake nonce generator.
    #[must_use]
    pub fn with_nonce_generator(mut self, nonces: NonceGenerator) -> Self {
        self.nonces = nonces;
        self
    }

    /// Get the current readiness state.
    pub fn state(&self) -> ConnectionState {
        self.state
    }

    /// Check if the handshake completed and the connection is open.
    pub fn is_open(&self) -> bool {
        self.state.is_open()
    }

    /// Subprotocol the server selected during the last successful handshake.
    pub fn protocol(&self) -> Option<&str> {
        self.protocol.as_deref()
    }

    /// Get the client configuration.
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Get a reference to the underlying transport.
    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Get mutable access to the underlying transport.
    pub fn transport_mut(&mut self) -> &mut T {
        &mut self.transport
    }

    /// Register the handler called once a handshake succeeds.
    pub fn on_open(&mut self, handler: impl FnMut(&mut WebSocketClient<T>) + 'static) {
        self.on_open = Some(Box::new(handler));
    }

    /// Register the handler called when a handshake fails.
    pub fn on_error(&mut self, handler: impl FnMut(Error) + 'static) {
        self.on_error = Some(Box::new(handler));
    }

    /// Register the handler called when an open connection is lost.
    pub fn on_close(
        &mut self,
        handler: impl FnMut(&mut WebSocketClient<T>, CloseCode, &[u8]) + 'static,
    ) {
        self.on_close = Some(Box::new(handler));
    }

    /// Register the consumer of incoming frame bytes.
    pub fn set_frame_reader(&mut self, reader: impl FrameReader<T> + 'static) {
        self.frame_reader = Some(Box::new(reader));
    }

    // Handlers may re-register themselves while running, so they are taken
    // out for the call and only put back if the slot is still empty.
    fn emit_open(&mut self) {
        if let Some(mut handler) = self.on_open.take() {
            handler(self);
            if self.on_open.is_none() {
                self.on_open = Some(handler);
            }
        }
    }

    fn emit_close(&mut self, code: CloseCode, reason: &[u8]) {
        if let Some(mut handler) = self.on_close.take() {
            handler(self, code, reason);
            if self.on_close.is_none() {
                self.on_close = Some(handler);
            }
        }
    }
}

impl<T: Transport> WebSocketClient<T> {
    /// Connect to `host:port` and perform the opening handshake on `path`.
    ///
    /// Any previous connection is terminated first. `protocols` is sent
    /// verbatim as `Sec-WebSocket-Protocol` when given.
    ///
    /// On success the client is `Open` and the open handler has run. On
    /// failure the client is `Closed` and the error handler has run with the
    /// same error that is returned.
    ///
    /// # Errors
    ///
    /// - [`Error::ConnectionRefused`] if the transport cannot connect.
    /// - [`Error::RequestTimeout`] if no response arrives within the polling budget.
    /// - [`Error::BadResponse`] for a non-101 status or a missing or wrong accept key.
    /// - [`Error::UpgradeRequired`] for a missing or wrong `Upgrade`/`Connection` header.
    pub fn open(&mut self, host: &str, port: u16, path: &str, protocols: Option<&str>) -> Result<()> {
        if self.state.is_open() {
            log::debug!("Closing open connection ({}) to reopen", CloseCode::GoingAway);
        }
        self.terminate();

        if let Err(err) = self.transport.connect(host, port) {
            log::debug!("Error in connection establishment to {host}:{port}: {err}");
            return Err(self.fail(Error::ConnectionRefused));
        }
        self.state = ConnectionState::Connecting;

        let nonce = self.nonces.generate();
        if let Err(err) = write_request(&mut self.transport, host, port, path, &nonce, protocols) {
            log::debug!("Failed to send handshake request: {err}");
        }

        if !wait_for_response(&mut self.transport, &self.config.polling) {
            log::debug!(
                "Error in connection establishment: no response within {:?}",
                self.config.polling.budget()
            );
            return Err(self.fail(Error::RequestTimeout));
        }

        let parser = match read_response(&mut self.transport, &nonce) {
            Ok(parser) => parser,
            Err(err) => return Err(self.fail(err)),
        };
        if let Err(err) = validate(parser.flags()) {
            return Err(self.fail(err));
        }

        self.protocol = parser.into_protocol();
        self.state = ConnectionState::Open;
        log::debug!(
            "WebSocket connection to {host}:{port}{path} open (protocol: {:?})",
            self.protocol
        );
        self.emit_open();
        Ok(())
    }

    /// Close the transport and return to `Closed`.
    ///
    /// Releases the negotiated subprotocol. Safe to call at any time,
    /// repeatedly; never invokes a handler.
    pub fn terminate(&mut self) {
        self.transport.close();
        self.state = ConnectionState::Closed;
        self.protocol = None;
    }

    /// Poll the connection once. Never blocks.
    ///
    /// If the transport dropped while the connection was open, the client
    /// terminates and the close handler runs once with
    /// [`CloseCode::Abnormal`] and an empty reason. Otherwise, buffered bytes
    /// are handed to the frame reader.
    pub fn listen(&mut self) {
        if !self.transport.connected() {
            if self.state.is_open() {
                log::warn!("Connection lost: abnormal closure ({})", CloseCode::Abnormal);
                self.terminate();
                self.emit_close(CloseCode::Abnormal, &[]);
            }
            return;
        }

        if self.transport.available() {
            if let Some(reader) = self.frame_reader.as_mut() {
                reader.on_bytes_available(&mut self.transport);
            }
        }
    }

    /// Force the client closed and report `err` to the error handler.
    fn fail(&mut self, err: Error) -> Error {
        self.terminate();
        if let Some(handler) = self.on_error.as_mut() {
            handler(err);
        }
        err
    }
}

impl<T: std::fmt::Debug> std::fmt::Debug for WebSocketClient<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WebSocketClient")
            .field("transport", &self.transport)
            .field("config", &self.config)
            .field("state", &self.state)
            .field("protocol", &self.protocol)
            .finish_non_exhaustive()
    }
}
