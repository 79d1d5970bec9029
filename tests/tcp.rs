//! Loopback tests over real TCP sockets.
//!
//! A minimal handshake server runs on a background thread; the client uses
//! `TcpTransport` exactly as it would against a remote host.

use rsws_client::{
    CloseCode, Config, ConnectionState, Error, TcpTransport, WebSocketClient, compute_accept_key,
};
use std::cell::RefCell;
use std::io::{BufRead, BufReader, Write};
use std::net::TcpListener;
use std::rc::Rc;
use std::thread;
use std::time::Duration;

/// Accept one connection, answer the handshake, then hang up.
fn spawn_server(protocol: Option<&'static str>) -> (u16, thread::JoinHandle<String>) {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let port = listener.local_addr().unwrap().port();

    let handle = thread::spawn(move || {
        let (stream, _) = listener.accept().unwrap();
        let mut reader = BufReader::new(stream.try_clone().unwrap());
        let mut request = String::new();
        loop {
            let mut line = String::new();
            reader.read_line(&mut line).unwrap();
            request.push_str(&line);
            if line == "\r\n" || line.is_empty() {
                break;
            }
        }

        let key = request
            .lines()
            .find_map(|line| line.strip_prefix("Sec-WebSocket-Key: "))
            .unwrap();
        let mut response = format!(
            "HTTP/1.1 101 Switching Protocols\r\n\
             Upgrade: websocket\r\n\
             Connection: Upgrade\r\n\
             Sec-WebSocket-Accept: {}\r\n",
            compute_accept_key(key)
        );
        if let Some(protocol) = protocol {
            response.push_str(&format!("Sec-WebSocket-Protocol: {protocol}\r\n"));
        }
        response.push_str("\r\n");

        let mut stream = stream;
        stream.write_all(response.as_bytes()).unwrap();
        stream.flush().unwrap();
        // Give the client time to read before hanging up.
        thread::sleep(Duration::from_millis(100));
        request
    });

    (port, handle)
}

#[test]
fn test_tcp_handshake_and_abnormal_closure() {
    let (port, server) = spawn_server(Some("chat"));

    let mut client = WebSocketClient::with_config(TcpTransport::new(), Config::default());
    let closes: Rc<RefCell<Vec<CloseCode>>> = Rc::default();
    let sink = closes.clone();
    client.on_close(move |_, code, reason| {
        assert!(reason.is_empty());
        sink.borrow_mut().push(code);
    });

    client.open("127.0.0.1", port, "/chat", Some("chat")).unwrap();
    assert_eq!(client.state(), ConnectionState::Open);
    assert_eq!(client.protocol(), Some("chat"));

    let request = server.join().unwrap();
    assert!(request.starts_with("GET /chat HTTP/1.1\r\n"));
    assert!(request.contains(&format!("Host: 127.0.0.1:{port}\r\n")));
    assert!(request.contains("Sec-WebSocket-Protocol: chat\r\n"));

    for _ in 0..200 {
        client.listen();
        if !closes.borrow().is_empty() {
            break;
        }
        thread::sleep(Duration::from_millis(10));
    }

    assert_eq!(*closes.borrow(), vec![CloseCode::Abnormal]);
    assert_eq!(client.state(), ConnectionState::Closed);
    assert_eq!(client.protocol(), None);

    client.listen();
    assert_eq!(closes.borrow().len(), 1);
}

#[test]
fn test_tcp_connection_refused() {
    let port = {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        listener.local_addr().unwrap().port()
    };

    let mut client = WebSocketClient::new(TcpTransport::new());
    let errors: Rc<RefCell<Vec<Error>>> = Rc::default();
    let sink = errors.clone();
    client.on_error(move |err| sink.borrow_mut().push(err));

    assert_eq!(
        client.open("127.0.0.1", port, "/", None),
        Err(Error::ConnectionRefused)
    );
    assert_eq!(*errors.borrow(), vec![Error::ConnectionRefused]);
}

#[test]
fn test_tcp_silent_server_times_out() {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let port = listener.local_addr().unwrap().port();
    let server = thread::spawn(move || {
        let (stream, _) = listener.accept().unwrap();
        thread::sleep(Duration::from_millis(300));
        drop(stream);
    });

    let config = Config::new()
        .with_max_attempts(5)
        .with_poll_delay(Duration::from_millis(10));
    let mut client = WebSocketClient::with_config(TcpTransport::new(), config);

    assert_eq!(
        client.open("127.0.0.1", port, "/", None),
        Err(Error::RequestTimeout)
    );
    assert_eq!(client.state(), ConnectionState::Closed);
    server.join().unwrap();
}
