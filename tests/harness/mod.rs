//! Test harness utilities for driving the client without a network.
//!
//! This module provides a scripted in-memory transport and helpers for
//! building server responses.

#![allow(dead_code)]

mod transport;

pub use transport::MockTransport;

use rsws_client::{Nonce, NonceGenerator, compute_accept_key};

/// Seed used by every test client so that nonces are predictable.
pub const SEED: u64 = 0x5EED;

/// The first nonce a client seeded with [`SEED`] sends.
pub fn first_nonce() -> Nonce {
    NonceGenerator::with_seed(SEED).generate()
}

/// A complete, valid 101 response for `nonce`, with optional extra header lines.
pub fn valid_response(nonce: &Nonce, extra: &[&str]) -> Vec<u8> {
    let mut response = format!(
        "HTTP/1.1 101 Switching Protocols\r\n\
         Upgrade: websocket\r\n\
         Connection: Upgrade\r\n\
         Sec-WebSocket-Accept: {}\r\n",
        compute_accept_key(nonce.as_str())
    );
    for line in extra {
        response.push_str(line);
        response.push_str("\r\n");
    }
    response.push_str("\r\n");
    response.into_bytes()
}
