//! Performance benchmarks for the client handshake.
//!
//! Run with: `cargo bench`

use criterion::{black_box, criterion_group, criterion_main, Criterion, Throughput};
use rsws_client::protocol::{
    LineBuffer, Nonce, NonceGenerator, ResponseParser, compute_accept_key,
};

// =============================================================================
// Key Benchmarks
// =============================================================================

fn bench_keys(c: &mut Criterion) {
    let mut group = c.benchmark_group("keys");

    let mut generator = NonceGenerator::with_seed(1);
    group.bench_function("generate_nonce", |b| b.iter(|| generator.generate()));

    group.bench_function("compute_accept_key", |b| {
        b.iter(|| compute_accept_key(black_box("dGhlIHNhbXBsZSBub25jZQ==")))
    });

    group.finish();
}

// =============================================================================
// Response Parsing Benchmarks
// =============================================================================

fn bench_response_parsing(c: &mut Criterion) {
    let mut group = c.benchmark_group("response_parsing");

    let nonce = Nonce::from_raw(*b"the sample nonce");
    let response = b"HTTP/1.1 101 Switching Protocols\r\n\
        Server: bench\r\n\
        Upgrade: websocket\r\n\
        Connection: Upgrade\r\n\
        Sec-WebSocket-Accept: s3pPLMBiTxaQ9kYGzzhZRbK+xOo=\r\n\
        Sec-WebSocket-Protocol: chat\r\n\
        \r\n";

    group.throughput(Throughput::Bytes(response.len() as u64));
    group.bench_function("valid_101", |b| {
        b.iter(|| {
            let mut parser = ResponseParser::new(&nonce);
            parser.push_slice(black_box(response)).map(|_| parser.flags())
        })
    });

    group.bench_function("header_split", |b| {
        let mut line = LineBuffer::<128>::new();
        line.extend_from_slice(b"Sec-WebSocket-Accept: s3pPLMBiTxaQ9kYGzzhZRbK+xOo=");
        b.iter(|| black_box(&line).header().1.len())
    });

    group.finish();
}

criterion_group!(benches, bench_keys, bench_response_parsing);
criterion_main!(benches);
