//! `Sec-WebSocket-Key` generation.
//!
//! The nonce only decorrelates one handshake from another so that caches and
//! intermediaries cannot replay an old upgrade response. It is not a secret
//! and is not a security credential. The generator below is a plain
//! non-cryptographic PRNG seeded once per process from whatever entropy the
//! environment offers, which is adequate for that purpose and nothing more.
//! Do not reuse it where unpredictability matters.

use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use std::sync::OnceLock;
use std::sync::atomic::{AtomicU64, Ordering};

/// Raw nonce length in bytes.
pub const NONCE_LEN: usize = 16;

/// Base64-encoded nonce length in characters.
pub const NONCE_ENCODED_LEN: usize = 24;

static PROCESS_SEED: OnceLock<u64> = OnceLock::new();
static STREAMS: AtomicU64 = AtomicU64::new(0);

/// Read the environment entropy once per process.
/// Falls back to system time if getrandom fails.
fn process_seed() -> u64 {
    *PROCESS_SEED.get_or_init(|| {
        let mut buf = [0u8; 8];
        if getrandom::getrandom(&mut buf).is_ok() {
            u64::from_le_bytes(buf)
        } else {
            use std::time::{SystemTime, UNIX_EPOCH};
            SystemTime::now()
                .duration_since(UNIX_EPOCH)
                .map(|d| d.as_nanos() as u64)
                .unwrap_or(0x1234_5678_9ABC_DEF0)
        }
    })
}

/// A base64-encoded handshake nonce, valid for one handshake attempt.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct Nonce {
    encoded: [u8; NONCE_ENCODED_LEN],
}

impl Nonce {
    /// Encode 16 raw bytes.
    #[must_use]
    pub fn from_raw(raw: [u8; NONCE_LEN]) -> Self {
        let mut encoded = [0u8; NONCE_ENCODED_LEN];
        // 16 bytes always encode to exactly 24 characters.
        let written = BASE64.encode_slice(raw, &mut encoded).unwrap_or_default();
        debug_assert_eq!(written, NONCE_ENCODED_LEN);
        Self { encoded }
    }

    /// The nonce as sent in `Sec-WebSocket-Key`.
    #[must_use]
    pub fn as_str(&self) -> &str {
        // Base64 output is ASCII.
        std::str::from_utf8(&self.encoded).unwrap_or_default()
    }
}

impl std::fmt::Debug for Nonce {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("Nonce").field(&self.as_str()).finish()
    }
}

impl std::fmt::Display for Nonce {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Produces a fresh [`Nonce`] for every handshake attempt.
#[derive(Debug, Clone)]
pub struct NonceGenerator {
    state: u64,
}

impl Default for NonceGenerator {
    fn default() -> Self {
        Self::new()
    }
}

impl NonceGenerator {
    /// Create a generator seeded from the process-wide entropy value.
    ///
    /// Each generator gets its own stream so that two clients in the same
    /// process do not emit the same keys.
    #[must_use]
    pub fn new() -> Self {
        let stream = STREAMS.fetch_add(1, Ordering::Relaxed);
        Self::with_seed(process_seed() ^ stream.wrapping_mul(0xD6E8_FEB8_6659_FD93))
    }

    /// Create a generator with a fixed seed. Output is fully deterministic.
    #[must_use]
    pub const fn with_seed(seed: u64) -> Self {
        Self { state: seed }
    }

    fn next_u64(&mut self) -> u64 {
        // splitmix64
        self.state = self.state.wrapping_add(0x9E37_79B9_7F4A_7C15);
        let mut z = self.state;
        z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
        z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
        z ^ (z >> 31)
    }

    /// Generate the next nonce.
    pub fn generate(&mut self) -> Nonce {
        let mut raw = [0u8; NONCE_LEN];
        let (lo, hi) = raw.split_at_mut(8);
        lo.copy_from_slice(&self.next_u64().to_le_bytes());
        hi.copy_from_slice(&self.next_u64().to_le_bytes());
        Nonce::from_raw(raw)
    }
}
