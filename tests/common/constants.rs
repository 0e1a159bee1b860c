//! Shared constants for end-to-end tests

/// Timeout for individual HTTP requests made by the test client.
pub const REQUEST_TIMEOUT_SECS: u64 = 10;

/// How long to wait for a spawned server to accept requests.
pub const SERVER_READY_TIMEOUT_MS: u64 = 5000;

/// Poll interval while waiting for a spawned server.
pub const SERVER_READY_POLL_INTERVAL_MS: u64 = 50;

/// A progression the stub backend reports as tonal in C Major.
pub const TONAL_PROGRESSION: [&str; 4] = ["C", "Am", "F", "G"];
