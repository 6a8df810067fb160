//! Shared constants for end-to-end tests.

/// Bearer token the mock backend accepts.
pub const TEST_TOKEN: &str = "test-token-123";

/// A credential the mock backend rejects with 401.
pub const WRONG_TOKEN: &str = "expired-token";

/// Timeout for individual HTTP requests (seconds).
pub const REQUEST_TIMEOUT_SECS: u64 = 10;

/// OCR text the mock backend returns for the reference receipt.
pub const LIDL_OCR_TEXT: &str = "Lidl ... 23.40 ...";
