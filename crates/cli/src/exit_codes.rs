//! CLI Exit Code Registry
//!
//! This is the single source of truth for all CLI exit codes.
//! Exit codes are part of the shell contract — scripts rely on them.
//!
//! # Exit Code Ranges
//!
//! | Range   | Domain           | Description                              |
//! |---------|------------------|------------------------------------------|
//! | 0       | Universal        | Success                                  |
//! | 1       | Universal        | General error (unspecified)              |
//! | 2       | Universal        | CLI usage error (bad args, missing file) |
//! | 3-9     | population       | Config, feed parsing and output codes    |
//! | 50-59   | fetch            | Feed download codes                      |
//!
//! # Adding New Exit Codes
//!
//! 1. Add the constant in the appropriate range
//! 2. Document what triggers it
//! 3. Update the table above
//! 4. Wire it into the relevant command's error handling

// =============================================================================
// Universal (0-2)
// =============================================================================

/// Success - command completed without errors.
pub const EXIT_SUCCESS: u8 = 0;

/// General error - unspecified failure.
/// Avoid using this; prefer a specific error code.
pub const EXIT_ERROR: u8 = 1;

/// Usage error - bad arguments, unreadable input file.
pub const EXIT_USAGE: u8 = 2;

// =============================================================================
// Population (3-9)
// =============================================================================

/// Config file unreadable, malformed, or failing validation.
pub const EXIT_CONFIG_INVALID: u8 = 3;

/// Feed is not a usable CSV (missing key column, broken quoting).
pub const EXIT_FEED_PARSE: u8 = 4;

/// Output file could not be written.
pub const EXIT_OUTPUT_WRITE: u8 = 5;

// =============================================================================
// Fetch (50-59)
// =============================================================================

/// Feed request rejected by upstream (4xx other than 429).
pub const EXIT_FETCH_REJECTED: u8 = 52;

/// Rate limited after retries (429).
pub const EXIT_FETCH_RATE_LIMIT: u8 = 53;

/// Upstream error (5xx) or network failure after retries.
pub const EXIT_FETCH_UPSTREAM: u8 = 54;
