//! Centralized constants for the assistant
//!
//! Single source of truth for the mock-value ranges and the default limits
//! used across the crates.

/// Ranges for synthesized placeholder values.
///
/// These are presentation placeholders, not real wait times or bookings.
pub mod mock {
    /// Estimated wait for a queue at a branch, in minutes (inclusive)
    pub const WAIT_ESTIMATE_MIN: u32 = 10;
    pub const WAIT_ESTIMATE_MAX: u32 = 39;

    /// Virtual queue ticket number (inclusive, always four digits)
    pub const QUEUE_NUMBER_MIN: u32 = 1000;
    pub const QUEUE_NUMBER_MAX: u32 = 9999;

    /// Numeric part of an appointment confirmation code (inclusive, five digits)
    pub const CONFIRMATION_CODE_MIN: u32 = 10_000;
    pub const CONFIRMATION_CODE_MAX: u32 = 99_999;

    /// Prefix of appointment confirmation codes
    pub const CONFIRMATION_CODE_PREFIX: &str = "BNK-";

    /// Fixed position reported right after joining a queue
    pub const JOINED_QUEUE_POSITION: &str = "4 of 15";

    /// Fixed wait reported right after joining a queue
    pub const JOINED_QUEUE_WAIT: &str = "25 minutes";
}

/// Session lifecycle defaults
pub mod sessions {
    /// Maximum concurrent dialogue sessions
    pub const MAX_SESSIONS: usize = 1000;

    /// Idle time after which a session is discarded (seconds)
    pub const SESSION_TIMEOUT_SECS: u64 = 3600;

    /// Interval between expired-session sweeps (seconds)
    pub const CLEANUP_INTERVAL_SECS: u64 = 300;
}

/// Server defaults
pub mod server {
    pub const DEFAULT_HOST: &str = "0.0.0.0";
    pub const DEFAULT_PORT: u16 = 8080;
    pub const DEFAULT_TIMEOUT_SECS: u64 = 30;
    pub const DEFAULT_CORS_ORIGIN: &str = "http://localhost:3000";
}

/// Brand shown in the opening greeting
pub const DEFAULT_BRAND: &str = "Y-Wait Banking";
