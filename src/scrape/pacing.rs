//! Request pacing heuristics
//!
//! Randomized delays and user-agent rotation used to keep outbound
//! fetches from looking automated. Best effort, not a correctness
//! requirement. All helpers take the RNG as a parameter so tests can
//! seed a deterministic one.

use rand::Rng;
use std::time::Duration;

/// User agents rotated across outbound fetches
pub const USER_AGENTS: &[&str] = &[
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36",
    "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/605.1.15 (KHTML, like Gecko) Version/14.1.2 Safari/605.1.15",
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64; rv:89.0) Gecko/20100101 Firefox/89.0",
    "Mozilla/5.0 (iPhone; CPU iPhone OS 14_4 like Mac OS X) AppleWebKit/605.1.15 (KHTML, like Gecko) CriOS/91.0.4472.77 Mobile/15E148 Safari/604.1",
    "Mozilla/5.0 (Linux; Android 11; Pixel 5) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/91.0.4472.77 Mobile Safari/537.36",
];

/// Pick a user agent from the rotation pool
pub fn random_user_agent<R: Rng>(rng: &mut R) -> &'static str {
    USER_AGENTS[rng.gen_range(0..USER_AGENTS.len())]
}

/// Uniform random delay in `[lo_secs, hi_secs)`
///
/// Degenerate ranges (hi <= lo) collapse to `lo_secs`.
pub fn uniform_delay<R: Rng>(rng: &mut R, lo_secs: f64, hi_secs: f64) -> Duration {
    let secs = if hi_secs > lo_secs {
        rng.gen_range(lo_secs..hi_secs)
    } else {
        lo_secs
    };
    Duration::from_secs_f64(secs)
}
