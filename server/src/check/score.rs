//! Score Engine
//!
//! Maps a `SignalVector` to a `ConfidenceScore` through a fixed decision
//! table. The table is business policy: entries are not derived and some are
//! deliberately non-monotonic (email-only = 5, dark-web-only = 65).

use super::types::{ConfidenceScore, SignalVector};

/// Bumped whenever an entry in `SCORE_TABLE` changes.
pub const SCORE_TABLE_VERSION: u32 = 1;

/// Indexed by `SignalVector::bits()`:
/// email_breached, password_breached_globally, password_breached_dark_web, password_is_common
pub const SCORE_TABLE: [ConfidenceScore; 16] = [
    ConfidenceScore::new(0),   // 0000
    ConfidenceScore::new(0),   // 0001
    ConfidenceScore::new(65),  // 0010
    ConfidenceScore::new(88),  // 0011
    ConfidenceScore::new(15),  // 0100
    ConfidenceScore::new(25),  // 0101
    ConfidenceScore::new(65),  // 0110
    ConfidenceScore::new(65),  // 0111
    ConfidenceScore::new(5),   // 1000
    ConfidenceScore::new(79),  // 1001
    ConfidenceScore::new(65),  // 1010
    ConfidenceScore::new(93),  // 1011
    ConfidenceScore::new(40),  // 1100
    ConfidenceScore::new(85),  // 1101
    ConfidenceScore::new(100), // 1110
    ConfidenceScore::new(100), // 1111
];

/// Score a signal vector. Pure and total.
pub fn score(signals: &SignalVector) -> ConfidenceScore {
    SCORE_TABLE[usize::from(signals.bits())]
}
