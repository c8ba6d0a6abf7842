//! Check Types
//!
//! Data structures shared by the signal collector, score engine and
//! result assembler. No I/O here.

use serde::{Deserialize, Serialize};

// ============================================================================
// REQUEST
// ============================================================================

/// Password digests supplied by the caller. The plaintext never reaches us.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PasswordDigests {
    pub sha1: String,
    pub sha256: String,
    pub md5: String,
}

/// Already-validated input to the checker
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CredentialCheckRequest {
    pub email: String,
    pub password_digests: PasswordDigests,
}

// ============================================================================
// SIGNALS
// ============================================================================

/// Outcome of a single provider lookup
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Signal {
    /// Source confirmed the compromise condition
    Present,
    /// Source answered and the condition does not hold
    Absent,
    /// Source could not be reached, timed out or answered garbage
    Unavailable,
}

impl Signal {
    /// Fail-open: only a confirmed hit counts.
    pub fn is_present(self) -> bool {
        matches!(self, Signal::Present)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Signal::Present => "present",
            Signal::Absent => "absent",
            Signal::Unavailable => "unavailable",
        }
    }
}

impl From<bool> for Signal {
    fn from(hit: bool) -> Self {
        if hit { Signal::Present } else { Signal::Absent }
    }
}

impl std::fmt::Display for Signal {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// The four compromise signals for one request, in scoring order.
///
/// Fields are private so a vector can only be built whole; once built it
/// cannot be changed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
pub struct SignalVector {
    email_breached: bool,
    password_breached_globally: bool,
    password_breached_dark_web: bool,
    password_is_common: bool,
}

impl SignalVector {
    pub fn new(
        email_breached: bool,
        password_breached_globally: bool,
        password_breached_dark_web: bool,
        password_is_common: bool,
    ) -> Self {
        Self {
            email_breached,
            password_breached_globally,
            password_breached_dark_web,
            password_is_common,
        }
    }

    /// Build from the 4-bit pattern, most significant bit = email_breached
    #[cfg(test)]
    pub fn from_bits(bits: u8) -> Self {
        Self::new(
            bits & 0b1000 != 0,
            bits & 0b0100 != 0,
            bits & 0b0010 != 0,
            bits & 0b0001 != 0,
        )
    }

    /// 4-bit pattern used to index the score table
    pub fn bits(&self) -> u8 {
        (u8::from(self.email_breached) << 3)
            | (u8::from(self.password_breached_globally) << 2)
            | (u8::from(self.password_breached_dark_web) << 1)
            | u8::from(self.password_is_common)
    }

    /// Combination key stored with each audit row: "1" followed by the four flags
    pub fn legacy_key(&self) -> u32 {
        10_000
            + u32::from(self.email_breached) * 1_000
            + u32::from(self.password_breached_globally) * 100
            + u32::from(self.password_breached_dark_web) * 10
            + u32::from(self.password_is_common)
    }

    pub fn email_breached(&self) -> bool {
        self.email_breached
    }

    pub fn password_breached_globally(&self) -> bool {
        self.password_breached_globally
    }

    pub fn password_breached_dark_web(&self) -> bool {
        self.password_breached_dark_web
    }

    pub fn password_is_common(&self) -> bool {
        self.password_is_common
    }

    /// True if any of the three password signals fired
    pub fn password_compromised(&self) -> bool {
        self.password_breached_globally || self.password_breached_dark_web || self.password_is_common
    }
}

impl std::fmt::Display for SignalVector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:04b}", self.bits())
    }
}

// ============================================================================
// SCORE
// ============================================================================

/// Compromise confidence in [0, 100]
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct ConfidenceScore(u8);

impl ConfidenceScore {
    pub const MAX: u8 = 100;

    /// Values above 100 are clamped.
    pub const fn new(value: u8) -> Self {
        if value > Self::MAX { Self(Self::MAX) } else { Self(value) }
    }

    pub fn value(&self) -> u8 {
        self.0
    }
}

impl std::fmt::Display for ConfidenceScore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ============================================================================
// OUTPUTS
// ============================================================================

/// Caller-facing result of a check
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CheckResult {
    pub email_compromised: bool,
    pub password_compromised: bool,
    pub confidence_score: ConfidenceScore,
}

/// Wire shape of a check result, flags encoded as 0/1
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckResultData {
    pub is_email_compromised: u8,
    pub is_password_compromised: u8,
    pub compromised_confidence_score: u8,
}

impl From<CheckResult> for CheckResultData {
    fn from(result: CheckResult) -> Self {
        Self {
            is_email_compromised: u8::from(result.email_compromised),
            is_password_compromised: u8::from(result.password_compromised),
            compromised_confidence_score: result.confidence_score.value(),
        }
    }
}

/// One row of the check audit trail. Built once per request, never mutated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AuditRecord {
    pub email_breached: bool,
    pub password_breached_globally: bool,
    pub password_breached_dark_web: bool,
    pub password_is_common: bool,
    pub score: ConfidenceScore,
    pub source_ip: String,
    pub timestamp_seconds: i64,
}

impl AuditRecord {
    /// The signal vector this record was built from
    pub fn signals(&self) -> SignalVector {
        SignalVector::new(
            self.email_breached,
            self.password_breached_globally,
            self.password_breached_dark_web,
            self.password_is_common,
        )
    }
}
