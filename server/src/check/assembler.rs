//! Result Assembler
//!
//! Pure combination step: signals + score + request context in,
//! caller-facing result and audit record out.

use super::types::{AuditRecord, CheckResult, ConfidenceScore, SignalVector};

/// Request metadata that ends up in the audit trail
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestContext {
    pub source_ip: String,
    pub timestamp_seconds: i64,
}

pub fn assemble(
    signals: &SignalVector,
    score: ConfidenceScore,
    context: &RequestContext,
) -> (CheckResult, AuditRecord) {
    let result = CheckResult {
        email_compromised: signals.email_breached(),
        password_compromised: signals.password_compromised(),
        confidence_score: score,
    };

    let record = AuditRecord {
        email_breached: signals.email_breached(),
        password_breached_globally: signals.password_breached_globally(),
        password_breached_dark_web: signals.password_breached_dark_web(),
        password_is_common: signals.password_is_common(),
        score,
        source_ip: context.source_ip.clone(),
        timestamp_seconds: context.timestamp_seconds,
    };

    (result, record)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::check::score::score;

    fn context() -> RequestContext {
        RequestContext {
            source_ip: "203.0.113.7".to_string(),
            timestamp_seconds: 1_700_000_000,
        }
    }

    #[test]
    fn test_all_clear() {
        let v = SignalVector::new(false, false, false, false);
        let (result, record) = assemble(&v, score(&v), &context());

        assert!(!result.email_compromised);
        assert!(!result.password_compromised);
        assert_eq!(result.confidence_score.value(), 0);
        assert_eq!(record.score.value(), 0);
    }

    #[test]
    fn test_email_and_common_password() {
        let v = SignalVector::new(true, false, false, true);
        let (result, record) = assemble(&v, score(&v), &context());

        assert!(result.email_compromised);
        assert!(result.password_compromised);
        assert_eq!(result.confidence_score.value(), 79);
        assert!(record.email_breached && record.password_is_common);
        assert!(!record.password_breached_globally && !record.password_breached_dark_web);
    }

    #[test]
    fn test_password_compromised_for_every_password_signal() {
        for bits in 0u8..16 {
            let v = SignalVector::from_bits(bits);
            let (result, _) = assemble(&v, score(&v), &context());
            let any = v.password_breached_globally() || v.password_breached_dark_web() || v.password_is_common();
            assert_eq!(result.password_compromised, any, "pattern {}", v);
            assert_eq!(result.email_compromised, v.email_breached());
        }
    }

    #[test]
    fn test_record_carries_context() {
        let v = SignalVector::new(false, false, true, false);
        let (_, record) = assemble(&v, score(&v), &context());

        assert_eq!(record.source_ip, "203.0.113.7");
        assert_eq!(record.timestamp_seconds, 1_700_000_000);
        assert_eq!(record.score.value(), 65);
    }
}
