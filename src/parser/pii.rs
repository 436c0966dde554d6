//! Lightweight PII classification of field values.
//!
//! Used by the transaction renderer to annotate values that look like
//! personal data. Heuristic by design: these are shape classifiers, not
//! validators (no Luhn check, no DNS lookup).

use std::sync::OnceLock;

use regex::Regex;

/// Category of personal data a value resembles
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PiiKind {
    Email,
    Ssn,
    MacAddress,
    Ipv4Address,
    CreditCard,
    Phone,
}

impl PiiKind {
    /// Short label used in rendered output
    pub fn label(&self) -> &'static str {
        match self {
            Self::Email => "email",
            Self::Ssn => "ssn",
            Self::MacAddress => "mac",
            Self::Ipv4Address => "ipv4",
            Self::CreditCard => "credit-card",
            Self::Phone => "phone",
        }
    }
}

/// Classify a value against the builtin PII shapes.
///
/// **Public** - returns the first matching category, in specificity order
/// (email and SSN before the looser numeric shapes), or None for values
/// that resemble nothing personal.
pub fn detect_pii(value: &str) -> Option<PiiKind> {
    for (kind, pattern) in classifiers() {
        if pattern.is_match(value) {
            return Some(*kind);
        }
    }
    None
}

/// Compiled classifier table, ordered most-specific first
///
/// **Private** - patterns are literals; compilation cannot fail
fn classifiers() -> &'static [(PiiKind, Regex)] {
    static CLASSIFIERS: OnceLock<Vec<(PiiKind, Regex)>> = OnceLock::new();
    CLASSIFIERS.get_or_init(|| {
        let table: &[(PiiKind, &str)] = &[
            (PiiKind::Email, r"[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}"),
            (PiiKind::Ssn, r"\b\d{3}-\d{2}-\d{4}\b"),
            (PiiKind::MacAddress, r"\b(?:[0-9A-Fa-f]{2}:){5}[0-9A-Fa-f]{2}\b"),
            (PiiKind::Ipv4Address, r"\b(?:\d{1,3}\.){3}\d{1,3}\b"),
            (PiiKind::CreditCard, r"\b\d{4}[ -]?\d{4}[ -]?\d{4}[ -]?\d{4}\b"),
            (PiiKind::Phone, r"\b\+?1?[ .-]?\(?\d{3}\)?[ .-]?\d{3}[ .-]?\d{4}\b"),
        ];
        table
            .iter()
            .map(|(kind, pattern)| {
                (*kind, Regex::new(pattern).expect("builtin PII pattern is valid"))
            })
            .collect()
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_email() {
        assert_eq!(detect_pii("alice@example.com"), Some(PiiKind::Email));
        assert_eq!(detect_pii("contact: bob.smith+x@mail.co"), Some(PiiKind::Email));
    }

    #[test]
    fn test_ipv4() {
        assert_eq!(detect_pii("192.168.1.100"), Some(PiiKind::Ipv4Address));
        assert_eq!(detect_pii("src=10.0.0.1 dst=10.0.0.2"), Some(PiiKind::Ipv4Address));
    }

    #[test]
    fn test_mac() {
        assert_eq!(detect_pii("de:ad:be:ef:00:01"), Some(PiiKind::MacAddress));
    }

    #[test]
    fn test_ssn_shape() {
        assert_eq!(detect_pii("123-45-6789"), Some(PiiKind::Ssn));
    }

    #[test]
    fn test_credit_card_shape() {
        assert_eq!(detect_pii("4111 1111 1111 1111"), Some(PiiKind::CreditCard));
        assert_eq!(detect_pii("4111-1111-1111-1111"), Some(PiiKind::CreditCard));
    }

    #[test]
    fn test_phone_shape() {
        assert_eq!(detect_pii("(555) 867-5309"), Some(PiiKind::Phone));
        assert_eq!(detect_pii("+1 555-867-5309"), Some(PiiKind::Phone));
    }

    #[test]
    fn test_plain_values_pass() {
        assert_eq!(detect_pii("server1"), None);
        assert_eq!(detect_pii("error"), None);
        assert_eq!(detect_pii("200"), None);
        assert_eq!(detect_pii(""), None);
    }

    #[test]
    fn test_specificity_order() {
        // an email containing digits is an email, not a phone number
        assert_eq!(detect_pii("a1234567890@example.com"), Some(PiiKind::Email));
    }
}
