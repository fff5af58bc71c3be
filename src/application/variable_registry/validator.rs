//! `validateValue` per data type (spec.md §4.1).

use regex::Regex;
use std::sync::OnceLock;

use crate::domain::variable::{DataType, VariableMetadata};

/// OCPP 2.0.1 `SetVariableStatus` rejection reasons this validator can produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rejection {
    InvalidValue,
    ValueTooLow,
    ValueTooHigh,
    ValuePositiveOnly,
    ValueZeroNotAllowed,
    InvalidURL,
    ReadOnly,
    RebootRequired,
}

impl Rejection {
    pub fn as_status_str(&self) -> &'static str {
        match self {
            Rejection::InvalidValue => "Rejected",
            Rejection::ValueTooLow => "Rejected",
            Rejection::ValueTooHigh => "Rejected",
            Rejection::ValuePositiveOnly => "Rejected",
            Rejection::ValueZeroNotAllowed => "Rejected",
            Rejection::InvalidURL => "Rejected",
            Rejection::ReadOnly => "Rejected",
            Rejection::RebootRequired => "RebootRequired",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationOutcome {
    Accepted,
    Rejected(Rejection),
}

fn integer_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^-?\d+$").expect("static regex"))
}

fn decimal_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^-?\d+(\.\d+)?$").expect("static regex"))
}

/// Validates `value` against `metadata`. MaxLength is enforced first on every
/// path; enumeration membership is checked after type-specific validation for
/// scalar types (spec.md §4.1 ordering note).
pub fn validate_value(metadata: &VariableMetadata, value: &str) -> ValidationOutcome {
    use crate::domain::variable::Mutability;

    if matches!(metadata.mutability, Mutability::ReadOnly) {
        return ValidationOutcome::Rejected(Rejection::ReadOnly);
    }

    if let Some(max_len) = metadata.max_length {
        if value.len() > max_len {
            return ValidationOutcome::Rejected(Rejection::InvalidValue);
        }
    }

    let outcome = match metadata.data_type {
        DataType::Boolean => validate_boolean(value),
        DataType::DateTime => validate_date_time(value),
        DataType::Integer => validate_integer(metadata, value),
        DataType::Decimal => validate_decimal(metadata, value),
        DataType::String => validate_string(metadata, value),
        DataType::OptionList => validate_option_list(metadata, value),
        DataType::MemberList => validate_member_list(metadata, value),
        DataType::SequenceList => validate_sequence_list(metadata, value),
    };

    if outcome != ValidationOutcome::Accepted {
        return outcome;
    }

    if matches!(
        metadata.data_type,
        DataType::String | DataType::Boolean | DataType::DateTime
    ) {
        if let Some(enumeration) = &metadata.enumeration {
            if !enumeration.iter().any(|allowed| allowed == value) {
                return ValidationOutcome::Rejected(Rejection::InvalidValue);
            }
        }
    }

    if metadata.reboot_required {
        return ValidationOutcome::Rejected(Rejection::RebootRequired);
    }

    ValidationOutcome::Accepted
}

fn validate_boolean(value: &str) -> ValidationOutcome {
    match value {
        "true" | "false" => ValidationOutcome::Accepted,
        _ => ValidationOutcome::Rejected(Rejection::InvalidValue),
    }
}

fn validate_date_time(value: &str) -> ValidationOutcome {
    match chrono::DateTime::parse_from_rfc3339(value) {
        Ok(_) => ValidationOutcome::Accepted,
        Err(_) => ValidationOutcome::Rejected(Rejection::InvalidValue),
    }
}

fn validate_integer(metadata: &VariableMetadata, value: &str) -> ValidationOutcome {
    if !integer_regex().is_match(value) {
        return ValidationOutcome::Rejected(Rejection::InvalidValue);
    }
    let parsed: i64 = match value.parse() {
        Ok(n) => n,
        Err(_) => return ValidationOutcome::Rejected(Rejection::InvalidValue),
    };
    validate_numeric_bounds(metadata, parsed as f64)
}

fn validate_decimal(metadata: &VariableMetadata, value: &str) -> ValidationOutcome {
    if !decimal_regex().is_match(value) {
        return ValidationOutcome::Rejected(Rejection::InvalidValue);
    }
    let parsed: f64 = match value.parse() {
        Ok(n) => n,
        Err(_) => return ValidationOutcome::Rejected(Rejection::InvalidValue),
    };
    validate_numeric_bounds(metadata, parsed)
}

fn validate_numeric_bounds(metadata: &VariableMetadata, parsed: f64) -> ValidationOutcome {
    if metadata.positive && parsed < 0.0 {
        return ValidationOutcome::Rejected(Rejection::ValuePositiveOnly);
    }
    if parsed == 0.0 && !metadata.allow_zero {
        return ValidationOutcome::Rejected(if metadata.positive {
            Rejection::ValuePositiveOnly
        } else {
            Rejection::ValueZeroNotAllowed
        });
    }

    if let Some(min) = metadata.min {
        if parsed < min {
            return ValidationOutcome::Rejected(Rejection::ValueTooLow);
        }
    }
    if let Some(max) = metadata.max {
        if parsed > max {
            return ValidationOutcome::Rejected(Rejection::ValueTooHigh);
        }
    }
    ValidationOutcome::Accepted
}

fn validate_string(metadata: &VariableMetadata, value: &str) -> ValidationOutcome {
    if metadata.is_url {
        return validate_url(metadata, value);
    }
    ValidationOutcome::Accepted
}

fn validate_url(metadata: &VariableMetadata, value: &str) -> ValidationOutcome {
    let parsed = match url::Url::parse(value) {
        Ok(u) => u,
        Err(_) => return ValidationOutcome::Rejected(Rejection::InvalidURL),
    };
    if let Some(schemes) = &metadata.url_schemes {
        if !schemes.iter().any(|s| s == parsed.scheme()) {
            return ValidationOutcome::Rejected(Rejection::InvalidURL);
        }
    }
    ValidationOutcome::Accepted
}

/// OptionList: comma-separated, caller picks exactly one listed value.
fn validate_option_list(metadata: &VariableMetadata, value: &str) -> ValidationOutcome {
    match &metadata.enumeration {
        Some(allowed) if allowed.iter().any(|a| a == value) => ValidationOutcome::Accepted,
        Some(_) => ValidationOutcome::Rejected(Rejection::InvalidValue),
        None => ValidationOutcome::Accepted,
    }
}

/// MemberList: comma-separated subset of the enumeration, every member valid,
/// no duplicates, no empty members, no leading/trailing separator.
fn validate_member_list(metadata: &VariableMetadata, value: &str) -> ValidationOutcome {
    validate_list(metadata, value, false)
}

/// SequenceList: like MemberList, but order is meaningful so duplicates are
/// still rejected (order doesn't exempt an element from being listed twice).
fn validate_sequence_list(metadata: &VariableMetadata, value: &str) -> ValidationOutcome {
    validate_list(metadata, value, true)
}

fn validate_list(metadata: &VariableMetadata, value: &str, _ordered: bool) -> ValidationOutcome {
    if value.is_empty() || value.starts_with(',') || value.ends_with(',') {
        return ValidationOutcome::Rejected(Rejection::InvalidValue);
    }
    let members: Vec<&str> = value.split(',').collect();
    if members.iter().any(|m| m.is_empty()) {
        return ValidationOutcome::Rejected(Rejection::InvalidValue);
    }

    let mut seen = std::collections::HashSet::new();
    for member in &members {
        if !seen.insert(*member) {
            return ValidationOutcome::Rejected(Rejection::InvalidValue);
        }
    }

    if let Some(allowed) = &metadata.enumeration {
        for member in &members {
            if !allowed.iter().any(|a| a == member) {
                return ValidationOutcome::Rejected(Rejection::InvalidValue);
            }
        }
    }

    ValidationOutcome::Accepted
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::variable::{VariableKey, VariableMetadataBuilder};

    fn integer_metadata() -> VariableMetadata {
        VariableMetadataBuilder::new(VariableKey::new("OCPPCommCtrlr", "HeartbeatInterval"), DataType::Integer)
            .bounds(Some(1.0), Some(86400.0))
            .positive(true)
            .allow_zero(false)
            .build()
    }

    #[test]
    fn rejects_non_numeric_integer() {
        assert_eq!(
            validate_value(&integer_metadata(), "abc"),
            ValidationOutcome::Rejected(Rejection::InvalidValue)
        );
    }

    #[test]
    fn s5_rejects_zero_as_positive_only_when_positive_and_zero_disallowed() {
        assert_eq!(
            validate_value(&integer_metadata(), "0"),
            ValidationOutcome::Rejected(Rejection::ValuePositiveOnly)
        );
    }

    #[test]
    fn rejects_zero_when_not_allowed_and_not_positive_only() {
        let metadata = VariableMetadataBuilder::new(VariableKey::new("A", "B"), DataType::Integer)
            .allow_zero(false)
            .build();
        assert_eq!(
            validate_value(&metadata, "0"),
            ValidationOutcome::Rejected(Rejection::ValueZeroNotAllowed)
        );
    }

    #[test]
    fn rejects_negative_when_positive_only() {
        assert_eq!(
            validate_value(&integer_metadata(), "-5"),
            ValidationOutcome::Rejected(Rejection::ValuePositiveOnly)
        );
    }

    #[test]
    fn rejects_above_max() {
        assert_eq!(
            validate_value(&integer_metadata(), "999999"),
            ValidationOutcome::Rejected(Rejection::ValueTooHigh)
        );
    }

    #[test]
    fn accepts_in_range_integer() {
        assert_eq!(validate_value(&integer_metadata(), "300"), ValidationOutcome::Accepted);
    }

    #[test]
    fn read_only_always_rejected() {
        let metadata = VariableMetadataBuilder::new(VariableKey::new("A", "B"), DataType::String)
            .mutability(crate::domain::variable::Mutability::ReadOnly)
            .build();
        assert_eq!(
            validate_value(&metadata, "x"),
            ValidationOutcome::Rejected(Rejection::ReadOnly)
        );
    }

    #[test]
    fn member_list_rejects_duplicates() {
        let metadata = VariableMetadataBuilder::new(VariableKey::new("A", "B"), DataType::MemberList)
            .enumeration(vec!["Core".into(), "FirmwareManagement".into()])
            .build();
        assert_eq!(
            validate_value(&metadata, "Core,Core"),
            ValidationOutcome::Rejected(Rejection::InvalidValue)
        );
    }

    #[test]
    fn member_list_accepts_valid_subset() {
        let metadata = VariableMetadataBuilder::new(VariableKey::new("A", "B"), DataType::MemberList)
            .enumeration(vec!["Core".into(), "FirmwareManagement".into()])
            .build();
        assert_eq!(
            validate_value(&metadata, "Core,FirmwareManagement"),
            ValidationOutcome::Accepted
        );
    }

    #[test]
    fn url_rejects_disallowed_scheme() {
        let metadata = VariableMetadataBuilder::new(VariableKey::new("A", "B"), DataType::String)
            .url(Some(vec!["https".into()]))
            .build();
        assert_eq!(
            validate_value(&metadata, "http://example.com"),
            ValidationOutcome::Rejected(Rejection::InvalidURL)
        );
    }

    #[test]
    fn url_accepts_allowed_scheme() {
        let metadata = VariableMetadataBuilder::new(VariableKey::new("A", "B"), DataType::String)
            .url(Some(vec!["https".into()]))
            .build();
        assert_eq!(validate_value(&metadata, "https://example.com"), ValidationOutcome::Accepted);
    }

    #[test]
    fn reboot_required_reported_after_otherwise_valid() {
        let metadata = VariableMetadataBuilder::new(VariableKey::new("A", "B"), DataType::Boolean)
            .reboot_required(true)
            .build();
        assert_eq!(
            validate_value(&metadata, "true"),
            ValidationOutcome::Rejected(Rejection::RebootRequired)
        );
    }
}
