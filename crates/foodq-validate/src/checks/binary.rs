use foodq_model::{FieldValue, Violation, ViolationCode};
use foodq_standards::FieldDomain;

pub(super) fn check_binary(domain: &FieldDomain, value: &FieldValue) -> Option<Violation> {
    match value.as_text() {
        Some("0" | "1") => None,
        _ => Some(Violation::field(
            domain.name.as_str(),
            ViolationCode::NotBinary,
            format!("'{}' is not 0 or 1", value.render()),
        )),
    }
}

/// Digits fields hold ASCII digits only; anything else is not a valid code.
pub(super) fn check_digits(domain: &FieldDomain, value: &FieldValue) -> Option<Violation> {
    let text = value.render();
    if text.chars().all(|ch| ch.is_ascii_digit()) {
        return None;
    }
    Some(Violation::field(
        domain.name.as_str(),
        ViolationCode::NotNumeric,
        format!("'{text}' contains non-digit characters"),
    ))
}
