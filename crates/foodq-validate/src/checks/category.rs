//! Allowed-value checks for categorical labels and integer codes.

use foodq_model::{FieldValue, UnknownSentinel, Violation, ViolationCode};
use foodq_standards::{FieldDomain, FieldKind};

/// Categorical labels also accept the configured unknown sentinel. With the
/// empty sentinel a literal `0` is an invalid label; blanks are handled by
/// [`check_blank`].
pub(super) fn check(
    domain: &FieldDomain,
    value: &FieldValue,
    sentinel: UnknownSentinel,
) -> Option<Violation> {
    let text = value.as_text().map_or_else(|| value.render(), str::to_string);
    if domain.allows(&text) {
        return None;
    }
    if domain.kind == FieldKind::Categorical && sentinel == UnknownSentinel::Zero && text == "0" {
        return None;
    }
    Some(Violation::field(
        domain.name.as_str(),
        ViolationCode::InvalidCategory,
        format!(
            "'{text}' is not one of {{{}}}",
            domain.allowed.join(", ")
        ),
    ))
}

/// A blank categorical label when unknowns are encoded as `0`. The value is
/// reported as is and never rewritten to the sentinel.
pub(super) fn check_blank(domain: &FieldDomain, sentinel: UnknownSentinel) -> Option<Violation> {
    if domain.kind != FieldKind::Categorical {
        return None;
    }
    (sentinel == UnknownSentinel::Zero).then(|| {
        Violation::field(
            domain.name.as_str(),
            ViolationCode::InvalidCategory,
            format!("{} is blank but unknown labels are encoded as '0'", domain.name),
        )
    })
}
