use foodq_model::{Violation, ViolationCode};
use foodq_standards::FieldDomain;

/// A missing value on a non-nullable field.
pub(super) fn check(domain: &FieldDomain) -> Option<Violation> {
    domain.is_required().then(|| {
        Violation::field(
            domain.name.as_str(),
            ViolationCode::RequiredMissing,
            format!("{} is required", domain.name),
        )
    })
}
