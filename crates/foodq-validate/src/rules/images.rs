use foodq_model::{NormalizedRecord, Scope, Violation, ViolationCode};

use super::RuleContext;

fn flag_requires_path(
    record: &NormalizedRecord,
    flag: &str,
    path: &str,
    code: ViolationCode,
) -> Option<Violation> {
    if record.text(flag) != Some("1") || record.text(path).is_some_and(|p| !p.trim().is_empty()) {
        return None;
    }
    Some(Violation::new(
        Scope::fields([flag, path]),
        code,
        format!("{flag} is 1 but {path} is empty"),
    ))
}

pub(super) fn image_path(record: &NormalizedRecord, _ctx: &RuleContext<'_>) -> Option<Violation> {
    flag_requires_path(record, "has_image", "image_path", ViolationCode::ImagePathMissing)
}

pub(super) fn image_160_path(
    record: &NormalizedRecord,
    _ctx: &RuleContext<'_>,
) -> Option<Violation> {
    flag_requires_path(
        record,
        "has_image_160",
        "image_160_path",
        ViolationCode::Image160PathMissing,
    )
}
