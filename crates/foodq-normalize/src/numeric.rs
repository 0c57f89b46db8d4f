//! Numeric normalization utilities.

use crate::error::NormalizeError;

const EMPTY_LITERALS: &[&str] = &["nan", "null", "none"];

fn strip_suffix_ignore_case<'a>(value: &'a str, suffix: &str) -> Option<&'a str> {
    if suffix.is_empty() || value.len() < suffix.len() {
        return None;
    }
    let split = value.len() - suffix.len();
    if !value.is_char_boundary(split) {
        return None;
    }
    let (head, tail) = value.split_at(split);
    tail.eq_ignore_ascii_case(suffix).then_some(head)
}

/// Parse a raw numeric value.
///
/// Surrounding whitespace, a trailing `%` and the declared `unit` are
/// stripped first. With `strict` disabled a decimal comma is accepted, unless
/// exactly three digits follow it, and `nan`/`null`/`none` read as empty.
/// Returns `Ok(None)` for empty input.
pub fn parse_numeric(
    raw: &str,
    unit: Option<&str>,
    strict: bool,
) -> Result<Option<f64>, NormalizeError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }
    if !strict
        && EMPTY_LITERALS
            .iter()
            .any(|literal| trimmed.eq_ignore_ascii_case(literal))
    {
        return Ok(None);
    }

    let mut body = trimmed;
    if let Some(head) = body.strip_suffix('%') {
        body = head.trim_end();
    }
    if let Some(unit) = unit
        && let Some(head) = strip_suffix_ignore_case(body, unit)
    {
        body = head.trim_end();
    }

    let not_numeric = || NormalizeError::NotNumeric {
        value: trimmed.to_string(),
    };
    if body.is_empty() {
        return Err(not_numeric());
    }

    let parsed = if !strict && !body.contains('.') && body.matches(',').count() == 1 {
        // `1,000` reads as a thousands separator just as well as a decimal.
        if let Some((_, fraction)) = body.split_once(',')
            && fraction.len() == 3
            && fraction.bytes().all(|byte| byte.is_ascii_digit())
        {
            return Err(not_numeric());
        }
        body.replacen(',', ".", 1).parse::<f64>()
    } else {
        body.parse::<f64>()
    };
    match parsed {
        Ok(value) if value.is_finite() => Ok(Some(value)),
        Ok(_) => Err(NormalizeError::NonFinite {
            value: trimmed.to_string(),
        }),
        Err(_) => Err(not_numeric()),
    }
}

/// Natural log of a present, finite, positive source value.
pub fn derive_log(source: Option<f64>) -> Option<f64> {
    source
        .filter(|value| value.is_finite() && *value > 0.0)
        .map(f64::ln)
}
