//! Token conversion between stored strings and numbers.
//!
//! Tokens are trimmed before parsing. `autosize` and `autocalculate` are
//! never numbers, whatever their case.

#[must_use]
pub(crate) fn is_auto_keyword(token: &str) -> bool {
    let token = token.trim();

    token.eq_ignore_ascii_case("autosize") || token.eq_ignore_ascii_case("autocalculate")
}

/// Parse a finite real.
#[must_use]
pub(crate) fn parse_double(token: &str) -> Option<f64> {
    let token = token.trim();
    if token.is_empty() || is_auto_keyword(token) {
        return None;
    }

    token.parse::<f64>().ok().filter(|value| value.is_finite())
}

/// Parse a signed integer; real-valued tokens truncate toward zero.
#[must_use]
#[allow(clippy::cast_possible_truncation, clippy::cast_precision_loss)]
pub(crate) fn parse_int(token: &str) -> Option<i64> {
    let token = token.trim();
    if let Ok(value) = token.parse::<i64>() {
        return Some(value);
    }

    let value = parse_double(token)?.trunc();
    if value < i64::MIN as f64 || value >= i64::MAX as f64 {
        return None;
    }

    Some(value as i64)
}

/// Parse a non-negative integer; real-valued tokens truncate toward zero.
#[must_use]
#[allow(
    clippy::cast_possible_truncation,
    clippy::cast_precision_loss,
    clippy::cast_sign_loss
)]
pub(crate) fn parse_unsigned(token: &str) -> Option<u64> {
    let token = token.trim();
    if let Ok(value) = token.parse::<u64>() {
        return Some(value);
    }

    let value = parse_double(token)?;
    if value < 0.0 {
        return None;
    }

    let value = value.trunc();
    if value >= u64::MAX as f64 {
        return None;
    }

    Some(value as u64)
}

/// Canonical text for a real; `None` for NaN and infinities.
#[must_use]
pub(crate) fn format_double(value: f64) -> Option<String> {
    value.is_finite().then(|| format!("{value}"))
}

/// Equality of two reals within a relative tolerance.
#[must_use]
pub(crate) fn reals_equal(a: f64, b: f64) -> bool {
    let scale = a.abs().max(b.abs()).max(1.0);

    (a - b).abs() <= f64::EPSILON * 8.0 * scale
}

///
/// TESTS
///
