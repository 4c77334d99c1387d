//! comparison of attribute values against literal text
//!
//! coercion rules:
//! - boolean values compare as 0/1
//! - absent and null values compare as the empty string
//! - numbers compare against the literal parsed as a number
//! - strings compare with the root-locale Unicode collation

use std::cmp::Ordering;

use icu_collator::{Collator, CollatorOptions};

use super::types::Value;

thread_local! {
    static COLLATOR: Option<Collator> =
        Collator::try_new(&Default::default(), CollatorOptions::new()).ok();
}

/// the value kind cannot be ordered against a literal
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Incomparable {
    pub kind: &'static str,
}

/// compare an attribute value with a literal
///
/// `Ok(None)` means the literal is not a number while the value is numeric;
/// no ordering holds and the values are not equal.
pub fn compare(actual: &Value, literal: &str) -> Result<Option<Ordering>, Incomparable> {
    match actual {
        Value::Bool(b) => {
            let lhs = if *b { 1.0 } else { 0.0 };
            Ok(parse_number(literal).and_then(|r| lhs.partial_cmp(&r)))
        }
        Value::Number(n) => Ok(parse_number(literal).and_then(|r| n.partial_cmp(&r))),
        Value::Absent | Value::Null => Ok(Some(collate("", literal))),
        Value::String(s) => Ok(Some(collate(s, literal))),
        Value::List(_) | Value::Object => Err(Incomparable { kind: actual.kind() }),
    }
}

/// parse numeric literal text
///
/// accepts decimal and exponent notation, `0x`/`0o`/`0b` integers and
/// `Infinity`; blank text is zero. returns `None` for anything else.
pub fn parse_number(literal: &str) -> Option<f64> {
    let s = literal.trim();
    if s.is_empty() {
        return Some(0.0);
    }

    for (prefix, radix) in [("0x", 16), ("0X", 16), ("0o", 8), ("0O", 8), ("0b", 2), ("0B", 2)] {
        if let Some(digits) = s.strip_prefix(prefix) {
            if digits.is_empty() || !digits.chars().all(|c| c.is_digit(radix)) {
                return None;
            }
            return digits.chars().try_fold(0.0_f64, |acc, c| {
                Some(acc * f64::from(radix) + f64::from(c.to_digit(radix)?))
            });
        }
    }

    match s {
        "Infinity" | "+Infinity" => return Some(f64::INFINITY),
        "-Infinity" => return Some(f64::NEG_INFINITY),
        _ => {}
    }

    // f64::from_str also takes "inf" and "NaN", which are not numbers here
    if !s
        .chars()
        .all(|c| c.is_ascii_digit() || matches!(c, '.' | 'e' | 'E' | '+' | '-'))
    {
        return None;
    }

    s.parse::<f64>().ok()
}

/// truthiness of literal text: empty, "false" and numeric zero are falsy
pub fn literal_is_truthy(literal: &str) -> bool {
    if literal.is_empty() || literal.eq_ignore_ascii_case("false") {
        return false;
    }
    parse_number(literal).map(|n| n != 0.0).unwrap_or(true)
}

/// locale-aware string ordering
///
/// accents and case only break ties between otherwise equal letters,
/// lowercase sorting first.
pub fn collate(a: &str, b: &str) -> Ordering {
    COLLATOR.with(|collator| match collator {
        Some(collator) => collator.compare(a, b),
        None => a.cmp(b),
    })
}
