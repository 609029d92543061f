//! Weight → style classification.
//!
//! Maps a numeric CSS-like font weight and a script flag to the target
//! [`FontDescriptor`]. Korean text goes to Apple SD Gothic Neo, everything
//! else to SF Pro. Each family has nine buckets; a bucket's upper bound is
//! inclusive, so a weight equal to a bound belongs to that bucket.

use crate::descriptor::FontDescriptor;

pub const KOREAN_FAMILY: &str = "Apple SD Gothic Neo";
pub const LATIN_FAMILY: &str = "SF Pro";

/// Style returned when no rule matches (only reachable for NaN weights).
pub const DEFAULT_STYLE: &str = "Regular";

/// One bucket of a classification rule set.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClassificationRule {
    pub upper_bound_inclusive: f64,
    pub style: &'static str,
}

const fn rule(upper_bound_inclusive: f64, style: &'static str) -> ClassificationRule {
    ClassificationRule {
        upper_bound_inclusive,
        style,
    }
}

/// Apple SD Gothic Neo buckets, ascending by upper bound.
pub const KOREAN_RULES: &[ClassificationRule] = &[
    rule(149.0, "Thin"),
    rule(249.0, "UltraLight"),
    rule(349.0, "Light"),
    rule(449.0, "Regular"),
    rule(549.0, "Medium"),
    rule(649.0, "SemiBold"),
    rule(749.0, "Bold"),
    rule(849.0, "ExtraBold"),
    rule(f64::INFINITY, "Heavy"),
];

/// SF Pro buckets, ascending by upper bound.
pub const LATIN_RULES: &[ClassificationRule] = &[
    rule(149.0, "Ultralight"),
    rule(249.0, "Thin"),
    rule(349.0, "Light"),
    rule(449.0, "Regular"),
    rule(549.0, "Medium"),
    rule(649.0, "Semibold"),
    rule(749.0, "Bold"),
    rule(849.0, "Heavy"),
    rule(f64::INFINITY, "Black"),
];

/// Pick the target font for a character of the given weight and script.
///
/// Total: negative, huge and fractional weights all land in a bucket. A NaN
/// weight compares false against every bound and falls back to
/// `(family, "Regular")`.
pub fn classify(weight: f64, is_korean: bool) -> FontDescriptor {
    let (family, rules) = if is_korean {
        (KOREAN_FAMILY, KOREAN_RULES)
    } else {
        (LATIN_FAMILY, LATIN_RULES)
    };

    let style = rules
        .iter()
        .find(|r| r.upper_bound_inclusive >= weight)
        .map(|r| r.style)
        .unwrap_or(DEFAULT_STYLE);

    FontDescriptor::new(family, style)
}
