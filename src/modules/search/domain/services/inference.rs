//! Priority-ordered heuristic rules for fields that only exist as free text.
//!
//! Floor position and parking availability are rarely structured columns;
//! they get mined out of titles and descriptor strings. Each rule is an
//! independently testable function returning `Matched` or `Unmatched`, and
//! callers chain them in an explicit priority order instead of burying the
//! order inside nested conditionals.

use regex::Regex;
use std::sync::OnceLock;

use crate::modules::search::domain::entities::property::FloorLevel;
use crate::modules::search::domain::entities::raw_record::RawFloorField;

/// Outcome of one inference rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Inference<T> {
    Matched(T),
    Unmatched,
}

impl<T> Inference<T> {
    /// Chain to the next rule in priority order.
    pub fn or_else(self, next: impl FnOnce() -> Inference<T>) -> Inference<T> {
        match self {
            Inference::Matched(v) => Inference::Matched(v),
            Inference::Unmatched => next(),
        }
    }

    pub fn into_option(self) -> Option<T> {
        match self {
            Inference::Matched(v) => Some(v),
            Inference::Unmatched => None,
        }
    }
}

fn ordinal_floor_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(
            r"(?i)\b(?:(1st|first)|(2nd|second)|(3rd|third)|(4th|fourth)|(5th|fifth))\s+floor\b",
        )
        .expect("ordinal floor regex")
    })
}

fn token_floor_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    // "f1"/"f2"/"f3" tokens as whole words
    RE.get_or_init(|| Regex::new(r"(?i)\bf([123])\b").expect("floor token regex"))
}

/// Rule 1: the structured floor column, when present.
pub fn floor_from_structured_field(field: &Option<RawFloorField>) -> Inference<FloorLevel> {
    match field {
        Some(RawFloorField::Number(n)) if *n < 0 => Inference::Matched(FloorLevel::Basement),
        Some(RawFloorField::Number(0)) => Inference::Matched(FloorLevel::Ground),
        Some(RawFloorField::Number(n)) => Inference::Matched(FloorLevel::Number(*n)),
        Some(RawFloorField::Text(s)) => floor_from_descriptor(s),
        None => Inference::Unmatched,
    }
}

/// Rule 2: descriptor strings like "basement", "lower ground", "ground", or
/// bare digit tokens.
pub fn floor_from_descriptor(descriptor: &str) -> Inference<FloorLevel> {
    let d = descriptor.trim().to_lowercase();
    if d.is_empty() {
        return Inference::Unmatched;
    }
    if d.contains("basement") {
        return Inference::Matched(FloorLevel::Basement);
    }
    // Lower-ground is below street level; it goes with the basement bucket.
    if d.contains("lower ground") || d == "lg" || d == "lgf" {
        return Inference::Matched(FloorLevel::Basement);
    }
    if d.contains("ground") {
        return Inference::Matched(FloorLevel::Ground);
    }
    match d.as_str() {
        "1" => Inference::Matched(FloorLevel::Number(1)),
        "2" => Inference::Matched(FloorLevel::Number(2)),
        "3" => Inference::Matched(FloorLevel::Number(3)),
        _ => Inference::Unmatched,
    }
}

/// Rule 3: regex mining over the listing title.
pub fn floor_from_title(title: &str) -> Inference<FloorLevel> {
    let lower = title.to_lowercase();
    if lower.contains("basement") {
        return Inference::Matched(FloorLevel::Basement);
    }
    if lower.contains("ground floor") || has_word(&lower, "gf") {
        return Inference::Matched(FloorLevel::Ground);
    }
    if let Some(caps) = ordinal_floor_regex().captures(&lower) {
        for (idx, floor) in [(1, 1i64), (2, 2), (3, 3), (4, 4), (5, 5)] {
            if caps.get(idx).is_some() {
                return Inference::Matched(FloorLevel::Number(floor));
            }
        }
    }
    if let Some(caps) = token_floor_regex().captures(&lower) {
        if let Ok(n) = caps[1].parse::<i64>() {
            return Inference::Matched(FloorLevel::Number(n));
        }
    }
    Inference::Unmatched
}

/// Rule 4: commercial-looking categories default to ground when nothing else
/// said otherwise. Street-level is the overwhelmingly common case for shops.
pub fn floor_from_category_fallback(is_commercial_category: bool) -> Inference<FloorLevel> {
    if is_commercial_category {
        Inference::Matched(FloorLevel::Ground)
    } else {
        Inference::Unmatched
    }
}

const PARKING_NEGATIONS: &[&str] = &[
    "no parking",
    "without parking",
    "parking not available",
    "no car parking",
];

const PARKING_POSITIVES: &[&str] = &[
    "with parking",
    "parking available",
    "car parking",
    "bike parking",
    "covered parking",
    "reserved parking",
];

/// Parking availability mined from the title alone. Negation phrases are
/// checked before positives so "no parking" never reads as an offer; a bare
/// mention of "parking" counts as available; silence stays unknown.
pub fn parking_from_title(title: &str) -> Inference<bool> {
    let lower = title.to_lowercase();
    if PARKING_NEGATIONS.iter().any(|p| lower.contains(p)) {
        return Inference::Matched(false);
    }
    if PARKING_POSITIVES.iter().any(|p| lower.contains(p)) {
        return Inference::Matched(true);
    }
    if lower.contains("parking") {
        return Inference::Matched(true);
    }
    Inference::Unmatched
}

fn has_word(haystack: &str, word: &str) -> bool {
    haystack.split(|c: char| !c.is_ascii_alphanumeric()).any(|w| w == word)
}
