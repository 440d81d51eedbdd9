// identity/plate.rs
use serde::Serialize;
use std::fmt;

/// Nicknames carry a fleet tag before this character and the plate after it,
/// e.g. "BT0002 | RDT-0A85".
pub const PLATE_SEPARATOR: char = '|';

/// Upper-case ASCII alphanumerics only. Two records are the same vehicle iff
/// their keys are equal; an empty key never matches anything.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct CanonicalKey(String);

impl CanonicalKey {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for CanonicalKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Canonical plate from a plate field or a free-text nickname.
///
/// Keeps the segment after the last `|`, upper-cases it and drops everything
/// that isn't an ASCII letter or digit. Never fails: missing or garbage input
/// yields the empty key.
///
/// `"BT0002 | RDT-0A85"` and `"rdt-0a85"` both become `"RDT0A85"`.
pub fn normalize_plate<'a>(raw: impl Into<Option<&'a str>>) -> CanonicalKey {
    let Some(raw) = raw.into() else {
        return CanonicalKey::default();
    };

    let trimmed = raw.trim();
    let tail = match trimmed.rfind(PLATE_SEPARATOR) {
        Some(idx) => &trimmed[idx + PLATE_SEPARATOR.len_utf8()..],
        None => trimmed,
    };

    canonicalize(tail)
}

/// Like `normalize_plate` without the nickname rule. Used for chassis numbers.
pub fn normalize_identifier<'a>(raw: impl Into<Option<&'a str>>) -> CanonicalKey {
    raw.into().map(canonicalize).unwrap_or_default()
}

fn canonicalize(raw: &str) -> CanonicalKey {
    CanonicalKey(
        raw.chars()
            .filter(char::is_ascii_alphanumeric)
            .map(|c| c.to_ascii_uppercase())
            .collect(),
    )
}
