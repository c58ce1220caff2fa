//! Field-selection parsing.
//!
//! Clients request a subset of an entity's properties via a comma-separated
//! `fields` query parameter. Resolution is deliberately permissive: unmatched
//! names are dropped rather than rejected, so a typo degrades to a smaller
//! selection instead of a failed request. Dropped tokens are recorded at
//! debug level so operators can still spot them.

/// Budget for the raw selection string; longer input is truncated before
/// parsing rather than rejected.
pub const MAX_FIELDS_LEN: usize = 2048;

/// An ordered, de-duplicated set of resolved property names.
///
/// Names are stored under their declared spelling, in first-seen request
/// order. An empty or absent selection resolves to the full declared list in
/// declared order, so downstream shaping never special-cases "no selection".
#[derive(Clone, Debug, PartialEq, Eq)]
#[must_use]
pub struct FieldSet {
    names: Vec<String>,
}

impl FieldSet {
    /// Resolve a raw selection string against an entity's declared properties.
    ///
    /// Tokens are split on commas, trimmed, matched case-insensitively, and
    /// de-duplicated preserving first-seen order. Unmatched tokens are
    /// silently dropped (logged at debug level). `None` or blank input yields
    /// the full declared set.
    pub fn resolve(raw: Option<&str>, declared: &[&'static str]) -> Self {
        let Some(raw) = raw.map(str::trim).filter(|s| !s.is_empty()) else {
            return Self::full(declared);
        };

        let raw = clamp(raw, MAX_FIELDS_LEN);

        let mut names: Vec<String> = Vec::new();
        let mut dropped: Vec<&str> = Vec::new();
        for token in raw.split(',') {
            let token = token.trim();
            if token.is_empty() {
                continue;
            }
            match declared.iter().find(|d| d.eq_ignore_ascii_case(token)) {
                Some(canonical) if !names.iter().any(|n| n == canonical) => {
                    names.push((*canonical).to_owned());
                }
                Some(_) => {} // duplicate, first occurrence wins
                None => dropped.push(token),
            }
        }

        if !dropped.is_empty() {
            tracing::debug!(dropped = ?dropped, "field selection contained unknown names");
        }

        Self { names }
    }

    /// The full declared property set, in declared order.
    pub fn full(declared: &[&'static str]) -> Self {
        Self {
            names: declared.iter().map(|d| (*d).to_owned()).collect(),
        }
    }

    /// Resolved names in selection order.
    #[must_use]
    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.names.iter().map(String::as_str)
    }

    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.names.iter().any(|n| n.eq_ignore_ascii_case(name))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.names.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

/// Truncate to at most `max` bytes without splitting a UTF-8 sequence.
fn clamp(s: &str, max: usize) -> &str {
    if s.len() <= max {
        return s;
    }
    let mut end = max;
    while !s.is_char_boundary(end) {
        end -= 1;
    }
    &s[..end]
}
