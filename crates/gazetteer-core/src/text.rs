// crates/gazetteer-core/src/text.rs

//! # Synonym Normalizer
//!
//! Turns place names into match keys:
//!
//! 1. transliterate Unicode to ASCII and lower-case ([`fold_key`]),
//! 2. split on anything that is not a letter or digit (spaces, hyphens,
//!    apostrophes, punctuation all collapse),
//! 3. replace interchangeable name particles by their canonical form
//!    (`st`, `ste`, `sainte` -> `saint`).
//!
//! So `"St-André"`, `"st andre"` and `"Saint-André"` all produce the match
//! key `"saint andre"`. Display names are never rewritten; only keys are.

use once_cell::sync::Lazy;
use std::collections::HashMap;

/// Built-in particle classes. The first entry of each class is canonical.
const BUILTIN_SYNONYMS: &[&[&str]] = &[
    &["saint", "st", "sainte", "ste"],
    &["mount", "mt"],
    &["fort", "ft"],
];

static BUILTIN: Lazy<Normalizer> = Lazy::new(|| Normalizer::with_classes(BUILTIN_SYNONYMS));

/// Transliterate Unicode to ASCII (`Łódź` -> `Lodz`) and lower-case.
///
/// ```rust
/// use gazetteer_core::text::fold_key;
///
/// assert_eq!(fold_key("Łódź"), "lodz");
/// assert_eq!(fold_key("Straße"), "strasse");
/// ```
pub fn fold_key(s: &str) -> String {
    deunicode::deunicode(s).to_lowercase()
}

/// Equality after [`fold_key`] on both sides.
pub fn equals_folded(a: &str, b: &str) -> bool {
    fold_key(a) == fold_key(b)
}

/// Match tokens of `s` with the built-in particle table.
pub fn tokens(s: &str) -> Vec<String> {
    BUILTIN.tokens(s)
}

/// Space-joined [`tokens`]: the key two names must share to be equivalent.
///
/// ```rust
/// use gazetteer_core::text::match_key;
///
/// assert_eq!(match_key("St-André"), "saint andre");
/// assert_eq!(match_key("Saint  André"), "saint andre");
/// assert_eq!(match_key("SAINTE-Marie"), "saint marie");
/// ```
pub fn match_key(s: &str) -> String {
    BUILTIN.match_key(s)
}

/// A normalizer with a particle table. Immutable once built, so one instance
/// is shared freely between the index writer and concurrent readers.
#[derive(Debug, Clone)]
pub struct Normalizer {
    particles: HashMap<String, String>,
}

impl Default for Normalizer {
    fn default() -> Self {
        BUILTIN.clone()
    }
}

impl Normalizer {
    fn with_classes(classes: &[&[&str]]) -> Self {
        let mut n = Normalizer {
            particles: HashMap::new(),
        };
        for class in classes {
            n.add_class(class.iter().copied());
        }
        n
    }

    /// Built-in table extended with `extra` classes (first word canonical).
    /// Extra classes win when a word appears in both.
    pub fn with_extra<I, C, S>(extra: I) -> Self
    where
        I: IntoIterator<Item = C>,
        C: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut n = Self::default();
        for class in extra {
            let words: Vec<String> = class.into_iter().map(|w| fold_key(w.as_ref())).collect();
            n.add_class(words.iter().map(String::as_str));
        }
        n
    }

    fn add_class<'a>(&mut self, mut words: impl Iterator<Item = &'a str>) {
        let Some(canonical) = words.next() else {
            return;
        };
        let canonical = canonical.to_string();
        for w in words {
            self.particles.insert(w.to_string(), canonical.clone());
        }
    }

    /// Folded, split and particle-expanded tokens of `s`.
    pub fn tokens(&self, s: &str) -> Vec<String> {
        fold_key(s)
            .split(|c: char| !c.is_ascii_alphanumeric())
            .filter(|t| !t.is_empty())
            .map(|t| match self.particles.get(t) {
                Some(canonical) => canonical.clone(),
                None => t.to_string(),
            })
            .collect()
    }

    pub fn match_key(&self, s: &str) -> String {
        self.tokens(s).join(" ")
    }
}
