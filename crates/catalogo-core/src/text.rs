//! String helpers shared by the build pipeline and the catalog view.
//!
//! Accents are stripped by canonical decomposition: combining marks in
//! U+0300..=U+036F are dropped and the base letters kept.

use std::cmp::Ordering;

use unicode_normalization::UnicodeNormalization;

/// Decompose to NFD and drop combining diacritical marks.
#[must_use]
pub fn fold_accents(input: &str) -> String {
    input.nfd().filter(|c| !is_combining_mark(*c)).collect()
}

fn is_combining_mark(c: char) -> bool {
    ('\u{0300}'..='\u{036f}').contains(&c)
}

/// Generate a URL-safe slug: accents folded, lowercase, runs of anything
/// other than `[a-z0-9]` collapsed into a single `-`, no leading or
/// trailing dash.
#[must_use]
pub fn slugify(input: &str) -> String {
    let folded = fold_accents(input).to_lowercase();
    folded
        .split(|c: char| !(c.is_ascii_lowercase() || c.is_ascii_digit()))
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join("-")
}

/// Sort key approximating an Italian base-sensitivity collation: accents
/// and case do not distinguish two strings.
#[must_use]
pub fn collation_key(input: &str) -> String {
    fold_accents(input).to_lowercase()
}

/// Compare two strings by [`collation_key`], breaking ties on the plain
/// lowercase form so the order stays total.
#[must_use]
pub fn compare_collated(a: &str, b: &str) -> Ordering {
    collation_key(a)
        .cmp(&collation_key(b))
        .then_with(|| a.to_lowercase().cmp(&b.to_lowercase()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slugify_simple_name() {
        assert_eq!(slugify("Scatola Regalo"), "scatola-regalo");
    }

    #[test]
    fn slugify_folds_accents() {
        assert_eq!(slugify("Città Perù"), "citta-peru");
    }

    #[test]
    fn slugify_folds_letters_outside_latin1() {
        assert_eq!(slugify("BRĒZ"), "brez");
        assert_eq!(slugify("Kōbe Žula Şal"), "kobe-zula-sal");
    }

    #[test]
    fn slugify_drops_combining_mark_inside_word() {
        assert_eq!(slugify("Citta\u{0300} Pe\u{0301}rù"), "citta-peru");
        assert_eq!(slugify("Citta\u{0300}"), slugify("Città"));
    }

    #[test]
    fn slugify_collapses_punctuation_runs() {
        assert_eq!(slugify("  --Vassoio  (grande) + coperchio!  "), "vassoio-grande-coperchio");
    }

    #[test]
    fn slugify_empty_when_no_alphanumerics() {
        assert_eq!(slugify(" ·· "), "");
    }

    #[test]
    fn compare_collated_ignores_accents_and_case() {
        assert_eq!(collation_key("Élan"), collation_key("elan"));
        // equal keys fall back to the lowercase form
        assert_eq!(compare_collated("Elan", "élan"), Ordering::Less);
        assert_eq!(compare_collated("àbaco", "Bauletto"), Ordering::Less);
    }
}
