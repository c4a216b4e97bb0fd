//! Trigram similarity, compatible with PostgreSQL's `pg_trgm`.
//!
//! A string is lowercased and split into words of alphanumeric characters.
//! Each word is padded with two spaces in front and one behind, and every
//! three-character window of the padded word is a trigram. The similarity
//! of two strings is the number of trigrams they share divided by the
//! number of distinct trigrams in either, a score in `[0, 1]`.

use std::collections::HashSet;

/// Similarity score above which the trigram search tier keeps a row.
pub const DEFAULT_THRESHOLD: f64 = 0.3;

type Trigram = [char; 3];

/// Extract the distinct trigrams of `text`.
pub fn trigrams(text: &str) -> HashSet<Trigram> {
    let lowered = text.to_lowercase();
    let mut set = HashSet::new();

    for word in lowered
        .split(|c: char| !c.is_alphanumeric())
        .filter(|w| !w.is_empty())
    {
        let padded: Vec<char> = [' ', ' ']
            .into_iter()
            .chain(word.chars())
            .chain([' '])
            .collect();
        for window in padded.windows(3) {
            set.insert([window[0], window[1], window[2]]);
        }
    }

    set
}

/// Trigram similarity of two strings.
pub fn similarity(a: &str, b: &str) -> f64 {
    let left = trigrams(a);
    let right = trigrams(b);
    if left.is_empty() || right.is_empty() {
        return 0.0;
    }

    let shared = left.intersection(&right).count();
    let total = left.len() + right.len() - shared;

    #[allow(clippy::cast_precision_loss)]
    let score = shared as f64 / total as f64;
    score
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trigrams_of_short_word() {
        let set = trigrams("cat");
        // "  cat " -> "  c", " ca", "cat", "at "
        assert_eq!(set.len(), 4);
        assert!(set.contains(&[' ', ' ', 'c']));
        assert!(set.contains(&['a', 't', ' ']));
    }

    #[test]
    fn test_trigrams_ignore_punctuation_and_case() {
        assert_eq!(trigrams("Ab-CD"), trigrams("ab cd"));
    }

    #[test]
    fn test_identical_strings_score_one() {
        assert!((similarity("Urząd Gminy", "urząd gminy") - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_disjoint_strings_score_zero() {
        assert!(similarity("abc", "xyz").abs() < f64::EPSILON);
        assert!(similarity("", "xyz").abs() < f64::EPSILON);
        assert!(similarity("--", "").abs() < f64::EPSILON);
    }

    #[test]
    fn test_matches_pg_trgm_reference() {
        // pg_trgm: similarity('word', 'two words') = 0.363636
        let score = similarity("word", "two words");
        assert!((score - 4.0 / 11.0).abs() < 1e-9, "got {score}");
    }

    #[test]
    fn test_closer_strings_score_higher() {
        let near = similarity("Testowo", "Urząd Miasta Testowo");
        let far = similarity("Testowo", "Sąd Rejonowy w Poznaniu");
        assert!(near > far);
        assert!(near > 0.0 && near <= 1.0);
    }
}
