/* Copyright (C) 2025 Olivier Goffart <ogoffart@woboq.com>

Permission is hereby granted, free of charge, to any person obtaining a copy of this software and
associated documentation files (the "Software"), to deal in the Software without restriction,
including without limitation the rights to use, copy, modify, merge, publish, distribute, sublicense,
and/or sell copies of the Software, and to permit persons to whom the Software is furnished to do so,
subject to the following conditions:

The above copyright notice and this permission notice shall be included in all copies or substantial
portions of the Software.

THE SOFTWARE IS PROVIDED "AS IS", WITHOUT WARRANTY OF ANY KIND, EXPRESS OR IMPLIED, INCLUDING BUT
NOT LIMITED TO THE WARRANTIES OF MERCHANTABILITY, FITNESS FOR A PARTICULAR PURPOSE AND
NONINFRINGEMENT. IN NO EVENT SHALL THE AUTHORS OR COPYRIGHT HOLDERS BE LIABLE FOR ANY CLAIM, DAMAGES
OR OTHER LIABILITY, WHETHER IN AN ACTION OF CONTRACT, TORT OR OTHERWISE, ARISING FROM, OUT OF OR IN
CONNECTION WITH THE SOFTWARE OR THE USE OR OTHER DEALINGS IN THE SOFTWARE.
*/

//! Keyboard accelerator (`&`) reconciliation.
//!
//! A single `&` marks the letter that follows it as the keyboard shortcut of a UI
//! string; `&&` is a literal ampersand and is never counted, moved or removed.
//! When the source gained or lost a marker, the same change is mirrored onto the
//! translation. Added markers are placed on a random letter of the translation,
//! drawn with weights that favour letters which are rare in the target language
//! so that shortcuts in one menu are less likely to collide.

use std::collections::BTreeSet;

use rand::distributions::{Distribution, WeightedIndex};
use rand::Rng;

use crate::pipeline::Reconciled;

/// The accelerator marker character.
pub const MARKER: char = '&';
const ESCAPED_MARKER: &str = "&&";

/// Per-letter placement rules for inserted markers.
#[derive(Debug)]
pub struct LetterTable {
    /// Letter frequencies in percent. Frequent letters get a higher penalty and thus
    /// fewer tickets in the draw. Letters missing from the table have penalty 1.
    pub penalties: &'static [(char, f64)],
    /// Letters that must never carry a marker.
    pub excluded: &'static [char],
}

/// Letter frequencies of the Greek language. Accented vowels and final sigma are
/// not reachable as shortcuts on a Greek keyboard layout.
pub static GREEK: LetterTable = LetterTable {
    penalties: &[
        ('α', 10.81),
        ('τ', 7.99),
        ('ο', 7.23),
        ('ε', 7.18),
        ('σ', 7.00),
        ('ι', 6.64),
        ('ν', 6.19),
        ('ρ', 4.32),
        ('π', 4.15),
        ('κ', 3.77),
        ('μ', 3.43),
        ('η', 3.18),
        ('υ', 3.04),
        ('λ', 2.66),
        ('γ', 1.70),
        ('δ', 1.63),
        ('χ', 1.29),
        ('ω', 1.23),
        ('θ', 1.22),
        ('φ', 0.74),
        ('β', 0.67),
        ('ξ', 0.44),
        ('ζ', 0.33),
        ('ψ', 0.15),
    ],
    excluded: &['ά', 'έ', 'ή', 'ί', 'ό', 'ύ', 'ώ', 'ϊ', 'ϋ', 'ΐ', 'ΰ', 'ς'],
};

impl LetterTable {
    pub fn penalty(&self, letter: char) -> f64 {
        self.penalties
            .iter()
            .find(|(l, _)| *l == letter)
            .map_or(1.0, |(_, penalty)| *penalty)
    }

    pub fn is_excluded(&self, letter: char) -> bool {
        self.excluded.contains(&letter)
    }

    /// Number of tickets `letter` gets in the draw: `floor(100 / penalty)`.
    pub fn weight(&self, letter: char) -> u32 {
        (100.0 / self.penalty(letter)) as u32
    }

    /// Distinct lowercase letters of `text` that may carry a marker, in a stable order.
    pub fn candidates(&self, text: &str) -> Vec<char> {
        text.to_lowercase()
            .chars()
            .filter(|c| c.is_alphabetic() && !self.is_excluded(*c))
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }
}

/// Number of unescaped markers in `s`.
pub fn count_markers(s: &str) -> usize {
    let all = s.matches(MARKER).count();
    let escaped = s.matches(ESCAPED_MARKER).count();
    all.saturating_sub(escaped * 2)
}

/// Remove the first `count` unescaped markers of `text`, leaving `&&` untouched.
pub fn remove_markers(text: &str, count: usize) -> String {
    let mut result = String::with_capacity(text.len());
    let mut removed = 0;
    let mut chars = text.chars().peekable();
    while let Some(ch) = chars.next() {
        if ch != MARKER {
            result.push(ch);
            continue;
        }
        if chars.peek() == Some(&MARKER) {
            chars.next();
            result.push_str(ESCAPED_MARKER);
        } else if removed < count {
            removed += 1;
        } else {
            result.push(ch);
        }
    }
    result
}

/// Insert a marker before the first occurrence of `letter` in `text`.
///
/// The lowercase occurrence is preferred, unless an uppercase one comes earlier.
/// If that occurrence already carries a marker, `text` is returned as is.
pub fn insert_marker_before(text: &str, letter: char) -> String {
    let lower: String = letter.to_lowercase().collect();
    let upper: String = letter.to_uppercase().collect();
    let at = match (text.find(&lower), text.find(&upper)) {
        (None, None) => return text.to_owned(),
        (None, Some(upper_at)) => upper_at,
        (Some(lower_at), Some(upper_at)) if upper_at < lower_at => upper_at,
        (Some(lower_at), _) => lower_at,
    };
    let preceding = text[..at].chars().rev().take_while(|c| *c == MARKER).count();
    if preceding % 2 == 1 {
        return text.to_owned();
    }
    let mut result = String::with_capacity(text.len() + MARKER.len_utf8());
    result.push_str(&text[..at]);
    result.push(MARKER);
    result.push_str(&text[at..]);
    result
}

/// Insert `count` markers at letters drawn from `table`'s weighted pool.
///
/// The pool is built once from the original text. Drawing a letter a second time
/// targets the same first occurrence again, which is already marked, so that draw
/// changes nothing.
pub fn assign_markers<R: Rng + ?Sized>(
    text: &str,
    count: usize,
    table: &LetterTable,
    rng: &mut R,
) -> String {
    let candidates = table.candidates(text);
    let Ok(pool) = WeightedIndex::new(candidates.iter().map(|c| table.weight(*c))) else {
        // no eligible letter
        return text.to_owned();
    };
    let mut result = text.to_owned();
    for _ in 0..count {
        let letter = candidates[pool.sample(rng)];
        result = insert_marker_before(&result, letter);
    }
    result
}

/// Mirror the accelerator change between `old` and `new` onto `translated`.
pub fn reconcile<R: Rng + ?Sized>(
    old: &str,
    new: &str,
    translated: &str,
    table: &LetterTable,
    rng: &mut R,
) -> Reconciled {
    let old_count = count_markers(old);
    let new_count = count_markers(new);
    if new_count > old_count {
        let text = assign_markers(translated, new_count - old_count, table, rng);
        tracing::debug!(added = new_count - old_count, "accelerator added");
        Reconciled::changed(text)
    } else if new_count < old_count {
        tracing::debug!(removed = old_count - new_count, "accelerator removed");
        Reconciled::changed(remove_markers(translated, old_count - new_count))
    } else if new_count > 0 {
        // only moved within the source
        Reconciled::changed(translated.to_owned())
    } else {
        Reconciled::unchanged(translated)
    }
}

/// Whether an unescaped marker of `text` sits in front of an excluded letter.
pub fn has_invalid_marker(text: &str, table: &LetterTable) -> bool {
    let cleaned = text.replace(ESCAPED_MARKER, "");
    let mut chars = cleaned.chars().peekable();
    while let Some(ch) = chars.next() {
        if ch != MARKER {
            continue;
        }
        if let Some(next) = chars.peek() {
            let mut lower = next.to_lowercase();
            if let (Some(l), None) = (lower.next(), lower.next()) {
                if table.is_excluded(l) {
                    return true;
                }
            }
        }
    }
    false
}

/// Move every marker of `text` to a fresh letter when one of them is invalid.
/// Returns `None` when `text` has no invalid marker.
pub fn repair_invalid<R: Rng + ?Sized>(
    text: &str,
    table: &LetterTable,
    rng: &mut R,
) -> Option<String> {
    if !has_invalid_marker(text, table) {
        return None;
    }
    let count = count_markers(text);
    let stripped = remove_markers(text, count);
    Some(assign_markers(&stripped, count, table, rng))
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn rng() -> StdRng {
        StdRng::seed_from_u64(7)
    }

    #[test]
    fn counting() {
        assert_eq!(count_markers("&Quit"), 1);
        assert_eq!(count_markers("Save && &Quit"), 1);
        assert_eq!(count_markers("&&"), 0);
        assert_eq!(count_markers("&&&x"), 1);
        assert_eq!(count_markers("plain"), 0);
    }

    #[test]
    fn removal_skips_escaped_markers() {
        assert_eq!(remove_markers("&Έξοδος", 1), "Έξοδος");
        assert_eq!(remove_markers("A && &B", 1), "A && B");
        assert_eq!(remove_markers("&A &B", 1), "A &B");
        assert_eq!(remove_markers("&&&A", 1), "&&A");
        assert_eq!(remove_markers("&A", 0), "&A");
    }

    #[test]
    fn insertion_prefers_earliest_occurrence() {
        assert_eq!(insert_marker_before("Αρχείο αρχή", 'α'), "&Αρχείο αρχή");
        assert_eq!(insert_marker_before("ρα Α", 'α'), "ρ&α Α");
        assert_eq!(insert_marker_before("xyz", 'q'), "xyz");
        // already marked
        assert_eq!(insert_marker_before("&Αρχείο", 'α'), "&Αρχείο");
        // a literal ampersand before the letter is not a marker
        assert_eq!(insert_marker_before("&&Αρχείο", 'α'), "&&&Αρχείο");
    }

    #[test]
    fn candidates_skip_accented_vowels() {
        assert_eq!(GREEK.candidates("Έξοδος"), vec!['δ', 'ξ', 'ο']);
        assert!(GREEK.candidates("ή ό 123 !").is_empty());
        assert_eq!(GREEK.weight('α'), 9);
        assert_eq!(GREEK.weight('ψ'), 666);
        assert_eq!(GREEK.weight('x'), 100);
    }

    #[test]
    fn no_eligible_letter_is_a_no_op() {
        let mut rng = rng();
        assert_eq!(assign_markers("ή 42", 1, &GREEK, &mut rng), "ή 42");
        assert_eq!(assign_markers("", 2, &GREEK, &mut rng), "");
    }

    #[test]
    fn same_seed_same_placement() {
        let a = assign_markers("Άνοιγμα αρχείου", 1, &GREEK, &mut rng());
        let b = assign_markers("Άνοιγμα αρχείου", 1, &GREEK, &mut rng());
        assert_eq!(a, b);
        assert_eq!(count_markers(&a), 1);
    }

    #[test]
    fn reconcile_cases() {
        let mut rng = rng();
        let r = reconcile("&Quit", "Quit", "&Έξοδος", &GREEK, &mut rng);
        assert!(r.changed);
        assert_eq!(r.text, "Έξοδος");

        let r = reconcile("Quit", "&Quit", "Έξοδος", &GREEK, &mut rng);
        assert!(r.changed);
        assert_eq!(count_markers(&r.text), 1);
        assert_eq!(r.text.replace('&', ""), "Έξοδος");

        let r = reconcile("&Quit", "Q&uit", "&Έξοδος", &GREEK, &mut rng);
        assert!(r.changed);
        assert_eq!(r.text, "&Έξοδος");

        let r = reconcile("Quit", "Quit now", "Έξοδος", &GREEK, &mut rng);
        assert!(!r.changed);
        assert_eq!(r.text, "Έξοδος");
    }

    #[test]
    fn invalid_marker_repair() {
        assert!(has_invalid_marker("&Έξοδος", &GREEK));
        assert!(has_invalid_marker("Άν&οιγμα &ή", &GREEK));
        assert!(!has_invalid_marker("Έ&ξοδος", &GREEK));
        assert!(!has_invalid_marker("Α&&ή", &GREEK));

        let mut rng = rng();
        assert_eq!(repair_invalid("Έ&ξοδος", &GREEK, &mut rng), None);
        let repaired = repair_invalid("&Έξοδος", &GREEK, &mut rng).unwrap();
        assert_eq!(count_markers(&repaired), 1);
        assert!(!has_invalid_marker(&repaired, &GREEK));
        assert_eq!(repaired.replace('&', ""), "Έξοδος");
    }

    proptest! {
        #[test]
        fn added_marker_keeps_count_and_literals(
            text in "[a-zα-ω ]{0,12}(&&)?[a-zα-ω ]{0,12}",
            seed in any::<u64>(),
        ) {
            let mut rng = StdRng::seed_from_u64(seed);
            let r = reconcile("Open", "&Open", &text, &GREEK, &mut rng);
            prop_assert!(r.changed);
            let expected = if GREEK.candidates(&text).is_empty() { 0 } else { 1 };
            prop_assert_eq!(count_markers(&r.text), count_markers(&text) + expected);
            prop_assert_eq!(r.text.matches(ESCAPED_MARKER).count(), text.matches(ESCAPED_MARKER).count());
        }
    }
}
