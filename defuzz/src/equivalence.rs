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

//! Decides whether two revisions of a source string count as the same message.

use crate::normalize::{normalize, PunctuationSet};

/// Default number of differing characters tolerated by [`EquivalencePolicy::BoundedDistance`].
pub const DEFAULT_MAX_CHAR_DIFF: usize = 2;

/// How two source strings are compared.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EquivalencePolicy {
    /// Equal once both sides went through [`normalize`].
    NormalizedEquality(PunctuationSet),
    /// The approximate count of differing characters is at most `max_char_diff`.
    BoundedDistance { max_char_diff: usize },
}

impl Default for EquivalencePolicy {
    fn default() -> Self {
        EquivalencePolicy::NormalizedEquality(PunctuationSet::Narrow)
    }
}

impl EquivalencePolicy {
    /// Returns false when either side is missing.
    pub fn is_equivalent(&self, a: Option<&str>, b: Option<&str>) -> bool {
        let (Some(a), Some(b)) = (a, b) else {
            return false;
        };
        match *self {
            EquivalencePolicy::NormalizedEquality(punctuation) => {
                normalize(a, punctuation) == normalize(b, punctuation)
            }
            EquivalencePolicy::BoundedDistance { max_char_diff } => {
                approximate_char_diff(a, b) <= max_char_diff
            }
        }
    }
}

/// `(1 - ratio) * max(len(a), len(b))` rounded down, where `ratio` is the
/// normalized Levenshtein similarity of the two strings.
pub fn approximate_char_diff(a: &str, b: &str) -> usize {
    let ratio = strsim::normalized_levenshtein(a, b);
    let longest = a.chars().count().max(b.chars().count());
    // 1 - 0.8 is not exactly 0.2
    ((1.0 - ratio) * longest as f64 + 1e-9).floor() as usize
}
