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

//! Canonical form of a source string, used to compare two revisions of a msgid.

/// Which characters the normalizer drops before comparing.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum PunctuationSet {
    /// `.`, `&`, `:`, `,` and `…`: the marks the auto-repair pass knows how to mirror.
    #[default]
    Narrow,
    /// All ASCII punctuation plus `…`.
    Broad,
}

impl PunctuationSet {
    pub fn contains(self, ch: char) -> bool {
        match self {
            PunctuationSet::Narrow => matches!(ch, '.' | '&' | ':' | ',' | '…'),
            PunctuationSet::Broad => ch.is_ascii_punctuation() || ch == '…',
        }
    }
}

/// Lowercase `s`, drop the characters of `punctuation`, and collapse every run of
/// whitespace into a single space. Leading and trailing spaces are trimmed.
///
/// ```
/// use defuzz::normalize::{normalize, PunctuationSet};
/// assert_eq!(normalize("  Save   &File...", PunctuationSet::Narrow), "save file");
/// ```
pub fn normalize(s: &str, punctuation: PunctuationSet) -> String {
    let mut normalized = String::with_capacity(s.len());
    let mut after_space = false;
    for ch in s.chars() {
        if punctuation.contains(ch) {
            continue;
        }
        if ch.is_whitespace() {
            if !after_space {
                normalized.push(' ');
            }
            after_space = true;
        } else {
            normalized.extend(ch.to_lowercase());
            after_space = false;
        }
    }
    normalized.trim_matches(' ').to_owned()
}
