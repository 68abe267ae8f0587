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

//! Letter case reconciliation.

use crate::pipeline::Reconciled;

/// First character uppercased, everything after it lowercased.
pub fn sentence_case(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first
            .to_uppercase()
            .chain(chars.as_str().to_lowercase().chars())
            .collect(),
        None => String::new(),
    }
}

/// Mirror a case-only edit of the source onto `translated`.
///
/// * `old` sentence-cased gives `new`: sentence-case the translation.
/// * `new` starts with a lowercase letter: lowercase the whole translation.
/// * `new` sentence-cased gives `old` (title case to sentence case): keep the
///   translation, which already follows the target language's casing.
pub fn reconcile(old: &str, new: &str, translated: &str) -> Reconciled {
    if sentence_case(old) == new {
        Reconciled::changed(sentence_case(translated))
    } else if new.chars().next().is_some_and(char::is_lowercase) {
        Reconciled::changed(translated.to_lowercase())
    } else if old == sentence_case(new) {
        Reconciled::changed(translated.to_owned())
    } else {
        Reconciled::unchanged(translated)
    }
}
