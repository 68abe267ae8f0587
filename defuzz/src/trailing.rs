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

//! Trailing punctuation (`...`, `:`, `.`, ...) reconciliation.

use crate::pipeline::Reconciled;

/// Recognized trailing tokens, longest and most specific first.
pub const TRAILING_TOKENS: [&str; 7] = ["...", "…", ": ", ":", ".", ", ", ","];

/// The first token of [`TRAILING_TOKENS`] that `s` ends with.
pub fn trailing_token(s: &str) -> Option<&'static str> {
    TRAILING_TOKENS.iter().copied().find(|token| s.ends_with(token))
}

/// Mirror a change of the trailing token between `old` and `new` onto `translated`.
///
/// The change is reported whenever the two tokens differ, even if `translated`
/// already has the right ending.
pub fn reconcile(old: &str, new: &str, translated: &str) -> Reconciled {
    let old_token = trailing_token(old);
    let new_token = trailing_token(new);
    if old_token == new_token {
        return Reconciled::unchanged(translated);
    }
    tracing::debug!(?old_token, ?new_token, "trailing token changed");

    let mut text = translated;
    if let Some(token) = old_token {
        if let Some(stripped) = text.strip_suffix(token) {
            text = stripped.trim_end();
        }
    }
    let text = match new_token {
        Some(token) if !text.ends_with(token) => format!("{}{}", text.trim_end(), token),
        _ => text.to_owned(),
    };
    Reconciled::changed(text)
}
