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

//! Runs the reconcilers one after the other on a single form.

use rand::Rng;

use crate::accelerator::{self, LetterTable};
use crate::{case, trailing};

/// Result of a reconciler: the possibly rewritten translation, and whether the
/// reconciler recognized the source edit.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Reconciled {
    pub changed: bool,
    pub text: String,
}

impl Reconciled {
    pub fn changed(text: String) -> Self {
        Reconciled {
            changed: true,
            text,
        }
    }

    pub fn unchanged(text: &str) -> Self {
        Reconciled {
            changed: false,
            text: text.to_owned(),
        }
    }
}

/// Accelerator, then trailing token, then case. Every stage runs, each one on
/// the output of the previous.
pub fn propagate<R: Rng + ?Sized>(
    old: &str,
    new: &str,
    translated: &str,
    letters: &LetterTable,
    rng: &mut R,
) -> Reconciled {
    let accelerator = accelerator::reconcile(old, new, translated, letters, rng);
    let trailing = trailing::reconcile(old, new, &accelerator.text);
    let case = case::reconcile(old, new, &trailing.text);
    Reconciled {
        changed: accelerator.changed || trailing.changed || case.changed,
        text: case.text,
    }
}
