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

//! Decides whether a fuzzy entry can be cleared without a human looking at it.

use rand::Rng;

use crate::accelerator::{self, LetterTable, GREEK};
use crate::entry::{CatalogEntry, Forms};
use crate::equivalence::EquivalencePolicy;
use crate::pipeline::{self, Reconciled};

/// What happened to one form of an entry.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ChangeStatus {
    /// The translation was rewritten.
    AutoApplied,
    /// The source edit was understood and the translation is already right.
    SavedAsIs,
    /// Nothing recognized the edit.
    Unchanged,
}

impl ChangeStatus {
    pub fn classify(previous: &str, proposed: &str, change_asserted: bool) -> Self {
        if previous != proposed {
            ChangeStatus::AutoApplied
        } else if change_asserted {
            ChangeStatus::SavedAsIs
        } else {
            ChangeStatus::Unchanged
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Acceptance {
    /// Texts to store in the entry.
    pub forms: Forms,
    pub status: ChangeStatus,
    /// [`ChangeStatus::SavedAsIs`] when the entry has no `msgstr[1]`.
    pub plural_status: ChangeStatus,
}

impl Acceptance {
    pub fn is_auto_applied(&self) -> bool {
        self.status == ChangeStatus::AutoApplied || self.plural_status == ChangeStatus::AutoApplied
    }
}

/// Why an entry was left for manual review.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Rejection {
    /// No previous msgid to compare with.
    MissingPrevious,
    /// The msgid change is more than cosmetic.
    NotEquivalent,
    /// Having a plural translation does not match the plural msgid being cosmetically changed.
    PluralMismatch,
    /// The change is cosmetic but no reconciler could mirror it on one of the forms.
    Unresolved {
        proposed: Forms,
        status: ChangeStatus,
        plural_status: ChangeStatus,
    },
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Decision {
    Accepted(Acceptance),
    Rejected(Rejection),
}

/// The configured auto-repair engine. All front ends go through one of these.
///
/// The random source only drives accelerator placement; seed it for reproducible runs.
pub struct Engine<R> {
    policy: EquivalencePolicy,
    letters: &'static LetterTable,
    rng: R,
}

impl<R: Rng> Engine<R> {
    pub fn new(policy: EquivalencePolicy, rng: R) -> Self {
        Engine {
            policy,
            letters: &GREEK,
            rng,
        }
    }

    /// Use another letter frequency table for accelerator placement.
    pub fn with_letters(self, letters: &'static LetterTable) -> Self {
        Engine { letters, ..self }
    }

    pub fn policy(&self) -> EquivalencePolicy {
        self.policy
    }

    pub fn propagate(&mut self, old: &str, new: &str, translated: &str) -> Reconciled {
        pipeline::propagate(old, new, translated, self.letters, &mut self.rng)
    }

    /// Whether the msgid change of `entry` passes the equivalence policy.
    pub fn is_trivial_change(&self, entry: &CatalogEntry) -> bool {
        self.policy
            .is_equivalent(entry.previous_msgid.as_deref(), Some(&entry.msgid))
    }

    pub fn classify(&mut self, entry: &CatalogEntry) -> Decision {
        let Some(previous) = entry.previous_msgid.as_deref() else {
            return Decision::Rejected(Rejection::MissingPrevious);
        };
        if !self.is_trivial_change(entry) {
            return Decision::Rejected(Rejection::NotEquivalent);
        }
        let plural_equivalent = self.policy.is_equivalent(
            entry.previous_msgid_plural.as_deref(),
            entry.msgid_plural.as_deref(),
        );
        if entry.translation.has_plural_slot() != plural_equivalent {
            return Decision::Rejected(Rejection::PluralMismatch);
        }

        let current = entry.translation.forms();
        let singular = self.propagate(previous, &entry.msgid, &current.singular);
        let status = ChangeStatus::classify(
            &current.singular,
            &singular.text,
            singular.changed || previous == entry.msgid,
        );

        let (plural, plural_status) = match (
            current.plural.as_deref(),
            entry.previous_msgid_plural.as_deref(),
            entry.msgid_plural.as_deref(),
        ) {
            (Some(translated), Some(old), Some(new)) => {
                let plural = self.propagate(old, new, translated);
                let status = ChangeStatus::classify(
                    translated,
                    &plural.text,
                    singular.changed || plural.changed || old == new,
                );
                (Some(plural.text), status)
            }
            _ => (None, ChangeStatus::SavedAsIs),
        };

        let forms = Forms {
            singular: singular.text,
            plural,
        };
        if status == ChangeStatus::Unchanged || plural_status == ChangeStatus::Unchanged {
            return Decision::Rejected(Rejection::Unresolved {
                proposed: forms,
                status,
                plural_status,
            });
        }
        Decision::Accepted(Acceptance {
            forms,
            status,
            plural_status,
        })
    }

    /// See [`accelerator::repair_invalid`].
    pub fn repair_accelerators(&mut self, text: &str) -> Option<String> {
        accelerator::repair_invalid(text, self.letters, &mut self.rng)
    }
}
