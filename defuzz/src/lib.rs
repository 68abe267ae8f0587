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

//! # Fuzzy entry repair for gettext catalogs
//!
//! When the source text of a translated message changes, `msgmerge` keeps the old
//! translation and flags the entry `fuzzy`. Many of these changes are cosmetic: an
//! accelerator moved or disappeared, a trailing ellipsis or colon was dropped, the
//! string went from title case to sentence case. This crate recognizes such edits,
//! mirrors them into the translation and clears the flag, leaving everything else
//! for a human.
//!
//! The [`Engine`] decides for a single [`CatalogEntry`]. The [`process`] module runs
//! it over a whole [`Catalog`], and the [`session`] module drives the manual review
//! of the entries the engine could not handle.
//!
//! Example:
//!
//! ```
//! use defuzz::{CatalogEntry, Decision, Engine, EquivalencePolicy, Translation};
//! use rand::{rngs::StdRng, SeedableRng};
//!
//! let mut engine = Engine::new(EquivalencePolicy::default(), StdRng::seed_from_u64(0));
//! let mut entry = CatalogEntry::new("Quit", Translation::Singular("&Έξοδος".into()));
//! entry.previous_msgid = Some("&Quit".into());
//! entry.needs_review = true;
//! match engine.classify(&entry) {
//!     Decision::Accepted(acceptance) => assert_eq!(acceptance.forms.singular, "Έξοδος"),
//!     Decision::Rejected(rejection) => panic!("unexpected rejection: {rejection:?}"),
//! }
//! ```

pub mod accelerator;
pub mod case;
pub mod catalog;
pub mod classify;
pub mod entry;
pub mod equivalence;
pub mod normalize;
pub mod pipeline;
pub mod process;
pub mod session;
pub mod trailing;

pub use catalog::{Catalog, CatalogError};
pub use classify::{Acceptance, ChangeStatus, Decision, Engine, Rejection};
pub use entry::{CatalogEntry, Forms, Translation};
pub use equivalence::EquivalencePolicy;
pub use normalize::PunctuationSet;
pub use pipeline::Reconciled;
pub use process::{FileReport, Reporter, ReviewOptions};
pub use session::{Interrupted, ReviewIo, ReviewOutcome};
