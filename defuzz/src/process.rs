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

//! Runs the engine over every relevant entry of one catalog.
//!
//! The drivers only change the in-memory [`Catalog`]; the caller saves it once
//! the whole file has been processed, and only if [`FileReport::changed`] is not
//! zero.

use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use rand::Rng;

use crate::catalog::Catalog;
use crate::classify::{Acceptance, Decision, Engine, Rejection};
use crate::entry::{CatalogEntry, Translation};
use crate::session::{self, ReviewIo, ReviewOutcome, DEFAULT_CONFIRM_DELAY};

/// Outcome of running a driver over one catalog.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct FileReport {
    /// Entries rewritten or unflagged.
    pub changed: usize,
    /// Processing stopped before the last entry.
    pub interrupted: bool,
}

/// Notified of every decision the drivers take, before anything is written to
/// the catalog. All methods do nothing by default.
pub trait Reporter {
    fn accepted(&mut self, _path: &Path, _entry: &CatalogEntry, _acceptance: &Acceptance) {}
    fn rejected(&mut self, _path: &Path, _entry: &CatalogEntry, _rejection: &Rejection) {}
    fn reviewed(&mut self, _path: &Path, _entry: &CatalogEntry, _outcome: &ReviewOutcome) {}
    fn repaired(&mut self, _path: &Path, _entry: &CatalogEntry, _repaired: &str) {}
}

/// A [`Reporter`] that ignores everything.
pub struct Silent;

impl Reporter for Silent {}

#[derive(Clone, Copy, Debug)]
pub struct ReviewOptions {
    /// Send every rejected entry to the reviewer, not only the ones whose msgid
    /// change passes the equivalence policy.
    pub no_filter: bool,
    pub confirm_delay: Duration,
}

impl Default for ReviewOptions {
    fn default() -> Self {
        ReviewOptions {
            no_filter: false,
            confirm_delay: DEFAULT_CONFIRM_DELAY,
        }
    }
}

fn catalog_path(catalog: &Catalog) -> &Path {
    catalog.path().unwrap_or(Path::new(""))
}

fn accept(catalog: &mut Catalog, index: usize, entry: &mut CatalogEntry, acceptance: &Acceptance) {
    entry.commit(&acceptance.forms);
    catalog.commit(index, entry);
}

/// Clear every flagged entry the classifier accepts. Rejected entries are left alone.
pub fn fix<R: Rng>(
    catalog: &mut Catalog,
    engine: &mut Engine<R>,
    reporter: &mut dyn Reporter,
    interrupt: &AtomicBool,
) -> FileReport {
    let mut report = FileReport::default();
    for index in catalog.review_candidates() {
        if interrupt.load(Ordering::Relaxed) {
            report.interrupted = true;
            break;
        }
        let Some(mut entry) = catalog.entry(index) else {
            continue;
        };
        match engine.classify(&entry) {
            Decision::Accepted(acceptance) => {
                tracing::debug!(msgid = %entry.msgid, status = ?acceptance.status, "accepted");
                reporter.accepted(catalog_path(catalog), &entry, &acceptance);
                accept(catalog, index, &mut entry, &acceptance);
                report.changed += 1;
            }
            Decision::Rejected(rejection) => {
                tracing::debug!(msgid = %entry.msgid, ?rejection, "left for review");
                reporter.rejected(catalog_path(catalog), &entry, &rejection);
            }
        }
    }
    report
}

/// Like [`fix`], but rejected entries that are eligible are shown to the reviewer.
///
/// When the reviewer interrupts, the entry being reviewed keeps its text and
/// no further entry is visited.
pub fn review<R: Rng>(
    catalog: &mut Catalog,
    engine: &mut Engine<R>,
    io: &mut dyn ReviewIo,
    options: ReviewOptions,
    reporter: &mut dyn Reporter,
    interrupt: &AtomicBool,
) -> FileReport {
    let mut report = FileReport::default();
    for index in catalog.review_candidates() {
        if interrupt.load(Ordering::Relaxed) {
            report.interrupted = true;
            break;
        }
        let Some(mut entry) = catalog.entry(index) else {
            continue;
        };
        let proposed = match engine.classify(&entry) {
            Decision::Accepted(acceptance) => {
                tracing::debug!(msgid = %entry.msgid, status = ?acceptance.status, "accepted");
                reporter.accepted(catalog_path(catalog), &entry, &acceptance);
                accept(catalog, index, &mut entry, &acceptance);
                report.changed += 1;
                continue;
            }
            Decision::Rejected(rejection) => {
                let eligible = options.no_filter || engine.is_trivial_change(&entry);
                if !eligible {
                    reporter.rejected(catalog_path(catalog), &entry, &rejection);
                    continue;
                }
                match rejection {
                    Rejection::Unresolved { proposed, .. } => proposed,
                    _ => entry.translation.forms(),
                }
            }
        };

        let path = catalog_path(catalog).to_owned();
        let outcome = match session::review(io, &path, &entry, proposed, options.confirm_delay) {
            Ok(outcome) => outcome,
            Err(session::Interrupted) => {
                tracing::info!(msgid = %entry.msgid, "review interrupted");
                report.interrupted = true;
                break;
            }
        };
        reporter.reviewed(&path, &entry, &outcome);
        if let ReviewOutcome::Committed(forms) = &outcome {
            entry.commit(forms);
            catalog.commit(index, &entry);
            report.changed += 1;
        }
    }
    report
}

/// Re-place invalid accelerators in translated singular entries.
pub fn repair_keybindings<R: Rng>(
    catalog: &mut Catalog,
    engine: &mut Engine<R>,
    reporter: &mut dyn Reporter,
    interrupt: &AtomicBool,
) -> FileReport {
    let mut report = FileReport::default();
    for index in catalog.translated_singulars() {
        if interrupt.load(Ordering::Relaxed) {
            report.interrupted = true;
            break;
        }
        let Some(mut entry) = catalog.entry(index) else {
            continue;
        };
        let Translation::Singular(before) = entry.translation.clone() else {
            continue;
        };
        let Some(repaired) = engine.repair_accelerators(&before) else {
            continue;
        };
        reporter.repaired(catalog_path(catalog), &entry, &repaired);
        entry.translation = Translation::Singular(repaired);
        tracing::debug!(msgid = %entry.msgid, %before, "accelerator repaired");
        catalog.commit(index, &entry);
        report.changed += 1;
    }
    report
}
